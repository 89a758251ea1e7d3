//! Chart data pipeline for a learning-platform progress dashboard.
//!
//! Raw query rows (XP transactions, audit totals, graded piscine exercises)
//! go in; renderer-agnostic [`Scene`]s come out, one per chart. A scene is a
//! tree of rectangles, pie sectors, polylines, circles and text in a fixed
//! logical canvas, with hover payloads attached to the interactive shapes.
//! [`svg::render_svg`] is one consumer; any host that walks the tree (or
//! its JSON form) is another.
//!
//! ```
//! use progress_charts::{LineConfig, build_cumulative_series, layout_progression, Event};
//! use chrono::{TimeZone, Utc};
//!
//! let events = vec![
//!     Event::new(100, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
//!     Event::new(200, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
//!     Event::new(150, Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap()),
//! ];
//! let series = build_cumulative_series(events.as_slice());
//! assert_eq!(series.len(), 2);
//! assert_eq!(series[1].cumulative, 450);
//!
//! let scene = layout_progression(&series, &LineConfig::default()).unwrap();
//! assert!(scene.is_some());
//! ```

pub mod log;

pub mod decode;
pub mod errors;
pub mod format;
pub mod identity;
pub mod layout;
pub mod query;
pub mod scene;
pub mod series;
pub mod summary;
pub mod svg;
pub mod types;

pub use errors::{IdentityError, InputError, LayoutError, QueryError};
pub use format::{TickSet, compute_axis_ticks, format_compact};
pub use layout::{
    AuditTotals, BarConfig, ChartKind, LineConfig, PieConfig, layout_audit_comparison, layout_pass_fail,
    layout_pass_fail_tally, layout_progression,
};
pub use query::{CredentialProvider, DashboardData, QueryExecutor, fetch_dashboard_data};
pub use scene::{Node, Primitive, Scene};
pub use series::{Event, PassFail, ProgressRecord, SeriesPoint, build_cumulative_series};
pub use svg::{SvgOptions, render_svg};
