//! Error types with diagnostics using miette
//!
//! Empty input is never an error: the series transformer returns an empty
//! series and the layouts return `Ok(None)`. These types cover upstream
//! contract violations only.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NumericError;

// ============================================================================
// Input Errors
// ============================================================================

/// Structural problems in raw query rows.
///
/// Every variant names the decoding function that rejected the input so the
/// host can report which contract was broken.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{function}: row {index} is missing required field `{field}`")]
    #[diagnostic(
        code(progress_charts::input::missing_field),
        help("the query must select `{field}` for every row")
    )]
    MissingField {
        function: &'static str,
        field: &'static str,
        index: usize,
    },

    #[error("{function}: field `{field}` of row {index} is not {expected}")]
    #[diagnostic(code(progress_charts::input::wrong_type))]
    WrongType {
        function: &'static str,
        field: &'static str,
        index: usize,
        expected: &'static str,
    },

    #[error("{function}: row {index} has an unparsable timestamp `{value}`")]
    #[diagnostic(
        code(progress_charts::input::invalid_timestamp),
        help("timestamps must be RFC 3339, e.g. 2024-01-01T10:00:00Z")
    )]
    InvalidTimestamp {
        function: &'static str,
        index: usize,
        value: String,
    },

    #[error("{function}: response has no `{key}`")]
    #[diagnostic(code(progress_charts::input::missing_root))]
    MissingRoot {
        function: &'static str,
        key: &'static str,
    },
}

// ============================================================================
// Layout Errors
// ============================================================================

/// Errors raised by the geometry engine before any shape is produced.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("{chart}: value {value} must be finite and non-negative")]
    #[diagnostic(code(progress_charts::layout::invalid_value))]
    InvalidValue { chart: &'static str, value: f64 },

    #[error("{chart}: invalid canvas: {source}")]
    #[diagnostic(
        code(progress_charts::layout::invalid_canvas),
        help("padding must leave a positive plot width and height")
    )]
    InvalidCanvas {
        chart: &'static str,
        #[source]
        source: NumericError,
    },

    #[error("{chart}: {passed} passed + {failed} failed exceeds {total} records")]
    #[diagnostic(
        code(progress_charts::layout::inconsistent_tally),
        help("build the tally with `PassFail::classify`")
    )]
    InconsistentTally {
        chart: &'static str,
        passed: usize,
        failed: usize,
        total: usize,
    },
}

// ============================================================================
// Identity Errors
// ============================================================================

/// Errors from reading the subject claim out of a bearer token.
#[derive(Error, Diagnostic, Debug)]
pub enum IdentityError {
    #[error("token is empty")]
    #[diagnostic(code(progress_charts::identity::empty))]
    Empty,

    #[error("token has {segments} segments, expected 3")]
    #[diagnostic(code(progress_charts::identity::malformed))]
    Malformed { segments: usize },

    #[error("token payload is not base64url")]
    #[diagnostic(code(progress_charts::identity::encoding))]
    Encoding(#[from] base64::DecodeError),

    #[error("token payload is not a JSON object")]
    #[diagnostic(code(progress_charts::identity::payload))]
    Payload(#[from] serde_json::Error),

    #[error("token has no `sub` claim")]
    #[diagnostic(code(progress_charts::identity::missing_subject))]
    MissingSubject,

    #[error("`sub` claim `{value}` is not a numeric user id")]
    #[diagnostic(code(progress_charts::identity::invalid_subject))]
    InvalidSubject { value: String },
}

// ============================================================================
// Query Errors
// ============================================================================

/// Errors from [`fetch_dashboard_data`](crate::query::fetch_dashboard_data).
#[derive(Error, Diagnostic, Debug)]
pub enum QueryError {
    #[error("no bearer token available")]
    #[diagnostic(
        code(progress_charts::query::unauthenticated),
        help("sign in again to obtain a fresh token")
    )]
    Unauthenticated,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error("query `{query}` failed")]
    #[diagnostic(code(progress_charts::query::executor))]
    Executor {
        query: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A [`RecordedResponses`](crate::query::RecordedResponses) executor was
/// asked for an operation it has no response for.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("no recorded response for operation `{operation}`")]
#[diagnostic(code(progress_charts::query::missing_response))]
pub struct MissingResponse {
    pub operation: String,
}
