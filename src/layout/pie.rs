//! Pass/fail pie layout.

use glam::{DVec2, dvec2};
use serde::{Deserialize, Serialize};

use super::{ChartKind, defaults, title, validate_canvas};
use crate::errors::LayoutError;
use crate::format::format_fixed;
use crate::scene::{Anchor, Hover, Label, Paint, Rect, Scene, Sector, Stroke, TextStyle};
use crate::series::{PassFail, ProgressRecord};
use crate::types::{Canvas, Color, Degrees};

/// Pie chart settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieConfig {
    pub canvas: Canvas,
    pub center_y: f64,
    pub radius: f64,
    pub title: String,
    pub pass_color: Color,
    pub fail_color: Color,
    pub outline_color: Color,
    pub text_color: Color,
    pub muted_color: Color,
}

impl Default for PieConfig {
    fn default() -> Self {
        Self {
            canvas: defaults::PIE_CANVAS,
            center_y: defaults::PIE_CENTER_Y,
            radius: defaults::PIE_RADIUS,
            title: "Piscine Performance".to_string(),
            pass_color: Color::from(defaults::PASS),
            fail_color: Color::from(defaults::FAIL),
            outline_color: Color::from(defaults::OUTLINE),
            text_color: Color::from(defaults::TEXT),
            muted_color: Color::from(defaults::MUTED),
        }
    }
}

impl PieConfig {
    pub fn center(&self) -> DVec2 {
        dvec2(self.canvas.center_x(), self.center_y)
    }
}

/// Classify `records` and lay out the pass/fail pie.
///
/// Returns `Ok(None)` for empty input.
pub fn layout_pass_fail(records: &[ProgressRecord], config: &PieConfig) -> Result<Option<Scene>, LayoutError> {
    if records.is_empty() {
        return Ok(None);
    }
    layout_pass_fail_tally(PassFail::classify(records), config)
}

/// Lay out an already classified tally.
///
/// The pass slice sweeps `0..pass_angle` and the fail slice sweeps
/// `pass_angle..360`. Both are fractions of `total`, so unclassified records
/// widen the fail slice rather than leaving a gap. A bucket with a zero count
/// gets no slice at all.
pub fn layout_pass_fail_tally(tally: PassFail, config: &PieConfig) -> Result<Option<Scene>, LayoutError> {
    let canvas = &config.canvas;
    validate_canvas(ChartKind::PiscineStats, canvas)?;
    if tally.passed.saturating_add(tally.failed) > tally.total {
        return Err(LayoutError::InconsistentTally {
            chart: ChartKind::PiscineStats.name(),
            passed: tally.passed,
            failed: tally.failed,
            total: tally.total,
        });
    }
    if tally.total == 0 {
        return Ok(None);
    }

    let pass_angle = Degrees::share_of_turn(tally.passed, tally.total);
    let pass_pct = tally.pass_percentage();
    let fail_pct = tally.fail_percentage();
    crate::log::debug!(
        passed = tally.passed,
        failed = tally.failed,
        total = tally.total,
        pass_angle = pass_angle.raw(),
        "layout pass/fail pie"
    );

    let center = config.center();
    let outline = Stroke::new(config.outline_color.clone(), defaults::SLICE_STROKE_WIDTH);
    let slice = |start: Degrees, end: Degrees, color: &Color, hover: Hover| Sector {
        center,
        radius: config.radius,
        start,
        end,
        fill: Paint::solid(color.clone()),
        stroke: Some(outline.clone()),
        hover: Some(hover),
    };

    let mut scene = Scene::new(canvas.width, canvas.height);
    scene.push(title(canvas, defaults::PIE_TITLE_Y, &config.title, &config.text_color));

    if tally.passed > 0 {
        let hover = Hover::new("Passed", tally.passed as f64)
            .with_percentage(pass_pct)
            .with_text(
                format!("Passed: {} exercises", tally.passed),
                format!("{}% success rate", format_fixed(pass_pct, 1)),
            );
        scene.push(slice(Degrees::ZERO, pass_angle, &config.pass_color, hover));
    }
    if tally.failed > 0 {
        let hover = Hover::new("Failed", tally.failed as f64)
            .with_percentage(fail_pct)
            .with_text(
                format!("Failed: {} exercises", tally.failed),
                format!("{}% of attempts", format_fixed(fail_pct, 1)),
            );
        scene.push(slice(pass_angle, Degrees::FULL, &config.fail_color, hover));
    }

    scene.push(Label::new(
        center,
        tally.total.to_string(),
        TextStyle::new(defaults::TOTAL_SIZE, config.text_color.clone())
            .bold()
            .anchor(Anchor::Middle),
    ));
    scene.push(Label::new(
        center + dvec2(0.0, 25.0),
        "Total Exercises",
        TextStyle::new(defaults::AXIS_LABEL_SIZE, config.muted_color.clone()).anchor(Anchor::Middle),
    ));

    // Legend
    let legend_y = center.y + config.radius + defaults::LEGEND_OFFSET;
    let entries = [
        (
            center.x - defaults::LEGEND_SPACING,
            &config.pass_color,
            format!("Passed: {} ({}%)", tally.passed, format_fixed(pass_pct, 1)),
        ),
        (
            center.x + 20.0,
            &config.fail_color,
            format!("Failed: {} ({}%)", tally.failed, format_fixed(fail_pct, 1)),
        ),
    ];
    for (x, color, text) in entries {
        scene.push(
            Rect::new(
                dvec2(x, legend_y),
                DVec2::splat(defaults::SWATCH_SIZE),
                color.clone(),
            )
            .rounded(defaults::SWATCH_CORNER_RADIUS),
        );
        scene.push(Label::new(
            dvec2(x + 30.0, legend_y + 15.0),
            text,
            TextStyle::new(defaults::LABEL_SIZE, config.text_color.clone()),
        ));
    }

    Ok(Some(scene))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Node, PrimitiveKind};
    use chrono::{TimeZone, Utc};

    fn records(grades: &[f64]) -> Vec<ProgressRecord> {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        grades
            .iter()
            .map(|g| ProgressRecord::new(*g, ts, "piscine-go"))
            .collect()
    }

    fn sectors(scene: &Scene) -> Vec<&Sector> {
        scene
            .children
            .iter()
            .filter_map(|n| match n {
                Node::Sector(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    fn tally(passed: usize, failed: usize) -> PassFail {
        PassFail {
            passed,
            failed,
            total: passed + failed,
        }
    }

    #[test]
    fn seven_of_ten_passes_at_252_degrees() {
        let scene = layout_pass_fail_tally(tally(7, 3), &PieConfig::default())
            .unwrap()
            .unwrap();
        let slices = sectors(&scene);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].start, Degrees(0.0));
        assert_eq!(slices[0].end, Degrees(252.0));
        assert_eq!(slices[1].start, Degrees(252.0));
        assert_eq!(slices[1].end, Degrees(360.0));

        let total: f64 = slices.iter().map(|s| s.sweep().raw()).sum();
        assert_eq!(total, 360.0);
        assert!(slices[0].large_arc());
        assert!(!slices[1].large_arc());
    }

    #[test]
    fn zero_bucket_is_omitted() {
        let config = PieConfig::default();
        let all_pass = layout_pass_fail_tally(tally(5, 0), &config).unwrap().unwrap();
        let slices = sectors(&all_pass);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].hover.as_ref().unwrap().label, "Passed");
        assert!(slices[0].is_full_circle());

        let all_fail = layout_pass_fail_tally(tally(0, 4), &config).unwrap().unwrap();
        let slices = sectors(&all_fail);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].hover.as_ref().unwrap().label, "Failed");
        assert_eq!(slices[0].start, Degrees::ZERO);
    }

    #[test]
    fn empty_input_is_no_data() {
        assert_eq!(layout_pass_fail(&[], &PieConfig::default()), Ok(None));
        assert_eq!(layout_pass_fail_tally(PassFail::default(), &PieConfig::default()), Ok(None));
    }

    #[test]
    fn classifies_records() {
        let scene = layout_pass_fail(&records(&[1.0, 1.2, 0.0, 1.0]), &PieConfig::default())
            .unwrap()
            .unwrap();
        let slices = sectors(&scene);
        assert_eq!(slices[0].end, Degrees(270.0));
        assert_eq!(slices[0].hover.as_ref().unwrap().value, 3.0);
    }

    #[test]
    fn fractional_grades_count_only_toward_total() {
        // 2 passed, 1 failed, 1 unclassified
        let scene = layout_pass_fail(&records(&[1.0, 1.0, 0.0, 0.5]), &PieConfig::default())
            .unwrap()
            .unwrap();
        let slices = sectors(&scene);
        assert_eq!(slices[0].end, Degrees(180.0));
        assert_eq!(slices[1].sweep(), Degrees(180.0));
        assert_eq!(slices[1].hover.as_ref().unwrap().percentage, Some(25.0));
        assert!(scene.labels().contains(&"Failed: 1 (25.0%)"));
    }

    #[test]
    fn text_content() {
        let scene = layout_pass_fail_tally(tally(7, 3), &PieConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            scene.labels(),
            vec![
                "Piscine Performance",
                "10",
                "Total Exercises",
                "Passed: 7 (70.0%)",
                "Failed: 3 (30.0%)",
            ]
        );
        let slices = sectors(&scene);
        assert_eq!(
            slices[0].hover.as_ref().unwrap().tooltip(),
            "Passed: 7 exercises\n70.0% success rate"
        );
        assert_eq!(
            slices[1].hover.as_ref().unwrap().tooltip(),
            "Failed: 3 exercises\n30.0% of attempts"
        );
    }

    #[test]
    fn overfull_tally_is_rejected() {
        let tally = PassFail {
            passed: 3,
            failed: 2,
            total: 4,
        };
        assert_eq!(
            layout_pass_fail_tally(tally, &PieConfig::default()),
            Err(LayoutError::InconsistentTally {
                chart: "piscine stats",
                passed: 3,
                failed: 2,
                total: 4,
            })
        );
    }

    #[test]
    fn percentage_ties_round_up() {
        let scene = layout_pass_fail_tally(tally(15, 1), &PieConfig::default())
            .unwrap()
            .unwrap();
        assert!(scene.labels().contains(&"Failed: 1 (6.3%)"), "{:?}", scene.labels());
        assert_eq!(sectors(&scene)[1].hover.as_ref().unwrap().detail, "6.3% of attempts");
    }

    #[test]
    fn legend_sits_below_pie() {
        let scene = layout_pass_fail_tally(tally(1, 1), &PieConfig::default())
            .unwrap()
            .unwrap();
        let swatches: Vec<DVec2> = scene
            .children
            .iter()
            .filter_map(|n| match n {
                Node::Rect(r) => Some(r.origin),
                _ => None,
            })
            .collect();
        assert_eq!(swatches, vec![dvec2(200.0, 370.0), dvec2(420.0, 370.0)]);
        assert_eq!(scene.count(PrimitiveKind::Sector), 2);
    }

    #[test]
    fn slices_have_white_outline() {
        let scene = layout_pass_fail_tally(tally(2, 2), &PieConfig::default())
            .unwrap()
            .unwrap();
        for s in sectors(&scene) {
            assert_eq!(s.stroke, Some(Stroke::new(Color::from("white"), 3.0)));
            assert_eq!(s.center, dvec2(400.0, 200.0));
        }
    }

    #[test]
    fn layout_is_idempotent() {
        let config = PieConfig::default();
        let input = records(&[1.0, 0.0, 0.0, 1.0, 1.0]);
        assert_eq!(
            layout_pass_fail(&input, &config).unwrap(),
            layout_pass_fail(&input, &config).unwrap()
        );
    }
}
