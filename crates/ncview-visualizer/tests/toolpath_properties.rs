//! End-to-end and property tests for the text-to-toolpath pipeline

use ncview_core::{
    ArcError, GcodeError, MotionKind, NegativeRadiusMode, ParseOptions, Point2, Point3,
};
use ncview_visualizer::gcode::{
    candidate_centers, matches_direction, resolve_arc, ArcSpec, SegmentKind,
};
use ncview_visualizer::{parse_gcode, parse_toolpath, BoundingBox, ViewTransform};
use proptest::prelude::*;
use std::f64::consts::{PI, TAU};

fn arc_sweep(kind: &SegmentKind) -> f64 {
    match kind {
        SegmentKind::Arc(geometry) => geometry.sweep,
        SegmentKind::Line => panic!("expected an arc segment"),
    }
}

#[test]
fn test_canonical_clockwise_long_way_round() {
    let toolpath = parse_gcode("G0 X10 Y0\nG2 X0 Y10 I-10 J0\n");
    let arc = &toolpath.segments[1];
    let SegmentKind::Arc(geometry) = arc.kind else {
        panic!("expected an arc segment");
    };
    assert!(geometry.center.approx_eq(Point2::ORIGIN));
    assert!((geometry.radius - 10.0).abs() < 1e-12);
    assert!(geometry.start_angle.abs() < 1e-12);
    assert!((geometry.end_angle() - (PI / 2.0 - TAU)).abs() < 1e-9);
    assert!((geometry.sweep + 3.0 * PI / 2.0).abs() < 1e-9);

    // Passes through (0, -10)
    let through = geometry.point_at(1.0 / 3.0);
    assert!(through.x.abs() < 1e-9);
    assert!((through.y + 10.0).abs() < 1e-9);
}

#[test]
fn test_full_circle_spans_a_full_turn() {
    let toolpath = parse_gcode("G0 X5 Y0\nG2 X5 Y0 I-5 J0\nG3 X5 Y0 I-5 J0\n");
    assert_eq!(toolpath.segments.len(), 3);
    assert_eq!(arc_sweep(&toolpath.segments[1].kind), -TAU);
    assert_eq!(arc_sweep(&toolpath.segments[2].kind), TAU);
    assert!((toolpath.bounds.min.x + 5.0).abs() < 1e-9);
    assert!((toolpath.bounds.max.y - 5.0).abs() < 1e-9);
}

#[test]
fn test_single_segment_bounds() {
    let toolpath = parse_gcode("G1 X10 Y5");
    assert_eq!(
        toolpath.bounds,
        BoundingBox {
            min: Point2::new(0.0, 0.0),
            max: Point2::new(10.0, 5.0),
        }
    );
}

#[test]
fn test_z_only_line_emits_nothing_but_sets_depth() {
    let toolpath = parse_gcode("G0 X3 Y4\nG1 Z-5\nG1 X6\n");
    assert_eq!(toolpath.segments.len(), 2);
    assert!(toolpath
        .segments
        .iter()
        .all(|s| s.start.xy() != s.end.xy()));
    assert_eq!(toolpath.segments[1].z_depth, -5.0);
    assert_eq!(toolpath.segments[1].start.z, -5.0);
}

#[test]
fn test_malformed_token_keeps_other_lines() {
    let program = "G0 X0 Y0\nG1 X12.3.4 Y2\nG1 X5 Y5\nG2 X10 Y0 R8\n";
    let toolpath = parse_gcode(program);
    assert_eq!(toolpath.segments.len(), 4);
    assert_eq!(toolpath.segments[1].end, Point3::new(0.0, 2.0, 0.0));
    assert!(matches!(
        &toolpath.diagnostics[0].error,
        GcodeError::MalformedToken { line_number: 2, token } if token == "X12.3.4"
    ));
}

#[test]
fn test_path_is_continuous() {
    let program = "\
%
(header)
N10 G21 G90
N20 G0 Z5
N30 G0 X10 Y10
N40 G1 Z-1 F300
N50 G1 X30 ; first side
N60 Y30
N70 G3 X10 Y30 R10
N80 G2 X10 Y10 I0 J-10
N90 G2 X99 Y99 R1
N100 G0 Z5
M30
%
";
    let toolpath = parse_gcode(program);
    assert_eq!(toolpath.error_count(), 1);
    assert!(toolpath.segments.windows(2).all(|w| w[0].end == w[1].start
        || w[1].source_line > w[0].source_line + 1));
    let lines: Vec<usize> = toolpath.segments.iter().map(|s| s.source_line).collect();
    let mut sorted = lines.clone();
    sorted.sort_unstable();
    assert_eq!(lines, sorted);
    assert_eq!(toolpath.segments.last().map(|s| s.motion), Some(MotionKind::ClockwiseArc));
    assert_eq!(toolpath.final_state.position, Point3::new(99.0, 99.0, 5.0));
}

#[test]
fn test_near_side_negative_radius() {
    let options = ParseOptions {
        negative_radius: NegativeRadiusMode::NearSide,
        ..ParseOptions::default()
    };
    let far = parse_gcode("G0 X10\nG3 X0 Y10 R-10\n");
    let near = parse_toolpath("G0 X10\nG3 X0 Y10 R-10\n", &options);
    assert!((arc_sweep(&far.segments[1].kind) - 1.5 * PI).abs() < 1e-9);
    assert!((arc_sweep(&near.segments[1].kind) - 0.5 * PI).abs() < 1e-9);
}

#[test]
fn test_radius_mismatch_reported() {
    let toolpath = parse_gcode("G0 X10\nG2 X0 Y12 I-10 J0\nG1 X1\n");
    assert_eq!(toolpath.segments.len(), 2);
    assert!(matches!(
        toolpath.diagnostics[0].error,
        GcodeError::UnresolvableArc {
            line_number: 2,
            source: ArcError::RadiusMismatch { .. }
        }
    ));
}

#[test]
fn test_fit_view_of_parsed_program() {
    let toolpath = parse_gcode("G0 X-50 Y-50\nG1 X-10 Y-50\nG1 X-10 Y-10\n");
    let view = ViewTransform::fit(&toolpath.bounds, 800.0, 600.0, 0.05).unwrap();
    let centre = view.project(toolpath.bounds.center().unwrap());
    assert!((centre.x - 400.0).abs() < 1e-9);
    assert!((centre.y - 300.0).abs() < 1e-9);
    let top_left = view.project(Point2::new(toolpath.bounds.min.x, toolpath.bounds.max.y));
    assert!(top_left.x >= 0.0 && top_left.y >= 0.0);
}

fn axis_word() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), (-1000.0f64..1000.0).prop_map(Some)]
}

proptest! {
    #[test]
    fn modal_inheritance_overrides_only_given_axes(
        lines in prop::collection::vec((axis_word(), axis_word(), axis_word()), 1..40)
    ) {
        let mut program = String::new();
        let mut expected = Point3::ORIGIN;
        for (x, y, z) in &lines {
            program.push_str("G1");
            if let Some(x) = x {
                program.push_str(&format!(" X{}", x));
                expected.x = *x;
            }
            if let Some(y) = y {
                program.push_str(&format!(" Y{}", y));
                expected.y = *y;
            }
            if let Some(z) = z {
                program.push_str(&format!(" Z{}", z));
                expected.z = *z;
            }
            program.push('\n');
        }

        let toolpath = parse_gcode(&program);
        prop_assert_eq!(toolpath.final_state.position, expected);
        prop_assert!(toolpath.diagnostics.is_empty());
        for pair in toolpath.segments.windows(2) {
            prop_assert_eq!(pair[0].end.xy(), pair[1].start.xy());
        }
    }

    #[test]
    fn exactly_one_candidate_matches_direction(
        sx in -100.0f64..100.0,
        sy in -100.0f64..100.0,
        ex in -100.0f64..100.0,
        ey in -100.0f64..100.0,
        factor in 1.01f64..5.0,
        clockwise in any::<bool>(),
    ) {
        let start = Point2::new(sx, sy);
        let end = Point2::new(ex, ey);
        let chord = start.distance_to(end);
        prop_assume!(chord > 0.1);
        let radius = chord / 2.0 * factor;

        let (left, right) = candidate_centers(start, end, radius, 1e-3).unwrap();
        let left_ok = matches_direction(start, end, left, clockwise);
        let right_ok = matches_direction(start, end, right, clockwise);
        prop_assert!(left_ok != right_ok);

        let options = ParseOptions::default();
        let short = resolve_arc(start, end, clockwise, ArcSpec::Radius(radius), &options).unwrap();
        let expected_center = if left_ok { left } else { right };
        prop_assert!(short.center.approx_eq(expected_center));
        prop_assert_eq!(short.sweep < 0.0, clockwise);
        prop_assert!(short.sweep.abs() <= PI + 1e-9);

        let long = resolve_arc(start, end, clockwise, ArcSpec::Radius(-radius), &options).unwrap();
        prop_assert_eq!(long.sweep < 0.0, clockwise);
        prop_assert!(long.sweep.abs() >= PI - 1e-9);
        prop_assert!((short.sweep.abs() + long.sweep.abs() - TAU).abs() < 1e-6);
    }

    #[test]
    fn arc_sweep_follows_commanded_direction(
        start_deg in 0u32..360,
        end_deg in 0u32..360,
        radius in 0.5f64..50.0,
        clockwise in any::<bool>(),
    ) {
        prop_assume!(start_deg != end_deg);
        let a0 = (start_deg as f64).to_radians();
        let a1 = (end_deg as f64).to_radians();
        let start = Point2::new(radius * a0.cos(), radius * a0.sin());
        let end = Point2::new(radius * a1.cos(), radius * a1.sin());
        let spec = ArcSpec::CenterOffset { i: -start.x, j: -start.y };

        let geometry = resolve_arc(start, end, clockwise, spec, &ParseOptions::default()).unwrap();
        prop_assert_eq!(geometry.sweep < 0.0, clockwise);
        prop_assert!(geometry.sweep.abs() > 0.0 && geometry.sweep.abs() < TAU);
        prop_assert!(geometry.point_at(1.0).distance_to(end) < 1e-6);
    }
}
