use approx::assert_abs_diff_eq;
use easel_core::traits::Validate;
use easel_core::{EaselError, EditorConfig};
use easel_curve::{
    Curve, DrawCommand, HandleAddress, HandlePosition, HandleSide, HandleStyle, KeyState,
    NormalCurve, RecordingGraphics, SegmentKind, MIN_SEGMENT_WIDTH_PX,
};
use easel_math::{dvec2, ColorF, GraphView};

fn view() -> GraphView {
    GraphView::new(dvec2(0.0, 400.0), dvec2(400.0, 400.0))
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Four segments, one of each kind.
fn mixed_curve() -> NormalCurve {
    let mut curve = NormalCurve::with_kind(SegmentKind::Linear);
    for x in [0.25, 0.5, 0.75] {
        assert!(curve.add_curve(dvec2(x, 0.0), &view()));
    }
    assert!(curve.replace_curve(1, SegmentKind::Bezier));
    assert!(curve.replace_curve(2, SegmentKind::Elastic));
    assert!(curve.replace_curve(3, SegmentKind::Bounce));
    curve
}

#[test]
fn test_add_curve_splits_at_value() {
    init_logger();
    let mut curve = NormalCurve::with_kind(SegmentKind::Linear);
    let before = curve.get_value(0.5, 0.0, 1.0);
    assert!(curve.add_curve(dvec2(0.5, 0.9), &view()));
    assert_eq!(curve.len(), 2);

    let segments = curve.segments();
    assert_abs_diff_eq!(segments[0].frame().width(), 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(segments[1].frame().width(), 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(segments[0].point_end().y, before, epsilon = 1e-12);
    curve.validate().unwrap();
}

#[test]
fn test_add_curve_keeps_bezier_shape() {
    let mut curve = NormalCurve::new();
    let samples: Vec<f64> = (0..=20).map(|i| curve.get_value(i as f64 / 20.0, 0.0, 1.0)).collect();
    assert!(curve.add_curve(dvec2(0.4, 0.0), &view()));
    for (i, expected) in samples.iter().enumerate() {
        let got = curve.get_value(i as f64 / 20.0, 0.0, 1.0);
        assert_abs_diff_eq!(got, *expected, epsilon = 1e-7);
    }
}

#[test]
fn test_rejected_add_leaves_curve_unchanged() {
    let mut curve = mixed_curve();
    let before = curve.clone();

    for x in [0.0, 1.0, -0.2, 1.3, 0.5, 0.5 + 1e-12] {
        assert!(!curve.add_curve(dvec2(x, 0.5), &view()));
        assert_eq!(curve, before);
    }
    assert!(matches!(
        curve.try_add_curve(dvec2(1.0, 0.0), &view()),
        Err(EaselError::OutOfRange(_))
    ));
    assert!(matches!(
        curve.try_add_curve(dvec2(0.25, 0.0), &view()),
        Err(EaselError::InvalidOperation(_))
    ));
}

#[test]
fn test_zoomed_out_view_still_splits() {
    let mut curve = NormalCurve::with_kind(SegmentKind::Linear);
    assert!(curve.add_curve(dvec2(0.5, 0.5), &GraphView::default()));
    assert_eq!(curve.len(), 2);
    assert!(curve.add_curve(dvec2(0.5 + 1e-4, 0.5), &GraphView::default()));
    assert_eq!(curve.len(), 3);
    curve.validate().unwrap();
}

#[test]
fn test_min_width_split_is_zoom_dependent() {
    let mut curve = NormalCurve::with_kind(SegmentKind::Linear);
    curve.add_curve(dvec2(0.5, 0.0), &view());
    let before = curve.clone();

    // 1e-4 of the graph is 0.04 px at 400 px per unit
    assert!(matches!(
        curve.try_add_curve_min_width(dvec2(0.5 + 1e-4, 0.0), MIN_SEGMENT_WIDTH_PX, &view()),
        Err(EaselError::InvalidOperation(_))
    ));
    assert_eq!(curve, before);

    let zoomed = GraphView::new(dvec2(0.0, 1e6), dvec2(1e6, 1e6));
    assert_eq!(
        curve
            .try_add_curve_min_width(dvec2(0.5 + 1e-4, 0.0), MIN_SEGMENT_WIDTH_PX, &zoomed)
            .unwrap(),
        2
    );
    curve.validate().unwrap();
}

#[test]
fn test_delete_only_segment_fails() {
    let mut curve = NormalCurve::new();
    let before = curve.clone();
    assert!(!curve.delete_curve(dvec2(0.0, 0.0), 8.0, &view()));
    assert!(!curve.delete_curve(dvec2(1.0, 1.0), 8.0, &view()));
    assert_eq!(curve, before);
}

#[test]
fn test_delete_merges_nearest_boundary() {
    let mut curve = mixed_curve();
    let boundary = curve.boundaries()[2];

    // a few pixels off the joint still hits it
    let near = boundary + dvec2(3.0 / 400.0, 0.0);
    assert_eq!(curve.try_delete_curve(near, 8.0, &view()).unwrap(), 1);
    assert_eq!(curve.len(), 3);
    assert_eq!(curve.segments()[1].kind(), SegmentKind::Bezier);
    assert_eq!(curve.segments()[1].point_end().x, 0.75);
    curve.validate().unwrap();

    let before = curve.clone();
    assert!(matches!(
        curve.try_delete_curve(dvec2(0.6, 5.0), 8.0, &view()),
        Err(EaselError::NotFound(_))
    ));
    assert_eq!(curve, before);
}

#[test]
fn test_replace_out_of_range_fails() {
    let mut curve = mixed_curve();
    let before = curve.clone();
    assert!(!curve.replace_curve(4, SegmentKind::Linear));
    assert!(matches!(
        curve.try_replace_curve(17, SegmentKind::Bezier),
        Err(EaselError::OutOfRange(_))
    ));
    assert_eq!(curve, before);
}

#[test]
fn test_replace_keeps_frame() {
    let mut curve = mixed_curve();
    let frame = curve.segments()[2].frame();
    for kind in SegmentKind::ALL {
        assert!(curve.replace_curve(2, kind));
        let segment = &curve.segments()[2];
        assert_eq!(segment.kind(), kind);
        assert_eq!(segment.frame(), frame);
        assert_eq!(segment.value_at(frame.start.x), frame.start.y);
        assert_eq!(segment.value_at(frame.end.x), frame.end.y);
        curve.validate().unwrap();
    }
}

#[test]
fn test_partition_holds_through_edits() {
    let mut curve = NormalCurve::new();
    curve.add_curve(dvec2(0.2, 0.0), &view());
    curve.validate().unwrap();
    curve.add_curve(dvec2(0.7, 0.0), &view());
    curve.validate().unwrap();
    curve.replace_curve(1, SegmentKind::Elastic);
    curve.validate().unwrap();
    curve.point_move(1, dvec2(0.1, 0.8));
    curve.validate().unwrap();
    curve.reverse();
    curve.validate().unwrap();
    curve.delete_curve(curve.boundaries()[1], 8.0, &view());
    curve.validate().unwrap();
    assert_eq!(curve.len(), 2);
}

#[test]
fn test_endpoint_values_are_exact() {
    let curve = mixed_curve();
    assert_eq!(curve.get_value(0.0, 3.0, 7.0), 3.0);
    assert_eq!(curve.get_value(1.0, 3.0, 7.0), 7.0);
    assert_eq!(curve.get_value(-5.0, 3.0, 7.0), 3.0);
    assert_eq!(curve.get_value(5.0, 3.0, 7.0), 7.0);
}

#[test]
fn test_reverse_runs_backwards() {
    let original = mixed_curve();
    let mut reversed = original.clone();
    reversed.reverse();
    assert_eq!(reversed.segments()[0].kind(), SegmentKind::Bounce);
    assert_eq!(reversed.segments()[3].kind(), SegmentKind::Linear);
    for i in 0..=40 {
        let p = i as f64 / 40.0;
        assert_abs_diff_eq!(
            reversed.get_value(p, 0.0, 1.0),
            original.get_value(1.0 - p, 0.0, 1.0),
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_reverse_twice_restores_values() {
    let original = mixed_curve();
    let mut twice = original.clone();
    twice.reverse();
    twice.reverse();
    for (a, b) in twice.boundaries().iter().zip(original.boundaries()) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-12);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-12);
    }
    for i in 0..=40 {
        let p = i as f64 / 40.0;
        assert_abs_diff_eq!(
            twice.get_value(p, 0.0, 1.0),
            original.get_value(p, 0.0, 1.0),
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_point_drag() {
    let mut curve = NormalCurve::with_kind(SegmentKind::Linear);
    curve.add_curve(dvec2(0.5, 0.0), &view());
    assert_eq!(curve.point_check_hover(dvec2(0.51, 0.5), 8.0, &view()), Some(1));
    assert_eq!(curve.point_update(dvec2(0.3, 0.9)), Some(1));
    assert_eq!(curve.boundaries()[1], dvec2(0.3, 0.9));
    assert_eq!(curve.segments()[0].point_end(), curve.segments()[1].point_start());

    curve.point_end_move();
    assert_eq!(curve.active_point(), None);
    assert_eq!(curve.point_update(dvec2(0.4, 0.1)), None);
    assert_eq!(curve.point_check_hover(dvec2(0.7, 0.1), 8.0, &view()), None);
}

#[test]
fn test_point_begin_move_without_hover() {
    let mut curve = NormalCurve::with_kind(SegmentKind::Linear);
    curve.add_curve(dvec2(0.5, 0.0), &view());

    assert!(!curve.point_begin_move(3));
    assert_eq!(curve.active_point(), None);

    assert!(curve.point_begin_move(1));
    assert_eq!(curve.active_point(), Some(1));
    assert_eq!(curve.point_update(dvec2(0.6, 0.2)), Some(1));
    assert_eq!(curve.boundaries()[1], dvec2(0.6, 0.2));
    curve.validate().unwrap();

    curve.point_end_move();
    assert_eq!(curve.point_update(dvec2(0.3, 0.3)), None);
    assert_eq!(curve.boundaries()[1], dvec2(0.6, 0.2));
}

#[test]
fn test_aligned_handle_mirrors_drag() {
    let config = EditorConfig::default();
    let mut curve = NormalCurve::new();
    curve.add_curve(dvec2(0.5, 0.0), &view());

    let dragged = HandleAddress::new(1, HandlePosition::Left);
    let tip = curve.handle_tip(dragged).unwrap();
    let partner_before = curve.segments()[0]
        .bezier_handle(HandleSide::Right)
        .unwrap()
        .offset();

    assert!(curve.handle_check_hover(tip, 8.0, &view(), KeyState::NONE, &config));
    assert_eq!(curve.active_handle(), Some(dragged));
    assert!(curve.handle_update(dvec2(0.6, 0.8), &view(), KeyState::NONE, &config));

    let offset = curve.segments()[1]
        .bezier_handle(HandleSide::Left)
        .unwrap()
        .offset();
    let partner = curve.segments()[0].bezier_handle(HandleSide::Right).unwrap();
    assert!(partner.is_locked_length());
    let mirrored = partner.offset();
    assert_abs_diff_eq!(offset.x, 0.1, epsilon = 1e-12);
    assert_abs_diff_eq!(offset.y, 0.3, epsilon = 1e-12);
    assert_abs_diff_eq!(mirrored.perp_dot(offset), 0.0, epsilon = 1e-9);
    assert!(mirrored.dot(offset) < 0.0);
    assert_abs_diff_eq!(mirrored.length(), partner_before.length(), epsilon = 1e-9);

    curve.handle_end_control();
    assert_eq!(curve.active_handle(), None);
    let partner = curve.segments()[0].bezier_handle(HandleSide::Right).unwrap();
    assert!(!partner.is_locked_length());
}

#[test]
fn test_unaligned_handle_moves_alone() {
    let config = EditorConfig {
        align_handle: false,
        ..EditorConfig::default()
    };
    let mut curve = NormalCurve::new();
    curve.add_curve(dvec2(0.5, 0.0), &view());
    let before = curve.segments()[0].clone();

    let tip = curve.handle_tip(HandleAddress::new(1, HandlePosition::Left)).unwrap();
    assert!(curve.handle_check_hover(tip, 8.0, &view(), KeyState::NONE, &config));
    assert!(curve.handle_update(dvec2(0.6, 0.8), &view(), KeyState::NONE, &config));
    assert_eq!(curve.segments()[0], before);
}

#[test]
fn test_handle_miss_does_nothing() {
    let config = EditorConfig::default();
    let mut curve = NormalCurve::new();
    assert!(!curve.handle_check_hover(dvec2(0.5, 0.9), 8.0, &view(), KeyState::NONE, &config));
    assert!(!curve.handle_update(dvec2(0.6, 0.8), &view(), KeyState::NONE, &config));
    assert_eq!(curve.active_handle(), None);
}

#[test]
fn test_adjust_handle_angle_follows_neighbour() {
    let mut curve = NormalCurve::with_kind(SegmentKind::Linear);
    curve.add_curve(dvec2(0.5, 0.0), &view());
    curve.replace_curve(1, SegmentKind::Bezier);

    let address = HandleAddress::new(1, HandlePosition::Left);
    assert!(curve.set_handle_position(address, dvec2(0.6, 0.9)));
    let length = curve.segments()[1]
        .bezier_handle(HandleSide::Left)
        .unwrap()
        .offset()
        .length();

    assert!(curve.adjust_handle_angle(address, &view()));
    let offset = curve.segments()[1]
        .bezier_handle(HandleSide::Left)
        .unwrap()
        .offset();
    assert_abs_diff_eq!(offset.x, offset.y, epsilon = 1e-6);
    assert_abs_diff_eq!(offset.length(), length, epsilon = 1e-6);

    // no neighbour on the far left
    assert!(!curve.adjust_handle_angle(HandleAddress::new(0, HandlePosition::Left), &view()));
}

#[test]
fn test_move_handle_to_root() {
    let mut curve = NormalCurve::new();
    let address = HandleAddress::new(0, HandlePosition::Right);
    assert!(curve.move_handle_to_root(address));
    assert_eq!(curve.handle_tip(address), Some(dvec2(1.0, 1.0)));
    assert!(!curve.move_handle_to_root(HandleAddress::new(3, HandlePosition::Left)));
}

#[test]
fn test_parameter_handle_keeps_endpoints() {
    let mut curve = mixed_curve();
    let elastic = HandleAddress::new(2, HandlePosition::Center);
    let frame = curve.segments()[2].frame();
    let before = curve.get_value(0.6, 0.0, 1.0);
    assert!(curve.set_handle_position(elastic, dvec2(0.6, frame.end.y + 0.2)));
    assert_ne!(curve.get_value(0.6, 0.0, 1.0), before);
    let segment = &curve.segments()[2];
    assert_eq!(segment.value_at(frame.start.x), frame.start.y);
    assert_eq!(segment.value_at(frame.end.x), frame.end.y);
    let linear = HandleAddress::new(0, HandlePosition::Center);
    assert!(!curve.set_handle_position(linear, dvec2(0.1, 0.1)));
}

#[test]
fn test_draw_handles() {
    let curve = NormalCurve::new();
    let mut graphics = RecordingGraphics::new();
    curve.draw_handle(&mut graphics, &view(), &HandleStyle::default());
    assert_eq!(graphics.lines().count(), 2);
    assert_eq!(graphics.commands.len(), 6);
    let origin = dvec2(0.0, 400.0);
    assert!(graphics
        .commands
        .iter()
        .any(|c| matches!(c, DrawCommand::FillCircle { center, .. } if *center == origin)));

    let linear = NormalCurve::with_kind(SegmentKind::Linear);
    let mut graphics = RecordingGraphics::new();
    linear.draw_handle(&mut graphics, &view(), &HandleStyle::default());
    assert!(graphics.commands.is_empty());
}

#[test]
fn test_hidden_handles_draw_nothing() {
    let config = EditorConfig {
        show_handle: false,
        ..EditorConfig::default()
    };
    let style = HandleStyle::from_config(&config, ColorF::WHITE);
    assert!(!style.visible);

    let curve = mixed_curve();
    let mut graphics = RecordingGraphics::new();
    curve.draw_handle(&mut graphics, &view(), &style);
    assert!(graphics.commands.is_empty());

    curve.draw_handle(&mut graphics, &view(), &HandleStyle::default());
    assert!(!graphics.commands.is_empty());
}

#[test]
fn test_json_roundtrip_relinks() {
    let curve = mixed_curve();
    let json = serde_json::to_string(&curve).unwrap();
    let back: NormalCurve = serde_json::from_str(&json).unwrap();
    assert_eq!(back, curve);
    assert_eq!(back.segments()[2].prev(), Some(1));

    let broken = r#"[{"point_start":[0.0,0.0],"point_end":[0.5,0.5],"shape":{"Linear":null}}]"#;
    assert!(serde_json::from_str::<NormalCurve>(broken).is_err());
}
