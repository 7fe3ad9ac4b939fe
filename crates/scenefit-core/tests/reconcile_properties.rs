//! Behavioural properties of the reconciliation pipeline, exercised through
//! the crate's public API exactly as the application consumes it: classify
//! the scene, reconcile the rectangle, resolve the display, and compute the
//! placement target.
//!
//! These tests pin down the externally observable contract:
//!
//! - a scene without an enabled screen source aborts classification;
//! - cameras that do not overlap leave the rectangle untouched and unpadded;
//! - padding applies only to edges moved by trimming;
//! - the canvas → source-local transform rounds toward positive infinity
//!   and survives the inverse mapping within one rounding unit;
//! - the full concrete scenario from the tool's documentation.

use scenefit_core::{
    classify, placement_target, reconcile, resolve_display, DisplayFrame, Padding, RealScale,
    Rect, SceneError, SceneItem, SceneItemTransform, WindowGeometry,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn screen_transform() -> SceneItemTransform {
    SceneItemTransform {
        position_x: 0.0,
        position_y: 0.0,
        width: 1000.0,
        height: 600.0,
        scale_x: 1.0,
        scale_y: 1.0,
        source_width: 1000.0,
        source_height: 600.0,
    }
}

fn screen_item() -> SceneItem {
    SceneItem {
        name: "Display".to_string(),
        kind: Some("screen_capture".to_string()),
        enabled: true,
        transform: screen_transform(),
    }
}

fn camera_item(x: f64, y: f64, width: f64, height: f64) -> SceneItem {
    SceneItem {
        name: "FaceTime HD".to_string(),
        kind: Some("av_capture_input_v2".to_string()),
        enabled: true,
        transform: SceneItemTransform {
            position_x: x,
            position_y: y,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            source_width: width,
            source_height: height,
        },
    }
}

/// Runs classification and reconciliation the way the resize pipeline does.
fn run_reconcile(items: Vec<SceneItem>, padding: Padding) -> scenefit_core::VisibleRegion {
    let partition = classify(items).expect("scene must contain a screen source");
    let cameras: Vec<Rect> = partition
        .cameras
        .iter()
        .map(|c| c.transform.canvas_rect())
        .collect();
    reconcile(&partition.screen.transform, &cameras, padding).expect("region must not collapse")
}

// ── Classification aborts ─────────────────────────────────────────────────────

#[test]
fn scene_with_no_enabled_screen_aborts_before_any_geometry() {
    let mut disabled = screen_item();
    disabled.enabled = false;
    let items = vec![disabled, camera_item(0.0, 0.0, 200.0, 200.0)];

    assert_eq!(classify(items), Err(SceneError::NoScreenSource));
}

// ── Non-overlap identity ──────────────────────────────────────────────────────

#[test]
fn cameras_outside_the_screen_leave_the_rect_identical_and_unpadded() {
    let items = vec![
        screen_item(),
        camera_item(1200.0, 0.0, 200.0, 200.0),   // right of the screen
        camera_item(0.0, -300.0, 200.0, 200.0),   // above the screen
    ];

    let region = run_reconcile(items, Padding { x: 40.0, y: 40.0 });

    assert_eq!(region.canvas, screen_transform().canvas_rect());
    assert!(!region.moved.any());
}

#[test]
fn empty_camera_set_returns_the_screen_rect_unchanged() {
    let region = run_reconcile(vec![screen_item()], Padding { x: 10.0, y: 10.0 });
    assert_eq!(region.canvas, screen_transform().canvas_rect());
    assert_eq!(region.local, screen_transform().canvas_rect());
}

// ── Concrete documented scenario ──────────────────────────────────────────────

#[test]
fn corner_camera_trims_to_its_far_edge() {
    let items = vec![screen_item(), camera_item(0.0, 0.0, 200.0, 200.0)];
    let region = run_reconcile(items, Padding::default());

    assert_eq!(region.canvas.left, 200.0);
    assert_eq!(region.canvas.top, 0.0);
    assert_eq!(region.canvas.right, 1000.0);
    assert_eq!(region.canvas.bottom, 600.0);
}

#[test]
fn corner_camera_with_horizontal_padding_pads_only_the_moved_edge() {
    let items = vec![screen_item(), camera_item(0.0, 0.0, 200.0, 200.0)];
    let region = run_reconcile(items, Padding { x: 10.0, y: 0.0 });

    assert_eq!(region.canvas.left, 210.0);
    // The right edge never moved, so the padding must not touch it.
    assert_eq!(region.canvas.right, 1000.0);
}

#[test]
fn full_pipeline_places_the_window_beside_the_camera() {
    let items = vec![screen_item(), camera_item(0.0, 0.0, 200.0, 200.0)];
    let partition = classify(items).unwrap();
    let cameras: Vec<Rect> = partition
        .cameras
        .iter()
        .map(|c| c.transform.canvas_rect())
        .collect();
    let region = reconcile(&partition.screen.transform, &cameras, Padding::default()).unwrap();

    let displays = [DisplayFrame {
        x: 0.0,
        y: 0.0,
        width: 1000.0,
        height: 600.0,
    }];
    let window = WindowGeometry {
        x: 0.0,
        y: 0.0,
        width: 1000.0,
        height: 600.0,
    };
    let display = resolve_display(window.x, window.y, &displays).unwrap();
    let scale = RealScale::derive(&partition.screen.transform, display);
    let target = placement_target(&window, &region, &partition.screen.transform, &scale);

    assert_eq!(target.x, 200.0);
    assert_eq!(target.y, 0.0);
    assert_eq!(target.width, 800.0);
    assert_eq!(target.height, 600.0);
}

// ── Rounding policy ───────────────────────────────────────────────────────────

#[test]
fn source_local_edges_round_up_never_into_the_occluded_region() {
    // A scale of 0.3 produces fractional local edges; every edge must land on
    // the next whole source pixel, not the previous one.
    let screen = SceneItemTransform {
        position_x: 0.0,
        position_y: 0.0,
        width: 300.0,
        height: 180.0,
        scale_x: 0.3,
        scale_y: 0.3,
        source_width: 1000.0,
        source_height: 600.0,
    };
    let cameras = [Rect::from_origin_size(0.0, 0.0, 100.0, 180.0)];

    let region = reconcile(&screen, &cameras, Padding::default()).unwrap();

    // 100 / 0.3 = 333.33…, rounded toward positive infinity.
    assert_eq!(region.local.left, 334.0);
}

#[test]
fn canvas_to_local_round_trip_stays_within_one_rounding_unit() {
    let screen = SceneItemTransform {
        position_x: 25.0,
        position_y: 10.0,
        width: 960.0,
        height: 540.0,
        scale_x: 0.75,
        scale_y: 0.75,
        source_width: 1280.0,
        source_height: 720.0,
    };
    let cameras = [Rect::from_origin_size(25.0, 10.0, 211.7, 540.0)];

    let region = reconcile(&screen, &cameras, Padding::default()).unwrap();

    // Map the local rect back to canvas space and compare edge by edge.
    let back_left = region.local.left * screen.scale_x + screen.position_x;
    let back_right = region.local.right * screen.scale_x + screen.position_x;

    assert!((back_left - region.canvas.left).abs() <= screen.scale_x);
    assert!((back_right - region.canvas.right).abs() <= screen.scale_x);
    // The ceiling bias only ever moves edges up, never down.
    assert!(back_left >= region.canvas.left);
    assert!(back_right >= region.canvas.right);
}
