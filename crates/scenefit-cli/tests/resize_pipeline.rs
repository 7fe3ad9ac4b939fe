//! End-to-end command tests over the mock seams: settings written by
//! `configure` feed the resize pipeline, and the documented scenarios hold
//! through the whole stack (classification, reconciliation, display
//! resolution, placement, notification policy).

use std::path::PathBuf;

use scenefit_cli::application::configure;
use scenefit_cli::application::resize::{ResizeError, ResizeOutcome, ResizeUseCase};
use scenefit_cli::infrastructure::automation::{FrontmostWindow, MockAutomation};
use scenefit_cli::infrastructure::notify::MockNotifier;
use scenefit_cli::infrastructure::obs::MockSceneSource;
use scenefit_cli::infrastructure::storage::{PaddingSettings, Settings};
use scenefit_core::{
    DisplayFrame, Padding, SceneItem, SceneItemTransform, WindowGeometry,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn scene_item(
    name: &str,
    kind: &str,
    enabled: bool,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> SceneItem {
    SceneItem {
        name: name.to_string(),
        kind: Some(kind.to_string()),
        enabled,
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

fn screen() -> SceneItem {
    scene_item("Display", "screen_capture", true, 0.0, 0.0, 1000.0, 600.0)
}

fn corner_camera() -> SceneItem {
    scene_item(
        "FaceTime HD",
        "av_capture_input_v2",
        true,
        0.0,
        0.0,
        200.0,
        200.0,
    )
}

fn temp_settings_path(tag: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("scenefit_pipeline_{tag}_{}", std::process::id()))
        .join("config.toml")
}

// ── configure feeds resize ────────────────────────────────────────────────────

#[tokio::test]
async fn padding_written_by_configure_shifts_the_placed_window() {
    let path = temp_settings_path("configure_feeds_resize");
    let notifier = MockNotifier::new();

    configure::run(&path, PaddingSettings { x: 10.0, y: 0.0 }, &notifier).unwrap();
    assert_eq!(notifier.successes(), ["Configuration saved"]);

    let settings = Settings::load_from(&path).unwrap();
    let padding = Padding {
        x: settings.padding.x,
        y: settings.padding.y,
    };

    let mut scene = MockSceneSource::with_items(vec![screen(), corner_camera()]);
    let automation = MockAutomation::single_display();
    let mut use_case = ResizeUseCase::new(&mut scene, &automation, &notifier, padding);
    use_case.run().await.unwrap();

    // Trim to 200, pad the moved edge to 210; the right edge is untouched.
    let applied = automation.applied();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].1.x, 210.0);
    assert_eq!(applied[0].1.width, 790.0);

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

// ── Documented scenarios through the whole stack ──────────────────────────────

#[tokio::test]
async fn unobstructed_share_fills_the_whole_mapped_region() {
    let mut scene = MockSceneSource::with_items(vec![screen()]);
    let automation = MockAutomation::single_display();
    let notifier = MockNotifier::new();
    let mut use_case = ResizeUseCase::new(
        &mut scene,
        &automation,
        &notifier,
        Padding { x: 15.0, y: 15.0 },
    );

    let outcome = use_case.run().await.unwrap();

    let applied = automation.applied();
    assert_eq!(applied[0].1.x, 0.0);
    assert_eq!(applied[0].1.y, 0.0);
    assert_eq!(applied[0].1.width, 1000.0);
    assert_eq!(applied[0].1.height, 600.0);
    assert!(matches!(outcome, ResizeOutcome::Applied(_)));
}

#[tokio::test]
async fn disabled_cameras_do_not_trim() {
    let mut disabled = corner_camera();
    disabled.enabled = false;
    let mut scene = MockSceneSource::with_items(vec![screen(), disabled]);
    let automation = MockAutomation::single_display();
    let notifier = MockNotifier::new();
    let mut use_case = ResizeUseCase::new(&mut scene, &automation, &notifier, Padding::default());

    use_case.run().await.unwrap();

    assert_eq!(automation.applied()[0].1.width, 1000.0);
}

#[tokio::test]
async fn marker_named_sources_participate_like_kind_tagged_ones() {
    // A capture-card feed named with the markers instead of the native kinds.
    let screen = scene_item("capture #screen# hdmi", "ndi_source", true, 0.0, 0.0, 1000.0, 600.0);
    let camera = scene_item("guest #cam#", "ndi_source", true, 800.0, 0.0, 200.0, 200.0);
    let mut scene = MockSceneSource::with_items(vec![screen, camera]);
    let automation = MockAutomation::single_display();
    let notifier = MockNotifier::new();
    let mut use_case = ResizeUseCase::new(&mut scene, &automation, &notifier, Padding::default());

    use_case.run().await.unwrap();

    // Right-side camera: the right edge retreats to the camera's left edge.
    let applied = automation.applied();
    assert_eq!(applied[0].1.x, 0.0);
    assert_eq!(applied[0].1.width, 800.0);
}

#[tokio::test]
async fn scaled_screen_on_larger_display_uses_the_real_scale() {
    // The screen source is a 2000x1200 capture scaled to 1000x600 on the
    // canvas (scale 0.5); the window sits on a 2000x1200 display, so the
    // real scale is 0.5 * 2000 / 2000 = 0.5 per axis and canvas distances
    // double on the way to physical pixels.
    let screen = SceneItem {
        name: "Display".to_string(),
        kind: Some("screen_capture".to_string()),
        enabled: true,
        transform: SceneItemTransform {
            position_x: 0.0,
            position_y: 0.0,
            width: 1000.0,
            height: 600.0,
            scale_x: 0.5,
            scale_y: 0.5,
            source_width: 2000.0,
            source_height: 1200.0,
        },
    };
    let mut scene = MockSceneSource::with_items(vec![screen, corner_camera()]);
    let automation = MockAutomation::single_display()
        .with_window(FrontmostWindow {
            app_name: "TestApp".to_string(),
            geometry: WindowGeometry {
                x: 0.0,
                y: 0.0,
                width: 2000.0,
                height: 1200.0,
            },
        })
        .with_displays(vec![DisplayFrame {
            x: 0.0,
            y: 0.0,
            width: 2000.0,
            height: 1200.0,
        }]);
    let notifier = MockNotifier::new();
    let mut use_case = ResizeUseCase::new(&mut scene, &automation, &notifier, Padding::default());

    use_case.run().await.unwrap();

    let applied = automation.applied();
    // Canvas trim to x=200 maps to 400 physical pixels; canvas width 800
    // maps to 1600.
    assert_eq!(applied[0].1.x, 400.0);
    assert_eq!(applied[0].1.width, 1600.0);
    assert_eq!(applied[0].1.height, 1200.0);
}

#[tokio::test]
async fn window_on_secondary_display_resolves_that_display() {
    let mut scene = MockSceneSource::with_items(vec![screen(), corner_camera()]);
    let automation = MockAutomation::single_display()
        .with_window(FrontmostWindow {
            app_name: "TestApp".to_string(),
            geometry: WindowGeometry {
                x: 2100.0,
                y: 100.0,
                width: 1000.0,
                height: 600.0,
            },
        })
        .with_displays(vec![
            DisplayFrame {
                x: 0.0,
                y: 0.0,
                width: 2000.0,
                height: 1200.0,
            },
            DisplayFrame {
                x: 2000.0,
                y: 0.0,
                width: 1000.0,
                height: 600.0,
            },
        ]);
    let notifier = MockNotifier::new();
    let mut use_case = ResizeUseCase::new(&mut scene, &automation, &notifier, Padding::default());

    use_case.run().await.unwrap();

    // The secondary display matches the source exactly, so the real scale is
    // 1 and the trim shifts the window by 200 from its current origin.
    let applied = automation.applied();
    assert_eq!(applied[0].1.x, 2300.0);
    assert_eq!(applied[0].1.width, 800.0);
}

// ── Abort-path notifications ──────────────────────────────────────────────────

#[tokio::test]
async fn camera_only_scene_notifies_and_moves_nothing() {
    let mut scene = MockSceneSource::with_items(vec![corner_camera()]);
    let automation = MockAutomation::single_display();
    let notifier = MockNotifier::new();
    let mut use_case = ResizeUseCase::new(&mut scene, &automation, &notifier, Padding::default());

    let result = use_case.run().await;

    assert!(matches!(result, Err(ResizeError::NoScreenSource)));
    assert!(automation.applied().is_empty());
    assert!(notifier.successes().is_empty());
    assert_eq!(notifier.failures(), ["No screen share found"]);
}
