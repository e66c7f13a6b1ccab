//! Drives the two-arm scene the way the frame driver does

use ik_core::{ChainStatus, DVec2, IkConfig, Scene};

fn run_until_settled(scene: &mut Scene, max_frames: u32) -> u32 {
    for frame in 0..max_frames {
        if scene.is_settled() {
            return frame;
        }
        scene.frame();
    }
    panic!("scene did not settle within {} frames", max_frames);
}

fn small_scene() -> Scene {
    // Short links keep the Jacobian steps well inside the tolerance box
    let config = IkConfig::load_from_str(
        "(scene: (width: 400.0, height: 200.0, segments_per_chain: 3, link_length: Some(20.0)))",
    )
    .unwrap();
    Scene::new(&config).unwrap()
}

#[test]
fn both_chains_reach_reachable_click() {
    let mut scene = small_scene();

    // Left anchor sits at (100, 100); this click is reachable from both anchors
    scene.click(DVec2::new(130.0, 130.0));
    run_until_settled(&mut scene, 10_000);

    // The frame that settled the scene already reports the final statuses
    let frame = scene.snapshot();
    for chain in [&frame.left, &frame.right] {
        assert_eq!(chain.status, ChainStatus::Idle);
        let err = (chain.end_effector - chain.goal).abs();
        assert!(err.x <= 5.0 && err.y <= 5.0, "{:?} missed {:?}", chain.end_effector, chain.goal);
    }
}

#[test]
fn unreachable_click_stalls_then_recovers() {
    let mut scene = small_scene();

    // Far above both anchors: 60 units of chain cannot get there
    scene.click(DVec2::new(100.0, -300.0));
    run_until_settled(&mut scene, 20_000);
    assert_eq!(scene.left().status(), ChainStatus::Stalled);
    assert!(scene.left().end_effector().distance(scene.left().anchor()) <= 60.0 + 1e-6);

    // A new click must not be swallowed by the old stall
    scene.click(DVec2::new(120.0, 110.0));
    assert!(!scene.is_settled());
    scene.frame();
    assert_eq!(scene.left().status(), ChainStatus::Stepping);

    run_until_settled(&mut scene, 10_000);
    assert_eq!(scene.left().status(), ChainStatus::Idle);
}

#[test]
fn frame_serializes_for_renderer() {
    let mut scene = small_scene();
    scene.click(DVec2::new(300.0, 120.0));
    let frame = scene.frame();

    assert_eq!(frame.index, 1);
    assert_eq!(frame.left.lines.len(), 3);
    assert_eq!(frame.right.lines.len(), 3);
    assert_eq!(frame.left.lines[0].start, scene.left().anchor());
    assert_eq!(frame.right.lines[2].end, frame.right.end_effector);
}

#[test]
fn bundled_scene_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/scenes/two_arms.ron");
    let config = IkConfig::load(path).unwrap();
    assert_eq!(config.scene.segments_per_chain, 3);
    assert_eq!(config.scene.link_length(), config.scene.height / 8.0);
    assert_eq!(config.script.len(), 3);

    let scene = Scene::new(&config).unwrap();
    assert!(scene.is_settled());
}
