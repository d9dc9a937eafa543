//! Rendering against the scene descriptions shipped in demos/

use std::path::PathBuf;

use custom_info::{load, InfoConfig, InfoEngine, LoadError, SceneFile};
use pretty_assertions::assert_eq;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name)
}

#[test]
fn test_demo_level_renders_configured_template() {
    let (world, config) = load(&demo("level.toml"), Some(&demo("config.toml"))).unwrap();
    let mut engine = InfoEngine::new(config, &world);

    insta::assert_snapshot!(engine.get_info(&world, None), @r"
    Pos: (12.35, -6.70)
    Speed: (90.00, -30.00) ((1.50, -0.50) px/f)
    Stamina: 110.00
    DashCD: 12
    Theo: (40.50, -16.00)
    Spinners:
    [3:12] (64.00, -24.00)
    [3:13] (80.00, -24.00)
    Room: Session.Level=3a-02 Deaths: 4
    ");
}

#[test]
fn test_demo_level_queries() {
    let (world, _) = load(&demo("level.toml"), None).unwrap();
    let mut engine = InfoEngine::new(InfoConfig::default(), &world);

    assert_eq!(engine.run_query(&world, "Player.MaxFall"), "160.00");
    assert_eq!(
        engine.run_query(&world, "CrystalStaticSpinner[3:12].Collider"),
        "ColliderList: {Circle=radius 6; Hitbox=[-8,8]×[-3,1]}"
    );
    assert_eq!(engine.run_query(&world, "Player.Stamina="), "Player.Stamina=110.00");
}

#[test]
fn test_methods_disabled_from_scene_file() {
    let world = SceneFile::from_str(
        r#"
        methods_disabled = true

        [[types]]
        name = "Celeste.Level"
        module = "Celeste"

        [scene]
        type = "Celeste.Level"
    "#,
    )
    .unwrap()
    .into_world()
    .unwrap();
    let mut engine = InfoEngine::new(InfoConfig::default(), &world);

    assert_eq!(
        engine.run_query(&world, "Vector2.Zero.Length()"),
        "Length(): Calling methods is illegal when tas is running."
    );
    assert_eq!(engine.run_query(&world, "Vector2.One"), "(1.00, 1.00)");
}

#[test]
fn test_bad_config_is_reported() {
    let err = load(&demo("level.toml"), Some(&demo("missing.toml"))).unwrap_err();
    assert!(matches!(err, LoadError::Config(_)));
}
