//! Integration tests for template rendering

use custom_info::host::{Collider, Object, ObjectRef, TypeBuilder, TypeKind, Value, Vector2};
use custom_info::template::EntityCache;
use custom_info::{InfoConfig, InfoEngine, World};
use pretty_assertions::assert_eq;

struct Fixture {
    world: World,
    spinners: Vec<ObjectRef>,
}

fn fixture() -> Fixture {
    let mut world = World::new();

    let entity = TypeBuilder::new("Monocle.Entity", "Celeste")
        .kind(TypeKind::Entity)
        .field("Position")
        .field("Collider")
        .build();
    let actor = TypeBuilder::new("Celeste.Actor", "Celeste")
        .extends(&entity)
        .getter("ExactPosition", |v| match v.as_object() {
            Some(obj) => obj.get("Position"),
            None => Value::Null,
        })
        .build();
    let player = TypeBuilder::new("Celeste.Player", "Celeste")
        .extends(&actor)
        .field("Speed")
        .field("Holding")
        .field("AutoJump")
        .field("dashCooldownTimer")
        .static_field("MaxRun", Value::Float(90.0))
        .method("CanDash", 0, |_| Value::Bool(true))
        .void_method("Die", 0)
        .build();
    let theo = TypeBuilder::new("Celeste.TheoCrystal", "Celeste")
        .extends(&actor)
        .build();
    let spinner = TypeBuilder::new("Celeste.CrystalStaticSpinner", "Celeste")
        .extends(&entity)
        .build();
    let level = TypeBuilder::new("Celeste.Level", "Celeste")
        .field("Wind")
        .field("Entities")
        .build();
    let session = TypeBuilder::new("Celeste.Session", "Celeste")
        .field("Deaths")
        .build();
    let settings = TypeBuilder::new("Celeste.Settings", "Celeste")
        .static_field("Version", Value::Int(1))
        .build();
    let variant_settings = TypeBuilder::new("ExtendedVariants.Settings", "ExtendedVariantMode")
        .static_field("Version", Value::Int(2))
        .build();

    for ty in [
        &entity,
        &actor,
        &player,
        &theo,
        &spinner,
        &level,
        &session,
        &settings,
        &variant_settings,
    ] {
        world.register_type(ty);
    }
    world.track(&player);

    let madeline = world.spawn(
        Object::new(&player)
            .with("Position", Vector2::new(12.0, -7.0))
            .with("MovementCounter", Vector2::new(0.345, 0.3))
            .with("Speed", Vector2::new(90.0, -30.0))
            .with("AutoJump", false)
            .with("dashCooldownTimer", 0.2f32)
            .with("Collider", Collider::hitbox(8.0, 11.0, -4.0, -11.0)),
    );
    world.spawn(
        Object::new(&theo)
            .with_stable_id("3:7")
            .with("Position", Vector2::new(40.0, -16.0))
            .with("MovementCounter", Vector2::new(0.5, 0.0)),
    );
    let spinners: Vec<ObjectRef> = [("3:12", 64.0), ("3:13", 80.0), ("3:14", 96.0)]
        .into_iter()
        .map(|(id, x)| {
            world.spawn(
                Object::new(&spinner)
                    .with_stable_id(id)
                    .with("Position", Vector2::new(x, -24.0)),
            )
        })
        .collect();

    let mut entities: Vec<Value> = spinners.iter().cloned().map(Value::Object).collect();
    entities.push(Value::Object(madeline));
    world.set_scene(Some(
        Object::new(&level)
            .with("Wind", Vector2::ZERO)
            .with("Entities", Value::List(entities))
            .into_ref(),
    ));
    world.set_session(Some(Object::new(&session).with("Deaths", 4i64).into_ref()));

    Fixture { world, spinners }
}

fn render(world: &World, template: &str) -> String {
    let mut engine = InfoEngine::new(InfoConfig::default(), world);
    let mut cache = EntityCache::new();
    engine.render_template(world, template, 2, &mut cache, false)
}

#[test]
fn test_template_without_expressions_is_unchanged() {
    let f = fixture();
    assert_eq!(render(&f.world, "Hello, world {}"), "Hello, world {}");
}

#[test]
fn test_instance_member() {
    let f = fixture();
    assert_eq!(render(&f.world, "Speed: {Player.Speed}"), "Speed: (90.00, -30.00)");
}

#[test]
fn test_colon_and_equals_annotations() {
    let f = fixture();
    assert_eq!(
        render(&f.world, "{Player.Speed:}"),
        "Player.Speed: (90.00, -30.00)"
    );
    assert_eq!(render(&f.world, "{Session.Deaths=}"), "Session.Deaths=4");
}

#[test]
fn test_missing_member_and_unknown_type() {
    let f = fixture();
    assert_eq!(render(&f.world, "[{Player}]"), "[missing member]");
    assert_eq!(render(&f.world, "{Nobody.X}"), "Nobody not found");
    assert_eq!(render(&f.world, "{Play er.X}"), "parsing type name failed");
    assert_eq!(
        render(&f.world, "{Player.Nope}"),
        "Celeste.Player.Nope member not found"
    );
}

#[test]
fn test_static_member_with_and_without_scene() {
    let mut f = fixture();
    assert_eq!(render(&f.world, "{Player.MaxRun}"), "90.00");

    f.world.set_scene(None);
    assert_eq!(render(&f.world, "{Player.MaxRun}"), "90.00");
    assert_eq!(
        render(&f.world, "{Player.Speed}"),
        "Instance of Celeste.Player not found"
    );
    assert_eq!(
        render(&f.world, "{Level.Wind}"),
        "Instance of Celeste.Level not found"
    );
}

#[test]
fn test_ambiguous_type_joins_with_space() {
    let f = fixture();
    assert_eq!(render(&f.world, "{Settings.Version}"), "1 2");
    assert_eq!(
        render(&f.world, "{Settings@ExtendedVariantMode.Version}"),
        "2"
    );
}

#[test]
fn test_null_short_circuits_to_empty() {
    let f = fixture();
    assert_eq!(render(&f.world, "a{Player.Holding.Position.X}b"), "ab");
}

#[test]
fn test_multiple_entities_get_id_prefixes() {
    let f = fixture();
    let text = render(&f.world, "Spinners:{CrystalStaticSpinner.Position}");
    insta::assert_snapshot!(text, @r"
    Spinners:
    [3:12] (64.00, -24.00)
    [3:13] (80.00, -24.00)
    [3:14] (96.00, -24.00)
    ");
}

#[test]
fn test_entity_id_filter() {
    let f = fixture();
    assert_eq!(
        render(&f.world, "{CrystalStaticSpinner[3:13].Position}"),
        "(80.00, -24.00)"
    );
    assert_eq!(render(&f.world, "{CrystalStaticSpinner[9:9].Position}"), "");
}

#[test]
fn test_compressed_entity_list() {
    let f = fixture();
    assert_eq!(
        render(&f.world, "{Level.Entities}"),
        "Celeste.CrystalStaticSpinner * 3,\n Celeste.Player"
    );
}

#[test]
fn test_exact_position_override() {
    let f = fixture();
    assert_eq!(render(&f.world, "{Player.ExactPosition}"), "(12.35, -6.70)");
    assert_eq!(render(&f.world, "{Player.Position}"), "(12.00, -7.00)");
}

#[test]
fn test_theo_alias() {
    let f = fixture();
    assert_eq!(render(&f.world, "{Theo.ExactPosition}"), "(40.50, -16.00)");
}

#[test]
fn test_scene_and_session_singletons() {
    let mut f = fixture();
    assert_eq!(
        render(&f.world, "Wind {Level.Wind} Deaths {Session.Deaths}"),
        "Wind (0.00, 0.00) Deaths 4"
    );

    f.world.set_session(None);
    assert_eq!(
        render(&f.world, "{Session.Deaths}"),
        "Instance of Celeste.Session not found"
    );
}

#[test]
fn test_helpers() {
    let f = fixture();
    assert_eq!(render(&f.world, "{Player.dashCooldownTimer.toFrame()}"), "12");
    assert_eq!(
        render(&f.world, "{Player.Speed.toPixelPerFrame()}"),
        "(1.50, -0.50)"
    );
    assert_eq!(render(&f.world, "{Player.Speed.GetAssembly()}"), "FNA");
    assert_eq!(
        render(&f.world, "{Player.AutoJump.toFrame()}"),
        "false,\n not a valid parameter of toFrame()"
    );
}

#[test]
fn test_collider() {
    let f = fixture();
    assert_eq!(render(&f.world, "{Player.Collider}"), "Hitbox=[-4,4]×[-11,0]");
}

#[test]
fn test_method_calls_and_policy() {
    let mut f = fixture();
    assert_eq!(render(&f.world, "{Player.CanDash()}"), "true");
    assert_eq!(
        render(&f.world, "{Player.Die()}"),
        "Die(): Method return void is not supported"
    );

    f.world.set_methods_disabled(true);
    assert_eq!(
        render(&f.world, "{Player.CanDash()}"),
        "CanDash(): Calling methods is illegal when tas is running."
    );
    // Fields and getters stay readable
    assert_eq!(render(&f.world, "{Player.Speed.X}"), "90.00");
}

#[test]
fn test_run_query_trims_leading_separator() {
    let f = fixture();
    let mut engine = InfoEngine::new(InfoConfig::default(), &f.world);
    let text = engine.run_query(&f.world, "CrystalStaticSpinner.Position");
    assert_eq!(
        text,
        "[3:12] (64.00, -24.00)\n[3:13] (80.00, -24.00)\n[3:14] (96.00, -24.00)"
    );
}

#[test]
fn test_entity_cache_lives_for_one_pass() {
    let mut f = fixture();
    let mut engine = InfoEngine::new(InfoConfig::default(), &f.world);
    let mut cache = EntityCache::new();
    let template = "{CrystalStaticSpinner[3:12].Position}";
    assert_eq!(
        engine.render_template(&f.world, template, 2, &mut cache, false),
        "(64.00, -24.00)"
    );

    let despawned = f.spinners[0].clone();
    f.world.despawn(&despawned);
    // Same pass, same answer
    assert_eq!(
        engine.render_template(&f.world, template, 2, &mut cache, false),
        "(64.00, -24.00)"
    );
    let mut fresh = EntityCache::new();
    assert_eq!(engine.render_template(&f.world, template, 2, &mut fresh, false), "");
}

#[test]
fn test_rebuild_picks_up_new_types() {
    let mut f = fixture();
    let mut engine = InfoEngine::new(InfoConfig::default(), &f.world);
    assert_eq!(engine.run_query(&f.world, "Booster.Count"), "Booster not found");

    let booster = TypeBuilder::new("Celeste.Booster", "Celeste")
        .static_field("Count", Value::Int(0))
        .build();
    f.world.register_type(&booster);
    // Resolution results stay cached until the registry is rebuilt
    assert_eq!(engine.run_query(&f.world, "Booster.Count"), "Booster not found");

    engine.rebuild(&f.world);
    assert_eq!(engine.run_query(&f.world, "Booster.Count"), "0");
}

#[test]
fn test_decimals_override() {
    let f = fixture();
    let config = InfoConfig::default().with_template("{Player.ExactPosition}");
    let mut engine = InfoEngine::new(config, &f.world);
    assert_eq!(engine.get_info(&f.world, Some(3)), "(12.345, -6.700)");
}

#[test]
fn test_position_rounds_to_two_decimals() {
    let mut world = World::new();
    let player = TypeBuilder::new("Celeste.Player", "Celeste")
        .kind(TypeKind::Entity)
        .field("Position")
        .build();
    let level = TypeBuilder::new("Celeste.Level", "Celeste").build();
    world.register_type(&player);
    world.register_type(&level);
    world.spawn(Object::new(&player).with("Position", Vector2::new(12.345, -6.7)));
    world.set_scene(Some(Object::new(&level).into_ref()));

    assert_eq!(render(&world, "{Player.Position}"), "(12.35, -6.70)");
}

#[test]
fn test_collider_members_and_assembly() {
    let f = fixture();
    assert_eq!(render(&f.world, "{Player.Collider.GetAssembly()}"), "Celeste");
    assert_eq!(render(&f.world, "{Player.Collider.Width}"), "8.00");
    assert_eq!(
        render(&f.world, "{Player.Collider.Nope}"),
        "Monocle.Hitbox.Nope member not found"
    );
}

#[test]
fn test_prefix_counts_instances_across_types() {
    let mut world = World::new();
    let level = TypeBuilder::new("Celeste.Level", "Celeste").build();
    world.register_type(&level);
    for (name, module, id, x) in [
        ("Celeste.Spring", "Celeste", "1", 1.0),
        ("Mod.Spring", "Mod", "2", 2.0),
    ] {
        let spring = TypeBuilder::new(name, module)
            .kind(TypeKind::Entity)
            .field("Position")
            .build();
        world.register_type(&spring);
        world.spawn(
            Object::new(&spring)
                .with_stable_id(id)
                .with("Position", Vector2::new(x, x)),
        );
    }
    world.set_scene(Some(Object::new(&level).into_ref()));

    assert_eq!(
        render(&world, "{Spring.Position}"),
        "\n[1] (1.00, 1.00)\n[2] (2.00, 2.00)"
    );
    assert_eq!(render(&world, "{Spring@Mod.Position}"), "(2.00, 2.00)");
}

#[test]
fn test_static_getter_and_method_with_and_without_scene() {
    let mut f = fixture();
    let stats = TypeBuilder::new("Celeste.SaveData", "Celeste")
        .static_getter("TotalDeaths", || Value::Int(7))
        .static_method("CountBerries", 0, || Value::Int(7))
        .build();
    f.world.register_type(&stats);

    let template = "{SaveData.TotalDeaths} {SaveData.get_TotalDeaths()} {SaveData.CountBerries()}";
    assert_eq!(render(&f.world, template), "7 7 7");

    f.world.set_scene(None);
    assert_eq!(render(&f.world, template), "7 7 7");
}
