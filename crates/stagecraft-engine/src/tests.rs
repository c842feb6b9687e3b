//! Tests for prefab instantiation, registration, systems, and the level lifecycle.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;
use hecs::Entity;

use stagecraft_core::components::*;
use stagecraft_core::enums::*;
use stagecraft_core::events::GameEvent;
use stagecraft_core::prefab::{ComponentData, Prefab};
use stagecraft_core::types::{Color, EntityId};

use crate::config::EngineConfig;
use crate::context::AppContext;
use crate::error::LevelError;
use crate::level::manager::LevelManager;
use crate::level::runner::LevelRunner;
use crate::level::{Capability, Level, LevelScope, LevelState};
use crate::levels::physics_demo::ColorToggle;
use crate::levels::{MainMenuLevel, PhysicsDemoLevel, SpinningCubesLevel};
use crate::physics::{HeadlessPhysics, PhysicsBackend};
use crate::prefabs::{self, BoxConfig, CubeConfig};
use crate::render::{HeadlessRenderer, ObjectKind, RenderBackend};
use crate::systems::registration::{Attach, SceneRegistration};
use crate::timers::TimerId;
use crate::world_ext::{entities_with, entity_id, has_tag, remove_tag};

fn headless_ctx() -> AppContext {
    AppContext::builder()
        .renderer(HeadlessRenderer::new())
        .physics(HeadlessPhysics::new())
        .build()
}

fn renderer(ctx: &AppContext) -> &HeadlessRenderer {
    ctx.renderer_as::<HeadlessRenderer>().unwrap()
}

fn physics(ctx: &AppContext) -> &HeadlessPhysics {
    ctx.physics_as::<HeadlessPhysics>().unwrap()
}

/// Construct, start, and run past the start delay.
fn running(level: Box<dyn Level>, ctx: &mut AppContext) -> LevelRunner {
    let mut runner = LevelRunner::new(level, ctx).unwrap();
    runner.start(ctx).unwrap();
    runner.tick(ctx, 0.2);
    assert_eq!(runner.state(), LevelState::Running);
    runner
}

fn spin_prefab(name: &str) -> Prefab {
    Prefab::new(name)
        .with(ComponentData::Transform(Transform::default()))
        .with(ComponentData::Spin(Spin {
            speed: Vec3::new(1.0, 0.0, 0.0),
        }))
}

// ---- Rotation ----

#[test]
fn test_rotation_advances_by_speed_times_dt() {
    let mut ctx = headless_ctx();
    ctx.register_prefab(spin_prefab("spinner"));
    let entity = ctx.create_entity_from_prefab("spinner").unwrap();

    for _ in 0..10 {
        ctx.update(0.1);
    }

    let t = ctx.world().get::<&Transform>(entity).unwrap();
    assert!((t.rotation.x - 1.0).abs() < 1e-5, "got {}", t.rotation.x);
    assert_eq!(t.rotation.y, 0.0);
    assert_eq!(t.rotation.z, 0.0);
}

#[test]
fn test_rotation_is_not_wrapped() {
    let mut ctx = headless_ctx();
    let entity = ctx.spawn(
        "fast",
        &[
            ComponentData::Transform(Transform::default()),
            ComponentData::Spin(Spin {
                speed: Vec3::new(0.0, 10.0, 0.0),
            }),
        ],
    );
    for _ in 0..10 {
        ctx.update(1.0);
    }
    let t = ctx.world().get::<&Transform>(entity).unwrap();
    assert!((t.rotation.y - 100.0).abs() < 1e-3);
}

#[test]
fn test_rotation_skips_entities_missing_a_tag() {
    let mut ctx = headless_ctx();
    let spin_only = ctx.spawn(
        "spin-only",
        &[ComponentData::Spin(Spin {
            speed: Vec3::ONE,
        })],
    );
    let transform_only = ctx.spawn("still", &[ComponentData::Transform(Transform::default())]);
    ctx.update(1.0);
    assert!(ctx.world().get::<&Transform>(spin_only).is_err());
    let t = ctx.world().get::<&Transform>(transform_only).unwrap();
    assert_eq!(t.rotation, Vec3::ZERO);
}

#[test]
fn test_system_schedule_order() {
    let mut ctx = headless_ctx();
    ctx.add_system("noop", |_, _| {});
    assert_eq!(ctx.system_names(), vec!["rotation", "noop"]);
}

// ---- Prefabs ----

#[test]
fn test_two_instances_are_distinct_and_complete() {
    let mut ctx = headless_ctx();
    let prefab = prefabs::spinning_cube_prefab(&CubeConfig::default());
    let tags = prefab.tags();
    ctx.register_prefab(prefab);

    let a = ctx.create_entity_from_prefab("spinning-cube").unwrap();
    let b = ctx.create_entity_from_prefab("spinning-cube").unwrap();
    assert_ne!(a, b);
    for entity in [a, b] {
        for &tag in &tags {
            assert!(has_tag(ctx.world(), entity, tag), "{entity:?} missing {tag}");
        }
    }
    let with_all = entities_with(ctx.world(), &tags);
    assert!(with_all.contains(&a) && with_all.contains(&b));
}

#[test]
fn test_reregistration_overwrites_without_merge() {
    let mut ctx = headless_ctx();
    ctx.register_prefab(spin_prefab("thing"));
    let replaced = ctx.register_prefab(
        Prefab::new("thing").with(ComponentData::Text(Text {
            content: "hello".into(),
            ..Default::default()
        })),
    );
    assert!(replaced.is_some());

    let entity = ctx.create_entity_from_prefab("thing").unwrap();
    assert!(has_tag(ctx.world(), entity, ComponentTag::Text));
    assert!(!has_tag(ctx.world(), entity, ComponentTag::Spin));
    assert!(!has_tag(ctx.world(), entity, ComponentTag::Transform));
}

#[test]
fn test_unknown_prefab_yields_none() {
    let mut ctx = headless_ctx();
    assert!(ctx.create_entity_from_prefab("ghost").is_none());
    assert_eq!(ctx.world().len(), 0);
}

#[test]
fn test_entity_created_event_carries_template() {
    let mut ctx = headless_ctx();
    ctx.register_prefab(spin_prefab("spinner"));
    ctx.on(stagecraft_core::events::EventKind::EntityCreated, |event, services| {
        if let GameEvent::EntityCreated { template, .. } = event {
            services.prefabs.register(Prefab::new(format!("seen-{template}")));
        }
    });
    ctx.create_entity_from_prefab("spinner");
    assert!(ctx.services.prefabs.contains("seen-spinner"));
}

#[test]
fn test_prefab_file_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lamp.json");
    std::fs::write(
        &path,
        r#"{"name": "lamp", "components": [{"factory": "light", "data": {"intensity": 2.0}}]}"#,
    )
    .unwrap();

    let mut ctx = headless_ctx();
    let services = &mut ctx.services;
    let name = services.prefabs.load_file(&path, &services.factories).unwrap();
    assert_eq!(name, "lamp");
    let entity = ctx.create_entity_from_prefab("lamp").unwrap();
    assert_eq!(ctx.world().get::<&Light>(entity).unwrap().intensity, 2.0);
}

#[test]
fn test_tag_removal_and_superset_query() {
    let mut ctx = headless_ctx();
    ctx.register_prefab(spin_prefab("spinner"));
    let entity = ctx.create_entity_from_prefab("spinner").unwrap();
    let query = [ComponentTag::Spin, ComponentTag::Transform];
    assert_eq!(entities_with(ctx.world(), &query), vec![entity]);

    assert!(remove_tag(ctx.world_mut(), entity, ComponentTag::Spin));
    assert!(!remove_tag(ctx.world_mut(), entity, ComponentTag::Spin));
    assert!(entities_with(ctx.world(), &query).is_empty());
}

// ---- Registration ----

#[test]
fn test_missing_nested_renderable_is_skipped() {
    let mut ctx = headless_ctx();
    let before = renderer(&ctx).object_count();
    let entity = ctx.spawn(
        "hollow",
        &[
            ComponentData::Transform(Transform::default()),
            ComponentData::Mesh(Mesh { renderable: None }),
        ],
    );
    assert_eq!(renderer(&ctx).object_count(), before);
    assert!(ctx.world().get::<&SceneHandle>(entity).is_err());

    let outcome = SceneRegistration::default().attach(&mut ctx.services, entity_id(entity), "hollow");
    assert_eq!(outcome, Attach::MissingRenderable);
    assert_eq!(renderer(&ctx).object_count(), before);
}

#[test]
fn test_specialized_handler_wins_over_mesh() {
    let mut ctx = headless_ctx();
    let prefab = prefabs::spinning_cube_prefab(&CubeConfig {
        size: 2.5,
        ..Default::default()
    });
    ctx.register_prefab(prefab);
    let entity = ctx.create_entity_from_prefab("spinning-cube").unwrap();

    let handle = *ctx.world().get::<&SceneHandle>(entity).unwrap();
    let object = renderer(&ctx).get(handle.object).unwrap();
    let ObjectKind::Mesh(desc) = &object.kind else {
        panic!("expected a mesh, got {:?}", object.kind);
    };
    assert!(desc.cast_shadow);
    assert_eq!(
        desc.geometry,
        Geometry::Box {
            width: 2.5,
            height: 2.5,
            depth: 2.5
        }
    );
}

#[test]
fn test_entity_never_attached_twice() {
    let mut ctx = headless_ctx();
    let entity = ctx.spawn(
        "plain",
        &[ComponentData::Mesh(Mesh {
            renderable: Some(MeshDesc::default()),
        })],
    );
    assert_eq!(renderer(&ctx).object_count(), 1);

    ctx.emit(GameEvent::EntityCreated {
        entity: entity_id(entity),
        template: "plain".into(),
    });
    assert_eq!(renderer(&ctx).object_count(), 1);
}

#[test]
fn test_empty_text_has_no_glyphs() {
    let mut ctx = headless_ctx();
    ctx.spawn("blank", &[ComponentData::Text(Text::default())]);
    assert_eq!(renderer(&ctx).object_count(), 0);
}

#[test]
fn test_menu_item_becomes_widget() {
    let mut ctx = headless_ctx();
    ctx.register_prefab(prefabs::menu_item_prefab(&prefabs::MenuItemConfig {
        label: "Play".into(),
        ..Default::default()
    }));
    let entity = ctx.create_entity_from_prefab("menu-item-0").unwrap();
    let handle = *ctx.world().get::<&SceneHandle>(entity).unwrap();
    let object = renderer(&ctx).get(handle.object).unwrap();
    assert!(matches!(
        &object.kind,
        ObjectKind::Widget { label, width, .. } if label == "Play" && *width == 4.0
    ));
    let widgets: Vec<&str> = renderer(&ctx)
        .objects()
        .filter(|o| matches!(o.kind, ObjectKind::Widget { .. }))
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(widgets, vec!["menu-item-0"]);
}

#[test]
fn test_handler_order_puts_mesh_last() {
    assert_eq!(
        SceneRegistration::default().handler_names(),
        vec!["spinning-cube", "menu-item", "text", "light", "mesh"]
    );
}

#[test]
fn test_scene_sync_copies_transforms() {
    let mut ctx = headless_ctx();
    ctx.register_prefab(prefabs::spinning_cube_prefab(&CubeConfig::default()));
    let entity = ctx.create_entity_from_prefab("spinning-cube").unwrap();
    ctx.update(0.5);
    ctx.render();

    let rotation = ctx.world().get::<&Transform>(entity).unwrap().rotation;
    let handle = *ctx.world().get::<&SceneHandle>(entity).unwrap();
    assert_eq!(renderer(&ctx).get(handle.object).unwrap().transform.rotation, rotation);
    assert_eq!(renderer(&ctx).frames_rendered(), 1);
}

#[test]
fn test_despawn_removes_scene_object_and_body() {
    let mut ctx = headless_ctx();
    ctx.register_prefab(prefabs::dynamic_box_prefab(&BoxConfig::default()));
    let entity = ctx.create_entity_from_prefab("box").unwrap();
    assert_eq!(renderer(&ctx).object_count(), 1);
    assert!(physics(&ctx).is_body_registered(entity_id(entity)));

    assert!(ctx.despawn(entity));
    assert_eq!(renderer(&ctx).object_count(), 0);
    assert!(!physics(&ctx).is_body_registered(entity_id(entity)));
}

// ---- Physics bridge ----

#[test]
fn test_impulse_at_unregistered_body_dropped() {
    let mut ctx = headless_ctx();
    ctx.emit(GameEvent::ApplyImpulse {
        body: EntityId(12345),
        impulse: Vec3::Y,
    });
    assert_eq!(physics(&ctx).impulses_applied(), 0);
}

#[test]
fn test_contacts_become_collision_events() {
    let mut ctx = headless_ctx();
    let target = ctx.spawn(
        "target",
        &[ComponentData::Material(Material {
            color: Color(0x00ff00),
        })],
    );
    let sensor = EntityId(1);
    let toggle = std::rc::Rc::new(std::cell::RefCell::new(ColorToggle::new(
        sensor,
        Color(0xff0000),
    )));
    let handler = toggle.clone();
    ctx.on(stagecraft_core::events::EventKind::CollisionStarted, move |event, services| {
        if let GameEvent::CollisionStarted { sensor, target } = event {
            handler.borrow_mut().on_start(services, *sensor, *target);
        }
    });

    ctx.physics_as_mut::<HeadlessPhysics>()
        .unwrap()
        .inject_contact(crate::physics::ContactEvent::Started {
            sensor,
            target: entity_id(target),
        });
    ctx.step_physics(1.0 / 60.0);

    assert_eq!(ctx.world().get::<&Material>(target).unwrap().color, Color(0xff0000));
    assert_eq!(toggle.borrow().cached(entity_id(target)), Some(Color(0x00ff00)));
}

// ---- Color toggle ----

fn find_sensor_and_target(ctx: &AppContext) -> (Entity, Entity) {
    let world = ctx.world();
    let sensor = world
        .query::<&Collider>()
        .iter()
        .find(|(_, c)| c.sensor)
        .map(|(e, _)| e)
        .unwrap();
    let target = world
        .query::<(&Material, &RigidBody, Option<&ImpulseTarget>)>()
        .iter()
        .find(|(_, (_, body, impulse))| body.kind == BodyKind::Dynamic && impulse.is_none())
        .map(|(e, _)| e)
        .unwrap();
    (sensor, target)
}

#[test]
fn test_collision_color_restored_bit_for_bit() {
    let mut ctx = headless_ctx();
    let _runner = running(Box::new(PhysicsDemoLevel::new(ctx.config())), &mut ctx);
    let (sensor, target) = find_sensor_and_target(&ctx);
    let original = ctx.world().get::<&Material>(target).unwrap().color;

    let ids = (entity_id(sensor), entity_id(target));
    ctx.emit(GameEvent::CollisionStarted {
        sensor: ids.0,
        target: ids.1,
    });
    let highlighted = ctx.world().get::<&Material>(target).unwrap().color;
    assert_ne!(highlighted, original);

    // A second overlap must not overwrite the cached original.
    ctx.emit(GameEvent::CollisionStarted {
        sensor: ids.0,
        target: ids.1,
    });
    ctx.emit(GameEvent::CollisionEnded {
        sensor: ids.0,
        target: ids.1,
    });
    let restored = ctx.world().get::<&Material>(target).unwrap().color;
    assert_eq!(restored.0, original.0);
}

#[test]
fn test_collision_end_without_start_is_noop() {
    let mut ctx = headless_ctx();
    let _runner = running(Box::new(PhysicsDemoLevel::new(ctx.config())), &mut ctx);
    let (sensor, target) = find_sensor_and_target(&ctx);
    let original = ctx.world().get::<&Material>(target).unwrap().color;

    ctx.emit(GameEvent::CollisionEnded {
        sensor: entity_id(sensor),
        target: entity_id(target),
    });
    assert_eq!(ctx.world().get::<&Material>(target).unwrap().color, original);
}

#[test]
fn test_collision_with_other_sensor_ignored() {
    let mut ctx = headless_ctx();
    let _runner = running(Box::new(PhysicsDemoLevel::new(ctx.config())), &mut ctx);
    let (_, target) = find_sensor_and_target(&ctx);
    let original = ctx.world().get::<&Material>(target).unwrap().color;

    ctx.emit(GameEvent::CollisionStarted {
        sensor: entity_id(target),
        target: entity_id(target),
    });
    assert_eq!(ctx.world().get::<&Material>(target).unwrap().color, original);
}

// ---- Physics demo impulses ----

#[test]
fn test_periodic_impulses_reach_registered_bodies() {
    let mut ctx = headless_ctx();
    let mut runner = running(Box::new(PhysicsDemoLevel::new(ctx.config())), &mut ctx);
    assert_eq!(physics(&ctx).impulses_applied(), 0);

    runner.tick(&mut ctx, 2.5);
    assert_eq!(physics(&ctx).impulses_applied(), 3);
    assert_eq!(physics(&ctx).torques_applied(), 0);

    runner.tick(&mut ctx, 1.5);
    assert_eq!(physics(&ctx).torques_applied(), 3);
}

#[test]
fn test_demo_bodies_registered_with_their_kinds() {
    let mut ctx = headless_ctx();
    let mut runner = running(Box::new(PhysicsDemoLevel::new(ctx.config())), &mut ctx);
    let sensors: Vec<Entity> = ctx
        .world()
        .query::<&Collider>()
        .iter()
        .filter(|(_, c)| c.sensor)
        .map(|(e, _)| e)
        .collect();
    assert_eq!(sensors.len(), 1);
    assert!(physics(&ctx).is_sensor(entity_id(sensors[0])));

    let bouncer = ctx
        .world()
        .query::<&ImpulseTarget>()
        .iter()
        .map(|(e, _)| e)
        .next()
        .unwrap();
    let body = physics(&ctx).body(entity_id(bouncer)).unwrap();
    assert_eq!(body.kind, BodyKind::Dynamic);
    assert!(!physics(&ctx).is_sensor(entity_id(bouncer)));

    runner.tick(&mut ctx, 2.5);
    assert!(physics(&ctx).elapsed() > 0.0);
    let pushed = physics(&ctx).linear_impulse(entity_id(bouncer)).unwrap();
    assert!(pushed.length() > 0.0);
}

#[test]
fn test_impulses_skip_bodies_unknown_to_physics() {
    let mut ctx = headless_ctx();
    let mut runner = running(Box::new(PhysicsDemoLevel::new(ctx.config())), &mut ctx);
    let bouncers: Vec<Entity> = ctx
        .world()
        .query::<&ImpulseTarget>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    ctx.physics_as_mut::<HeadlessPhysics>()
        .unwrap()
        .remove_body(entity_id(bouncers[0]));

    runner.tick(&mut ctx, 2.5);
    assert_eq!(physics(&ctx).impulses_applied(), 2);
}

#[test]
fn test_physics_demo_requires_physics() {
    let ctx = AppContext::builder().renderer(HeadlessRenderer::new()).build();
    let err = LevelRunner::new(Box::new(PhysicsDemoLevel::new(ctx.config())), &ctx)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        LevelError::MissingDependency {
            capability: Capability::Physics,
            ..
        }
    ));
}

// ---- Level lifecycle ----

#[test]
fn test_setup_waits_for_start_delay() {
    let mut ctx = headless_ctx();
    let mut runner = LevelRunner::new(Box::new(MainMenuLevel::new()), &ctx).unwrap();
    assert_eq!(runner.state(), LevelState::Constructed);
    runner.start(&mut ctx).unwrap();
    assert_eq!(runner.state(), LevelState::Starting);

    runner.tick(&mut ctx, 0.05);
    assert_eq!(runner.state(), LevelState::Starting);
    assert_eq!(ctx.world().len(), 0);

    runner.tick(&mut ctx, 0.1);
    assert_eq!(runner.state(), LevelState::Running);
    assert!(ctx.world().len() > 0);
    assert!(runner.frame_handle().is_some());
}

#[test]
fn test_cleanup_twice_leaves_nothing_active() {
    let mut ctx = headless_ctx();
    let listeners_before = ctx.listener_count();
    assert!(ctx.services.prefabs.is_empty());
    let mut runner = running(Box::new(PhysicsDemoLevel::new(ctx.config())), &mut ctx);
    runner.tick(&mut ctx, 1.0 / 60.0);
    assert!(ctx.services.timers.active_count() > 0);
    assert!(ctx.services.prefabs.contains("sensor"));

    runner.cleanup(&mut ctx);
    runner.cleanup(&mut ctx);

    assert_eq!(runner.state(), LevelState::Cleaned);
    assert!(runner.frame_handle().is_none());
    assert_eq!(ctx.services.timers.active_count(), 0);
    assert_eq!(ctx.listener_count(), listeners_before);
    assert_eq!(runner.pending_cleanups(), 0);
    assert_eq!(ctx.world().len(), 0);
    assert_eq!(renderer(&ctx).object_count(), 0);
    assert_eq!(physics(&ctx).body_count(), 0);
    assert_eq!(ctx.services.prefabs.len(), 0);
    assert!(ctx.services.prefabs.names().is_empty());
    assert!(runner.start(&mut ctx).is_err());
}

#[test]
fn test_cleanup_restores_prefab_a_level_replaced() {
    let mut ctx = headless_ctx();
    let user_ground = Prefab::new("ground").with(ComponentData::Text(Text {
        content: "mine".into(),
        ..Default::default()
    }));
    ctx.register_prefab(user_ground.clone());

    let mut runner = running(Box::new(PhysicsDemoLevel::new(ctx.config())), &mut ctx);
    assert_ne!(ctx.services.prefabs.get("ground"), Some(&user_ground));
    runner.cleanup(&mut ctx);

    assert_eq!(ctx.services.prefabs.get("ground"), Some(&user_ground));
    assert_eq!(ctx.services.prefabs.names(), vec!["ground"]);
}

#[test]
fn test_reloading_a_level_does_not_grow_the_registry() {
    let mut manager = LevelManager::new(headless_ctx());
    for _ in 0..5 {
        manager.load(LevelId::SpinningCubes).unwrap();
        manager.tick(0.2);
    }
    let live = manager.ctx().services.prefabs.len();
    assert!(live > 0);

    manager.load(LevelId::SpinningCubes).unwrap();
    manager.tick(0.2);
    assert_eq!(manager.ctx().services.prefabs.len(), live);

    manager.unload();
    let prefabs = &manager.ctx().services.prefabs;
    assert!(prefabs.is_empty());
    assert!(!prefabs.names().iter().any(|n| n.starts_with("character-")));
}

struct TimedLevel {
    fired: Rc<Cell<u32>>,
    timer: Option<TimerId>,
}

impl Level for TimedLevel {
    fn name(&self) -> &'static str {
        "timed"
    }

    fn setup(&mut self, scope: &mut LevelScope<'_>) -> Result<(), LevelError> {
        self.timer = Some(scope.after(0.5));
        Ok(())
    }

    fn on_timer(&mut self, _scope: &mut LevelScope<'_>, timer: TimerId) -> Result<(), LevelError> {
        if Some(timer) == self.timer {
            self.fired.set(self.fired.get() + 1);
        }
        Ok(())
    }
}

#[test]
fn test_one_shot_timer_fires_once() {
    let mut ctx = headless_ctx();
    let fired = Rc::new(Cell::new(0));
    let level = TimedLevel {
        fired: Rc::clone(&fired),
        timer: None,
    };
    let mut runner = running(Box::new(level), &mut ctx);
    runner.tick(&mut ctx, 0.3);
    assert_eq!(fired.get(), 0);
    for _ in 0..4 {
        runner.tick(&mut ctx, 0.3);
    }
    assert_eq!(fired.get(), 1);
    assert_eq!(ctx.services.timers.active_count(), 0);
}

#[test]
fn test_cleanup_cancels_pending_one_shot() {
    let mut ctx = headless_ctx();
    let fired = Rc::new(Cell::new(0));
    let level = TimedLevel {
        fired: Rc::clone(&fired),
        timer: None,
    };
    let mut runner = running(Box::new(level), &mut ctx);
    assert_eq!(ctx.services.timers.active_count(), 1);
    runner.cleanup(&mut ctx);
    assert_eq!(ctx.services.timers.active_count(), 0);
    runner.tick(&mut ctx, 1.0);
    assert_eq!(fired.get(), 0);
}

#[test]
fn test_cleanup_before_setup_cancels_start_timer() {
    let mut ctx = headless_ctx();
    let mut runner = LevelRunner::new(Box::new(MainMenuLevel::new()), &ctx).unwrap();
    runner.start(&mut ctx).unwrap();
    runner.cleanup(&mut ctx);
    assert_eq!(ctx.services.timers.active_count(), 0);
    runner.tick(&mut ctx, 1.0);
    assert_eq!(ctx.world().len(), 0);
}

#[test]
fn test_stop_keeps_entities_and_start_resumes() {
    let mut ctx = headless_ctx();
    let mut runner = running(
        Box::new(SpinningCubesLevel::new(&EngineConfig::default())),
        &mut ctx,
    );
    let entities = ctx.world().len();
    runner.stop(&mut ctx);
    assert_eq!(runner.state(), LevelState::Stopping);
    assert!(runner.frame_handle().is_none());
    assert_eq!(ctx.world().len(), entities);

    let frames = renderer(&ctx).frames_rendered();
    runner.tick(&mut ctx, 0.1);
    assert_eq!(renderer(&ctx).frames_rendered(), frames);

    runner.start(&mut ctx).unwrap();
    assert_eq!(runner.state(), LevelState::Running);
    runner.tick(&mut ctx, 0.1);
    assert_eq!(renderer(&ctx).frames_rendered(), frames + 1);
}

#[test]
fn test_context_loss_pauses_and_restore_rebuilds() {
    let mut ctx = headless_ctx();
    let mut runner = running(
        Box::new(SpinningCubesLevel::new(&EngineConfig::default())),
        &mut ctx,
    );
    runner.tick(&mut ctx, 0.1);
    let frames = renderer(&ctx).frames_rendered();
    let objects = renderer(&ctx).object_count();

    ctx.emit(GameEvent::ContextLost);
    runner.tick(&mut ctx, 0.1);
    runner.tick(&mut ctx, 0.1);
    assert!(runner.is_paused());
    assert_eq!(renderer(&ctx).frames_rendered(), frames);
    assert_eq!(runner.state(), LevelState::Running);

    ctx.emit(GameEvent::ContextRestored);
    runner.tick(&mut ctx, 0.1);
    assert!(!runner.is_paused());
    assert_eq!(renderer(&ctx).context_generation(), 1);
    assert_eq!(renderer(&ctx).object_count(), objects);
    assert_eq!(renderer(&ctx).frames_rendered(), frames + 1);
}

#[test]
fn test_context_events_ignored_after_stop() {
    let mut ctx = headless_ctx();
    let mut runner = running(Box::new(MainMenuLevel::new()), &mut ctx);
    runner.stop(&mut ctx);
    ctx.emit(GameEvent::ContextLost);
    runner.start(&mut ctx).unwrap();
    runner.tick(&mut ctx, 0.1);
    assert!(!runner.is_paused());
}

#[test]
fn test_lost_context_survives_stop_and_start() {
    let mut ctx = headless_ctx();
    let mut runner = running(
        Box::new(SpinningCubesLevel::new(&EngineConfig::default())),
        &mut ctx,
    );
    runner.tick(&mut ctx, 0.1);
    let frames = renderer(&ctx).frames_rendered();

    ctx.emit(GameEvent::ContextLost);
    runner.tick(&mut ctx, 0.1);
    runner.stop(&mut ctx);
    runner.start(&mut ctx).unwrap();
    runner.tick(&mut ctx, 0.1);
    assert!(runner.is_paused());
    assert_eq!(renderer(&ctx).frames_rendered(), frames);
    assert_eq!(renderer(&ctx).context_generation(), 0);

    ctx.emit(GameEvent::ContextRestored);
    runner.tick(&mut ctx, 0.1);
    assert!(!runner.is_paused());
    assert_eq!(renderer(&ctx).context_generation(), 1);
    assert_eq!(renderer(&ctx).frames_rendered(), frames + 1);
}

#[test]
fn test_renderer_not_ready_runs_degraded() {
    let mut ctx = AppContext::builder()
        .renderer(HeadlessRenderer::not_ready())
        .build();
    let mut runner = running(Box::new(MainMenuLevel::new()), &mut ctx);
    assert!(runner.is_degraded());
    runner.tick(&mut ctx, 0.1);
    assert_eq!(renderer(&ctx).frames_rendered(), 0);
}

struct FailingLevel {
    frames: u32,
}

impl Level for FailingLevel {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn setup(&mut self, _scope: &mut LevelScope<'_>) -> Result<(), LevelError> {
        Ok(())
    }

    fn update(&mut self, _scope: &mut LevelScope<'_>, _dt: f64) -> Result<(), LevelError> {
        self.frames += 1;
        if self.frames == 3 {
            return Err(LevelError::Frame("boom".into()));
        }
        Ok(())
    }
}

#[test]
fn test_frame_error_halts_loop() {
    let mut ctx = headless_ctx();
    let mut runner = running(Box::new(FailingLevel { frames: 0 }), &mut ctx);
    for _ in 0..5 {
        runner.tick(&mut ctx, 0.1);
    }
    assert_eq!(runner.state(), LevelState::Stopping);
    assert_eq!(renderer(&ctx).frames_rendered(), 2);
    assert!(runner.last_error().unwrap().contains("boom"));
}

// ---- Level manager ----

#[test]
fn test_manager_keeps_one_level_live() {
    let mut manager = LevelManager::new(headless_ctx());
    manager.load(LevelId::SpinningCubes).unwrap();
    manager.tick(0.2);
    let cubes = manager.ctx().world().query::<&SpinningCube>().iter().count();
    assert_eq!(cubes, 9);

    manager.load(LevelId::MainMenu).unwrap();
    assert_eq!(manager.current_level(), Some(LevelId::MainMenu));
    assert_eq!(manager.ctx().world().len(), 0);
    assert_eq!(manager.ctx().services.timers.active_count(), 1);

    manager.tick(0.2);
    let cubes = manager.ctx().world().query::<&SpinningCube>().iter().count();
    assert_eq!(cubes, 0);
    assert!(manager.ctx().world().query::<&MenuItem>().iter().count() == 3);
}

#[test]
fn test_manager_load_fails_loud_on_missing_dependency() {
    let ctx = AppContext::builder().renderer(HeadlessRenderer::new()).build();
    let mut manager = LevelManager::new(ctx);
    let err = manager.load(LevelId::PhysicsDemo).unwrap_err();
    assert!(matches!(err, LevelError::MissingDependency { .. }));
    assert!(manager.current_level().is_none());
}

fn selected_label(manager: &LevelManager) -> Option<String> {
    manager
        .ctx()
        .world()
        .query::<&MenuItem>()
        .iter()
        .find(|(_, item)| item.selected)
        .map(|(_, item)| item.label.clone())
}

#[test]
fn test_menu_navigation_wraps() {
    let mut manager = LevelManager::new(headless_ctx());
    manager.load(LevelId::MainMenu).unwrap();
    manager.tick(0.2);
    assert_eq!(selected_label(&manager).as_deref(), Some("Spinning Cubes"));

    manager.emit(GameEvent::MenuNavigate {
        direction: NavDirection::Up,
    });
    assert_eq!(selected_label(&manager).as_deref(), Some("Quit"));

    manager.emit(GameEvent::MenuNavigate {
        direction: NavDirection::Down,
    });
    manager.emit(GameEvent::MenuNavigate {
        direction: NavDirection::Down,
    });
    assert_eq!(selected_label(&manager).as_deref(), Some("Physics Demo"));
}

#[test]
fn test_menu_activation_loads_level() {
    let mut manager = LevelManager::new(headless_ctx());
    manager.load(LevelId::MainMenu).unwrap();
    manager.tick(0.2);

    manager.emit(GameEvent::MenuNavigate {
        direction: NavDirection::Down,
    });
    manager.emit(GameEvent::MenuActivate);
    manager.tick(1.0 / 60.0);
    assert_eq!(manager.current_level(), Some(LevelId::PhysicsDemo));
    assert_eq!(manager.current_state(), Some(LevelState::Starting));

    manager.tick(0.2);
    assert_eq!(manager.current_state(), Some(LevelState::Running));
    assert_eq!(manager.ctx().world().query::<&MenuItem>().iter().count(), 0);
}

#[test]
fn test_menu_quit() {
    let mut manager = LevelManager::new(headless_ctx());
    manager.load(LevelId::MainMenu).unwrap();
    manager.tick(0.2);
    manager.emit(GameEvent::MenuNavigate {
        direction: NavDirection::Up,
    });
    manager.emit(GameEvent::MenuActivate);
    manager.tick(1.0 / 60.0);
    assert!(manager.quit_requested());

    manager.shutdown();
    assert!(manager.current_level().is_none());
    assert_eq!(manager.ctx().world().len(), 0);
}
