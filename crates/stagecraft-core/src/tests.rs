#[cfg(test)]
mod tests {
    use glam::Vec3;
    use serde_json::json;

    use crate::components::*;
    use crate::constants::*;
    use crate::enums::*;
    use crate::events::{EventKind, GameEvent};
    use crate::factories::{ComponentFactories, FactoryError};
    use crate::prefab::{ComponentData, Prefab};
    use crate::types::{Color, EntityId};

    #[test]
    fn test_component_tag_names_unique_and_parse_back() {
        for tag in ComponentTag::ALL {
            assert_eq!(ComponentTag::from_name(tag.as_str()), Some(tag));
        }
        assert_eq!(ComponentTag::from_name("nope"), None);
    }

    #[test]
    fn test_component_tag_serde_matches_name() {
        let json = serde_json::to_string(&ComponentTag::SpinningCube).unwrap();
        assert_eq!(json, "\"spinning-cube\"");
    }

    #[test]
    fn test_component_data_tag_is_fixed_by_variant() {
        let spin = ComponentData::Spin(Spin {
            speed: Vec3::X,
        });
        assert_eq!(spin.tag(), ComponentTag::Spin);
        let mesh = ComponentData::Mesh(Mesh::default());
        assert_eq!(mesh.tag(), ComponentTag::Mesh);
    }

    #[test]
    fn test_spin_clamped() {
        let spin = Spin {
            speed: Vec3::new(1000.0, -1000.0, 2.0),
        }
        .validated();
        assert_eq!(spin.speed, Vec3::new(MAX_SPIN_SPEED, -MAX_SPIN_SPEED, 2.0));
    }

    #[test]
    fn test_rigid_body_mass_clamped_for_dynamic_only() {
        let dynamic = RigidBody {
            mass: -3.0,
            ..Default::default()
        }
        .validated();
        assert_eq!(dynamic.mass, MIN_BODY_MASS);

        let fixed = RigidBody {
            kind: BodyKind::Static,
            mass: 0.0,
            linear_damping: 4.0,
            ..Default::default()
        }
        .validated();
        assert_eq!(fixed.mass, 0.0);
        assert_eq!(fixed.linear_damping, 1.0);
    }

    #[test]
    fn test_camera_fov_and_planes_clamped() {
        let cam = Camera {
            fov_degrees: 400.0,
            near: 5.0,
            far: 1.0,
            ..Default::default()
        }
        .validated();
        assert_eq!(cam.fov_degrees, MAX_FOV_DEGREES);
        assert!(cam.far > cam.near);
    }

    #[test]
    fn test_color_channels() {
        let c = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(c, Color(0x123456));
        assert_eq!((c.r(), c.g(), c.b()), (0x12, 0x34, 0x56));
        assert_eq!(Color(0xff12_3456).validated(), Color(0x123456));
        assert_eq!(c.to_string(), "#123456");
    }

    #[test]
    fn test_menu_item_defaults() {
        let item = MenuItem::default();
        assert_eq!(item.width, MENU_ITEM_WIDTH);
        assert_eq!(item.font_size, DEFAULT_FONT_SIZE);
        assert!(item.panel.is_some());
    }

    #[test]
    fn test_factory_null_data_gives_defaults() {
        let factories = ComponentFactories::with_builtins();
        let text = factories.create("text", &serde_json::Value::Null).unwrap();
        assert_eq!(text, ComponentData::Text(Text::default()));
    }

    #[test]
    fn test_factory_partial_data_and_validation() {
        let factories = ComponentFactories::with_builtins();
        let data = json!({ "label": "Play", "font_size": 2000.0 });
        let ComponentData::MenuItem(item) = factories.create("menu-item", &data).unwrap() else {
            panic!("expected a menu item");
        };
        assert_eq!(item.label, "Play");
        assert_eq!(item.font_size, MAX_FONT_SIZE);
        assert_eq!(item.width, MENU_ITEM_WIDTH);
    }

    #[test]
    fn test_factory_unknown_name() {
        let factories = ComponentFactories::with_builtins();
        let err = factories.create("hologram", &json!({})).unwrap_err();
        assert!(matches!(err, FactoryError::UnknownFactory(name) if name == "hologram"));
    }

    #[test]
    fn test_factory_bad_data() {
        let factories = ComponentFactories::with_builtins();
        let err = factories
            .create("spin", &json!({ "speed": "fast" }))
            .unwrap_err();
        assert!(matches!(err, FactoryError::InvalidData { .. }));
    }

    #[test]
    fn test_custom_factory_registration() {
        let mut factories = ComponentFactories::empty();
        assert!(!factories.contains("red"));
        factories.register("red", |_| {
            Ok(ComponentData::Material(Material {
                color: Color(0xff0000),
            }))
        });
        let red = factories.create("red", &json!(null)).unwrap();
        assert_eq!(
            red,
            ComponentData::Material(Material {
                color: Color(0xff0000)
            })
        );
    }

    #[test]
    fn test_prefab_from_json_keeps_order() {
        let factories = ComponentFactories::with_builtins();
        let prefab = factories
            .prefab_from_json(
                r#"{
                    "name": "crate",
                    "components": [
                        {"factory": "transform", "data": {"position": [1.0, 2.0, 3.0]}},
                        {"factory": "mesh", "data": {"renderable": {"color": 255}}},
                        {"factory": "rigid-body"}
                    ]
                }"#,
            )
            .unwrap();
        assert_eq!(prefab.name, "crate");
        assert_eq!(
            prefab.tags(),
            vec![
                ComponentTag::Transform,
                ComponentTag::Mesh,
                ComponentTag::RigidBody
            ]
        );
        let ComponentData::Transform(t) = &prefab.components[0] else {
            panic!("expected a transform first");
        };
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_prefab_file_entries_name_a_factory() {
        let factories = ComponentFactories::with_builtins();
        let prefab = factories
            .prefab_from_json(r#"{"name": "lamp", "components": [{"factory": "light", "data": null}]}"#)
            .unwrap();
        assert_eq!(prefab.tags(), vec![ComponentTag::Light]);

        let empty = factories.prefab_from_json(r#"{"name": "marker"}"#).unwrap();
        assert!(empty.components.is_empty());

        let keyed_by_tag = factories
            .prefab_from_json(r#"{"name": "lamp", "components": [{"tag": "light", "data": {}}]}"#);
        assert!(keyed_by_tag.is_err());
    }

    #[test]
    fn test_prefab_builder() {
        let prefab = Prefab::new("cube")
            .with(ComponentData::Transform(Transform::default()))
            .with(ComponentData::Spin(Spin::default()));
        assert!(prefab.has_tag(ComponentTag::Spin));
        assert!(!prefab.has_tag(ComponentTag::Mesh));
    }

    #[test]
    fn test_event_kind_matches_variant() {
        let created = GameEvent::EntityCreated {
            entity: EntityId(7),
            template: "cube".into(),
        };
        assert_eq!(created.kind(), EventKind::EntityCreated);
        assert_eq!(GameEvent::ContextLost.kind(), EventKind::ContextLost);
        let activated = GameEvent::MenuActivated {
            action: MenuAction::LoadLevel(LevelId::PhysicsDemo),
        };
        assert_eq!(activated.kind(), EventKind::MenuActivated);
    }

    #[test]
    fn test_menu_action_serde() {
        let action = MenuAction::LoadLevel(LevelId::SpinningCubes);
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"type":"LoadLevel","level":"spinning-cubes"}"#);
        let back: MenuAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_level_id_names_parse_back() {
        for level in LevelId::ALL {
            assert_eq!(LevelId::from_name(level.as_str()), Some(level));
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{level}\""));
        }
        assert_eq!(LevelId::from_name("credits"), None);
    }
}
