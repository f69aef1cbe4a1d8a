use serde_json::json;

use crate::{
    domain::CurveDefinition,
    form::{FieldValue, RegistryError},
    tests::{path, snowstorm},
};

#[test]
fn unknown_paths_report_not_found() {
    let registry = snowstorm();

    assert_eq!(
        registry.get("particle", "texture", "nope").unwrap_err(),
        RegistryError::NotFound {
            path: "particle.texture.nope".to_string()
        }
    );
    assert!(matches!(
        registry.group("particle", "wind"),
        Err(RegistryError::NotFound { .. })
    ));
    assert!(registry.get("effect", "curves", "identifier").is_err());
}

#[test]
fn material_select_offers_the_three_materials() {
    let registry = snowstorm();
    let material = registry.get("particle", "appearance", "material").unwrap();

    let keys = material
        .options()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>();
    assert_eq!(keys, ["particles_alpha", "particles_blend", "particles_opaque"]);
    assert_eq!(material.selected_key(), Some("particles_alpha"));
    assert_eq!(material.display_value(), "Alpha");
}

#[test]
fn for_each_field_visits_every_input_once() {
    let registry = snowstorm();
    let mut visited = Vec::new();
    registry.for_each_field(|field, key| {
        assert_eq!(field.key(), key);
        visited.push(field.path.to_string());
    });

    assert_eq!(visited.len(), registry.field_count());
    visited.sort();
    visited.dedup();
    assert_eq!(visited.len(), 65);
}

#[test]
fn select_initialization_is_idempotent() {
    let mut registry = snowstorm();
    let before = registry
        .fields()
        .map(|field| (field.path.clone(), field.value.clone(), field.enabled))
        .collect::<Vec<_>>();

    registry.initialize_select_defaults();
    let after = registry
        .fields()
        .map(|field| (field.path.clone(), field.value.clone(), field.enabled))
        .collect::<Vec<_>>();

    assert_eq!(before, after);
}

#[test]
fn instant_rate_mode_swaps_enabled_inputs() {
    let mut registry = snowstorm();
    assert!(registry.is_enabled(&path("emitter.rate.rate")).unwrap());
    assert!(!registry.is_enabled(&path("emitter.rate.amount")).unwrap());

    let change = registry
        .set_value(&path("emitter.rate.mode"), FieldValue::Select("instant".into()))
        .unwrap();

    assert_eq!(change.previous, FieldValue::Select("steady".into()));
    assert!(registry.is_enabled(&path("emitter.rate.amount")).unwrap());
    assert!(!registry.is_enabled(&path("emitter.rate.rate")).unwrap());
    assert!(!registry.is_enabled(&path("emitter.rate.maximum")).unwrap());
}

#[test]
fn ungated_inputs_stay_enabled_in_gated_groups() {
    let mut registry = snowstorm();
    registry
        .set_value(&path("particle.lifetime.mode"), FieldValue::Select("expression".into()))
        .unwrap();

    assert!(registry.is_enabled(&path("particle.lifetime.kill_plane")).unwrap());
    assert!(registry.is_enabled(&path("particle.lifetime.expiration_expression")).unwrap());
    assert!(!registry.is_enabled(&path("particle.lifetime.max_lifetime")).unwrap());
}

#[test]
fn set_value_rejects_values_that_do_not_fit() {
    let mut registry = snowstorm();

    let err = registry
        .set_value(
            &path("particle.appearance.material"),
            FieldValue::Select("particles_add".into()),
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnknownOption { ref option, .. } if option == "particles_add"));

    let err = registry
        .set_value(&path("effect.meta.identifier"), FieldValue::Bool(true))
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::KindMismatch {
            expected: "text",
            found: "checkbox",
            ..
        }
    ));

    let err = registry
        .set_value(
            &path("particle.appearance.size"),
            FieldValue::Axes(vec!["1".into()]),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::AxisCount {
            expected: 2,
            found: 1,
            ..
        }
    ));

    let err = registry
        .set_input(&path("particle.collision.collision_radius"), "0.6")
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidNumber { .. }), "{err}");

    let err = registry
        .set_value(&path("effect.meta.identifier"), FieldValue::from("  "))
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::Required {
            path: path("effect.meta.identifier")
        }
    );

    assert!(!registry.is_dirty());
}

#[test]
fn set_input_keeps_nested_commas_together() {
    let mut registry = snowstorm();
    let change = registry
        .set_input(
            &path("particle.motion.linear_acceleration"),
            "math.random(0, 1), 2, -9.8",
        )
        .unwrap();

    assert_eq!(
        change.value,
        FieldValue::Axes(vec![
            "math.random(0, 1)".into(),
            "2".into(),
            "-9.8".into()
        ])
    );
    let snapshot = registry.snapshot();
    assert_eq!(
        snapshot["particle"]["motion"]["linear_acceleration"],
        json!(["math.random(0, 1)", 2, -9.8])
    );
}

#[test]
fn disabled_inputs_can_still_be_edited() {
    let mut registry = snowstorm();
    registry
        .set_input(&path("emitter.rate.amount"), "12")
        .unwrap();

    let amount = registry.get("emitter", "rate", "amount").unwrap();
    assert!(!amount.enabled);
    assert!(amount.dirty);
    assert!(registry.snapshot()["emitter"]["rate"].get("amount").is_none());
}

#[test]
fn validate_reports_blank_required_inputs() {
    let mut registry = snowstorm();
    let issues = registry.validate();

    let paths = issues
        .iter()
        .map(|issue| match issue {
            RegistryError::Required { path } => path.to_string(),
            other => panic!("unexpected issue {other}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(
        paths,
        [
            "effect.meta.identifier",
            "particle.motion.linear_speed",
            "particle.collision.collision_radius"
        ]
    );
    assert_eq!(registry.error_count(), 3);

    registry
        .set_input(&path("effect.meta.identifier"), "snowstorm:flakes")
        .unwrap();
    assert_eq!(registry.error_count(), 2);

    registry.clear_errors();
    assert_eq!(registry.error_count(), 0);
}

#[test]
fn validate_skips_disabled_inputs() {
    let mut registry = snowstorm();
    registry
        .set_value(&path("particle.motion.mode"), FieldValue::Select("static".into()))
        .unwrap();

    let issues = registry.validate();
    assert_eq!(issues.len(), 2);
    assert!(
        issues
            .iter()
            .all(|issue| !issue.to_string().contains("linear_speed"))
    );
}

#[test]
fn snapshot_lists_every_group_and_omits_blank_or_disabled_inputs() {
    let registry = snowstorm();
    let snapshot = registry.snapshot();

    assert_eq!(snapshot["effect"]["meta"], json!({}));
    assert_eq!(snapshot["effect"]["curves"], json!([]));
    assert_eq!(
        snapshot["emitter"]["rate"],
        json!({"mode": "steady", "rate": 1, "maximum": 100})
    );
    assert_eq!(snapshot["particle"]["appearance"]["size"], json!([0.2, 0.2]));
    assert_eq!(snapshot["effect"]["space"]["local_position"], json!(false));
    assert!(snapshot["emitter"]["shape"].get("radius").is_none());
    assert!(snapshot["particle"]["texture"].get("image").is_none());
}

#[test]
fn snapshot_seeds_an_equivalent_registry() {
    let mut registry = snowstorm();
    registry
        .set_input(&path("effect.meta.identifier"), "snowstorm:flakes")
        .unwrap();
    registry
        .set_value(&path("emitter.shape.mode"), FieldValue::Select("sphere".into()))
        .unwrap();
    registry
        .set_input(&path("emitter.shape.radius"), "math.random(1, 2)")
        .unwrap();
    registry
        .set_input(&path("effect.variables.tick_vars"), "variable.a = 1, variable.b = 2")
        .unwrap();
    registry
        .add_curve("effect", "curves", CurveDefinition::new("variable.size"))
        .unwrap();
    let snapshot = registry.snapshot();

    let mut restored = snowstorm();
    restored.seed_from_value(&snapshot).unwrap();

    assert_eq!(restored.snapshot(), snapshot);
    assert!(restored.is_enabled(&path("emitter.shape.radius")).unwrap());
    assert!(!restored.is_dirty());
    assert!(restored.curve("variable.size").is_some());
}

#[test]
fn failed_seed_leaves_registry_untouched() {
    let mut registry = snowstorm();
    let before = registry.snapshot();

    let err = registry
        .seed_from_value(&json!({
            "emitter": {"rate": {"mode": "instant"}},
            "particle": {"collision": {"collision_radius": 0.9}}
        }))
        .unwrap_err();

    assert!(matches!(err, RegistryError::InvalidNumber { .. }), "{err}");
    assert_eq!(registry.snapshot(), before);
    assert!(registry.is_enabled(&path("emitter.rate.rate")).unwrap());
}

#[test]
fn seed_requires_an_object_document() {
    let mut registry = snowstorm();
    let before = registry.snapshot();

    let err = registry
        .seed_from_value(&json!([{"effect": {}}]))
        .unwrap_err();

    assert!(matches!(err, RegistryError::InvalidLayout { .. }), "{err}");
    assert_eq!(registry.snapshot(), before);
}

#[test]
fn seed_ignores_unknown_entries() {
    let mut registry = snowstorm();
    registry
        .seed_from_value(&json!({
            "effect": {"meta": {"identifier": "snowstorm:rain", "format_version": "1.10.0"}},
            "sound": {}
        }))
        .unwrap();

    let identifier = registry.get("effect", "meta", "identifier").unwrap();
    assert_eq!(identifier.value.as_text(), Some("snowstorm:rain"));
}

#[test]
fn curves_are_added_and_removed_by_id() {
    let mut registry = snowstorm();
    let mut curve = CurveDefinition::new("variable.size");
    curve.input = "v.particle_age".to_string();
    curve.nodes = vec![0.0, 1.0, 0.5];

    registry
        .add_curve("effect", "curves", curve.clone())
        .unwrap();
    assert_eq!(
        registry
            .add_curve("effect", "curves", CurveDefinition::new("variable.size"))
            .unwrap_err(),
        RegistryError::DuplicateCurve {
            id: "variable.size".to_string()
        }
    );
    assert!(matches!(
        registry.add_curve("effect", "meta", CurveDefinition::new("variable.other")),
        Err(RegistryError::InvalidLayout { .. })
    ));

    let exported = &registry.snapshot()["effect"]["curves"];
    assert_eq!(exported[0]["id"], json!("variable.size"));
    assert_eq!(exported[0]["mode"], json!("linear"));
    assert_eq!(exported[0]["nodes"], json!([0.0, 1.0, 0.5]));

    assert_eq!(
        registry.remove_curve("effect", "curves", "variable.size").unwrap(),
        curve
    );
    assert!(matches!(
        registry.remove_curve("effect", "curves", "variable.size"),
        Err(RegistryError::NotFound { .. })
    ));
    assert_eq!(registry.curves().count(), 0);
}

#[test]
fn curves_with_non_finite_nodes_are_rejected() {
    let mut registry = snowstorm();
    let mut curve = CurveDefinition::new("variable.flicker");
    curve.nodes = vec![0.0, f64::NAN, 1.0];

    let err = registry.add_curve("effect", "curves", curve).unwrap_err();

    assert_eq!(
        err,
        RegistryError::InvalidCurve {
            id: "variable.flicker".to_string(),
            message: "node 1 is not a finite number".to_string(),
        }
    );
    assert_eq!(registry.curves().count(), 0);
    assert_eq!(registry.snapshot()["effect"]["curves"], json!([]));
}
