use serde_json::json;

use crate::{
    domain::{FieldDefinition, FieldKind},
    form::{FieldState, FieldValue, GradientStop, RegistryError},
    tests::{path, snowstorm},
};

fn field(kind: FieldKind) -> FieldState {
    let definition = FieldDefinition {
        label: None,
        info: None,
        placeholder: None,
        required: false,
        enabled_modes: None,
        value: None,
        kind,
    };
    FieldState::from_definition(path("particle.test.input"), definition).unwrap()
}

#[test]
fn blank_values_follow_the_kind() {
    assert_eq!(
        field(FieldKind::Text { axis_count: Some(3) }).value,
        FieldValue::Axes(vec![String::new(); 3])
    );
    assert_eq!(field(FieldKind::Checkbox).value, FieldValue::Bool(false));
    assert_eq!(
        field(FieldKind::Color).value,
        FieldValue::Color("#ffffff".into())
    );
    assert_eq!(
        field(FieldKind::Gradient).value,
        FieldValue::Gradient(vec![
            GradientStop::new(0.0, "#ffffff"),
            GradientStop::new(100.0, "#ffffff")
        ])
    );
}

#[test]
fn checkbox_input_accepts_common_spellings() {
    let checkbox = field(FieldKind::Checkbox);
    for raw in ["true", "ON", " yes ", "1"] {
        assert_eq!(checkbox.parse_input(raw).unwrap(), FieldValue::Bool(true), "{raw}");
    }
    assert_eq!(checkbox.parse_input("off").unwrap(), FieldValue::Bool(false));
    assert!(matches!(
        checkbox.parse_input("maybe"),
        Err(RegistryError::InvalidValue { .. })
    ));
}

#[test]
fn gradient_input_reads_percent_color_pairs() {
    let gradient = field(FieldKind::Gradient);
    let value = gradient.parse_input("0:#000000, 50: #ff0000 ,100:#ffffff").unwrap();

    assert_eq!(
        value,
        FieldValue::Gradient(vec![
            GradientStop::new(0.0, "#000000"),
            GradientStop::new(50.0, "#ff0000"),
            GradientStop::new(100.0, "#ffffff"),
        ])
    );
    assert!(gradient.check(&value).is_ok());
    assert!(gradient.parse_input("50-#ff0000").is_err());
    assert!(
        gradient
            .check(&FieldValue::Gradient(vec![GradientStop::new(120.0, "#ffffff")]))
            .is_err()
    );
}

#[test]
fn colors_must_be_hex() {
    let color = field(FieldKind::Color);
    assert!(color.check(&FieldValue::Color("#12ab9F".into())).is_ok());
    assert!(color.check(&FieldValue::Color("#12ab9F80".into())).is_ok());
    assert!(matches!(
        color.check(&FieldValue::Color("red".into())),
        Err(RegistryError::InvalidValue { .. })
    ));
}

#[test]
fn number_inputs_reject_expressions() {
    let number = field(FieldKind::Number {
        axis_count: None,
        min: Some(0.0),
        max: None,
    });
    assert!(number.check(&FieldValue::from("2.5")).is_ok());
    assert!(number.check(&FieldValue::from("")).is_ok());
    assert!(matches!(
        number.check(&FieldValue::from("math.sin(1)")),
        Err(RegistryError::InvalidNumber { .. })
    ));
    assert!(matches!(
        number.check(&FieldValue::from("-1")),
        Err(RegistryError::InvalidNumber { .. })
    ));
    assert!(number.check(&FieldValue::from("inf")).is_err());
}

#[test]
fn list_input_drops_empty_entries() {
    let list = field(FieldKind::List);
    assert_eq!(
        list.parse_input("minecraft:stone, , minecraft:dirt").unwrap(),
        FieldValue::List(vec!["minecraft:stone".into(), "minecraft:dirt".into()])
    );
}

#[test]
fn image_and_curve_inputs_treat_empty_text_as_none() {
    let image = field(FieldKind::Image { allow_upload: true });
    assert_eq!(image.parse_input("  ").unwrap(), FieldValue::Image(None));
    assert_eq!(image.current_value(), None);

    let curve = field(FieldKind::Curve);
    assert_eq!(
        curve.parse_input("variable.size").unwrap(),
        FieldValue::Curve(Some("variable.size".into()))
    );
}

#[test]
fn current_value_keeps_numbers_numeric() {
    let registry = snowstorm();
    let max_age = registry.get("particle", "lifetime", "max_lifetime").unwrap();
    assert_eq!(max_age.current_value(), Some(json!(1)));

    let mut speed = registry
        .get("particle", "motion", "linear_speed")
        .unwrap()
        .clone();
    assert_eq!(speed.current_value(), None);
    speed.seed_value(&json!("v.speed * 2")).unwrap();
    assert_eq!(speed.current_value(), Some(json!("v.speed * 2")));
}

#[test]
fn partially_blank_axes_export_zeroes() {
    let mut direction = snowstorm()
        .get("particle", "direction", "direction")
        .unwrap()
        .clone();
    direction
        .seed_value(&json!(["", 1, "math.random(-1, 1)"]))
        .unwrap();

    assert_eq!(
        direction.current_value(),
        Some(json!([0, 1, "math.random(-1, 1)"]))
    );
    assert_eq!(direction.display_value(), "[, 1, math.random(-1, 1)]");
}

#[test]
fn labels_fall_back_to_the_key() {
    let registry = snowstorm();
    assert_eq!(registry.get("particle", "texture", "image").unwrap().label(), "image");
    assert_eq!(
        registry.get("particle", "appearance", "size").unwrap().label(),
        "Size"
    );
}
