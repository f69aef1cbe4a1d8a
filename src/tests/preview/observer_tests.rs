use std::{cell::RefCell, rc::Rc};

use crate::{
    events::{FieldObserver, HookError, ObserverBus},
    form::{FieldChanged, FieldValue},
    preview::{
        EmitterMode, EmitterPreview, EmitterPreviewUpdater, EmitterShape, MaterialRefresher,
        TextureSource, VariableParser,
    },
    tests::path,
};

fn change(raw: &str, value: FieldValue) -> FieldChanged {
    FieldChanged {
        path: path(raw),
        previous: value.clone(),
        value,
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn variable_lines_are_compacted_and_lowercased() {
    let table = VariableParser::parse(&lines(&[
        "Variable.Speed = 1 + 2",
        "no assignment here",
        "v.flag=q.is_on_ground ? 1 : 0",
        "v.cmp = a == b",
    ]));

    assert_eq!(table.len(), 3);
    assert_eq!(table["variable.speed"], "1+2");
    assert_eq!(table["v.flag"], "q.is_on_ground?1:0");
    assert_eq!(table["v.cmp"], "a==b");
}

#[test]
fn variable_parser_fills_the_matching_table() {
    let mut preview = EmitterPreview::default();
    let mut parser = VariableParser;

    parser
        .field_changed(
            &change(
                "effect.variables.tick_vars",
                FieldValue::List(lines(&["v.age = v.age + 1"])),
            ),
            &mut preview,
        )
        .unwrap();

    assert!(preview.creation_variables.is_empty());
    assert_eq!(preview.tick_variables["v.age"], "v.age+1");

    let err = parser
        .field_changed(
            &change("effect.variables.creation_vars", FieldValue::from("v.a = 1")),
            &mut preview,
        )
        .unwrap_err();
    assert_eq!(err.path, path("effect.variables.creation_vars"));
}

#[test]
fn emitter_updater_tracks_mode_shape_and_timing() {
    let mut preview = EmitterPreview::default();
    let mut updater = EmitterPreviewUpdater;

    for (raw, value) in [
        ("emitter.lifetime.mode", FieldValue::Select("once".into())),
        ("emitter.lifetime.active_time", FieldValue::from("v.duration")),
        ("emitter.lifetime.sleep_time", FieldValue::from("2")),
        ("emitter.shape.mode", FieldValue::Select("entity_aabb".into())),
        ("emitter.rate.mode", FieldValue::Select("instant".into())),
    ] {
        updater
            .field_changed(&change(raw, value), &mut preview)
            .unwrap();
    }

    assert_eq!(preview.mode, EmitterMode::Once);
    assert_eq!(preview.shape, EmitterShape::EntityAabb);
    assert_eq!(preview.active_time, "v.duration");
    assert_eq!(preview.sleep_time, "2");
}

#[test]
fn emitter_updater_rejects_unknown_modes() {
    let mut preview = EmitterPreview::default();
    let err = EmitterPreviewUpdater
        .field_changed(
            &change("emitter.lifetime.mode", FieldValue::Select("forever".into())),
            &mut preview,
        )
        .unwrap_err();

    assert!(err.message.contains("forever"));
    assert_eq!(preview.mode, EmitterMode::Looping);
}

#[test]
fn material_refresher_rebuilds_on_texture_edits() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = {
        let seen = Rc::clone(&seen);
        move |texture: &TextureSource| -> Result<(), HookError> {
            seen.borrow_mut().push(texture.clone());
            Ok(())
        }
    };
    let mut refresher = MaterialRefresher::new(sink);
    let mut preview = EmitterPreview::default();

    refresher
        .field_changed(
            &change("particle.texture.path", FieldValue::from(" textures/particle/flame ")),
            &mut preview,
        )
        .unwrap();
    refresher
        .field_changed(
            &change("particle.texture.uv", FieldValue::Axes(lines(&["0", "0"]))),
            &mut preview,
        )
        .unwrap();
    refresher
        .field_changed(
            &change(
                "particle.texture.image",
                FieldValue::Image(Some("data:image/png;base64,AAAA".into())),
            ),
            &mut preview,
        )
        .unwrap();

    assert_eq!(preview.material_revision, 2);
    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].path.as_deref(), Some("textures/particle/flame"));
    assert_eq!(seen[0].image, None);
    assert!(seen[1].image.is_some());
}

#[test]
fn bus_stops_at_the_first_failing_observer() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut bus = ObserverBus::new();
    for name in ["first", "second", "third"] {
        let calls = Rc::clone(&calls);
        bus.subscribe(
            move |change: &FieldChanged, _: &mut EmitterPreview| -> Result<(), HookError> {
                calls.borrow_mut().push(name);
                if name == "second" {
                    return Err(HookError::new(&change.path, "preview offline"));
                }
                Ok(())
            },
        );
    }

    let err = bus
        .dispatch(
            &change("particle.appearance.material", FieldValue::Select("particles_blend".into())),
            &mut EmitterPreview::default(),
        )
        .unwrap_err();

    assert_eq!(bus.len(), 3);
    assert_eq!(*calls.borrow(), ["first", "second"]);
    assert_eq!(err.to_string(), "particle.appearance.material: preview offline");
}
