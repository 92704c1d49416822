//! Batch creation through the metadata factory

use diagram_engine::metadata::specs_from_rows;
use diagram_engine::{
    CreationSpec, DiagramFactory, DiagramMetadata, DiagramParams, DiagramType, Engine,
    FactoryError, ImportRow,
};

fn spec(title: &str, template_id: &str) -> CreationSpec {
    CreationSpec::new(
        title,
        DiagramMetadata::auto(template_id).with_alt(format!("{} diagram", title)),
    )
}

#[test]
fn batch_isolation() {
    let engine = Engine::builtin();
    let specs = vec![
        spec("first", DiagramType::Rectangle.template_id()),
        spec("second", "does.not.exist"),
        spec("third", DiagramType::NumberLine.template_id()),
    ];

    let results = DiagramFactory::new(&engine).create_batch(&specs);
    assert_eq!(results.len(), 3);
    assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);

    let first = results[0].as_ref().expect("first succeeds");
    assert_eq!(first.title, "first");
    assert!(matches!(results[1], Err(FactoryError::InvalidMetadata(_))));
    let third = results[2].as_ref().expect("third succeeds");
    assert_eq!(third.title, "third");
}

#[test]
fn large_batch_keeps_input_order() {
    let engine = Engine::builtin();
    let specs: Vec<_> = (0..64)
        .map(|i| {
            let ty = DiagramType::ALL[i % DiagramType::ALL.len()];
            let mut s = spec(&format!("item-{}", i), ty.template_id());
            if i % 7 == 3 {
                s.metadata.template_id = None;
            }
            s
        })
        .collect();

    let results = DiagramFactory::new(&engine).create_batch(&specs);
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(record) => assert_eq!(record.title, format!("item-{}", i)),
            Err(_) => assert_eq!(i % 7, 3, "item {} failed unexpectedly: {:?}", i, result),
        }
    }
}

#[test]
fn import_rows_flow_into_batch() {
    let rows: Vec<ImportRow> = serde_json::from_str(
        r#"[
            {"title": "Circle", "templateId": "circle", "alt": "A circle", "tags": "geometry;circles",
             "params": {"values": {"radius": 7}}},
            {"title": "", "templateId": "circle"},
            {"title": "Bars", "templateId": "barChart", "mode": "template", "alt": "Bar chart"}
        ]"#,
    )
    .expect("rows parse");

    let converted = specs_from_rows(rows);
    assert!(converted[1].is_err());
    let specs: Vec<CreationSpec> = converted.into_iter().filter_map(Result::ok).collect();
    assert_eq!(specs.len(), 2);

    let engine = Engine::builtin();
    let results = DiagramFactory::new(&engine).create_batch(&specs);
    let circle = results[0].as_ref().expect("circle created");
    assert_eq!(circle.tags, vec!["geometry", "circles"]);
    assert_eq!(
        circle.metadata.template_id(),
        Some(DiagramType::Circle.template_id())
    );
    assert!(results[1].is_ok());
}

#[test]
fn invalid_params_fail_only_their_item() {
    let engine = Engine::builtin();
    let bad = CreationSpec::new(
        "bad circle",
        DiagramMetadata::template(DiagramType::Circle.template_id())
            .with_alt("bad")
            .with_params(DiagramParams::new().with_value("radius", "wide")),
    );
    let good = spec("good", DiagramType::Circle.template_id());

    let results = DiagramFactory::new(&engine).create_batch(&[bad, good]);
    match &results[0] {
        Err(FactoryError::InvalidMetadata(errors)) => {
            assert!(errors.iter().any(|e| e.contains("radius")))
        }
        other => panic!("expected invalid metadata, got {:?}", other),
    }
    assert!(results[1].is_ok());
}
