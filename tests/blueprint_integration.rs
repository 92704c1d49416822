//! Custom-mode diagrams rendered through the engine

use diagram_engine::blueprint::{check_expressions, Resolver};
use diagram_engine::{render, validate, Blueprint, DiagramMetadata, DiagramMode, DiagramParams};
use serde_json::json;

fn blueprint(value: serde_json::Value) -> Blueprint {
    serde_json::from_value(value).expect("valid blueprint")
}

fn right_triangle() -> Blueprint {
    blueprint(json!({
        "version": 1,
        "viewBox": "0 0 300 200",
        "layers": [
            {"id": "labels", "z": 2, "items": [
                {"id": "A", "type": "text", "at": "{{positions.A}}", "text": "{{labels.A}}", "anchor": "end"}
            ]},
            {"id": "shape", "z": 1, "items": [
                {"id": "tri", "type": "polygon", "points": ["{{positions.A}}", "{{positions.B}}", "{{positions.C}}"]},
                {"id": "AB", "type": "tickMark", "from": "{{positions.A}}", "to": "{{positions.B}}"},
                {"id": "B", "type": "angleMarker", "vertex": "{{positions.B}}", "from": "{{positions.A}}", "to": "{{positions.C}}", "r": 20, "label": "{{labels.angle}}"},
                {"id": "hyp", "type": "line", "from": "{{positions.A}}", "to": "{{positions.C}}",
                 "style": {"stroke-width": "{{mul(values.weight, 2)}}"}}
            ]}
        ]
    }))
}

fn triangle_params() -> DiagramParams {
    DiagramParams::new()
        .with_position("A", 40.0, 160.0)
        .with_position("B", 240.0, 160.0)
        .with_position("C", 240.0, 40.0)
        .with_label("A", "A")
        .with_label("angle", "90°")
        .with_value("weight", 1.5)
}

#[test]
fn custom_metadata_renders_blueprint() {
    let meta = DiagramMetadata::custom(right_triangle()).with_params(triangle_params());
    let result = render(&meta);

    assert_eq!((result.width, result.height), (300.0, 200.0));
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert!(result.svg.contains(r#"<g id="grp:blueprint">"#));
    assert!(result.svg.contains(r#"points="40,160 240,160 240,40""#));
    assert!(result.svg.contains(r#"id="mk:AB""#));
    assert!(result.svg.contains(r#"id="arc:B""#));
    assert!(result.svg.contains(">90°</text>"));
    assert!(result.svg.contains(r#"stroke-width="3""#));

    // z=1 layer comes before z=2 even though it is declared second
    let shape = result.svg.find("grp:shape").expect("shape layer");
    let labels = result.svg.find("grp:labels").expect("labels layer");
    assert!(shape < labels);
}

#[test]
fn bad_shapes_do_not_abort_the_diagram() {
    let bp = blueprint(json!({
        "viewBox": {"width": 100, "height": 100},
        "layers": [{"id": "main", "items": [
            {"id": "mystery", "type": "star"},
            {"id": "broken", "type": "circle", "center": {"x": 50, "y": 50}, "r": -4},
            {"id": "vague", "type": "line", "from": "{{sqrt(4)}}", "to": {"x": 10, "y": 10}},
            {"id": "fine", "type": "rect", "x": 10, "y": 10, "width": 20, "height": 20}
        ]}]
    }));
    let result = render(&DiagramMetadata::custom(bp));

    assert!(!result.is_empty());
    assert!(result.svg.contains(r#"id="face:fine""#));
    assert!(!result.svg.contains("mystery"));
    assert!(!result.svg.contains("path:broken"));
    // Unresolved expression still draws, from the origin
    assert!(result.svg.contains(r#"id="ln:vague" class="diagram-line" x1="0" y1="0""#));
    assert_eq!(result.warnings.len(), 3, "{:?}", result.warnings);
    assert!(result.warnings.iter().any(|w| w.contains("Unknown helper \"sqrt\"")));
}

#[test]
fn auto_mode_with_blueprint_and_no_template() {
    let meta = DiagramMetadata {
        mode: DiagramMode::Auto,
        custom: Some(right_triangle()),
        params: triangle_params(),
        ..DiagramMetadata::default()
    };
    assert!(!render(&meta).is_empty());
    assert!(validate(&meta).ok);
}

#[test]
fn expression_scenarios() {
    let ns = json!({"points": {"A": {"x": 3, "y": 4}}});
    let resolver = Resolver::new(&ns);
    assert_eq!(resolver.resolve_number(&json!("{{points.A.x}}")), Ok(3.0));
    assert_eq!(
        resolver.resolve_number(&json!("{{distance(points.A, points.A)}}")),
        Ok(0.0)
    );
}

#[test]
fn empty_blueprint_renders_blank_canvas_with_validation_warning() {
    let bp = blueprint(json!({"viewBox": "0 0 50 40"}));
    let meta = DiagramMetadata::custom(bp);
    let result = render(&meta);
    assert!(result.svg.contains(r#"viewBox="0 0 50 40""#));
    assert_eq!(validate(&meta).warnings, vec!["Custom blueprint has no layers"]);
}

#[test]
fn blueprint_style_cannot_inject_handlers_or_external_resources() {
    let bp = blueprint(json!({
        "viewBox": "0 0 40 40",
        "layers": [{"id": "main", "items": [{
            "id": "c", "type": "circle", "center": {"x": 20, "y": 20}, "r": 8,
            "style": {"onload": "alert(1)", "onclick": "steal()", "fill": "url(https://evil.example/x.svg#g)"}
        }]}]
    }));
    let result = render(&DiagramMetadata::custom(bp));

    assert!(result.svg.contains(r#"id="path:c""#));
    for needle in ["onload", "onclick", "alert", "https:"] {
        assert!(!result.svg.contains(needle), "{} leaked into markup", needle);
    }
    assert_eq!(result.warnings.len(), 3, "{:?}", result.warnings);
    assert!(result.warnings.iter().all(|w| w.contains("dropped")));
}

#[test]
fn malformed_expressions_are_reported_before_rendering() {
    let bp = blueprint(json!({
        "viewBox": "0 0 40 40",
        "layers": [{"id": "main", "items": [
            {"id": "ok", "type": "line", "from": "{{positions.A}}", "to": {"x": 1, "y": 1}},
            {"id": "bad", "type": "line", "from": "{{mul(values.a,, 2)}}", "to": {"x": 1, "y": 1}}
        ]}]
    }));
    let issues = check_expressions(&bp);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].location, "main/bad.from");
    assert!(issues[0].report().contains("main/bad.from"));
}
