use std::fs;

use ir::{IrError, Protocol};
use wirebind_codegen::{
    clean_generated_source, generate_operation, write_generated, CodegenError, OperationFailure,
    ResourceFragments,
};

const PROTOCOL: &str = r#"{
  "namespaces": [ { "name": "x", "prefix": "", "inject_methods": true } ],
  "requests": [
    { "name": "get_geometry", "namespace": "x", "void": false,
      "parameters": [ { "name": "drawable", "type": "xcb_drawable_t" } ],
      "reply": { "fields": [ { "name": "width", "type": "uint16_t" } ] } },
    { "name": "get_keyboard_mapping", "namespace": "x", "void": false,
      "parameters": [ { "name": "first_keycode", "type": "xcb_keycode_t" } ],
      "reply": { "fields": [ { "name": "keysyms", "type": "xcb_keysym_t", "list": true } ] } },
    { "name": "free_pixmap", "namespace": "x", "void": true,
      "parameters": [ { "name": "pixmap", "type": "xcb_pixmap_t" } ] }
  ]
}"#;

fn load_protocol() -> Protocol { Protocol::from_json(PROTOCOL).expect("valid protocol") }

#[test]
fn test_generate_operation() {
    let protocol = load_protocol();
    let fragments = ResourceFragments::from_resources(protocol.resources());

    let output = generate_operation(&protocol, &protocol.requests()[0], &fragments, true)
        .expect("get_geometry");
    assert_eq!(output.operation, "get_geometry");
    assert!(output.free_functions.contains("xcb_get_geometry_reply_t"));
    let hosts: Vec<&str> = output.methods.iter().map(|m| m.host.as_str()).collect();
    assert_eq!(hosts, vec!["connection"]);
    assert!(matches!(
        output.host_failures.as_slice(),
        [CodegenError::UnknownResourceFragment { resource, .. }] if resource == "drawable"
    ));

    let output = generate_operation(&protocol, &protocol.requests()[2], &fragments, true)
        .expect("free_pixmap");
    let pixmap = output.methods.iter().find(|m| m.host == "pixmap").expect("pixmap host");
    assert!(pixmap.text.contains("    free(Parameter && ... parameter) const"));
}

#[test]
fn test_missing_length_expression() {
    let protocol = load_protocol();
    let fragments = ResourceFragments::from_resources(protocol.resources());

    match generate_operation(&protocol, &protocol.requests()[1], &fragments, true) {
        Err(CodegenError::MissingLengthExpression { field }) => assert_eq!(field, "keysyms"),
        other => panic!("expected missing length expression, got {:?}", other),
    }
}

#[test]
fn test_ir_errors_convert() {
    let err: CodegenError = IrError::EmptyName { what: "operation" }.into();
    assert!(matches!(err, CodegenError::Ir(IrError::EmptyName { .. })));
    assert_eq!(err.to_string(), "operation name is empty");

    let err: CodegenError = String::from("boom").into();
    assert_eq!(err.to_string(), "boom");
}

#[test]
fn test_operation_failure_names_operation() {
    let failure = OperationFailure {
        operation: "get_keyboard_mapping".into(),
        error: CodegenError::MissingLengthExpression { field: "keysyms".into() },
    };
    assert_eq!(
        failure.to_string(),
        "operation `get_keyboard_mapping`: list field `keysyms` has no length expression"
    );
}

#[test]
fn test_clean_generated_source() {
    assert_eq!(clean_generated_source("a  \nb\t\n\n\n"), "a\nb\n");
    assert_eq!(clean_generated_source("\n \n"), "");
}

#[test]
fn test_write_generated() {
    let dir = tempfile::tempdir().expect("temp dir");
    let files = vec![
        ("x.hpp".to_string(), "namespace xpp {   \n}\n\n".to_string()),
        ("nested/x_window_methods.inc".to_string(), "// methods\n".to_string()),
    ];
    write_generated(dir.path(), &files).expect("write generated");

    assert_eq!(
        fs::read_to_string(dir.path().join("x.hpp")).expect("header"),
        "namespace xpp {\n}\n"
    );
    assert!(dir.path().join("nested/x_window_methods.inc").exists());
}

#[test]
fn test_malformed_iterators_abort_generation() {
    let operation = |parameters: serde_json::Value| {
        format!(
            r#"{{ "namespaces": [ {{ "name": "x", "prefix": "" }} ],
                 "requests": [ {{ "name": "poly_point", "namespace": "x", "void": true,
                                  "parameters": {} }} ] }}"#,
            parameters
        )
    };
    let cases = [
        serde_json::json!([
            { "name": "drawable", "type": "xcb_drawable_t" },
            { "name": "points", "type": "xcb_point_t", "role": { "iterator": { "length": "points" } } }
        ]),
        serde_json::json!([
            { "name": "counts", "type": "uint32_t", "role": { "iterator": {} } },
            { "name": "points", "type": "xcb_point_t", "role": { "iterator": { "length": "counts" } } }
        ]),
        serde_json::json!([
            { "name": "points_len", "type": "uint32_t", "role": { "wrapped": { "group": "origin" } } },
            { "name": "points", "type": "xcb_point_t", "role": { "iterator": { "length": "points_len" } } }
        ]),
        serde_json::json!([
            { "name": "points_begin", "type": "uint32_t" },
            { "name": "points", "type": "xcb_point_t", "role": { "iterator": {} } }
        ]),
    ];

    for parameters in cases {
        let protocol = Protocol::from_json(&operation(parameters)).expect("valid protocol");
        let fragments = ResourceFragments::from_resources(protocol.resources());
        let result = generate_operation(&protocol, &protocol.requests()[0], &fragments, true);
        assert!(
            matches!(
                result,
                Err(CodegenError::Ir(
                    IrError::SelfLengthParameter { .. }
                        | IrError::LengthParameterRole { .. }
                        | IrError::ConflictingName { .. }
                ))
            ),
            "expected a rejected iterator, got {:?}",
            result.map(|o| o.free_functions)
        );
    }
}
