use ir::{Field, LengthExpr, Namespace, Parameter, Reply, Request, RequestKind, Resource};
use wirebind_codegen::{c_name, CodegenError, Host, RequestBinding, ResourceFragments};

/// Helper creating a namespace with method injection enabled
fn create_test_namespace(name: &str, prefix: &str) -> Namespace {
    Namespace::new(name, prefix).expect("valid namespace").with_method_injection(true)
}

/// Helper creating a request in namespace `ns`
fn create_test_request(
    ns: &str,
    name: &str,
    kind: RequestKind,
    parameters: Vec<Parameter>,
) -> Request {
    Request::new(name, ns, kind, parameters).expect("valid request")
}

fn create_fragments() -> ResourceFragments {
    ResourceFragments::from_resources(&Resource::x_core_defaults())
}

fn create_get_window_attributes() -> Request {
    create_test_request(
        "x",
        "get_window_attributes",
        RequestKind::Reply(Reply::new(vec![Field::scalar("map_state", "uint8_t")])),
        vec![Parameter::scalar("window", "xcb_window_t")],
    )
}

#[test]
fn test_c_name() {
    let x = create_test_namespace("x", "");
    let randr = create_test_namespace("randr", "randr");

    let map_window = create_test_request("x", "map_window", RequestKind::Void, vec![]);
    assert_eq!(c_name(&x, &map_window, true), "xcb_map_window");
    assert_eq!(c_name(&x, &map_window, false), "xcb_map_window_checked");

    let screen_info = create_test_request(
        "randr",
        "get_screen_info",
        RequestKind::Reply(Reply::default()),
        vec![Parameter::scalar("window", "xcb_window_t")],
    );
    assert_eq!(c_name(&randr, &screen_info, true), "xcb_randr_get_screen_info");
    assert_eq!(c_name(&randr, &screen_info, false), "xcb_randr_get_screen_info_unchecked");
}

#[test]
fn test_void_zero_parameters() {
    let ns = create_test_namespace("x", "");
    let request = create_test_request("x", "grab_server", RequestKind::Void, vec![]);
    let mut binding = RequestBinding::new(&ns, &request);

    assert!(binding.is_void());
    assert_eq!(binding.comma(), "");
    assert!(binding.calls(false).is_empty());
    assert!(binding.protos(false, true).expect("protos").is_empty());
    assert_eq!(binding.c_name(true), "xcb_grab_server");
    assert_eq!(binding.c_name(false), "xcb_grab_server_checked");

    let text = binding.make_class().expect("void free functions");
    assert!(text.contains("grab_server_checked(Connection && c, Parameter && ... parameter)"));
    assert!(text.contains("\ngrab_server(Connection && c, Parameter && ... parameter)"));
    assert!(text.contains("xcb_grab_server_checked(std::forward<Connection>(c),"));
    assert!(text.contains("  xcb_grab_server(std::forward<Connection>(c),"));
    assert!(!text.contains("_unchecked"));
}

#[test]
fn test_reply_free_functions() {
    let ns = create_test_namespace("x", "");
    let request = create_get_window_attributes();
    let mut binding = RequestBinding::new(&ns, &request);
    let text = binding.make_class().expect("reply classes");

    assert!(text.contains(
        "reply::get_window_attributes<Connection, xpp::generic::checked_tag>\nget_window_attributes(Connection && c, Parameter && ... parameter)"
    ));
    assert!(text.contains(
        "reply::get_window_attributes<Connection, xpp::generic::unchecked_tag>\nget_window_attributes_unchecked(Connection && c, Parameter && ... parameter)"
    ));
    assert!(!text.contains("get_window_attributes_checked"));

    // blank line between the classes and the free functions
    let functions = text
        .find("template<typename Connection, typename ... Parameter>\nreply::")
        .expect("free functions");
    assert_eq!(&text[functions - 2..functions], "\n\n");

    assert_eq!(binding.make_proto(), "  class get_window_attributes;");
    assert!(binding.make_accessors().contains("map_state(void) const"));
}

#[test]
fn test_single_scalar_reply_has_no_superfluous_overload() {
    let ns = create_test_namespace("x", "");
    let request = create_get_window_attributes();
    let mut binding = RequestBinding::new(&ns, &request);
    binding.make_wrapped();
    let text = binding.make_class().expect("reply classes");

    assert_eq!(text.matches("map_state(void) const").count(), 1);
    assert!(!text.contains("template<>"));
    assert!(!text.contains("xpp::generic::list"));
}

#[test]
fn test_make_wrapped_is_idempotent() {
    let ns = create_test_namespace("x", "");
    let request = create_test_request(
        "x",
        "poly_point",
        RequestKind::Void,
        vec![
            Parameter::scalar("drawable", "xcb_drawable_t"),
            Parameter::scalar("points_len", "uint32_t"),
            Parameter::iterator("points", "xcb_point_t", Some("points_len")),
        ],
    );

    let mut once = RequestBinding::new(&ns, &request);
    once.make_wrapped();
    let mut twice = RequestBinding::new(&ns, &request);
    twice.make_wrapped().make_wrapped();

    assert!(twice.is_wrapped());
    assert_eq!(once.make_class().expect("once"), twice.make_class().expect("twice"));

    let mut plain = RequestBinding::new(&ns, &request);
    assert!(!plain.is_wrapped());
    assert!(plain
        .make_class()
        .expect("plain")
        .contains("xcb_poly_point_checked(std::forward<Connection>(c),"));
}

#[test]
fn test_method_injection_strips_fragment() {
    let ns = create_test_namespace("x", "");
    let fragments = create_fragments();
    let request = create_get_window_attributes();
    let binding = RequestBinding::new(&ns, &request);

    let connection =
        binding.make_object_class_inline(Host::Connection, &fragments).expect("connection");
    assert!(connection.contains("    get_window_attributes(Parameter && ... parameter) const"));
    assert!(connection
        .contains("xpp::x::get_window_attributes(static_cast<const Connection &>(*this),"));
    assert!(connection.contains("          std::forward<Parameter>(parameter) ...);"));

    let window = Resource::new("window", "xcb_window_t");
    let method =
        binding.make_object_class_inline(Host::Resource(&window), &fragments).expect("window");
    assert!(method.contains("    get_attributes(Parameter && ... parameter) const"));
    assert!(method.contains("    get_attributes_unchecked(Parameter && ... parameter) const"));
    assert!(method.contains(
        "xpp::x::get_window_attributes(this->connection(),\n          *this, std::forward<Parameter>(parameter) ...);"
    ));
}

#[test]
fn test_gcontext_uses_exception_fragment() {
    let ns = create_test_namespace("x", "");
    let fragments = create_fragments();
    let request = create_test_request(
        "x",
        "free_gc",
        RequestKind::Void,
        vec![Parameter::scalar("gc", "xcb_gcontext_t")],
    );
    let binding = RequestBinding::new(&ns, &request);
    let gcontext = Resource::new("gcontext", "xcb_gcontext_t");

    let text = binding
        .make_object_class_inline(Host::Resource(&gcontext), &fragments)
        .expect("gcontext");
    assert!(text.contains("    free_checked(Parameter && ... parameter) const"));
    assert!(text.contains("    free(Parameter && ... parameter) const"));
    assert!(text.contains("xpp::x::free_gc_checked(this->connection(),"));
}

#[test]
fn test_unknown_resource_fragment() {
    let ns = create_test_namespace("x", "");
    let fragments = create_fragments();
    let request = create_test_request(
        "x",
        "query_tree",
        RequestKind::Reply(Reply::default()),
        vec![Parameter::scalar("window", "xcb_window_t")],
    );
    let binding = RequestBinding::new(&ns, &request);
    let window = Resource::new("window", "xcb_window_t");

    match binding.make_object_class_inline(Host::Resource(&window), &fragments) {
        Err(CodegenError::UnknownResourceFragment { operation, resource, fragment }) => {
            assert_eq!(operation, "query_tree");
            assert_eq!(resource, "window");
            assert_eq!(fragment, "window");
        }
        other => panic!("expected unknown resource fragment, got {:?}", other),
    }
}

#[test]
fn test_generate_selects_hosts() {
    let ns = create_test_namespace("x", "");
    let fragments = create_fragments();

    let request = create_get_window_attributes();
    let output = RequestBinding::new(&ns, &request).generate(&fragments).expect("generate");
    let hosts: Vec<&str> = output.methods.iter().map(|m| m.host.as_str()).collect();
    assert_eq!(hosts, vec!["connection", "window"]);
    assert!(output.host_failures.is_empty());
    assert_eq!(output.declaration.as_deref(), Some("  class get_window_attributes;"));
    assert_eq!(output.operation, "get_window_attributes");
    assert_eq!(output.namespace, "x");

    // the first parameter is a window but the name does not embed its fragment
    let query_tree = create_test_request(
        "x",
        "query_tree",
        RequestKind::Reply(Reply::default()),
        vec![Parameter::scalar("window", "xcb_window_t")],
    );
    let output = RequestBinding::new(&ns, &query_tree).generate(&fragments).expect("generate");
    let hosts: Vec<&str> = output.methods.iter().map(|m| m.host.as_str()).collect();
    assert_eq!(hosts, vec!["connection"]);
    assert!(!output.free_functions.is_empty());
    match output.host_failures.as_slice() {
        [CodegenError::UnknownResourceFragment { operation, resource, .. }] => {
            assert_eq!(operation, "query_tree");
            assert_eq!(resource, "window");
        }
        other => panic!("expected one skipped window host, got {:?}", other),
    }
}

#[test]
fn test_generate_without_injection() {
    let ns = Namespace::new("x", "").expect("valid namespace");
    let request = create_test_request("x", "grab_server", RequestKind::Void, vec![]);
    let output =
        RequestBinding::new(&ns, &request).generate(&create_fragments()).expect("generate");
    assert!(output.methods.is_empty());
    assert!(output.declaration.is_none());
    assert!(!output.free_functions.is_empty());
}

#[test]
fn test_malformed_parameter_order_aborts_operation() {
    let ns = create_test_namespace("x", "");
    let request = create_test_request(
        "x",
        "get_motion_events",
        RequestKind::Reply(Reply::new(vec![
            Field::scalar("events_len", "uint32_t"),
            Field::list("events", "xcb_timecoord_t", LengthExpr::field("events_len")),
        ])),
        vec![
            Parameter::scalar("start", "xcb_timestamp_t").with_default("XCB_TIME_CURRENT_TIME"),
            Parameter::scalar("window", "xcb_window_t"),
        ],
    );
    let result = RequestBinding::new(&ns, &request).generate(&create_fragments());
    assert!(matches!(result, Err(CodegenError::MalformedParameterOrder { .. })));
}

#[test]
fn test_keyword_operation_names_are_escaped() {
    let ns = create_test_namespace("x", "");
    let request = create_test_request("x", "delete", RequestKind::Void, vec![]);
    let mut binding = RequestBinding::new(&ns, &request);

    assert_eq!(binding.identifier(), "delete_");
    assert_eq!(binding.c_name(true), "xcb_delete");
    let text = binding.make_class().expect("void free functions");
    assert!(text.contains("delete__checked(Connection && c"));
    assert!(text.contains("  xcb_delete(std::forward<Connection>(c),"));
}
