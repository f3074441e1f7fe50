use ir::{BinaryOp, Field, LengthExpr, Reply};
use wirebind_codegen::generators::field_accessor::length_bound;
use wirebind_codegen::FieldAccessorGenerator;

/// `query_tree`-like reply: two scalars and a list sized by another field
fn create_query_tree_reply() -> Reply {
    Reply::new(vec![
        Field::scalar("root", "xcb_window_t"),
        Field::scalar("parent", "xcb_window_t"),
        Field::list("children", "xcb_window_t", LengthExpr::field("children_len")),
    ])
}

/// Text between `from` and the next `;` in `text`
fn extract_bound<'a>(text: &'a str, from: &str) -> &'a str {
    let start = text.find(from).map(|i| i + from.len()).unwrap_or_default();
    let rest = &text[start..];
    &rest[..rest.find(';').unwrap_or(rest.len())]
}

#[test]
fn test_scalar_accessor() {
    let reply = Reply::new(vec![Field::scalar("focus", "xcb_window_t")]);
    let generator = FieldAccessorGenerator::new("get_input_focus", "xcb_get_input_focus", &reply);
    assert_eq!(
        generator.accessor(&reply.fields()[0]),
        "      xcb_window_t\n      focus(void) const\n      {\n        return this->get()->focus;\n      }"
    );
    assert_eq!(generator.reply_type(), "xcb_get_input_focus_reply_t");
}

#[test]
fn test_single_scalar_reply_has_one_plain_accessor() {
    let reply = Reply::new(vec![Field::scalar("focus", "xcb_window_t")]);
    let generator = FieldAccessorGenerator::new("get_input_focus", "xcb_get_input_focus", &reply);

    assert_eq!(generator.accessors().len(), 1);
    assert!(generator.specializations().is_empty());

    let class = generator.make_payload_class();
    assert!(!class.contains("template<"));
    assert_eq!(class.matches("focus(void) const").count(), 1);
    assert!(class.contains("const xcb_get_input_focus_reply_t * const"));
}

#[test]
fn test_list_accessor_and_specialization() {
    let reply = create_query_tree_reply();
    let generator = FieldAccessorGenerator::new("query_tree", "xcb_query_tree", &reply);
    let children = &reply.fields()[2];

    let accessor = generator.accessor(children);
    assert!(accessor.contains("template<typename Children = xcb_window_t>"));
    assert!(accessor.contains("xpp::generic::list<Children>\n      children(void) const"));

    let specialization = generator.specialization(children).expect("list field specialization");
    assert!(specialization.starts_with("template<>\ninline\n"));
    assert!(specialization.contains("query_tree::children<xcb_window_t>(void) const"));
    assert!(specialization.contains("xcb_query_tree_children(this->get())"));

    assert!(generator.specialization(&reply.fields()[0]).is_none());
}

#[test]
fn test_list_accessors_share_their_bound() {
    let expr = LengthExpr::op(
        BinaryOp::Mul,
        LengthExpr::field("num_items"),
        LengthExpr::Popcount { popcount: Box::new(LengthExpr::field("mask")) },
    );
    let reply = Reply::new(vec![Field::list("items", "uint32_t", expr)]);
    let generator = FieldAccessorGenerator::new("get_items", "xcb_test_get_items", &reply);
    let field = &reply.fields()[0];

    let bound = length_bound(field).expect("list bound");
    assert_eq!(
        bound,
        "static_cast<std::size_t>((this->get()->num_items * xcb_popcount(this->get()->mask)))"
    );

    let accessor = generator.accessor(field);
    let specialization = generator.specialization(field).expect("specialization");
    let from_accessor = extract_bound(&accessor, "(*this, ");
    let from_specialization = extract_bound(&specialization, "(this->get()), ");
    assert_eq!(from_accessor, from_specialization);
    assert!(from_accessor.starts_with(&bound));
}

#[test]
fn test_constant_length() {
    let field = Field::list("keys", "uint8_t", LengthExpr::value(32));
    assert_eq!(length_bound(&field).as_deref(), Some("static_cast<std::size_t>(32)"));
    assert!(length_bound(&Field::scalar("root", "xcb_window_t")).is_none());
}

#[test]
fn test_accessors_follow_declaration_order() {
    let reply = create_query_tree_reply();
    let generator = FieldAccessorGenerator::new("query_tree", "xcb_query_tree", &reply);
    let class = generator.make_payload_class();

    let root = class.find("root(void)").expect("root accessor");
    let parent = class.find("parent(void)").expect("parent accessor");
    let children = class.find("children(void)").expect("children accessor");
    let specialization = class.find("template<>").expect("specialization");
    let end_of_class = class.find("}; // class query_tree").expect("end of class");

    assert!(root < parent && parent < children);
    // specializations follow the payload class
    assert!(end_of_class < specialization);
    assert!(class.starts_with("namespace reply { namespace detail {"));
}

#[test]
fn test_keyword_field_names_are_escaped() {
    let reply = Reply::new(vec![Field::scalar("class", "uint8_t")]);
    let generator =
        FieldAccessorGenerator::new("get_window_attributes", "xcb_get_window_attributes", &reply);
    let accessor = generator.accessor(&reply.fields()[0]);
    assert!(accessor.contains("class_(void) const"));
    assert!(accessor.contains("return this->get()->class;"));
}
