// codegen/src/utils.rs

/// C++ keywords that collide with protocol operation or field names
const CPP_KEYWORDS: &[&str] = &[
    "and", "bool", "char", "class", "default", "delete", "double", "explicit", "float", "friend",
    "int", "long", "namespace", "new", "not", "operator", "or", "private", "protected", "public",
    "register", "short", "signed", "template", "this", "typename", "union", "unsigned", "using",
    "virtual", "void", "xor",
];

/// Convert snake_case to PascalCase
///
/// # Examples
/// ```
/// use wirebind_codegen::utils::snake_to_pascal_case;
/// assert_eq!(snake_to_pascal_case("value_list"), "ValueList");
/// assert_eq!(snake_to_pascal_case("rect"), "Rect");
/// ```
pub fn snake_to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Sanitizes protocol names to be valid C++ identifiers
///
/// Keywords gain a trailing underscore; C symbol names are never passed through here.
pub fn sanitize_cpp_identifier(name: &str) -> String {
    if CPP_KEYWORDS.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Join `items` with `", "`, prefixed by a separator when non-empty
///
/// Used to append a list after a fixed leading argument such as the connection.
pub fn leading_comma_join(items: &[String]) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!(", {}", items.join(", "))
    }
}

/// `xcb_` followed by the namespace prefix (with separator) when there is one
pub fn symbol_base(prefix: &str) -> String {
    if prefix.is_empty() {
        "xcb_".to_string()
    } else {
        format!("xcb_{}_", prefix)
    }
}
