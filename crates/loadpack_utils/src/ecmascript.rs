use oxc::syntax::identifier;

use crate::concat_string;

pub fn is_validate_identifier_name(name: &str) -> bool {
  identifier::is_identifier_name(name)
}

/// Render `value` as a double-quoted JavaScript string literal.
pub fn to_js_string_literal(value: &str) -> String {
  serde_json::Value::from(value).to_string()
}

pub fn property_access_str(obj: &str, prop: &str) -> String {
  if is_validate_identifier_name(prop) {
    concat_string!(obj, ".", prop)
  } else {
    concat_string!(obj, "[", to_js_string_literal(prop), "]")
  }
}

#[test]
fn test_property_access_str() {
  assert_eq!(property_access_str("m", "default"), "m.default");
  assert_eq!(property_access_str("m", "a-b"), "m[\"a-b\"]");
  assert_eq!(to_js_string_literal("a\"b\n"), "\"a\\\"b\\n\"");
}
