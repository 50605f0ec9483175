use oxc::syntax::identifier;

use crate::concat_string;

pub fn is_valid_identifier_name(name: &str) -> bool {
  identifier::is_identifier_name(name)
}

/// Quotes `value` as a JavaScript string literal. JSON escaping is a strict
/// subset of what JavaScript accepts, so `serde_json` does the work.
pub fn js_string_literal(value: &str) -> String {
  serde_json::to_string(value).unwrap()
}

pub fn property_access_str(obj: &str, prop: &str) -> String {
  if is_valid_identifier_name(prop) {
    concat_string!(obj, ".", prop)
  } else {
    concat_string!(obj, "[", js_string_literal(prop), "]")
  }
}

/// Derives the loader-variable name a factory uses for an import source:
/// `./math.js` becomes `_math_`, `./src/utils/math.js` becomes
/// `_src_utils_math_`. The leading `./` and a trailing `.js` are dropped,
/// every remaining non-alphanumeric byte becomes `_`, and the result is
/// wrapped in underscores so it cannot collide with ordinary user bindings.
pub fn binding_name_for_specifier(specifier: &str) -> String {
  let trimmed = specifier.strip_prefix("./").unwrap_or(specifier);
  let trimmed = trimmed.strip_suffix(".js").unwrap_or(trimmed);

  let mut name = String::with_capacity(trimmed.len() + 2);
  name.push('_');
  for ch in trimmed.chars() {
    name.push(if ch.is_ascii_alphanumeric() { ch } else { '_' });
  }
  name.push('_');
  name
}

/// Derives a chunk id from a module id: `./src/feature-a.js` becomes
/// `src_feature-a_js`. Path separators and dots map to `_`; everything else
/// (hyphens included) survives so the id stays recognizable.
pub fn derive_chunk_id(module_id: &str) -> String {
  let trimmed = module_id.strip_prefix("./").unwrap_or(module_id);
  trimmed.chars().map(|ch| if ch == '/' || ch == '.' { '_' } else { ch }).collect()
}

#[test]
fn test_is_valid_identifier_name() {
  assert!(is_valid_identifier_name("foo"));
  assert!(!is_valid_identifier_name("1aaaa"));
  assert!(!is_valid_identifier_name("has-dash"));
}

#[test]
fn test_property_access_str() {
  assert_eq!(property_access_str("_math_", "add"), "_math_.add");
  assert_eq!(property_access_str("_greet_", "default"), "_greet_.default");
  assert_eq!(property_access_str("_m_", "weird-name"), "_m_[\"weird-name\"]");
}

#[test]
fn test_binding_name_for_specifier() {
  assert_eq!(binding_name_for_specifier("./math.js"), "_math_");
  assert_eq!(binding_name_for_specifier("./src/utils/math.js"), "_src_utils_math_");
  assert_eq!(binding_name_for_specifier("./data.json"), "_data_json_");
  assert_eq!(binding_name_for_specifier("../shared/helper.js"), "____shared_helper_");
}

#[test]
fn test_derive_chunk_id() {
  assert_eq!(derive_chunk_id("./src/feature-a.js"), "src_feature-a_js");
  assert_eq!(derive_chunk_id("./a.js"), "a_js");
  assert_eq!(derive_chunk_id("./src/shared-utils.js"), "src_shared-utils_js");
}
