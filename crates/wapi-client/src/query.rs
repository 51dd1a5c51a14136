//! Query parameter helpers
//!
//! WAPI takes filters, return fields and paging directives as URL query
//! parameters. [`QueryParams`] keeps them in insertion order and replaces
//! the value of a key that is inserted twice.

use std::fmt;

/// Request all records in pages
pub const PAGING: &str = "_paging";
/// Wrap results in `{"result": [...], "next_page_id": ...}`
pub const RETURN_AS_OBJECT: &str = "_return_as_object";
/// Page size (paged) or server-side result cap (unpaged)
pub const MAX_RESULTS: &str = "_max_results";
/// Continuation token from the previous page
pub const PAGE_ID: &str = "_page_id";
/// Exclusive return field list
pub const RETURN_FIELDS: &str = "_return_fields";
/// Base fields plus the listed extras
pub const RETURN_FIELDS_PLUS: &str = "_return_fields+";

/// Sentinel return field naming the server's base field set
pub const DEFAULT_FIELDS: &str = "default";

/// Ordered query parameter map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from caller filters, e.g. `[("name~", "^web")]`
    pub fn from_filters(filters: &[(&str, &str)]) -> Self {
        let mut params = Self::new();
        for (key, value) in filters {
            params.insert(*key, *value);
        }
        params
    }

    /// Insert a parameter, replacing any existing value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Merge another parameter set into this one
    pub fn extend(&mut self, other: QueryParams) {
        for (key, value) in other.pairs {
            self.insert(key, value);
        }
    }

    /// Look up a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether no parameters are set
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Parameters as `(key, value)` pairs, in insertion order
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        f.write_str(&joined)
    }
}

/// Build the return field parameter for a field list.
///
/// If `fields` contains `"default"`, the sentinel is dropped and the rest
/// go out as `_return_fields+` (base fields plus extras). Otherwise the list
/// goes out as `_return_fields`. An empty list adds nothing.
pub fn build_return_fields(fields: &[&str]) -> QueryParams {
    let mut params = QueryParams::new();
    if fields.is_empty() {
        return params;
    }

    if fields.contains(&DEFAULT_FIELDS) {
        let extras: Vec<&str> = fields
            .iter()
            .copied()
            .filter(|f| *f != DEFAULT_FIELDS)
            .collect();
        params.insert(RETURN_FIELDS_PLUS, extras.join(","));
    } else {
        params.insert(RETURN_FIELDS, fields.join(","));
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sentinel_uses_additive_form() {
        let params = build_return_fields(&["default", "extattrs"]);
        assert_eq!(params.get(RETURN_FIELDS_PLUS), Some("extattrs"));
        assert_eq!(params.get(RETURN_FIELDS), None);
    }

    #[test]
    fn test_plain_fields_use_exclusive_form() {
        let params = build_return_fields(&["name", "ipv4addrs"]);
        assert_eq!(params.get(RETURN_FIELDS), Some("name,ipv4addrs"));
        assert_eq!(params.get(RETURN_FIELDS_PLUS), None);
    }

    #[test]
    fn test_default_alone_requests_base_fields() {
        let params = build_return_fields(&["default"]);
        assert_eq!(params.get(RETURN_FIELDS_PLUS), Some(""));
    }

    #[test]
    fn test_empty_fields_add_nothing() {
        assert!(build_return_fields(&[]).is_empty());
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut params = QueryParams::from_filters(&[("name", "a"), ("view", "default")]);
        params.insert("name", "b");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("name"), Some("b"));
        assert_eq!(params.to_string(), "name=b&view=default");
    }
}
