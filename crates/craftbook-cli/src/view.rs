//! Shareable view state encoded as a URL query string.
//!
//! Keys: `id`, `multiplier`, `showResources`, `expandAll`, `expandAllFarmer`
//! and a repeatable `expand` naming one ingredient to open.

use crate::render::parse_multiplier;
use craftbook_core::ExpandPolicy;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub id: Option<String>,
    pub multiplier: f64,
    pub show_resources: bool,
    pub expand_all: bool,
    pub expand_all_farmer: bool,
    pub expand: Vec<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            id: None,
            multiplier: 1.0,
            show_resources: false,
            expand_all: false,
            expand_all_farmer: false,
            expand: Vec::new(),
        }
    }
}

impl ViewState {
    /// Parse a query string, with or without the leading `?`. Unknown keys
    /// are ignored; an empty `id` means no selection. A missing or unusable
    /// multiplier leaves `default_multiplier` in place.
    pub fn from_query(query: &str, default_multiplier: f64) -> Self {
        let mut state = Self {
            multiplier: default_multiplier,
            ..Self::default()
        };
        let query = query.trim().trim_start_matches('?');

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value);
            match decode_component(key).as_str() {
                "id" => state.id = Some(value).filter(|id| !id.is_empty()),
                "multiplier" => {
                    if let Some(multiplier) = parse_multiplier(&value) {
                        state.multiplier = multiplier;
                    }
                }
                "showResources" => state.show_resources = is_true(&value),
                "expandAll" => state.expand_all = is_true(&value),
                "expandAllFarmer" => state.expand_all_farmer = is_true(&value),
                "expand" if !value.is_empty() => state.expand.push(value),
                _ => {}
            }
        }
        state
    }

    pub fn to_query(&self) -> String {
        let mut query = String::new();
        if let Some(id) = &self.id {
            let _ = write!(query, "id={}&", encode_component(id));
        }
        let _ = write!(query, "multiplier={}", self.multiplier);
        if self.show_resources {
            query.push_str("&showResources=true");
        }
        if self.expand_all {
            query.push_str("&expandAll=true");
        }
        if self.expand_all_farmer {
            query.push_str("&expandAllFarmer=true");
        }
        for id in &self.expand {
            let _ = write!(query, "&expand={}", encode_component(id));
        }
        query
    }

    pub fn expand_policy(&self) -> ExpandPolicy {
        let policy = ExpandPolicy {
            crafting: self.expand_all,
            gathering: self.expand_all_farmer,
            ..ExpandPolicy::default()
        };
        self.expand
            .iter()
            .fold(policy, |policy, id| policy.with_item(id.as_str()))
    }
}

fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

/// Decode `+` and `%XX` escapes. Malformed escapes are kept verbatim.
fn decode_component(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                out.push((hex_value(bytes[i + 1]) << 4) | hex_value(bytes[i + 2]));
                i += 3;
                continue;
            }
            other => out.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_keys() {
        let state = ViewState::from_query(
            "?id=sword&multiplier=5&showResources=true&expandAll=true&expandAllFarmer=TRUE",
            1.0,
        );
        assert_eq!(state.id.as_deref(), Some("sword"));
        assert_eq!(state.multiplier, 5.0);
        assert!(state.show_resources);
        assert!(state.expand_all);
        assert!(state.expand_all_farmer);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let state = ViewState::from_query("", 1.0);
        assert_eq!(state, ViewState::default());

        let state = ViewState::from_query("id=&expandAll=yes&unknown=1", 1.0);
        assert_eq!(state.id, None);
        assert!(!state.expand_all);
        assert!(!state.show_resources);
    }

    #[test]
    fn invalid_multiplier_keeps_default() {
        assert_eq!(ViewState::from_query("multiplier=abc", 1.0).multiplier, 1.0);
        assert_eq!(ViewState::from_query("multiplier=2.5x", 1.0).multiplier, 2.5);
        assert_eq!(ViewState::from_query("multiplier=-3", 4.0).multiplier, 4.0);
        assert_eq!(ViewState::from_query("id=sword", 4.0).multiplier, 4.0);
    }

    #[test]
    fn decodes_escapes() {
        let state = ViewState::from_query("id=golden%20apple", 1.0);
        assert_eq!(state.id.as_deref(), Some("golden apple"));

        let state = ViewState::from_query("id=golden+apple", 1.0);
        assert_eq!(state.id.as_deref(), Some("golden apple"));

        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz"), "%zz");
    }

    #[test]
    fn to_query_round_trips() {
        let state = ViewState {
            id: Some("golden apple".to_string()),
            multiplier: 0.5,
            show_resources: true,
            expand_all: true,
            expand_all_farmer: false,
            expand: vec!["hilt".to_string(), "oak plank".to_string()],
        };
        let query = state.to_query();
        assert_eq!(
            query,
            "id=golden%20apple&multiplier=0.5&showResources=true&expandAll=true\
             &expand=hilt&expand=oak%20plank"
        );
        assert_eq!(ViewState::from_query(&query, 1.0), state);
    }

    #[test]
    fn expand_policy_follows_flags_and_items() {
        let policy = ViewState::from_query("expandAllFarmer=true&expand=hilt&expand=", 1.0)
            .expand_policy();
        assert!(!policy.crafting);
        assert!(policy.gathering);
        assert_eq!(policy.items.len(), 1);
        assert!(policy.items.contains("hilt"));
    }
}
