//! Device routing rules.
//!
//! A [`DeviceRule`] pairs a compiled regular expression with its original
//! source text. The source text is authoritative: it is what gets
//! serialized, compared, and reported; the compiled matcher is derived from
//! it and never leaves this type.
//!
//! Matching uses *search* semantics (`Regex::is_match`), not full-string
//! matching: the pattern `"Logitech"` matches the device string
//! `"Logitech USB Mouse"`. Callers that want an anchored match write the
//! anchors themselves (`"^Logitech.*"`).
//!
//! [`RuleMap`] groups rules per seat name in insertion order. Appends are
//! not deduplicated; removal takes out only the first rule whose source
//! text matches, and drops a seat's entry entirely once its list empties.

use std::collections::BTreeMap;

use regex::Regex;
use thiserror::Error;

/// Error type for device rule construction.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule pattern was empty.
    #[error("device rule pattern must not be empty")]
    EmptyPattern,

    /// The rule pattern failed to compile as a regular expression.
    #[error("invalid device rule pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A single device routing rule: compiled matcher plus source text.
#[derive(Debug, Clone)]
pub struct DeviceRule {
    source: String,
    matcher: Regex,
}

impl DeviceRule {
    /// Compiles `pattern` into a rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptyPattern`] for an empty pattern and
    /// [`RuleError::InvalidPattern`] when the pattern does not compile.
    pub fn parse(pattern: &str) -> Result<Self, RuleError> {
        if pattern.is_empty() {
            return Err(RuleError::EmptyPattern);
        }
        let matcher = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            matcher,
        })
    }

    /// The original pattern text this rule was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the rule matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

impl PartialEq for DeviceRule {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for DeviceRule {}

/// Ordered device rules keyed by seat name.
///
/// The map itself knows nothing about which seats actually exist; the
/// manager validates seat names before inserting. Iteration over seat names
/// is name-sorted and deterministic.
#[derive(Debug, Default)]
pub struct RuleMap {
    rules: BTreeMap<String, Vec<DeviceRule>>,
}

impl RuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `rule` to the seat's rule list, creating the list if needed.
    ///
    /// Duplicates are kept: every call appends, even when the same pattern
    /// text is already present for that seat.
    pub fn add(&mut self, seat_name: &str, rule: DeviceRule) {
        self.rules
            .entry(seat_name.to_string())
            .or_default()
            .push(rule);
    }

    /// Removes the first rule for `seat_name` whose source text equals
    /// `pattern`.
    ///
    /// A no-op when the seat has no rules or the pattern does not compile.
    /// When the seat's list becomes empty its entry is dropped from the map
    /// entirely.
    pub fn remove(&mut self, seat_name: &str, pattern: &str) {
        let Ok(rule) = DeviceRule::parse(pattern) else {
            return;
        };
        let Some(list) = self.rules.get_mut(seat_name) else {
            return;
        };
        if let Some(index) = list.iter().position(|existing| existing == &rule) {
            list.remove(index);
        }
        if list.is_empty() {
            self.rules.remove(seat_name);
        }
    }

    /// The seat's rules in insertion order; empty when none are registered.
    pub fn rules_for(&self, seat_name: &str) -> &[DeviceRule] {
        self.rules.get(seat_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The seat's rule pattern texts in insertion order.
    pub fn sources_for(&self, seat_name: &str) -> Vec<String> {
        self.rules_for(seat_name)
            .iter()
            .map(|rule| rule.source().to_string())
            .collect()
    }

    /// Returns `true` when `seat_name` has an entry in the map.
    pub fn contains_seat(&self, seat_name: &str) -> bool {
        self.rules.contains_key(seat_name)
    }

    /// Drops every rule for every seat.
    pub fn clear(&mut self) {
        self.rules.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── DeviceRule ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_rejects_empty_pattern() {
        let result = DeviceRule::parse("");
        assert!(matches!(result, Err(RuleError::EmptyPattern)));
    }

    #[test]
    fn test_parse_rejects_invalid_regex() {
        let result = DeviceRule::parse("[unclosed");
        assert!(matches!(result, Err(RuleError::InvalidPattern { .. })));
    }

    #[test]
    fn test_parse_keeps_source_text_verbatim() {
        let rule = DeviceRule::parse("^Logitech.*").expect("valid pattern");
        assert_eq!(rule.source(), "^Logitech.*");
    }

    #[test]
    fn test_is_match_uses_search_semantics() {
        // Unanchored pattern matches anywhere in the identifying string
        let rule = DeviceRule::parse("Keyboard").expect("valid pattern");
        assert!(rule.is_match("AT Translated Set 2 Keyboard"));
    }

    #[test]
    fn test_is_match_respects_anchors() {
        let rule = DeviceRule::parse("^Logitech.*").expect("valid pattern");
        assert!(rule.is_match("Logitech USB Mouse"));
        assert!(!rule.is_match("Fake Logitech USB Mouse"));
    }

    #[test]
    fn test_rules_compare_equal_by_source_text() {
        let a = DeviceRule::parse("^Wacom").expect("valid pattern");
        let b = DeviceRule::parse("^Wacom").expect("valid pattern");
        assert_eq!(a, b);
    }

    // ── RuleMap ───────────────────────────────────────────────────────────────

    #[test]
    fn test_rule_map_starts_empty() {
        let map = RuleMap::new();
        assert!(map.rules_for("seat0").is_empty());
        assert!(!map.contains_seat("seat0"));
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut map = RuleMap::new();
        map.add("seat1", DeviceRule::parse("^Logitech").unwrap());
        map.add("seat1", DeviceRule::parse("^Wacom").unwrap());

        assert_eq!(map.sources_for("seat1"), vec!["^Logitech", "^Wacom"]);
    }

    #[test]
    fn test_add_does_not_deduplicate() {
        let mut map = RuleMap::new();
        map.add("seat1", DeviceRule::parse("^Logitech").unwrap());
        map.add("seat1", DeviceRule::parse("^Logitech").unwrap());

        assert_eq!(map.rules_for("seat1").len(), 2);
    }

    #[test]
    fn test_remove_takes_out_only_first_duplicate() {
        let mut map = RuleMap::new();
        map.add("seat1", DeviceRule::parse("^Logitech").unwrap());
        map.add("seat1", DeviceRule::parse("^Logitech").unwrap());

        map.remove("seat1", "^Logitech");

        assert_eq!(map.rules_for("seat1").len(), 1);
    }

    #[test]
    fn test_remove_drops_entry_when_list_empties() {
        let mut map = RuleMap::new();
        map.add("seat1", DeviceRule::parse("^Logitech").unwrap());

        map.remove("seat1", "^Logitech");

        assert!(!map.contains_seat("seat1"), "entry must be fully removed");
        assert!(map.rules_for("seat1").is_empty());
    }

    #[test]
    fn test_remove_is_noop_for_unknown_seat() {
        let mut map = RuleMap::new();
        map.remove("missing", "^Logitech");
        assert!(map.rules_for("missing").is_empty());
    }

    #[test]
    fn test_remove_is_noop_for_invalid_pattern() {
        let mut map = RuleMap::new();
        map.add("seat1", DeviceRule::parse("^Logitech").unwrap());

        map.remove("seat1", "[unclosed");

        assert_eq!(map.rules_for("seat1").len(), 1);
    }

    #[test]
    fn test_remove_leaves_other_rules_intact() {
        let mut map = RuleMap::new();
        map.add("seat1", DeviceRule::parse("^Logitech").unwrap());
        map.add("seat1", DeviceRule::parse("^Wacom").unwrap());

        map.remove("seat1", "^Logitech");

        assert_eq!(map.sources_for("seat1"), vec!["^Wacom"]);
    }

    #[test]
    fn test_clear_removes_all_seats() {
        let mut map = RuleMap::new();
        map.add("seat0", DeviceRule::parse("^Generic").unwrap());
        map.add("seat1", DeviceRule::parse("^Logitech").unwrap());

        map.clear();

        assert!(!map.contains_seat("seat0"));
        assert!(!map.contains_seat("seat1"));
    }
}
