use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

pub const PERMISSION_CODE_MAX_LEN: usize = 128;

/// Permission codes granted to the current actor.
///
/// Codes are trimmed; blank, oversized and duplicate entries are dropped so a
/// malformed grant list only ever narrows what the actor may do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PermissionSet {
    codes: BTreeSet<String>,
}

impl PermissionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(codes);
        set
    }

    /// Lenient decode of an auth payload: anything but an array of strings
    /// contributes nothing.
    #[must_use]
    pub fn from_json_value(value: &Value) -> Self {
        let Some(items) = value.as_array() else {
            return Self::default();
        };
        Self::from_codes(items.iter().filter_map(Value::as_str))
    }

    pub fn extend<I, S>(&mut self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for code in codes {
            self.insert(code.as_ref());
        }
    }

    pub fn insert(&mut self, code: &str) -> bool {
        let trimmed = code.trim();
        if trimmed.is_empty() || trimmed.len() > PERMISSION_CODE_MAX_LEN {
            return false;
        }
        self.codes.insert(trimmed.to_string())
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    #[must_use]
    pub fn contains_all(&self, codes: &[&str]) -> bool {
        !codes.is_empty() && codes.iter().all(|code| self.contains(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(value: Vec<String>) -> Self {
        Self::from_codes(value)
    }
}

impl From<PermissionSet> for Vec<String> {
    fn from(value: PermissionSet) -> Self {
        value.codes.into_iter().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_codes(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::{PermissionSet, PERMISSION_CODE_MAX_LEN};
    use serde_json::json;

    #[test]
    fn blank_duplicate_and_padded_codes_are_normalized() {
        let set = PermissionSet::from_codes(["contract.read", "", "  ", " contract.read ", "cash.txn.post"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("contract.read"));
        assert!(set.contains("cash.txn.post"));
    }

    #[test]
    fn oversized_codes_are_dropped() {
        let long = "x".repeat(PERMISSION_CODE_MAX_LEN + 1);
        let set = PermissionSet::from_codes([long.as_str()]);
        assert!(set.is_empty());
    }

    #[test]
    fn json_decode_is_lenient() {
        assert!(PermissionSet::from_json_value(&json!(null)).is_empty());
        assert!(PermissionSet::from_json_value(&json!({"codes": ["contract.read"]})).is_empty());
        let set = PermissionSet::from_json_value(&json!(["contract.read", 7, null, "contract.activate"]));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["contract.activate", "contract.read"]);
    }

    #[test]
    fn contains_all_requires_a_non_empty_conjunction() {
        let set = PermissionSet::from_codes(["contract.read", "contract.link_document"]);
        assert!(set.contains_all(&["contract.read", "contract.link_document"]));
        assert!(!set.contains_all(&["contract.read", "cari.doc.read"]));
        assert!(!set.contains_all(&[]));
    }
}
