use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Upper-cased, trimmed entity status such as `DRAFT` or `PARTIALLY_SETTLED`.
///
/// Construction never fails: statuses are owned by the backend and an
/// unexpected value must still render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StatusCode(String);

impl StatusCode {
    #[must_use]
    pub fn normalize(input: &str) -> Self {
        Self(input.trim().to_ascii_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for StatusCode {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<&str> for StatusCode {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl From<StatusCode> for String {
    fn from(value: StatusCode) -> Self {
        value.0
    }
}

impl PartialEq<str> for StatusCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StatusCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
