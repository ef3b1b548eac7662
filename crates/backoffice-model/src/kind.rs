use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Entity kinds whose lifecycle the back office renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum EntityKind {
    Contract,
    CashSession,
    CashTransaction,
    CariDocument,
    Journal,
}

impl EntityKind {
    pub const ALL: [Self; 5] = [
        Self::Contract,
        Self::CashSession,
        Self::CashTransaction,
        Self::CariDocument,
        Self::Journal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::CashSession => "cashSession",
            Self::CashTransaction => "cashTransaction",
            Self::CariDocument => "cariDocument",
            Self::Journal => "journal",
        }
    }

    /// Accepts camelCase, snake_case and kebab-case spellings, case-insensitively.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let folded: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "contract" => Ok(Self::Contract),
            "cashsession" => Ok(Self::CashSession),
            "cashtransaction" | "cashtxn" => Ok(Self::CashTransaction),
            "caridocument" | "caridoc" => Ok(Self::CariDocument),
            "journal" | "gljournal" => Ok(Self::Journal),
            "" => Err(ValidationError("entity kind must not be empty".to_string())),
            _ => Err(ValidationError(format!(
                "unknown entity kind `{}`",
                input.trim()
            ))),
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::EntityKind;

    #[test]
    fn parse_accepts_every_separator_style() {
        for raw in ["cashSession", "cash_session", "cash-session", "CASH_SESSION", " CashSession "] {
            assert_eq!(EntityKind::parse(raw), Ok(EntityKind::CashSession), "{raw}");
        }
        assert_eq!(EntityKind::parse("cari-doc"), Ok(EntityKind::CariDocument));
        assert_eq!(EntityKind::parse("gl_journal"), Ok(EntityKind::Journal));
    }

    #[test]
    fn parse_rejects_unknown_and_blank_kinds() {
        assert!(EntityKind::parse("invoice").is_err());
        assert!(EntityKind::parse("   ").is_err());
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.as_str()), Ok(kind));
        }
    }
}
