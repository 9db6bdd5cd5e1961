use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Catalogue disposition of a KOI, as found in the training data.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    EnumString,
    Display,
    IntoStaticStr,
)]
pub enum Disposition {
    #[serde(rename = "CONFIRMED")]
    #[strum(serialize = "CONFIRMED")]
    Confirmed,

    #[serde(rename = "CANDIDATE")]
    #[strum(serialize = "CANDIDATE")]
    Candidate,

    #[serde(rename = "FALSE POSITIVE")]
    #[strum(serialize = "FALSE POSITIVE")]
    FalsePositive,
}

impl Disposition {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Exact-match parse; anything else is not a usable label.
    pub fn from_label(label: &str) -> Option<Disposition> {
        Disposition::iter().find(|d| d.as_str() == label)
    }

    /// Whether this disposition counts toward the merged positive verdict.
    pub fn is_confirmed_or_candidate(self) -> bool {
        matches!(self, Disposition::Confirmed | Disposition::Candidate)
    }
}

/// Binary outcome reported to callers after merging dispositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Verdict {
    #[serde(rename = "CONFIRMED/CANDIDATE")]
    #[strum(serialize = "CONFIRMED/CANDIDATE")]
    ConfirmedOrCandidate,

    #[serde(rename = "FALSE POSITIVE")]
    #[strum(serialize = "FALSE POSITIVE")]
    FalsePositive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_exactly() {
        assert_eq!(
            Disposition::from_label("FALSE POSITIVE"),
            Some(Disposition::FalsePositive)
        );
        assert_eq!(Disposition::from_label("CANDIDATE"), Some(Disposition::Candidate));
        assert_eq!(Disposition::from_label("candidate"), None);
        assert_eq!(Disposition::from_label("NOT DISPOSITIONED"), None);
        assert_eq!(Disposition::Confirmed.to_string(), "CONFIRMED");
    }

    #[test]
    fn verdict_serializes_with_catalogue_names() {
        assert_eq!(
            serde_json::to_string(&Verdict::ConfirmedOrCandidate).unwrap(),
            "\"CONFIRMED/CANDIDATE\""
        );
        assert_eq!(Verdict::FalsePositive.to_string(), "FALSE POSITIVE");
    }
}
