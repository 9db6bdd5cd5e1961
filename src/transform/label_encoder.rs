use crate::core::Disposition;
use serde::{Deserialize, Serialize};

/// Bijection between disposition labels and class codes.
///
/// Classes are kept in alphabetical order of their catalogue label, so the
/// code of a label is its position in [`classes`](Self::classes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<Disposition>,
}

impl LabelEncoder {
    pub fn fit<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = Disposition>,
    {
        let mut classes: Vec<Disposition> = labels.into_iter().collect();
        classes.sort_by_key(|d| d.as_str());
        classes.dedup();
        Self { classes }
    }

    pub fn encode(&self, label: Disposition) -> Option<usize> {
        self.classes.iter().position(|c| *c == label)
    }

    pub fn decode(&self, code: usize) -> Option<Disposition> {
        self.classes.get(code).copied()
    }

    pub fn classes(&self) -> &[Disposition] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_alphabetical_and_unique() {
        let enc = LabelEncoder::fit([
            Disposition::FalsePositive,
            Disposition::Confirmed,
            Disposition::Candidate,
            Disposition::Confirmed,
        ]);
        assert_eq!(
            enc.classes(),
            [
                Disposition::Candidate,
                Disposition::Confirmed,
                Disposition::FalsePositive
            ]
        );
        assert_eq!(enc.encode(Disposition::FalsePositive), Some(2));
        assert_eq!(enc.decode(1), Some(Disposition::Confirmed));
        assert_eq!(enc.decode(3), None);
    }

    #[test]
    fn serialized_form_lists_catalogue_labels() {
        let enc = LabelEncoder::fit([Disposition::Confirmed, Disposition::FalsePositive]);
        let json = serde_json::to_string(&enc).unwrap();
        assert_eq!(json, r#"{"classes":["CONFIRMED","FALSE POSITIVE"]}"#);
        assert_eq!(serde_json::from_str::<LabelEncoder>(&json).unwrap(), enc);
    }
}
