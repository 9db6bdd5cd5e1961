use serde::Serialize;

/// Summarized scalar metric produced by a performance evaluator.
///
/// Typical examples: `"accuracy"`, `"kappa"`, `"f1"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub name: String,
    pub value: f64,
}

impl Measurement {
    #[inline]
    pub fn new<N: Into<String>>(name: N, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
