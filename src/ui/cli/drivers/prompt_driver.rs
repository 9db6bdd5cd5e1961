use anyhow::Result;

pub trait PromptDriver {
    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool>;
    fn ask_f64(
        &self,
        title: &str,
        help: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64>;
    /// `None` when the user leaves the answer empty.
    fn ask_optional_f64(&self, title: &str, help: &str) -> Result<Option<f64>>;
}
