/// Incremental scalar estimator.
///
/// Implementations accept values via [`add`](Self::add) and expose the
/// current estimate via [`estimation`](Self::estimation).
pub trait Estimator {
    fn add(&mut self, v: f64);

    fn estimation(&self) -> f64;
}
