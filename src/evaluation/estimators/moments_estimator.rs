use crate::evaluation::estimators::Estimator;

/// Running mean and population standard deviation (Welford).
#[derive(Debug, Default, Clone, Copy)]
pub struct MomentsEstimator {
    n: f64,
    mean: f64,
    m2: f64,
}

impl MomentsEstimator {
    pub fn count(&self) -> usize {
        self.n as usize
    }

    pub fn std_dev(&self) -> f64 {
        if self.n > 0.0 {
            (self.m2 / self.n).sqrt()
        } else {
            f64::NAN
        }
    }
}

impl Estimator for MomentsEstimator {
    fn add(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.n += 1.0;
        let delta = v - self.mean;
        self.mean += delta / self.n;
        self.m2 += delta * (v - self.mean);
    }

    fn estimation(&self) -> f64 {
        if self.n > 0.0 { self.mean } else { f64::NAN }
    }
}
