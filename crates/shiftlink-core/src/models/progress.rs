use serde::Serialize;

/// Fraction of a file acknowledged by the storage endpoint, in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ProgressSignal {
    fraction: f64,
}

impl ProgressSignal {
    pub fn new(fraction: f64) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Self { fraction }
    }

    pub fn from_percent(percent: f64) -> Self {
        Self::new(percent / 100.0)
    }

    pub fn from_bytes(acknowledged: u64, total: u64) -> Self {
        if total == 0 {
            return Self::new(1.0);
        }
        Self::new(acknowledged as f64 / total as f64)
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Whole percentage, rounded half away from zero.
    pub fn percent(&self) -> u8 {
        (self.fraction * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(ProgressSignal::new(1.7).fraction(), 1.0);
        assert_eq!(ProgressSignal::new(-0.2).fraction(), 0.0);
        assert_eq!(ProgressSignal::new(f64::NAN).fraction(), 0.0);
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(ProgressSignal::from_percent(54.5).percent(), 55);
        assert_eq!(ProgressSignal::from_bytes(1, 3).percent(), 33);
        assert_eq!(ProgressSignal::from_bytes(0, 0).percent(), 100);
    }
}
