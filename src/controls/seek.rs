use thiserror::Error;

/// Step used by jump forward/backward when the host doesn't configure one.
pub const DEFAULT_JUMP_STEP: f64 = 0.05;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SeekBoundsError {
    #[error("Seek bounds must be finite (got min {min}, max {max}).")]
    NotFinite { min: f64, max: f64 },
    #[error("Seek bound min ({min}) must be strictly less than max ({max}).")]
    Empty { min: f64, max: f64 },
}

/// The value range the scrub bar reports in. Always non-empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekBounds {
    min: f64,
    max: f64,
}

impl Default for SeekBounds {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl SeekBounds {
    pub fn new(min: f64, max: f64) -> Result<Self, SeekBoundsError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(SeekBoundsError::NotFinite { min, max });
        }
        if min >= max {
            return Err(SeekBoundsError::Empty { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Maps a scrub value onto a progress fraction in `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Inverse of [`Self::fraction`].
    pub fn value_at(&self, fraction: f64) -> f64 {
        self.min + fraction.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// Target fraction for a jump of `step` from `current`, kept inside `[0, 1]`.
pub fn jump_target(current: f64, step: f64) -> f64 {
    (current + step).clamp(0.0, 1.0)
}
