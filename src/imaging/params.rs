//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. The reducer
//! decides the geometry, the backend does the pixel work; [`ReduceParams`]
//! carries one decision across that boundary so a mock backend can stand in
//! during tests.

use crate::reducer::ReductionPlan;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Everything needed to execute one [`ReductionPlan`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReduceParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub plan: ReductionPlan,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_75() {
        assert_eq!(Quality::default().value(), 75);
    }
}
