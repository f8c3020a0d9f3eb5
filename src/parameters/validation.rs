use thiserror::Error;

use super::catalog::ParameterSpec;

/// Form input that cannot be used as an observation.
///
/// Raised only by presentation helpers; the engine itself accepts any value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{label} must be a number")]
    NotANumber { label: String },
    #[error("{label} must be at least {min}")]
    BelowMin { label: String, min: f64 },
    #[error("{label} must be at most {max}")]
    AboveMax { label: String, max: f64 },
}

impl ParameterSpec {
    /// Check a value against the declared input bounds.
    pub fn validate(&self, value: f64) -> Result<f64, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotANumber {
                label: self.display_name.to_string(),
            });
        }
        if let Some(min) = self.min {
            if value < min {
                return Err(ValidationError::BelowMin {
                    label: self.display_name.to_string(),
                    min,
                });
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(ValidationError::AboveMax {
                    label: self.display_name.to_string(),
                    max,
                });
            }
        }
        Ok(value)
    }
}

/// Parse raw form text; unparseable text becomes NaN so the engine can mark it unknown.
pub fn parse_input(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}
