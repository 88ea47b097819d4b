// ABOUTME: Validation errors raised when an entity or workout log breaks a field rule.
// ABOUTME: Storage-level failures live in liftlog-store; this crate only knows about shapes.

use thiserror::Error;

/// A field-level rule violated by an entity, draft or workout log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    #[error("set_number must be at least 1")]
    SetNumberZero,

    #[error("{field} must be a finite, non-negative number (got {value})")]
    NotNonNegative { field: &'static str, value: f64 },

    #[error("intensity must be between 1 and 20 (got {0})")]
    IntensityOutOfRange(u8),

    #[error("unknown weight unit: {0:?} (expected \"kg\" or \"lbs\")")]
    UnknownUnit(String),
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::NotNonNegative { field, value });
    }
    Ok(())
}
