use thiserror::Error;

/// Set-up time failures. Per-tick entry points never return these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RlError {
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("unknown archetype `{0}`")]
    UnknownArchetype(String),
}

pub(crate) fn check_unit(field: &'static str, value: f32) -> Result<(), RlError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RlError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

pub(crate) fn check_non_negative(field: &'static str, value: f32) -> Result<(), RlError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(RlError::Negative { field, value })
    }
}

pub(crate) fn check_positive(field: &'static str, value: f32) -> Result<(), RlError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(RlError::NonPositive { field, value })
    }
}
