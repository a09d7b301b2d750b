//! Crate error types.
//!
//! The per-tick simulation never fails: degenerate geometry (zero-length
//! normals, near-zero denominators, malformed obstacle footprints) is handled
//! where it occurs by stopping, substituting an epsilon, or skipping.  The
//! errors here cover everything around the tick: loading configuration and
//! naming controls.

use std::fmt;

/// Top-level error enum for the driving simulation.
#[derive(Debug)]
pub enum SimError {
    /// The configuration file exists but could not be read.
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::DrivingConfig`].
    ConfigParse {
        path: String,
        /// Parser message, including line and column.
        message: String,
    },

    /// A tunable is outside its safe operating range.
    UnsafeConstant {
        /// Config key of the value (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// A control name that does not map to any [`crate::input::ControlKey`].
    UnknownControl { name: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ConfigRead { path, source } => {
                write!(f, "failed to read config '{}': {}", path, source)
            }
            SimError::ConfigParse { path, message } => {
                write!(f, "failed to parse config '{}': {}", path, message)
            }
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::UnknownControl { name } => write!(f, "unknown control key '{}'", name),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::ConfigRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> SimResult<()> {
    if !value.is_finite() || value <= 0.0 {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error unless `value` lies in the open interval (0, 1).
///
/// Used for damping and restitution factors: 0 freezes motion, ≥ 1 adds energy.
pub fn validate_unit_interval(name: &'static str, value: f32) -> SimResult<()> {
    if !(value > 0.0 && value < 1.0) {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, 1.0)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error unless `value` is a probability in [0, 1].
pub fn validate_probability(name: &'static str, value: f64) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value: value as f32,
            safe_range: "[0.0, 1.0]",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert!(validate_positive("x", 0.0).is_err());
        assert!(validate_positive("x", f32::NAN).is_err());
        assert!(validate_positive("x", 0.5).is_ok());
    }

    #[test]
    fn unit_interval_is_open() {
        assert!(validate_unit_interval("x", 0.0).is_err());
        assert!(validate_unit_interval("x", 1.0).is_err());
        assert!(validate_unit_interval("x", 0.3).is_ok());
    }

    #[test]
    fn display_names_the_constant() {
        let err = validate_unit_interval("bounce_factor", 2.0).unwrap_err();
        assert!(err.to_string().contains("bounce_factor"));
    }
}
