//! Error types for the locomotion core.
//!
//! Two families:
//! - [`LocomotionError`] - state machine misuse and setup problems. These are
//!   programming or startup bugs and are propagated out of `tick`.
//! - [`ConfigError`] - loading and validating a [`LocomotionConfig`](crate::player::LocomotionConfig).

use thiserror::Error;

/// Errors raised by the locomotion state machine and controller setup.
#[derive(Debug, Error)]
pub enum LocomotionError {
    /// A transition targeted a state type that was never registered.
    #[error("state `{0}` is not registered with the state machine")]
    UnregisteredState(&'static str),

    /// The same concrete state type was registered twice.
    #[error("state `{0}` is already registered")]
    DuplicateState(&'static str),

    /// Chained transitions from Enter/Update/Exit did not settle.
    #[error("transition chain did not settle after {hops} hops (last target `{last}`)")]
    TransitionLoop { hops: usize, last: &'static str },

    /// The machine was updated before any state was entered.
    #[error("state machine has no active state")]
    NoActiveState,

    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating locomotion configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Standard I/O error while reading a config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field holds a value the simulation cannot use.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_state_message_names_type() {
        let err = LocomotionError::UnregisteredState("Sliding");
        assert!(err.to_string().contains("Sliding"));
    }

    #[test]
    fn test_config_error_converts_into_locomotion_error() {
        let err: LocomotionError = ConfigError::invalid("walk_speed", "must be positive").into();
        assert!(matches!(err, LocomotionError::Config(ConfigError::Invalid { .. })));
        assert!(err.to_string().contains("walk_speed"));
    }
}
