#![forbid(unsafe_code)]

//! Configuration and registration errors.
//!
//! These are reported synchronously from registration calls and engine
//! construction. Pointer handlers never return errors; they degrade to a
//! no-op instead (see [`IgnoreReason`](crate::session::IgnoreReason)).

use std::fmt;

use crate::container::ContainerKey;
use crate::item::ItemKey;

/// Invalid engine-wide configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A distance or tolerance was negative or not finite.
    InvalidDistance { field: &'static str, value: f32 },
    /// `min_step` exceeds `max_step`.
    InvalidStepRange { min_step: f32, max_step: f32 },
    /// The auto-scroll cadence was zero.
    ZeroCadence,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDistance { field, value } => {
                write!(f, "{field} must be finite and non-negative (got {value})")
            }
            Self::InvalidStepRange { min_step, max_step } => write!(
                f,
                "auto-scroll min_step ({min_step}) must not exceed max_step ({max_step})"
            ),
            Self::ZeroCadence => write!(f, "auto-scroll cadence must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure of a registration-API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Another container already uses this id.
    DuplicateContainerId { id: String },
    /// A `connected_to` entry names a container that is not registered.
    UnknownContainerId { id: String },
    /// The container handle is stale or was never issued.
    UnknownContainer { container: ContainerKey },
    /// The item handle is stale or was never issued.
    UnknownItem { item: ItemKey },
    /// A container may not be connected to itself.
    SelfConnection { container: ContainerKey },
    /// The item is being dragged and cannot be removed.
    ItemBusy { item: ItemKey },
    /// The container takes part in the active drag and cannot be removed.
    ContainerBusy { container: ContainerKey },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateContainerId { id } => {
                write!(f, "container id {id:?} is already registered")
            }
            Self::UnknownContainerId { id } => {
                write!(f, "connected container id {id:?} is not registered")
            }
            Self::UnknownContainer { container } => {
                write!(f, "unknown container handle {container:?}")
            }
            Self::UnknownItem { item } => write!(f, "unknown item handle {item:?}"),
            Self::SelfConnection { container } => {
                write!(f, "container {container:?} cannot be connected to itself")
            }
            Self::ItemBusy { item } => {
                write!(f, "item {item:?} is being dragged and cannot be unregistered")
            }
            Self::ContainerBusy { container } => write!(
                f,
                "container {container:?} takes part in the active drag and cannot be unregistered"
            ),
        }
    }
}

impl std::error::Error for RegistrationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_values() {
        let err = RegistrationError::DuplicateContainerId { id: "todo".into() };
        assert_eq!(err.to_string(), "container id \"todo\" is already registered");

        let err = ConfigError::InvalidDistance {
            field: "dead_zone",
            value: -1.0,
        };
        assert!(err.to_string().contains("dead_zone"));
    }

    #[test]
    fn errors_are_std_errors() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&ConfigError::ZeroCadence);
        assert_error(&RegistrationError::UnknownItem { item: ItemKey(3) });
    }
}
