use thiserror::Error;

/// Capacity errors raised when a fixed bound of the ECS is exceeded.
///
/// Both bounds are configured at compile time, so hitting either is a
/// startup misconfiguration rather than something to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("cannot register component `{name}`: all {capacity} component ids are taken")]
    ComponentCapacityExceeded { name: &'static str, capacity: usize },

    #[error("group {group} is out of range (max {max})")]
    GroupOutOfRange { group: usize, max: usize },
}
