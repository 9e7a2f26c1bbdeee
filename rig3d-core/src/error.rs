/// Error types for the rig3d core
use thiserror::Error;

/// Failures the core reports to its caller.
///
/// Joint limits, phase bounds and angle wrapping are handled by clamping and
/// never show up here.
#[derive(Debug, Error)]
pub enum Error {
    /// `pop()` was called on the root identity entry.
    #[error("transform stack underflow: pop on the root entry")]
    StackUnderflow,

    /// A traversal left the stack at a different depth than it started.
    #[error("transform stack unbalanced after traversal: expected depth {expected}, found {found}")]
    UnbalancedStack { expected: usize, found: usize },

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
