//! Shared types used across WHITEOUT.
use std::time::Duration;

/// How long a copy outcome stays visible on the copy button before it
/// reverts to idle.
pub const COPY_STATUS_RESET: Duration = Duration::from_secs(2);

/// Transient state of the copy-to-clipboard action, reflected in the copy
/// button label.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum CopyStatus {
    #[default]
    Idle,
    Success,
    Error,
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CopyStatus::Idle => "Idle",
            CopyStatus::Success => "Success",
            CopyStatus::Error => "Error",
        };
        write!(f, "{}", s)
    }
}
