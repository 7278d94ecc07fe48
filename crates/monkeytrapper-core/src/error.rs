// Monkeytrapper Error Taxonomy
// Fatal session errors and the process exit codes they map to

use std::io;

/// Exit code when the process shut down on SIGINT/SIGTERM
pub const EXIT_OK: u8 = 0;
/// Exit code when no input device matched at startup
pub const EXIT_DEVICE_NOT_FOUND: u8 = 1;
/// Exit code for every other fatal error
pub const EXIT_FAILURE: u8 = 2;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that end a session. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No input device with physical path containing {phys:?} and name containing {name:?}")]
    DeviceNotFound { phys: String, name: String },

    #[error("Failed to grab input device: {0}")]
    GrabFailed(#[source] io::Error),

    #[error("Failed to create virtual device: {0}")]
    VirtualDevice(#[source] io::Error),

    #[error("Failed to read from input device: {0}")]
    ReadFailed(#[source] io::Error),

    #[error("Failed to write to virtual device: {0}")]
    WriteFailed(#[source] io::Error),

    #[error("Failed to install signal handlers: {0}")]
    Signal(#[source] io::Error),
}

impl SessionError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            SessionError::DeviceNotFound { .. } => EXIT_DEVICE_NOT_FOUND,
            _ => EXIT_FAILURE,
        }
    }
}
