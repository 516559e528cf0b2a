/*
 * Error model shared by every layer of the crate. Programming errors
 * (registering after creation, creating twice) and OS call failures are
 * surfaced as `PlatformError` values at the call site. Failures raised inside
 * user handlers never reach this type; they are contained at the dispatch
 * boundary instead (see `failure`).
 */

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    InitializationFailed(String),
    InvalidHandle(String),
    OperationFailed(String),
    /// A call that is illegal in the host's current lifecycle state.
    InvalidState(String),
    /// An OS call failed; `code` is the platform `HRESULT`.
    Win32 { code: i32, context: String },
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::InitializationFailed(msg) => write!(f, "initialization failed: {msg}"),
            PlatformError::InvalidHandle(msg) => write!(f, "invalid handle: {msg}"),
            PlatformError::OperationFailed(msg) => write!(f, "operation failed: {msg}"),
            PlatformError::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            PlatformError::Win32 { code, context } => {
                write!(f, "win32 error 0x{:08X}: {context}", *code as u32)
            }
        }
    }
}

impl std::error::Error for PlatformError {}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for PlatformError {
    fn from(err: windows::core::Error) -> Self {
        PlatformError::Win32 {
            code: err.code().0,
            context: err.message(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
