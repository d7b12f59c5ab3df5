//! Sync error types.

/// Errors that can occur while talking to the remote restaurant service.
#[derive(Debug)]
pub enum SyncError {
    /// Failed to reach the server (connection refused, DNS, timeout).
    RequestError(String),
    /// Server answered with a non-success status.
    ServerStatus(u16),
    /// Response body could not be decoded.
    DecodeError(String),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::RequestError(e) => write!(f, "Request failed: {}", e),
            SyncError::ServerStatus(status) => {
                write!(f, "Server returned status {}", status)
            }
            SyncError::DecodeError(e) => write!(f, "Failed to decode response: {}", e),
        }
    }
}

impl std::error::Error for SyncError {}
