use alloc::string::String;

/// The single failure kind of the data source.
///
/// All variants are recoverable: the page loader stores the error and waits for a retry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The source answered with a non-success status.
    #[error("HTTP error! status: {0}")]
    Status(u16),
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The response body was not a list of posts.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}
