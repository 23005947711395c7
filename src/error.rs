// Error type shared by the whole framework.
// Every variant states *where* things went wrong.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A precondition on an argument was violated (size, weight, rate, title, path).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The call is not allowed in the current state (resize a fixed window, restart a loop).
    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Image decoding failed. Only ever logged, `Image::load` degrades instead.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn illegal(msg: impl Into<String>) -> Self {
        Error::IllegalState(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
