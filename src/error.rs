use std::fmt;

/// Reasons a single lookup can fail.
///
/// None of these are fatal on their own: the runner decides whether a failure
/// ends the process (single mode) or only skips the current line (file mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The input is neither an IPv4 literal nor a resolvable host name.
    Resolution(String),
    /// Connection failure, timeout or non-success HTTP status.
    Network(String),
    /// The provider answered with something that is not a JSON object.
    MalformedResponse(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Resolution(input) => write!(f, "Invalid IP or hostname: {}", input),
            LookupError::Network(reason) => write!(f, "{}", reason),
            LookupError::MalformedResponse(reason) => write!(f, "Malformed response: {}", reason),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<hyper::http::Error> for LookupError {
    fn from(err: hyper::http::Error) -> Self {
        LookupError::Network(err.to_string())
    }
}

impl From<hyper_util::client::legacy::Error> for LookupError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        LookupError::Network(err.to_string())
    }
}

impl From<hyper::Error> for LookupError {
    fn from(err: hyper::Error) -> Self {
        LookupError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
