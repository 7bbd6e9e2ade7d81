use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing command-line arguments. Raised before any request.
    #[error("{0}")]
    Usage(String),

    /// The server could not be reached.
    #[error("Connection error")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 200.
    #[error("Rest Request Failed\nurl: {url}\nstatus code: {status}\ncontents: {body}")]
    Protocol { url: String, status: u16, body: String },

    /// A 200 GET response that is not JSON, or a payload that failed to serialize.
    #[error("invalid JSON for {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be built.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        Error::Usage(msg.into())
    }

    /// HTTP status code, only present on protocol errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body, only present on protocol errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Protocol { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}
