//! Booking and tracking errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the workspace.
pub type Result<T> = anyhow::Result<T, Error>;

/// Domain level error type.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Error {
    /// Caller input is invalid and cannot be processed.
    #[error("code: bad_request, description: {0}")]
    BadRequest(String),

    /// A payload could not be decoded.
    #[error("code: invalid_format, description: {0}")]
    InvalidFormat(String),

    /// The persistence collaborator failed to read or write.
    #[error("code: storage_error, description: {0}")]
    Storage(String),

    /// A non recoverable internal error occurred.
    #[error("code: server_error, description: {0}")]
    ServerError(String),
}

impl Error {
    /// Returns the stable error code associated with the variant.
    #[must_use]
    pub const fn code(&self) -> &str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::InvalidFormat(_) => "invalid_format",
            Self::Storage(_) => "storage_error",
            Self::ServerError(_) => "server_error",
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        // if type is Error, return it with the newly added context
        if let Some(inner) = err.downcast_ref::<Self>() {
            tracing::debug!("Error: {err}, caused by: {inner}");

            return match inner {
                Self::BadRequest(e) => Self::BadRequest(format!("{err}: {e}")),
                Self::InvalidFormat(e) => Self::InvalidFormat(format!("{err}: {e}")),
                Self::Storage(e) => Self::Storage(format!("{err}: {e}")),
                Self::ServerError(e) => Self::ServerError(format!("{err}: {e}")),
            };
        }

        // otherwise, flatten the chain into a server error
        let chain = err.chain().map(ToString::to_string).collect::<Vec<_>>().join(" -> ");
        Self::ServerError(chain)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

#[macro_export]
macro_rules! bad_request {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::BadRequest(format!($fmt, $($arg)*))
    };
     ($err:expr $(,)?) => {
        $crate::Error::BadRequest(format!($err))
    };
}

#[macro_export]
macro_rules! storage_error {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::Storage(format!($fmt, $($arg)*))
    };
     ($err:expr $(,)?) => {
        $crate::Error::Storage(format!($err))
    };
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, Result, anyhow};
    use serde_json::Value;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Registry, fmt};

    use super::Error;

    #[test]
    fn error_display() {
        let err = Error::BadRequest("invalid input".to_string());
        assert_eq!(format!("{err}",), "code: bad_request, description: invalid input");
        assert_eq!(err.code(), "bad_request");
    }

    #[test]
    fn with_context() {
        Registry::default().with(EnvFilter::new("debug")).with(fmt::layer()).init();

        let context_error = || -> Result<(), Error> {
            Err::<(), Error>(Error::Storage("quota exceeded".to_string()))
                .context("writing last booking")?;
            Ok(())
        };

        let result = context_error();
        assert_eq!(
            result.unwrap_err(),
            Error::Storage("writing last booking: quota exceeded".to_string())
        );
    }

    #[test]
    fn anyhow_context() {
        let result = Err::<(), anyhow::Error>(anyhow!("one-off error")).context("error context");
        let err: Error = result.unwrap_err().into();

        assert_eq!(
            err.to_string(),
            "code: server_error, description: error context -> one-off error"
        );
    }

    #[test]
    fn serde_error() {
        let result: Result<Value, serde_json::Error> = serde_json::from_str(r#"{"px": 1"#);
        let err: Error = result.unwrap_err().into();

        assert_eq!(err.code(), "invalid_format");
        assert_eq!(
            err.to_string(),
            "code: invalid_format, description: EOF while parsing an object at line 1 column 8"
        );
    }

    #[test]
    fn macros() {
        let err = crate::bad_request!("coolies must be at least {}", 1);
        assert_eq!(err, Error::BadRequest("coolies must be at least 1".to_string()));

        let err = crate::storage_error!("storage unavailable");
        assert_eq!(err.code(), "storage_error");
    }
}
