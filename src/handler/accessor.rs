//! Accessor callbacks bound to managed objects.

use std::sync::Arc;

use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::value::Value;

/// Read accessor: returns the current value of the object.
///
/// Called with the OID the object was registered under, which for GETNEXT
/// differs from the OID in the request.
pub type Getter = Arc<dyn Fn(&Oid) -> Result<Value, AccessError> + Send + Sync>;

/// Write accessor: applies a new value to the object.
pub type Setter = Arc<dyn Fn(&Oid, &Value) -> Result<(), AccessError> + Send + Sync>;

/// Failure reported by an accessor.
///
/// [`AccessError::Status`] is answered with its own error status; anything
/// else becomes `genErr`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AccessError {
    /// Protocol-level failure with an explicit error status.
    #[error("{message} (status: {status})")]
    Status {
        status: ErrorStatus,
        message: String,
    },

    /// Any other failure.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl AccessError {
    /// Create a failure carrying an error status.
    ///
    /// ```
    /// use snmp_agent::ErrorStatus;
    /// use snmp_agent::handler::AccessError;
    ///
    /// let err = AccessError::status(ErrorStatus::BadValue, "sysName must be a string");
    /// assert_eq!(err.error_status(), ErrorStatus::BadValue);
    /// ```
    pub fn status(status: ErrorStatus, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Wrap an arbitrary error. Reported as `genErr`.
    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(err.into())
    }

    /// Error status to put in the response.
    pub fn error_status(&self) -> ErrorStatus {
        match self {
            Self::Status { status, .. } => *status,
            Self::Other(_) => ErrorStatus::GenErr,
        }
    }
}

impl From<std::io::Error> for AccessError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

/// Wrap a closure as a [`Getter`].
pub fn getter<F>(f: F) -> Getter
where
    F: Fn(&Oid) -> Result<Value, AccessError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`Setter`].
pub fn setter<F>(f: F) -> Setter
where
    F: Fn(&Oid, &Value) -> Result<(), AccessError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Setter installed for read-only objects.
pub(crate) fn not_writable() -> Setter {
    Arc::new(|oid: &Oid, _value: &Value| {
        Err(AccessError::status(
            ErrorStatus::NotWritable,
            format!("OID {} is not writable", oid),
        ))
    })
}
