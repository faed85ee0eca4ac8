//! Outcome of processing a batch of variable bindings.

use crate::error::ErrorStatus;
use crate::varbind::VarBind;

/// Error status, error index and bindings destined for a Response PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Bindings to return.
    pub varbinds: Vec<VarBind>,
    /// Error status (`noError` on success).
    pub error_status: ErrorStatus,
    /// 1-based index of the failing binding, 0 on success.
    pub error_index: i32,
}

impl Response {
    /// Successful outcome.
    pub fn success(varbinds: Vec<VarBind>) -> Self {
        Self {
            varbinds,
            error_status: ErrorStatus::NoError,
            error_index: 0,
        }
    }

    /// Failed outcome. `varbinds` should be the request's own bindings.
    pub fn error(error_status: ErrorStatus, error_index: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            varbinds,
            error_status,
            error_index,
        }
    }

    /// Whether the error status is `noError`.
    pub fn is_success(&self) -> bool {
        self.error_status == ErrorStatus::NoError
    }
}
