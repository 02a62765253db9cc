use std::fmt;

/// Caller-facing classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Validation,
    Fetch,
    Engine,
    InsufficientCredit,
    Gateway,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "auth_error",
            ErrorKind::Validation => "validation_error",
            ErrorKind::Fetch => "fetch_error",
            ErrorKind::Engine => "engine_error",
            ErrorKind::InsufficientCredit => "insufficient_credit",
            ErrorKind::Gateway => "gateway_error",
            ErrorKind::Internal => "internal_error",
        }
    }

    /// Faults are failures of this service or its collaborators, as opposed to
    /// outcomes the caller can act on.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            ErrorKind::Engine | ErrorKind::Gateway | ErrorKind::Internal
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
