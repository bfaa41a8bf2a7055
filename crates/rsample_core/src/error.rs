/// Errors produced while building resampling plans
///
/// `InvalidArgument` is the user-facing error: it is returned before any
/// sampling work starts and names the offending parameter. `Internal` marks a
/// broken engine invariant and should be treated as a defect, not handled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResampleError {
    #[error("`{param}` {message}")]
    InvalidArgument {
        param: &'static str,
        message: String,
    },

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl ResampleError {
    pub(crate) fn invalid(param: &'static str, message: impl Into<String>) -> Self {
        ResampleError::InvalidArgument {
            param,
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        ResampleError::Internal(message.into())
    }

    /// Name of the rejected parameter, if this is an argument error
    pub fn param(&self) -> Option<&'static str> {
        match self {
            ResampleError::InvalidArgument { param, .. } => Some(param),
            ResampleError::Internal(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResampleError>;
