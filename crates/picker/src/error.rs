use dom::DomError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    Dom(DomError),
    /// Nothing selectable under the pointer.
    EmptyChain,
    /// An operation that needs a running session found none.
    NoSession,
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerError::Dom(err) => write!(f, "document edit failed: {err}"),
            PickerError::EmptyChain => write!(f, "no element under the pointer"),
            PickerError::NoSession => write!(f, "no picker session is running"),
        }
    }
}

impl std::error::Error for PickerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PickerError::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for PickerError {
    fn from(err: DomError) -> Self {
        PickerError::Dom(err)
    }
}
