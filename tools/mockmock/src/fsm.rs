use crate::errors::MockmockError;
use serde::{Deserialize, Serialize};

/// Lifecycle of a [`crate::store::MockStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreState {
    /// No fixture has been loaded or saved yet.
    Uninitialized,
    Loading,
    Saving,
    Ready,
}

impl StoreState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Saving => "saving",
            Self::Ready => "ready",
        }
    }

    /// Loading and saving hold the store busy.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Loading | Self::Saving)
    }
}

pub fn validate_transition(from: StoreState, to: StoreState) -> Result<(), MockmockError> {
    use StoreState as S;

    let allowed = match from {
        S::Uninitialized | S::Ready => matches!(to, S::Loading | S::Saving),
        S::Loading | S::Saving => matches!(to, S::Ready | S::Uninitialized),
    };

    if !allowed {
        return Err(MockmockError::NotReady(format!(
            "illegal store transition: {} -> {}",
            from.as_str(),
            to.as_str()
        )));
    }
    Ok(())
}
