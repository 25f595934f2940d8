use crate::clients::error::ApiError;
use crate::conversation::pagination::ListKind;
use crate::conversation::texts;
use thiserror::Error;
use tracing::warn;

/// Failures a user can cause or has to be told about. None of them ends the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("container {0} is already on the terminal")]
    Conflict(String),
    #[error("terminal service unavailable")]
    RemoteUnavailable,
    #[error("no services selected")]
    EmptySelection,
    #[error("{0:?} list is empty")]
    EmptyList(ListKind),
}

impl WizardError {
    pub fn user_message(&self) -> String {
        match self {
            WizardError::Validation(message) => message.clone(),
            WizardError::Conflict(_) => texts::CONTAINER_EXISTS.to_string(),
            WizardError::RemoteUnavailable => texts::REMOTE_UNAVAILABLE.to_string(),
            WizardError::EmptySelection => texts::EMPTY_SELECTION.to_string(),
            WizardError::EmptyList(ListKind::Customers) => texts::CUSTOMERS_EMPTY.to_string(),
            WizardError::EmptyList(ListKind::Services) => texts::SERVICES_EMPTY.to_string(),
        }
    }
}

/// Outcome of a flow handler: either a rejection shown to the user, or a delivery failure.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Rejected(#[from] WizardError),
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl From<ApiError> for HandlerError {
    fn from(err: ApiError) -> Self {
        warn!("terminal call failed: {}", err);
        HandlerError::Rejected(WizardError::RemoteUnavailable)
    }
}
