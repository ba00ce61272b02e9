use thiserror::Error;
use tuirealm::terminal::TerminalError;
use tuirealm::ApplicationError;

use crate::image_ref::ImageRefError;

#[derive(Debug, Error)]
pub enum QrFormError {
    #[error("invalid configuration: {0}")]
    ConfigError(String),
    #[error("error while reading or writing a local file: {0}")]
    IOError(#[from] std::io::Error),
    #[error("terminal error: {0}")]
    TerminalError(#[from] TerminalError),
    #[error("error while mounting or updating the form: {0}")]
    ApplicationError(#[from] ApplicationError),
    #[error("error while saving the generated image: {0}")]
    SaveError(#[from] ImageRefError),
    #[error("submit rejected: {0}")]
    InputRejected(#[from] crate::form::InputRejected),
    #[error("{0}")]
    GenerateFailed(String),
}
