use thiserror::Error;

use crate::calendar::DateError;
use crate::database::DatabaseError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("IO/Terminal error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Date error: {0}")]
    DateError(#[from] DateError),

    #[error("Key binding error: {0}")]
    KeyBindingError(String),

    #[error("Terminal too small: {0}")]
    RenderError(String),
}
