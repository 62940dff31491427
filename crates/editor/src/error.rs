//! Editor error types.

use gamestall_catalog::{GenreError, PriceError};

use crate::model::GameField;
use crate::session::Phase;

/// Reasons a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    MissingField(GameField),

    #[error(transparent)]
    UnknownGenre(#[from] GenreError),

    #[error(transparent)]
    InvalidPrice(#[from] PriceError),

    #[error("{} is not a valid URL: {value}", .field.label())]
    InvalidUrl { field: GameField, value: String },
}

impl ValidationError {
    /// The field the user needs to fix.
    pub fn field(&self) -> GameField {
        match self {
            Self::MissingField(field) | Self::InvalidUrl { field, .. } => *field,
            Self::UnknownGenre(_) => GameField::Genre,
            Self::InvalidPrice(_) => GameField::Price,
        }
    }
}

/// Operations refused by the edit session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("cannot edit while {0}")]
    NotEditable(Phase),

    #[error("record load already in progress")]
    LoadInProgress,

    #[error("record already loaded")]
    AlreadyLoaded,

    #[error("submission already in progress")]
    SubmitInProgress,

    /// The record never loaded, so the form holds placeholders only.
    #[error("game details were not loaded; submission is disabled")]
    Degraded,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
