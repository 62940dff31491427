//! Submission checks: draft text to a typed update body.

use gamestall_catalog::{GameUpdate, Genre, Price, Url};

use crate::error::ValidationError;
use crate::model::{EditableGame, GameField};

impl EditableGame {
    /// Checks the draft and builds the update body.
    ///
    /// Required fields must be non-blank, the genre must be one of the fixed
    /// set, the price a non-negative two-decimal amount, and any non-empty
    /// media URL an absolute URL. Checks run in form order, so the first
    /// failing field is reported.
    pub fn validate(&self) -> Result<GameUpdate, ValidationError> {
        for field in GameField::REQUIRED {
            if self.get(field).trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        let genre: Genre = self.genre.parse()?;
        let price: Price = self.price.parse()?;
        let cover_image = optional_url(GameField::CoverImageUrl, &self.cover_image_url)?;
        let download_link = optional_url(GameField::DownloadUrl, &self.download_url)?;

        Ok(GameUpdate {
            title: self.title.clone(),
            description: self.description.clone(),
            genre,
            price,
            cover_image,
            download_link,
        })
    }
}

fn optional_url(field: GameField, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }
    Url::parse(value).map_err(|_| ValidationError::InvalidUrl {
        field,
        value: value.to_string(),
    })?;
    Ok(value.to_string())
}
