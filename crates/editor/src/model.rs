//! The editable listing model and typed field edits.

use std::fmt;
use std::str::FromStr;

use gamestall_catalog::{RawGameRecord, RawPrice};
use serde::{Deserialize, Serialize};

/// The listing as the user sees it while editing.
///
/// Every field is the raw text of its input; nothing is validated until
/// submission, so partially typed values are representable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableGame {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub price: String,
    #[serde(rename = "coverImage")]
    pub cover_image_url: String,
    #[serde(rename = "downloadLink")]
    pub download_url: String,
}

/// A named field of [`EditableGame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameField {
    Title,
    Description,
    Genre,
    Price,
    CoverImageUrl,
    DownloadUrl,
}

impl GameField {
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Description,
        Self::Genre,
        Self::Price,
        Self::CoverImageUrl,
        Self::DownloadUrl,
    ];

    /// Fields that must be non-empty to submit.
    pub const REQUIRED: [Self; 4] = [Self::Title, Self::Description, Self::Genre, Self::Price];

    /// Name used on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Genre => "genre",
            Self::Price => "price",
            Self::CoverImageUrl => "coverImage",
            Self::DownloadUrl => "downloadLink",
        }
    }

    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Game Title",
            Self::Description => "Description",
            Self::Genre => "Genre",
            Self::Price => "Price",
            Self::CoverImageUrl => "Cover Image URL",
            Self::DownloadUrl => "Download Link",
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for GameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for GameField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.wire_name() == s)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

/// Replacement of exactly one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Title(String),
    Description(String),
    Genre(String),
    Price(String),
    CoverImageUrl(String),
    DownloadUrl(String),
}

impl FieldEdit {
    /// Builds the edit for `field` carrying `value`.
    pub fn new(field: GameField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            GameField::Title => Self::Title(value),
            GameField::Description => Self::Description(value),
            GameField::Genre => Self::Genre(value),
            GameField::Price => Self::Price(value),
            GameField::CoverImageUrl => Self::CoverImageUrl(value),
            GameField::DownloadUrl => Self::DownloadUrl(value),
        }
    }

    pub fn field(&self) -> GameField {
        match self {
            Self::Title(_) => GameField::Title,
            Self::Description(_) => GameField::Description,
            Self::Genre(_) => GameField::Genre,
            Self::Price(_) => GameField::Price,
            Self::CoverImageUrl(_) => GameField::CoverImageUrl,
            Self::DownloadUrl(_) => GameField::DownloadUrl,
        }
    }
}

impl EditableGame {
    /// Returns a copy with the one field named by `edit` replaced.
    #[must_use]
    pub fn with(&self, edit: FieldEdit) -> Self {
        let mut next = self.clone();
        match edit {
            FieldEdit::Title(v) => next.title = v,
            FieldEdit::Description(v) => next.description = v,
            FieldEdit::Genre(v) => next.genre = v,
            FieldEdit::Price(v) => next.price = v,
            FieldEdit::CoverImageUrl(v) => next.cover_image_url = v,
            FieldEdit::DownloadUrl(v) => next.download_url = v,
        }
        next
    }

    pub fn get(&self, field: GameField) -> &str {
        match field {
            GameField::Title => &self.title,
            GameField::Description => &self.description,
            GameField::Genre => &self.genre,
            GameField::Price => &self.price,
            GameField::CoverImageUrl => &self.cover_image_url,
            GameField::DownloadUrl => &self.download_url,
        }
    }

    /// Fields whose value differs from `other`.
    pub fn diff(&self, other: &Self) -> Vec<GameField> {
        GameField::ALL
            .into_iter()
            .filter(|&f| self.get(f) != other.get(f))
            .collect()
    }

    /// This model expressed as a flat (`coverImage` / `downloadLink`) record.
    pub fn to_raw_record(&self) -> RawGameRecord {
        RawGameRecord {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            genre: Some(self.genre.clone()),
            price: Some(RawPrice::Text(self.price.clone())),
            cover_image: Some(self.cover_image_url.clone()),
            download_link: Some(self.download_url.clone()),
            media: None,
        }
    }
}
