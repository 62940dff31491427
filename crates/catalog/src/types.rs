//! Wire and domain types for the Game Catalog Service.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{GenreError, PriceError, SubmitError};

/// Characters escaped when a game id is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Identifier of a game record in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id escaped for use as a single URL path segment.
    pub fn path_segment(&self) -> String {
        utf8_percent_encode(&self.0, PATH_SEGMENT).to_string()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Bearer credential supplied by the caller's session store.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Builds the `Authorization` header value, marked sensitive.
    pub fn header_value(&self) -> Result<HeaderValue, SubmitError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| SubmitError::InvalidToken)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// The fixed set of listing genres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    #[serde(rename = "RPG")]
    Rpg,
    Strategy,
    Puzzle,
    Indie,
    Simulation,
    Sports,
}

impl Genre {
    /// Every genre, in the order the listing form offers them.
    pub const ALL: [Self; 8] = [
        Self::Action,
        Self::Adventure,
        Self::Rpg,
        Self::Strategy,
        Self::Puzzle,
        Self::Indie,
        Self::Simulation,
        Self::Sports,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Adventure => "Adventure",
            Self::Rpg => "RPG",
            Self::Strategy => "Strategy",
            Self::Puzzle => "Puzzle",
            Self::Indie => "Indie",
            Self::Simulation => "Simulation",
            Self::Sports => "Sports",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = GenreError;

    /// Case-insensitive match against the canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| GenreError(s.to_string()))
    }
}

/// A non-negative price with two-decimal precision, held as whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price {
    cents: u64,
}

impl Price {
    /// Largest amount whose JSON number spelling keeps every cent.
    ///
    /// Below 2^46 whole units adjacent `f64` values are less than a cent
    /// apart, so the shortest spelling of `cents / 100.0` is the original
    /// two-decimal amount.
    pub const MAX_CENTS: u64 = (1 << 46) * 100 - 1;

    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub const fn cents(self) -> u64 {
        self.cents
    }

    pub const fn is_free(self) -> bool {
        self.cents == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(PriceError::Empty);
        }

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
            return Err(PriceError::NotANumber(s.to_string()));
        }

        // 9.990 is still a valid two-decimal amount.
        let frac = frac.trim_end_matches('0');
        if frac.len() > 2 {
            return Err(PriceError::TooPrecise(s.to_string()));
        }

        let overflow = || PriceError::Overflow(s.to_string());
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let frac_cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| overflow())? * 10,
            _ => frac.parse().map_err(|_| overflow())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .filter(|&c| c <= Price::MAX_CENTS)
            .ok_or_else(overflow)?;

        if negative && cents > 0 {
            return Err(PriceError::Negative(s.to_string()));
        }
        Ok(Self { cents })
    }
}

impl Serialize for Price {
    /// Sent as a JSON number (`9.99`).
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.cents as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawPrice::deserialize(deserializer)?;
        raw.as_text().parse().map_err(serde::de::Error::custom)
    }
}

/// A price as the catalog stores it: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

impl RawPrice {
    /// The price as form text, numbers in their JSON spelling.
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Reads a field as `T`, treating a value of any other JSON type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Reads a URL list. Entries that are not strings become empty, so they
/// never resolve to a URL but keep their position.
fn lenient_urls<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(url) => url,
                    _ => String::new(),
                })
                .collect(),
        ),
        _ => None,
    })
}

/// Nested media block of the newer record shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedMedia {
    #[serde(default, deserialize_with = "lenient_urls", skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_urls", skip_serializing_if = "Option::is_none")]
    pub download_links: Option<Vec<String>>,
}

/// A game record as returned by `GET /games/{id}`.
///
/// Two historical layouts are in circulation and a single record may carry
/// both. See [`MediaShape`] for how media URLs are resolved. A field holding
/// the wrong JSON type reads as absent instead of failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGameRecord {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub price: Option<RawPrice>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub media: Option<NestedMedia>,
}

/// A media URL slot present in every record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    Cover,
    Download,
}

/// Record layouts that can carry media URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaShape {
    /// Flat `coverImage` / `downloadLink` fields.
    Flat,
    /// First element of `media.images` / `media.downloadLinks`.
    Nested,
}

impl MediaShape {
    /// Resolution order: earlier shapes win.
    pub const PREFERENCE: [Self; 2] = [Self::Flat, Self::Nested];

    /// The non-empty value this shape holds for `slot`, if any.
    pub fn value(self, record: &RawGameRecord, slot: MediaSlot) -> Option<&str> {
        let nested = record.media.as_ref();
        let value = match (self, slot) {
            (Self::Flat, MediaSlot::Cover) => record.cover_image.as_deref(),
            (Self::Flat, MediaSlot::Download) => record.download_link.as_deref(),
            (Self::Nested, MediaSlot::Cover) => nested
                .and_then(|m| m.images.as_deref())
                .and_then(<[String]>::first)
                .map(String::as_str),
            (Self::Nested, MediaSlot::Download) => nested
                .and_then(|m| m.download_links.as_deref())
                .and_then(<[String]>::first)
                .map(String::as_str),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl RawGameRecord {
    /// Resolves a media slot across shapes in preference order.
    pub fn media_url(&self, slot: MediaSlot) -> Option<(MediaShape, &str)> {
        MediaShape::PREFERENCE
            .into_iter()
            .find_map(|shape| shape.value(self, slot).map(|v| (shape, v)))
    }
}

/// Validated body of `PUT /games/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdate {
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub price: Price,
    /// Empty when the listing has no cover image.
    pub cover_image: String,
    /// Empty when the listing has no download link.
    pub download_link: String,
}
