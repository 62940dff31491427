//! Game Catalog Service client.
//!
//! Wire types for game records in both historical shapes, the validated
//! update body, and an async `reqwest` client that loads records and
//! submits bearer-authenticated updates.
//!
//! The [`CatalogService`] trait is the seam the editor drives; the Hub-style
//! split keeps transport here and the editing state machine in
//! `gamestall-editor`.

pub mod client;
pub mod error;
pub mod types;

pub use client::{CatalogService, HttpCatalog};
pub use error::{GenreError, LoadError, PriceError, SubmitError};
pub use reqwest::Url;
pub use types::{
    Credentials, GameId, GameUpdate, Genre, MediaShape, MediaSlot, NestedMedia, Price,
    RawGameRecord, RawPrice,
};
