//! Raw record to editable model reconciliation.

use gamestall_catalog::{MediaSlot, RawGameRecord, RawPrice};

use crate::model::EditableGame;

/// Maps a catalog record onto the editable model.
///
/// Total: absent or `null` fields become empty strings. Media URLs are
/// resolved across record shapes by [`RawGameRecord::media_url`], so a
/// non-empty flat value always beats the nested one.
pub fn normalize(record: &RawGameRecord) -> EditableGame {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let media = |slot| {
        record
            .media_url(slot)
            .map(|(_, url)| url.to_string())
            .unwrap_or_default()
    };

    EditableGame {
        title: text(&record.title),
        description: text(&record.description),
        genre: text(&record.genre),
        price: record
            .price
            .as_ref()
            .map(RawPrice::as_text)
            .unwrap_or_default(),
        cover_image_url: media(MediaSlot::Cover),
        download_url: media(MediaSlot::Download),
    }
}
