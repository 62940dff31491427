fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use gamestall_catalog::{GameUpdate, Genre, MediaShape, MediaSlot, Price, RawGameRecord};
    use gamestall_editor::{EditableGame, normalize};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    fn load_record(name: &str) -> RawGameRecord {
        serde_json::from_value(load_fixture(name))
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"))
    }

    /// Normalizes JSON values so that integer-valued floats compare equal.
    ///
    /// The service may send `12.5` where Rust writes `12.5` and `10` where
    /// Rust writes `10.0`; both are the same amount.
    fn normalize_value(v: &serde_json::Value) -> serde_json::Value {
        match v {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => serde_json::json!(f),
                None => v.clone(),
            },
            serde_json::Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), normalize_value(v)))
                    .collect(),
            ),
            serde_json::Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(normalize_value).collect())
            }
            _ => v.clone(),
        }
    }

    // --- Record shapes ---

    #[test]
    fn flat_record_normalizes() {
        let record = load_record("record_flat.json");
        assert_eq!(
            record.media_url(MediaSlot::Cover).map(|(shape, _)| shape),
            Some(MediaShape::Flat)
        );

        let game = normalize(&record);
        assert_eq!(
            game,
            EditableGame {
                title: "Star Forge".into(),
                description: "Build fleets and conquer the rim.".into(),
                genre: "Strategy".into(),
                price: "9.99".into(),
                cover_image_url: "https://cdn.example.com/star-forge/cover.png".into(),
                download_url: "https://cdn.example.com/star-forge/build.zip".into(),
            }
        );
        assert!(game.validate().is_ok());
    }

    #[test]
    fn nested_record_uses_first_elements() {
        let game = normalize(&load_record("record_nested.json"));
        assert_eq!(game.price, "4.50");
        assert_eq!(game.cover_image_url, "https://cdn.example.com/moss/shot-1.png");
        assert_eq!(game.download_url, "https://cdn.example.com/moss/win.zip");
    }

    #[test]
    fn mixed_record_prefers_non_empty_flat_values() {
        let record = load_record("record_mixed.json");
        let game = normalize(&record);
        assert_eq!(game.cover_image_url, "https://cdn.example.com/tide/nested.png");
        assert_eq!(game.download_url, "https://cdn.example.com/tide/flat.zip");
        assert_eq!(game.price, "0");

        let update = game.validate().unwrap();
        assert_eq!(update.price, Price::from_cents(0));
        assert_eq!(update.genre, Genre::Adventure);
    }

    #[test]
    fn sparse_record_becomes_blank_fields() {
        let game = normalize(&load_record("record_sparse.json"));
        assert_eq!(game.title, "Untitled Draft");
        assert_eq!(game.description, "");
        assert_eq!(game.price, "");
        assert_eq!(game.cover_image_url, "");
        assert_eq!(game.download_url, "");
    }

    #[test]
    fn mistyped_fields_do_not_discard_the_record() {
        let game = normalize(&load_record("record_mistyped.json"));
        assert_eq!(game.title, "Star Forge");
        assert_eq!(game.description, "Build fleets and conquer the rim.");
        assert_eq!(game.genre, "Strategy");
        assert_eq!(game.price, "");
        // The first image is null, so there is no cover even though a later one exists.
        assert_eq!(game.cover_image_url, "");
        assert_eq!(game.download_url, "https://cdn.example.com/star-forge/build.zip");
    }

    #[test]
    fn normalized_records_are_stable_as_flat_records() {
        for name in [
            "record_flat.json",
            "record_nested.json",
            "record_mixed.json",
            "record_sparse.json",
            "record_mistyped.json",
        ] {
            let game = normalize(&load_record(name));
            let flat = serde_json::to_value(game.to_raw_record()).unwrap();
            let reparsed: RawGameRecord = serde_json::from_value(flat).unwrap();
            assert_eq!(normalize(&reparsed), game, "fixture {name}");
        }
    }

    // --- Update body ---

    #[test]
    fn update_body_roundtrip() {
        let fixture = load_fixture("update_body.json");
        let parsed: GameUpdate = serde_json::from_value(fixture.clone()).unwrap();
        assert_eq!(parsed.genre, Genre::Rpg);
        assert_eq!(parsed.price, Price::from_cents(1250));

        let reserialized = serde_json::to_value(&parsed).unwrap();
        assert_eq!(
            normalize_value(&fixture),
            normalize_value(&reserialized),
            "roundtrip mismatch:\n  fixture: {fixture}\n  rust:    {reserialized}"
        );
    }

    #[test]
    fn edited_form_serializes_to_update_body() {
        let game = EditableGame {
            title: "Star Forge".into(),
            description: "Build fleets and conquer the rim.".into(),
            genre: "rpg".into(),
            price: "12.50".into(),
            cover_image_url: "https://cdn.example.com/star-forge/cover.png".into(),
            download_url: String::new(),
        };
        let body = serde_json::to_value(game.validate().unwrap()).unwrap();
        assert_eq!(
            normalize_value(&body),
            normalize_value(&load_fixture("update_body.json"))
        );
    }
}
