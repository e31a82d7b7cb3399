//! Mapping between store documents and [`Record`]s
//!
//! The key names are fixed so existing collections keep working:
//!
//! | Record field | Document key  |
//! |--------------|---------------|
//! | `title`      | `name`        |
//! | `body`       | `description` |
//! | `timestamp`  | `date`        |
//! | `items`      | `exercises`   |
//!
//! Each sub-item is written as `{ name, image, observation }`.
//!
//! Decoding is lenient. Documents written by older clients or edited by
//! hand may miss any key, so every field has a fallback instead of an error.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::store::{Fields, StoredDocument};
use crate::types::{Record, SubItem};

pub const KEY_TITLE: &str = "name";
pub const KEY_BODY: &str = "description";
pub const KEY_DATE: &str = "date";
pub const KEY_ITEMS: &str = "exercises";

pub const KEY_ITEM_NAME: &str = "name";
pub const KEY_ITEM_IMAGE: &str = "image";
pub const KEY_ITEM_NOTE: &str = "observation";

/// Format of the `date` key
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(DATE_FORMAT).to_string()
}

/// Fields for a brand new document
pub fn encode_new(title: &str, body: &str, items: &[SubItem], now: DateTime<Utc>) -> Fields {
    let mut fields = encode_update(title, body, now);
    fields.insert(KEY_ITEMS.to_string(), encode_items(items));
    fields
}

/// Fields for a partial update; `exercises` is left to the caller
pub fn encode_update(title: &str, body: &str, now: DateTime<Utc>) -> Fields {
    let mut fields = Map::new();
    fields.insert(KEY_TITLE.to_string(), Value::String(title.to_string()));
    fields.insert(KEY_BODY.to_string(), Value::String(body.to_string()));
    fields.insert(KEY_DATE.to_string(), Value::String(format_date(&now)));
    fields
}

pub fn encode_items(items: &[SubItem]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| {
                let mut map = Map::new();
                map.insert(KEY_ITEM_NAME.to_string(), Value::String(item.name.clone()));
                map.insert(KEY_ITEM_IMAGE.to_string(), optional_string(&item.image));
                map.insert(KEY_ITEM_NOTE.to_string(), optional_string(&item.note));
                Value::Object(map)
            })
            .collect(),
    )
}

/// Build a record from a stored document, filling every missing field
pub fn decode(document: &StoredDocument) -> Record {
    let fields = &document.fields;
    Record {
        id: Some(document.id.clone()),
        title: text(fields.get(KEY_TITLE)),
        body: text(fields.get(KEY_BODY)),
        timestamp: timestamp(fields.get(KEY_DATE)).unwrap_or_else(Utc::now),
        items: items(&document.id, fields.get(KEY_ITEMS)),
    }
}

fn optional_string(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s.clone()),
        None => Value::Null,
    }
}

/// Text value; numbers are rendered, anything else is empty
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => NaiveDateTime::parse_from_str(s, DATE_FORMAT)
            .map(|naive| naive.and_utc())
            .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
            .ok(),
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        // Native store timestamps serialize as { seconds, nanoseconds }
        Value::Object(map) => {
            let secs = map.get("seconds")?.as_i64()?;
            let nanos = map
                .get("nanoseconds")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            DateTime::from_timestamp(secs, nanos)
        }
        _ => None,
    }
}

fn items(document_id: &str, value: Option<&Value>) -> Vec<SubItem> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(map) => Some(SubItem {
                name: text(map.get(KEY_ITEM_NAME)),
                image: optional_text(map.get(KEY_ITEM_IMAGE)),
                note: optional_text(map.get(KEY_ITEM_NOTE)),
            }),
            other => {
                warn!(
                    "Skipping malformed exercise in document {}: {}",
                    document_id, other
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn document(id: &str, value: Value) -> StoredDocument {
        let Value::Object(fields) = value else {
            panic!("test documents must be objects");
        };
        StoredDocument {
            id: id.to_string(),
            fields,
        }
    }

    #[test]
    fn test_encode_new_uses_fixed_keys() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 5).unwrap();
        let items = vec![SubItem {
            name: "Squat".to_string(),
            image: Some("squat.png".to_string()),
            note: None,
        }];

        let fields = encode_new("Leg day", "heavy", &items, now);

        assert_eq!(fields["name"], json!("Leg day"));
        assert_eq!(fields["description"], json!("heavy"));
        assert_eq!(fields["date"], json!("2024-03-09 18:30:05"));
        assert_eq!(
            fields["exercises"],
            json!([{ "name": "Squat", "image": "squat.png", "observation": null }])
        );
    }

    #[test]
    fn test_encode_update_leaves_exercises_out() {
        let fields = encode_update("t", "b", Utc::now());
        assert!(!fields.contains_key(KEY_ITEMS));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_decode_complete_document() {
        let doc = document(
            "abc",
            json!({
                "name": "Push",
                "description": "bench + dips",
                "date": "2024-01-02 03:04:05",
                "exercises": [
                    { "name": "Bench", "image": "bench.jpg", "observation": "4x8" },
                    { "name": "Dips" }
                ]
            }),
        );

        let record = decode(&doc);

        assert_eq!(record.id.as_deref(), Some("abc"));
        assert_eq!(record.title, "Push");
        assert_eq!(record.body, "bench + dips");
        assert_eq!(
            record.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
        );
        assert_eq!(record.items.len(), 2);
        assert_eq!(record.items[0].note.as_deref(), Some("4x8"));
        assert_eq!(record.items[1].image, None);
    }

    #[test]
    fn test_decode_empty_document_uses_defaults() {
        let before = Utc::now();
        let record = decode(&document("x", json!({})));

        assert_eq!(record.title, "");
        assert_eq!(record.body, "");
        assert!(record.items.is_empty());
        assert!(record.timestamp >= before);
    }

    #[test]
    fn test_decode_numeric_title_is_rendered() {
        let record = decode(&document("x", json!({ "name": 7 })));
        assert_eq!(record.title, "7");
    }

    #[test]
    fn test_decode_alternative_timestamp_shapes() {
        let rfc = decode(&document("a", json!({ "date": "2024-05-01T10:00:00Z" })));
        assert_eq!(rfc.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());

        let native = decode(&document(
            "b",
            json!({ "date": { "seconds": 1_700_000_000, "nanoseconds": 0 } }),
        ));
        assert_eq!(native.timestamp.timestamp(), 1_700_000_000);

        let unix = decode(&document("c", json!({ "date": 1_600_000_000 })));
        assert_eq!(unix.timestamp.timestamp(), 1_600_000_000);
    }

    #[test]
    fn test_decode_unparsable_date_falls_back_to_now() {
        let before = Utc::now();
        let record = decode(&document("x", json!({ "date": "Monday March 2024" })));
        assert!(record.timestamp >= before);
    }

    #[test]
    fn test_decode_skips_malformed_exercises() {
        let record = decode(&document(
            "x",
            json!({ "exercises": ["not an object", { "name": "Row" }, 3] }),
        ));
        assert_eq!(record.items, vec![SubItem::new("Row")]);
    }

    #[test]
    fn test_decode_exercises_not_a_list() {
        let record = decode(&document("x", json!({ "exercises": "Row" })));
        assert!(record.items.is_empty());
    }
}
