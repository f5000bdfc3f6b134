//! Deck export and validated import.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::ir::SlideData;

pub const DECK_VERSION: u64 = 1;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck is not valid JSON: {0}")]
    Parse(String),
    #[error("deck must be a JSON object")]
    NotAnObject,
    #[error("unsupported deck version: {0}")]
    UnsupportedVersion(Value),
    /// `title` absent or empty, or `slides` absent, not an array or empty.
    #[error("deck is missing required fields: {field}")]
    MissingDeckFields { field: &'static str },
    #[error("slide #{index} is not an object")]
    InvalidSlide { index: usize },
    #[error("slide #{index} ({kind}) is missing required fields: {field}")]
    MissingFields {
        index: usize,
        kind: String,
        field: &'static str,
    },
    #[error("slide #{index} ({kind}) could not be decoded: {source}")]
    Decode {
        index: usize,
        kind: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize deck: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckExportPayload {
    pub version: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub slides: Vec<SlideData>,
}

/// An imported deck as the library keeps it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckMeta {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: String,
    pub slides: Vec<SlideData>,
}

impl DeckMeta {
    pub fn from_payload<Tz>(payload: DeckExportPayload, now: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            id: format!("deck-{}", now.timestamp_millis()),
            title: payload.title,
            description: payload.description,
            date: now.format("%Y-%m-%d").to_string(),
            slides: payload.slides,
        }
    }
}

pub fn export_deck(title: &str, description: Option<&str>, slides: &[SlideData]) -> Result<String, DeckError> {
    let payload = DeckExportPayload {
        version: DECK_VERSION,
        title: title.to_string(),
        description: description.map(str::to_string),
        slides: slides.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Fields each slide type must carry before it is decoded.
struct Required {
    strings: &'static [&'static str],
    arrays: &'static [&'static str],
    objects: &'static [&'static str],
}

const fn req(
    strings: &'static [&'static str],
    arrays: &'static [&'static str],
    objects: &'static [&'static str],
) -> Required {
    Required {
        strings,
        arrays,
        objects,
    }
}

fn required_fields(kind: &str) -> Option<Required> {
    let fields = match kind {
        "title" | "key-point" => req(&["title"], &[], &[]),
        "chart" => req(&["title", "chartType"], &[], &[]),
        "grid-item" => req(&["title", "variant"], &["items"], &[]),
        "sequence" | "cycle" => req(&["title", "variant"], &["steps"], &[]),
        "compare" => req(&["title", "mode"], &[], &[]),
        "funnel" | "stack" => req(&["title", "variant"], &["layers"], &[]),
        "concentric" => req(&["title", "variant"], &["rings"], &[]),
        "hub-spoke" => req(&["title", "variant"], &["spokes"], &["center"]),
        "venn" => req(&["title", "variant"], &["sets"], &[]),
        "table" => req(&["title", "variant"], &["headers", "rows"], &[]),
        "roadmap" => req(&["title", "variant"], &["phases"], &[]),
        "swot" => req(&["title"], &["strengths", "weaknesses", "opportunities", "threats"], &[]),
        "mindmap" => req(&["title"], &[], &["root"]),
        "block-slide" => req(&["title"], &["blocks"], &[]),
        _ => return None,
    };
    Some(fields)
}

/// First required field that is absent or has the wrong shape.
fn first_violation(slide: &Map<String, Value>, required: &Required) -> Option<&'static str> {
    let strings = required
        .strings
        .iter()
        .find(|f| !slide.get(**f).is_some_and(Value::is_string));
    let arrays = required.arrays.iter().find(|f| match slide.get(**f) {
        Some(Value::Array(items)) => !items.iter().all(|el| el.is_object() || el.is_string()),
        _ => true,
    });
    let objects = required
        .objects
        .iter()
        .find(|f| !slide.get(**f).is_some_and(Value::is_object));
    strings.or(arrays).or(objects).copied()
}

fn parse(raw: &str) -> Result<Value, DeckError> {
    serde_json::from_str(raw).or_else(|strict| {
        json5::from_str::<Value>(raw).map_err(|_| DeckError::Parse(strict.to_string()))
    })
}

/// Parses and validates a deck file. Strict JSON is tried first, then JSON5
/// for hand-edited files. Validation stops at the first bad slide.
pub fn import_deck(raw: &str) -> Result<DeckExportPayload, DeckError> {
    let result = validate(raw);
    if let Err(err) = &result {
        tracing::warn!(%err, "deck import rejected");
    }
    result
}

fn validate(raw: &str) -> Result<DeckExportPayload, DeckError> {
    let Value::Object(mut deck) = parse(raw)? else {
        return Err(DeckError::NotAnObject);
    };
    match deck.get("version") {
        // JSON5 may hand integers back as floats.
        Some(v) if v.as_f64() == Some(DECK_VERSION as f64) => {}
        other => return Err(DeckError::UnsupportedVersion(other.cloned().unwrap_or(Value::Null))),
    }
    let title = match deck.get("title") {
        Some(Value::String(title)) if !title.is_empty() => title.clone(),
        _ => return Err(DeckError::MissingDeckFields { field: "title" }),
    };
    let description = deck.get("description").and_then(Value::as_str).map(str::to_string);
    let slides = match deck.remove("slides") {
        Some(Value::Array(slides)) if !slides.is_empty() => slides,
        _ => return Err(DeckError::MissingDeckFields { field: "slides" }),
    };

    for (i, slide) in slides.iter().enumerate() {
        let index = i + 1;
        let Value::Object(fields) = slide else {
            return Err(DeckError::InvalidSlide { index });
        };
        let kind = fields
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let Some(required) = required_fields(&kind) else {
            return Err(DeckError::MissingFields {
                index,
                kind,
                field: "type",
            });
        };
        if let Some(field) = first_violation(fields, &required) {
            return Err(DeckError::MissingFields { index, kind, field });
        }
    }

    let slides = slides
        .into_iter()
        .enumerate()
        .map(|(i, slide)| {
            let kind = slide.get("type").and_then(Value::as_str).unwrap_or("unknown").to_string();
            serde_json::from_value(slide).map_err(|source| DeckError::Decode {
                index: i + 1,
                kind,
                source,
            })
        })
        .collect::<Result<Vec<SlideData>, _>>()?;

    tracing::debug!(title = %title, slides = slides.len(), "deck imported");
    Ok(DeckExportPayload {
        version: DECK_VERSION,
        title,
        description,
        slides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::create_default_slide;
    use crate::ir::SlideKind;
    use chrono::Utc;

    #[test]
    fn export_then_import_keeps_every_kind() {
        let slides: Vec<SlideData> = SlideKind::ALL.into_iter().map(create_default_slide).collect();
        let raw = export_deck("Quarterly review", Some("Internal"), &slides).unwrap();
        let deck = import_deck(&raw).unwrap();
        assert_eq!(deck.title, "Quarterly review");
        assert_eq!(deck.description.as_deref(), Some("Internal"));
        assert_eq!(deck.slides, slides);
    }

    #[test]
    fn json5_is_accepted_as_a_fallback() {
        let raw = "{version: 1, title: 'Deck', slides: [{type: 'key-point', title: 'Hi',},],}";
        let deck = import_deck(raw).unwrap();
        assert_eq!(deck.slides[0].kind(), SlideKind::KeyPoint);
    }

    #[test]
    fn deck_level_errors() {
        assert!(matches!(import_deck("not json {"), Err(DeckError::Parse(_))));
        assert!(matches!(import_deck("[]"), Err(DeckError::NotAnObject)));
        assert!(matches!(
            import_deck(r#"{"version": 2, "title": "x", "slides": []}"#),
            Err(DeckError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            import_deck(r#"{"version": 1, "title": "", "slides": []}"#),
            Err(DeckError::MissingDeckFields { field: "title" })
        ));
        assert!(matches!(
            import_deck(r#"{"version": 1, "slides": [{"type": "title", "title": "t"}]}"#),
            Err(DeckError::MissingDeckFields { field: "title" })
        ));
        assert!(matches!(
            import_deck(r#"{"version": 1, "title": "x", "slides": []}"#),
            Err(DeckError::MissingDeckFields { field: "slides" })
        ));
    }

    #[test]
    fn absent_slides_are_a_missing_field() {
        let err = import_deck(r#"{"version": 1, "title": "x"}"#).unwrap_err();
        assert!(matches!(err, DeckError::MissingDeckFields { field: "slides" }));
        assert!(err.to_string().contains("missing required fields"));

        let err = import_deck(r#"{"version": 1, "title": "x", "slides": {}}"#).unwrap_err();
        assert!(err.to_string().contains("missing required fields: slides"));
    }

    #[test]
    fn slide_errors_name_index_and_type() {
        let raw = r#"{"version": 1, "title": "x", "slides": [
            {"type": "title", "title": "ok"},
            {"type": "hub-spoke", "title": "t", "variant": "orbit", "spokes": [], "center": []}
        ]}"#;
        let err = import_deck(raw).unwrap_err();
        assert!(matches!(
            &err,
            DeckError::MissingFields { index: 2, kind, field: "center" } if kind == "hub-spoke"
        ));
        assert!(err.to_string().contains("slide #2 (hub-spoke)"));

        let raw = r#"{"version": 1, "title": "x", "slides": [{"type": "table", "title": "t", "variant": "striped", "headers": [null], "rows": []}]}"#;
        assert!(matches!(import_deck(raw), Err(DeckError::MissingFields { field: "headers", .. })));

        let raw = r#"{"version": 1, "title": "x", "slides": [{"type": "poster", "title": "t"}]}"#;
        assert!(matches!(import_deck(raw), Err(DeckError::MissingFields { index: 1, .. })));

        let raw = r#"{"version": 1, "title": "x", "slides": [42]}"#;
        assert!(matches!(import_deck(raw), Err(DeckError::InvalidSlide { index: 1 })));
    }

    #[test]
    fn meta_stamps_id_and_date() {
        let payload = DeckExportPayload {
            version: 1,
            title: "Deck".into(),
            description: None,
            slides: vec![create_default_slide(SlideKind::Title)],
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        let meta = DeckMeta::from_payload(payload, now);
        assert_eq!(meta.date, "2024-03-07");
        assert_eq!(meta.id, format!("deck-{}", now.timestamp_millis()));
    }
}
