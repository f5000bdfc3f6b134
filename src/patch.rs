//! Copy-on-write field updates addressed by dotted paths such as
//! `items.2.title` or `sides.0.items.1.value`.

use serde_json::Value;

use crate::ir::SlideData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Splits a dotted path. All-digit segments index arrays; everything else
/// names an object key. Empty segments are skipped.
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.parse::<usize>() {
            Ok(index) if segment.bytes().all(|b| b.is_ascii_digit()) => PathSegment::Index(index),
            _ => PathSegment::Key(segment.to_string()),
        })
        .collect()
}

/// Returns a copy of `root` with the value at `path` replaced by `new`.
///
/// The last segment may create a missing object key or overwrite an array
/// slot; an index one past the end appends. Every earlier segment must
/// already resolve to an object or array, otherwise `root` comes back
/// unchanged. An empty path replaces the whole value.
pub fn set_by_path(root: &Value, path: &[PathSegment], new: Value) -> Value {
    let Some((last, parents)) = path.split_last() else {
        return new;
    };
    let mut out = root.clone();
    let mut cursor = &mut out;
    for segment in parents {
        let next = match (segment, cursor) {
            (PathSegment::Key(key), Value::Object(map)) => map.get_mut(key),
            (PathSegment::Index(i), Value::Array(items)) => items.get_mut(*i),
            _ => None,
        };
        match next {
            Some(value) if value.is_object() || value.is_array() => cursor = value,
            _ => {
                tracing::debug!(?segment, "patch path does not resolve");
                return root.clone();
            }
        }
    }
    match (last, cursor) {
        (PathSegment::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), new);
        }
        (PathSegment::Index(i), Value::Object(map)) => {
            map.insert(i.to_string(), new);
        }
        (PathSegment::Index(i), Value::Array(items)) if *i < items.len() => items[*i] = new,
        (PathSegment::Index(i), Value::Array(items)) if *i == items.len() => items.push(new),
        _ => return root.clone(),
    }
    out
}

/// Applies one field edit to a slide through its JSON form. Edits that
/// leave the slide undecodable (a wrong type, an unknown variant tag) are
/// dropped and the original slide is returned.
pub fn patch_slide(slide: &SlideData, path: &str, value: Value) -> SlideData {
    let Ok(json) = serde_json::to_value(slide) else {
        return slide.clone();
    };
    let patched = set_by_path(&json, &parse_path(path), value);
    match serde_json::from_value(patched) {
        Ok(updated) => updated,
        Err(err) => {
            tracing::debug!(path, %err, "patch rejected");
            slide.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::create_default_slide;
    use crate::ir::SlideKind;
    use serde_json::json;

    #[test]
    fn paths_split_into_keys_and_indices() {
        assert_eq!(
            parse_path("sides.0.items"),
            vec![
                PathSegment::Key("sides".into()),
                PathSegment::Index(0),
                PathSegment::Key("items".into()),
            ]
        );
        assert_eq!(parse_path("a..b"), parse_path("a.b"));
    }

    #[test]
    fn nested_values_are_replaced_without_touching_the_source() {
        let source = json!({"steps": [{"label": "A"}, {"label": "B"}]});
        let patched = set_by_path(&source, &parse_path("steps.1.label"), json!("Z"));
        assert_eq!(patched["steps"][1]["label"], "Z");
        assert_eq!(source["steps"][1]["label"], "B");
    }

    #[test]
    fn missing_intermediates_leave_the_value_unchanged() {
        let source = json!({"center": null, "spokes": []});
        assert_eq!(set_by_path(&source, &parse_path("center.label"), json!("x")), source);
        assert_eq!(set_by_path(&source, &parse_path("spokes.3.label"), json!("x")), source);
        assert_eq!(set_by_path(&source, &parse_path("spokes.5"), json!({})), source);
    }

    #[test]
    fn appending_at_the_end_and_creating_keys() {
        let source = json!({"rows": [], "meta": {}});
        let appended = set_by_path(&source, &parse_path("rows.0"), json!({"cells": []}));
        assert_eq!(appended["rows"].as_array().map(Vec::len), Some(1));
        let created = set_by_path(&source, &parse_path("meta.note"), json!("hi"));
        assert_eq!(created["meta"]["note"], "hi");
    }

    #[test]
    fn slide_patches_decode_or_are_dropped() {
        let venn = create_default_slide(SlideKind::Venn);
        let SlideData::Venn(patched) = patch_slide(&venn, "sets.0.label", json!("Design")) else {
            panic!("expected venn");
        };
        assert_eq!(patched.content.sets[0].label, "Design");

        assert_eq!(patch_slide(&venn, "sets", json!("not a list")), venn);
        assert_eq!(patch_slide(&venn, "variant", json!(42)), venn);
    }
}
