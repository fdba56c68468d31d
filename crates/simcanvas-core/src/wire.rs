//! JSON portrayals ⇄ [`Frame`].
//!
//! The producer sends either an array of layers or an object keyed by layer
//! number, each layer being a list of portrayal objects such as
//! `{"Shape": "circle", "x": 0.5, "y": 0.5, "r": 10, "Color": "red", "Filled": "true"}`.
//! Decoding is lenient per shape: unknown tags become
//! [`ShapeDescriptor::Unknown`], portrayals missing a required field are
//! dropped and counted. A `null` frame is empty; any other scalar at the top
//! level is an error.
//!
//! Object keys are visited the way a browser's `for…in` visits them: array
//! indices in ascending order, then the remaining keys in insertion order.

use crate::error::{Error, Result};
use crate::model::{Frame, Layer, ShapeDescriptor};
use serde_json::{Map, Value, json};

/// A decoded frame plus the number of portrayals that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedFrame {
    pub frame: Frame,
    pub rejected: usize,
}

#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error("missing field `{0}`")]
    Missing(&'static str),
    #[error("field `{0}` is not a number")]
    NotNumber(&'static str),
    #[error("field `{0}` is not a string")]
    NotString(&'static str),
}

/// Decode a frame from its JSON text.
pub fn decode_frame(json: &str) -> Result<DecodedFrame> {
    let value: Value = serde_json::from_str(json)?;
    decode_frame_value(&value)
}

/// Decode a frame from an already-parsed JSON value.
pub fn decode_frame_value(value: &Value) -> Result<DecodedFrame> {
    if value.is_null() {
        return Ok(DecodedFrame::default());
    }
    let layers = ordered_entries(value).ok_or(Error::FrameLayout {
        found: kind_name(value),
    })?;

    let mut decoded = DecodedFrame::default();
    for layer_value in layers {
        let Some(items) = ordered_entries(layer_value) else {
            log::debug!("layer is {}, treating as empty", kind_name(layer_value));
            decoded.frame.push_layer(Layer::new());
            continue;
        };
        let mut layer = Layer::with_capacity(items.len());
        for item in items {
            match decode_shape(item) {
                Ok(shape) => layer.push(shape),
                Err(reason) => {
                    log::debug!("REJECT portrayal {item}: {reason}");
                    decoded.rejected += 1;
                }
            }
        }
        decoded.frame.push_layer(layer);
    }
    Ok(decoded)
}

/// Encode a frame as an array of layers of portrayals.
pub fn encode_frame(frame: &Frame) -> Value {
    Value::Array(
        frame
            .layers()
            .iter()
            .map(|layer| Value::Array(layer.iter().map(encode_shape).collect()))
            .collect(),
    )
}

// ─── Shapes ──────────────────────────────────────────────────────────────

fn decode_shape(value: &Value) -> std::result::Result<ShapeDescriptor, Rejection> {
    let tag = value.get("Shape").and_then(Value::as_str).unwrap_or_default();
    let shape = match tag {
        "circle" => ShapeDescriptor::Circle {
            x: number(value, "x")?,
            y: number(value, "y")?,
            r: number(value, "r")?,
            color: color(value)?,
            filled: filled(value),
        },
        "line" => ShapeDescriptor::Line {
            from_x: number(value, "from_x")?,
            from_y: number(value, "from_y")?,
            to_x: number(value, "to_x")?,
            to_y: number(value, "to_y")?,
            width: number(value, "width")?,
            color: color(value)?,
        },
        "arrowHead" => ShapeDescriptor::ArrowHead {
            x: number(value, "x")?,
            y: number(value, "y")?,
            angle: number(value, "angle")?,
            scale: if value.get("s").is_some() {
                number(value, "s")?
            } else {
                number(value, "scale")?
            },
            color: color(value)?,
            filled: filled(value),
        },
        other => ShapeDescriptor::Unknown {
            tag: other.to_string(),
        },
    };
    Ok(shape)
}

fn encode_shape(shape: &ShapeDescriptor) -> Value {
    match shape {
        ShapeDescriptor::Circle {
            x,
            y,
            r,
            color,
            filled,
        } => json!({
            "Shape": "circle",
            "x": x,
            "y": y,
            "r": r,
            "Color": color,
            "Filled": filled_str(*filled),
        }),
        ShapeDescriptor::Line {
            from_x,
            from_y,
            to_x,
            to_y,
            width,
            color,
        } => json!({
            "Shape": "line",
            "from_x": from_x,
            "from_y": from_y,
            "to_x": to_x,
            "to_y": to_y,
            "width": width,
            "Color": color,
        }),
        ShapeDescriptor::ArrowHead {
            x,
            y,
            angle,
            scale,
            color,
            filled,
        } => json!({
            "Shape": "arrowHead",
            "x": x,
            "y": y,
            "angle": angle,
            "s": scale,
            "Color": color,
            "Filled": filled_str(*filled),
        }),
        ShapeDescriptor::Unknown { tag } => {
            let mut map = Map::new();
            map.insert("Shape".into(), Value::String(tag.clone()));
            Value::Object(map)
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn number(value: &Value, key: &'static str) -> std::result::Result<f64, Rejection> {
    match value.get(key) {
        None | Some(Value::Null) => Err(Rejection::Missing(key)),
        Some(v) => v.as_f64().ok_or(Rejection::NotNumber(key)),
    }
}

fn color(value: &Value) -> std::result::Result<String, Rejection> {
    match value.get("Color") {
        None | Some(Value::Null) => Err(Rejection::Missing("Color")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(Rejection::NotString("Color")),
    }
}

/// Only the literal string `"true"` means filled.
fn filled(value: &Value) -> bool {
    matches!(value.get("Filled"), Some(Value::String(s)) if s == "true")
}

fn filled_str(filled: bool) -> &'static str {
    if filled { "true" } else { "false" }
}

/// Children of an array, or of an object with array-index keys first in
/// ascending order and the other keys after them in insertion order.
fn ordered_entries(value: &Value) -> Option<Vec<&Value>> {
    match value {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Object(map) => {
            let mut indexed: Vec<(u32, &Value)> = Vec::new();
            let mut named: Vec<&Value> = Vec::new();
            for (key, item) in map {
                match array_index(key) {
                    Some(n) => indexed.push((n, item)),
                    None => named.push(item),
                }
            }
            indexed.sort_by_key(|(n, _)| *n);
            Some(
                indexed
                    .into_iter()
                    .map(|(_, item)| item)
                    .chain(named)
                    .collect(),
            )
        }
        _ => None,
    }
}

/// `"3"` → 3, but not `"03"`, `"-1"` or `"3.0"`.
fn array_index(key: &str) -> Option<u32> {
    key.parse::<u32>().ok().filter(|n| n.to_string() == key)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single(json: &str) -> DecodedFrame {
        decode_frame(json).unwrap()
    }

    #[test]
    fn filled_only_for_literal_true_string() {
        for (raw, expected) in [
            (r#""true""#, true),
            (r#""false""#, false),
            (r#""TRUE""#, false),
            ("true", false),
            ("1", false),
        ] {
            let json = format!(
                r#"[[{{"Shape":"circle","x":0.1,"y":0.2,"r":3,"Color":"red","Filled":{raw}}}]]"#
            );
            let decoded = single(&json);
            let ShapeDescriptor::Circle { filled, .. } = decoded.frame.layers()[0][0] else {
                panic!("expected circle");
            };
            assert_eq!(filled, expected, "Filled = {raw}");
        }
    }

    #[test]
    fn missing_filled_means_outline() {
        let decoded = single(r#"[[{"Shape":"arrowHead","x":0,"y":0,"angle":0,"s":1,"Color":"red"}]]"#);
        assert_eq!(
            decoded.frame.layers()[0][0],
            ShapeDescriptor::arrow_head(0.0, 0.0, 0.0, 1.0, "red", false)
        );
    }

    #[test]
    fn arrow_head_accepts_scale_alias() {
        let decoded =
            single(r#"[[{"Shape":"arrowHead","x":0,"y":0,"angle":1.5,"scale":2,"Color":"red"}]]"#);
        assert_eq!(
            decoded.frame.layers()[0][0],
            ShapeDescriptor::arrow_head(0.0, 0.0, 1.5, 2.0, "red", false)
        );
    }

    #[test]
    fn unknown_and_missing_tags_become_unknown() {
        let decoded = single(r#"[[{"Shape":"rect","x":1}, {"x":1}, 42]]"#);
        assert_eq!(decoded.rejected, 0);
        assert_eq!(
            decoded.frame.layers()[0],
            vec![
                ShapeDescriptor::Unknown { tag: "rect".into() },
                ShapeDescriptor::Unknown { tag: String::new() },
                ShapeDescriptor::Unknown { tag: String::new() },
            ]
        );
    }

    #[test]
    fn malformed_portrayals_are_rejected_individually() {
        let decoded = single(
            r#"[[
                {"Shape":"circle","x":"0.5","y":0.5,"r":1,"Color":"red"},
                {"Shape":"line","from_x":0,"from_y":0,"to_x":1,"width":1,"Color":"red"},
                {"Shape":"circle","x":0.5,"y":0.5,"r":1,"Color":7},
                {"Shape":"circle","x":0.5,"y":0.5,"r":1,"Color":"green"}
            ]]"#,
        );
        assert_eq!(decoded.rejected, 3);
        assert_eq!(
            decoded.frame.layers()[0],
            vec![ShapeDescriptor::circle(0.5, 0.5, 1.0, "green", false)]
        );
    }

    #[test]
    fn object_layers_follow_numeric_key_order() {
        let decoded = single(
            r#"{
                "10": [{"Shape":"c"}],
                "2":  [{"Shape":"b"}],
                "extra": [{"Shape":"d"}],
                "0":  [{"Shape":"a"}]
            }"#,
        );
        let tags: Vec<&str> = decoded.frame.shapes().map(ShapeDescriptor::tag).collect();
        assert_eq!(tags, ["a", "b", "c", "d"]);
    }

    #[test]
    fn named_layer_keys_keep_insertion_order() {
        let decoded = single(
            r#"{
                "zeta": [{"Shape":"z"}],
                "1": [{"Shape":"one"}],
                "alpha": [{"Shape":"a"}]
            }"#,
        );
        let tags: Vec<&str> = decoded.frame.shapes().map(ShapeDescriptor::tag).collect();
        assert_eq!(tags, ["one", "z", "a"]);
    }

    #[test]
    fn array_index_rejects_non_canonical_keys() {
        assert_eq!(array_index("7"), Some(7));
        assert_eq!(array_index("07"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("1.0"), None);
    }

    #[test]
    fn scalar_top_level_is_an_error() {
        let err = decode_frame("3").unwrap_err();
        assert!(matches!(err, Error::FrameLayout { found: "a number" }));
        assert!(matches!(decode_frame("[[").unwrap_err(), Error::Decode(_)));
    }

    #[test]
    fn null_top_level_is_an_empty_frame() {
        let decoded = single("null");
        assert_eq!(decoded, DecodedFrame::default());
        assert_eq!(decoded.frame.shape_count(), 0);
    }

    #[test]
    fn scalar_layer_is_empty() {
        let decoded = single(r#"[null, [{"Shape":"circle","x":0,"y":0,"r":1,"Color":"red"}]]"#);
        assert_eq!(decoded.frame.layers().len(), 2);
        assert!(decoded.frame.layers()[0].is_empty());
        assert_eq!(decoded.frame.shape_count(), 1);
    }

    #[test]
    fn encoded_portrayals_use_wire_keys() {
        let frame = Frame::single(vec![ShapeDescriptor::arrow_head(0.5, 0.25, 1.0, 2.0, "Red", true)]);
        assert_eq!(
            encode_frame(&frame),
            json!([[{
                "Shape": "arrowHead",
                "x": 0.5,
                "y": 0.25,
                "angle": 1.0,
                "s": 2.0,
                "Color": "Red",
                "Filled": "true",
            }]])
        );
    }
}
