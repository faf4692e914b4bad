//! Detector reply decoding.
//!
//! # Format
//!
//! ```json
//! {
//!   "detections": [
//!     { "bbox": [x1, y1, x2, y2], "score": 0.93, "category": "person" }
//!   ]
//! }
//! ```
//!
//! Extra fields are ignored. Scores within [`SCORE_TOLERANCE`] of `[0, 1]`
//! are clamped into range. Anything else that deviates from this shape is
//! an [`Error::Protocol`].

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;

use crate::codec::{XyxyBox, xyxy_to_xywh};
use crate::error::{Error, Result};

use super::detection::{Category, Detection};

// ============================================================================
// Constants
// ============================================================================

/// Slack allowed around `[0, 1]` for scores that went through float32 math.
pub const SCORE_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Wire Types
// ============================================================================

/// Reply body as sent by the detector.
#[derive(Debug, Deserialize)]
struct Reply {
    detections: Vec<WireDetection>,
}

/// One entry of the `detections` array.
#[derive(Debug, Deserialize)]
struct WireDetection {
    bbox: XyxyBox,
    score: f64,
    category: Category,
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes a reply payload into detections, preserving source order.
///
/// An empty `detections` array is a valid reply meaning nothing was found.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the payload is not UTF-8 JSON, the
/// `detections` field is missing or mistyped, or a score is not finite or
/// lies further than [`SCORE_TOLERANCE`] outside `[0, 1]`.
pub fn decode_reply(payload: &[u8]) -> Result<Vec<Detection>> {
    let reply: Reply = serde_json::from_slice(payload)
        .map_err(|e| Error::protocol(format!("invalid reply body: {e}")))?;

    reply
        .detections
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if !(-SCORE_TOLERANCE..=1.0 + SCORE_TOLERANCE).contains(&entry.score) {
                return Err(Error::protocol(format!(
                    "detection {index} has score {} outside [0, 1]",
                    entry.score
                )));
            }

            Ok(Detection::new(
                entry.category,
                entry.score.clamp(0.0, 1.0),
                xyxy_to_xywh(entry.bbox),
            ))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_conversion() {
        let payload = br#"{"detections":[
            {"bbox":[0,0,1,1],"score":0.9,"category":"a"},
            {"bbox":[5,5,6,7],"score":0.4,"category":"b"}
        ]}"#;

        let detections = decode_reply(payload).unwrap();

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].category(), &Category::from("a"));
        assert_eq!(detections[0].bbox().to_array(), [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(detections[0].score(), 0.9);
        assert_eq!(detections[1].category(), &Category::from("b"));
        assert_eq!(detections[1].bbox().to_array(), [5.0, 5.0, 1.0, 2.0]);
    }

    #[test]
    fn test_empty_detections() {
        let detections = decode_reply(br#"{"detections":[]}"#).unwrap();
        assert!(detections.is_empty());
    }

    #[test]
    fn test_numeric_category() {
        let payload = br#"{"detections":[{"bbox":[1,2,3,4],"score":1,"category":17}]}"#;
        let detections = decode_reply(payload).unwrap();
        assert_eq!(detections[0].category(), &Category::Id(17));
    }

    #[test]
    fn test_float_category() {
        let payload = br#"{"detections":[
            {"bbox":[1,2,3,4],"score":0.8,"category":2.0},
            {"bbox":[1,2,3,4],"score":0.7,"category":2.5}
        ]}"#;

        let detections = decode_reply(payload).unwrap();

        assert_eq!(detections[0].category(), &Category::Id(2));
        assert_eq!(detections[1].category(), &Category::Number(2.5));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let payload =
            br#"{"frame":12,"detections":[{"bbox":[1,2,3,4],"score":0.5,"category":"x","track":3}]}"#;
        assert_eq!(decode_reply(payload).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_detections_field() {
        let err = decode_reply(br#"{"objects":[]}"#).unwrap_err();
        assert!(err.is_protocol_error());
        assert!(err.to_string().contains("detections"));
    }

    #[test]
    fn test_not_json() {
        assert!(decode_reply(b"\xff\xd8 not json").unwrap_err().is_protocol_error());
    }

    #[test]
    fn test_short_bbox() {
        let payload = br#"{"detections":[{"bbox":[1,2,3],"score":0.5,"category":"x"}]}"#;
        assert!(decode_reply(payload).unwrap_err().is_protocol_error());
    }

    #[test]
    fn test_score_out_of_range() {
        let payload = br#"{"detections":[{"bbox":[1,2,3,4],"score":1.5,"category":"x"}]}"#;
        let err = decode_reply(payload).unwrap_err();
        assert!(err.is_protocol_error());
    }

    #[test]
    fn test_score_rounding_clamped() {
        let payload = br#"{"detections":[
            {"bbox":[1,2,3,4],"score":1.0000001,"category":"x"},
            {"bbox":[1,2,3,4],"score":-0.0000001,"category":"y"}
        ]}"#;

        let detections = decode_reply(payload).unwrap();

        assert_eq!(detections[0].score(), 1.0);
        assert_eq!(detections[1].score(), 0.0);
    }

    #[test]
    fn test_negative_score_rejected() {
        let payload = br#"{"detections":[{"bbox":[1,2,3,4],"score":-0.1,"category":"x"}]}"#;
        assert!(decode_reply(payload).unwrap_err().is_protocol_error());
    }
}
