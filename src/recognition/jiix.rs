//! JIIX export models and the word-selection rules applied to them.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::engine::RecognizerKind;
use crate::geometry::EngineScale;
use crate::models::{GestureType, TextRecognitionResult};

const COMMA_HEIGHT_RATIO: f64 = 0.5;
const CHARACTER_DOT: &str = ".";
const CHARACTER_COMMA: &str = ",";

/// Engine-space box (millimetres).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct JiixBoundingBox {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiixWord {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub candidates: Vec<String>,
    #[serde(rename = "bounding-box")]
    pub bounding_box: Option<JiixBoundingBox>,
}

/// Text export; character and stroke details are not read.
#[derive(Debug, Clone, Deserialize)]
pub struct JiixText {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub words: Vec<JiixWord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiixGesture {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub gestures: Vec<JiixGestureItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiixGestureItem {
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Outcome of reading a gesture export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureParse {
    Recognized(GestureType),
    /// Well-formed export with no gesture listed yet.
    Pending,
    /// The engine named a gesture this crate does not handle.
    Unknown(String),
}

pub fn parse_gesture(jiix: &str) -> Result<GestureParse> {
    let export: JiixGesture =
        serde_json::from_str(jiix).context("malformed gesture export")?;

    if export.kind != RecognizerKind::Gesture.as_str() {
        return Ok(GestureParse::Pending);
    }

    let Some(first) = export.gestures.first() else {
        return Ok(GestureParse::Pending);
    };

    Ok(match GestureType::from_engine_name(&first.kind) {
        Some(gesture) => GestureParse::Recognized(gesture),
        None => GestureParse::Unknown(first.kind.clone()),
    })
}

/// Text parser state: the reference word height survives across cycles so a
/// lone dot can be told apart from a comma.
#[derive(Debug, Clone, Default)]
pub struct WordSelector {
    reference: Option<JiixBoundingBox>,
}

impl WordSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the reference word box.
    pub fn reset(&mut self) {
        self.reference = None;
    }

    pub fn reference_height(&self) -> f64 {
        self.reference.map(|bbox| bbox.height).unwrap_or(0.0)
    }

    pub fn parse_text(&mut self, jiix: &str, scale: EngineScale) -> Result<TextRecognitionResult> {
        let export: JiixText = serde_json::from_str(jiix).context("malformed text export")?;
        Ok(self.select(&export, scale))
    }

    pub fn select(&mut self, export: &JiixText, scale: EngineScale) -> TextRecognitionResult {
        let mut result = TextRecognitionResult::default();

        if export.kind != RecognizerKind::Text.as_str() || export.words.is_empty() {
            return result;
        }

        if export.label.chars().count() == 1 {
            let word = &export.words[0];
            result.candidates = word.candidates.clone();
            result.label = self.single_character_label(&export.label, word);
            result.bounding_box = word
                .bounding_box
                .map(|bbox| scale.to_surface(bbox.x, bbox.y, bbox.width, bbox.height));
        } else {
            result.label = export.label.clone();
            if let Some(bbox) = longest_word(&export.words).and_then(|word| word.bounding_box) {
                self.reference = Some(bbox);
                result.bounding_box = Some(scale.to_surface(bbox.x, bbox.y, bbox.width, bbox.height));
            }
        }

        result
    }

    fn single_character_label(&self, label: &str, word: &JiixWord) -> String {
        let Some(top) = word.candidates.first() else {
            return label.to_string();
        };

        if top == CHARACTER_DOT {
            return top.clone();
        }

        let height = word.bounding_box.map(|bbox| bbox.height).unwrap_or(0.0);
        let has_comma = word.candidates.iter().any(|c| c == CHARACTER_COMMA);
        if has_comma && height <= self.reference_height() * COMMA_HEIGHT_RATIO {
            CHARACTER_COMMA.to_string()
        } else {
            top.clone()
        }
    }
}

fn longest_word(words: &[JiixWord]) -> Option<&JiixWord> {
    let mut longest: Option<&JiixWord> = None;
    for word in words {
        let longer = longest
            .map(|current| current.label.chars().count() < word.label.chars().count())
            .unwrap_or(true);
        if longer {
            longest = Some(word);
        }
    }
    longest
}

/// Require an export to be present.
pub fn require_export(export: Option<String>, kind: RecognizerKind) -> Result<String> {
    export.ok_or_else(|| {
        anyhow!(
            "ERROR: No exported result from {}.",
            kind.as_str().to_uppercase()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> EngineScale {
        EngineScale { x: 1.0, y: 1.0 }
    }

    fn word_export(label: &str, words: &str) -> String {
        format!(r#"{{"type":"Text","label":"{label}","words":[{words}]}}"#)
    }

    fn single(candidates: &str, height: f64) -> String {
        word_export(
            "x",
            &format!(
                r#"{{"label":"x","candidates":[{candidates}],"bounding-box":{{"x":0,"y":0,"width":2,"height":{height}}}}}"#
            ),
        )
    }

    fn seed_reference(selector: &mut WordSelector, height: f64) {
        let jiix = word_export(
            "hello you",
            &format!(
                r#"{{"label":"hello","bounding-box":{{"x":0,"y":0,"width":20,"height":{height}}}}},{{"label":" "}},{{"label":"you","bounding-box":{{"x":25,"y":0,"width":10,"height":3}}}}"#
            ),
        );
        let result = selector.parse_text(&jiix, scale()).unwrap();
        assert_eq!(result.label, "hello you");
    }

    #[test]
    fn multi_word_label_is_kept_and_longest_word_becomes_reference() {
        let mut selector = WordSelector::new();
        seed_reference(&mut selector, 10.0);
        assert_eq!(selector.reference_height(), 10.0);
    }

    #[test]
    fn low_single_character_becomes_comma() {
        let mut selector = WordSelector::new();
        seed_reference(&mut selector, 10.0);

        let result = selector.parse_text(&single(r#"",", ".""#, 5.0), scale()).unwrap();
        assert_eq!(result.label, ",");

        let result = selector.parse_text(&single(r#""'", ",""#, 4.0), scale()).unwrap();
        assert_eq!(result.label, ",");
    }

    #[test]
    fn tall_single_character_keeps_first_candidate() {
        let mut selector = WordSelector::new();
        seed_reference(&mut selector, 10.0);

        let result = selector.parse_text(&single(r#""'", ",""#, 5.1), scale()).unwrap();
        assert_eq!(result.label, "'");
        assert_eq!(result.candidates, vec!["'".to_string(), ",".to_string()]);
    }

    #[test]
    fn dot_on_top_wins_over_comma_height() {
        let mut selector = WordSelector::new();
        seed_reference(&mut selector, 10.0);

        let result = selector.parse_text(&single(r#"".", ",""#, 1.0), scale()).unwrap();
        assert_eq!(result.label, ".");
    }

    #[test]
    fn without_reference_comma_needs_zero_height() {
        let mut selector = WordSelector::new();
        let result = selector.parse_text(&single(r#""'", ",""#, 1.0), scale()).unwrap();
        assert_eq!(result.label, "'");
    }

    #[test]
    fn wrong_type_or_no_words_gives_empty_text() {
        let mut selector = WordSelector::new();
        let result = selector
            .parse_text(r#"{"type":"Math","label":"x","words":[]}"#, scale())
            .unwrap();
        assert!(result.label.is_empty());

        let result = selector.parse_text(r#"{"type":"Text","label":""}"#, scale()).unwrap();
        assert!(result.label.is_empty());
    }

    #[test]
    fn malformed_text_is_an_error() {
        let mut selector = WordSelector::new();
        assert!(selector.parse_text("{not json", scale()).is_err());
    }

    #[test]
    fn gesture_exports() {
        assert_eq!(
            parse_gesture(r#"{"type":"Gesture","gestures":[{"type":"scratch"}]}"#).unwrap(),
            GestureParse::Recognized(GestureType::Scratch)
        );
        assert_eq!(
            parse_gesture(r#"{"type":"Gesture","gestures":[]}"#).unwrap(),
            GestureParse::Pending
        );
        assert_eq!(
            parse_gesture(r#"{"type":"Gesture","gestures":[{"type":"zigzag"}]}"#).unwrap(),
            GestureParse::Unknown("zigzag".into())
        );
        assert!(parse_gesture("").is_err());
    }

    #[test]
    fn missing_export_names_the_recognizer() {
        let err = require_export(None, RecognizerKind::Gesture).unwrap_err();
        assert_eq!(err.to_string(), "ERROR: No exported result from GESTURE.");
    }

    #[test]
    fn character_details_in_a_full_export_are_skipped() {
        let jiix = r#"{"type":"Text","label":"ok","words":[{"label":"ok","candidates":["ok","oh"],"first-char":0,"last-char":1,"bounding-box":{"x":0,"y":0,"width":6,"height":4}}],"chars":[{"label":"o","word":0,"bounding-box":{"x":0,"y":0,"width":3,"height":4}},{"label":"k","word":0}],"version":"3"}"#;
        let mut selector = WordSelector::new();
        let result = selector.parse_text(jiix, scale()).unwrap();
        assert_eq!(result.label, "ok");
        assert_eq!(selector.reference_height(), 4.0);
    }
}
