//! Canvas input messages.
//!
//! The host receives pointer gestures and the reset control as
//! newline-delimited JSON, one message per line:
//!
//! ```text
//! {"type":"PointerDown","data":{"x":12.0,"y":40.5}}
//! {"type":"PointerMove","data":{"x":14.0,"y":41.0}}
//! {"type":"PointerUp"}
//! {"type":"Reset"}
//! ```
//!
//! Positions are in logical pixels of the canvas described by
//! `DisplayConfig` (`width` x `height`, origin top-left). The bitmap sent
//! for a guess is rendered at `scale` physical pixels per logical pixel.

use painting::Point;
use serde::{Deserialize, Serialize};

/// Errors that can occur while reading input messages.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Invalid input message: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Messages from the input surface to the drawing screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CanvasInput {
    /// Drag started at a canvas position (logical px)
    PointerDown(Point),
    /// Drag moved to a canvas position (logical px)
    PointerMove(Point),
    /// Drag ended
    PointerUp,
    /// Reset control pressed
    Reset,
}

impl CanvasInput {
    /// Parse one line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, InputError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(line)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pointer_messages() {
        assert_eq!(
            CanvasInput::parse_line(r#"{"type":"PointerDown","data":{"x":1.5,"y":2.0}}"#).unwrap(),
            Some(CanvasInput::PointerDown(Point::new(1.5, 2.0)))
        );
        assert_eq!(
            CanvasInput::parse_line(r#"{"type":"PointerMove","data":{"x":3,"y":4}}"#).unwrap(),
            Some(CanvasInput::PointerMove(Point::new(3.0, 4.0)))
        );
        assert_eq!(
            CanvasInput::parse_line(r#"{"type":"PointerUp"}"#).unwrap(),
            Some(CanvasInput::PointerUp)
        );
        assert_eq!(
            CanvasInput::parse_line(r#"  {"type":"Reset"}  "#).unwrap(),
            Some(CanvasInput::Reset)
        );
    }

    #[test]
    fn test_skip_blank_and_comments() {
        assert_eq!(CanvasInput::parse_line("").unwrap(), None);
        assert_eq!(CanvasInput::parse_line("   ").unwrap(), None);
        assert_eq!(CanvasInput::parse_line("# a circle").unwrap(), None);
    }

    #[test]
    fn test_invalid_message() {
        let err = CanvasInput::parse_line(r#"{"type":"Scribble"}"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid input message"));
    }

    #[test]
    fn test_serialize_matches_wire_format() {
        let json = serde_json::to_string(&CanvasInput::PointerDown(Point::new(1.0, 2.0))).unwrap();
        assert_eq!(json, r#"{"type":"PointerDown","data":{"x":1.0,"y":2.0}}"#);
    }
}
