//! Mouse and keyboard input.

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{KeyChord, KeyEventType, MouseButton, MouseEventType};

use super::core::PageSession;

impl PageSession {
    /// Move, press and release the left button at viewport coordinates.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.mouse_move(x, y).await?;

        for event in [MouseEventType::MousePressed, MouseEventType::MouseReleased] {
            self.call(
                "Input.dispatchMouseEvent",
                Some(json!({
                    "type": event,
                    "x": x,
                    "y": y,
                    "button": MouseButton::Left,
                    "clickCount": 1,
                })),
            )
            .await?;
        }

        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }

    pub async fn mouse_move(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseMoved,
                "x": x,
                "y": y,
                "button": MouseButton::None,
            })),
        )
        .await?;
        Ok(())
    }

    /// Insert text at the focused element as if typed.
    pub async fn insert_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("Typed {} characters", text.chars().count());
        Ok(())
    }

    /// Dispatch a full key down/up pair for the chord.
    pub async fn press_key(&self, chord: &KeyChord) -> Result<(), CdpError> {
        let down = if chord.text.is_empty() {
            KeyEventType::RawKeyDown
        } else {
            KeyEventType::KeyDown
        };

        for event in [down, KeyEventType::KeyUp] {
            let mut params = json!({
                "type": event,
                "key": chord.key,
                "code": chord.code,
                "windowsVirtualKeyCode": chord.key_code,
                "modifiers": chord.modifiers,
            });
            if matches!(event, KeyEventType::KeyDown) {
                params["text"] = json!(chord.text);
            }
            self.call("Input.dispatchKeyEvent", Some(params)).await?;
        }

        debug!("Pressed {}", chord.key);
        Ok(())
    }
}
