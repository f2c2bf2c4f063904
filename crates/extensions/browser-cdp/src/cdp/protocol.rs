//! CDP wire messages and the few domain types the driver exchanges.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// CDP request message.
#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Either a command response (`id` set) or an event (`method` set).
#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
    pub params: Option<Value>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
    pub data: Option<String>,
}

/// Page entry from the `/json/new` and `/json/list` endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub web_socket_debugger_url: Option<String>,
}

/// Browser version info.
///
/// Chrome returns PascalCase field names for this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

// ============================================================================
// Input Types
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    None,
    Left,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventType {
    MousePressed,
    MouseReleased,
    MouseMoved,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventType {
    KeyDown,
    KeyUp,
    RawKeyDown,
}

/// A key press such as `Enter` or `Control+A`, ready for `Input.dispatchKeyEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub code: String,
    pub key_code: u32,
    /// Text inserted by the key, empty for non-printing keys.
    pub text: String,
    /// Modifier bit mask: alt=1, ctrl=2, meta=4, shift=8.
    pub modifiers: u8,
}

impl KeyChord {
    /// Parse `"Enter"`, `"a"`, `"Shift+Tab"` or `"Control+a"`.
    pub fn parse(combo: &str) -> Option<Self> {
        let combo = combo.trim();
        if combo.is_empty() {
            return None;
        }

        // A lone "+" is the plus key, not a separator.
        let (modifier_names, key) = match combo.rsplit_once('+') {
            Some((head, "")) if !head.is_empty() => (head.trim_end_matches('+'), "+"),
            Some((head, tail)) if !head.is_empty() => (head, tail),
            _ => ("", combo),
        };
        let names: Vec<&str> = modifier_names.split('+').filter(|s| !s.is_empty()).collect();
        let modifiers = Self::modifier_flags(&names);

        let (key, code, key_code, text) = Self::describe(key)?;
        // Chords with ctrl/alt/meta are shortcuts, not text input.
        let text = if modifiers & 0b0111 != 0 { String::new() } else { text };

        Some(Self {
            key,
            code,
            key_code,
            text,
            modifiers,
        })
    }

    pub(crate) fn modifier_flags(names: &[&str]) -> u8 {
        let mut flags = 0;
        for name in names {
            match name.to_ascii_lowercase().as_str() {
                "alt" | "option" => flags |= 1,
                "control" | "ctrl" => flags |= 2,
                "meta" | "command" | "cmd" => flags |= 4,
                "shift" => flags |= 8,
                _ => {}
            }
        }
        flags
    }

    fn describe(key: &str) -> Option<(String, String, u32, String)> {
        let named = match key.to_ascii_lowercase().as_str() {
            "enter" | "return" => Some(("Enter", "Enter", 13, "\r")),
            "tab" => Some(("Tab", "Tab", 9, "")),
            "escape" | "esc" => Some(("Escape", "Escape", 27, "")),
            "backspace" => Some(("Backspace", "Backspace", 8, "")),
            "delete" => Some(("Delete", "Delete", 46, "")),
            "space" => Some((" ", "Space", 32, " ")),
            "arrowup" | "up" => Some(("ArrowUp", "ArrowUp", 38, "")),
            "arrowdown" | "down" => Some(("ArrowDown", "ArrowDown", 40, "")),
            "arrowleft" | "left" => Some(("ArrowLeft", "ArrowLeft", 37, "")),
            "arrowright" | "right" => Some(("ArrowRight", "ArrowRight", 39, "")),
            "home" => Some(("Home", "Home", 36, "")),
            "end" => Some(("End", "End", 35, "")),
            "pageup" => Some(("PageUp", "PageUp", 33, "")),
            "pagedown" => Some(("PageDown", "PageDown", 34, "")),
            _ => None,
        };
        if let Some((key, code, key_code, text)) = named {
            return Some((key.to_string(), code.to_string(), key_code, text.to_string()));
        }

        let mut chars = key.chars();
        let ch = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let upper = ch.to_ascii_uppercase();
        let (code, key_code) = if ch.is_ascii_alphabetic() {
            (format!("Key{}", upper), upper as u32)
        } else if ch.is_ascii_digit() {
            (format!("Digit{}", ch), ch as u32)
        } else {
            (String::new(), 0)
        };
        Some((ch.to_string(), code, key_code, ch.to_string()))
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
