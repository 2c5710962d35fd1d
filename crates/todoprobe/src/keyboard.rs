//! Keystroke sequences for typed input.
//!
//! Typed text may embed special keys in braces, e.g. `"foo{esc}"` or
//! `"Buy milk{enter}"`. A literal `{` is written as `{{}`.

use crate::result::{ProbeError, ProbeResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Special keys that can appear in a typed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// Backspace
    Backspace,
}

impl Key {
    /// Look up a key by its brace token name
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "enter" => Some(Self::Enter),
            "esc" | "escape" => Some(Self::Escape),
            "backspace" => Some(Self::Backspace),
            _ => None,
        }
    }

    /// DOM `KeyboardEvent.key` value
    #[must_use]
    pub const fn dom_key(self) -> &'static str {
        match self {
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::Backspace => "Backspace",
        }
    }

    /// Windows virtual key code, which Chromium also uses for `keyCode`
    #[must_use]
    pub const fn key_code(self) -> i64 {
        match self {
            Self::Enter => 13,
            Self::Escape => 27,
            Self::Backspace => 8,
        }
    }

    /// Text the key produces, if any
    #[must_use]
    pub const fn text(self) -> Option<&'static str> {
        match self {
            Self::Enter => Some("\r"),
            Self::Escape | Self::Backspace => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Enter => "enter",
            Self::Escape => "esc",
            Self::Backspace => "backspace",
        };
        write!(f, "{{{token}}}")
    }
}

/// One unit of typed input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keystroke {
    /// Literal text inserted as-is
    Text(String),
    /// A special key press
    Key(Key),
}

impl Keystroke {
    /// Literal text keystroke
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => f.write_str(t),
            Self::Key(k) => write!(f, "{k}"),
        }
    }
}

fn token_pattern() -> ProbeResult<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = PATTERN.get() {
        return Ok(re);
    }
    let re = Regex::new(r"\{(\{|[A-Za-z]+)\}")
        .map_err(|e| ProbeError::input(format!("key pattern: {e}")))?;
    Ok(PATTERN.get_or_init(|| re))
}

/// Parse a typed string into keystrokes.
///
/// Adjacent literal runs are merged, so `"a{{}b"` yields a single `Text("a{b")`.
///
/// # Errors
///
/// Returns an input error for an unknown `{token}`.
pub fn parse_keys(input: &str) -> ProbeResult<Vec<Keystroke>> {
    let mut keys = Vec::new();
    let mut literal = String::new();
    let mut last = 0;

    for caps in token_pattern()?.captures_iter(input) {
        let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        literal.push_str(&input[last..whole.start()]);
        last = whole.end();

        if token.as_str() == "{" {
            literal.push('{');
            continue;
        }

        let key = Key::from_token(token.as_str()).ok_or_else(|| {
            ProbeError::input(format!("unknown special key {{{}}}", token.as_str()))
        })?;
        if !literal.is_empty() {
            keys.push(Keystroke::Text(std::mem::take(&mut literal)));
        }
        keys.push(Keystroke::Key(key));
    }

    literal.push_str(&input[last..]);
    if !literal.is_empty() {
        keys.push(Keystroke::Text(literal));
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let keys = parse_keys("Get some sleep").unwrap();
        assert_eq!(keys, vec![Keystroke::text("Get some sleep")]);
    }

    #[test]
    fn test_trailing_enter() {
        let keys = parse_keys("Buy some food{enter}").unwrap();
        assert_eq!(
            keys,
            vec![Keystroke::text("Buy some food"), Keystroke::Key(Key::Enter)]
        );
    }

    #[test]
    fn test_escape_aliases() {
        assert_eq!(
            parse_keys("foo{esc}").unwrap(),
            parse_keys("foo{Escape}").unwrap()
        );
    }

    #[test]
    fn test_only_key() {
        assert_eq!(parse_keys("{enter}").unwrap(), vec![Keystroke::Key(Key::Enter)]);
    }

    #[test]
    fn test_literal_brace() {
        let keys = parse_keys("a{{}b").unwrap();
        assert_eq!(keys, vec![Keystroke::text("a{b")]);
    }

    #[test]
    fn test_whitespace_preserved() {
        let keys = parse_keys("   padded   ").unwrap();
        assert_eq!(keys, vec![Keystroke::text("   padded   ")]);
    }

    #[test]
    fn test_unknown_token() {
        let err = parse_keys("x{shift}").unwrap_err();
        assert!(err.to_string().contains("{shift}"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_keys("").unwrap().is_empty());
    }

    #[test]
    fn test_key_display_round_trips_token() {
        for key in [Key::Enter, Key::Escape, Key::Backspace] {
            let parsed = parse_keys(&key.to_string()).unwrap();
            assert_eq!(parsed, vec![Keystroke::Key(key)]);
        }
    }

    #[test]
    fn test_key_metadata() {
        assert_eq!(Key::Enter.key_code(), 13);
        assert_eq!(Key::Enter.text(), Some("\r"));
        assert_eq!(Key::Escape.dom_key(), "Escape");
        assert!(Key::Backspace.text().is_none());
    }
}
