use std::str::FromStr;

use crate::errors::DispatchError;

/// Keys the dispatcher can press, independent of the automation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Return,
    Tab,
    Escape,
    Backspace,
    Delete,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    CapsLock,
    Control,
    Shift,
    Alt,
    /// Command on macOS, the Windows/Super key elsewhere.
    Meta,
    F(u8),
    Char(char),
}

impl FromStr for KeyCode {
    type Err = DispatchError;

    /// Accepts the key vocabulary used by the grounding model, case-insensitive.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(KeyCode::Char(c));
        }

        let lower = name.trim().to_ascii_lowercase();
        let key = match lower.as_str() {
            "return" | "enter" => KeyCode::Return,
            "tab" => KeyCode::Tab,
            "escape" | "esc" => KeyCode::Escape,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" | "spacebar" => KeyCode::Space,
            "up" | "arrowup" => KeyCode::Up,
            "down" | "arrowdown" => KeyCode::Down,
            "left" | "arrowleft" => KeyCode::Left,
            "right" | "arrowright" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "capslock" => KeyCode::CapsLock,
            "ctrl" | "control" => KeyCode::Control,
            "shift" => KeyCode::Shift,
            "alt" | "option" => KeyCode::Alt,
            "cmd" | "command" | "win" | "super" | "meta" => KeyCode::Meta,
            other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                Some(n @ 1..=12) => KeyCode::F(n),
                _ => return Err(DispatchError::UnknownKey(name.to_string())),
            },
        };
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!("Return".parse::<KeyCode>().unwrap(), KeyCode::Return);
        assert_eq!("ENTER".parse::<KeyCode>().unwrap(), KeyCode::Return);
        assert_eq!("esc".parse::<KeyCode>().unwrap(), KeyCode::Escape);
        assert_eq!("PageDown".parse::<KeyCode>().unwrap(), KeyCode::PageDown);
        assert_eq!("command".parse::<KeyCode>().unwrap(), KeyCode::Meta);
    }

    #[test]
    fn single_characters_are_literal() {
        assert_eq!("v".parse::<KeyCode>().unwrap(), KeyCode::Char('v'));
        assert_eq!("F".parse::<KeyCode>().unwrap(), KeyCode::Char('F'));
        assert_eq!("/".parse::<KeyCode>().unwrap(), KeyCode::Char('/'));
    }

    #[test]
    fn function_keys() {
        assert_eq!("F5".parse::<KeyCode>().unwrap(), KeyCode::F(5));
        assert_eq!("f12".parse::<KeyCode>().unwrap(), KeyCode::F(12));
        assert!("F13".parse::<KeyCode>().is_err());
        assert!("f0".parse::<KeyCode>().is_err());
    }

    #[test]
    fn unknown_names_fail() {
        let err = "Hyper".parse::<KeyCode>().unwrap_err();
        assert!(matches!(err, DispatchError::UnknownKey(k) if k == "Hyper"));
        assert!("".parse::<KeyCode>().is_err());
    }
}
