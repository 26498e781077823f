//! Hotkeys recognised by the editor and the commands they issue.

use std::fmt;
use std::str::FromStr;

use crate::editing::Cmd;
use crate::model::Mark;

/// A key chord such as `mod+b`. `mod` stands for the platform's primary
/// modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub primary: bool,
    pub key: char,
}

impl Hotkey {
    pub fn primary(key: char) -> Self {
        Self { primary: true, key }
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.primary {
            write!(f, "mod+{}", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot parse hotkey {0:?}")]
pub struct InvalidHotkey(pub String);

impl FromStr for Hotkey {
    type Err = InvalidHotkey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let (primary, key) = match lowered.split_once('+') {
            Some(("mod" | "ctrl" | "cmd", key)) => (true, key),
            Some(_) => return Err(InvalidHotkey(s.to_string())),
            None => (false, lowered.as_str()),
        };
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(key), None) => Ok(Hotkey { primary, key }),
            _ => Err(InvalidHotkey(s.to_string())),
        }
    }
}

/// Commands bound to hotkeys. Inserting a field also moves the cursor past
/// it, so that one is a single command too.
pub fn command_for(hotkey: &Hotkey) -> Option<Cmd> {
    if !hotkey.primary {
        return None;
    }
    match hotkey.key {
        'b' => Some(Cmd::ToggleMark(Mark::Bold)),
        'i' => Some(Cmd::ToggleMark(Mark::Italic)),
        'u' => Some(Cmd::ToggleMark(Mark::Underlined)),
        '`' => Some(Cmd::ToggleMark(Mark::Code)),
        '3' => Some(Cmd::insert_field()),
        _ => None,
    }
}
