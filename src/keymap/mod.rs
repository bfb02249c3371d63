//! Key-binding tables: per-category defaults, user overrides validated
//! against the known command set, and key-name translation.

use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyModifiers};

use crate::error::{Error, Result};

/// A resolved key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn plain(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c.to_ascii_lowercase()),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn function(n: u8) -> Self {
        Self {
            code: KeyCode::F(n),
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            KeyCode::Char(c) if self.modifiers.contains(KeyModifiers::CONTROL) => {
                write!(f, "^{}", c.to_ascii_uppercase())
            }
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::F(n) => write!(f, "F{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Translates a key name from the configuration into a chord.
///
/// Accepted forms: a single printable character (`!` through `}`), a control
/// chord like `^A`, or a function key `F1`–`F12`.
pub fn translate(name: &str) -> Result<KeyBinding> {
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(c), None, _) if ('!'..='}').contains(&c) => Ok(KeyBinding::plain(c)),
        (Some('^'), Some(c), None) if c.is_ascii_uppercase() => Ok(KeyBinding::ctrl(c)),
        (Some('F'), Some(_), _) => match name[1..].parse::<u8>() {
            Ok(n) if (1..=12).contains(&n) => Ok(KeyBinding::function(n)),
            _ => Err(Error::NoSuchKey(name.to_string())),
        },
        _ => Err(Error::NoSuchKey(name.to_string())),
    }
}

pub const GENERAL_COMMANDS: &[(&str, &str)] = &[
    ("compose", "n"),
    ("help", "h"),
    ("quit", "q"),
    ("refresh", "R"),
    ("search", "/"),
    ("top", "g"),
    ("bottom", "G"),
];

pub const STATUS_COMMANDS: &[(&str, &str)] = &[
    ("reply", "r"),
    ("favorite", "f"),
    ("quote", "Q"),
    ("delete", "d"),
    ("open_url", "o"),
    ("show_thread", "t"),
    ("show_user", "u"),
];

/// Command-to-key table for one category, defaults overlaid with validated
/// user overrides.
#[derive(Debug, Clone)]
pub struct KeyMapper {
    category: &'static str,
    resolved: HashMap<&'static str, KeyBinding>,
}

impl KeyMapper {
    pub fn new(
        category: &'static str,
        defaults: &'static [(&'static str, &'static str)],
        overrides: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut resolved = HashMap::with_capacity(defaults.len());
        for (command, key) in defaults {
            resolved.insert(*command, translate(key)?);
        }

        for (command, key) in overrides {
            let known = defaults
                .iter()
                .find(|(name, _)| name == command)
                .map(|(name, _)| *name)
                .ok_or_else(|| Error::NoSuchCommand {
                    category: category.to_string(),
                    command: command.clone(),
                })?;
            resolved.insert(known, translate(key)?);
        }

        Ok(Self { category, resolved })
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn get(&self, command: &str) -> Result<KeyBinding> {
        self.resolved
            .get(command)
            .copied()
            .ok_or_else(|| Error::NoSuchCommand {
                category: self.category.to_string(),
                command: command.to_string(),
            })
    }

    /// Reverse lookup for the event dispatch layer.
    pub fn command_for(&self, key: KeyBinding) -> Option<&'static str> {
        self.resolved
            .iter()
            .find(|(_, binding)| **binding == key)
            .map(|(command, _)| *command)
    }

    /// Command/key pairs sorted by command name.
    pub fn bindings(&self) -> Vec<(&'static str, KeyBinding)> {
        let mut bindings: Vec<_> = self
            .resolved
            .iter()
            .map(|(command, binding)| (*command, *binding))
            .collect();
        bindings.sort_by_key(|(command, _)| *command);
        bindings
    }
}

/// All key tables, one per category.
#[derive(Debug, Clone)]
pub struct KeyMappings {
    pub general: KeyMapper,
    pub status: KeyMapper,
}

impl KeyMappings {
    pub fn with_overrides(
        general: &HashMap<String, String>,
        status: &HashMap<String, String>,
    ) -> Result<Self> {
        Ok(Self {
            general: KeyMapper::new("general", GENERAL_COMMANDS, general)?,
            status: KeyMapper::new("status", STATUS_COMMANDS, status)?,
        })
    }

    pub fn defaults() -> Self {
        let none = HashMap::new();
        Self::with_overrides(&none, &none).expect("default key tables are valid")
    }
}
