//! Accelerator parsing and the terminal shortcut registrar.
//!
//! Accelerators use the desktop syntax (`CommandOrControl+Shift+Space`).
//! A terminal has no command key, so every command-style modifier maps to
//! Control.

use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nexus_core::backend::ShortcutRegistrar;
use nexus_core::error::{NexusError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accelerator {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl Accelerator {
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("accelerator is empty".to_owned());
        }

        let parts = trimmed.split('+').map(str::trim).collect::<Vec<_>>();
        let mut modifiers = KeyModifiers::NONE;
        for modifier in &parts[..parts.len() - 1] {
            match modifier.to_ascii_lowercase().as_str() {
                "commandorcontrol" | "cmdorctrl" | "command" | "cmd" | "super" | "control"
                | "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                "alt" | "option" => modifiers |= KeyModifiers::ALT,
                _ => return Err(format!("unknown modifier '{modifier}'")),
            }
        }

        let key = parts[parts.len() - 1];
        let code = parse_key(key)?;
        Ok(Self { code, modifiers })
    }

    /// Whether `event` triggers this accelerator.
    ///
    /// Shift is not compared for non-letter keys: terminals rarely report it
    /// for them.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let event_code = match event.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        if event_code != self.code {
            return false;
        }

        let letter = matches!(self.code, KeyCode::Char(c) if c.is_ascii_alphabetic());
        let relevant = if letter {
            KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT
        } else {
            KeyModifiers::CONTROL | KeyModifiers::ALT
        };
        event.modifiers & relevant == self.modifiers & relevant
    }
}

fn parse_key(key: &str) -> std::result::Result<KeyCode, String> {
    let lower = key.to_ascii_lowercase();
    let code = match lower.as_str() {
        "" => return Err("missing key".to_owned()),
        "space" => KeyCode::Char(' '),
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "backspace" => KeyCode::Backspace,
        _ => {
            if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    KeyCode::F(n)
                } else {
                    return Err(format!("unsupported function key '{key}'"));
                }
            } else {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(format!("unknown key '{key}'")),
                }
            }
        }
    };
    Ok(code)
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_owned());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_owned());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_owned());
        }
        let key = match self.code {
            KeyCode::Char(' ') => "Space".to_owned(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        };
        parts.push(key);
        write!(f, "{}", parts.join("+"))
    }
}

/// Holds the accelerator bound to "open palette" for the key loop.
#[derive(Debug, Default)]
pub struct TerminalShortcutRegistrar {
    registered: RwLock<Option<Accelerator>>,
}

impl TerminalShortcutRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Accelerator> {
        *self.registered.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ShortcutRegistrar for TerminalShortcutRegistrar {
    async fn register(&self, accelerator: &str) -> Result<()> {
        let parsed = Accelerator::parse(accelerator)
            .map_err(|e| NexusError::config(format!("invalid accelerator '{}': {}", accelerator, e)))?;
        *self.registered.write().unwrap_or_else(|e| e.into_inner()) = Some(parsed);
        tracing::info!("[Shortcut] Registered {} as global shortcut", parsed);
        Ok(())
    }

    async fn unregister_all(&self) -> Result<()> {
        if self
            .registered
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .is_some()
        {
            tracing::info!("[Shortcut] Unregistered global shortcuts");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_default_accelerator() {
        let accelerator = Accelerator::parse("CommandOrControl+Shift+Space").unwrap();
        assert_eq!(accelerator.to_string(), "Ctrl+Shift+Space");
        assert!(accelerator.matches(&key(KeyCode::Char(' '), KeyModifiers::CONTROL)));
        assert!(accelerator.matches(&key(
            KeyCode::Char(' '),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
        assert!(!accelerator.matches(&key(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert!(!accelerator.matches(&key(KeyCode::Char(' '), KeyModifiers::ALT)));
    }

    #[test]
    fn test_letter_keys_compare_shift() {
        let accelerator = Accelerator::parse("Ctrl+Shift+P").unwrap();
        assert!(accelerator.matches(&key(
            KeyCode::Char('P'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
        assert!(!accelerator.matches(&key(KeyCode::Char('p'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_parse_function_and_named_keys() {
        assert_eq!(Accelerator::parse("Alt+F5").unwrap().to_string(), "Alt+F5");
        assert_eq!(Accelerator::parse("cmd+enter").unwrap().to_string(), "Ctrl+Enter");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Accelerator::parse("").is_err());
        assert!(Accelerator::parse("Hyper+Space").is_err());
        assert!(Accelerator::parse("Ctrl+").is_err());
        assert!(Accelerator::parse("Ctrl+F13").is_err());
        assert!(Accelerator::parse("Ctrl+Spacebar").is_err());
    }

    #[tokio::test]
    async fn test_registrar_lifecycle() {
        let registrar = TerminalShortcutRegistrar::new();
        assert!(registrar.current().is_none());

        registrar.register("CommandOrControl+Shift+Space").await.unwrap();
        assert!(registrar.current().is_some());

        registrar.unregister_all().await.unwrap();
        assert!(registrar.current().is_none());
    }

    #[tokio::test]
    async fn test_invalid_accelerator_is_config_error() {
        let registrar = TerminalShortcutRegistrar::new();
        let err = registrar.register("Nope+Space").await.unwrap_err();
        assert!(matches!(err, NexusError::Config(_)));
        assert!(registrar.current().is_none());
    }
}
