//! Key event to intent mapping.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nexus_core::palette::PaletteKey;
use nexus_core::suggestion::MAX_SUGGESTIONS;

use super::shortcut::Accelerator;

/// What a key press asks the front end to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The registered accelerator: publish on the shortcut channel.
    GlobalShortcut,
    OpenPalette,
    Palette(PaletteKey),
    Type(char),
    Backspace,
    /// Pointer stand-in: copy the selected suggestion into the input.
    SelectSuggestion,
    /// Pointer stand-in: submit the suggestion at this index.
    ActivateSuggestion(usize),
    ClearHistory,
    ToggleMaximize,
    Minimize,
    ToggleAlwaysOnTop,
    Quit,
    Ignore,
}

/// Maps a key press. The accelerator wins over every other binding.
pub fn map_key(event: &KeyEvent, palette_open: bool, accelerator: Option<&Accelerator>) -> Intent {
    if accelerator.is_some_and(|a| a.matches(event)) {
        return Intent::GlobalShortcut;
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);

    if ctrl {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Intent::Quit,
            KeyCode::Char('k') => Intent::OpenPalette,
            KeyCode::Char('l') => Intent::ClearHistory,
            KeyCode::Char('e') => Intent::ToggleMaximize,
            KeyCode::Char('n') => Intent::Minimize,
            KeyCode::Char('t') => Intent::ToggleAlwaysOnTop,
            _ => Intent::Ignore,
        };
    }

    if !palette_open {
        return Intent::Ignore;
    }

    match event.code {
        KeyCode::Up => Intent::Palette(PaletteKey::ArrowUp),
        KeyCode::Down => Intent::Palette(PaletteKey::ArrowDown),
        KeyCode::Tab => Intent::Palette(PaletteKey::Tab),
        KeyCode::Esc => Intent::Palette(PaletteKey::Escape),
        KeyCode::Enter => Intent::Palette(PaletteKey::Enter),
        KeyCode::Right => Intent::SelectSuggestion,
        KeyCode::Backspace => Intent::Backspace,
        KeyCode::Char(c) if alt => match c.to_digit(10) {
            Some(n) if (1..=MAX_SUGGESTIONS as u32).contains(&n) => {
                Intent::ActivateSuggestion(n as usize - 1)
            }
            _ => Intent::Ignore,
        },
        KeyCode::Char(c) => Intent::Type(c),
        _ => Intent::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_accelerator_takes_precedence() {
        let accelerator = Accelerator::parse("Ctrl+K").unwrap();
        assert_eq!(map_key(&ctrl('k'), false, Some(&accelerator)), Intent::GlobalShortcut);
        assert_eq!(map_key(&ctrl('k'), false, None), Intent::OpenPalette);
    }

    #[test]
    fn test_control_bindings_work_in_both_modes() {
        for open in [false, true] {
            assert_eq!(map_key(&ctrl('q'), open, None), Intent::Quit);
            assert_eq!(map_key(&ctrl('c'), open, None), Intent::Quit);
            assert_eq!(map_key(&ctrl('l'), open, None), Intent::ClearHistory);
            assert_eq!(map_key(&ctrl('e'), open, None), Intent::ToggleMaximize);
            assert_eq!(map_key(&ctrl('n'), open, None), Intent::Minimize);
            assert_eq!(map_key(&ctrl('t'), open, None), Intent::ToggleAlwaysOnTop);
        }
    }

    #[test]
    fn test_palette_keys_only_when_open() {
        assert_eq!(map_key(&press(KeyCode::Down), false, None), Intent::Ignore);
        assert_eq!(map_key(&press(KeyCode::Char('x')), false, None), Intent::Ignore);

        assert_eq!(
            map_key(&press(KeyCode::Down), true, None),
            Intent::Palette(PaletteKey::ArrowDown)
        );
        assert_eq!(
            map_key(&press(KeyCode::Esc), true, None),
            Intent::Palette(PaletteKey::Escape)
        );
        assert_eq!(map_key(&press(KeyCode::Char('3')), true, None), Intent::Type('3'));
        assert_eq!(map_key(&press(KeyCode::Backspace), true, None), Intent::Backspace);
        assert_eq!(map_key(&press(KeyCode::Right), true, None), Intent::SelectSuggestion);
    }

    #[test]
    fn test_alt_digits_activate_suggestions() {
        let alt = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT);
        assert_eq!(map_key(&alt('1'), true, None), Intent::ActivateSuggestion(0));
        assert_eq!(map_key(&alt('8'), true, None), Intent::ActivateSuggestion(7));
        assert_eq!(map_key(&alt('9'), true, None), Intent::Ignore);
        assert_eq!(map_key(&alt('0'), true, None), Intent::Ignore);
        assert_eq!(map_key(&alt('1'), false, None), Intent::Ignore);
    }
}
