use crate::suggestion::{self, BUILTIN_CATALOGUE};

/// Keys the palette reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PaletteKey {
    ArrowUp,
    ArrowDown,
    Tab,
    Escape,
    Enter,
}

/// What a palette interaction produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteOutcome {
    /// Nothing changed (palette closed, or nothing to act on).
    Ignored,
    /// Transient state changed; the palette is still open.
    Updated,
    /// A command was resolved. The palette has closed.
    Dispatch(String),
    /// The palette was dismissed without a command.
    Dismissed,
}

/// Transient state of an open palette. Discarded on close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteSession {
    input: String,
    suggestions: Vec<String>,
    selected_index: usize,
    focus_requested: bool,
}

impl PaletteSession {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_suggestion(&self) -> Option<&str> {
        self.suggestions.get(self.selected_index).map(String::as_str)
    }
}

/// Visibility of the palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaletteState {
    #[default]
    Closed,
    Open(PaletteSession),
}

/// Turns key and pointer events into a resolved command or a cancellation.
///
/// The controller owns the transient palette state only. Dispatching the
/// resolved command and mirroring visibility into the session store are the
/// caller's job.
#[derive(Debug, Clone)]
pub struct PaletteController {
    catalogue: Vec<String>,
    state: PaletteState,
}

impl Default for PaletteController {
    fn default() -> Self {
        Self::new(BUILTIN_CATALOGUE)
    }
}

impl PaletteController {
    /// Creates a closed palette over the given catalogue.
    pub fn new<I, S>(catalogue: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            catalogue: catalogue.into_iter().map(Into::into).collect(),
            state: PaletteState::Closed,
        }
    }

    pub fn state(&self) -> &PaletteState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PaletteState::Open(_))
    }

    /// Returns the transient state if the palette is open.
    pub fn session(&self) -> Option<&PaletteSession> {
        match &self.state {
            PaletteState::Open(session) => Some(session),
            PaletteState::Closed => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut PaletteSession> {
        match &mut self.state {
            PaletteState::Open(session) => Some(session),
            PaletteState::Closed => None,
        }
    }

    /// Opens the palette with fresh transient state.
    ///
    /// Returns `false` if it was already open; the existing state is kept.
    pub fn open(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = PaletteState::Open(PaletteSession {
            input: String::new(),
            suggestions: suggestion::resolve("", &self.catalogue),
            selected_index: 0,
            focus_requested: true,
        });
        true
    }

    /// Closes the palette, discarding transient state. Returns `false` if it
    /// was already closed.
    pub fn close(&mut self) -> bool {
        !matches!(std::mem::take(&mut self.state), PaletteState::Closed)
    }

    /// Consumes a pending input-focus request raised by [`open`](Self::open).
    pub fn take_focus_request(&mut self) -> bool {
        self.session_mut()
            .map(|session| std::mem::take(&mut session.focus_requested))
            .unwrap_or(false)
    }

    /// Replaces the input text, re-resolving suggestions and resetting the
    /// selection.
    pub fn set_input(&mut self, text: impl Into<String>) -> PaletteOutcome {
        let text = text.into();
        let suggestions = suggestion::resolve(&text, &self.catalogue);
        match self.session_mut() {
            Some(session) => {
                session.input = text;
                session.suggestions = suggestions;
                session.selected_index = 0;
                PaletteOutcome::Updated
            }
            None => PaletteOutcome::Ignored,
        }
    }

    /// Appends a typed character to the input.
    pub fn push_char(&mut self, c: char) -> PaletteOutcome {
        match self.session() {
            Some(session) => {
                let mut text = session.input.clone();
                text.push(c);
                self.set_input(text)
            }
            None => PaletteOutcome::Ignored,
        }
    }

    /// Removes the last character of the input, if any.
    pub fn backspace(&mut self) -> PaletteOutcome {
        match self.session() {
            Some(session) if !session.input.is_empty() => {
                let mut text = session.input.clone();
                text.pop();
                self.set_input(text)
            }
            _ => PaletteOutcome::Ignored,
        }
    }

    pub fn handle_key(&mut self, key: PaletteKey) -> PaletteOutcome {
        if !self.is_open() {
            return PaletteOutcome::Ignored;
        }
        match key {
            PaletteKey::ArrowDown => self.move_selection(1),
            PaletteKey::ArrowUp => self.move_selection(-1),
            PaletteKey::Tab => self.autocomplete(),
            PaletteKey::Escape => {
                self.close();
                PaletteOutcome::Dismissed
            }
            PaletteKey::Enter => self.submit(),
        }
    }

    /// Resolves the command to run: the trimmed input if non-empty, else the
    /// selected suggestion. Without either the palette stays open.
    pub fn submit(&mut self) -> PaletteOutcome {
        let Some(session) = self.session() else {
            return PaletteOutcome::Ignored;
        };

        let typed = session.input.trim();
        let command = if typed.is_empty() {
            session.selected_suggestion().unwrap_or_default()
        } else {
            typed
        };

        if command.is_empty() {
            return PaletteOutcome::Ignored;
        }
        let command = command.to_string();
        self.close();
        PaletteOutcome::Dispatch(command)
    }

    /// Single pointer activation: copies the suggestion into the input.
    pub fn select_suggestion(&mut self, index: usize) -> PaletteOutcome {
        match self
            .session()
            .and_then(|session| session.suggestions.get(index))
            .cloned()
        {
            Some(text) => self.set_input(text),
            None => PaletteOutcome::Ignored,
        }
    }

    /// Double pointer activation: submits the suggestion directly, ignoring
    /// the input.
    pub fn activate_suggestion(&mut self, index: usize) -> PaletteOutcome {
        match self
            .session()
            .and_then(|session| session.suggestions.get(index))
            .cloned()
        {
            Some(command) => {
                self.close();
                PaletteOutcome::Dispatch(command)
            }
            None => PaletteOutcome::Ignored,
        }
    }

    fn move_selection(&mut self, step: isize) -> PaletteOutcome {
        let Some(session) = self.session_mut() else {
            return PaletteOutcome::Ignored;
        };
        let len = session.suggestions.len();
        if len == 0 {
            return PaletteOutcome::Ignored;
        }
        let current = session.selected_index.min(len - 1);
        session.selected_index = if step >= 0 {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        PaletteOutcome::Updated
    }

    fn autocomplete(&mut self) -> PaletteOutcome {
        match self
            .session()
            .and_then(|session| session.selected_suggestion())
            .map(str::to_string)
        {
            Some(text) => self.set_input(text),
            None => PaletteOutcome::Ignored,
        }
    }
}
