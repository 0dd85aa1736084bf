//! Text prompt actions
//!
//! The prompt edits one preference at a time. While it is open it owns the
//! keyboard, so `/` and `q` are typed rather than interpreted.

/// Which preference the prompt edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Timezone,
    DisplayName,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Timezone => "Timezone (IANA id, empty for system time)",
            Self::DisplayName => "Display name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Open(PromptKind),
    Char(char),
    Backspace,
    Clear,
    /// Apply the input, then close
    Submit,
    Cancel,
}
