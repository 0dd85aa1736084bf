//! Command palette state

/// Palette state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaletteMode {
    #[default]
    Closed,
    /// Open, showing the default entries
    OpenEmpty,
    /// Open with a non-empty query
    OpenFiltered,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPaletteState {
    pub mode: PaletteMode,
    pub query: String,
    /// Cursor into the current entry list
    pub selected_index: usize,
}

impl CommandPaletteState {
    pub fn is_open(&self) -> bool {
        self.mode != PaletteMode::Closed
    }
}
