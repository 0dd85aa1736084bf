//! Command palette actions

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandPaletteAction {
    /// Open with an empty query
    Open,
    /// Close and reset
    Close,
    /// Character typed into the search field
    Char(char),
    /// Backspace pressed in the search field
    Backspace,
    /// Clear the entire query
    Clear,
    /// Move the cursor down one entry
    NavigateNext,
    /// Move the cursor up one entry
    NavigatePrev,
    /// Activate the entry under the cursor, then close
    Execute,
}
