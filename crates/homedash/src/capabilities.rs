//! Input capabilities of the focused surface
//!
//! The keyboard middleware routes keys by what the focused surface accepts
//! rather than by which surface it is.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PanelCapabilities: u32 {
        /// Character keys are typed, not interpreted as shortcuts
        const TEXT_INPUT = 1 << 0;

        /// Up/Down move a cursor over a result list
        const ITEM_NAVIGATION = 1 << 1;
    }
}

impl PanelCapabilities {
    pub fn accepts_text_input(self) -> bool {
        self.contains(Self::TEXT_INPUT)
    }

    pub fn supports_item_navigation(self) -> bool {
        self.contains(Self::ITEM_NAVIGATION)
    }
}

impl Default for PanelCapabilities {
    fn default() -> Self {
        Self::empty()
    }
}
