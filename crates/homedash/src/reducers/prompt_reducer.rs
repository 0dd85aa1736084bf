//! Text prompt reducer

use crate::actions::{PromptAction, PromptKind};
use crate::state::{PreferencesState, PromptState};

/// Current value of the preference a prompt edits
fn initial_input(kind: PromptKind, preferences: &PreferencesState) -> String {
    match kind {
        PromptKind::Timezone => preferences.timezone_input.clone(),
        PromptKind::DisplayName => preferences.display_name.clone(),
    }
}

pub fn reduce_prompt(
    state: Option<PromptState>,
    action: &PromptAction,
    preferences: &PreferencesState,
) -> Option<PromptState> {
    match action {
        PromptAction::Open(kind) => Some(PromptState {
            kind: *kind,
            input: initial_input(*kind, preferences),
        }),
        // The preferences middleware has already applied the input on Submit
        PromptAction::Submit | PromptAction::Cancel => None,
        PromptAction::Char(c) => state.map(|mut prompt| {
            prompt.input.push(*c);
            prompt
        }),
        PromptAction::Backspace => state.map(|mut prompt| {
            prompt.input.pop();
            prompt
        }),
        PromptAction::Clear => state.map(|mut prompt| {
            prompt.input.clear();
            prompt
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_prefills_current_value() {
        let mut preferences = PreferencesState::default();
        preferences.set_timezone("Europe/Berlin");

        let prompt = reduce_prompt(None, &PromptAction::Open(PromptKind::Timezone), &preferences);
        assert_eq!(
            prompt,
            Some(PromptState {
                kind: PromptKind::Timezone,
                input: "Europe/Berlin".to_string(),
            })
        );
    }

    #[test]
    fn test_editing_and_closing() {
        let preferences = PreferencesState::default();
        let mut prompt =
            reduce_prompt(None, &PromptAction::Open(PromptKind::DisplayName), &preferences);
        for c in "Ada/".chars() {
            prompt = reduce_prompt(prompt, &PromptAction::Char(c), &preferences);
        }
        prompt = reduce_prompt(prompt, &PromptAction::Backspace, &preferences);
        assert_eq!(prompt.as_ref().map(|p| p.input.as_str()), Some("Ada"));

        prompt = reduce_prompt(prompt, &PromptAction::Clear, &preferences);
        assert_eq!(prompt.as_ref().map(|p| p.input.as_str()), Some(""));

        assert_eq!(reduce_prompt(prompt, &PromptAction::Submit, &preferences), None);
    }

    #[test]
    fn test_typing_without_prompt_is_ignored() {
        let preferences = PreferencesState::default();
        assert_eq!(
            reduce_prompt(None, &PromptAction::Char('x'), &preferences),
            None
        );
    }
}
