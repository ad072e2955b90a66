use alloc::string::{String, ToString};

use crate::*;

/// Text shown on the fixed center cell.
pub const FREE_SPACE_TEXT: &str = "FREE SPACE";

/// Where a card is in its flip lifecycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CardPhase {
    /// Interactive, the visible face holds the current phrase.
    #[default]
    Idle,
    /// A new phrase was written to the hidden face and the card flipped, the old face is cleared on settle.
    Swapping,
    /// First half of a reset, the card flipped to its blank face.
    Resetting,
    /// Both faces are empty, the card waits to be replaced by a new board.
    Blank,
}

impl CardPhase {
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Swapping | Self::Resetting)
    }
}

/// A single two-faced flip card of the board.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    faces: [String; 2],
    orientation: Orientation,
    phase: CardPhase,
    checked: bool,
    reroll: bool,
    toggleable: bool,
}

impl Card {
    /// Regular card showing `text` front up, checkable and rerollable.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_attributes(text, true, true, false)
    }

    /// The fixed free space: pre-checked, not toggleable and never rerolled.
    pub fn free() -> Self {
        Self::with_attributes(FREE_SPACE_TEXT, false, false, true)
    }

    fn with_attributes(text: impl Into<String>, reroll: bool, toggleable: bool, checked: bool) -> Self {
        Self {
            faces: [text.into(), String::new()],
            orientation: Orientation::FrontUp,
            phase: CardPhase::Idle,
            checked,
            reroll,
            toggleable,
        }
    }

    pub fn from_state(state: &FieldState) -> Self {
        let FieldAttributes {
            reroll,
            toggleable,
            checked,
        } = state.attributes;
        Self::with_attributes(state.text.as_str(), reroll, toggleable, checked)
    }

    pub fn to_state(&self) -> FieldState {
        FieldState {
            text: self.visible_text().to_string(),
            attributes: FieldAttributes {
                reroll: self.reroll,
                toggleable: self.toggleable,
                checked: self.checked,
            },
        }
    }

    pub fn visible_text(&self) -> &str {
        &self.faces[self.orientation.visible_face()]
    }

    pub fn hidden_text(&self) -> &str {
        &self.faces[self.orientation.hidden_face()]
    }

    /// Text of the front and back face, independent of orientation.
    pub fn faces(&self) -> (&str, &str) {
        (&self.faces[0], &self.faces[1])
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_toggleable(&self) -> bool {
        self.toggleable
    }

    pub fn reroll_enabled(&self) -> bool {
        self.reroll
    }

    /// Free cells are the only non-toggleable cards, their content is permanent.
    pub fn is_free(&self) -> bool {
        !self.toggleable
    }

    pub fn can_check(&self) -> bool {
        self.toggleable && self.phase == CardPhase::Idle
    }

    pub fn can_reroll(&self) -> bool {
        self.reroll && self.phase == CardPhase::Idle
    }

    pub fn check(&mut self) -> ActionOutcome {
        if !self.can_check() {
            return ActionOutcome::NoChange;
        }
        self.checked = !self.checked;
        ActionOutcome::Changed
    }

    /// Starts showing `phrase`: it lands on the hidden face before the flip so
    /// the animation never shows stale text.
    pub fn begin_reroll(&mut self, phrase: String) -> ActionOutcome {
        if !self.can_reroll() {
            return ActionOutcome::NoChange;
        }
        self.faces[self.orientation.hidden_face()] = phrase;
        self.checked = false;
        self.orientation = self.orientation.flipped();
        self.phase = CardPhase::Swapping;
        ActionOutcome::Pending
    }

    /// Flips to the blank face, the second half runs on [`Card::settle`].
    pub fn begin_reset(&mut self) -> ActionOutcome {
        if self.is_free() || self.phase != CardPhase::Idle {
            return ActionOutcome::NoChange;
        }
        self.faces[self.orientation.hidden_face()].clear();
        self.orientation = self.orientation.flipped();
        self.phase = CardPhase::Resetting;
        ActionOutcome::Pending
    }

    /// Completes the pending flip once the animation had time to finish.
    pub fn settle(&mut self) -> SettleOutcome {
        match self.phase {
            CardPhase::Idle | CardPhase::Blank => SettleOutcome::NoChange,
            CardPhase::Swapping => {
                self.faces[self.orientation.hidden_face()].clear();
                self.phase = CardPhase::Idle;
                SettleOutcome::Swapped
            }
            CardPhase::Resetting => {
                self.faces[self.orientation.hidden_face()].clear();
                self.orientation = self.orientation.flipped();
                self.checked = false;
                self.phase = CardPhase::Blank;
                SettleOutcome::Reset
            }
        }
    }

    pub(crate) fn disable_reroll(&mut self) -> bool {
        core::mem::replace(&mut self.reroll, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rerolled(mut card: Card, phrase: &str) -> Card {
        assert_eq!(card.begin_reroll(phrase.into()), ActionOutcome::Pending);
        assert_eq!(card.settle(), SettleOutcome::Swapped);
        card
    }

    #[test]
    fn new_card_shows_phrase_front_up() {
        let card = Card::new("alpha");

        assert_eq!(card.visible_text(), "alpha");
        assert_eq!(card.hidden_text(), "");
        assert_eq!(card.orientation(), Orientation::FrontUp);
        assert_eq!(card.phase(), CardPhase::Idle);
        assert!(!card.is_checked());
    }

    #[test]
    fn double_check_restores_checked_state() {
        let mut card = Card::new("alpha");

        assert_eq!(card.check(), ActionOutcome::Changed);
        assert!(card.is_checked());
        assert_eq!(card.check(), ActionOutcome::Changed);
        assert!(!card.is_checked());
    }

    #[test]
    fn free_card_ignores_checks_and_rerolls() {
        let mut card = Card::free();

        for _ in 0..3 {
            assert_eq!(card.check(), ActionOutcome::NoChange);
        }
        assert_eq!(card.begin_reroll("beta".into()), ActionOutcome::NoChange);
        assert_eq!(card.begin_reset(), ActionOutcome::NoChange);

        assert!(card.is_checked());
        assert_eq!(card.visible_text(), FREE_SPACE_TEXT);
    }

    #[test]
    fn reroll_writes_hidden_face_before_flip_and_clears_after_settle() {
        let mut card = Card::new("alpha");
        card.check();

        assert_eq!(card.begin_reroll("beta".into()), ActionOutcome::Pending);

        assert_eq!(card.phase(), CardPhase::Swapping);
        assert_eq!(card.orientation(), Orientation::BackUp);
        assert_eq!(card.visible_text(), "beta");
        assert_eq!(card.hidden_text(), "alpha");
        assert!(!card.is_checked());

        assert_eq!(card.settle(), SettleOutcome::Swapped);

        assert_eq!(card.phase(), CardPhase::Idle);
        assert_eq!(card.visible_text(), "beta");
        assert_eq!(card.hidden_text(), "");
    }

    #[test]
    fn swapping_card_rejects_new_transitions() {
        let mut card = Card::new("alpha");
        card.begin_reroll("beta".into());

        assert_eq!(card.check(), ActionOutcome::NoChange);
        assert_eq!(card.begin_reroll("gamma".into()), ActionOutcome::NoChange);
        assert_eq!(card.begin_reset(), ActionOutcome::NoChange);
        assert!(!card.is_checked());

        card.settle();
        assert_eq!(card.visible_text(), "beta");
    }

    #[test]
    fn consecutive_rerolls_alternate_faces() {
        let card = rerolled(rerolled(Card::new("alpha"), "beta"), "gamma");

        assert_eq!(card.orientation(), Orientation::FrontUp);
        assert_eq!(card.faces(), ("gamma", ""));
    }

    #[test]
    fn reset_blanks_both_faces_and_flips_back() {
        let mut card = rerolled(Card::new("alpha"), "beta");
        card.check();
        let before = card.orientation();

        assert_eq!(card.begin_reset(), ActionOutcome::Pending);
        assert_eq!(card.phase(), CardPhase::Resetting);
        assert_eq!(card.visible_text(), "");
        assert_eq!(card.hidden_text(), "beta");

        assert_eq!(card.settle(), SettleOutcome::Reset);
        assert_eq!(card.phase(), CardPhase::Blank);
        assert_eq!(card.orientation(), before);
        assert_eq!(card.faces(), ("", ""));
        assert_eq!(card.check(), ActionOutcome::NoChange);
    }

    #[test]
    fn settle_on_idle_card_is_a_no_op() {
        let mut card = Card::new("alpha");

        assert_eq!(card.settle(), SettleOutcome::NoChange);
        assert_eq!(card, Card::new("alpha"));
    }

    #[test]
    fn state_keeps_visible_text_and_flags_but_not_orientation() {
        let mut card = rerolled(Card::new("alpha"), "beta");
        card.check();
        card.disable_reroll();

        let state = card.to_state();
        let restored = Card::from_state(&state);

        assert_eq!(state.text, "beta");
        assert!(state.attributes.checked);
        assert!(!state.attributes.reroll);
        assert_eq!(restored.orientation(), Orientation::FrontUp);
        assert_eq!(restored.to_state(), state);
    }
}
