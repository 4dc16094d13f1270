use crate::domain::{ControlKey, Intent};

/// What the owning channel must do after a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    /// Transmit this intent as a complete replacement. Produced on every
    /// transition; there is no debouncing.
    Transmit(Intent),
    /// Escape was pressed: send quit and leave the match.
    Quit,
    /// The transition carries no wire effect.
    Ignored,
}

/// Edge-triggered tracker for the held movement/fire keys.
///
/// The eligibility gate (player alive and match not over) is pushed in by the
/// owner before each transition; while the gate is closed, held keys never
/// produce a non-zero intent, so a dead player's lingering key state cannot
/// be misread as ongoing control.
#[derive(Debug, Default)]
pub struct InputTracker {
    left: bool,
    right: bool,
    fire: bool,
    eligible: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        Self {
            eligible: true,
            ..Self::default()
        }
    }

    /// Updates the eligibility gate from the latest snapshot.
    pub fn set_eligibility(&mut self, eligible: bool) {
        self.eligible = eligible;
    }

    /// The intent reflecting exactly the held-key set at the last
    /// transition, forced to all-false while the gate is closed.
    pub fn current_intent(&self) -> Intent {
        if !self.eligible {
            return Intent::NONE;
        }
        Intent {
            left: self.left,
            right: self.right,
            fire: self.fire,
        }
    }

    /// Records a key press. Presses are ignored while ineligible; quit is
    /// handled regardless of the gate.
    pub fn key_down(&mut self, key: ControlKey) -> InputEffect {
        match key {
            ControlKey::Quit => return InputEffect::Quit,
            ControlKey::Left if self.eligible => self.left = true,
            ControlKey::Right if self.eligible => self.right = true,
            ControlKey::Fire if self.eligible => self.fire = true,
            _ => {}
        }
        InputEffect::Transmit(self.current_intent())
    }

    /// Records a key release. Releases always clear, even while ineligible,
    /// so key state cannot stick across death or game over. Releasing
    /// escape does nothing; only the press quits.
    pub fn key_up(&mut self, key: ControlKey) -> InputEffect {
        match key {
            ControlKey::Quit => return InputEffect::Ignored,
            ControlKey::Left => self.left = false,
            ControlKey::Right => self.right = false,
            ControlKey::Fire => self.fire = false,
        }
        InputEffect::Transmit(self.current_intent())
    }
}
