use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One per-tick control action.
///
/// A decision call yields exactly one of these; the host applies at most one
/// action per tick before gravity.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    #[display("shift-left")]
    ShiftLeft,
    #[display("shift-right")]
    ShiftRight,
    #[display("rotate")]
    Rotate,
    #[display("soft-drop")]
    SoftDrop,
    #[display("hard-drop")]
    HardDrop,
    #[default]
    #[serde(rename = "no-op")]
    #[display("no-op")]
    Noop,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::ShiftLeft,
        Action::ShiftRight,
        Action::Rotate,
        Action::SoftDrop,
        Action::HardDrop,
        Action::Noop,
    ];

    /// Key token the host reads from its input queue, or `None` for [`Action::Noop`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cognito_engine::Action;
    ///
    /// assert_eq!(Action::Rotate.key(), Some("w"));
    /// assert_eq!(Action::HardDrop.key(), Some(" "));
    /// assert_eq!(Action::Noop.key(), None);
    /// ```
    #[must_use]
    pub const fn key(self) -> Option<&'static str> {
        match self {
            Action::Rotate => Some("w"),
            Action::ShiftLeft => Some("a"),
            Action::SoftDrop => Some("s"),
            Action::ShiftRight => Some("d"),
            Action::HardDrop => Some(" "),
            Action::Noop => None,
        }
    }

    /// Parses a host key token. `"space"` is accepted as an alias of `" "`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" => Some(Action::Rotate),
            "a" => Some(Action::ShiftLeft),
            "s" => Some(Action::SoftDrop),
            "d" => Some(Action::ShiftRight),
            " " | "space" => Some(Action::HardDrop),
            _ => None,
        }
    }
}

/// FIFO of pending actions, drained one per tick by the game loop.
pub trait ActionQueue {
    fn push(&mut self, action: Action);

    fn drain_one(&mut self) -> Option<Action>;

    /// Next action to apply this tick; [`Action::Noop`] when nothing is queued.
    fn next_or_noop(&mut self) -> Action {
        self.drain_one().unwrap_or(Action::Noop)
    }
}

impl ActionQueue for VecDeque<Action> {
    fn push(&mut self, action: Action) {
        self.push_back(action);
    }

    fn drain_one(&mut self) -> Option<Action> {
        self.pop_front()
    }
}
