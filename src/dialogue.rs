//! Chat dialogue module holding the per-chat interaction state.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Sub-menu a chat is currently choosing from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubMenu {
    /// Custom or default ASCII character set
    AsciiCharset,
    /// Horizontal or vertical reflection
    ReflectionAxis,
}

/// What to do with the next free-text message of a chat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Continuation {
    /// Use the text as a custom ASCII ramp
    AsciiRamp,
}

/// Represents the conversation state of one chat
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatState {
    #[default]
    Idle,
    /// A photo was received and the main menu is shown
    AwaitingChoice,
    AwaitingSubchoice {
        menu: SubMenu,
    },
    AwaitingCustomInput {
        continuation: Continuation,
    },
}

impl ChatState {
    /// The continuation a free-text reply should feed, if any
    pub fn pending_continuation(&self) -> Option<Continuation> {
        match self {
            ChatState::AwaitingCustomInput { continuation } => Some(*continuation),
            _ => None,
        }
    }
}

/// Type alias for our chat dialogue
pub type ChatDialogue = Dialogue<ChatState, InMemStorage<ChatState>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(ChatState::default(), ChatState::Idle);
    }

    #[test]
    fn test_only_custom_input_has_a_continuation() {
        assert_eq!(ChatState::Idle.pending_continuation(), None);
        assert_eq!(
            ChatState::AwaitingSubchoice { menu: SubMenu::AsciiCharset }.pending_continuation(),
            None
        );
        assert_eq!(
            ChatState::AwaitingCustomInput { continuation: Continuation::AsciiRamp }
                .pending_continuation(),
            Some(Continuation::AsciiRamp)
        );
    }
}
