// File: crates/storyline-core/src/input.rs
// Summary: Front-end neutral input events and their mapping to navigation commands.

use crate::controller::Command;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    ArrowRight,
    ArrowLeft,
    Space,
    Other,
}

/// Clickable parts of the frame footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Previous,
    Next,
    /// Scene indicator dot `i`.
    Indicator(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyInput),
    Click(Control),
}

impl InputEvent {
    /// Navigation command for this event, if any.
    pub fn command(self) -> Option<Command> {
        match self {
            InputEvent::Key(KeyInput::ArrowRight | KeyInput::Space) => Some(Command::Advance),
            InputEvent::Key(KeyInput::ArrowLeft) => Some(Command::Retreat),
            InputEvent::Key(KeyInput::Other) => None,
            InputEvent::Click(Control::Next) => Some(Command::Advance),
            InputEvent::Click(Control::Previous) => Some(Command::Retreat),
            InputEvent::Click(Control::Indicator(i)) => Some(Command::JumpTo(i)),
        }
    }
}
