//! Confirmation dialog handling.
//!
//! Some commands (`reboot`, `no onu`, ...) make the device ask for
//! confirmation mid-stream. The device first prints a message such as
//! `Confirm to reboot the ONU?` and only afterwards offers the reply prompt
//! `[yes/no]:`. Replying on the message alone would race the device, so the
//! handshake is two-phase:
//!
//! ```text
//!                 message                 yes/no marker (reply sent)
//! ┌──────┐ ─────────────────► ┌──────────────────────┐ ──────────► ┌──────┐
//! │ Idle │                    │ AwaitingConfirmation │             │ Done │
//! └──────┘ ◄───────────────── └──────────────────────┘             └──┬───┘
//!     ▲        next command                                          │
//!     └─────────────────────────────── next command ─────────────────┘
//! ```
//!
//! `Done` accepts a new message (a second dialog in the same command). A
//! yes/no marker in `Idle` or `Done` is ignored.

use log::{debug, warn};

use crate::channel::FragmentBuffer;
use crate::platform::OltPlatform;

/// Where the confirmation handshake stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    /// No confirmation in progress.
    #[default]
    Idle,
    /// A confirmation message was seen; waiting for the reply prompt.
    AwaitingConfirmation,
    /// A reply was sent for the last confirmation.
    Done,
}

/// Input to the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// The fragment ends with a confirmation-message phrase.
    ConfirmationMessage,
    /// The fragment ends with a yes/no reply marker.
    YesNoPrompt,
    /// Execution moved on to the next command line.
    NextCommand,
}

/// What the executor must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// Keep reading.
    None,
    /// Clear the fragment and keep reading.
    ResetFragment,
    /// Send the affirmative reply, clear the fragment, keep reading.
    Reply,
}

/// The transition table.
pub fn transition(state: DialogState, event: DialogEvent) -> (DialogState, DialogAction) {
    use DialogAction as A;
    use DialogEvent as E;
    use DialogState as S;

    match (state, event) {
        (_, E::NextCommand) => (S::Idle, A::ResetFragment),
        (S::Idle | S::Done, E::ConfirmationMessage) => (S::AwaitingConfirmation, A::ResetFragment),
        (S::AwaitingConfirmation, E::ConfirmationMessage) => (S::AwaitingConfirmation, A::ResetFragment),
        (S::AwaitingConfirmation, E::YesNoPrompt) => (S::Done, A::Reply),
        (S::Idle | S::Done, E::YesNoPrompt) => (state, A::None),
    }
}

/// Per-request dialog tracker fed one byte at a time.
#[derive(Debug)]
pub struct DialogHandler<'p> {
    platform: &'p OltPlatform,
    state: DialogState,
    fragment: FragmentBuffer,
    replies: usize,
}

impl<'p> DialogHandler<'p> {
    /// Create a handler using the platform's dialog vocabulary.
    pub fn new(platform: &'p OltPlatform) -> Self {
        let min_depth = platform.min_fragment_depth();
        if platform.fragment_depth < min_depth {
            warn!(
                "dialog: fragment depth {} too small for platform '{}', using {}",
                platform.fragment_depth, platform.name, min_depth
            );
        }
        Self {
            platform,
            state: DialogState::Idle,
            fragment: FragmentBuffer::new(platform.fragment_depth.max(min_depth)),
            replies: 0,
        }
    }

    /// Current handshake state.
    pub fn state(&self) -> DialogState {
        self.state
    }

    /// Number of affirmative replies requested so far.
    pub fn replies(&self) -> usize {
        self.replies
    }

    /// Reset for the next command line.
    pub fn next_command(&mut self) {
        self.apply(DialogEvent::NextCommand);
    }

    /// Feed one byte of device output.
    ///
    /// Returns `true` when the caller must send the affirmative reply now.
    pub fn feed(&mut self, byte: u8) -> bool {
        if self.fragment.push(byte) {
            return false;
        }

        let event = if self.fragment.ends_with_any(&self.platform.confirmation_phrases) {
            DialogEvent::ConfirmationMessage
        } else if self.state == DialogState::AwaitingConfirmation
            && self.fragment.ends_with_any(&self.platform.yes_no_markers)
        {
            DialogEvent::YesNoPrompt
        } else {
            return false;
        };

        self.apply(event) == DialogAction::Reply
    }

    fn apply(&mut self, event: DialogEvent) -> DialogAction {
        let (next, action) = transition(self.state, event);
        if next != self.state {
            debug!("dialog: {:?} --{:?}--> {:?}", self.state, event, next);
        }
        self.state = next;
        match action {
            DialogAction::None => {}
            DialogAction::ResetFragment => self.fragment.clear(),
            DialogAction::Reply => {
                self.fragment.clear();
                self.replies += 1;
            }
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::zte;

    fn feed_all(handler: &mut DialogHandler<'_>, data: &[u8]) -> usize {
        data.iter().filter(|&&b| handler.feed(b)).count()
    }

    #[test]
    fn test_transition_table() {
        use DialogAction as A;
        use DialogEvent as E;
        use DialogState as S;

        assert_eq!(transition(S::Idle, E::YesNoPrompt), (S::Idle, A::None));
        assert_eq!(
            transition(S::Idle, E::ConfirmationMessage),
            (S::AwaitingConfirmation, A::ResetFragment)
        );
        assert_eq!(transition(S::AwaitingConfirmation, E::YesNoPrompt), (S::Done, A::Reply));
        assert_eq!(transition(S::Done, E::YesNoPrompt), (S::Done, A::None));
        assert_eq!(
            transition(S::Done, E::ConfirmationMessage),
            (S::AwaitingConfirmation, A::ResetFragment)
        );
        assert_eq!(
            transition(S::AwaitingConfirmation, E::NextCommand),
            (S::Idle, A::ResetFragment)
        );
    }

    #[test]
    fn test_message_then_prompt_replies_once() {
        let platform = zte::platform();
        let mut handler = DialogHandler::new(&platform);

        let replies = feed_all(&mut handler, b"Confirm to reboot the ONU? [yes/no]:");
        assert_eq!(replies, 1);
        assert_eq!(handler.state(), DialogState::Done);
    }

    #[test]
    fn test_prompt_without_message_is_ignored() {
        let platform = zte::platform();
        let mut handler = DialogHandler::new(&platform);

        assert_eq!(feed_all(&mut handler, b"Overwrite file? [yes/no]:"), 0);
        assert_eq!(handler.state(), DialogState::Idle);
    }

    #[test]
    fn test_second_marker_without_new_message_is_ignored() {
        let platform = zte::platform();
        let mut handler = DialogHandler::new(&platform);

        let replies = feed_all(
            &mut handler,
            b"Confirm to reboot?\r\n[yes/no]:yes\r\nRebooting...\r\nsecond [yes/no]:",
        );
        assert_eq!(replies, 1);
        assert_eq!(handler.replies(), 1);
    }

    #[test]
    fn test_message_split_across_lines_keeps_waiting() {
        let platform = zte::platform();
        let mut handler = DialogHandler::new(&platform);

        assert_eq!(feed_all(&mut handler, b"Are you sure to delete\r\n"), 0);
        assert_eq!(handler.state(), DialogState::AwaitingConfirmation);
        assert_eq!(feed_all(&mut handler, b"the configuration? (y/n)"), 1);
    }

    #[test]
    fn test_next_command_clears_pending_confirmation() {
        let platform = zte::platform();
        let mut handler = DialogHandler::new(&platform);

        feed_all(&mut handler, b"Confirm to reboot?");
        assert_eq!(handler.state(), DialogState::AwaitingConfirmation);
        handler.next_command();
        assert_eq!(handler.state(), DialogState::Idle);
        assert_eq!(feed_all(&mut handler, b"[yes/no]"), 0);
    }

    #[test]
    fn test_small_fragment_depth_is_raised() {
        let platform = zte::platform().with_fragment_depth(4);
        let mut handler = DialogHandler::new(&platform);

        let replies = feed_all(
            &mut handler,
            b"xxxxxxxxxxxxConfirm to reboot the ONU? please answer [yes/no]:",
        );
        assert_eq!(replies, 1);
    }

    #[test]
    fn test_two_dialogs_in_one_command() {
        let platform = zte::platform();
        let mut handler = DialogHandler::new(&platform);

        let replies = feed_all(
            &mut handler,
            b"Confirm step one? [yes/no]:yes\r\nConfirm step two? [yes/no]:",
        );
        assert_eq!(replies, 2);
    }
}
