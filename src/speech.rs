//! Read-aloud toggle.
//!
//! The state machine only decides what should happen. Callers turn the
//! returned commands into calls on whatever speech backend they have.
//! Every utterance gets its own token, so an end event from a cancelled
//! utterance can never be mistaken for the one currently playing.

use crate::types::MessageKey;

/// Identifies one playback, even of the same message.
pub type UtteranceToken = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Playback {
    #[default]
    Idle,
    Speaking {
        key: MessageKey,
        token: UtteranceToken,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechCommand {
    /// Stop whatever utterance is playing.
    Cancel,
    /// Start reading the given message; its completion must report `token`.
    Speak {
        key: MessageKey,
        token: UtteranceToken,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpeechState {
    playback: Playback,
    issued: UtteranceToken,
}

impl SpeechState {
    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_idle(&self) -> bool {
        self.playback == Playback::Idle
    }

    pub fn is_speaking(&self, key: MessageKey) -> bool {
        matches!(self.playback, Playback::Speaking { key: current, .. } if current == key)
    }

    fn start(&mut self, key: MessageKey) -> SpeechCommand {
        self.issued += 1;
        let token = self.issued;
        self.playback = Playback::Speaking { key, token };
        SpeechCommand::Speak { key, token }
    }

    /// Read-aloud control clicked on `key`.
    pub fn toggle(&mut self, key: MessageKey) -> Vec<SpeechCommand> {
        match self.playback {
            Playback::Speaking { key: current, .. } if current == key => {
                self.playback = Playback::Idle;
                vec![SpeechCommand::Cancel]
            }
            Playback::Speaking { .. } => vec![SpeechCommand::Cancel, self.start(key)],
            Playback::Idle => vec![self.start(key)],
        }
    }

    /// The utterance `token` for `key` ended on its own or errored. Only the
    /// playback that is current goes back to idle.
    pub fn finish(&mut self, key: MessageKey, token: UtteranceToken) -> bool {
        if self.playback == (Playback::Speaking { key, token }) {
            self.playback = Playback::Idle;
            true
        } else {
            false
        }
    }

    pub fn stop(&mut self) -> Vec<SpeechCommand> {
        match std::mem::take(&mut self.playback) {
            Playback::Speaking { .. } => vec![SpeechCommand::Cancel],
            Playback::Idle => Vec::new(),
        }
    }
}
