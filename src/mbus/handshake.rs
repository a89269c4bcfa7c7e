//! # Frame Count Bit Handshake
//!
//! The FCB alternates on consecutive requests of the same kind so a slave
//! can tell a retransmitted command from a new one. One [`FcbState`] exists
//! per physical bus segment and is owned by the master driving it; the
//! state is advanced exactly once per outgoing request, after the telegram
//! is built and before it is transmitted.

use crate::mbus::telegram::ControlCode;

/// Per-bus handshake state: the last command kind issued and the frame
/// count bit to emit on the next request.
///
/// Switching command kinds restarts the sequence with the bit set; repeated
/// requests of the same kind alternate it. A single shared pair tracks the
/// most recent command regardless of kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FcbState {
    last_command: Option<ControlCode>,
    fcb: bool,
}

impl FcbState {
    /// Fresh state for a new bus session; the first request of any kind
    /// goes out with the bit set.
    pub fn new() -> Self {
        FcbState {
            last_command: None,
            fcb: true,
        }
    }

    /// The bit a request of kind `code` would carry, without committing.
    pub fn peek_bit(&self, code: ControlCode) -> bool {
        if self.last_command != Some(code) {
            true
        } else {
            self.fcb
        }
    }

    /// Commits one exchange of kind `code`: restarts the sequence on a
    /// kind change, then flips the bit for the next exchange.
    pub fn advance(&mut self, code: ControlCode) {
        if self.last_command != Some(code) {
            self.fcb = true;
        }
        self.fcb = !self.fcb;
        self.last_command = Some(code);
    }

    /// Returns the bit to emit for a request of kind `code` and advances
    /// the state for the next exchange.
    pub fn next_bit(&mut self, code: ControlCode) -> bool {
        let emit = self.peek_bit(code);
        self.advance(code);
        emit
    }

    /// The command kind of the most recent request, if any.
    pub fn last_command(&self) -> Option<ControlCode> {
        self.last_command
    }
}

impl Default for FcbState {
    fn default() -> Self {
        Self::new()
    }
}
