//! Render surface: where turns are shown to the user.
//!
//! The terminal surface can reveal assistant replies one character at a time.
//! The effect is cosmetic; a zero delay prints the reply at once.

use std::io::Write;
use std::time::Duration;

use crate::conversation::{ConversationTurn, Speaker};

/// Displays conversation turns.
pub trait RenderSurface {
    fn display(&mut self, speaker: Speaker, text: &str) -> std::io::Result<()>;

    /// Show a previously recorded turn without any effect.
    fn replay(&mut self, turn: &ConversationTurn) -> std::io::Result<()>;
}

/// Writes `You: ...` / `Gideon: ...` lines to any writer.
pub struct TerminalSurface<W: Write> {
    out: W,
    typing_delay: Duration,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, typing_delay: Duration) -> Self {
        Self { out, typing_delay }
    }

    /// No typing effect.
    pub fn instant(out: W) -> Self {
        Self::new(out, Duration::ZERO)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print_line(&mut self, speaker: Speaker, text: &str) -> std::io::Result<()> {
        writeln!(self.out, "{}: {text}", speaker.label())?;
        self.out.flush()
    }

    fn type_out(&mut self, speaker: Speaker, text: &str) -> std::io::Result<()> {
        write!(self.out, "{}: ", speaker.label())?;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            self.out.flush()?;
            std::thread::sleep(self.typing_delay);
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn display(&mut self, speaker: Speaker, text: &str) -> std::io::Result<()> {
        if speaker == Speaker::Assistant && !self.typing_delay.is_zero() {
            self.type_out(speaker, text)
        } else {
            self.print_line(speaker, text)
        }
    }

    fn replay(&mut self, turn: &ConversationTurn) -> std::io::Result<()> {
        self.print_line(turn.speaker, &turn.text)
    }
}
