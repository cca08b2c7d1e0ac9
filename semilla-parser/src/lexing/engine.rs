//! The resumable driver shared by every format.

use crate::listeners::Listener;
use crate::token::TokenKind;

/// What a machine did with the byte it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The byte belongs to the current token, which goes on.
    Shift,
    /// The byte is the last one of the current token.
    Accept,
    /// The current token ended just before the byte. The byte is offered again to the
    /// machine, which is idle by then. An idle machine that rejects a byte gets it back as
    /// a one-byte error token.
    Reject,
}

/// A per-format lexical state machine.
///
/// The machine sees every byte except newlines and line continuations, which the
/// [Tokenizer] handles uniformly for all formats.
pub trait Machine {
    type Kind: TokenKind;

    /// True between tokens.
    fn is_idle(&self) -> bool;

    /// Provisional kind of the token in progress.
    fn kind(&self) -> Self::Kind;

    fn step(&mut self, byte: u8) -> Step;

    /// Ends the token in progress and returns its final kind. The machine is idle afterwards.
    fn finish(&mut self) -> Self::Kind;

    /// True when the token in progress survives a bare newline.
    fn spans_newline(&self) -> bool {
        false
    }

    /// True when a backslash before a newline joins the two lines into one token.
    fn continues_lines(&self) -> bool {
        false
    }

    /// True when the next byte is escaped, so a backslash is not a line continuation.
    fn escaping(&self) -> bool {
        false
    }

    /// Called after every newline event.
    fn newline(&mut self) {}
}

#[derive(Debug, Clone, Copy)]
enum Ahead {
    Byte(u8),
    More,
    End,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Continuation {
    #[default]
    None,
    Backslash,
    CarriageReturn,
}

const CRLF: &[u8] = b"\r\n";

/// Resumable tokenizer: feeds buffers through a [Machine] and reports tokens and newlines
/// to a [Listener].
#[derive(Debug, Clone, Default)]
pub struct Tokenizer<M> {
    machine: M,
    carry: Option<u8>,
    continuation: Continuation,
}

impl<M: Machine> Tokenizer<M> {
    pub fn new() -> Self
    where
        M: Default,
    {
        Self::with_machine(M::default())
    }

    pub fn with_machine(machine: M) -> Self {
        Self {
            machine,
            carry: None,
            continuation: Continuation::None,
        }
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    /// True when a token or an undecided byte is waiting for more input.
    pub fn is_pending(&self) -> bool {
        self.carry.is_some() || !self.machine.is_idle()
    }

    /// Tokenizes `buf`, continuing where the previous call stopped.
    ///
    /// Returns the number of bytes consumed, which is always `buf.len()`. A trailing `\r` or
    /// `\` is held back until the next call (or [flush](Self::flush)) decides what it means;
    /// its piece is then reported through a different buffer than `buf`.
    pub fn tokenize<L>(&mut self, buf: &[u8], listener: &mut L) -> usize
    where
        L: Listener<M::Kind> + ?Sized,
    {
        let Some(&next) = buf.first() else {
            return 0;
        };
        let mut start = 0;
        if let Some(held) = self.carry.take() {
            start = self.scan(&[held], 0, Ahead::Byte(next), listener);
        }
        self.scan(buf, start, Ahead::More, listener);
        buf.len()
    }

    /// Declares the end of input: resolves a held byte and closes the pending token.
    pub fn flush<L>(&mut self, listener: &mut L)
    where
        L: Listener<M::Kind> + ?Sized,
    {
        if let Some(held) = self.carry.take() {
            self.scan(&[held], 0, Ahead::End, listener);
        }
        self.continuation = Continuation::None;
        if !self.machine.is_idle() {
            let kind = self.machine.finish();
            listener.token(kind, &[], 0, 0, false);
        }
    }

    /// Tokenizes a complete input in one call.
    pub fn tokenize_all<L>(&mut self, input: &[u8], listener: &mut L)
    where
        L: Listener<M::Kind> + ?Sized,
    {
        self.tokenize(input, listener);
        self.flush(listener);
    }

    /// Scans `buf[start..]`. `after` describes the byte following the buffer. Returns how
    /// many bytes of that following buffer were consumed (a CRLF straddling the two).
    fn scan<L>(&mut self, buf: &[u8], start: usize, after: Ahead, listener: &mut L) -> usize
    where
        L: Listener<M::Kind> + ?Sized,
    {
        let mut first = start;
        let mut end = buf.len();
        let mut skip = 0;
        let mut i = start;

        while i < buf.len() {
            let c = buf[i];
            let ahead = match buf.get(i + 1) {
                Some(&b) => Ahead::Byte(b),
                None => after,
            };

            match (self.continuation, c) {
                (Continuation::Backslash, b'\n') | (Continuation::CarriageReturn, b'\n') => {
                    self.continuation = Continuation::None;
                    i += 1;
                    continue;
                }
                (Continuation::Backslash, b'\r') => {
                    self.continuation = Continuation::CarriageReturn;
                    i += 1;
                    continue;
                }
                _ => self.continuation = Continuation::None,
            }

            if c == b'\n' || c == b'\r' {
                let last = match (c, ahead) {
                    (b'\r', Ahead::Byte(b'\n')) => i + 2,
                    (b'\r', Ahead::More) => {
                        end = i;
                        self.carry = Some(c);
                        break;
                    }
                    _ => i + 1,
                };
                self.end_line(buf, first, i, listener);
                if last > buf.len() {
                    listener.newline(CRLF, 0, CRLF.len());
                    skip = 1;
                } else {
                    listener.newline(buf, i, last);
                }
                self.machine.newline();
                i = last.min(buf.len());
                first = i;
                continue;
            }

            if c == b'\\'
                && self.machine.continues_lines()
                && !self.machine.is_idle()
                && !self.machine.escaping()
            {
                match ahead {
                    Ahead::Byte(b'\n' | b'\r') => {
                        self.continuation = Continuation::Backslash;
                        i += 1;
                        continue;
                    }
                    Ahead::More => {
                        end = i;
                        self.carry = Some(c);
                        break;
                    }
                    _ => {}
                }
            }

            let was_idle = self.machine.is_idle();
            match self.machine.step(c) {
                Step::Shift => i += 1,
                Step::Accept => {
                    i += 1;
                    let kind = self.machine.finish();
                    listener.token(kind, buf, first, i, false);
                    first = i;
                }
                Step::Reject if was_idle => {
                    self.machine.finish();
                    listener.token(<M::Kind as TokenKind>::ERR, buf, i, i + 1, false);
                    i += 1;
                    first = i;
                }
                Step::Reject => {
                    let kind = self.machine.finish();
                    listener.token(kind, buf, first, i, false);
                    first = i;
                }
            }
        }

        if first < end && !self.machine.is_idle() {
            listener.token(self.machine.kind(), buf, first, end, true);
        }
        skip
    }

    /// Closes, or for line-spanning states interrupts, the token before a newline at `at`.
    fn end_line<L>(&mut self, buf: &[u8], first: usize, at: usize, listener: &mut L)
    where
        L: Listener<M::Kind> + ?Sized,
    {
        if self.machine.is_idle() {
            return;
        }
        if self.machine.spans_newline() {
            if at > first {
                listener.token(self.machine.kind(), buf, first, at, true);
            }
        } else {
            let kind = self.machine.finish();
            listener.token(kind, buf, first, at, false);
        }
    }
}
