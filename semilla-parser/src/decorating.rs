//! Decorators
//!
//!     A decorator rewrites text on its way to a sink: it runs the text through a tokenizer and
//!     lets a renderer write markup around the tokens, while the bytes themselves pass through
//!     unchanged (apart from escaping).
//!
//! Attaching
//!
//!     [Decorator::attach] wraps a sink into an [Attached] writer; everything written to it is
//!     decorated. [Attached::detach] closes the token that may still be pending and hands the
//!     sink back exactly as it was given. A decorator can only be attached to one sink at a
//!     time: the `Attached` borrows it mutably until it is detached, so attaching twice or
//!     detaching a decorator that is not attached does not compile.
//!
//!     Dropping an `Attached` without detaching still closes the pending token, but write
//!     errors can then only be logged.
//!
//! Chains
//!
//!     [DecoratorChain] composes several decorators into one. Members are attached in
//!     registration order, each one wrapping the stream built so far, so the member registered
//!     last sees the text first and its output is the input of the member registered before
//!     it. Detaching runs in reverse registration order: the outermost member is flushed
//!     first, and its last output still flows through every member beneath it.

use std::borrow::Cow;
use std::io::{self, Write};
use tracing::{debug, warn};

pub mod highlight;
pub mod links;

pub use highlight::{
    highlighter, CppLight, DiagnosticsLight, Highlight, HighlightOptions, HtmlEscaper,
    MarkdownLight, Rfc2822Light, ShLight, XmlLight,
};
pub use links::{
    DirLookup, FileLookup, HrefLight, HrefRenderer, KnownFiles, LinkClass, LinkContext,
    LinkLight, LinkRenderer,
};

/// A transform applied to text on its way to a sink.
pub trait Decorator {
    /// Whether the output needs block level wrapping such as `<pre>`. Callers act on it; the
    /// decorator does not.
    fn formatted(&self) -> bool;

    /// Decorates `input`, writing the result to `out`. A token left open at the end of
    /// `input` stays pending.
    fn decorate(&mut self, input: &[u8], out: &mut dyn Write) -> io::Result<()>;

    /// Writes the pending token, if any.
    fn finish(&mut self, out: &mut dyn Write) -> io::Result<()>;

    /// Wraps `sink` so that everything written to it is decorated.
    fn attach<W: Write>(&mut self, sink: W) -> Attached<'_, Self, W>
    where
        Self: Sized,
    {
        Attached::new(self, sink)
    }
}

/// A sink with a decorator attached to it.
pub struct Attached<'d, D: Decorator + ?Sized, W: Write> {
    decorator: &'d mut D,
    sink: Option<W>,
}

fn detached() -> io::Error {
    io::Error::other("decorator is no longer attached")
}

impl<'d, D: Decorator + ?Sized, W: Write> Attached<'d, D, W> {
    pub fn new(decorator: &'d mut D, sink: W) -> Self {
        debug!(formatted = decorator.formatted(), "decorator attached");
        Self {
            decorator,
            sink: Some(sink),
        }
    }

    pub fn formatted(&self) -> bool {
        self.decorator.formatted()
    }

    /// Writes the pending token and returns the sink.
    pub fn detach(mut self) -> io::Result<W> {
        let mut sink = self.sink.take().ok_or_else(detached)?;
        self.decorator.finish(&mut sink)?;
        debug!("decorator detached");
        Ok(sink)
    }
}

impl<D: Decorator + ?Sized, W: Write> Write for Attached<'_, D, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let sink = self.sink.as_mut().ok_or_else(detached)?;
        self.decorator.decorate(buf, sink)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.as_mut().ok_or_else(detached)?.flush()
    }
}

impl<D: Decorator + ?Sized, W: Write> Drop for Attached<'_, D, W> {
    fn drop(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            if let Err(error) = self.decorator.finish(&mut sink) {
                warn!(%error, "pending token lost when dropping an attached decorator");
            }
        }
    }
}

/// An ordered stack of decorators acting as one.
#[derive(Default)]
pub struct DecoratorChain<'a> {
    members: Vec<&'a mut dyn Decorator>,
}

impl<'a> DecoratorChain<'a> {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Registers `decorator` on top of the members registered so far.
    pub fn push(&mut self, decorator: &'a mut dyn Decorator) {
        self.members.push(decorator);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Runs `input` through members `depth - 1` down to `0`, then into `out`.
    fn pass(&mut self, depth: usize, input: &[u8], out: &mut dyn Write) -> io::Result<()> {
        let mut data = Cow::Borrowed(input);
        for member in self.members[..depth].iter_mut().rev() {
            let mut next = Vec::with_capacity(data.len());
            member.decorate(&data, &mut next)?;
            data = Cow::Owned(next);
        }
        out.write_all(&data)
    }
}

impl Decorator for DecoratorChain<'_> {
    fn formatted(&self) -> bool {
        self.members.iter().any(|member| member.formatted())
    }

    fn decorate(&mut self, input: &[u8], out: &mut dyn Write) -> io::Result<()> {
        self.pass(self.members.len(), input, out)
    }

    fn finish(&mut self, out: &mut dyn Write) -> io::Result<()> {
        for top in (0..self.members.len()).rev() {
            let mut tail = Vec::new();
            self.members[top].finish(&mut tail)?;
            self.pass(top, &tail, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::XmlEscLexer;
    use crate::listeners::Verbatim;
    use crate::token::XmlEscToken;

    /// Upper-cases ASCII and counts finishes.
    #[derive(Default)]
    struct Upper {
        finished: usize,
    }

    impl Decorator for Upper {
        fn formatted(&self) -> bool {
            false
        }

        fn decorate(&mut self, input: &[u8], out: &mut dyn Write) -> io::Result<()> {
            out.write_all(&input.to_ascii_uppercase())
        }

        fn finish(&mut self, _out: &mut dyn Write) -> io::Result<()> {
            self.finished += 1;
            Ok(())
        }
    }

    #[test]
    fn detach_returns_the_sink_untouched() {
        let mut sink: Vec<u8> = b"before ".to_vec();
        let original: *const Vec<u8> = &sink;
        let mut escaper = HtmlEscaper::default();
        let mut attached = escaper.attach(&mut sink);
        attached.write_all(b"a<b").unwrap();
        let restored = attached.detach().unwrap();
        assert!(std::ptr::eq(&*restored, original));
        restored.write_all(b" <raw>").unwrap();
        assert_eq!(sink, b"before a&lt;b <raw>");
    }

    #[test]
    fn drop_finishes_the_pending_token() {
        let mut sink = Vec::new();
        let mut light = CppLight::default();
        {
            let mut attached = light.attach(&mut sink);
            attached.write_all(b"retur").unwrap();
            attached.write_all(b"n").unwrap();
        }
        assert_eq!(sink, br#"<span class="keyword">return</span>"#);
    }

    #[test]
    fn chain_applies_last_registered_member_first() {
        let mut escaper = HtmlEscaper::default();
        let mut upper = Upper::default();
        let mut sink = Vec::new();
        {
            let mut chain = DecoratorChain::new();
            chain.push(&mut escaper);
            chain.push(&mut upper);
            let mut attached = chain.attach(&mut sink);
            write!(attached, "a<b").unwrap();
            attached.detach().unwrap();
        }
        assert_eq!(sink, b"A&lt;B");
        assert_eq!(upper.finished, 1);
    }

    #[test]
    fn chain_flushes_outermost_member_through_the_others() {
        let mut escaper = HtmlEscaper::default();
        let mut light = CppLight::default();
        let mut sink = Vec::new();
        {
            let mut chain = DecoratorChain::new();
            chain.push(&mut escaper);
            chain.push(&mut light);
            assert!(chain.formatted());
            let mut attached = chain.attach(&mut sink);
            write!(attached, "whi").unwrap();
            write!(attached, "le").unwrap();
            attached.detach().unwrap();
        }
        // The span markup produced last by the highlighter went through the escaper.
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "&lt;span class=&quot;keyword&quot;&gt;while&lt;/span&gt;"
        );
    }

    #[test]
    fn chain_round_trip_restores_the_sink_for_any_length() {
        for n in 1..=5 {
            let mut members: Vec<Highlight<XmlEscLexer, Verbatim<XmlEscToken>>> =
                (0..n).map(|_| Highlight::default()).collect();
            let mut sink = Vec::new();
            let original: *const Vec<u8> = &sink;
            {
                let mut chain = DecoratorChain::new();
                for member in members.iter_mut() {
                    chain.push(member);
                }
                assert_eq!(chain.len(), n);
                let mut attached = chain.attach(&mut sink);
                attached.write_all(b"x & y").unwrap();
                let restored = attached.detach().unwrap();
                assert!(std::ptr::eq(&*restored, original));
            }
            sink.extend_from_slice(b"!");
            assert_eq!(sink, b"x & y!");
        }
    }
}
