//! Renderers
//!
//!     A renderer is a listener whose output goes to a sink it does not own. Decorators keep
//!     one renderer for their whole life and hand it the wrapped sink on every write through
//!     [Rendering], which adapts the pair to the [Listener] interface.
//!
//!     Fragments are the renderer's business. A renderer that decides its markup from the
//!     token kind buffers fragments until the closing piece tells it the final kind.

use super::Listener;
use crate::decorating::HtmlEscaper;
use crate::token::{TokenKind, XmlEscToken};
use std::io::{self, Write};
use std::marker::PhantomData;

/// A listener writing into a sink supplied per call.
pub trait Renderer<K: TokenKind> {
    /// Renders the token piece `piece`.
    fn token(
        &mut self,
        kind: K,
        piece: &[u8],
        fragment: bool,
        out: &mut dyn Write,
    ) -> io::Result<()>;

    fn newline(&mut self, text: &[u8], out: &mut dyn Write) -> io::Result<()> {
        out.write_all(text)
    }

    /// Whether the rendered text needs block level wrapping such as `<pre>`.
    fn formatted(&self) -> bool {
        true
    }
}

/// Drives a renderer as a [Listener] for one call, keeping the first write error.
pub struct Rendering<'a, R: ?Sized> {
    renderer: &'a mut R,
    out: &'a mut dyn Write,
    error: Option<io::Error>,
}

impl<'a, R: ?Sized> Rendering<'a, R> {
    pub fn new(renderer: &'a mut R, out: &'a mut dyn Write) -> Self {
        Self {
            renderer,
            out,
            error: None,
        }
    }

    /// The first write error, if any. Events after an error are dropped.
    pub fn finish(self) -> io::Result<()> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl<K: TokenKind, R: Renderer<K> + ?Sized> Listener<K> for Rendering<'_, R> {
    fn token(&mut self, kind: K, text: &[u8], first: usize, last: usize, fragment: bool) {
        if self.error.is_none() {
            let result = self
                .renderer
                .token(kind, &text[first..last], fragment, &mut *self.out);
            self.error = result.err();
        }
    }

    fn newline(&mut self, text: &[u8], first: usize, last: usize) {
        if self.error.is_none() {
            self.error = self.renderer.newline(&text[first..last], &mut *self.out).err();
        }
    }
}

/// Wraps every token in `<span class="title">`.
///
/// Token text is XML escaped unless disabled. Tokens made of white space only are written
/// bare. A token interrupted by a newline is closed before the newline and reopened after
/// it, so that spans never cross lines.
#[derive(Debug, Clone)]
pub struct SpanRenderer<K> {
    pending: Vec<u8>,
    pending_kind: Option<K>,
    escape: bool,
}

impl<K: TokenKind> SpanRenderer<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            pending_kind: None,
            escape: true,
        }
    }

    /// Writes token text verbatim, for input that is already markup.
    pub fn unescaped() -> Self {
        Self {
            escape: false,
            ..Self::new()
        }
    }

    fn span(&self, kind: K, text: &[u8], out: &mut dyn Write) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let blank = text.iter().all(|c| c.is_ascii_whitespace());
        if !blank {
            write!(out, "<span class=\"{}\">", kind.title())?;
        }
        if self.escape {
            HtmlEscaper::escape_to(text, out)?;
        } else {
            out.write_all(text)?;
        }
        if !blank {
            out.write_all(b"</span>")?;
        }
        Ok(())
    }

    fn flush_pending(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if let Some(kind) = self.pending_kind.take() {
            let text = std::mem::take(&mut self.pending);
            self.span(kind, &text, out)?;
            self.pending = text;
            self.pending.clear();
        }
        Ok(())
    }
}

impl<K: TokenKind> Default for SpanRenderer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind> Renderer<K> for SpanRenderer<K> {
    fn token(
        &mut self,
        kind: K,
        piece: &[u8],
        fragment: bool,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        if fragment {
            self.pending_kind = Some(kind);
            self.pending.extend_from_slice(piece);
            return Ok(());
        }
        if self.pending_kind.is_none() {
            return self.span(kind, piece, out);
        }
        self.pending.extend_from_slice(piece);
        self.pending_kind = Some(kind);
        self.flush_pending(out)
    }

    fn newline(&mut self, text: &[u8], out: &mut dyn Write) -> io::Result<()> {
        self.flush_pending(out)?;
        out.write_all(text)
    }
}

/// Replaces the characters XML reserves by their entity references.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeRenderer;

impl Renderer<XmlEscToken> for EscapeRenderer {
    fn token(
        &mut self,
        kind: XmlEscToken,
        piece: &[u8],
        _fragment: bool,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        match kind {
            XmlEscToken::AmpEscape => out.write_all(b"&amp;"),
            XmlEscToken::LtEscape => out.write_all(b"&lt;"),
            XmlEscToken::GtEscape => out.write_all(b"&gt;"),
            XmlEscToken::QuotEscape => out.write_all(b"&quot;"),
            XmlEscToken::Data | XmlEscToken::Err => out.write_all(piece),
        }
    }

    fn formatted(&self) -> bool {
        false
    }
}

/// Copies every token through unchanged. Useful as a chain member that only observes.
#[derive(Debug, Clone, Copy)]
pub struct Verbatim<K>(PhantomData<K>);

impl<K> Default for Verbatim<K> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<K: TokenKind> Renderer<K> for Verbatim<K> {
    fn token(
        &mut self,
        _kind: K,
        piece: &[u8],
        _fragment: bool,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        out.write_all(piece)
    }

    fn formatted(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::{CppLexer, Tokenizer};
    use crate::token::CppToken;

    fn render_chunks(chunks: &[&str]) -> String {
        let mut tokenizer = Tokenizer::<CppLexer>::new();
        let mut renderer = SpanRenderer::<CppToken>::new();
        let mut out = Vec::new();
        for chunk in chunks {
            let mut rendering = Rendering::new(&mut renderer, &mut out);
            tokenizer.tokenize(chunk.as_bytes(), &mut rendering);
            rendering.finish().unwrap();
        }
        let mut rendering = Rendering::new(&mut renderer, &mut out);
        tokenizer.flush(&mut rendering);
        rendering.finish().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn spans_use_the_final_kind() {
        // "whi" alone looks like an identifier; the keyword is only known at the end.
        assert_eq!(
            render_chunks(&["whi", "le (a<b)"]),
            render_chunks(&["while (a<b)"])
        );
        assert_eq!(
            render_chunks(&["while"]),
            r#"<span class="keyword">while</span>"#
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(
            render_chunks(&["a<b"]),
            concat!(
                r#"<span class="identifier">a</span>"#,
                r#"<span class="operator">&lt;</span>"#,
                r#"<span class="identifier">b</span>"#
            )
        );
    }

    #[test]
    fn spans_do_not_cross_lines() {
        assert_eq!(
            render_chunks(&["/* a\nb */"]),
            "<span class=\"comment\">/* a</span>\n<span class=\"comment\">b */</span>"
        );
    }

    #[test]
    fn write_errors_are_reported_once() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("broken pipe"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let mut tokenizer = Tokenizer::<CppLexer>::new();
        let mut renderer = SpanRenderer::<CppToken>::new();
        let mut sink = Broken;
        let mut rendering = Rendering::new(&mut renderer, &mut sink);
        tokenizer.tokenize_all(b"int a;", &mut rendering);
        assert_eq!(rendering.finish().unwrap_err().to_string(), "broken pipe");
    }
}
