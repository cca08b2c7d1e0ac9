//! Highlighting decorators: a tokenizer feeding a renderer.

use super::links::{HrefLight, LinkContext, LinkLight};
use super::Decorator;
use crate::lexing::{
    CppLexer, DiagnosticLexer, Lang, Machine, MarkdownLexer, Rfc2822Lexer, ShLexer, Tokenizer,
    XmlEscLexer, XmlLexer,
};
use crate::listeners::{EscapeRenderer, Renderer, Rendering, SpanRenderer};
use crate::token::{CppToken, DiagnosticToken, MarkdownToken, Rfc2822Token, ShToken, XmlToken};
use regex::Regex;
use std::io::{self, Write};

/// A decorator made of a tokenizer and the renderer it reports to.
///
/// The tokenizer state survives between writes, so a token split across two writes is
/// rendered once, with its final kind.
#[derive(Debug, Clone, Default)]
pub struct Highlight<M, R> {
    tokenizer: Tokenizer<M>,
    renderer: R,
}

impl<M: Machine, R: Renderer<M::Kind>> Highlight<M, R> {
    pub fn new(machine: M, renderer: R) -> Self {
        Self {
            tokenizer: Tokenizer::with_machine(machine),
            renderer,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<M: Machine, R: Renderer<M::Kind>> Decorator for Highlight<M, R> {
    fn formatted(&self) -> bool {
        self.renderer.formatted()
    }

    fn decorate(&mut self, input: &[u8], out: &mut dyn Write) -> io::Result<()> {
        let mut rendering = Rendering::new(&mut self.renderer, out);
        self.tokenizer.tokenize(input, &mut rendering);
        rendering.finish()
    }

    fn finish(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let mut rendering = Rendering::new(&mut self.renderer, out);
        self.tokenizer.flush(&mut rendering);
        rendering.finish()
    }
}

pub type CppLight = Highlight<CppLexer, SpanRenderer<CppToken>>;
pub type XmlLight = Highlight<XmlLexer, SpanRenderer<XmlToken>>;
pub type Rfc2822Light = Highlight<Rfc2822Lexer, SpanRenderer<Rfc2822Token>>;
pub type MarkdownLight = Highlight<MarkdownLexer, SpanRenderer<MarkdownToken>>;
pub type ShLight = Highlight<ShLexer, SpanRenderer<ShToken>>;
pub type DiagnosticsLight = Highlight<DiagnosticLexer, SpanRenderer<DiagnosticToken>>;

/// Escapes `&`, `<`, `>` and `"` in the text passing through.
pub type HtmlEscaper = Highlight<XmlEscLexer, EscapeRenderer>;

impl Highlight<XmlEscLexer, EscapeRenderer> {
    /// Writes `text` escaped to `out`.
    pub fn escape_to(text: &[u8], out: &mut dyn Write) -> io::Result<()> {
        let mut escaper = HtmlEscaper::default();
        escaper.decorate(text, out)?;
        escaper.finish(out)
    }

    /// Returns `text` escaped.
    pub fn escape(text: &str) -> String {
        let mut out = Vec::with_capacity(text.len());
        // Writing to a Vec cannot fail.
        let _ = Self::escape_to(text.as_bytes(), &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}

/// Choices for [highlighter].
#[derive(Debug, Clone)]
pub struct HighlightOptions {
    /// Escape token text. Off for input that is already markup.
    pub escape: bool,
    /// Style identifiers must match in C and C++ sources.
    pub identifier_style: Option<Regex>,
    /// Decorate XML by classifying its `href` values instead of highlighting it.
    pub check_links: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            escape: true,
            identifier_style: None,
            check_links: false,
        }
    }
}

fn spans<K: crate::token::TokenKind>(options: &HighlightOptions) -> SpanRenderer<K> {
    if options.escape {
        SpanRenderer::new()
    } else {
        SpanRenderer::unescaped()
    }
}

/// The decorator rendering `lang`.
pub fn highlighter<'a>(
    lang: Lang,
    options: &HighlightOptions,
    links: &'a LinkContext,
) -> Box<dyn Decorator + 'a> {
    match lang {
        Lang::Cpp => {
            let lexer = match &options.identifier_style {
                Some(style) => CppLexer::with_style(style.clone()),
                None => CppLexer::new(),
            };
            Box::new(CppLight::new(lexer, spans(options)))
        }
        Lang::Xml if options.check_links => Box::new(LinkLight::with_context(links)),
        Lang::Xml => Box::new(XmlLight::new(XmlLexer::new(), spans(options))),
        Lang::Rfc2822 => Box::new(Rfc2822Light::new(Rfc2822Lexer::new(), spans(options))),
        Lang::Href => Box::new(HrefLight::with_context(links)),
        Lang::Markdown => Box::new(MarkdownLight::new(MarkdownLexer::new(), spans(options))),
        Lang::Sh => Box::new(ShLight::new(ShLexer::new(), spans(options))),
        Lang::XmlEscape => Box::new(HtmlEscaper::default()),
        Lang::Diagnostics => {
            Box::new(DiagnosticsLight::new(DiagnosticLexer::new(), spans(options)))
        }
    }
}
