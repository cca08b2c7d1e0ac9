//! Links
//!
//!     Two decorators deal with links. [HrefLight] turns file names mentioned in free text
//!     into anchors; [LinkLight] lets XML markup through and classifies the target of every
//!     `href` attribute, appending ` class="outside"` for absolute URLs and ` class="new"`
//!     for local pages that do not exist yet.
//!
//!     Both consult a [LinkContext], which lives for one rendering request: it knows the
//!     site prefix, how to check that a file exists, and records every link rendered so the
//!     caller can list them afterwards.

use super::highlight::{Highlight, HtmlEscaper};
use crate::lexing::{HrefLexer, XmlLexer};
use crate::listeners::Renderer;
use crate::token::{HrefToken, XmlToken};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;

static SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").expect("valid scheme pattern"));

/// Answers whether a local link target exists.
pub trait FileLookup {
    fn exists(&self, path: &str) -> bool;
}

/// A fixed set of known paths, relative to the site root.
#[derive(Debug, Clone, Default)]
pub struct KnownFiles(BTreeSet<String>);

impl KnownFiles {
    pub fn insert(&mut self, path: impl Into<String>) {
        self.0.insert(path.into());
    }
}

impl<S: Into<String>> FromIterator<S> for KnownFiles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl FileLookup for KnownFiles {
    fn exists(&self, path: &str) -> bool {
        self.0.contains(path)
    }
}

/// Looks targets up in a directory tree.
#[derive(Debug, Clone)]
pub struct DirLookup {
    root: PathBuf,
}

impl DirLookup {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileLookup for DirLookup {
    fn exists(&self, path: &str) -> bool {
        !path.split('/').any(|part| part == "..") && self.root.join(path).exists()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// An absolute URL.
    Outside,
    /// A local target that does not exist.
    Missing,
    Local,
}

impl LinkClass {
    /// The attribute appended to the anchor, if any.
    pub fn attribute(self) -> &'static str {
        match self {
            LinkClass::Outside => " class=\"outside\"",
            LinkClass::Missing => " class=\"new\"",
            LinkClass::Local => "",
        }
    }
}

/// Request scoped state shared by the link decorators of one rendering pass.
pub struct LinkContext {
    site_top: String,
    lookup: Box<dyn FileLookup>,
    visited: RefCell<BTreeSet<String>>,
}

impl LinkContext {
    pub fn new(site_top: impl Into<String>, lookup: impl FileLookup + 'static) -> Self {
        Self {
            site_top: site_top.into(),
            lookup: Box::new(lookup),
            visited: RefCell::new(BTreeSet::new()),
        }
    }

    fn local_path(name: &str) -> &str {
        name.trim_start_matches("./").trim_start_matches('/')
    }

    pub fn classify(&self, name: &str) -> LinkClass {
        if SCHEME.is_match(name) || name.starts_with("//") {
            LinkClass::Outside
        } else if name.starts_with('#') {
            LinkClass::Local
        } else {
            let path = Self::local_path(name);
            let path = path.split(['#', '?']).next().unwrap_or(path);
            if self.lookup.exists(path) {
                LinkClass::Local
            } else {
                LinkClass::Missing
            }
        }
    }

    /// The URL a link to `name` points at.
    pub fn resolve(&self, name: &str) -> String {
        match self.classify(name) {
            LinkClass::Outside => name.to_string(),
            _ if name.starts_with('#') => name.to_string(),
            _ => format!(
                "{}/{}",
                self.site_top.trim_end_matches('/'),
                Self::local_path(name)
            ),
        }
    }

    /// Records that a link to `name` was rendered.
    pub fn visit(&self, name: &str) {
        self.visited.borrow_mut().insert(name.to_string());
    }

    /// Every link rendered so far, sorted.
    pub fn links(&self) -> Vec<String> {
        self.visited.borrow().iter().cloned().collect()
    }
}

/// Renders href tokens, turning filenames into anchors.
pub struct HrefRenderer<'c> {
    context: &'c LinkContext,
    pending: Vec<u8>,
}

impl<'c> HrefRenderer<'c> {
    pub fn new(context: &'c LinkContext) -> Self {
        Self {
            context,
            pending: Vec::new(),
        }
    }

    fn anchor(&self, name: &str, out: &mut dyn Write) -> io::Result<()> {
        let class = self.context.classify(name);
        let url = self.context.resolve(name);
        out.write_all(b"<a href=\"")?;
        HtmlEscaper::escape_to(url.as_bytes(), out)?;
        write!(out, "\"{}>", class.attribute())?;
        HtmlEscaper::escape_to(name.as_bytes(), out)?;
        out.write_all(b"</a>")?;
        self.context.visit(name);
        Ok(())
    }
}

impl Renderer<HrefToken> for HrefRenderer<'_> {
    fn token(
        &mut self,
        kind: HrefToken,
        piece: &[u8],
        fragment: bool,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        self.pending.extend_from_slice(piece);
        if fragment {
            return Ok(());
        }
        let text = std::mem::take(&mut self.pending);
        match kind {
            HrefToken::Filename => self.anchor(&String::from_utf8_lossy(&text), out),
            _ => HtmlEscaper::escape_to(&text, out),
        }
    }

    fn newline(&mut self, text: &[u8], out: &mut dyn Write) -> io::Result<()> {
        let pending = std::mem::take(&mut self.pending);
        HtmlEscaper::escape_to(&pending, out)?;
        out.write_all(text)
    }
}

/// Lets XML through, classifying the value of every `href` attribute.
pub struct LinkRenderer<'c> {
    context: &'c LinkContext,
    /// Set between an `href` name and its value.
    awaiting: bool,
    pending: Vec<u8>,
}

impl<'c> LinkRenderer<'c> {
    pub fn new(context: &'c LinkContext) -> Self {
        Self {
            context,
            awaiting: false,
            pending: Vec::new(),
        }
    }

    fn complete(&mut self, kind: XmlToken, text: &[u8], out: &mut dyn Write) -> io::Result<()> {
        match kind {
            XmlToken::DeclStart | XmlToken::DeclEnd => self.awaiting = false,
            XmlToken::Name => self.awaiting = text.eq_ignore_ascii_case(b"href"),
            XmlToken::AttValue if self.awaiting => {
                self.awaiting = false;
                // Quotes excluded.
                let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or_default();
                let value = String::from_utf8_lossy(inner);
                out.write_all(self.context.classify(&value).attribute().as_bytes())?;
                self.context.visit(&value);
            }
            _ => {}
        }
        Ok(())
    }
}

impl Renderer<XmlToken> for LinkRenderer<'_> {
    fn token(
        &mut self,
        kind: XmlToken,
        piece: &[u8],
        fragment: bool,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        out.write_all(piece)?;
        self.pending.extend_from_slice(piece);
        if fragment {
            return Ok(());
        }
        let text = std::mem::take(&mut self.pending);
        self.complete(kind, &text, out)
    }

    fn newline(&mut self, text: &[u8], out: &mut dyn Write) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.pending.extend_from_slice(text);
        }
        out.write_all(text)
    }

    fn formatted(&self) -> bool {
        false
    }
}

pub type HrefLight<'c> = Highlight<HrefLexer, HrefRenderer<'c>>;
pub type LinkLight<'c> = Highlight<XmlLexer, LinkRenderer<'c>>;

impl<'c> Highlight<HrefLexer, HrefRenderer<'c>> {
    pub fn with_context(context: &'c LinkContext) -> Self {
        Self::new(HrefLexer::new(), HrefRenderer::new(context))
    }
}

impl<'c> Highlight<XmlLexer, LinkRenderer<'c>> {
    pub fn with_context(context: &'c LinkContext) -> Self {
        Self::new(XmlLexer::new(), LinkRenderer::new(context))
    }
}
