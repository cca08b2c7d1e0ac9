//! Format registry
//!
//!     Maps format names and file names to lexers, and offers a uniform, kind-erased view of
//!     the tokens of any format for tools that do not care which one they are handling.

use super::engine::{Machine, Tokenizer};
use super::{
    CppLexer, DiagnosticLexer, HrefLexer, MarkdownLexer, Rfc2822Lexer, ShLexer, XmlEscLexer,
    XmlLexer,
};
use crate::listeners::{Annotator, Event, Listener, TokenCollector};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Every supported text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lang {
    Cpp,
    Xml,
    Rfc2822,
    Href,
    Markdown,
    Sh,
    XmlEscape,
    Diagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language '{0}' (expected one of: {names})", names = Lang::NAMES.join(", "))]
pub struct LangError(pub String);

impl Lang {
    pub const ALL: [Lang; 8] = [
        Lang::Cpp,
        Lang::Xml,
        Lang::Rfc2822,
        Lang::Href,
        Lang::Markdown,
        Lang::Sh,
        Lang::XmlEscape,
        Lang::Diagnostics,
    ];

    pub const NAMES: [&'static str; 8] = [
        "cpp",
        "xml",
        "rfc2822",
        "href",
        "markdown",
        "sh",
        "xml-escape",
        "diagnostics",
    ];

    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// Guesses the format of a file from its name.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Lang> {
        let path = path.as_ref();
        let file_name = path.file_name()?.to_str()?;
        if matches!(file_name, "Makefile" | "makefile" | "GNUmakefile") {
            return Some(Lang::Sh);
        }
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        let lang = match extension.as_str() {
            "c" | "cc" | "cpp" | "cxx" | "h" | "hh" | "hpp" | "tcc" => Lang::Cpp,
            "xml" | "html" | "htm" | "xhtml" | "svg" | "rss" => Lang::Xml,
            "eml" | "mbox" | "mail" => Lang::Rfc2822,
            "md" | "markdown" => Lang::Markdown,
            "sh" | "bash" | "py" | "mk" | "am" | "ac" | "cfg" | "conf" => Lang::Sh,
            "txt" | "text" => Lang::Href,
            "log" | "err" => Lang::Diagnostics,
            _ => return None,
        };
        Some(lang)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Lang {
    type Err = LangError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(s))
            .map(|index| Self::ALL[index])
            .ok_or_else(|| LangError(s.to_string()))
    }
}

/// A merged token or newline, with its kind erased to its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lexeme {
    pub kind: &'static str,
    pub text: String,
    /// Set when the token is interrupted by a newline and continues on the next line.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fragment: bool,
}

/// Feeds `input` to a fresh tokenizer in buffers of `chunk` bytes, then flushes it.
fn drive<M, L>(machine: M, input: &[u8], chunk: usize, listener: &mut L)
where
    M: Machine,
    L: Listener<M::Kind>,
{
    let mut tokenizer = Tokenizer::with_machine(machine);
    for piece in input.chunks(chunk.max(1)) {
        tokenizer.tokenize(piece, listener);
    }
    tokenizer.flush(listener);
}

fn lexemes<M: Machine>(machine: M, input: &[u8], chunk: usize) -> Vec<Lexeme> {
    let mut collector = TokenCollector::new();
    drive(machine, input, chunk, &mut collector);
    collector
        .merged()
        .into_iter()
        .map(|event| Lexeme {
            kind: event.title(),
            text: String::from_utf8_lossy(event.text()).into_owned(),
            fragment: matches!(event, Event::Token { fragment: true, .. }),
        })
        .collect()
}

fn annotated<M: Machine, W: Write>(
    machine: M,
    input: &[u8],
    chunk: usize,
    out: W,
) -> io::Result<W> {
    let mut annotator = Annotator::new(out);
    drive(machine, input, chunk, &mut annotator);
    annotator.finish()
}

macro_rules! dispatch {
    ($lang:expr, $run:ident($($arg:expr),*)) => {
        match $lang {
            Lang::Cpp => $run(CppLexer::new(), $($arg),*),
            Lang::Xml => $run(XmlLexer::new(), $($arg),*),
            Lang::Rfc2822 => $run(Rfc2822Lexer::new(), $($arg),*),
            Lang::Href => $run(HrefLexer::new(), $($arg),*),
            Lang::Markdown => $run(MarkdownLexer::new(), $($arg),*),
            Lang::Sh => $run(ShLexer::new(), $($arg),*),
            Lang::XmlEscape => $run(XmlEscLexer::new(), $($arg),*),
            Lang::Diagnostics => $run(DiagnosticLexer::new(), $($arg),*),
        }
    };
}

/// Tokenizes `input` as `lang`, feeding it in buffers of `chunk` bytes.
pub fn tokenize_lang(lang: Lang, input: &[u8], chunk: usize) -> Vec<Lexeme> {
    dispatch!(lang, lexemes(input, chunk))
}

/// Writes the [Annotator] trace of `input` lexed as `lang` to `out`, which is handed back.
pub fn annotate_lang<W: Write>(lang: Lang, input: &[u8], chunk: usize, out: W) -> io::Result<W> {
    dispatch!(lang, annotated(input, chunk, out))
}
