//! Lexing
//!
//!     Every format is lexed by the same resumable engine, [Tokenizer], driving a per-format
//!     [Machine]. The engine owns everything that is common to all formats; a machine only
//!     decides, byte by byte, whether the byte extends the current token, closes it, or
//!     belongs to the next one.
//!
//! Resumption
//!
//!     `tokenize()` may be called any number of times with consecutive buffers. The machine
//!     state survives between calls, so a token may start in one buffer and end several
//!     buffers later. Whatever part of a token is known when a buffer runs out is reported
//!     as a fragment; the piece closing the token is reported without the fragment flag, and
//!     may be empty when the closing byte turns out to be the first byte of the next buffer.
//!
//!     Two bytes cannot be understood without the byte that follows them: `\r` (alone or as
//!     the start of CRLF) and `\` (a line continuation when a newline follows, in formats
//!     whose machine `continues_lines()`). When such a
//!     byte is the last one of a buffer the engine keeps it and resolves it at the next call,
//!     or at `flush()`.
//!
//! Newlines
//!
//!     LF, CR and CRLF are one newline each, reported through `Listener::newline`. A newline
//!     closes the current token unless the machine is in a state that spans lines (block
//!     comments, quoted values), in which case the token text so far is reported as a
//!     fragment and the token continues on the next line. In C/C++ and compiler logs a
//!     backslash immediately before a newline is a continuation: both stay inside the token
//!     and no newline is reported.
//!
//! Errors
//!
//!     Machines never fail. Unrecognized input moves a machine into its error state, which
//!     swallows bytes up to the next separator and is reported as one token of the format's
//!     `Err` kind.

pub mod cpp;
pub mod diagnostics;
mod engine;
pub mod href;
pub mod markdown;
pub mod registry;
pub mod rfc2822;
pub mod sh;
pub mod xml;
pub mod xml_escape;

pub use cpp::CppLexer;
pub use diagnostics::DiagnosticLexer;
pub use engine::{Machine, Step, Tokenizer};
pub use href::HrefLexer;
pub use markdown::MarkdownLexer;
pub use registry::{annotate_lang, tokenize_lang, Lang, LangError, Lexeme};
pub use rfc2822::Rfc2822Lexer;
pub use sh::ShLexer;
pub use xml::XmlLexer;
pub use xml_escape::XmlEscLexer;

pub type CppTokenizer = Tokenizer<CppLexer>;
pub type XmlTokenizer = Tokenizer<XmlLexer>;
pub type Rfc2822Tokenizer = Tokenizer<Rfc2822Lexer>;
pub type HrefTokenizer = Tokenizer<HrefLexer>;
pub type MarkdownTokenizer = Tokenizer<MarkdownLexer>;
pub type ShTokenizer = Tokenizer<ShLexer>;
pub type XmlEscTokenizer = Tokenizer<XmlEscLexer>;
pub type DiagnosticTokenizer = Tokenizer<DiagnosticLexer>;
