//! Resumable tokenizers and markup decorators.
//!
//!     The crate is organized leaf to root:
//!
//!         1. [token]: closed per-format token kinds and the [Token](token::Token) record.
//!         2. [lexing]: the resumable engine ([Tokenizer](lexing::Tokenizer)) and one state
//!            machine per text format (cpp, xml, rfc2822, href, markdown, sh, xml-escape and
//!            compiler diagnostics).
//!         3. [listeners]: sinks for token and newline events (collection, annotation,
//!            error tables, and the renderers used by decorators).
//!         4. [decorating]: writer-wrapping decorators that re-tag text with markup as it
//!            passes through, and the stack-disciplined [DecoratorChain](decorating::DecoratorChain).
//!
//!     Nothing here is asynchronous or shared between threads. A tokenizer, a listener and a
//!     decorator are driven by one caller for one pass over an input.

pub mod decorating;
pub mod lexing;
pub mod listeners;
pub mod testing;
pub mod token;

pub use decorating::{Attached, Decorator, DecoratorChain};
pub use lexing::{Lang, Tokenizer};
pub use listeners::Listener;
pub use token::{Token, TokenKind};
