//! Posts and the filter chains they flow through.
//!
//!     A [Post] is produced by a reader (here [MboxReader]), passed down a chain of
//!     [PostFilter]s and finally serialized by one of the [writers]. Filters either relay posts
//!     as they come or retain them until the chain is flushed, at which point a [Policy]
//!     decides which posts go on and in what order.
//!
//!     Markup in titles and content is escaped with the XML escaper of `semilla-parser`, so
//!     the same tokenizer that highlights sources also guards every HTML and RSS output.

pub mod error;
pub mod filters;
pub mod mbox;
pub mod post;
pub mod writers;

pub use error::PostError;
pub use filters::{
    Collect, KeyCounts, OrderBy, PassThru, Policy, PolicyExt, PostFilter, PostOrder, Retained,
    ValidOnly,
};
pub use mbox::MboxReader;
pub use post::Post;
pub use writers::{HtmlLayout, HtmlWriter, JsonLinesWriter, MailWriter, RssWriter};
