//! Writers
//!
//!     Writers end a filter chain. Each one owns the sink it serializes posts to and gives it
//!     back through `into_inner()`. Free text goes through an [HtmlEscaper] attached to the
//!     sink for the length of one field, so markup characters in titles or content never
//!     reach the output unescaped.
//!
//!     Write errors are returned from `filters` and `flush` as [PostError::Io](crate::PostError).

use semilla_parser::decorating::HtmlEscaper;
use semilla_parser::Decorator;
use std::fmt;
use std::io::{self, Write};

pub mod html;
pub mod json;
pub mod mail;
pub mod rss;

pub use html::{HtmlLayout, HtmlWriter};
pub use json::JsonLinesWriter;
pub use mail::MailWriter;
pub use rss::RssWriter;

/// Writes `args` to `out` with the XML reserved characters escaped.
pub(crate) fn write_escaped<W: Write>(out: &mut W, args: fmt::Arguments<'_>) -> io::Result<()> {
    let mut escaper = HtmlEscaper::default();
    let mut attached = escaper.attach(out);
    attached.write_fmt(args)?;
    attached.detach()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_formatted_text() {
        let mut out = Vec::new();
        write_escaped(&mut out, format_args!("{} & {}", "<a>", "\"b\"")).unwrap();
        assert_eq!(out, b"&lt;a&gt; &amp; &quot;b&quot;");
    }
}
