//! Plain annotation: an XML-like trace of every event, handy to see how input was split.
//!
//!     int x
//!
//! becomes
//!
//!     <keyword text="[0,3]">int</keyword><space text="[3,4]"> </space><identifier fragment="1" text="[4,5]">x</identifier>

use super::Listener;
use crate::decorating::HtmlEscaper;
use crate::token::TokenKind;
use std::io::{self, Write};

pub struct Annotator<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> Annotator<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Returns the sink, or the first write error.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.out),
        }
    }

    fn write_token(
        &mut self,
        title: &str,
        text: &[u8],
        first: usize,
        last: usize,
        fragment: bool,
    ) -> io::Result<()> {
        write!(self.out, "<{title}")?;
        if fragment {
            write!(self.out, " fragment=\"1\"")?;
        }
        write!(self.out, " text=\"[{first},{last}]\">")?;
        HtmlEscaper::escape_to(&text[first..last], &mut self.out)?;
        write!(self.out, "</{title}>")
    }
}

impl<K: TokenKind, W: Write> Listener<K> for Annotator<W> {
    fn token(&mut self, kind: K, text: &[u8], first: usize, last: usize, fragment: bool) {
        if self.error.is_none() {
            self.error = self
                .write_token(kind.title(), text, first, last, fragment)
                .err();
        }
    }

    fn newline(&mut self, text: &[u8], first: usize, last: usize) {
        if self.error.is_none() {
            let result = write!(self.out, "<newline text=\"[{first},{last}]\"/>")
                .and_then(|_| self.out.write_all(&text[first..last]));
            self.error = result.err();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::{CppTokenizer, XmlEscTokenizer};

    #[test]
    fn annotates_pieces_with_offsets() {
        let mut tokenizer = CppTokenizer::new();
        let mut annotator = Annotator::new(Vec::new());
        tokenizer.tokenize(b"int x", &mut annotator);
        let out = annotator.finish().unwrap();
        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r#"<keyword text="[0,3]">int</keyword><space text="[3,4]"> </space><identifier fragment="1" text="[4,5]">x</identifier>"#);
    }

    #[test]
    fn newlines_are_marked_and_kept() {
        let mut tokenizer = XmlEscTokenizer::new();
        let mut annotator = Annotator::new(Vec::new());
        tokenizer.tokenize_all(b"a&\nb", &mut annotator);
        let out = String::from_utf8(annotator.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "<data text=\"[0,1]\">a</data><ampEscape text=\"[1,2]\">&amp;</ampEscape><newline text=\"[2,3]\"/>\n<data fragment=\"1\" text=\"[3,4]\">b</data><data text=\"[0,0]\"></data>"
        );
    }
}
