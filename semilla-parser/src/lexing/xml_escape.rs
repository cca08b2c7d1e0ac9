//! Splits text into the characters XML requires to be escaped and the data between them.

use super::engine::{Machine, Step};
use crate::token::XmlEscToken;

fn escape_kind(c: u8) -> Option<XmlEscToken> {
    match c {
        b'&' => Some(XmlEscToken::AmpEscape),
        b'<' => Some(XmlEscToken::LtEscape),
        b'>' => Some(XmlEscToken::GtEscape),
        b'"' => Some(XmlEscToken::QuotEscape),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct XmlEscLexer {
    in_data: bool,
    kind: Option<XmlEscToken>,
}

impl XmlEscLexer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Machine for XmlEscLexer {
    type Kind = XmlEscToken;

    fn is_idle(&self) -> bool {
        !self.in_data && self.kind.is_none()
    }

    fn kind(&self) -> XmlEscToken {
        self.kind.unwrap_or(XmlEscToken::Data)
    }

    fn step(&mut self, c: u8) -> Step {
        match (self.in_data, escape_kind(c)) {
            (true, Some(_)) => Step::Reject,
            (true, None) => Step::Shift,
            (false, Some(kind)) => {
                self.kind = Some(kind);
                Step::Accept
            }
            (false, None) => {
                self.in_data = true;
                Step::Shift
            }
        }
    }

    fn finish(&mut self) -> XmlEscToken {
        let kind = self.kind();
        self.in_data = false;
        self.kind = None;
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lex, pairs_of};
    use crate::token::XmlEscToken::*;

    #[test]
    fn escapes_between_data() {
        let events = lex::<XmlEscLexer>("a<b & \"c\">");
        assert_eq!(
            pairs_of(&events),
            vec![
                (Data, "a".to_string()),
                (LtEscape, "<".to_string()),
                (Data, "b ".to_string()),
                (AmpEscape, "&".to_string()),
                (Data, " ".to_string()),
                (QuotEscape, "\"".to_string()),
                (Data, "c".to_string()),
                (QuotEscape, "\"".to_string()),
                (GtEscape, ">".to_string()),
            ]
        );
    }
}
