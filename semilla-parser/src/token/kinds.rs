//! The closed token kind sets, one per format.

use serde::Serialize;
use strum::{EnumIter, IntoStaticStr};

macro_rules! token_kind {
    ($name:ident) => {
        impl super::TokenKind for $name {
            const ERR: Self = $name::Err;

            fn title(self) -> &'static str {
                self.into()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(super::TokenKind::title(*self))
            }
        }
    };
}

/// C and C++ source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CppToken {
    Err,
    BooleanLiteral,
    CharacterLiteral,
    FloatingLiteral,
    DecimalLiteral,
    OctalLiteral,
    HexadecimalLiteral,
    Identifier,
    /// An identifier that does not follow the configured naming style.
    UnstyledIdentifier,
    Keyword,
    Operator,
    Punctuator,
    Comment,
    Space,
    #[serde(rename = "tab")]
    #[strum(serialize = "tab")]
    TabSpace,
    Preprocessing,
    StringLiteral,
}
token_kind!(CppToken);

/// XML and HTML markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum XmlToken {
    Err,
    /// `=`
    Assign,
    AttValue,
    /// `>`
    CloseTag,
    Comment,
    Content,
    /// `?>`
    DeclEnd,
    /// `<?` or `<!`
    DeclStart,
    /// `</`
    ElementEnd,
    /// `<`
    ElementStart,
    /// `/>`
    EmptyElementEnd,
    Name,
    Space,
}
token_kind!(XmlToken);

/// RFC 2822 messages, possibly concatenated into an mbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Rfc2822Token {
    Err,
    FieldName,
    Colon,
    FieldBody,
    MessageBody,
    /// The mbox `From ` line separating two messages.
    MessageBreak,
}
token_kind!(Rfc2822Token);

/// Free text where file references become links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum HrefToken {
    Err,
    Filename,
    Space,
    Text,
}
token_kind!(HrefToken);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum MarkdownToken {
    Err,
    Header,
    ListItem,
    Para,
}
token_kind!(MarkdownToken);

/// Shell scripts and other `#`-commented text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ShToken {
    Err,
    Comment,
    Code,
}
token_kind!(ShToken);

/// Characters that must be escaped in XML text, and the data between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum XmlEscToken {
    Err,
    AmpEscape,
    Data,
    GtEscape,
    LtEscape,
    QuotEscape,
}
token_kind!(XmlEscToken);

/// Compiler and linter messages of the form `path:line[:col]: message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DiagnosticToken {
    Err,
    Filename,
    LineNum,
    Message,
    Separator,
}
token_kind!(DiagnosticToken);
