//! The unit flowing through filter chains.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A blog entry, commit, todo item or mail message, reduced to what every channel needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Identifier unique to the post, often a file name or a message id.
    pub guid: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub time: DateTime<Utc>,
    /// Relevance, higher first.
    pub score: u32,
    pub tag: String,
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Post {
    /// Removes white space that carries no meaning from the title and the author.
    pub fn normalize(&mut self) {
        self.title = collapse(&self.title);
        self.author = collapse(&self.author);
    }

    /// Whether the post can be published. Feed readers choke on guids with white space.
    pub fn valid(&self) -> bool {
        !self.guid.chars().any(char::is_whitespace)
            && !self.title.is_empty()
            && !self.author.is_empty()
            && !self.content.is_empty()
    }
}
