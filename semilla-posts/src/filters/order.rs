//! Orders over posts, each with the key posts are grouped by.

use crate::post::Post;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A comparison between posts together with the key it groups them by.
pub trait PostOrder {
    fn compare(&self, a: &Post, b: &Post) -> Ordering;

    /// The group `post` belongs to, as used for archive links and thread indexes.
    fn key(&self, post: &Post) -> String;
}

impl<O: PostOrder + ?Sized> PostOrder for &O {
    fn compare(&self, a: &Post, b: &Post) -> Ordering {
        (**self).compare(a, b)
    }

    fn key(&self, post: &Post) -> String {
        (**self).key(post)
    }
}

/// Newest first, grouped by month.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByTime;

impl PostOrder for ByTime {
    fn compare(&self, a: &Post, b: &Post) -> Ordering {
        b.time.cmp(&a.time)
    }

    fn key(&self, post: &Post) -> String {
        post.time.format("%Y-%m").to_string()
    }
}

/// Tags in lexical order, newest first within a tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByTag;

impl PostOrder for ByTag {
    fn compare(&self, a: &Post, b: &Post) -> Ordering {
        a.tag.cmp(&b.tag).then_with(|| b.time.cmp(&a.time))
    }

    fn key(&self, post: &Post) -> String {
        post.tag.clone()
    }
}

/// Highest score first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByScore;

impl PostOrder for ByScore {
    fn compare(&self, a: &Post, b: &Post) -> Ordering {
        b.score.cmp(&a.score)
    }

    fn key(&self, post: &Post) -> String {
        post.score.to_string()
    }
}

static REPLY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*((re|fwd?|aw)(\[\d+\])?\s*:\s*)+").expect("valid reply prefix pattern")
});

/// The thread a mail belongs to: its subject without reply and forward prefixes, in lower
/// case with white space collapsed.
pub fn thread_key(subject: &str) -> String {
    let stripped = REPLY_PREFIX.replace(subject, "");
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Threads in subject order, each thread oldest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct BySubject;

impl PostOrder for BySubject {
    fn compare(&self, a: &Post, b: &Post) -> Ordering {
        thread_key(&a.title)
            .cmp(&thread_key(&b.title))
            .then_with(|| a.time.cmp(&b.time))
    }

    fn key(&self, post: &Post) -> String {
        thread_key(&post.title)
    }
}

/// Any of the orders above, chosen at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Time,
    Tag,
    Score,
    Subject,
}

impl OrderBy {
    pub const NAMES: [&'static str; 4] = ["time", "tag", "score", "subject"];

    fn order(self) -> &'static dyn PostOrder {
        match self {
            OrderBy::Time => &ByTime,
            OrderBy::Tag => &ByTag,
            OrderBy::Score => &ByScore,
            OrderBy::Subject => &BySubject,
        }
    }
}

impl PostOrder for OrderBy {
    fn compare(&self, a: &Post, b: &Post) -> Ordering {
        self.order().compare(a, b)
    }

    fn key(&self, post: &Post) -> String {
        self.order().key(post)
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAMES[*self as usize])
    }
}

impl FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "time" | "date" => Ok(OrderBy::Time),
            "tag" => Ok(OrderBy::Tag),
            "score" => Ok(OrderBy::Score),
            "subject" | "thread" => Ok(OrderBy::Subject),
            _ => Err(format!(
                "unknown order '{s}' (expected one of: {})",
                Self::NAMES.join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    #[rstest]
    #[case("Re: Build broken", "build broken")]
    #[case("RE: re:Build broken", "build broken")]
    #[case("Fwd: Re[2]:  Build   broken", "build broken")]
    #[case("AW: Build broken", "build broken")]
    #[case("re: build BROKEN", "build broken")]
    #[case("Release notes", "release notes")]
    #[case("Question: why?", "question: why?")]
    fn reply_prefixes_are_stripped(#[case] subject: &str, #[case] key: &str) {
        assert_eq!(thread_key(subject), key);
    }

    #[test]
    fn orders_and_keys() {
        let older = Post {
            title: "Re: topic".into(),
            tag: "b".into(),
            score: 3,
            time: Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap(),
            ..Post::default()
        };
        let newer = Post {
            title: "topic".into(),
            tag: "a".into(),
            score: 1,
            time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            ..Post::default()
        };
        assert_eq!(ByTime.compare(&newer, &older), Ordering::Less);
        assert_eq!(ByTag.compare(&newer, &older), Ordering::Less);
        assert_eq!(ByScore.compare(&older, &newer), Ordering::Less);
        assert_eq!(BySubject.compare(&older, &newer), Ordering::Less);
        assert_eq!(ByTime.key(&older), "2023-12");
        assert_eq!(BySubject.key(&older), BySubject.key(&newer));
    }

    #[test]
    fn subject_threads_ignore_case() {
        let first = Post {
            title: "Build broken".into(),
            time: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            ..Post::default()
        };
        let reply = Post {
            title: "re: build BROKEN".into(),
            ..first.clone()
        };
        assert_eq!(BySubject.key(&first), "build broken");
        assert_eq!(BySubject.key(&first), BySubject.key(&reply));
        assert_eq!(BySubject.compare(&first, &reply), Ordering::Equal);
    }

    #[test]
    fn order_names() {
        assert_eq!("Score".parse::<OrderBy>(), Ok(OrderBy::Score));
        assert_eq!("thread".parse::<OrderBy>(), Ok(OrderBy::Subject));
        assert!("size".parse::<OrderBy>().unwrap_err().contains("subject"));
        assert_eq!(OrderBy::Tag.to_string(), "tag");
    }
}
