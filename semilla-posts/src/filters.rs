//! Filters
//!
//!     A filter receives posts through [PostFilter::filters] and is told the stream ended
//!     through [PostFilter::flush]. Chains are built inside out: every filter owns (or
//!     borrows, through the `&mut F` impl) the filter it relays to, and a writer sits at the
//!     end.
//!
//!     Two disciplines exist:
//!
//!         - Pass-through filters relay each post as it arrives ([PassThru], [ValidOnly]).
//!         - Retained filters buffer every post and only relay on flush, after a [Policy] has
//!           reordered, compacted and windowed the buffer ([Retained], [KeyCounts]).
//!
//!     `flush` is called once per pass. Posts filtered after a flush start a new pass.

use crate::error::PostError;
use crate::post::Post;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub mod order;
pub mod policy;

pub use order::{thread_key, ByScore, BySubject, ByTag, ByTime, OrderBy, PostOrder};
pub use policy::{Compacted, Everything, Ordered, Paginated, Policy, PolicyExt, Selected};

/// A stage of a post pipeline.
pub trait PostFilter {
    fn filters(&mut self, post: &Post) -> Result<(), PostError>;

    fn flush(&mut self) -> Result<(), PostError>;
}

impl<F: PostFilter + ?Sized> PostFilter for &mut F {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        (**self).filters(post)
    }

    fn flush(&mut self) -> Result<(), PostError> {
        (**self).flush()
    }
}

impl<F: PostFilter + ?Sized> PostFilter for Box<F> {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        (**self).filters(post)
    }

    fn flush(&mut self) -> Result<(), PostError> {
        (**self).flush()
    }
}

/// Relays every post unchanged.
#[derive(Debug)]
pub struct PassThru<N> {
    next: N,
}

impl<N: PostFilter> PassThru<N> {
    pub fn new(next: N) -> Self {
        Self { next }
    }

    pub fn into_next(self) -> N {
        self.next
    }
}

impl<N: PostFilter> PostFilter for PassThru<N> {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        self.next.filters(post)
    }

    fn flush(&mut self) -> Result<(), PostError> {
        self.next.flush()
    }
}

/// Drops posts that fail [Post::valid].
#[derive(Debug)]
pub struct ValidOnly<N> {
    next: N,
    dropped: usize,
}

impl<N: PostFilter> ValidOnly<N> {
    pub fn new(next: N) -> Self {
        Self { next, dropped: 0 }
    }

    /// Number of posts dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn into_next(self) -> N {
        self.next
    }
}

impl<N: PostFilter> PostFilter for ValidOnly<N> {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        if post.valid() {
            self.next.filters(post)
        } else {
            warn!(guid = %post.guid, title = %post.title, "dropping invalid post");
            self.dropped += 1;
            Ok(())
        }
    }

    fn flush(&mut self) -> Result<(), PostError> {
        self.next.flush()
    }
}

/// Buffers posts and relays the range its policy provides on flush.
#[derive(Debug)]
pub struct Retained<P, N> {
    policy: P,
    next: N,
    posts: Vec<Post>,
}

impl<P: Policy, N: PostFilter> Retained<P, N> {
    pub fn new(policy: P, next: N) -> Self {
        Self {
            policy,
            next,
            posts: Vec::new(),
        }
    }

    /// Posts buffered since the last flush.
    pub fn pending(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_next(self) -> N {
        self.next
    }
}

impl<P: Policy, N: PostFilter> PostFilter for Retained<P, N> {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        self.posts.push(post.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PostError> {
        let mut posts = std::mem::take(&mut self.posts);
        let range = self.policy.provide(&mut posts);
        debug!(
            buffered = posts.len(),
            first = range.start,
            last = range.end,
            "relaying retained posts"
        );
        for post in &posts[range] {
            self.next.filters(post)?;
        }
        self.next.flush()
    }
}

/// End of a chain that keeps the posts for the caller.
#[derive(Debug, Default)]
pub struct Collect {
    posts: Vec<Post>,
    flushes: usize,
}

impl Collect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    /// Number of times the chain was flushed into this buffer.
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl PostFilter for Collect {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        self.posts.push(post.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PostError> {
        self.flushes += 1;
        Ok(())
    }
}

/// Counts posts per key (month, tag, thread) and relays them unchanged on flush.
///
/// Counts are what archive link lists and thread indexes are built from.
#[derive(Debug)]
pub struct KeyCounts<O, N> {
    order: O,
    next: N,
    counts: BTreeMap<String, usize>,
    posts: Vec<Post>,
}

impl<O: PostOrder, N: PostFilter> KeyCounts<O, N> {
    pub fn new(order: O, next: N) -> Self {
        Self {
            order,
            next,
            counts: BTreeMap::new(),
            posts: Vec::new(),
        }
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub fn into_next(self) -> N {
        self.next
    }
}

impl<O: PostOrder, N: PostFilter> PostFilter for KeyCounts<O, N> {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        *self.counts.entry(self.order.key(post)).or_default() += 1;
        self.posts.push(post.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PostError> {
        debug!(keys = self.counts.len(), "relaying counted posts");
        for post in std::mem::take(&mut self.posts) {
            self.next.filters(&post)?;
        }
        self.next.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn post(guid: &str, day: u32) -> Post {
        Post {
            guid: guid.into(),
            title: format!("post {guid}"),
            content: "text".into(),
            author: "me".into(),
            time: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            ..Post::default()
        }
    }

    fn guids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.guid.as_str()).collect()
    }

    #[test]
    fn pass_thru_relays_immediately() {
        let mut chain = PassThru::new(Collect::new());
        chain.filters(&post("a", 1)).unwrap();
        assert_eq!(chain.next.posts().len(), 1);
        chain.flush().unwrap();
        assert_eq!(chain.into_next().flushes(), 1);
    }

    #[test]
    fn valid_only_drops_and_counts() {
        let mut chain = ValidOnly::new(Collect::new());
        chain.filters(&post("a", 1)).unwrap();
        chain.filters(&post("b c", 2)).unwrap();
        chain.filters(&Post { content: String::new(), ..post("d", 3) }).unwrap();
        chain.flush().unwrap();
        assert_eq!(chain.dropped(), 2);
        assert_eq!(guids(chain.into_next().posts()), vec!["a"]);
    }

    #[test]
    fn retained_relays_only_on_flush() {
        let mut chain = Retained::new(Everything, Collect::new());
        chain.filters(&post("a", 1)).unwrap();
        chain.filters(&post("b", 2)).unwrap();
        assert_eq!(chain.pending().len(), 2);
        assert!(chain.next.posts().is_empty());
        chain.flush().unwrap();
        assert!(chain.pending().is_empty());
        let collected = chain.into_next();
        assert_eq!(guids(collected.posts()), vec!["a", "b"]);
        assert_eq!(collected.flushes(), 1);
    }

    #[test]
    fn borrowed_next_stays_with_the_caller() {
        let mut sink = Collect::new();
        {
            let mut chain = Retained::new(Everything.ordered(ByTime), &mut sink);
            chain.filters(&post("old", 1)).unwrap();
            chain.filters(&post("new", 9)).unwrap();
            chain.flush().unwrap();
        }
        assert_eq!(guids(sink.posts()), vec!["new", "old"]);
    }

    #[test]
    fn key_counts_per_month() {
        let mut chain = KeyCounts::new(ByTime, Collect::new());
        for (guid, day) in [("a", 1), ("b", 2)] {
            chain.filters(&post(guid, day)).unwrap();
        }
        chain
            .filters(&Post {
                time: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
                ..post("c", 1)
            })
            .unwrap();
        chain.flush().unwrap();
        let counts: Vec<(&str, usize)> =
            chain.counts().iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(counts, vec![("2024-03", 2), ("2024-04", 1)]);
        assert_eq!(chain.into_next().posts().len(), 3);
    }
}
