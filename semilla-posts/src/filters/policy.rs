//! Policies decide what a [Retained](super::Retained) filter relays.
//!
//! They compose by wrapping: each policy first asks the one it wraps for a range, then works
//! inside that range. `Everything.ordered(ByTime).paginated(1, 10)` sorts the whole buffer
//! newest first and then keeps the second page of ten.

use super::order::PostOrder;
use crate::post::Post;
use std::collections::BTreeSet;
use std::ops::Range;

pub trait Policy {
    /// Reorders or compacts `posts` and returns the range to relay.
    fn provide(&self, posts: &mut Vec<Post>) -> Range<usize>;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn provide(&self, posts: &mut Vec<Post>) -> Range<usize> {
        (**self).provide(posts)
    }
}

/// Relays the buffer as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Everything;

impl Policy for Everything {
    fn provide(&self, posts: &mut Vec<Post>) -> Range<usize> {
        0..posts.len()
    }
}

/// Sorts the range with a stable sort.
#[derive(Debug, Clone)]
pub struct Ordered<P, O> {
    inner: P,
    order: O,
}

impl<P: Policy, O: PostOrder> Policy for Ordered<P, O> {
    fn provide(&self, posts: &mut Vec<Post>) -> Range<usize> {
        let range = self.inner.provide(posts);
        posts[range.clone()].sort_by(|a, b| self.order.compare(a, b));
        range
    }
}

/// Keeps the `page`-th window of `length` posts.
#[derive(Debug, Clone)]
pub struct Paginated<P> {
    inner: P,
    page: usize,
    length: usize,
}

impl<P: Policy> Policy for Paginated<P> {
    fn provide(&self, posts: &mut Vec<Post>) -> Range<usize> {
        let range = self.inner.provide(posts);
        let start = self
            .page
            .saturating_mul(self.length)
            .saturating_add(range.start)
            .min(range.end);
        let end = start.saturating_add(self.length).min(range.end);
        start..end
    }
}

/// Replaces the range by `rebuild(range)`, returning the new range.
fn splice(
    posts: &mut Vec<Post>,
    range: Range<usize>,
    rebuild: impl FnOnce(Vec<Post>) -> Vec<Post>,
) -> Range<usize> {
    let kept = rebuild(posts.drain(range.clone()).collect());
    let end = range.start + kept.len();
    posts.splice(range.start..range.start, kept);
    range.start..end
}

/// Merges consecutive posts sharing a guid into the first of them. Tags of the merged
/// posts are folded into a comma separated list.
#[derive(Debug, Clone)]
pub struct Compacted<P> {
    inner: P,
}

impl<P: Policy> Policy for Compacted<P> {
    fn provide(&self, posts: &mut Vec<Post>) -> Range<usize> {
        let range = self.inner.provide(posts);
        splice(posts, range, |posts| {
            let mut kept: Vec<Post> = Vec::with_capacity(posts.len());
            for post in posts {
                match kept.last_mut() {
                    Some(last) if last.guid == post.guid => {
                        let known = last.tag.split(',').any(|tag| tag == post.tag);
                        if !post.tag.is_empty() && !known {
                            if !last.tag.is_empty() {
                                last.tag.push(',');
                            }
                            last.tag.push_str(&post.tag);
                        }
                    }
                    _ => kept.push(post),
                }
            }
            kept
        })
    }
}

/// Keeps the posts whose key is one of `keys`.
#[derive(Debug, Clone)]
pub struct Selected<P, O> {
    inner: P,
    order: O,
    keys: BTreeSet<String>,
}

impl<P: Policy, O: PostOrder> Policy for Selected<P, O> {
    fn provide(&self, posts: &mut Vec<Post>) -> Range<usize> {
        let range = self.inner.provide(posts);
        splice(posts, range, |mut posts| {
            posts.retain(|post| self.keys.contains(&self.order.key(post)));
            posts
        })
    }
}

/// Combinators wrapping a policy into another.
pub trait PolicyExt: Policy + Sized {
    fn ordered<O: PostOrder>(self, order: O) -> Ordered<Self, O> {
        Ordered { inner: self, order }
    }

    fn paginated(self, page: usize, length: usize) -> Paginated<Self> {
        Paginated {
            inner: self,
            page,
            length,
        }
    }

    fn compacted(self) -> Compacted<Self> {
        Compacted { inner: self }
    }

    fn selected<O, I, S>(self, order: O, keys: I) -> Selected<Self, O>
    where
        O: PostOrder,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selected {
            inner: self,
            order,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl<P: Policy> PolicyExt for P {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{ByScore, ByTag};
    use pretty_assertions::assert_eq;

    fn post(guid: &str, tag: &str, score: u32) -> Post {
        Post {
            guid: guid.into(),
            tag: tag.into(),
            score,
            ..Post::default()
        }
    }

    fn visible(policy: &impl Policy, mut posts: Vec<Post>) -> Vec<(String, String)> {
        let range = policy.provide(&mut posts);
        posts[range]
            .iter()
            .map(|p| (p.guid.clone(), p.tag.clone()))
            .collect()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(g, t)| (g.to_string(), t.to_string()))
            .collect()
    }

    #[test]
    fn pagination_clamps_to_the_buffer() {
        let posts: Vec<Post> = (0..5).map(|i| post(&i.to_string(), "", 0)).collect();
        let page = |n| visible(&Everything.paginated(n, 2), posts.clone());
        assert_eq!(page(0), pairs(&[("0", ""), ("1", "")]));
        assert_eq!(page(2), pairs(&[("4", "")]));
        assert!(page(3).is_empty());
    }

    #[test]
    fn compaction_folds_tags() {
        let posts = vec![
            post("a", "rust", 0),
            post("a", "cli", 0),
            post("a", "rust", 0),
            post("b", "", 0),
            post("a", "late", 0),
        ];
        assert_eq!(
            visible(&Everything.compacted(), posts),
            pairs(&[("a", "rust,cli"), ("b", ""), ("a", "late")])
        );
    }

    #[test]
    fn compaction_only_merges_neighbours() {
        let posts = vec![post("a", "x", 0), post("b", "y", 0), post("a", "z", 0)];
        let policy = Everything.ordered(ByTag).compacted();
        assert_eq!(
            visible(&policy, posts),
            pairs(&[("a", "x"), ("b", "y"), ("a", "z")])
        );
    }

    #[test]
    fn selection_by_key() {
        let posts = vec![post("a", "x", 0), post("b", "y", 0), post("c", "x", 0)];
        assert_eq!(
            visible(&Everything.selected(ByTag, ["x"]), posts),
            pairs(&[("a", "x"), ("c", "x")])
        );
    }

    #[test]
    fn boxed_policies_compose() {
        let policy: Box<dyn Policy> = Box::new(Everything.ordered(ByScore));
        let posts = vec![post("low", "", 1), post("high", "", 9)];
        assert_eq!(
            visible(&policy.paginated(0, 1), posts),
            pairs(&[("high", "")])
        );
    }
}
