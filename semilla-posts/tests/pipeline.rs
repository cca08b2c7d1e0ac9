use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use semilla_posts::filters::{ByTime, Everything};
use semilla_posts::{
    Collect, HtmlWriter, MailWriter, MboxReader, PolicyExt, Post, PostFilter, Retained, ValidOnly,
};

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

fn post(guid: &str, day: u32) -> Post {
    Post {
        guid: guid.into(),
        title: format!("Post {guid}"),
        content: format!("Body of {guid}"),
        author: "jane@example.org".into(),
        time: at(day),
        ..Post::default()
    }
}

fn guids(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.guid.as_str()).collect()
}

#[test]
fn retained_posts_come_out_newest_first() {
    let mut chain = Retained::new(Everything.ordered(ByTime), Collect::new());
    for post in [post("t2", 2), post("t3", 1), post("t1", 3)] {
        chain.filters(&post).unwrap();
    }
    assert_eq!(chain.pending().len(), 3);
    chain.flush().unwrap();

    let out = chain.into_next();
    assert_eq!(guids(out.posts()), ["t1", "t2", "t3"]);
    assert_eq!(out.flushes(), 1);
}

#[test]
fn second_page_of_two() {
    let mut chain = Retained::new(Everything.ordered(ByTime).paginated(1, 2), Collect::new());
    for day in 1..=5 {
        chain.filters(&post(&format!("d{day}"), day)).unwrap();
    }
    chain.flush().unwrap();

    assert_eq!(guids(chain.into_next().posts()), ["d3", "d2"]);
}

#[test]
fn invalid_posts_never_reach_the_writer() {
    let mut broken = post("bad guid", 4);
    broken.title = "Broken".into();
    let mut chain = ValidOnly::new(Retained::new(
        Everything.ordered(ByTime),
        HtmlWriter::new(Vec::new()),
    ));
    chain.filters(&post("a", 1)).unwrap();
    chain.filters(&broken).unwrap();
    chain.filters(&post("b", 2)).unwrap();
    chain.flush().unwrap();
    assert_eq!(chain.dropped(), 1);

    let html = String::from_utf8(chain.into_next().into_next().into_inner()).unwrap();
    assert!(!html.contains("Broken"));
    let b = html.find("Post b").unwrap();
    let a = html.find("Post a").unwrap();
    assert!(b < a);
    assert!(html.starts_with("<div class=\"postEven\">"));
}

#[test]
fn mail_written_posts_read_back_unchanged() {
    let mut first = post("1@example.org", 3);
    first.content = "Hello\nFrom the start\n\n>From quoted".into();
    first.score = 7;
    first.tag = "news".into();
    let second = post("2@example.org", 4);

    let mut writer = MailWriter::new(Vec::new());
    writer.filters(&first).unwrap();
    writer.filters(&second).unwrap();
    writer.flush().unwrap();
    let mbox = writer.into_inner();

    let mut posts = Collect::new();
    MboxReader::new()
        .read_from(mbox.as_slice(), &mut posts)
        .unwrap();
    assert_eq!(posts.into_posts(), vec![first, second]);
}

#[test]
fn trailing_backslashes_do_not_join_mail_lines() {
    let mut first = post("1@example.org", 3);
    first.title = "Paths like C:\\".into();
    first.content = "Use C:\\\nnot D:\\".into();

    let mut writer = MailWriter::new(Vec::new());
    writer.filters(&first).unwrap();
    writer.flush().unwrap();
    let mbox = writer.into_inner();

    let mut posts = Collect::new();
    MboxReader::new()
        .read_from(mbox.as_slice(), &mut posts)
        .unwrap();
    let posts = posts.into_posts();
    assert_eq!(posts[0].time, at(3));
    assert_eq!(posts, vec![first]);
}

fn page(posts: &[Post], page: usize, length: usize) -> Vec<String> {
    let mut chain = Retained::new(
        Everything.ordered(ByTime).paginated(page, length),
        Collect::new(),
    );
    for post in posts {
        chain.filters(post).unwrap();
    }
    chain.flush().unwrap();
    chain
        .into_next()
        .into_posts()
        .into_iter()
        .map(|post| post.guid)
        .collect()
}

proptest! {
    #[test]
    fn pages_partition_the_ordered_posts(
        days in proptest::collection::vec(1u32..28, 0..12),
        length in 1usize..5,
    ) {
        let posts: Vec<Post> = days
            .iter()
            .enumerate()
            .map(|(i, day)| post(&format!("p{i}"), *day))
            .collect();
        let all = page(&posts, 0, posts.len().max(1));

        let mut paged = Vec::new();
        for index in 0..=posts.len() / length {
            paged.extend(page(&posts, index, length));
        }
        prop_assert_eq!(paged, all);
    }
}
