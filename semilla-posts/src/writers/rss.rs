use super::write_escaped;
use crate::error::PostError;
use crate::filters::PostFilter;
use crate::post::Post;
use std::io::Write;

/// Writes posts as RSS 2.0 `<item>` elements.
///
/// The writer only produces items; [begin_channel](Self::begin_channel) and
/// [end_channel](Self::end_channel) wrap them into a complete feed when the caller wants one.
pub struct RssWriter<W> {
    out: W,
}

impl<W: Write> RssWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn begin_channel(
        &mut self,
        title: &str,
        link: &str,
        description: &str,
    ) -> Result<(), PostError> {
        self.out
            .write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n<channel>\n")?;
        self.element("title", title)?;
        self.element("link", link)?;
        self.element("description", description)?;
        Ok(())
    }

    pub fn end_channel(&mut self) -> Result<(), PostError> {
        self.out.write_all(b"</channel>\n</rss>\n")?;
        Ok(())
    }

    fn element(&mut self, name: &str, text: &str) -> std::io::Result<()> {
        write!(self.out, "<{name}>")?;
        write_escaped(&mut self.out, format_args!("{text}"))?;
        writeln!(self.out, "</{name}>")
    }

    fn item(&mut self, post: &Post) -> std::io::Result<()> {
        self.out.write_all(b"<item>\n")?;
        self.element("title", &post.title)?;
        self.out.write_all(b"<guid isPermaLink=\"false\">")?;
        write_escaped(&mut self.out, format_args!("{}", post.guid))?;
        self.out.write_all(b"</guid>\n")?;
        self.element("author", &post.author)?;
        self.element("pubDate", &post.time.to_rfc2822())?;
        if !post.tag.is_empty() {
            for tag in post.tag.split(',') {
                self.element("category", tag.trim())?;
            }
        }
        self.element("description", &post.content)?;
        self.out.write_all(b"</item>\n")
    }
}

impl<W: Write> PostFilter for RssWriter<W> {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        self.item(post)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PostError> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn feed_with_one_item() {
        let mut writer = RssWriter::new(Vec::new());
        writer
            .begin_channel("Notes", "https://example.org/", "Things & stuff")
            .unwrap();
        writer
            .filters(&Post {
                guid: "n-1".into(),
                title: "<b>bold</b> move".into(),
                content: "body".into(),
                author: "jane@example.org".into(),
                time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                score: 0,
                tag: "a,b".into(),
            })
            .unwrap();
        writer.end_channel().unwrap();
        let xml = String::from_utf8(writer.into_inner()).unwrap();
        insta::assert_snapshot!(xml.trim_end(), @r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0">
        <channel>
        <title>Notes</title>
        <link>https://example.org/</link>
        <description>Things &amp; stuff</description>
        <item>
        <title>&lt;b&gt;bold&lt;/b&gt; move</title>
        <guid isPermaLink="false">n-1</guid>
        <author>jane@example.org</author>
        <pubDate>Mon, 1 Jan 2024 00:00:00 +0000</pubDate>
        <category>a</category>
        <category>b</category>
        <description>body</description>
        </item>
        </channel>
        </rss>
        "#);
    }
}
