use super::write_escaped;
use crate::error::PostError;
use crate::filters::PostFilter;
use crate::post::Post;
use serde::Deserialize;
use std::io::Write;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlLayout {
    /// One `<div>` per post with its title, byline and content.
    #[default]
    Divs,
    /// One table row per post: date, author, title.
    Rows,
}

/// Writes posts as HTML, alternating the `postEven` and `postOdd` classes.
pub struct HtmlWriter<W> {
    out: W,
    layout: HtmlLayout,
    written: usize,
}

impl<W: Write> HtmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_layout(out, HtmlLayout::Divs)
    }

    pub fn with_layout(out: W, layout: HtmlLayout) -> Self {
        Self {
            out,
            layout,
            written: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn parity(&self) -> &'static str {
        if self.written % 2 == 0 {
            "postEven"
        } else {
            "postOdd"
        }
    }

    fn div(&mut self, post: &Post) -> std::io::Result<()> {
        writeln!(self.out, "<div class=\"{}\">", self.parity())?;
        self.out.write_all(b"<h2>")?;
        write_escaped(&mut self.out, format_args!("{}", post.title))?;
        self.out.write_all(b"</h2>\n<p class=\"byline\">")?;
        write_escaped(
            &mut self.out,
            format_args!("{} - {}", post.time.format(TIME_FORMAT), post.author),
        )?;
        self.out.write_all(b"</p>\n<p>")?;
        write_escaped(&mut self.out, format_args!("{}", post.content))?;
        self.out.write_all(b"</p>\n</div>\n")
    }

    fn row(&mut self, post: &Post) -> std::io::Result<()> {
        write!(self.out, "<tr class=\"{}\"><td>", self.parity())?;
        write!(self.out, "{}", post.time.format(TIME_FORMAT))?;
        self.out.write_all(b"</td><td>")?;
        write_escaped(&mut self.out, format_args!("{}", post.author))?;
        self.out.write_all(b"</td><td>")?;
        write_escaped(&mut self.out, format_args!("{}", post.title))?;
        self.out.write_all(b"</td></tr>\n")
    }
}

impl<W: Write> PostFilter for HtmlWriter<W> {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        match self.layout {
            HtmlLayout::Divs => self.div(post)?,
            HtmlLayout::Rows => self.row(post)?,
        }
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PostError> {
        self.out.flush()?;
        Ok(())
    }
}
