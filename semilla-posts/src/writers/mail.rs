use crate::error::PostError;
use crate::filters::PostFilter;
use crate::post::Post;
use std::io::Write;

/// Writes posts as an mbox file.
///
/// Body lines that would read as a message separator (`From `, `>From `, ...) get one more
/// `>` in front, as mboxrd does; [MboxReader](crate::MboxReader) takes it off again.
pub struct MailWriter<W> {
    out: W,
}

fn quotes_from(line: &str) -> bool {
    line.trim_start_matches('>').starts_with("From ")
}

impl<W: Write> MailWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn message(&mut self, post: &Post) -> std::io::Result<()> {
        let sender = if post.author.is_empty() {
            "MAILER-DAEMON"
        } else {
            post.author.as_str()
        };
        writeln!(
            self.out,
            "From {} {}",
            sender.split_whitespace().collect::<Vec<_>>().join("_"),
            post.time.format("%a %b %e %H:%M:%S %Y")
        )?;
        if !post.title.is_empty() {
            writeln!(self.out, "Subject: {}", post.title)?;
        }
        writeln!(self.out, "Date: {}", post.time.to_rfc2822())?;
        writeln!(self.out, "From: {}", post.author)?;
        if !post.guid.is_empty() {
            writeln!(self.out, "Message-ID: <{}>", post.guid)?;
        }
        writeln!(self.out, "Score: {}", post.score)?;
        if !post.tag.is_empty() {
            writeln!(self.out, "Tags: {}", post.tag)?;
        }
        writeln!(self.out)?;
        for line in post.content.lines() {
            if quotes_from(line) {
                self.out.write_all(b">")?;
            }
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> PostFilter for MailWriter<W> {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        self.message(post)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PostError> {
        self.out.flush()?;
        Ok(())
    }
}
