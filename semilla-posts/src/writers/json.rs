use crate::error::PostError;
use crate::filters::PostFilter;
use crate::post::Post;
use std::io::Write;

/// Writes one JSON object per post and line.
pub struct JsonLinesWriter<W> {
    out: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PostFilter for JsonLinesWriter<W> {
    fn filters(&mut self, post: &Post) -> Result<(), PostError> {
        serde_json::to_writer(&mut self.out, post)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PostError> {
        self.out.flush()?;
        Ok(())
    }
}
