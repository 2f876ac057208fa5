use crate::{
    error::{FontError, FontResult},
    parse_binary::BinaryParser,
};

pub(crate) struct OpenTypeParser<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> OpenTypeParser<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Borrows the next `n` bytes out of the underlying file.
    pub fn take(&mut self, n: usize) -> FontResult<&'a [u8]> {
        let start = self.cursor;
        let end = start.checked_add(n).ok_or(FontError::TruncatedInput)?;
        let data = self
            .buffer
            .get(start..end)
            .ok_or(FontError::TruncatedInput)?;
        self.cursor = end;

        Ok(data)
    }

    pub fn parse_tag(&mut self) -> FontResult<[u8; 4]> {
        Ok(self.parse_u32()?.to_be_bytes())
    }
}

impl BinaryParser for OpenTypeParser<'_> {
    fn buffer(&self) -> &[u8] {
        self.buffer
    }
    fn cursor(&self) -> usize {
        self.cursor
    }
    fn cursor_mut(&mut self) -> &mut usize {
        &mut self.cursor
    }
}
