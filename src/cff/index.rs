use crate::{
    cff::parse::CffParser,
    error::{FontError, FontResult},
    parse_binary::{BigEndianWriter, BinaryParser},
};

/// A CFF INDEX: an ordered sequence of opaque byte slices.
///
/// The offset width seen on read is recorded and reused verbatim when the
/// INDEX is re-serialized, so an unmodified INDEX round-trips byte for byte.
#[derive(Debug, Clone)]
pub(crate) struct CffIndex<'a> {
    pub offset_size: u8,
    pub items: Vec<&'a [u8]>,
}

impl<'a> CffIndex<'a> {
    pub fn empty() -> Self {
        CffIndex {
            offset_size: 1,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, idx: usize) -> Option<&'a [u8]> {
        self.items.get(idx).copied()
    }

    pub fn parse(p: &mut CffParser<'a>) -> FontResult<Self> {
        let count = p.parse_u16()?;
        if count == 0 {
            return Ok(CffIndex::empty());
        }

        let offset_size = p.next()?;
        anyhow::ensure!(
            (1..=4).contains(&offset_size),
            FontError::IntegrityViolation(format!("invalid INDEX offSize {}", offset_size)),
        );

        let mut offsets = Vec::with_capacity(count as usize + 1);
        for _ in 0..=count {
            offsets.push(parse_offset(p, offset_size)? as usize);
        }

        if offsets[0] != 1 {
            anyhow::bail!(FontError::IntegrityViolation(format!(
                "INDEX offsets must start at 1, found {}",
                offsets[0]
            )));
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            anyhow::bail!(FontError::IntegrityViolation(
                "INDEX offsets are not monotonically non-decreasing".into()
            ));
        }

        let data = p.take(offsets[count as usize] - 1)?;
        let items = offsets
            .windows(2)
            .map(|w| &data[w[0] - 1..w[1] - 1])
            .collect();

        Ok(CffIndex { offset_size, items })
    }

    pub fn write(&self, w: &mut Vec<u8>) -> FontResult<usize> {
        write_index(w, self.offset_size, self.items.iter().copied())
    }

    pub fn encoded_len(&self) -> usize {
        encoded_len(self.offset_size, self.items.iter().copied())
    }
}

fn parse_offset(p: &mut CffParser, offset_size: u8) -> FontResult<u32> {
    Ok(match offset_size {
        1 => p.next()? as u32,
        2 => p.parse_u16()? as u32,
        3 => p.parse_u24()?,
        4 => p.parse_u32()?,
        _ => unreachable!("offSize validated on read"),
    })
}

fn put_offset(w: &mut Vec<u8>, offset_size: u8, offset: usize) -> FontResult<()> {
    let max = match offset_size {
        1 => 0xff,
        2 => 0xffff,
        3 => 0xff_ffff,
        _ => u32::MAX as usize,
    };
    if offset > max {
        anyhow::bail!(FontError::InvalidOffset {
            offset,
            len: max + 1,
        });
    }

    match offset_size {
        1 => w.put_u8(offset as u8),
        2 => w.put_u16(offset as u16),
        3 => w.put_bytes(&(offset as u32).to_be_bytes()[1..]),
        _ => w.put_u32(offset as u32),
    }

    Ok(())
}

/// Serializes the items in CFF INDEX format, returning the number of bytes
/// written. An empty sequence is just the two count bytes.
pub(crate) fn write_index<'b>(
    w: &mut Vec<u8>,
    offset_size: u8,
    items: impl ExactSizeIterator<Item = &'b [u8]> + Clone,
) -> FontResult<usize> {
    let start = w.len();

    w.put_u16(items.len() as u16);
    if items.len() == 0 {
        return Ok(w.len() - start);
    }

    w.put_u8(offset_size);

    let mut end = 1usize;
    put_offset(w, offset_size, end)?;
    for item in items.clone() {
        end += item.len();
        put_offset(w, offset_size, end)?;
    }

    for item in items {
        w.put_bytes(item);
    }

    Ok(w.len() - start)
}

pub(crate) fn encoded_len<'b>(
    offset_size: u8,
    items: impl ExactSizeIterator<Item = &'b [u8]>,
) -> usize {
    let count = items.len();
    if count == 0 {
        return 2;
    }

    let payload: usize = items.map(<[u8]>::len).sum();

    2 + 1 + (count + 1) * offset_size as usize + payload
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(bytes: &[u8]) {
        let mut p = CffParser::new(bytes);
        let index = CffIndex::parse(&mut p).unwrap();

        let mut w = Vec::new();
        let written = index.write(&mut w).unwrap();

        assert_eq!(written, bytes.len());
        assert_eq!(index.encoded_len(), bytes.len());
        assert_eq!(w, bytes);
    }

    #[test]
    fn round_trips_single_byte_offsets() {
        round_trip(&[0x00, 0x02, 0x01, 0x01, 0x03, 0x06, b'a', b'b', b'c', b'd', b'e']);
    }

    #[test]
    fn round_trips_wide_offsets() {
        // offSize 2 must be preserved even though every offset fits one byte
        round_trip(&[0x00, 0x01, 0x02, 0x00, 0x01, 0x00, 0x03, b'x', b'y']);
    }

    #[test]
    fn empty_index_is_two_bytes() {
        round_trip(&[0x00, 0x00]);
    }

    #[test]
    fn rejects_non_monotonic_offsets() {
        let bytes = [0x00, 0x02, 0x01, 0x01, 0x05, 0x03, b'a', b'b', b'c', b'd'];
        assert!(CffIndex::parse(&mut CffParser::new(&bytes)).is_err());
    }

    #[test]
    fn rejects_first_offset_not_one() {
        let bytes = [0x00, 0x01, 0x01, 0x02, 0x03, b'a', b'b'];
        assert!(CffIndex::parse(&mut CffParser::new(&bytes)).is_err());
    }

    #[test]
    fn truncated_payload() {
        let bytes = [0x00, 0x01, 0x01, 0x01, 0x0a, b'a'];
        assert!(CffIndex::parse(&mut CffParser::new(&bytes)).is_err());
    }
}
