use std::collections::BTreeMap;

use crate::{
    cff::parse::CffParser,
    error::{FontError, FontResult},
    parse_binary::{BigEndianWriter, BinaryParser},
};

/// A custom encoding table mapping glyph index to character code.
///
/// Subfonts that rely on a predefined encoding carry no table at all, and
/// nothing is emitted for them on write.
#[derive(Debug, Clone, Default)]
pub(crate) struct CffEncoding {
    codes: BTreeMap<u16, u8>,
}

impl CffEncoding {
    pub fn parse(p: &mut CffParser) -> FontResult<Option<Self>> {
        match p.next()? {
            0 => {
                let count = p.next()?;
                let mut codes = BTreeMap::new();
                for i in 0..count as u16 {
                    codes.insert(i + 1, p.next()?);
                }

                Ok(Some(CffEncoding { codes }))
            }
            1 => {
                // range-coded; consumed but not retained, PDF subsetting
                // never reads it back
                let n_ranges = p.next()?;
                for _ in 0..n_ranges {
                    let _first = p.next()?;
                    let _n_left = p.next()?;
                }

                Ok(None)
            }
            format => anyhow::bail!(FontError::UnsupportedFormat {
                what: "encoding",
                format: format as u32,
            }),
        }
    }

    pub fn write(&self, w: &mut Vec<u8>) -> FontResult<usize> {
        w.put_u8(0);
        w.put_u8(self.codes.len() as u8);
        for code in self.codes.values() {
            w.put_u8(*code);
        }

        Ok(2 + self.codes.len())
    }

    pub fn encoded_len(&self) -> usize {
        2 + self.codes.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn format_zero_round_trips() {
        let bytes = [0x00, 0x03, 0x41, 0x42, 0x5a];
        let mut p = CffParser::new(&bytes);
        let encoding = CffEncoding::parse(&mut p).unwrap().unwrap();

        let mut w = Vec::new();
        assert_eq!(encoding.write(&mut w).unwrap(), bytes.len());
        assert_eq!(w, bytes);
    }

    #[test]
    fn format_one_is_consumed_but_dropped() {
        let bytes = [0x01, 0x02, 0x20, 0x05, 0x41, 0x03];
        let mut p = CffParser::new(&bytes);
        assert!(CffEncoding::parse(&mut p).unwrap().is_none());
        assert_eq!(p.peek(), None);
    }
}
