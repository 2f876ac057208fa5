use crate::{
    cff::parse::CffParser,
    error::{FontError, FontResult},
    parse_binary::{BigEndianWriter, BinaryParser},
};

/// Maps glyph index to SID. Glyph 0 is always `.notdef` and never encoded.
#[derive(Debug, Clone)]
pub(crate) enum Charset {
    IsoAdobe,
    Expert,
    ExpertSubset,
    Sids(Vec<u16>),
}

impl Charset {
    pub fn predefined(offset: usize) -> Option<Self> {
        match offset {
            0 => Some(Charset::IsoAdobe),
            1 => Some(Charset::Expert),
            2 => Some(Charset::ExpertSubset),
            _ => None,
        }
    }

    pub fn parse(p: &mut CffParser, num_glyphs: usize, is_cid: bool) -> FontResult<Self> {
        let mut sids = vec![0u16; num_glyphs];

        match p.next()? {
            0 => {
                if is_cid {
                    anyhow::bail!(FontError::UnsupportedFormat {
                        what: "CID-keyed charset",
                        format: 0,
                    });
                }
                for sid in sids.iter_mut().skip(1) {
                    *sid = p.parse_u16()?;
                }
            }
            1 => {
                // .notdef is implicit, so the ranges cover numGlyphs - 1 ids
                let mut glyphs_left = num_glyphs as i64 - 1;
                let mut c = 1;

                while glyphs_left > 0 {
                    let first = p.parse_u16()?;
                    let n_left = p.next()?;
                    glyphs_left -= n_left as i64 + 1;

                    for i in 0..=n_left as u16 {
                        if c >= num_glyphs {
                            anyhow::bail!(FontError::IntegrityViolation(
                                "charset ranges cover more glyphs than the font has".into()
                            ));
                        }
                        sids[c] = first.wrapping_add(i);
                        c += 1;
                    }
                }
            }
            format => anyhow::bail!(FontError::UnsupportedFormat {
                what: "charset",
                format: format as u32,
            }),
        }

        Ok(Charset::Sids(sids))
    }

    /// Emits format 0. Predefined charsets have no encoded form.
    pub fn write(&self, w: &mut Vec<u8>) -> FontResult<usize> {
        let sids = match self {
            Charset::Sids(sids) => sids,
            _ => return Ok(0),
        };

        w.put_u8(0);
        for &sid in sids.iter().skip(1) {
            w.put_u16(sid);
        }

        Ok(1 + sids.len().saturating_sub(1) * 2)
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            Charset::Sids(sids) => 1 + sids.len().saturating_sub(1) * 2,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn format_zero_round_trips() {
        let bytes = [0x00, 0x00, 0x05, 0x01, 0x86, 0x00, 0x29];
        let mut p = CffParser::new(&bytes);
        let charset = Charset::parse(&mut p, 4, false).unwrap();

        match &charset {
            Charset::Sids(sids) => assert_eq!(sids, &[0, 5, 390, 41]),
            _ => panic!("expected explicit charset"),
        }

        let mut w = Vec::new();
        assert_eq!(charset.write(&mut w).unwrap(), bytes.len());
        assert_eq!(w, bytes);
    }

    #[test]
    fn format_one_expands_ranges() {
        // two ranges: (100, nLeft 2) and (200, nLeft 0)
        let bytes = [0x01, 0x00, 0x64, 0x02, 0x00, 0xc8, 0x00];
        let mut p = CffParser::new(&bytes);
        let charset = Charset::parse(&mut p, 5, false).unwrap();

        match charset {
            Charset::Sids(sids) => assert_eq!(sids, vec![0, 100, 101, 102, 200]),
            _ => panic!("expected explicit charset"),
        }
    }

    #[test]
    fn overlong_range_is_rejected() {
        let bytes = [0x01, 0x00, 0x64, 0x08];
        let mut p = CffParser::new(&bytes);
        assert!(Charset::parse(&mut p, 3, false).is_err());
    }
}
