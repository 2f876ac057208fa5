use crate::{
    error::{FontError, FontResult},
    parse_binary::{BigEndianWriter, BinaryParser},
    true_type::parse::OpenTypeParser,
};

/// Glyph offsets into the glyf table: `num_glyphs + 1` monotonically
/// non-decreasing entries, short (u16, halved) or long (u32) per
/// `head.indexToLocFormat`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Loca {
    pub offsets: Vec<u32>,
}

impl Loca {
    pub fn parse(
        p: &mut OpenTypeParser,
        index_to_loc_format: i16,
        num_glyphs: u16,
    ) -> FontResult<Self> {
        let mut offsets = Vec::with_capacity(num_glyphs as usize + 1);

        match index_to_loc_format {
            0 => {
                for _ in 0..=num_glyphs {
                    offsets.push(p.parse_u16()? as u32 * 2);
                }
            }
            1 => {
                for _ in 0..=num_glyphs {
                    offsets.push(p.parse_u32()?);
                }
            }
            format => anyhow::bail!(FontError::UnsupportedFormat {
                what: "loca",
                format: format as u32,
            }),
        }

        if offsets.windows(2).any(|w| w[0] > w[1]) {
            anyhow::bail!(FontError::IntegrityViolation(
                "loca offsets are not monotonically non-decreasing".into()
            ));
        }

        Ok(Loca { offsets })
    }

    pub fn encode(&self, w: &mut Vec<u8>, index_to_loc_format: i16) {
        match index_to_loc_format {
            0 => {
                for &offset in &self.offsets {
                    w.put_u16((offset / 2) as u16);
                }
            }
            _ => {
                for &offset in &self.offsets {
                    w.put_u32(offset);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_offsets_are_halved() {
        let bytes = [0x00, 0x00, 0x00, 0x08, 0x00, 0x08];
        let loca = Loca::parse(&mut OpenTypeParser::new(&bytes), 0, 2).unwrap();
        assert_eq!(loca.offsets, vec![0, 16, 16]);

        let mut out = Vec::new();
        loca.encode(&mut out, 0);
        assert_eq!(out, bytes);
    }

    #[test]
    fn long_offsets_round_trip() {
        let loca = Loca {
            offsets: vec![0, 120, 120, 340],
        };

        let mut out = Vec::new();
        loca.encode(&mut out, 1);
        let reparsed = Loca::parse(&mut OpenTypeParser::new(&out), 1, 3).unwrap();
        assert_eq!(reparsed.offsets, loca.offsets);
    }

    #[test]
    fn decreasing_offsets_are_rejected() {
        let bytes = [0x00, 0x08, 0x00, 0x00];
        assert!(Loca::parse(&mut OpenTypeParser::new(&bytes), 0, 1).is_err());
    }
}
