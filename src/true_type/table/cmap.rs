use std::collections::HashMap;

use crate::{
    error::{FontError, FontResult},
    parse_binary::BinaryParser,
    true_type::parse::OpenTypeParser,
};

/// Character-to-glyph mapping, decoded into both directions.
///
/// Subtable formats 0, 4 and 12 are read; format 6 is skipped. A format-4
/// subtable replaces whatever was decoded before it, the byte-oriented and
/// segmented-coverage formats only fill an empty mapping.
#[derive(Debug, Clone, Default)]
pub(crate) struct Cmap {
    pub to_unicode: HashMap<u16, char>,
    pub to_glyph: HashMap<char, u16>,
}

impl Cmap {
    /// `table` must be exactly the cmap table bytes; subtable offsets are
    /// relative to its start.
    pub fn parse(table: &[u8]) -> FontResult<Self> {
        let mut p = OpenTypeParser::new(table);

        let _version = p.parse_u16()?;
        let subtable_count = p.parse_u16()?;

        let mut offsets = Vec::with_capacity(subtable_count as usize);
        for _ in 0..subtable_count {
            let _platform = p.parse_u16()?;
            let _encoding = p.parse_u16()?;
            offsets.push(p.parse_u32()? as usize);
        }

        let mut cmap = Cmap::default();
        let mut skipped_format = None;
        for offset in offsets {
            p.seek(offset)?;
            let format = p.parse_u16()?;
            log::trace!("cmap subtable at {}: format {}", offset, format);

            match format {
                0 => cmap.parse_format0(&mut p)?,
                4 => cmap.parse_format4(&mut p, table, offset)?,
                6 => {} // trimmed table mapping, never the only subtable
                12 => cmap.parse_format12(&mut p)?,
                format => skipped_format = Some(format),
            }
        }

        // auxiliary subtables (variation sequences and the like) are fine
        // to skip, a cmap made up only of formats we cannot decode is not
        if cmap.to_unicode.is_empty() {
            if let Some(format) = skipped_format {
                anyhow::bail!(FontError::UnsupportedFormat {
                    what: "cmap subtable",
                    format: format as u32,
                });
            }
        }

        Ok(cmap)
    }

    fn insert(&mut self, glyph: u16, codepoint: u32) {
        if let Some(c) = char::from_u32(codepoint) {
            self.to_unicode.insert(glyph, c);
            self.to_glyph.insert(c, glyph);
        }
    }

    fn parse_format0(&mut self, p: &mut OpenTypeParser) -> FontResult<()> {
        if !self.to_unicode.is_empty() {
            return Ok(());
        }

        let length = p.parse_u16()?;
        let _language = p.parse_u16()?;

        for code in 0..length.saturating_sub(6) {
            let glyph = p.next()? as u16;
            self.insert(glyph, code as u32);
        }

        Ok(())
    }

    fn parse_format4(
        &mut self,
        p: &mut OpenTypeParser,
        table: &[u8],
        subtable_offset: usize,
    ) -> FontResult<()> {
        self.to_unicode = HashMap::new();
        self.to_glyph = HashMap::new();

        let _length = p.parse_u16()?;
        let _language = p.parse_u16()?;
        let seg_count = (p.parse_u16()? / 2) as usize;
        let _search_range = p.parse_u16()?;
        let _entry_selector = p.parse_u16()?;
        let _range_shift = p.parse_u16()?;

        let read_u16s = |p: &mut OpenTypeParser| -> FontResult<Vec<u16>> {
            (0..seg_count).map(|_| p.parse_u16()).collect()
        };

        let end_codes = read_u16s(p)?;
        let _reserved_pad = p.parse_u16()?;
        let start_codes = read_u16s(p)?;
        let id_deltas: Vec<i16> = (0..seg_count).map(|_| p.parse_i16()).collect::<FontResult<_>>()?;
        let id_range_offsets = read_u16s(p)?;

        // position of idRangeOffset[0] within the table
        let range_base = subtable_offset + 16 + 8 * seg_count;

        for i in 0..seg_count {
            let start = start_codes[i];
            let end = end_codes[i];
            let delta = id_deltas[i];
            let range_offset = id_range_offsets[i] as usize;

            if start == 0xffff {
                break;
            }

            for code in start..=end {
                if range_offset == 0 {
                    self.insert(code.wrapping_add(delta as u16), code as u32);
                } else {
                    let idx = (range_base + range_offset) as i64
                        + 2 * (i as i64 - seg_count as i64 + (code - start) as i64);
                    let idx = usize::try_from(idx).map_err(|_| FontError::InvalidOffset {
                        offset: 0,
                        len: table.len(),
                    })?;
                    let (Some(&hi), Some(&lo)) = (table.get(idx), table.get(idx + 1)) else {
                        anyhow::bail!(FontError::InvalidOffset {
                            offset: idx,
                            len: table.len(),
                        });
                    };

                    self.insert(u16::from_be_bytes([hi, lo]), code as u32);
                }
            }
        }

        Ok(())
    }

    fn parse_format12(&mut self, p: &mut OpenTypeParser) -> FontResult<()> {
        if !self.to_unicode.is_empty() {
            return Ok(());
        }

        let _reserved = p.parse_u16()?;
        let _length = p.parse_u32()?;
        let _language = p.parse_u32()?;
        let group_count = p.parse_u32()?;

        for _ in 0..group_count {
            let start_char = p.parse_u32()?;
            let end_char = p.parse_u32()?;
            let start_glyph = p.parse_u32()?;

            if end_char > 0x10_ffff || start_char > end_char {
                anyhow::bail!(FontError::IntegrityViolation(format!(
                    "cmap group covers invalid range {:#x}..{:#x}",
                    start_char, end_char
                )));
            }

            for (i, code) in (start_char..=end_char).enumerate() {
                self.insert((start_glyph as usize + i) as u16, code);
            }
        }

        Ok(())
    }
}
