use crate::{
    error::FontResult,
    parse_binary::BinaryParser,
    true_type::{parse::OpenTypeParser, table::TableTag},
};

/// sfnt version 1.0, TrueType outlines
pub(crate) const SFNT_TRUE_TYPE: u32 = 0x0001_0000;
/// 'OTTO', CFF outlines
pub(crate) const SFNT_CFF: u32 = 0x4f54_544f;

#[derive(Debug, Clone)]
pub(crate) struct TableRecord {
    pub tag: TableTag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// The sfnt table directory: one record per table, locating it inside the
/// file. searchRange/entrySelector/rangeShift are ignored on read and
/// recomputed on write.
#[derive(Debug, Clone, Default)]
pub(crate) struct TableDirectory {
    pub records: Vec<TableRecord>,
}

impl TableDirectory {
    pub fn parse(p: &mut OpenTypeParser) -> FontResult<Self> {
        let num_tables = p.parse_u16()?;
        let _search_range = p.parse_u16()?;
        let _entry_selector = p.parse_u16()?;
        let _range_shift = p.parse_u16()?;

        let mut records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            records.push(TableRecord {
                tag: TableTag::new(p.parse_tag()?),
                checksum: p.parse_u32()?,
                offset: p.parse_u32()?,
                length: p.parse_u32()?,
            });
        }

        Ok(TableDirectory { records })
    }

    pub fn find(&self, tag: TableTag) -> Option<&TableRecord> {
        self.records.iter().find(|record| record.tag == tag)
    }

    pub fn contains(&self, tag: TableTag) -> bool {
        self.find(tag).is_some()
    }
}

/// binary-search helper fields of the sfnt header, derived from the table
/// count
pub(crate) fn search_fields(num_tables: usize) -> (u16, u16, u16) {
    let mut entry_selector = 0u16;
    while (2usize << entry_selector) <= num_tables {
        entry_selector += 1;
    }

    let search_range = (1u16 << entry_selector) * 16;
    let range_shift = num_tables as u16 * 16 - search_range;

    (search_range, entry_selector, range_shift)
}
