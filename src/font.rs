use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use crate::{
    cff::CffFont,
    error::{FontError, FontResult},
    parse_binary::{BigEndianWriter, BinaryParser},
    true_type::{
        parse::OpenTypeParser,
        table::{
            component_ids, search_fields, Cmap, Head, Hhea, Loca, Maxp, NameTable, Os2, Post,
            TableDirectory, TableTag, SFNT_CFF, SFNT_TRUE_TYPE,
        },
    },
};

/// Tables a TrueType-flavored font is read from.
const TRUE_TYPE_TABLES: [TableTag; 13] = [
    TableTag::HEAD,
    TableTag::HHEA,
    TableTag::MAXP,
    TableTag::LOCA,
    TableTag::HMTX,
    TableTag::FPGM,
    TableTag::CVT,
    TableTag::PREP,
    TableTag::GLYF,
    TableTag::POST,
    TableTag::OS2,
    TableTag::NAME,
    TableTag::CMAP,
];

/// Tables a CFF-flavored font is read from.
const CFF_TABLES: [TableTag; 5] = [
    TableTag::CFF,
    TableTag::HHEA,
    TableTag::MAXP,
    TableTag::HMTX,
    TableTag::CMAP,
];

/// The minimal table set a subset TrueType font is written with, in
/// directory (ASCII) order.
const SUBSET_TABLES: [TableTag; 8] = [
    TableTag::CVT,
    TableTag::GLYF,
    TableTag::HEAD,
    TableTag::HHEA,
    TableTag::HMTX,
    TableTag::LOCA,
    TableTag::MAXP,
    TableTag::PREP,
];

/// An OpenType font parsed from a caller-owned byte slice, ready to be
/// subset and re-encoded for PDF embedding.
pub struct Font<'a> {
    data: &'a [u8],
    sfnt_version: u32,
    is_cff: bool,
    directory: TableDirectory,

    head: Head,
    hhea: Hhea,
    maxp: Maxp,
    post: Post,
    os2: Os2,
    names: NameTable,
    font_name: String,

    to_unicode: HashMap<u16, char>,
    to_glyph: HashMap<char, u16>,

    glyphs: Vec<&'a [u8]>,
    advance_width: Vec<u16>,
    lsb: Vec<i16>,
    loca: Loca,
    fpgm: &'a [u8],
    cvt: &'a [u8],
    prep: &'a [u8],

    cff: Option<CffFont<'a>>,

    units_per_em: u16,
    subset_id: String,
    subset_glyphs: Vec<u16>,
}

impl<'a> Font<'a> {
    /// Parses the sfnt directory and every table of interest for the
    /// detected font flavor.
    pub fn parse(data: &'a [u8]) -> FontResult<Font<'a>> {
        let mut p = OpenTypeParser::new(data);

        let sfnt_version = p.parse_u32()?;
        let is_cff = match sfnt_version {
            SFNT_TRUE_TYPE => false,
            SFNT_CFF => true,
            magic => anyhow::bail!(FontError::UnknownMagic(magic)),
        };

        let directory = TableDirectory::parse(&mut p)?;
        for record in &directory.records {
            let end = record.offset as usize + record.length as usize;
            if end > data.len() {
                anyhow::bail!(FontError::InvalidOffset {
                    offset: end,
                    len: data.len(),
                });
            }
        }
        log::debug!(
            "parsed sfnt directory: {} tables, CFF flavor: {}",
            directory.records.len(),
            is_cff
        );

        let mut font = Font {
            data,
            sfnt_version,
            is_cff,
            directory,
            head: Head::default(),
            hhea: Hhea::default(),
            maxp: Maxp::default(),
            post: Post::default(),
            os2: Os2::default(),
            names: NameTable::default(),
            font_name: String::new(),
            to_unicode: HashMap::new(),
            to_glyph: HashMap::new(),
            glyphs: Vec::new(),
            advance_width: Vec::new(),
            lsb: Vec::new(),
            loca: Loca::default(),
            fpgm: &[],
            cvt: &[],
            prep: &[],
            cff: None,
            units_per_em: if is_cff { 1000 } else { 0 },
            subset_id: String::new(),
            subset_glyphs: Vec::new(),
        };

        let tables: &[TableTag] = if is_cff { &CFF_TABLES } else { &TRUE_TYPE_TABLES };
        for &tag in tables {
            font.read_table(tag)?;
        }

        Ok(font)
    }

    /// The raw bytes of a table, as stored in the source file.
    pub fn table_data(&self, tag: TableTag) -> Option<&'a [u8]> {
        let record = self.directory.find(tag)?;
        let start = record.offset as usize;

        Some(&self.data[start..start + record.length as usize])
    }

    fn read_table(&mut self, tag: TableTag) -> FontResult<()> {
        let Some(table) = self.table_data(tag) else {
            return Ok(());
        };
        let mut p = OpenTypeParser::new(table);

        match tag {
            TableTag::CFF => self.cff = Some(CffFont::parse(table)?),
            TableTag::HEAD => {
                self.head = Head::parse(&mut p)?;
                if self.head.units_per_em != 0 {
                    self.units_per_em = self.head.units_per_em;
                }
            }
            TableTag::HHEA => self.hhea = Hhea::parse(&mut p)?,
            TableTag::MAXP => self.maxp = Maxp::parse(&mut p)?,
            TableTag::LOCA => {
                self.loca = Loca::parse(&mut p, self.head.index_to_loc_format, self.maxp.num_glyphs)?
            }
            TableTag::HMTX => self.read_hmtx(&mut p)?,
            TableTag::FPGM => self.fpgm = table,
            TableTag::CVT => self.cvt = table,
            TableTag::PREP => self.prep = table,
            TableTag::GLYF => self.read_glyf(table)?,
            TableTag::POST => self.post = Post::parse(&mut p)?,
            TableTag::OS2 => self.os2 = Os2::parse(&mut p)?,
            TableTag::NAME => {
                self.names = NameTable::parse(&mut p, 0)?;
                self.font_name = self
                    .names
                    .get(NameTable::POSTSCRIPT_NAME)
                    .unwrap_or_default()
                    .to_string();
            }
            TableTag::CMAP => {
                let cmap = Cmap::parse(table)?;
                self.to_unicode = cmap.to_unicode;
                self.to_glyph = cmap.to_glyph;
            }
            _ => {}
        }

        Ok(())
    }

    fn read_hmtx(&mut self, p: &mut OpenTypeParser) -> FontResult<()> {
        let num_glyphs = self.maxp.num_glyphs as usize;
        let num_metrics = self.hhea.number_of_h_metrics as usize;

        if num_glyphs == 0 {
            return Ok(());
        }
        if num_metrics == 0 || num_metrics > num_glyphs {
            anyhow::bail!(FontError::IntegrityViolation(format!(
                "hhea declares {} metrics for {} glyphs",
                num_metrics, num_glyphs
            )));
        }

        self.advance_width = vec![0; num_glyphs];
        self.lsb = vec![0; num_glyphs];

        for i in 0..num_metrics {
            self.advance_width[i] = p.parse_u16()?;
            self.lsb[i] = p.parse_i16()?;
        }

        // trailing entries carry only an lsb and inherit the last advance
        for i in num_metrics..num_glyphs {
            self.lsb[i] = p.parse_i16()?;
            self.advance_width[i] = self.advance_width[num_metrics - 1];
        }

        Ok(())
    }

    fn read_glyf(&mut self, table: &'a [u8]) -> FontResult<()> {
        if self.is_cff {
            return Ok(());
        }

        let num_glyphs = self.maxp.num_glyphs as usize;
        if self.loca.offsets.len() != num_glyphs + 1 {
            anyhow::bail!(FontError::IntegrityViolation(format!(
                "loca has {} entries for {} glyphs",
                self.loca.offsets.len(),
                num_glyphs
            )));
        }

        self.glyphs = Vec::with_capacity(num_glyphs);
        let mut start = 0usize;
        for i in 0..num_glyphs {
            let end = self.loca.offsets[i + 1] as usize;
            let glyph = table.get(start..end).ok_or(FontError::InvalidOffset {
                offset: end,
                len: table.len(),
            })?;
            self.glyphs.push(glyph);
            start = end;
        }

        Ok(())
    }

    /// Removes everything not needed to render the given glyph indices.
    ///
    /// TrueType glyphs are closed under composite dependencies; glyph
    /// indices stay stable, the dropped ones become empty glyphs with
    /// zeroed metrics.
    pub fn subset(&mut self, glyph_ids: &[u16]) -> FontResult<()> {
        self.subset_id = subset_tag(glyph_ids);
        log::debug!("subset tag {} for {} glyphs", self.subset_id, glyph_ids.len());

        if self.is_cff {
            let cff = self
                .cff
                .as_mut()
                .ok_or_else(|| FontError::IntegrityViolation("CFF table missing".into()))?;
            cff.subset(glyph_ids);
            self.subset_glyphs = glyph_ids.to_vec();
            return Ok(());
        }

        self.subset_true_type(glyph_ids)
    }

    fn subset_true_type(&mut self, glyph_ids: &[u16]) -> FontResult<()> {
        let mut keep: BTreeSet<u16> = glyph_ids.iter().copied().collect();

        // composite glyphs pull in every glyph they are built from
        let mut worklist: Vec<u16> = keep.iter().copied().collect();
        while let Some(gid) = worklist.pop() {
            let glyph = self.glyphs.get(gid as usize).copied().unwrap_or(&[]);
            for component in component_ids(glyph)? {
                if keep.insert(component) {
                    worklist.push(component);
                }
            }
        }

        let max_cp = match keep.iter().next_back() {
            Some(&gid) => gid as usize + 1,
            None => return Ok(()),
        };
        if max_cp > self.glyphs.len() {
            anyhow::bail!(FontError::IntegrityViolation(format!(
                "glyph {} requested, font has {}",
                max_cp - 1,
                self.glyphs.len()
            )));
        }

        for gid in 0..max_cp {
            if !keep.contains(&(gid as u16)) {
                self.glyphs[gid] = &[];
                self.advance_width[gid] = 0;
                self.lsb[gid] = 0;
            }
        }

        self.glyphs.truncate(max_cp);
        self.advance_width.truncate(max_cp);
        self.lsb.truncate(max_cp);
        self.maxp.num_glyphs = max_cp as u16;
        self.hhea.number_of_h_metrics = max_cp as u16;
        self.head.index_to_loc_format = 1;
        self.subset_glyphs = keep.into_iter().collect();

        Ok(())
    }

    /// Writes a standalone font suitable for embedding in a PDF. For
    /// CFF-flavored fonts this is the bare CFF table; for TrueType it is a
    /// complete sfnt file with recomputed checksums.
    pub fn write_subset(&mut self, out: &mut Vec<u8>) -> FontResult<()> {
        if self.is_cff {
            let cff = self
                .cff
                .as_mut()
                .ok_or_else(|| FontError::IntegrityViolation("CFF table missing".into()))?;
            return cff.write(out);
        }

        self.head.checksum_adjustment = 0;

        let present: Vec<TableTag> = SUBSET_TABLES
            .iter()
            .copied()
            .filter(|&tag| self.directory.contains(tag))
            .collect();

        struct Entry {
            tag: TableTag,
            checksum: u32,
            offset: u32,
            length: u32,
            data: Vec<u8>,
        }

        let mut table_offset = (12 + 16 * present.len()) as u32;
        let mut entries = Vec::with_capacity(present.len());
        for tag in present {
            let mut data = self.encode_table(tag)?;
            let length = data.len() as u32;
            while data.len() % 4 != 0 {
                data.push(0);
            }

            let padded_length = data.len() as u32;
            entries.push(Entry {
                tag,
                checksum: calc_checksum(&data),
                offset: table_offset,
                length,
                data,
            });
            table_offset += padded_length;
        }

        let start = out.len();
        out.put_u32(self.sfnt_version);
        out.put_u16(entries.len() as u16);
        let (search_range, entry_selector, range_shift) = search_fields(entries.len());
        out.put_u16(search_range);
        out.put_u16(entry_selector);
        out.put_u16(range_shift);

        let mut checksum_adjustment_offset = None;
        for entry in &entries {
            out.put_bytes(&entry.tag.bytes());
            out.put_u32(entry.checksum);
            out.put_u32(entry.offset);
            out.put_u32(entry.length);

            if entry.tag == TableTag::HEAD {
                checksum_adjustment_offset = Some(entry.offset as usize + 8);
            }
        }

        for entry in &entries {
            out.put_bytes(&entry.data);
        }

        if let Some(offset) = checksum_adjustment_offset {
            let adjustment = 0xb1b0_afba_u32.wrapping_sub(calc_checksum(&out[start..]));
            out[start + offset..start + offset + 4].copy_from_slice(&adjustment.to_be_bytes());
        }

        Ok(())
    }

    /// Serializes a single table from the in-memory model.
    pub fn write_table(&mut self, tag: TableTag, out: &mut Vec<u8>) -> FontResult<()> {
        if tag == TableTag::CFF {
            let cff = self
                .cff
                .as_mut()
                .ok_or_else(|| FontError::IntegrityViolation("CFF table missing".into()))?;
            return cff.write(out);
        }

        let data = self.encode_table(tag)?;
        out.put_bytes(&data);

        Ok(())
    }

    fn encode_table(&mut self, tag: TableTag) -> FontResult<Vec<u8>> {
        let mut out = Vec::new();

        match tag {
            TableTag::HEAD => self.head.encode(&mut out),
            TableTag::HHEA => self.hhea.encode(&mut out),
            TableTag::MAXP => self.maxp.encode(&mut out),
            TableTag::LOCA => self.loca.encode(&mut out, self.head.index_to_loc_format),
            TableTag::HMTX => self.encode_hmtx(&mut out),
            TableTag::GLYF => out = self.encode_glyf(),
            TableTag::FPGM => out.put_bytes(self.fpgm),
            TableTag::CVT => out.put_bytes(self.cvt),
            TableTag::PREP => out.put_bytes(self.prep),
            tag => anyhow::bail!(FontError::IntegrityViolation(format!(
                "table {} has no writer",
                tag
            ))),
        }

        Ok(out)
    }

    fn encode_hmtx(&self, w: &mut Vec<u8>) {
        for i in 0..self.advance_width.len() {
            w.put_u16(self.advance_width[i]);
            w.put_i16(self.lsb[i]);
        }

        for &lsb in &self.lsb[self.advance_width.len()..] {
            w.put_i16(lsb);
        }
    }

    /// Emitting glyf also rebuilds loca and the glyph count, so those
    /// tables stay consistent no matter which order they are written in.
    fn encode_glyf(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut offsets = Vec::with_capacity(self.glyphs.len() + 1);

        let mut end = 0u32;
        for glyph in &self.glyphs {
            offsets.push(end);
            out.put_bytes(glyph);
            end += glyph.len() as u32;
        }
        offsets.push(end);

        self.loca.offsets = offsets;
        self.maxp.num_glyphs = self.glyphs.len() as u16;

        out
    }

    // ===== PDF-facing output =====

    /// The ToUnicode CMap program for the current subset.
    pub fn cmap(&self) -> String {
        let num_glyphs = self.num_glyphs();

        let mut b = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe)/Ordering (UCS)/Supplement 0>> def\n\
             /CMapName /Adobe-Identity-UCS def /CMapType 2 def\n\
             1 begincodespacerange\n",
        );
        let _ = writeln!(b, "<0001><{:04X}>", num_glyphs);
        b.push_str("endcodespacerange\n");
        let _ = writeln!(b, "{} beginbfchar", self.subset_glyphs.len());
        for &gid in &self.subset_glyphs {
            let unicode = self.to_unicode.get(&gid).copied().unwrap_or('\0');
            let _ = writeln!(b, "<{:04X}><{:04X}>", gid, unicode as u32);
        }
        b.push_str("endbfchar\nendcmap CMapName currentdict /CMap defineresource pop end end");

        b
    }

    /// The /Widths array for the current subset.
    pub fn widths(&self) -> String {
        let mut b = String::from("[");
        for &gid in &self.subset_glyphs {
            let advance = self.advance_width.get(gid as usize).copied().unwrap_or(0);
            let _ = write!(b, "{}[{}]", gid, advance);
        }
        b.push(']');

        b
    }

    /// The /BaseFont name: subset tag, dash, PostScript name.
    pub fn pdf_name(&self) -> String {
        format!("/{}-{}", self.subset_id, self.post_script_name())
    }

    // ===== metrics and lookups =====

    pub fn post_script_name(&self) -> &str {
        match &self.cff {
            Some(cff) => cff.font_name(),
            None => &self.font_name,
        }
    }

    pub fn is_cff(&self) -> bool {
        self.is_cff
    }

    pub fn num_glyphs(&self) -> usize {
        match &self.cff {
            Some(cff) => cff.num_glyphs(),
            None => self.maxp.num_glyphs as usize,
        }
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// A name-table entry, by nameID.
    pub fn name(&self, name_id: u16) -> Option<&str> {
        self.names.get(name_id)
    }

    pub fn glyph_advance(&self, glyph_id: u16) -> FontResult<u16> {
        self.advance_width
            .get(glyph_id as usize)
            .copied()
            .ok_or_else(|| {
                FontError::IntegrityViolation(format!("glyph {} has no metrics", glyph_id)).into()
            })
    }

    /// The glyph index a character maps to.
    pub fn glyph_index(&self, c: char) -> Option<u16> {
        self.to_glyph.get(&c).copied()
    }

    /// Glyph indices for a run of characters; unmapped characters become
    /// glyph 0.
    pub fn codepoints(&self, chars: &[char]) -> Vec<u16> {
        chars
            .iter()
            .map(|c| self.glyph_index(*c).unwrap_or(0))
            .collect()
    }

    /// The unicode codepoint a glyph maps back to.
    pub fn glyph_unicode(&self, glyph_id: u16) -> Option<char> {
        self.to_unicode.get(&glyph_id).copied()
    }

    /// The glyph ids retained by the last [`Font::subset`] call. For
    /// TrueType fonts this includes every composite dependency, sorted.
    pub fn subset_glyphs(&self) -> &[u16] {
        &self.subset_glyphs
    }

    /// /Ascent
    pub fn ascender(&self) -> i16 {
        self.hhea.ascender
    }

    /// /Descent
    pub fn descender(&self) -> i16 {
        self.hhea.descender
    }

    /// /CapHeight
    pub fn cap_height(&self) -> i16 {
        self.os2.s_cap_height
    }

    /// /XHeight
    pub fn x_height(&self) -> i16 {
        self.os2.sx_height
    }

    /// /ItalicAngle, in degrees
    pub fn italic_angle(&self) -> i32 {
        self.post.italic_angle / 65536
    }

    /// /FontBBox
    pub fn bounding_box(&self) -> String {
        format!("[0 {} 1000 {}]", self.hhea.descender, self.hhea.ascender)
    }

    /// /Flags
    pub fn flags(&self) -> i32 {
        4
    }

    /// /StemV
    pub fn stem_v(&self) -> i32 {
        0
    }
}

/// Per-table and whole-file checksum.
///
/// This is deliberately not the OpenType-standard big-endian u32 sum: it
/// shifts the four bytes of each word by 3/2/1/0 bits, matching the
/// checksums existing consumers of this output already expect. `data` must
/// be padded to a multiple of four.
pub(crate) fn calc_checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    for word in data.chunks_exact(4) {
        sum = sum
            .wrapping_add((word[0] as u32) << 3)
            .wrapping_add((word[1] as u32) << 2)
            .wrapping_add((word[2] as u32) << 1)
            .wrapping_add(word[3] as u32);
    }

    sum
}

/// Derives the six-letter subset tag from the requested glyph ids: MD5
/// over the big-endian u16 ids, each output letter folding two digest
/// bytes into A-Z.
pub(crate) fn subset_tag(glyph_ids: &[u16]) -> String {
    let mut data = Vec::with_capacity(glyph_ids.len() * 2);
    for &gid in glyph_ids {
        data.put_u16(gid);
    }

    let digest = md5::compute(&data);
    (0..6)
        .map(|i| (digest[2 * i].wrapping_add(digest[2 * i + 1]) / 26 + b'A') as char)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::true_type::table::TableRecord;

    const SIMPLE: [u8; 10] = [0x00, 0x01, 0, 0, 0, 0, 0, 50, 0, 50];
    // composite referencing glyph 1: byte args, no transform
    const COMPOSITE: [u8; 14] = [0xff, 0xff, 0, 0, 0, 0, 0, 60, 0, 60, 0x00, 0x00, 0x00, 0x01];

    fn synthetic_font() -> Font<'static> {
        let records = SUBSET_TABLES
            .iter()
            .map(|&tag| TableRecord {
                tag,
                checksum: 0,
                offset: 0,
                length: 0,
            })
            .collect();

        Font {
            data: &[],
            sfnt_version: SFNT_TRUE_TYPE,
            is_cff: false,
            directory: TableDirectory { records },
            head: Head {
                major_version: 1,
                magic_number: 0x5f0f_3cf5,
                units_per_em: 1000,
                index_to_loc_format: 1,
                ..Head::default()
            },
            hhea: Hhea {
                major_version: 1,
                ascender: 800,
                descender: -200,
                number_of_h_metrics: 3,
                ..Hhea::default()
            },
            maxp: Maxp {
                version: crate::true_type::table::MAXP_V1,
                num_glyphs: 3,
                ..Maxp::default()
            },
            post: Post::default(),
            os2: Os2::default(),
            names: NameTable::default(),
            font_name: "Synthetic".to_string(),
            to_unicode: HashMap::from([(1, 'A'), (2, 'B')]),
            to_glyph: HashMap::from([('A', 1), ('B', 2)]),
            glyphs: vec![&[], &SIMPLE, &COMPOSITE],
            advance_width: vec![500, 600, 700],
            lsb: vec![0, 10, 20],
            loca: Loca::default(),
            fpgm: &[],
            cvt: &[0x00, 0x2a],
            prep: &[0xb0, 0x01],
            cff: None,
            units_per_em: 1000,
            subset_id: String::new(),
            subset_glyphs: Vec::new(),
        }
    }

    #[test]
    fn subset_tag_is_deterministic_uppercase() {
        let tag = subset_tag(&[0, 76, 280, 340, 362, 625]);
        assert_eq!(tag, "FICEFI");
        assert_eq!(tag, subset_tag(&[0, 76, 280, 340, 362, 625]));
        assert!(tag.chars().all(|c| c.is_ascii_uppercase()));

        let other = subset_tag(&[0, 76]);
        assert_eq!(other.len(), 6);
        assert!(other.chars().all(|c| c.is_ascii_uppercase()));
        assert_ne!(tag, other);
    }

    #[test]
    fn composite_closure_pulls_in_components() {
        let mut font = synthetic_font();
        font.subset(&[0, 2]).unwrap();

        // glyph 2 is a composite of glyph 1, which must survive
        assert_eq!(font.subset_glyphs, vec![0, 1, 2]);
        assert_eq!(font.glyphs[1], &SIMPLE);
        assert_eq!(font.advance_width, vec![500, 600, 700]);
    }

    #[test]
    fn dropped_glyphs_are_emptied_and_zeroed() {
        let mut font = synthetic_font();
        font.subset(&[0, 1]).unwrap();

        assert_eq!(font.subset_glyphs, vec![0, 1]);
        assert_eq!(font.glyphs.len(), 2);
        assert_eq!(font.maxp.num_glyphs, 2);
        assert_eq!(font.hhea.number_of_h_metrics, 2);
        assert_eq!(font.head.index_to_loc_format, 1);
        assert_eq!(font.advance_width, vec![500, 600]);
    }

    #[test]
    fn unknown_glyph_is_rejected() {
        let mut font = synthetic_font();
        assert!(font.subset(&[9]).is_err());
    }

    #[test]
    fn written_subset_parses_back() {
        let mut font = synthetic_font();
        font.subset(&[0, 2]).unwrap();

        let mut out = Vec::new();
        font.write_subset(&mut out).unwrap();

        let reparsed = Font::parse(&out).unwrap();
        assert_eq!(reparsed.maxp.num_glyphs, 3);
        assert_eq!(reparsed.glyphs[1], &SIMPLE);
        assert_eq!(reparsed.glyphs[2], &COMPOSITE);
        assert_eq!(reparsed.advance_width, vec![500, 600, 700]);
        assert_eq!(reparsed.lsb, vec![0, 10, 20]);
        assert_eq!(reparsed.loca.offsets, vec![0, 0, 10, 24]);
        assert_eq!(reparsed.cvt, &[0x00, 0x2a]);
        assert_eq!(reparsed.units_per_em(), 1000);
    }

    #[test]
    fn checksum_adjustment_field_holds() {
        let mut font = synthetic_font();
        font.subset(&[0, 1, 2]).unwrap();

        let mut out = Vec::new();
        font.write_subset(&mut out).unwrap();

        // find the head record in the written directory
        let num_tables = u16::from_be_bytes([out[4], out[5]]) as usize;
        let head_offset = (0..num_tables)
            .map(|i| 12 + 16 * i)
            .find(|&r| &out[r..r + 4] == b"head")
            .map(|r| u32::from_be_bytes(out[r + 8..r + 12].try_into().unwrap()) as usize)
            .expect("head table present");

        let stored =
            u32::from_be_bytes(out[head_offset + 8..head_offset + 12].try_into().unwrap());

        let mut zeroed = out.clone();
        zeroed[head_offset + 8..head_offset + 12].fill(0);
        assert_eq!(stored, 0xb1b0_afba_u32.wrapping_sub(calc_checksum(&zeroed)));
    }

    #[test]
    fn directory_checksums_cover_padded_tables() {
        let mut font = synthetic_font();
        font.subset(&[0, 1, 2]).unwrap();

        let mut out = Vec::new();
        font.write_subset(&mut out).unwrap();

        let num_tables = u16::from_be_bytes([out[4], out[5]]) as usize;
        for i in 0..num_tables {
            let r = 12 + 16 * i;
            let checksum = u32::from_be_bytes(out[r + 4..r + 8].try_into().unwrap());
            let offset = u32::from_be_bytes(out[r + 8..r + 12].try_into().unwrap()) as usize;
            let length = u32::from_be_bytes(out[r + 12..r + 16].try_into().unwrap()) as usize;
            let padded = (length + 3) & !3;

            if &out[r..r + 4] == b"head" {
                continue; // adjusted after checksumming
            }
            assert_eq!(checksum, calc_checksum(&out[offset..offset + padded]));
        }
    }

    #[test]
    fn pdf_strings() {
        let mut font = synthetic_font();
        font.subset(&[0, 1, 2]).unwrap();

        assert_eq!(font.widths(), "[0[500]1[600]2[700]]");

        let cmap = font.cmap();
        assert!(cmap.starts_with("/CIDInit /ProcSet findresource begin"));
        assert!(cmap.contains("<0001><0003>"));
        assert!(cmap.contains("3 beginbfchar"));
        assert!(cmap.contains("<0001><0041>"));
        assert!(cmap.contains("<0002><0042>"));
        assert!(cmap.ends_with("endcmap CMapName currentdict /CMap defineresource pop end end"));

        let name = font.pdf_name();
        assert!(name.starts_with('/'));
        assert!(name.ends_with("-Synthetic"));
        assert_eq!(name.len(), 1 + 6 + 1 + "Synthetic".len());
    }

    #[test]
    fn glyph_lookups() {
        let font = synthetic_font();
        assert_eq!(font.glyph_advance(2).unwrap(), 700);
        assert!(font.glyph_advance(3).is_err());
        assert_eq!(font.glyph_index('A'), Some(1));
        assert_eq!(font.glyph_unicode(2), Some('B'));
        assert_eq!(font.codepoints(&['A', 'B', 'Z']), vec![1, 2, 0]);
    }
}
