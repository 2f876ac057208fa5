/*!
 * Compact Font Format parsing, subsetting and re-encoding.
 *
 * https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf
 *
 * See also:
 *  - https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf
 */

mod charset;
mod charstring;
mod dict;
mod encoding;
mod index;
mod parse;
mod strings;
mod write;

pub use charstring::UsedSubrs;

pub(crate) use charset::Charset;
pub(crate) use encoding::CffEncoding;
pub(crate) use index::CffIndex;

use crate::cff::{charstring::scan_charstring, strings::StringTable};

/// A parsed CFF font file: header, the four top-level indices and one
/// subfont per top DICT INDEX entry.
#[derive(Debug)]
pub struct CffFont<'a> {
    pub(crate) major: u8,
    pub(crate) minor: u8,
    pub(crate) header_size: u8,
    pub(crate) offset_size: u8,

    pub(crate) font_names: Vec<String>,
    pub(crate) strings: StringTable,
    pub(crate) global_subrs: CffIndex<'a>,
    pub(crate) subfonts: Vec<Subfont<'a>>,

    /// offSize of the name, top DICT and string indices as observed on
    /// read, preserved on write
    pub(crate) name_offset_size: u8,
    pub(crate) dict_offset_size: u8,
    pub(crate) string_offset_size: u8,
}

/// One font inside the CFF container: its resolved top-DICT values, the
/// charset/encoding/charstrings it owns and its private DICT with local
/// subroutines.
#[derive(Debug)]
pub(crate) struct Subfont<'a> {
    pub name: String,

    pub version: Option<String>,
    pub notice: Option<String>,
    pub copyright: Option<String>,
    pub fullname: Option<String>,
    pub familyname: Option<String>,
    pub weight: Option<String>,
    pub fontname: Option<String>,

    pub is_fixed_pitch: bool,
    pub italic_angle: f64,
    pub paint_type: f64,
    pub charstring_type: i32,
    pub font_matrix: Option<Vec<f64>>,
    pub stroke_width: f64,
    pub synthetic_base: Option<i32>,
    pub unique_id: Option<i32>,
    pub xuid: Option<Vec<i32>>,
    pub bbox: [i32; 4],
    pub underline_position: f64,
    pub underline_thickness: f64,

    pub blue_values: Vec<i32>,
    pub other_blues: Vec<i32>,
    pub family_blues: Vec<i32>,
    pub family_other_blues: Vec<i32>,
    pub blue_scale: f64,
    pub blue_shift: i32,
    pub blue_fuzz: i32,
    pub std_hw: Option<i32>,
    pub std_vw: Option<i32>,
    pub stem_snap_h: Vec<i32>,
    pub stem_snap_v: Vec<i32>,
    pub initial_random_seed: i32,
    pub default_width_x: i32,
    pub nominal_width_x: i32,

    pub charset_offset: usize,
    pub encoding_offset: usize,
    pub charstrings_offset: usize,
    pub private_size: usize,
    pub private_offset: usize,
    /// relative to the start of the private DICT
    pub subrs_offset: usize,

    pub registry: Option<String>,
    pub ordering: Option<String>,
    pub supplement: i32,
    pub cid_count: i32,
    pub fd_array: usize,
    pub fd_select: usize,

    pub charset: Charset,
    pub encoding: Option<CffEncoding>,
    pub charstrings: CffIndex<'a>,
    pub private_dict: &'a [u8],
    pub local_subrs: CffIndex<'a>,

    pub used_subrs: UsedSubrs,
}

impl Default for Subfont<'_> {
    fn default() -> Self {
        Subfont {
            name: String::new(),
            version: None,
            notice: None,
            copyright: None,
            fullname: None,
            familyname: None,
            weight: None,
            fontname: None,
            is_fixed_pitch: false,
            italic_angle: 0.0,
            paint_type: 0.0,
            charstring_type: 2,
            font_matrix: None,
            stroke_width: 0.0,
            synthetic_base: None,
            unique_id: None,
            xuid: None,
            bbox: [0; 4],
            underline_position: -100.0,
            underline_thickness: 50.0,
            blue_values: Vec::new(),
            other_blues: Vec::new(),
            family_blues: Vec::new(),
            family_other_blues: Vec::new(),
            blue_scale: 0.039625,
            blue_shift: 7,
            blue_fuzz: 1,
            std_hw: None,
            std_vw: None,
            stem_snap_h: Vec::new(),
            stem_snap_v: Vec::new(),
            initial_random_seed: 0,
            default_width_x: 0,
            nominal_width_x: 0,
            charset_offset: 0,
            encoding_offset: 0,
            charstrings_offset: 0,
            private_size: 0,
            private_offset: 0,
            subrs_offset: 0,
            registry: None,
            ordering: None,
            supplement: 0,
            cid_count: 0,
            fd_array: 0,
            fd_select: 0,
            charset: Charset::IsoAdobe,
            encoding: None,
            charstrings: CffIndex::empty(),
            private_dict: &[],
            local_subrs: CffIndex::empty(),
            used_subrs: UsedSubrs::default(),
        }
    }
}

impl<'a> CffFont<'a> {
    /// The PostScript name of the first font in the container.
    pub fn font_name(&self) -> &str {
        self.font_names.first().map(String::as_str).unwrap_or("")
    }

    pub fn num_glyphs(&self) -> usize {
        self.subfonts
            .first()
            .map(|sf| sf.charstrings.len())
            .unwrap_or(0)
    }

    /// Reduces the font to the given glyph indices. Glyph 0 (`.notdef`) is
    /// always retained.
    ///
    /// Charstrings, subroutines and the charset are preserved whole so that
    /// glyph indices stay valid for downstream PDF references; what changes
    /// is the subroutine-liveness bookkeeping and, at write time, the
    /// recomputed section offsets.
    pub fn subset(&mut self, glyphs: &[u16]) {
        let global_subrs = &self.global_subrs.items;

        for sf in &mut self.subfonts {
            let mut used = UsedSubrs::default();

            for gid in std::iter::once(0).chain(glyphs.iter().map(|&gid| gid as usize)) {
                if let Some(cs) = sf.charstrings.get(gid) {
                    scan_charstring(global_subrs, &sf.local_subrs.items, cs, &mut used);
                }
            }

            log::debug!(
                "subset font {:?}: {} global and {} local subrs live",
                sf.name,
                used.global.len(),
                used.local.len()
            );

            sf.used_subrs = used;
        }
    }
}

impl Subfont<'_> {
    /// True if character selection is CID-keyed rather than SID-keyed.
    pub fn is_cid_font(&self) -> bool {
        self.fd_select != 0
    }

    pub(crate) fn num_glyphs(&self) -> usize {
        self.charstrings.len()
    }
}
