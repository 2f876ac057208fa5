use crate::{
    error::FontResult,
    parse_binary::BinaryParser,
    true_type::parse::OpenTypeParser,
};

/// OS/2 and Windows metrics. The base record is common to every version;
/// later versions append fields, read according to the declared version.
#[derive(Debug, Clone, Default)]
pub(crate) struct Os2 {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub us_weight_class: u16,
    pub us_width_class: u16,
    pub fs_type: u16,
    pub y_subscript_x_size: i16,
    pub y_subscript_y_size: i16,
    pub y_subscript_x_offset: i16,
    pub y_subscript_y_offset: i16,
    pub y_superscript_x_size: i16,
    pub y_superscript_y_size: i16,
    pub y_superscript_x_offset: i16,
    pub y_superscript_y_offset: i16,
    pub y_strikeout_size: i16,
    pub y_strikeout_position: i16,
    pub s_family_class: i16,
    pub panose: [u8; 10],
    pub ul_unicode_range: [u32; 4],
    pub ach_vend_id: [u8; 4],
    pub fs_selection: u16,
    pub us_first_char_index: u16,
    pub us_last_char_index: u16,
    pub s_typo_ascender: i16,
    pub s_typo_descender: i16,
    pub s_typo_line_gap: i16,
    pub us_win_ascent: u16,
    pub us_win_descent: u16,

    // version 1
    pub ul_code_page_range1: u32,
    pub ul_code_page_range2: u32,

    // version 2
    pub sx_height: i16,
    pub s_cap_height: i16,
    pub us_default_char: u16,
    pub us_break_char: u16,
    pub us_max_context: u16,

    // version 5
    pub us_lower_optical_point_size: u16,
    pub us_upper_optical_point_size: u16,
}

impl Os2 {
    pub fn parse(p: &mut OpenTypeParser) -> FontResult<Self> {
        let mut os2 = Os2 {
            version: p.parse_u16()?,
            x_avg_char_width: p.parse_i16()?,
            us_weight_class: p.parse_u16()?,
            us_width_class: p.parse_u16()?,
            fs_type: p.parse_u16()?,
            y_subscript_x_size: p.parse_i16()?,
            y_subscript_y_size: p.parse_i16()?,
            y_subscript_x_offset: p.parse_i16()?,
            y_subscript_y_offset: p.parse_i16()?,
            y_superscript_x_size: p.parse_i16()?,
            y_superscript_y_size: p.parse_i16()?,
            y_superscript_x_offset: p.parse_i16()?,
            y_superscript_y_offset: p.parse_i16()?,
            y_strikeout_size: p.parse_i16()?,
            y_strikeout_position: p.parse_i16()?,
            s_family_class: p.parse_i16()?,
            ..Os2::default()
        };

        for b in &mut os2.panose {
            *b = p.next()?;
        }
        for range in &mut os2.ul_unicode_range {
            *range = p.parse_u32()?;
        }
        for b in &mut os2.ach_vend_id {
            *b = p.next()?;
        }

        os2.fs_selection = p.parse_u16()?;
        os2.us_first_char_index = p.parse_u16()?;
        os2.us_last_char_index = p.parse_u16()?;
        os2.s_typo_ascender = p.parse_i16()?;
        os2.s_typo_descender = p.parse_i16()?;
        os2.s_typo_line_gap = p.parse_i16()?;
        os2.us_win_ascent = p.parse_u16()?;
        os2.us_win_descent = p.parse_u16()?;

        if os2.version > 0 {
            os2.ul_code_page_range1 = p.parse_u32()?;
            os2.ul_code_page_range2 = p.parse_u32()?;
        }

        if os2.version > 1 {
            os2.sx_height = p.parse_i16()?;
            os2.s_cap_height = p.parse_i16()?;
            os2.us_default_char = p.parse_u16()?;
            os2.us_break_char = p.parse_u16()?;
            os2.us_max_context = p.parse_u16()?;
        }

        if os2.version > 4 {
            os2.us_lower_optical_point_size = p.parse_u16()?;
            os2.us_upper_optical_point_size = p.parse_u16()?;
        }

        Ok(os2)
    }
}
