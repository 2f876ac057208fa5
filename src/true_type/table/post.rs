use crate::{
    error::{FontError, FontResult},
    parse_binary::BinaryParser,
    true_type::parse::OpenTypeParser,
};

/// PostScript information. Versions 1.0 and 3.0 are header-only; version
/// 2.0 appends glyph names, which PDF embedding never reads, so the payload
/// is accepted and skipped. Versions 2.5 and 4.0 are not handled.
#[derive(Debug, Clone, Default)]
pub(crate) struct Post {
    pub version: u32,
    /// 16.16 fixed, degrees counter-clockwise from vertical
    pub italic_angle: i32,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: u32,
    pub min_mem_type42: u32,
    pub max_mem_type42: u32,
    pub min_mem_type1: u32,
    pub max_mem_type1: u32,
}

impl Post {
    pub fn parse(p: &mut OpenTypeParser) -> FontResult<Self> {
        let post = Post {
            version: p.parse_u32()?,
            italic_angle: p.parse_i32()?,
            underline_position: p.parse_i16()?,
            underline_thickness: p.parse_i16()?,
            is_fixed_pitch: p.parse_u32()?,
            min_mem_type42: p.parse_u32()?,
            max_mem_type42: p.parse_u32()?,
            min_mem_type1: p.parse_u32()?,
            max_mem_type1: p.parse_u32()?,
        };

        match post.version {
            0x0001_0000 | 0x0002_0000 | 0x0003_0000 => Ok(post),
            version => anyhow::bail!(FontError::UnsupportedFormat {
                what: "post table",
                format: version,
            }),
        }
    }
}
