use crate::{
    error::FontResult,
    parse_binary::{BigEndianWriter, BinaryParser},
    true_type::parse::OpenTypeParser,
};

#[derive(Debug, Clone, Default)]
pub(crate) struct Head {
    pub major_version: u16,
    pub minor_version: u16,
    /// 16.16 fixed
    pub font_revision: i32,
    pub checksum_adjustment: u32,
    pub magic_number: u32,
    pub flags: u16,
    pub units_per_em: u16,
    /// seconds since 1904-01-01T00:00:00
    pub created: i64,
    pub modified: i64,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: u16,
    /// smallest readable size in pixels
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl Head {
    pub fn parse(p: &mut OpenTypeParser) -> FontResult<Self> {
        Ok(Head {
            major_version: p.parse_u16()?,
            minor_version: p.parse_u16()?,
            font_revision: p.parse_i32()?,
            checksum_adjustment: p.parse_u32()?,
            magic_number: p.parse_u32()?,
            flags: p.parse_u16()?,
            units_per_em: p.parse_u16()?,
            created: p.parse_i64()?,
            modified: p.parse_i64()?,
            x_min: p.parse_i16()?,
            y_min: p.parse_i16()?,
            x_max: p.parse_i16()?,
            y_max: p.parse_i16()?,
            mac_style: p.parse_u16()?,
            lowest_rec_ppem: p.parse_u16()?,
            font_direction_hint: p.parse_i16()?,
            index_to_loc_format: p.parse_i16()?,
            glyph_data_format: p.parse_i16()?,
        })
    }

    pub fn encode(&self, w: &mut Vec<u8>) {
        w.put_u16(self.major_version);
        w.put_u16(self.minor_version);
        w.put_i32(self.font_revision);
        w.put_u32(self.checksum_adjustment);
        w.put_u32(self.magic_number);
        w.put_u16(self.flags);
        w.put_u16(self.units_per_em);
        w.put_i64(self.created);
        w.put_i64(self.modified);
        w.put_i16(self.x_min);
        w.put_i16(self.y_min);
        w.put_i16(self.x_max);
        w.put_i16(self.y_max);
        w.put_u16(self.mac_style);
        w.put_u16(self.lowest_rec_ppem);
        w.put_i16(self.font_direction_hint);
        w.put_i16(self.index_to_loc_format);
        w.put_i16(self.glyph_data_format);
    }
}
