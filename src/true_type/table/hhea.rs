use crate::{
    error::FontResult,
    parse_binary::{BigEndianWriter, BinaryParser},
    true_type::parse::OpenTypeParser,
};

/// Horizontal header: font-wide metrics and the hmtx entry count.
#[derive(Debug, Clone, Default)]
pub(crate) struct Hhea {
    pub major_version: u16,
    pub minor_version: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    pub metric_data_format: i16,
    pub number_of_h_metrics: u16,
}

impl Hhea {
    pub fn parse(p: &mut OpenTypeParser) -> FontResult<Self> {
        let mut hhea = Hhea {
            major_version: p.parse_u16()?,
            minor_version: p.parse_u16()?,
            ascender: p.parse_i16()?,
            descender: p.parse_i16()?,
            line_gap: p.parse_i16()?,
            advance_width_max: p.parse_u16()?,
            min_left_side_bearing: p.parse_i16()?,
            min_right_side_bearing: p.parse_i16()?,
            x_max_extent: p.parse_i16()?,
            caret_slope_rise: p.parse_i16()?,
            caret_slope_run: p.parse_i16()?,
            caret_offset: p.parse_i16()?,
            ..Hhea::default()
        };

        for _ in 0..4 {
            let _reserved = p.parse_i16()?;
        }

        hhea.metric_data_format = p.parse_i16()?;
        hhea.number_of_h_metrics = p.parse_u16()?;

        Ok(hhea)
    }

    pub fn encode(&self, w: &mut Vec<u8>) {
        w.put_u16(self.major_version);
        w.put_u16(self.minor_version);
        w.put_i16(self.ascender);
        w.put_i16(self.descender);
        w.put_i16(self.line_gap);
        w.put_u16(self.advance_width_max);
        w.put_i16(self.min_left_side_bearing);
        w.put_i16(self.min_right_side_bearing);
        w.put_i16(self.x_max_extent);
        w.put_i16(self.caret_slope_rise);
        w.put_i16(self.caret_slope_run);
        w.put_i16(self.caret_offset);

        for _ in 0..4 {
            w.put_i16(0);
        }

        w.put_i16(self.metric_data_format);
        w.put_u16(self.number_of_h_metrics);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips() {
        let hhea = Hhea {
            major_version: 1,
            ascender: 918,
            descender: -220,
            line_gap: 0,
            advance_width_max: 1325,
            min_left_side_bearing: -110,
            caret_slope_rise: 1,
            number_of_h_metrics: 626,
            ..Hhea::default()
        };

        let mut bytes = Vec::new();
        hhea.encode(&mut bytes);
        assert_eq!(bytes.len(), 36);

        let reparsed = Hhea::parse(&mut OpenTypeParser::new(&bytes)).unwrap();
        assert_eq!(reparsed.ascender, 918);
        assert_eq!(reparsed.descender, -220);
        assert_eq!(reparsed.number_of_h_metrics, 626);

        let mut again = Vec::new();
        reparsed.encode(&mut again);
        assert_eq!(bytes, again);
    }
}
