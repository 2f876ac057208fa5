use crate::{
    error::FontResult,
    parse_binary::{BigEndianWriter, BinaryParser},
    true_type::parse::OpenTypeParser,
};

pub(crate) const MAXP_V1: u32 = 0x0001_0000;

/// Memory requirements. Version 0.5 carries only the glyph count; version
/// 1.0 adds the interpreter limits.
#[derive(Debug, Clone, Default)]
pub(crate) struct Maxp {
    pub version: u32,
    pub num_glyphs: u16,
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}

impl Maxp {
    pub fn parse(p: &mut OpenTypeParser) -> FontResult<Self> {
        let mut maxp = Maxp {
            version: p.parse_u32()?,
            num_glyphs: p.parse_u16()?,
            ..Maxp::default()
        };

        if maxp.version == MAXP_V1 {
            maxp.max_points = p.parse_u16()?;
            maxp.max_contours = p.parse_u16()?;
            maxp.max_composite_points = p.parse_u16()?;
            maxp.max_composite_contours = p.parse_u16()?;
            maxp.max_zones = p.parse_u16()?;
            maxp.max_twilight_points = p.parse_u16()?;
            maxp.max_storage = p.parse_u16()?;
            maxp.max_function_defs = p.parse_u16()?;
            maxp.max_instruction_defs = p.parse_u16()?;
            maxp.max_stack_elements = p.parse_u16()?;
            maxp.max_size_of_instructions = p.parse_u16()?;
            maxp.max_component_elements = p.parse_u16()?;
            maxp.max_component_depth = p.parse_u16()?;
        }

        Ok(maxp)
    }

    pub fn encode(&self, w: &mut Vec<u8>) {
        w.put_u32(self.version);
        w.put_u16(self.num_glyphs);

        if self.version == MAXP_V1 {
            w.put_u16(self.max_points);
            w.put_u16(self.max_contours);
            w.put_u16(self.max_composite_points);
            w.put_u16(self.max_composite_contours);
            w.put_u16(self.max_zones);
            w.put_u16(self.max_twilight_points);
            w.put_u16(self.max_storage);
            w.put_u16(self.max_function_defs);
            w.put_u16(self.max_instruction_defs);
            w.put_u16(self.max_stack_elements);
            w.put_u16(self.max_size_of_instructions);
            w.put_u16(self.max_component_elements);
            w.put_u16(self.max_component_depth);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn version_one_round_trips() {
        let maxp = Maxp {
            version: MAXP_V1,
            num_glyphs: 626,
            max_points: 143,
            max_contours: 14,
            max_zones: 2,
            max_stack_elements: 512,
            ..Maxp::default()
        };

        let mut bytes = Vec::new();
        maxp.encode(&mut bytes);
        assert_eq!(bytes.len(), 32);

        let reparsed = Maxp::parse(&mut OpenTypeParser::new(&bytes)).unwrap();
        let mut again = Vec::new();
        reparsed.encode(&mut again);
        assert_eq!(bytes, again);
    }

    #[test]
    fn version_half_is_six_bytes() {
        let maxp = Maxp {
            version: 0x0000_5000,
            num_glyphs: 4,
            ..Maxp::default()
        };

        let mut bytes = Vec::new();
        maxp.encode(&mut bytes);
        assert_eq!(bytes, [0x00, 0x00, 0x50, 0x00, 0x00, 0x04]);
    }
}
