use std::collections::HashMap;

use crate::{
    error::{FontError, FontResult},
    parse_binary::BinaryParser,
    true_type::parse::OpenTypeParser,
};

/// The naming table, decoded to a nameID -> string map. Windows Unicode
/// strings (platform 3, encoding 1) are UTF-16BE; everything else is kept
/// as raw bytes. The first record for a given nameID wins.
#[derive(Debug, Clone, Default)]
pub(crate) struct NameTable {
    names: HashMap<u16, String>,
}

struct NameRecord {
    platform_id: u16,
    encoding_id: u16,
    name_id: u16,
    length: u16,
    offset: u16,
}

impl NameTable {
    /// PostScript name of the font
    pub const POSTSCRIPT_NAME: u16 = 6;

    pub fn parse(p: &mut OpenTypeParser, table_offset: usize) -> FontResult<Self> {
        let version = p.parse_u16()?;
        if version != 0 {
            anyhow::bail!(FontError::UnsupportedFormat {
                what: "name table",
                format: version as u32,
            });
        }

        let count = p.parse_u16()?;
        let string_offset = p.parse_u16()?;

        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let platform_id = p.parse_u16()?;
            let encoding_id = p.parse_u16()?;
            let _language_id = p.parse_u16()?;
            records.push(NameRecord {
                platform_id,
                encoding_id,
                name_id: p.parse_u16()?,
                length: p.parse_u16()?,
                offset: p.parse_u16()?,
            });
        }

        let mut names = HashMap::new();
        for record in records {
            if names.contains_key(&record.name_id) {
                continue;
            }

            p.seek(table_offset + string_offset as usize + record.offset as usize)?;
            let raw = p.take(record.length as usize)?;

            let name = if record.platform_id == 3 && record.encoding_id == 1 {
                let units: Vec<u16> = raw
                    .chunks_exact(2)
                    .map(|b| u16::from_be_bytes([b[0], b[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            } else {
                String::from_utf8_lossy(raw).into_owned()
            };

            names.insert(record.name_id, name);
        }

        Ok(NameTable { names })
    }

    pub fn get(&self, name_id: u16) -> Option<&str> {
        self.names.get(&name_id).map(String::as_str)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parse_binary::BigEndianWriter;

    #[test]
    fn windows_unicode_and_mac_roman() {
        let mut bytes = Vec::new();
        bytes.put_u16(0); // version
        bytes.put_u16(2); // count
        bytes.put_u16(6 + 2 * 12); // stringOffset

        // platform 3 encoding 1, nameID 6, UTF-16BE "Crimson"
        bytes.put_bytes(&[0, 3, 0, 1, 0, 0]);
        bytes.put_u16(NameTable::POSTSCRIPT_NAME);
        bytes.put_u16(14);
        bytes.put_u16(0);

        // platform 1, nameID 1, Latin-1 "Crimson"
        bytes.put_bytes(&[0, 1, 0, 0, 0, 0]);
        bytes.put_u16(1);
        bytes.put_u16(7);
        bytes.put_u16(14);

        for c in "Crimson".chars() {
            bytes.put_u16(c as u16);
        }
        bytes.put_bytes(b"Crimson");

        let names = NameTable::parse(&mut OpenTypeParser::new(&bytes), 0).unwrap();
        assert_eq!(names.get(NameTable::POSTSCRIPT_NAME), Some("Crimson"));
        assert_eq!(names.get(1), Some("Crimson"));
        assert_eq!(names.get(2), None);
    }
}
