use crate::{
    cff::{dict, index, Charset, CffFont},
    error::{FontError, FontResult},
    parse_binary::BigEndianWriter,
};

impl CffFont<'_> {
    /// Serializes the font, recomputing every section offset first.
    ///
    /// Section order: header, name INDEX, top DICT INDEX, string INDEX,
    /// global subr INDEX, then per subfont charset, encoding, charstrings,
    /// private DICT and local subrs.
    pub fn write(&mut self, w: &mut Vec<u8>) -> FontResult<()> {
        self.update_offsets()?;

        w.put_u8(self.major);
        w.put_u8(self.minor);
        w.put_u8(self.header_size);
        w.put_u8(self.offset_size);
        for _ in 4..self.header_size {
            w.put_u8(0);
        }

        index::write_index(
            w,
            self.name_offset_size,
            self.font_names.iter().map(String::as_bytes),
        )?;

        let dicts = self
            .subfonts
            .iter()
            .map(|sf| dict::encode_dict(sf, &self.strings))
            .collect::<FontResult<Vec<_>>>()?;
        index::write_index(w, self.dict_offset_size, dicts.iter().map(Vec::as_slice))?;

        index::write_index(w, self.string_offset_size, self.strings.font_strings())?;

        self.global_subrs.write(w)?;

        for sf in &self.subfonts {
            sf.charset.write(w)?;
            if let Some(encoding) = &sf.encoding {
                encoding.write(w)?;
            }
            sf.charstrings.write(w)?;
            w.put_bytes(sf.private_dict);
            if sf.subrs_offset != 0 {
                sf.local_subrs.write(w)?;
            }
        }

        Ok(())
    }

    /// Recomputes the section offsets stored in each subfont's top DICT.
    ///
    /// The top DICT lives before the sections it points at and its own size
    /// depends on the encoded width of those offsets, so this iterates:
    /// encode the dicts with the current offsets, lay the sections out,
    /// patch, and repeat until the layout stops moving.
    pub(crate) fn update_offsets(&mut self) -> FontResult<()> {
        for _ in 0..8 {
            let dicts = self
                .subfonts
                .iter()
                .map(|sf| dict::encode_dict(sf, &self.strings))
                .collect::<FontResult<Vec<_>>>()?;

            let mut pos = (self.header_size as usize).max(4);
            pos += index::encoded_len(
                self.name_offset_size,
                self.font_names.iter().map(String::as_bytes),
            );
            pos += index::encoded_len(self.dict_offset_size, dicts.iter().map(Vec::as_slice));
            pos += index::encoded_len(self.string_offset_size, self.strings.font_strings());
            pos += self.global_subrs.encoded_len();

            let mut changed = false;
            let mut bump = |field: &mut usize, pos: usize| {
                if *field != pos {
                    *field = pos;
                    changed = true;
                }
            };

            for sf in &mut self.subfonts {
                if matches!(sf.charset, Charset::Sids(_)) {
                    bump(&mut sf.charset_offset, pos);
                    pos += sf.charset.encoded_len();
                }
                if let Some(encoding) = &sf.encoding {
                    bump(&mut sf.encoding_offset, pos);
                    pos += encoding.encoded_len();
                }

                bump(&mut sf.charstrings_offset, pos);
                pos += sf.charstrings.encoded_len();

                sf.private_size = sf.private_dict.len();
                bump(&mut sf.private_offset, pos);
                pos += sf.private_size;

                if sf.subrs_offset != 0 {
                    // the Subrs operand lives inside the raw private DICT
                    // and is not rewritten, so the INDEX has to land at
                    // exactly the offset it already names
                    if sf.subrs_offset != sf.private_size {
                        anyhow::bail!(FontError::IntegrityViolation(format!(
                            "local subrs at private + {}, expected private + {}",
                            sf.subrs_offset, sf.private_size
                        )));
                    }
                    pos += sf.local_subrs.encoded_len();
                }
            }

            if !changed {
                log::trace!("CFF layout stable at {} bytes", pos);
                return Ok(());
            }
        }

        anyhow::bail!(FontError::IntegrityViolation(
            "CFF section offsets failed to converge".into()
        ))
    }
}

#[cfg(test)]
mod test {
    use crate::cff::{Charset, CffFont};

    // A handmade single-subfont file laid out exactly the way the writer
    // lays sections out, so that parse -> write reproduces it byte for
    // byte: header, name INDEX ("Sub"), top DICT INDEX, string INDEX
    // ("1.000"), empty global subr INDEX, charset at 39, charstrings at 44
    // (.notdef + two endchar glyphs), private DICT at 54, local subrs.
    fn synthetic_font() -> Vec<u8> {
        let mut font = vec![0x01, 0x00, 0x04, 0x01];

        // name INDEX
        font.extend_from_slice(&[0x00, 0x01, 0x01, 0x01, 0x04, b'S', b'u', b'b']);

        // top DICT INDEX: version SID 391, charset 39, charstrings 44,
        // private [4, 54]
        font.extend_from_slice(&[0x00, 0x01, 0x01, 0x01, 0x0b]);
        font.extend_from_slice(&[0xf8, 0x1b, 0x00]);
        font.extend_from_slice(&[39 + 139, 15]);
        font.extend_from_slice(&[44 + 139, 17]);
        font.extend_from_slice(&[4 + 139, 54 + 139, 18]);

        // string INDEX: "1.000"
        font.extend_from_slice(&[0x00, 0x01, 0x01, 0x01, 0x06, b'1', b'.', b'0', b'0', b'0']);

        // global subr INDEX: empty
        font.extend_from_slice(&[0x00, 0x00]);

        // charset: format 0, SIDs for glyphs 1 and 2
        assert_eq!(font.len(), 39);
        font.extend_from_slice(&[0x00, 0x00, 0x01, 0x00, 0x02]);

        // charstrings: three one-byte endchar programs
        assert_eq!(font.len(), 44);
        font.extend_from_slice(&[0x00, 0x03, 0x01, 0x01, 0x02, 0x03, 0x04, 0x0e, 0x0e, 0x0e]);

        // private DICT: Subrs offset 4, defaultWidthX 0
        assert_eq!(font.len(), 54);
        font.extend_from_slice(&[4 + 139, 19, 139, 20]);

        // local subrs at 54 + 4: one entry
        font.extend_from_slice(&[0x00, 0x01, 0x01, 0x01, 0x02, 0x0e]);

        font
    }

    #[test]
    fn parses_synthetic_font() {
        let data = synthetic_font();
        let font = CffFont::parse(&data).unwrap();

        assert_eq!(font.font_names, vec!["Sub"]);
        assert_eq!(font.subfonts.len(), 1);

        let sf = &font.subfonts[0];
        assert_eq!(sf.version.as_deref(), Some("1.000"));
        assert_eq!(sf.num_glyphs(), 3);
        assert_eq!(sf.charstrings_offset, 44);
        assert_eq!(sf.private_offset, 54);
        assert_eq!(sf.subrs_offset, 4);
        assert_eq!(sf.local_subrs.len(), 1);
        match &sf.charset {
            Charset::Sids(sids) => assert_eq!(sids, &[0, 1, 2]),
            _ => panic!("expected explicit charset"),
        }
    }

    #[test]
    fn rewriting_an_unmodified_font_is_byte_exact() {
        let data = synthetic_font();
        let mut font = CffFont::parse(&data).unwrap();

        let mut out = Vec::new();
        font.write(&mut out).unwrap();

        assert_eq!(out, data);
    }

    #[test]
    fn offsets_track_section_starts() {
        let data = synthetic_font();
        let mut font = CffFont::parse(&data).unwrap();

        // move the charstrings by growing the string table, then check the
        // rewritten layout is self-consistent
        font.strings.register("Extra");
        let mut out = Vec::new();
        font.write(&mut out).unwrap();
        assert_ne!(out, data);

        let reparsed = CffFont::parse(&out).unwrap();
        let sf = &reparsed.subfonts[0];
        assert_eq!(sf.num_glyphs(), 3);
        assert_eq!(sf.local_subrs.len(), 1);
        assert_eq!(sf.version.as_deref(), Some("1.000"));
        assert_eq!(
            sf.private_dict,
            font.subfonts[0].private_dict,
        );
    }

    #[test]
    fn subset_records_live_subrs() {
        // reshape the charstrings INDEX so glyph 1 is the two-byte program
        // [push -107, callsubr], which selects local subr 0
        let mut data = synthetic_font();
        data[48] = 0x01;
        data[51] = 0x20;
        data[52] = 0x0a;

        let mut font = CffFont::parse(&data).unwrap();
        font.subset(&[1]);

        let used = &font.subfonts[0].used_subrs;
        assert_eq!(used.local.iter().copied().collect::<Vec<_>>(), vec![0]);
        assert!(used.global.is_empty());
    }
}
