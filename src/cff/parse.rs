use crate::{
    cff::{
        dict::DictParser, strings::StringTable, Charset, CffEncoding, CffFont, CffIndex, Subfont,
    },
    error::{FontError, FontResult},
    parse_binary::BinaryParser,
};

pub(crate) struct CffParser<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> CffParser<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Borrows the next `n` bytes out of the underlying table.
    pub fn take(&mut self, n: usize) -> FontResult<&'a [u8]> {
        let start = self.cursor;
        let end = start.checked_add(n).ok_or(FontError::TruncatedInput)?;
        let data = self
            .buffer
            .get(start..end)
            .ok_or(FontError::TruncatedInput)?;
        self.cursor = end;

        Ok(data)
    }
}

impl BinaryParser for CffParser<'_> {
    fn buffer(&self) -> &[u8] {
        self.buffer
    }
    fn cursor(&self) -> usize {
        self.cursor
    }
    fn cursor_mut(&mut self) -> &mut usize {
        &mut self.cursor
    }
}

impl<'a> CffFont<'a> {
    /// Parses a CFF table. All offsets inside the data are relative to the
    /// start of `data`, which must therefore be exactly the table contents.
    pub fn parse(data: &'a [u8]) -> FontResult<CffFont<'a>> {
        let mut p = CffParser::new(data);

        let major = p.next()?;
        let minor = p.next()?;
        let header_size = p.next()?;
        let offset_size = p.next()?;
        p.seek(header_size as usize)?;

        let name_index = CffIndex::parse(&mut p)?;
        let font_names: Vec<String> = name_index
            .items
            .iter()
            .map(|entry| String::from_utf8_lossy(entry).into_owned())
            .collect();
        log::trace!("CFF name index: {:?}", font_names);

        let dict_index = CffIndex::parse(&mut p)?;
        let string_index = CffIndex::parse(&mut p)?;
        let strings = StringTable::new(
            string_index
                .items
                .iter()
                .map(|entry| String::from_utf8_lossy(entry).into_owned()),
        );
        let global_subrs = CffIndex::parse(&mut p)?;
        log::trace!("CFF global subr index: {} entries", global_subrs.len());

        let mut subfonts = Vec::with_capacity(dict_index.len());
        for (i, dict) in dict_index.items.iter().enumerate() {
            let mut subfont = Subfont {
                name: font_names.get(i).cloned().unwrap_or_default(),
                ..Subfont::default()
            };
            DictParser::parse_into(dict, &mut subfont, &strings)?;

            read_subfont_data(&mut p, &mut subfont, &strings)?;
            subfonts.push(subfont);
        }

        Ok(CffFont {
            major,
            minor,
            header_size,
            offset_size,
            font_names,
            strings,
            global_subrs,
            subfonts,
            name_offset_size: name_index.offset_size,
            dict_offset_size: dict_index.offset_size,
            string_offset_size: string_index.offset_size,
        })
    }
}

fn read_subfont_data<'a>(
    p: &mut CffParser<'a>,
    subfont: &mut Subfont<'a>,
    strings: &StringTable,
) -> FontResult<()> {
    // offsets 0 and 1 select predefined encodings, which carry no table
    if subfont.encoding_offset > 1 {
        p.seek(subfont.encoding_offset)?;
        subfont.encoding = CffEncoding::parse(p)?;

        // a range-coded encoding is consumed but not retained; drop the
        // offset too so the re-encoded dict does not point at a section
        // the writer never emits
        if subfont.encoding.is_none() {
            subfont.encoding_offset = 0;
        }
    }

    if subfont.charstrings_offset == 0 {
        anyhow::bail!(FontError::IntegrityViolation(
            "top DICT carries no CharStrings offset".into()
        ));
    }
    p.seek(subfont.charstrings_offset)?;
    subfont.charstrings = CffIndex::parse(p)?;
    log::trace!(
        "subfont {:?}: {} charstrings",
        subfont.name,
        subfont.charstrings.len()
    );

    subfont.charset = match Charset::predefined(subfont.charset_offset) {
        Some(charset) => charset,
        None => {
            p.seek(subfont.charset_offset)?;
            Charset::parse(p, subfont.num_glyphs(), subfont.is_cid_font())?
        }
    };

    if subfont.private_offset != 0 {
        p.seek(subfont.private_offset)?;
        subfont.private_dict = p.take(subfont.private_size)?;
        DictParser::parse_into(subfont.private_dict, subfont, strings)?;
    }

    if subfont.subrs_offset != 0 {
        p.seek(subfont.private_offset + subfont.subrs_offset)?;
        subfont.local_subrs = CffIndex::parse(p)?;
        log::trace!(
            "subfont {:?}: {} local subrs",
            subfont.name,
            subfont.local_subrs.len()
        );
    }

    Ok(())
}
