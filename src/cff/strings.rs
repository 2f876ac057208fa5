use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{FontError, FontResult};

/// The 391 standard strings every CFF font shares. SIDs below
/// `STANDARD_STRINGS.len()` resolve here; everything above indexes the
/// font's own string INDEX.
pub(crate) const STANDARD_STRINGS: [&str; 391] = [
    ".notdef", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quoteright", "parenleft", "parenright",
    "asterisk", "plus", "comma", "hyphen", "period", "slash", "zero", "one",
    "two", "three", "four", "five", "six", "seven", "eight", "nine", "colon",
    "semicolon", "less", "equal", "greater", "question", "at", "A", "B", "C",
    "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q",
    "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "bracketleft", "backslash",
    "bracketright", "asciicircum", "underscore", "quoteleft", "a", "b", "c",
    "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q",
    "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar",
    "braceright", "asciitilde", "exclamdown", "cent", "sterling", "fraction",
    "yen", "florin", "section", "currency", "quotesingle", "quotedblleft",
    "guillemotleft", "guilsinglleft", "guilsinglright", "fi", "fl", "endash",
    "dagger", "daggerdbl", "periodcentered", "paragraph", "bullet",
    "quotesinglbase", "quotedblbase", "quotedblright", "guillemotright",
    "ellipsis", "perthousand", "questiondown", "grave", "acute",
    "circumflex", "tilde", "macron", "breve", "dotaccent", "dieresis",
    "ring", "cedilla", "hungarumlaut", "ogonek", "caron", "emdash", "AE",
    "ordfeminine", "Lslash", "Oslash", "OE", "ordmasculine", "ae",
    "dotlessi", "lslash", "oslash", "oe", "germandbls", "onesuperior",
    "logicalnot", "mu", "trademark", "Eth", "onehalf", "plusminus", "Thorn",
    "onequarter", "divide", "brokenbar", "degree", "thorn", "threequarters",
    "twosuperior", "registered", "minus", "eth", "multiply", "threesuperior",
    "copyright", "Aacute", "Acircumflex", "Adieresis", "Agrave", "Aring",
    "Atilde", "Ccedilla", "Eacute", "Ecircumflex", "Edieresis", "Egrave",
    "Iacute", "Icircumflex", "Idieresis", "Igrave", "Ntilde", "Oacute",
    "Ocircumflex", "Odieresis", "Ograve", "Otilde", "Scaron", "Uacute",
    "Ucircumflex", "Udieresis", "Ugrave", "Yacute", "Ydieresis", "Zcaron",
    "aacute", "acircumflex", "adieresis", "agrave", "aring", "atilde",
    "ccedilla", "eacute", "ecircumflex", "edieresis", "egrave", "iacute",
    "icircumflex", "idieresis", "igrave", "ntilde", "oacute", "ocircumflex",
    "odieresis", "ograve", "otilde", "scaron", "uacute", "ucircumflex",
    "udieresis", "ugrave", "yacute", "ydieresis", "zcaron", "exclamsmall",
    "Hungarumlautsmall", "dollaroldstyle", "dollarsuperior",
    "ampersandsmall", "Acutesmall", "parenleftsuperior",
    "parenrightsuperior", "twodotenleader", "onedotenleader", "zerooldstyle",
    "oneoldstyle", "twooldstyle", "threeoldstyle", "fouroldstyle",
    "fiveoldstyle", "sixoldstyle", "sevenoldstyle", "eightoldstyle",
    "nineoldstyle", "commasuperior", "threequartersemdash", "periodsuperior",
    "questionsmall", "asuperior", "bsuperior", "centsuperior", "dsuperior",
    "esuperior", "isuperior", "lsuperior", "msuperior", "nsuperior",
    "osuperior", "rsuperior", "ssuperior", "tsuperior", "ff", "ffi", "ffl",
    "parenleftinferior", "parenrightinferior", "Circumflexsmall",
    "hyphensuperior", "Gravesmall", "Asmall", "Bsmall", "Csmall", "Dsmall",
    "Esmall", "Fsmall", "Gsmall", "Hsmall", "Ismall", "Jsmall", "Ksmall",
    "Lsmall", "Msmall", "Nsmall", "Osmall", "Psmall", "Qsmall", "Rsmall",
    "Ssmall", "Tsmall", "Usmall", "Vsmall", "Wsmall", "Xsmall", "Ysmall",
    "Zsmall", "colonmonetary", "onefitted", "rupiah", "Tildesmall",
    "exclamdownsmall", "centoldstyle", "Lslashsmall", "Scaronsmall",
    "Zcaronsmall", "Dieresissmall", "Brevesmall", "Caronsmall",
    "Dotaccentsmall", "Macronsmall", "figuredash", "hypheninferior",
    "Ogoneksmall", "Ringsmall", "Cedillasmall", "questiondownsmall",
    "oneeighth", "threeeighths", "fiveeighths", "seveneighths", "onethird",
    "twothirds", "zerosuperior", "foursuperior", "fivesuperior",
    "sixsuperior", "sevensuperior", "eightsuperior", "ninesuperior",
    "zeroinferior", "oneinferior", "twoinferior", "threeinferior",
    "fourinferior", "fiveinferior", "sixinferior", "seveninferior",
    "eightinferior", "nineinferior", "centinferior", "dollarinferior",
    "periodinferior", "commainferior", "Agravesmall", "Aacutesmall",
    "Acircumflexsmall", "Atildesmall", "Adieresissmall", "Aringsmall",
    "AEsmall", "Ccedillasmall", "Egravesmall", "Eacutesmall",
    "Ecircumflexsmall", "Edieresissmall", "Igravesmall", "Iacutesmall",
    "Icircumflexsmall", "Idieresissmall", "Ethsmall", "Ntildesmall",
    "Ogravesmall", "Oacutesmall", "Ocircumflexsmall", "Otildesmall",
    "Odieresissmall", "OEsmall", "Oslashsmall", "Ugravesmall", "Uacutesmall",
    "Ucircumflexsmall", "Udieresissmall", "Yacutesmall", "Thornsmall",
    "Ydieresissmall", "001.000", "001.001", "001.002", "001.003", "Black",
    "Bold", "Book", "Light", "Medium", "Regular", "Roman", "Semibold",];

static STANDARD_STRING_SIDS: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    STANDARD_STRINGS
        .iter()
        .enumerate()
        .map(|(sid, s)| (*s, sid as u16))
        .collect()
});

/// Combined string table: the predefined strings followed by the font's own
/// string INDEX entries. The reverse map backs the encoder, which may only
/// emit SIDs that resolve here.
#[derive(Debug, Default)]
pub(crate) struct StringTable {
    strings: Vec<String>,
    string_to_sid: HashMap<String, u16>,
}

impl StringTable {
    pub fn new(font_strings: impl IntoIterator<Item = String>) -> Self {
        let mut table = StringTable {
            strings: STANDARD_STRINGS.iter().map(|s| s.to_string()).collect(),
            string_to_sid: HashMap::new(),
        };

        for s in font_strings {
            table.strings.push(s);
        }

        for (sid, s) in table.strings.iter().enumerate().skip(STANDARD_STRINGS.len()) {
            table.string_to_sid.insert(s.clone(), sid as u16);
        }

        table
    }

    pub fn get(&self, sid: u16) -> FontResult<&str> {
        self.strings
            .get(sid as usize)
            .map(String::as_str)
            .ok_or_else(|| {
                FontError::IntegrityViolation(format!("SID {} has no string", sid)).into()
            })
    }

    pub fn sid(&self, s: &str) -> FontResult<u16> {
        if let Some(&sid) = STANDARD_STRING_SIDS.get(s) {
            return Ok(sid);
        }

        self.string_to_sid.get(s).copied().ok_or_else(|| {
            FontError::IntegrityViolation(format!("string {:?} is not registered", s)).into()
        })
    }

    /// Registers a string, returning its SID. No-op for strings already
    /// present.
    pub fn register(&mut self, s: &str) -> u16 {
        if let Ok(sid) = self.sid(s) {
            return sid;
        }

        let sid = self.strings.len() as u16;
        self.strings.push(s.to_string());
        self.string_to_sid.insert(s.to_string(), sid);
        sid
    }

    /// The strings that belong to the font itself, in SID order.
    pub fn font_strings(&self) -> impl ExactSizeIterator<Item = &[u8]> + Clone {
        self.strings[STANDARD_STRINGS.len()..]
            .iter()
            .map(|s| s.as_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn predefined_bounds() {
        let table = StringTable::new(["Custom".to_string()]);

        assert_eq!(table.get(0).unwrap(), ".notdef");
        assert_eq!(table.get(390).unwrap(), "Semibold");
        assert_eq!(table.get(391).unwrap(), "Custom");
        assert!(table.get(392).is_err());
    }

    #[test]
    fn reverse_lookup() {
        let mut table = StringTable::new(["Custom".to_string()]);

        assert_eq!(table.sid("space").unwrap(), 1);
        assert_eq!(table.sid("Custom").unwrap(), 391);
        assert!(table.sid("missing").is_err());
        assert_eq!(table.register("missing"), 392);
        assert_eq!(table.sid("missing").unwrap(), 392);
    }
}
