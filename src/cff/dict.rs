use crate::{
    cff::{strings::StringTable, Subfont},
    error::{FontError, FontResult},
    parse_binary::BinaryParser,
};

/// Walks DICT data, interpreting number pushes and assigning operands to
/// subfont fields as each operator byte arrives.
///
/// Top and private DICTs share one operator space: the private DICT is
/// re-run through the same interpreter once its bytes have been located.
pub(super) struct DictParser<'a> {
    buffer: &'a [u8],
    cursor: usize,
    operands: Vec<i32>,
    operands_f: Vec<f64>,
}

impl<'a> DictParser<'a> {
    pub fn parse_into(
        dict: &'a [u8],
        subfont: &mut Subfont,
        strings: &StringTable,
    ) -> FontResult<()> {
        let mut p = DictParser {
            buffer: dict,
            cursor: 0,
            operands: Vec::with_capacity(48),
            operands_f: Vec::with_capacity(48),
        };

        while p.peek().is_some() {
            let b0 = p.next()?;
            match b0 {
                28 => {
                    let n = p.parse_i16()?;
                    p.operands.push(n as i32);
                    continue;
                }
                29 => {
                    let n = p.parse_i32()?;
                    p.operands.push(n);
                    continue;
                }
                30 => {
                    let n = p.parse_real()?;
                    p.operands_f.push(n);
                    continue;
                }
                32..=246 => {
                    p.operands.push(b0 as i32 - 139);
                    continue;
                }
                247..=250 => {
                    let b1 = p.next()?;
                    p.operands.push((b0 as i32 - 247) * 256 + b1 as i32 + 108);
                    continue;
                }
                251..=254 => {
                    let b1 = p.next()?;
                    p.operands.push(-(b0 as i32 - 251) * 256 - b1 as i32 - 108);
                    continue;
                }
                _ => {}
            }

            p.apply_operator(b0, subfont, strings)?;
            p.operands.clear();
            p.operands_f.clear();
        }

        Ok(())
    }

    fn apply_operator(
        &mut self,
        b0: u8,
        f: &mut Subfont,
        strings: &StringTable,
    ) -> FontResult<()> {
        match b0 {
            0 => f.version = Some(self.string(strings)?),
            1 => f.notice = Some(self.string(strings)?),
            2 => f.fullname = Some(self.string(strings)?),
            3 => f.familyname = Some(self.string(strings)?),
            4 => f.weight = Some(self.string(strings)?),
            5 => f.bbox = self.bbox()?,
            6 => f.blue_values = self.deltas(),
            7 => f.other_blues = self.deltas(),
            8 => f.family_blues = self.deltas(),
            9 => f.family_other_blues = self.deltas(),
            10 => f.std_hw = Some(self.int(0)?),
            11 => f.std_vw = Some(self.int(0)?),
            12 => {
                let b1 = self.next()?;
                self.apply_escaped_operator(b1, f, strings)?;
            }
            13 => f.unique_id = Some(self.int(0)?),
            14 => f.xuid = Some(self.operands.clone()),
            15 => f.charset_offset = self.offset(0)?,
            16 => f.encoding_offset = self.offset(0)?,
            17 => f.charstrings_offset = self.offset(0)?,
            18 => {
                f.private_size = self.offset(0)?;
                f.private_offset = self.offset(1)?;
            }
            19 => f.subrs_offset = self.offset(0)?,
            20 => f.default_width_x = self.int(0)?,
            21 => f.nominal_width_x = self.int(0)?,
            _ => anyhow::bail!(FontError::UnknownOperator { op: b0.to_string() }),
        }

        Ok(())
    }

    fn apply_escaped_operator(
        &mut self,
        b1: u8,
        f: &mut Subfont,
        strings: &StringTable,
    ) -> FontResult<()> {
        match b1 {
            0 => f.copyright = Some(self.string(strings)?),
            1 => f.is_fixed_pitch = self.int(0)? != 0,
            2 => f.italic_angle = self.num()?,
            3 => f.underline_position = self.num()?,
            4 => f.underline_thickness = self.num()?,
            5 => f.paint_type = self.num()?,
            6 => f.charstring_type = self.int(0)?,
            7 => f.font_matrix = Some(self.operands_f.clone()),
            8 => f.stroke_width = self.num()?,
            9 => f.blue_scale = self.num()?,
            10 => f.blue_shift = self.int(0)?,
            11 => f.blue_fuzz = self.int(0)?,
            12 => f.stem_snap_h = self.deltas(),
            13 => f.stem_snap_v = self.deltas(),
            19 => f.initial_random_seed = self.int(0)?,
            20 => f.synthetic_base = Some(self.int(0)?),
            30 => {
                f.registry = Some(self.string_at(0, strings)?);
                f.ordering = Some(self.string_at(1, strings)?);
                f.supplement = self.int(2)?;
            }
            34 => f.cid_count = self.int(0)?,
            36 => f.fd_array = self.offset(0)?,
            37 => f.fd_select = self.offset(0)?,
            38 => f.fontname = Some(self.string(strings)?),
            _ => anyhow::bail!(FontError::UnknownOperator {
                op: format!("12 {}", b1),
            }),
        }

        Ok(())
    }

    fn int(&self, idx: usize) -> FontResult<i32> {
        self.operands
            .get(idx)
            .copied()
            .ok_or(FontError::StackUnderflow.into())
    }

    fn offset(&self, idx: usize) -> FontResult<usize> {
        usize::try_from(self.int(idx)?).map_err(|_| {
            FontError::IntegrityViolation("negative offset operand".into()).into()
        })
    }

    /// The first operand on either stack; operators like underlinePosition
    /// may be encoded integral or real.
    fn num(&self) -> FontResult<f64> {
        if let Some(&n) = self.operands.first() {
            return Ok(n as f64);
        }

        self.operands_f
            .first()
            .copied()
            .ok_or(FontError::StackUnderflow.into())
    }

    fn string(&self, strings: &StringTable) -> FontResult<String> {
        self.string_at(0, strings)
    }

    fn string_at(&self, idx: usize, strings: &StringTable) -> FontResult<String> {
        let sid = u16::try_from(self.int(idx)?)
            .map_err(|_| FontError::IntegrityViolation("negative SID operand".into()))?;

        Ok(strings.get(sid)?.to_string())
    }

    fn bbox(&self) -> FontResult<[i32; 4]> {
        <[i32; 4]>::try_from(self.operands.as_slice()).map_err(|_| {
            FontError::IntegrityViolation(format!(
                "fontBBox takes 4 operands, found {}",
                self.operands.len()
            ))
            .into()
        })
    }

    /// Array operands are stored delta-encoded; callers see absolute values.
    fn deltas(&self) -> Vec<i32> {
        let mut prev = 0;
        self.operands
            .iter()
            .map(|&d| {
                prev += d;
                prev
            })
            .collect()
    }

    /// Real number: a nibble stream of digits, decimal point, exponent
    /// markers and a mantissa sign, terminated by 0xF.
    fn parse_real(&mut self) -> FontResult<f64> {
        #[derive(PartialEq)]
        enum Mode {
            Before,
            After,
            Exponent,
        }

        let mut int_part = 0i64;
        let mut frac_part = 0i64;
        let mut frac_digits = 0u32;
        let mut exponent = 0i32;
        let mut exponent_sign = 1i32;
        let mut negative = false;
        let mut mode = Mode::Before;

        'stream: loop {
            let byte = self.next()?;
            for nibble in [byte >> 4, byte & 0xf] {
                match nibble {
                    0x0..=0x9 => match mode {
                        Mode::Before => int_part = 10 * int_part + nibble as i64,
                        Mode::After => {
                            frac_part = 10 * frac_part + nibble as i64;
                            frac_digits += 1;
                        }
                        Mode::Exponent => exponent = 10 * exponent + nibble as i32,
                    },
                    0xa => mode = Mode::After,
                    0xb => mode = Mode::Exponent,
                    0xc => {
                        mode = Mode::Exponent;
                        exponent_sign = -1;
                    }
                    0xe => negative = true,
                    0xf => break 'stream,
                    _ => anyhow::bail!(FontError::IntegrityViolation(format!(
                        "invalid real-number nibble {:#x}",
                        nibble
                    ))),
                }
            }
        }

        let mut value = int_part as f64 + frac_part as f64 / 10f64.powi(frac_digits as i32);
        if negative {
            value = -value;
        }

        Ok(value * 10f64.powi(exponent * exponent_sign))
    }
}

impl BinaryParser for DictParser<'_> {
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

/// Shortest-form DICT integer encoding.
pub(crate) fn encode_number(num: i32) -> Vec<u8> {
    if (-107..=107).contains(&num) {
        vec![(num + 139) as u8]
    } else if (108..=1131).contains(&num) {
        let v = num - 108;
        vec![(247 + (v >> 8)) as u8, (v & 0xff) as u8]
    } else if (-1131..=-108).contains(&num) {
        let v = -num - 108;
        vec![(251 + (v >> 8)) as u8, (v & 0xff) as u8]
    } else if (-32768..=32767).contains(&num) {
        let b = (num as i16).to_be_bytes();
        vec![28, b[0], b[1]]
    } else {
        let b = num.to_be_bytes();
        vec![29, b[0], b[1], b[2], b[3]]
    }
}

/// DICT real-number encoding. Integral values fall through to the integer
/// encoder; everything else is rendered as a nibble stream.
pub(crate) fn encode_float(num: f64) -> Vec<u8> {
    if (num - num.trunc()).abs() < 1e-4 {
        return encode_number(num.trunc() as i32);
    }

    let sci = format!("{:e}", num);
    let rendered = match sci.split_once('e') {
        // for sub-one magnitudes the positional rendering is used whenever
        // it is no longer than the scientific one
        Some((mantissa, exp)) if exp.starts_with('-') => {
            let shift: usize = exp[1..].parse().unwrap_or(0);
            let (sign, digits) = match mantissa.strip_prefix('-') {
                Some(rest) => ("-", rest),
                None => ("", mantissa),
            };
            let digits: String = digits.chars().filter(|c| *c != '.').collect();
            let plain = format!("{}0.{}{}", sign, "0".repeat(shift.saturating_sub(1)), digits);

            if plain.len() <= sci.len() - 1 {
                plain
            } else {
                sci
            }
        }
        _ => sci,
    };

    let mut nibbles = to_nibbles(&rendered);
    nibbles.push(0xf);
    if nibbles.len() % 2 != 0 {
        nibbles.push(0xf);
    }

    let mut out = vec![30];
    for pair in nibbles.chunks_exact(2) {
        out.push((pair[0] << 4) | pair[1]);
    }

    out
}

fn to_nibbles(s: &str) -> Vec<u8> {
    let mut nibbles = Vec::new();
    let mut mantissa_sign = true;

    for c in s.chars() {
        match c {
            '-' if mantissa_sign => nibbles.push(0xe),
            '-' => *nibbles.last_mut().expect("exponent marker precedes sign") = 0xc,
            '+' => {}
            '.' => {
                nibbles.push(0xa);
                mantissa_sign = false;
            }
            'e' => {
                nibbles.push(0xb);
                mantissa_sign = false;
            }
            '0'..='9' => nibbles.push(c as u8 - b'0'),
            _ => unreachable!("unexpected character in rendered float"),
        }
    }

    nibbles
}

/// Encodes a subfont's top DICT: non-default values only, in a fixed
/// operator order.
pub(super) fn encode_dict(f: &Subfont, strings: &StringTable) -> FontResult<Vec<u8>> {
    let mut b = Vec::new();

    let push_sid = |b: &mut Vec<u8>, s: &Option<String>, op: u8| -> FontResult<()> {
        if let Some(s) = s {
            b.extend_from_slice(&encode_number(strings.sid(s)? as i32));
            b.push(op);
        }
        Ok(())
    };

    push_sid(&mut b, &f.version, 0)?;
    push_sid(&mut b, &f.notice, 1)?;
    push_sid(&mut b, &f.fullname, 2)?;
    push_sid(&mut b, &f.familyname, 3)?;
    push_sid(&mut b, &f.weight, 4)?;

    if let Some(uid) = f.unique_id {
        b.extend_from_slice(&encode_number(uid));
        b.push(13);
    }
    if f.bbox != [0; 4] {
        for v in f.bbox {
            b.extend_from_slice(&encode_number(v));
        }
        b.push(5);
    }
    if f.underline_position != -100.0 {
        b.extend_from_slice(&encode_float(f.underline_position));
        b.extend_from_slice(&[12, 3]);
    }
    if f.underline_thickness != 50.0 {
        b.extend_from_slice(&encode_float(f.underline_thickness));
        b.extend_from_slice(&[12, 4]);
    }

    let push_offset = |b: &mut Vec<u8>, offset: usize, op: u8| -> FontResult<()> {
        if offset != 0 {
            let offset = i32::try_from(offset)
                .map_err(|_| FontError::InvalidOffset { offset, len: i32::MAX as usize })?;
            b.extend_from_slice(&encode_number(offset));
            b.push(op);
        }
        Ok(())
    };

    push_offset(&mut b, f.charset_offset, 15)?;
    push_offset(&mut b, f.encoding_offset, 16)?;
    push_offset(&mut b, f.charstrings_offset, 17)?;

    if f.private_offset != 0 {
        b.extend_from_slice(&encode_number(f.private_size as i32));
        push_offset(&mut b, f.private_offset, 18)?;
    }

    Ok(b)
}
