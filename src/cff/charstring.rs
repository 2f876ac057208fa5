use std::collections::BTreeSet;

/// Subroutines found live while scanning charstrings. One instance is
/// threaded through a whole scan; there is no module-level state.
#[derive(Debug, Clone, Default)]
pub struct UsedSubrs {
    pub global: BTreeSet<usize>,
    pub local: BTreeSet<usize>,
}

/// The operand bias added to stored subroutine numbers, by INDEX size.
pub(crate) fn bias(subr_count: usize) -> i32 {
    if subr_count < 1240 {
        107
    } else if subr_count < 33900 {
        1131
    } else {
        32768
    }
}

/// Walks a Type-2 charstring and records every global/local subroutine it
/// transitively references.
///
/// Only the opcodes that matter for liveness are interpreted: number pushes,
/// callsubr (10) and callgsubr (29). Every other operator clears the operand
/// stack and is skipped, so stale operands cannot leak into a later call.
/// Subroutines are marked before their bodies are scanned, which bounds the
/// walk even for self-referential subroutines.
pub(crate) fn scan_charstring(
    global_subrs: &[&[u8]],
    local_subrs: &[&[u8]],
    charstring: &[u8],
    used: &mut UsedSubrs,
) {
    let local_bias = bias(local_subrs.len());
    let global_bias = bias(global_subrs.len());

    let mut operands: Vec<i32> = Vec::with_capacity(48);
    let mut pos = 0;

    while pos < charstring.len() {
        let b0 = charstring[pos];
        pos += 1;

        match b0 {
            10 => {
                if let Some(idx) = subr_index(&operands, local_bias, local_subrs.len()) {
                    if used.local.insert(idx) {
                        scan_charstring(global_subrs, local_subrs, local_subrs[idx], used);
                    }
                }
                operands.clear();
            }
            29 => {
                if let Some(idx) = subr_index(&operands, global_bias, global_subrs.len()) {
                    if used.global.insert(idx) {
                        scan_charstring(global_subrs, local_subrs, global_subrs[idx], used);
                    }
                }
                operands.clear();
            }
            32..=246 => operands.push(b0 as i32 - 139),
            247..=250 => {
                let Some(&b1) = charstring.get(pos) else { break };
                pos += 1;
                operands.push((b0 as i32 - 247) * 256 + b1 as i32 + 108);
            }
            251..=254 => {
                let Some(&b1) = charstring.get(pos) else { break };
                pos += 1;
                operands.push(-(b0 as i32 - 251) * 256 - b1 as i32 - 108);
            }
            255 => {
                // 16.16 fixed; the value can never reach a callsubr intact
                pos += 4;
                operands.clear();
            }
            _ => operands.clear(),
        }
    }
}

fn subr_index(operands: &[i32], bias: i32, count: usize) -> Option<usize> {
    let idx = *operands.last()? + bias;
    usize::try_from(idx).ok().filter(|&idx| idx < count)
}
