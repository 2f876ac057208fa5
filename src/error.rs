use thiserror::Error;

/// Errors surfaced while parsing or re-encoding a font.
///
/// All fallible paths return these through [`anyhow::Error`] so callers can
/// attach context; no partially-built model escapes once an error has been
/// reported.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("unexpected end of input")]
    TruncatedInput,

    #[error("seek to {pos} is outside a buffer of {len} bytes")]
    SeekOutOfRange { pos: usize, len: usize },

    #[error("unsupported {what} format {format}")]
    UnsupportedFormat { what: &'static str, format: u32 },

    #[error("unrecognized DICT operator {op}")]
    UnknownOperator { op: String },

    #[error("operand stack underflow")]
    StackUnderflow,

    #[error("offset {offset} is outside the enclosing table of {len} bytes")]
    InvalidOffset { offset: usize, len: usize },

    #[error("{0}")]
    IntegrityViolation(String),

    #[error("unknown sfnt magic {0:#010x}")]
    UnknownMagic(u32),
}

pub type FontResult<T> = anyhow::Result<T>;
