use serde::Serialize;

/// Which top-level table a header offset points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableKind {
    Types,
    Structs,
    Functions,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Types => write!(f, "types"),
            TableKind::Structs => write!(f, "structs"),
            TableKind::Functions => write!(f, "functions"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InxError {
    #[error("out of bounds: wanted {wanted} byte(s) at 0x{offset:X}, buffer_len=0x{len:X}")]
    OutOfBounds { offset: usize, wanted: usize, len: usize },

    #[error("invalid argument type {tag} (discriminator {discriminator}) at 0x{offset:X}")]
    InvalidArgumentType { offset: usize, tag: u8, discriminator: u8 },

    #[error("function #{index} at 0x{offset:X} has unrecognized flags 0x{flags:02X}")]
    MalformedFunctionTable { index: usize, offset: usize, flags: u8 },
}

pub type Result<T> = std::result::Result<T, InxError>;
