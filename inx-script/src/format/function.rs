use inx_nls::TextDecoder;
use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::{InxError, Result};

use super::field::{decode_arg, ArgDef, InvalidArg};
use super::tag::TypeTag;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArgList {
    pub args: Vec<ArgDef>,
    /// Arguments skipped because their tag has no by-value/by-reference encoding.
    pub invalid: Vec<InvalidArg>,
}

impl ArgList {
    /// Number of arguments declared in the record, valid or not.
    #[inline]
    pub fn declared(&self) -> usize {
        self.args.len() + self.invalid.len()
    }
}

/// u16 count followed by `count` two-byte argument descriptors.
pub fn decode_arg_list(cursor: &mut Cursor<'_>) -> Result<ArgList> {
    let count = cursor.read_u16()? as usize;
    let mut list = ArgList {
        args: Vec::with_capacity(count.min(cursor.remaining() / 2)),
        invalid: Vec::new(),
    };
    for index in 0..count {
        match decode_arg(cursor) {
            Ok(arg) => list.args.push(arg),
            Err(InxError::InvalidArgumentType {
                offset,
                tag,
                discriminator,
            }) => {
                log::warn!("bad argument #{} at 0x{:X}: tag {}", index, offset, tag);
                list.invalid.push(InvalidArg {
                    index,
                    offset,
                    tag,
                    discriminator,
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(list)
}

/// Record layout selected by the low two bits of the flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionLayout {
    /// Bit 0: imported by module and entry name.
    Module,
    /// Bit 1: entry name plus ordinal.
    Ordinal,
    Unrecognized(u8),
}

impl FunctionLayout {
    pub fn classify(flags: u8) -> Self {
        if flags & 1 != 0 {
            FunctionLayout::Module
        } else if flags & 2 != 0 {
            FunctionLayout::Ordinal
        } else {
            FunctionLayout::Unrecognized(flags)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FunctionDef {
    Module {
        offset: usize,
        flags: u8,
        return_type: TypeTag,
        module: String,
        entry: String,
        reserved: [u8; 2],
        args: ArgList,
    },
    Ordinal {
        offset: usize,
        flags: u8,
        return_type: TypeTag,
        entry: String,
        ordinal: u16,
        args: ArgList,
    },
}

impl FunctionDef {
    pub fn offset(&self) -> usize {
        match self {
            FunctionDef::Module { offset, .. } | FunctionDef::Ordinal { offset, .. } => *offset,
        }
    }

    pub fn flags(&self) -> u8 {
        match self {
            FunctionDef::Module { flags, .. } | FunctionDef::Ordinal { flags, .. } => *flags,
        }
    }

    pub fn return_type(&self) -> TypeTag {
        match self {
            FunctionDef::Module { return_type, .. } | FunctionDef::Ordinal { return_type, .. } => {
                *return_type
            }
        }
    }

    pub fn entry(&self) -> &str {
        match self {
            FunctionDef::Module { entry, .. } | FunctionDef::Ordinal { entry, .. } => entry,
        }
    }

    pub fn args(&self) -> &ArgList {
        match self {
            FunctionDef::Module { args, .. } | FunctionDef::Ordinal { args, .. } => args,
        }
    }
}

/// Decoded function table.
///
/// `malformed` is set when a record with unrecognized flags stopped decoding;
/// `functions` then holds every record before it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionTable {
    pub functions: Vec<FunctionDef>,
    pub malformed: Option<InxError>,
}

impl FunctionTable {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.malformed.is_none()
    }
}

fn decode_module_function(
    cursor: &mut Cursor<'_>,
    nls: &dyn TextDecoder,
) -> Result<FunctionDef> {
    let offset = cursor.offset();
    let flags = cursor.read_u8()?;
    let return_type = TypeTag::from(cursor.read_u8()?);
    let module = cursor.read_string(nls)?;
    let entry = cursor.read_string(nls)?;
    let reserved = cursor.read_array::<2>()?;
    let args = decode_arg_list(cursor)?;
    Ok(FunctionDef::Module {
        offset,
        flags,
        return_type,
        module,
        entry,
        reserved,
        args,
    })
}

fn decode_ordinal_function(
    cursor: &mut Cursor<'_>,
    nls: &dyn TextDecoder,
) -> Result<FunctionDef> {
    let offset = cursor.offset();
    let flags = cursor.read_u8()?;
    let return_type = TypeTag::from(cursor.read_u8()?);
    let entry = cursor.read_string(nls)?;
    let ordinal = cursor.read_u16()?;
    let args = decode_arg_list(cursor)?;
    Ok(FunctionDef::Ordinal {
        offset,
        flags,
        return_type,
        entry,
        ordinal,
        args,
    })
}

/// Layout (little-endian):
/// - u16 count; `count - 1` records follow
///   each record, by flags (peeked, then re-read as part of the record):
///     - bit 0: u8 flags, u8 return, string module, string entry, [2] reserved, args
///     - bit 1: u8 flags, u8 return, string entry, u16 ordinal, args
///
/// The record count really is one less than the stored count, computed in 32
/// bits: a stored 0 wraps to `u32::MAX`, so decoding runs until a record with
/// unrecognized flags or the end of the buffer stops it.
pub fn decode_function_table(
    bytes: &[u8],
    offset: usize,
    nls: &dyn TextDecoder,
) -> Result<FunctionTable> {
    let mut cursor = Cursor::at(bytes, offset)?;
    let count = (cursor.read_u16()? as u32).wrapping_sub(1) as usize;
    log::debug!("functions: {} record(s) at 0x{:X}", count, offset);

    let mut table = FunctionTable {
        functions: Vec::with_capacity(count.min(cursor.remaining() / 4)),
        malformed: None,
    };
    for index in 0..count {
        let start = cursor.offset();
        let flags = cursor.peek_u8()?;
        log::trace!("func_{} at 0x{:X}: flags 0x{:02X}", index, start, flags);

        let func = match FunctionLayout::classify(flags) {
            FunctionLayout::Module => decode_module_function(&mut cursor, nls)?,
            FunctionLayout::Ordinal => decode_ordinal_function(&mut cursor, nls)?,
            FunctionLayout::Unrecognized(flags) => {
                log::warn!(
                    "function #{} at 0x{:X}: unrecognized flags 0x{:02X}, stopping",
                    index,
                    start,
                    flags
                );
                table.malformed = Some(InxError::MalformedFunctionTable {
                    index,
                    offset: start,
                    flags,
                });
                break;
            }
        };
        table.functions.push(func);
    }
    Ok(table)
}
