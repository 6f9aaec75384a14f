use inx_nls::TextDecoder;
use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::Result;

use super::field::{decode_field, FieldDef};

/// A user-defined type. Its position in the table is the id `Struct` fields refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDef {
    pub offset: usize,
    pub fields: Vec<FieldDef>,
}

/// A struct declaration.
///
/// The two `preamble` values sit between the field count and the fields.
/// Their meaning is unknown; they are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDef {
    pub offset: usize,
    pub preamble: [u16; 2],
    pub fields: Vec<FieldDef>,
}

fn decode_fields(
    cursor: &mut Cursor<'_>,
    count: u16,
    nls: &dyn TextDecoder,
) -> Result<Vec<FieldDef>> {
    // capacity is bounded by what the buffer could possibly hold
    let mut fields = Vec::with_capacity((count as usize).min(cursor.remaining() / 3));
    for _ in 0..count {
        fields.push(decode_field(cursor, nls)?);
    }
    Ok(fields)
}

/// Layout (little-endian):
/// - u16 type_count
///   repeated type_count:
///     - u16 field_count
///     - [field_count] fields
pub fn decode_type_table(bytes: &[u8], offset: usize, nls: &dyn TextDecoder) -> Result<Vec<TypeDef>> {
    let mut cursor = Cursor::at(bytes, offset)?;
    let count = cursor.read_u16()?;
    log::debug!("types: {} record(s) at 0x{:X}", count, offset);

    let mut types = Vec::with_capacity((count as usize).min(cursor.remaining() / 2));
    for i in 0..count {
        let start = cursor.offset();
        log::trace!("type_{:03} at 0x{:X}", i, start);
        let field_count = cursor.read_u16()?;
        let fields = decode_fields(&mut cursor, field_count, nls)?;
        types.push(TypeDef {
            offset: start,
            fields,
        });
    }
    Ok(types)
}

/// Layout (little-endian):
/// - u16 struct_count
///   repeated struct_count:
///     - u16 field_count
///     - u16, u16 (opaque)
///     - [field_count] fields
pub fn decode_struct_table(
    bytes: &[u8],
    offset: usize,
    nls: &dyn TextDecoder,
) -> Result<Vec<StructDef>> {
    let mut cursor = Cursor::at(bytes, offset)?;
    let count = cursor.read_u16()?;
    log::debug!("structs: {} record(s) at 0x{:X}", count, offset);

    let mut structs = Vec::with_capacity((count as usize).min(cursor.remaining() / 6));
    for i in 0..count {
        let start = cursor.offset();
        let field_count = cursor.read_u16()?;
        let preamble = [cursor.read_u16()?, cursor.read_u16()?];
        log::trace!(
            "struc_{} at 0x{:X}: preamble {} (0x{:02x}), {} (0x{:02x})",
            i,
            start,
            preamble[0],
            preamble[0],
            preamble[1],
            preamble[1]
        );
        let fields = decode_fields(&mut cursor, field_count, nls)?;
        structs.push(StructDef {
            offset: start,
            preamble,
            fields,
        });
    }
    Ok(structs)
}
