use inx_nls::TextDecoder;
use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::{InxError, Result, TableKind};
use crate::format::{
    decode_function_table, decode_struct_table, decode_type_table, FunctionTable, Header,
    StructDef, TypeDef,
};

/// Outcome of decoding one top-level table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Section<T> {
    Decoded(T),
    /// Decoding started and hit an error part-way.
    Failed(InxError),
    /// The header offset of this table is out of range; nothing was read.
    Skipped(TableKind, InxError),
    /// Not requested by the caller.
    Omitted,
}

impl<T> Section<T> {
    pub fn decoded(&self) -> Option<&T> {
        match self {
            Section::Decoded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&InxError> {
        match self {
            Section::Failed(e) | Section::Skipped(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Everything decoded from one `.inx` buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InxScript {
    pub header: Header,
    pub types: Section<Vec<TypeDef>>,
    pub structs: Section<Vec<StructDef>>,
    pub functions: Section<FunctionTable>,
}

impl InxScript {
    /// Decode the header and all three tables.
    pub fn decode(bytes: &[u8], nls: &dyn TextDecoder) -> Result<Self> {
        Self::decode_tables(
            bytes,
            nls,
            &[TableKind::Types, TableKind::Structs, TableKind::Functions],
        )
    }

    /// Decode the header and the requested tables.
    ///
    /// Only a header that cannot be read at all is an error here. Each table
    /// is decoded independently and its outcome recorded in its [`Section`].
    pub fn decode_tables(bytes: &[u8], nls: &dyn TextDecoder, tables: &[TableKind]) -> Result<Self> {
        let header = Header::read(&mut Cursor::new(bytes))?;
        log::debug!(
            "header: signature=0x{:08X} version={} size={}",
            header.signature,
            header.version,
            header.header_size
        );

        let types = decode_section(&header, TableKind::Types, bytes, tables, |off| {
            decode_type_table(bytes, off, nls)
        });
        let structs = decode_section(&header, TableKind::Structs, bytes, tables, |off| {
            decode_struct_table(bytes, off, nls)
        });
        let functions = decode_section(&header, TableKind::Functions, bytes, tables, |off| {
            decode_function_table(bytes, off, nls)
        });

        Ok(InxScript {
            header,
            types,
            structs,
            functions,
        })
    }

    /// Type list used to resolve `Struct` field references, if it decoded.
    pub fn type_table(&self) -> &[TypeDef] {
        self.types.decoded().map(Vec::as_slice).unwrap_or(&[])
    }
}

fn decode_section<T>(
    header: &Header,
    table: TableKind,
    bytes: &[u8],
    requested: &[TableKind],
    decode: impl FnOnce(usize) -> Result<T>,
) -> Section<T> {
    if !requested.contains(&table) {
        return Section::Omitted;
    }
    let offset = match header.check_offset(table, bytes.len()) {
        Ok(offset) => offset,
        Err(e) => {
            log::warn!("{} table skipped: {}", table, e);
            return Section::Skipped(table, e);
        }
    };
    match decode(offset) {
        Ok(v) => Section::Decoded(v),
        Err(e) => {
            log::warn!("{} table at 0x{:X} failed: {}", table, offset, e);
            Section::Failed(e)
        }
    }
}
