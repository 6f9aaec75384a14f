use inx_nls::{Decoder, TextDecoder};
use serde::{Serialize, Serializer};

use crate::cursor::Cursor;
use crate::error::{InxError, Result, TableKind};

pub const COPYRIGHT_LEN: usize = 98;

/// Size of the packed header on disk.
pub const HEADER_LEN: usize = 4 + 2 + COPYRIGHT_LEN + 4 + 4 * 4;

/// Fixed header at the start of every `.inx` file.
///
/// Layout (little-endian, packed):
/// - 0x00: u32 signature
/// - 0x04: u16 version
/// - 0x06: [98] copyright / identification text
/// - 0x68: u32 header_size
/// - 0x6C: u32 functions_offset
/// - 0x70: u32 types_offset (the struct table is read from here too)
/// - 0x74: u32 f74
/// - 0x78: u32 f48
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub signature: u32,
    pub version: u16,
    #[serde(serialize_with = "serialize_copyright")]
    pub copyright: Vec<u8>,
    pub header_size: u32,
    pub functions_offset: u32,
    pub types_offset: u32,
    /// A third offset-sized field. Nothing reads a table from it.
    pub f74: u32,
    /// Purpose unknown; kept raw.
    pub f48: u32,
}

fn serialize_copyright<S: Serializer>(bytes: &[u8], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&Decoder::default().decode_cstr(bytes))
}

impl Header {
    /// Read the header fields without validating the table offsets.
    pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        let signature = cursor.read_u32()?;
        let version = cursor.read_u16()?;
        let copyright = cursor.read_bytes(COPYRIGHT_LEN)?.to_vec();
        let header_size = cursor.read_u32()?;
        let functions_offset = cursor.read_u32()?;
        let types_offset = cursor.read_u32()?;
        let f74 = cursor.read_u32()?;
        let f48 = cursor.read_u32()?;

        Ok(Header {
            signature,
            version,
            copyright,
            header_size,
            functions_offset,
            types_offset,
            f74,
            f48,
        })
    }

    /// The struct table shares the "f70" word with the type table.
    #[inline]
    pub fn structs_offset(&self) -> u32 {
        self.types_offset
    }

    pub fn table_offset(&self, table: TableKind) -> u32 {
        match table {
            TableKind::Types => self.types_offset,
            TableKind::Structs => self.structs_offset(),
            TableKind::Functions => self.functions_offset,
        }
    }

    /// Fails with `OutOfBounds` unless `table`'s offset has at least one byte
    /// behind it in a buffer of `len` bytes.
    pub fn check_offset(&self, table: TableKind, len: usize) -> Result<usize> {
        let offset = self.table_offset(table) as usize;
        if offset < len {
            Ok(offset)
        } else {
            Err(InxError::OutOfBounds {
                offset,
                wanted: 1,
                len,
            })
        }
    }

    #[inline]
    pub fn copyright_text(&self, nls: &dyn TextDecoder) -> String {
        nls.decode_cstr(&self.copyright).into_owned()
    }
}

/// Decode the header and make sure all three table offsets are in range.
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
    let mut cursor = Cursor::new(bytes);
    let header = Header::read(&mut cursor)?;
    for table in [TableKind::Functions, TableKind::Structs, TableKind::Types] {
        header.check_offset(table, bytes.len())?;
    }
    log::debug!(
        "header: signature=0x{:08X} version={} functions=0x{:X} types=0x{:X}",
        header.signature,
        header.version,
        header.functions_offset,
        header.types_offset
    );
    Ok(header)
}
