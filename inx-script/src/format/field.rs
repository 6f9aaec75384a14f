use inx_nls::TextDecoder;
use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::{InxError, Result};

use super::tag::TypeTag;
use super::types::TypeDef;

/// Index into the type table carried by a `Struct` field.
///
/// The index is not checked while decoding: a type may refer to itself or to
/// a type that appears later in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypeRef(pub u16);

impl TypeRef {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn resolve(self, types: &[TypeDef]) -> Option<&TypeDef> {
        types.get(self.index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Scalar,
    Array(u16),
    Struct(TypeRef),
}

/// One member of a type or struct declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub tag: TypeTag,
    pub width: u16,
    /// Always `None` for `Struct` fields.
    pub name: Option<String>,
}

impl FieldDef {
    pub fn shape(&self) -> FieldShape {
        match (self.tag, self.width) {
            (TypeTag::Struct, idx) => FieldShape::Struct(TypeRef(idx)),
            (_, 1) => FieldShape::Scalar,
            (_, n) => FieldShape::Array(n),
        }
    }
}

/// `tag: u8`, `width: u16`, then a name unless the field is a struct reference.
pub fn decode_field(cursor: &mut Cursor<'_>, nls: &dyn TextDecoder) -> Result<FieldDef> {
    let tag = TypeTag::from(cursor.read_u8()?);
    let width = cursor.read_u16()?;
    let name = match tag {
        TypeTag::Struct => None,
        _ => Some(cursor.read_string(nls)?),
    };
    Ok(FieldDef { tag, width, name })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArgDef {
    pub tag: TypeTag,
    pub by_ref: bool,
}

/// An argument whose tag has no pass-by-value/pass-by-reference encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvalidArg {
    /// Position in the declared argument list.
    pub index: usize,
    pub offset: usize,
    pub tag: u8,
    pub discriminator: u8,
}

/// `tag: u8`, `discriminator: u8`.
///
/// Both bytes are consumed even when the tag is rejected with
/// `InvalidArgumentType`, so the next argument can still be read.
pub fn decode_arg(cursor: &mut Cursor<'_>) -> Result<ArgDef> {
    let offset = cursor.offset();
    let raw = cursor.read_u8()?;
    let discriminator = cursor.read_u8()?;
    let tag = TypeTag::from(raw);

    match tag.by_ref_discriminator() {
        Some(by_ref) => Ok(ArgDef {
            tag,
            by_ref: discriminator == by_ref,
        }),
        None => Err(InxError::InvalidArgumentType {
            offset,
            tag: raw,
            discriminator,
        }),
    }
}
