//! inx-script
//!
//! Decoder for compiled installer-script containers (`.inx`).
//!
//! The container starts with a fixed [`format::Header`] that points at three
//! tables: user types, structs and imported functions. Each table can be
//! decoded on its own with the `decode_*` functions, or all at once through
//! [`InxScript::decode`].
//!
//! Decoding only borrows the buffer; every returned record owns its data.

pub mod cursor;
pub mod error;
pub mod format;
mod script;

pub use cursor::Cursor;
pub use error::{InxError, Result, TableKind};
pub use format::{
    decode_function_table, decode_header, decode_struct_table, decode_type_table, ArgDef, ArgList,
    FieldDef, FieldShape, FunctionDef, FunctionLayout, FunctionTable, Header, InvalidArg,
    StructDef, TypeDef, TypeRef, TypeTag,
};
pub use script::{InxScript, Section};
