//! On-disk structures of the `.inx` container.
//!
//! Every table is decoded from its own header offset with a fresh cursor;
//! where one table ends says nothing about where the next one starts.

mod field;
mod function;
mod header;
mod tag;
mod types;

pub use field::{decode_arg, decode_field, ArgDef, FieldDef, FieldShape, InvalidArg, TypeRef};
pub use function::{
    decode_arg_list, decode_function_table, ArgList, FunctionDef, FunctionLayout, FunctionTable,
};
pub use header::{decode_header, Header, COPYRIGHT_LEN, HEADER_LEN};
pub use tag::TypeTag;
pub use types::{decode_struct_table, decode_type_table, StructDef, TypeDef};
