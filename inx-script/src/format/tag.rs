use std::fmt;

use serde::Serialize;

/// Primitive kind of a field, argument or return value.
///
/// Values 0..=11 are the known kinds; anything else is kept as `Invalid`
/// so the raw byte survives for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeTag {
    String,
    Char,
    Short,
    Int,
    Number,
    Pointer,
    Bool,
    Hwnd,
    Unknown8,
    /// The companion width is a type-table index, not a length.
    Struct,
    Object,
    AnsiString,
    Invalid(u8),
}

impl TypeTag {
    pub fn raw(self) -> u8 {
        match self {
            TypeTag::String => 0,
            TypeTag::Char => 1,
            TypeTag::Short => 2,
            TypeTag::Int => 3,
            TypeTag::Number => 4,
            TypeTag::Pointer => 5,
            TypeTag::Bool => 6,
            TypeTag::Hwnd => 7,
            TypeTag::Unknown8 => 8,
            TypeTag::Struct => 9,
            TypeTag::Object => 10,
            TypeTag::AnsiString => 11,
            TypeTag::Invalid(v) => v,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::String => "STRING",
            TypeTag::Char => "CHAR",
            TypeTag::Short => "SHORT",
            TypeTag::Int => "INT",
            TypeTag::Number => "NUMBER",
            TypeTag::Pointer => "POINTER",
            TypeTag::Bool => "BOOL",
            TypeTag::Hwnd => "HWND",
            TypeTag::Unknown8 => "unknown8",
            TypeTag::Struct => "STRUC",
            TypeTag::Object => "OBJECT",
            TypeTag::AnsiString => "ANSISTRING",
            TypeTag::Invalid(_) => "INVALID",
        }
    }

    /// Discriminator value that marks an argument of this kind as by-reference.
    ///
    /// `None` for kinds that cannot appear in an argument list.
    pub fn by_ref_discriminator(self) -> Option<u8> {
        match self {
            TypeTag::String | TypeTag::AnsiString => Some(2),
            TypeTag::Char
            | TypeTag::Short
            | TypeTag::Int
            | TypeTag::Number
            | TypeTag::Pointer
            | TypeTag::Bool
            | TypeTag::Hwnd => Some(3),
            TypeTag::Object => Some(4),
            TypeTag::Unknown8 | TypeTag::Struct | TypeTag::Invalid(_) => None,
        }
    }
}

impl From<u8> for TypeTag {
    fn from(v: u8) -> Self {
        match v {
            0 => TypeTag::String,
            1 => TypeTag::Char,
            2 => TypeTag::Short,
            3 => TypeTag::Int,
            4 => TypeTag::Number,
            5 => TypeTag::Pointer,
            6 => TypeTag::Bool,
            7 => TypeTag::Hwnd,
            8 => TypeTag::Unknown8,
            9 => TypeTag::Struct,
            10 => TypeTag::Object,
            11 => TypeTag::AnsiString,
            v => TypeTag::Invalid(v),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
