//! Text listing of a decoded script.
//!
//! ```text
//! typedef type_000
//! begin
//!   INT count;
//!   STRING label[260];
//!   type_001;
//! end
//! ```

use std::io::Write;

use anyhow::Result;
use inx_nls::TextDecoder;
use inx_script::{
    ArgList, FieldDef, FieldShape, FunctionDef, FunctionTable, Header, InxError, InxScript,
    Section, StructDef, TableKind, TypeDef,
};

use crate::config::{DumpConfig, Table};

pub fn render_text(
    w: &mut dyn Write,
    script: &InxScript,
    config: &DumpConfig,
    nls: &dyn TextDecoder,
) -> Result<()> {
    if config.wants(Table::Header) {
        render_header(w, &script.header, nls)?;
        writeln!(w)?;
    }

    let types = script.type_table();
    render_section(w, TableKind::Types, &script.types, |w, v| render_types(w, v))?;
    render_section(w, TableKind::Structs, &script.structs, |w, v| {
        render_structs(w, v, types)
    })?;
    render_section(w, TableKind::Functions, &script.functions, |w, v| {
        render_functions(w, v)
    })?;
    Ok(())
}

fn render_section<T>(
    w: &mut dyn Write,
    table: TableKind,
    section: &Section<T>,
    render: impl FnOnce(&mut dyn Write, &T) -> Result<()>,
) -> Result<()> {
    match section {
        Section::Decoded(v) => render(w, v),
        Section::Failed(e) => status(w, table, "decode failed", e),
        Section::Skipped(_, e) => status(w, table, "skipped", e),
        Section::Omitted => Ok(()),
    }
}

fn status(w: &mut dyn Write, table: TableKind, what: &str, e: &InxError) -> Result<()> {
    writeln!(w, "# {}: {} ({})", table, what, e)?;
    writeln!(w)?;
    Ok(())
}

pub fn render_header(w: &mut dyn Write, h: &Header, nls: &dyn TextDecoder) -> Result<()> {
    writeln!(w, "Signature: 0x{:02X}", h.signature)?;
    writeln!(w, "Copyright: {}", h.copyright_text(nls))?;
    writeln!(w, "size: {}", h.header_size)?;
    writeln!(w, "f4: 0x{:02X} ({})", h.version, h.version)?;
    writeln!(w, "f6c: 0x{:02X} ({})", h.functions_offset, h.functions_offset)?;
    writeln!(w, "f70: 0x{:02X} ({})", h.types_offset, h.types_offset)?;
    writeln!(w, "f74: 0x{:02X} ({})", h.f74, h.f74)?;
    writeln!(w, "f48: 0x{:02X} ({})", h.f48, h.f48)?;
    Ok(())
}

/// One member line, without indentation or trailing newline.
///
/// `types` is used to flag struct references that point at no known type.
pub fn field_decl(field: &FieldDef, types: &[TypeDef]) -> String {
    let name = field.name.as_deref().unwrap_or_default();
    match field.shape() {
        FieldShape::Struct(r) if r.resolve(types).is_some() => format!("type_{:03};", r.index()),
        FieldShape::Struct(r) => format!("type_{:03}; // unresolved", r.index()),
        FieldShape::Array(n) => format!("{} {}[{}];", field.tag, name, n),
        FieldShape::Scalar => format!("{} {};", field.tag, name),
    }
}

pub fn render_types(w: &mut dyn Write, types: &[TypeDef]) -> Result<()> {
    for (i, ty) in types.iter().enumerate() {
        writeln!(w, "typedef type_{:03}", i)?;
        writeln!(w, "begin")?;
        for field in &ty.fields {
            writeln!(w, "  {}", field_decl(field, types))?;
        }
        writeln!(w, "end")?;
        writeln!(w)?;
    }
    Ok(())
}

pub fn render_structs(w: &mut dyn Write, structs: &[StructDef], types: &[TypeDef]) -> Result<()> {
    writeln!(w, "STRUCTS count: {} (0x{:02x})", structs.len(), structs.len())?;
    for (i, st) in structs.iter().enumerate() {
        let [a, b] = st.preamble;
        writeln!(w, "struc_{}", i)?;
        writeln!(w, "  unknown: {} (0x{:02x}), {} (0x{:02x})", a, a, b, b)?;
        for field in &st.fields {
            writeln!(w, "  {}", field_decl(field, types))?;
        }
        writeln!(w, "end")?;
    }
    writeln!(w)?;
    Ok(())
}

pub fn args_decl(args: &ArgList) -> String {
    let list = args
        .args
        .iter()
        .map(|a| format!("{} {}", if a.by_ref { "BYREF" } else { "BYVAL" }, a.tag))
        .collect::<Vec<_>>()
        .join(", ");
    if list.is_empty() {
        format!("Args({}):", args.declared())
    } else {
        format!("Args({}): {}", args.declared(), list)
    }
}

fn flag_char(flags: u8) -> char {
    if flags.is_ascii_graphic() || flags == b' ' {
        flags as char
    } else {
        '.'
    }
}

pub fn render_functions(w: &mut dyn Write, table: &FunctionTable) -> Result<()> {
    for (i, func) in table.functions.iter().enumerate() {
        writeln!(w, "func_{}", i)?;
        writeln!(w, "  Flags: {} (0x{:02X})", flag_char(func.flags()), func.flags())?;
        writeln!(w, "  Returns: {}", func.return_type())?;
        match func {
            FunctionDef::Module { module, entry, .. } => {
                writeln!(w, "  Name: {}.{}", module, entry)?;
            }
            FunctionDef::Ordinal { entry, ordinal, .. } => {
                writeln!(w, "  Name: {}", entry)?;
                writeln!(w, "  Number: {}", ordinal)?;
            }
        }
        writeln!(w, "  {}", args_decl(func.args()))?;
        for bad in &func.args().invalid {
            writeln!(
                w,
                "  *** BAD ARG #{}: ({},{}) at 0x{:X}",
                bad.index, bad.tag, bad.discriminator, bad.offset
            )?;
        }
        writeln!(w, "end")?;
    }
    if let Some(e) = &table.malformed {
        writeln!(w, "# functions: stopped early ({})", e)?;
    }
    writeln!(w)?;
    Ok(())
}
