use inx_nls::{Decoder, Encoding};
use inx_script::{
    decode_function_table, decode_header, decode_struct_table, decode_type_table, FieldShape,
    FunctionDef, InxError, InxScript, Result, Section, TableKind, TypeTag,
};
use pretty_assertions::assert_eq;

const HEADER_LEN: usize = 124;

/// Builds a synthetic `.inx` image: header, then a type table, then a function table.
#[derive(Default)]
struct Image {
    body: Vec<u8>,
}

impl Image {
    fn u8(&mut self, v: u8) -> &mut Self {
        self.body.push(v);
        self
    }

    fn u16(&mut self, v: u16) -> &mut Self {
        self.body.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn str(&mut self, s: &[u8]) -> &mut Self {
        self.u16(s.len() as u16);
        self.body.extend_from_slice(s);
        self
    }

    fn here(&self) -> u32 {
        (HEADER_LEN + self.body.len()) as u32
    }

    fn finish(&self, functions: u32, types: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0x0049_4E58u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        let mut copyright = [0u8; 98];
        copyright[..12].copy_from_slice(b"InstallShiel");
        out.extend_from_slice(&copyright);
        out.extend_from_slice(&(HEADER_LEN as u32).to_le_bytes());
        out.extend_from_slice(&functions.to_le_bytes());
        out.extend_from_slice(&types.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(out.len(), HEADER_LEN);
        out.extend_from_slice(&self.body);
        out
    }
}

fn sample() -> Vec<u8> {
    let mut img = Image::default();

    let types = img.here();
    img.u16(2);
    // type_000 { INT count; STRING label[260]; type_001; }
    img.u16(3);
    img.u8(3).u16(1).str(b"count");
    img.u8(0).u16(260).str(b"label");
    img.u8(9).u16(1);
    // type_001 { HWND owner; }
    img.u16(1);
    img.u8(7).u16(1).str(b"owner");

    let functions = img.here();
    img.u16(3);
    img.u8(0x01).u8(6).str(b"user32").str(b"MessageBoxA").u16(0);
    img.u16(4).u8(7).u8(0).u8(0).u8(0).u8(0).u8(2).u8(3).u8(3);
    img.u8(0x02).u8(3).str(b"Helper").u16(42);
    img.u16(2).u8(8).u8(3).u8(10).u8(4);

    img.finish(functions, types)
}

#[test]
fn decode_sample_script() -> Result<()> {
    let bytes = sample();
    let nls = Decoder::default();
    let script = InxScript::decode(&bytes, &nls)?;

    assert_eq!(script.header.copyright_text(&nls), "InstallShiel");

    let types = script.types.decoded().expect("types");
    assert_eq!(types.len(), 2);
    assert_eq!(types[0].fields.len(), 3);
    assert_eq!(types[0].fields[1].shape(), FieldShape::Array(260));
    match types[0].fields[2].shape() {
        FieldShape::Struct(r) => assert_eq!(r.resolve(script.type_table()), Some(&types[1])),
        other => panic!("expected struct reference, got {:?}", other),
    }

    let functions = script.functions.decoded().expect("functions");
    assert!(functions.is_complete());
    assert_eq!(functions.functions.len(), 2);

    let first = &functions.functions[0];
    assert!(matches!(first, FunctionDef::Module { module, .. } if module == "user32"));
    assert_eq!(first.return_type(), TypeTag::Bool);
    let by_ref: Vec<bool> = first.args().args.iter().map(|a| a.by_ref).collect();
    assert_eq!(by_ref, vec![false, false, true, true]);

    let second = &functions.functions[1];
    assert!(matches!(second, FunctionDef::Ordinal { ordinal: 42, .. }));
    assert_eq!(second.args().args.len(), 1);
    assert_eq!(second.args().invalid.len(), 1);
    assert_eq!(second.args().invalid[0].tag, 8);
    assert!(second.args().args[0].by_ref);

    // the struct table reads the same bytes with a different shape
    assert!(matches!(
        script.structs,
        Section::Decoded(_) | Section::Failed(_)
    ));
    Ok(())
}

#[test]
fn decoding_is_deterministic() -> Result<()> {
    let bytes = sample();
    let nls = Decoder::default();
    assert_eq!(InxScript::decode(&bytes, &nls)?, InxScript::decode(&bytes, &nls)?);
    Ok(())
}

#[test]
fn table_functions_match_aggregate() -> Result<()> {
    let bytes = sample();
    let nls = Decoder::default();
    let header = decode_header(&bytes)?;
    let script = InxScript::decode(&bytes, &nls)?;

    let types = decode_type_table(&bytes, header.types_offset as usize, &nls)?;
    assert_eq!(script.types, Section::Decoded(types));

    let functions = decode_function_table(&bytes, header.functions_offset as usize, &nls)?;
    assert_eq!(script.functions, Section::Decoded(functions));

    let structs = decode_struct_table(&bytes, header.structs_offset() as usize, &nls);
    match (&script.structs, structs) {
        (Section::Decoded(a), Ok(b)) => assert_eq!(a, &b),
        (Section::Failed(a), Err(b)) => assert_eq!(a, &b),
        (a, b) => panic!("mismatch: {:?} vs {:?}", a, b),
    }
    Ok(())
}

#[test]
fn bad_offset_skips_only_that_table() -> Result<()> {
    let mut img = Image::default();
    let types = img.here();
    img.u16(1).u16(1).u8(1).u16(1).str(b"c");
    let bytes = img.finish(0x7FFF_0000, types);

    assert!(matches!(
        decode_header(&bytes),
        Err(InxError::OutOfBounds {
            offset: 0x7FFF_0000,
            wanted: 1,
            ..
        })
    ));

    let script = InxScript::decode(&bytes, &Decoder::default())?;
    assert_eq!(script.type_table().len(), 1);
    assert!(matches!(
        script.functions,
        Section::Skipped(TableKind::Functions, InxError::OutOfBounds { .. })
    ));
    Ok(())
}

#[test]
fn truncated_table_fails_without_panicking() -> Result<()> {
    let mut img = Image::default();
    let types = img.here();
    // promises 5 types, delivers one field of the first
    img.u16(5).u16(2).u8(3).u16(1).str(b"x");
    let bytes = img.finish(types, types);

    let script = InxScript::decode(&bytes, &Decoder::default())?;
    assert!(matches!(
        script.types,
        Section::Failed(InxError::OutOfBounds { .. })
    ));
    Ok(())
}

#[test]
fn malformed_function_keeps_earlier_records() -> Result<()> {
    let mut img = Image::default();
    let functions = img.here();
    img.u16(5);
    img.u8(0x02).u8(0).str(b"ok").u16(1).u16(0);
    img.u8(0x00).u8(0).str(b"never").u16(2).u16(0);
    let types = img.here();
    img.u16(0);
    let bytes = img.finish(functions, types);

    let script = InxScript::decode(&bytes, &Decoder::default())?;
    let table = script.functions.decoded().expect("functions");
    assert_eq!(table.functions.len(), 1);
    assert!(matches!(
        table.malformed,
        Some(InxError::MalformedFunctionTable { index: 1, flags: 0, .. })
    ));
    assert_eq!(script.types, Section::Decoded(vec![]));
    Ok(())
}

#[test]
fn only_requested_tables_are_decoded() -> Result<()> {
    let bytes = sample();
    let script = InxScript::decode_tables(&bytes, &Decoder::default(), &[TableKind::Types])?;
    assert!(script.types.decoded().is_some());
    assert_eq!(script.structs, Section::Omitted);
    assert_eq!(script.functions, Section::Omitted);
    Ok(())
}

#[test]
fn header_too_short_is_an_error() {
    let bytes = sample();
    assert!(matches!(
        InxScript::decode(&bytes[..100], &Decoder::default()),
        Err(InxError::OutOfBounds { .. })
    ));
}

#[test]
fn shift_jis_names() -> Result<()> {
    let mut img = Image::default();
    let types = img.here();
    img.u16(1).u16(1).u8(1).u16(1).str(&[0x82, 0xA0]);
    let bytes = img.finish(types, types);

    let script = InxScript::decode_tables(
        &bytes,
        &Decoder::new(Encoding::ShiftJis),
        &[TableKind::Types],
    )?;
    assert_eq!(
        script.type_table()[0].fields[0].name.as_deref(),
        Some("\u{3042}")
    );
    Ok(())
}
