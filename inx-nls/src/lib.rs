use anyhow::{anyhow, Result};
use encoding_rs::{Encoding as RsEncoding, GB18030, GBK, SHIFT_JIS, UTF_8};
use std::borrow::Cow;
use std::str::FromStr;

pub trait TextDecoder {
    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str>;

    /// Decode C-style string: stop at the first NUL (0x00).
    fn decode_cstr<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.decode(&bytes[..end])
    }
}

/// Text encodings found in installer scripts.
///
/// The container itself does not record an encoding. `Latin1` maps every byte
/// to exactly one char and never fails, so it is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Latin1,
    Utf8,
    ShiftJis,
    Gbk,
    Gb18030,
}

impl Encoding {
    /// `None` for `Latin1`, which is decoded without a lookup table.
    #[inline]
    pub fn as_encoding_rs(self) -> Option<&'static RsEncoding> {
        match self {
            Encoding::Latin1 => None,
            Encoding::Utf8 => Some(UTF_8),
            Encoding::ShiftJis => Some(SHIFT_JIS),
            Encoding::Gbk => Some(GBK),
            Encoding::Gb18030 => Some(GB18030),
        }
    }
}

impl FromStr for Encoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "sjis" | "shift_jis" => Ok(Encoding::ShiftJis),
            "gbk" => Ok(Encoding::Gbk),
            "gb18030" => Ok(Encoding::Gb18030),
            _ => Err(anyhow!("unknown NLS: {}", s)),
        }
    }
}

/// A simple decoder bound to one encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    enc: Encoding,
}

impl Decoder {
    #[inline]
    pub fn new(enc: Encoding) -> Self {
        Self { enc }
    }

    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.enc
    }
}

impl TextDecoder for Decoder {
    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self.enc.as_encoding_rs() {
            None => encoding_rs::mem::decode_latin1(bytes),
            Some(enc) => {
                // bad sequences become U+FFFD
                let (cow, _had_errors) = enc.decode_without_bom_handling(bytes);
                cow
            }
        }
    }
}
