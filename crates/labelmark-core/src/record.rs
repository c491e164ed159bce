//! Native attribute records.
//!
//! A record is a fixed-layout blob produced by the markup parser:
//!
//! ```text
//! [ header: one pointer-width word ][ start: u32 ][ end: u32 ][ payload ... ]
//! ```
//!
//! The header is a class pointer on the producing side and carries no information here. Integer
//! payloads are a single `i32` right after the offsets; float payloads are a single `f64` at the
//! next 8-byte boundary. All fields are native-endian.
//!
//! Byte positions never leave this module: everything outside works on [`AttributeRecord`].

use crate::{Error, Result};
use serde::Serialize;
use std::mem::{align_of, size_of};
use std::ops::Range;

const HEADER_LEN: usize = size_of::<usize>();
const START_AT: usize = HEADER_LEN;
const END_AT: usize = START_AT + size_of::<u32>();
const INT_PAYLOAD_AT: usize = END_AT + size_of::<u32>();
const FLOAT_PAYLOAD_AT: usize = align_up(INT_PAYLOAD_AT, align_of::<f64>());
/// Size of every record produced by the encoder (large enough for either payload class).
const ENCODED_LEN: usize = FLOAT_PAYLOAD_AT + size_of::<f64>();

const fn align_up(at: usize, align: usize) -> usize {
    at.div_ceil(align) * align
}

/// Native attribute kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttrKind {
    Language,
    Family,
    Style,
    Weight,
    Variant,
    Stretch,
    Size,
    FontDesc,
    Foreground,
    Background,
    Underline,
    Strikethrough,
    Rise,
    Shape,
    Scale,
    Fallback,
    LetterSpacing,
    /// A tag outside the native table. Records built with `Other` of a known tag are stored
    /// under the named kind.
    Other(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadClass {
    Int,
    Float,
    Unsupported,
}

impl AttrKind {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Language,
            2 => Self::Family,
            3 => Self::Style,
            4 => Self::Weight,
            5 => Self::Variant,
            6 => Self::Stretch,
            7 => Self::Size,
            8 => Self::FontDesc,
            9 => Self::Foreground,
            10 => Self::Background,
            11 => Self::Underline,
            12 => Self::Strikethrough,
            13 => Self::Rise,
            14 => Self::Shape,
            15 => Self::Scale,
            16 => Self::Fallback,
            17 => Self::LetterSpacing,
            other => Self::Other(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Self::Language => 1,
            Self::Family => 2,
            Self::Style => 3,
            Self::Weight => 4,
            Self::Variant => 5,
            Self::Stretch => 6,
            Self::Size => 7,
            Self::FontDesc => 8,
            Self::Foreground => 9,
            Self::Background => 10,
            Self::Underline => 11,
            Self::Strikethrough => 12,
            Self::Rise => 13,
            Self::Shape => 14,
            Self::Scale => 15,
            Self::Fallback => 16,
            Self::LetterSpacing => 17,
            Self::Other(raw) => raw,
        }
    }

    fn canonical(self) -> Self {
        Self::from_raw(self.raw())
    }

    fn payload_class(self) -> PayloadClass {
        match self {
            Self::Style
            | Self::Weight
            | Self::Variant
            | Self::Stretch
            | Self::Size
            | Self::Underline
            | Self::Strikethrough
            | Self::Rise
            | Self::Fallback
            | Self::LetterSpacing => PayloadClass::Int,
            Self::Scale => PayloadClass::Float,
            _ => PayloadClass::Unsupported,
        }
    }

    fn min_record_len(self) -> usize {
        match self.payload_class() {
            PayloadClass::Int => INT_PAYLOAD_AT + size_of::<i32>(),
            PayloadClass::Float => FLOAT_PAYLOAD_AT + size_of::<f64>(),
            PayloadClass::Unsupported => INT_PAYLOAD_AT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i32),
    Float(f64),
}

/// A native record whose length has been checked against its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    kind: AttrKind,
    bytes: Vec<u8>,
}

impl RawRecord {
    /// Wraps native bytes, rejecting blobs too short for the kind's layout.
    pub fn new(kind: AttrKind, bytes: Vec<u8>) -> Result<Self> {
        let kind = kind.canonical();
        let expected = kind.min_record_len();
        if bytes.len() < expected {
            return Err(Error::MalformedRecord {
                kind,
                len: bytes.len(),
                expected,
            });
        }
        Ok(Self { kind, bytes })
    }

    pub fn int(kind: AttrKind, start: u32, end: u32, value: i32) -> Self {
        let mut bytes = Self::encoded_header(start, end);
        bytes[INT_PAYLOAD_AT..INT_PAYLOAD_AT + size_of::<i32>()]
            .copy_from_slice(&value.to_ne_bytes());
        Self {
            kind: kind.canonical(),
            bytes,
        }
    }

    pub fn float(kind: AttrKind, start: u32, end: u32, value: f64) -> Self {
        let mut bytes = Self::encoded_header(start, end);
        bytes[FLOAT_PAYLOAD_AT..FLOAT_PAYLOAD_AT + size_of::<f64>()]
            .copy_from_slice(&value.to_ne_bytes());
        Self {
            kind: kind.canonical(),
            bytes,
        }
    }

    /// A record whose payload is not interpreted (strings, colors, font descriptions).
    pub fn opaque(kind: AttrKind, start: u32, end: u32) -> Self {
        Self {
            kind: kind.canonical(),
            bytes: Self::encoded_header(start, end),
        }
    }

    fn encoded_header(start: u32, end: u32) -> Vec<u8> {
        let mut bytes = vec![0u8; ENCODED_LEN];
        bytes[START_AT..END_AT].copy_from_slice(&start.to_ne_bytes());
        bytes[END_AT..INT_PAYLOAD_AT].copy_from_slice(&end.to_ne_bytes());
        bytes
    }

    pub fn kind(&self) -> AttrKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn read_u32(&self, at: usize) -> u32 {
        let mut buf = [0u8; size_of::<u32>()];
        buf.copy_from_slice(&self.bytes[at..at + size_of::<u32>()]);
        u32::from_ne_bytes(buf)
    }

    fn read_i32(&self, at: usize) -> i32 {
        let mut buf = [0u8; size_of::<i32>()];
        buf.copy_from_slice(&self.bytes[at..at + size_of::<i32>()]);
        i32::from_ne_bytes(buf)
    }

    fn read_f64(&self, at: usize) -> f64 {
        let mut buf = [0u8; size_of::<f64>()];
        buf.copy_from_slice(&self.bytes[at..at + size_of::<f64>()]);
        f64::from_ne_bytes(buf)
    }
}

/// A decoded attribute covering `start..end` of the plain text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeRecord {
    pub kind: AttrKind,
    pub start: u32,
    pub end: u32,
    /// `None` for kinds whose payload is not decoded.
    pub value: Option<AttrValue>,
}

impl AttributeRecord {
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

pub fn decode(raw: &RawRecord) -> AttributeRecord {
    let value = match raw.kind.payload_class() {
        PayloadClass::Int => Some(AttrValue::Int(raw.read_i32(INT_PAYLOAD_AT))),
        PayloadClass::Float => Some(AttrValue::Float(raw.read_f64(FLOAT_PAYLOAD_AT))),
        PayloadClass::Unsupported => None,
    };
    AttributeRecord {
        kind: raw.kind,
        start: raw.read_u32(START_AT),
        end: raw.read_u32(END_AT),
        value,
    }
}

pub fn decode_all(raws: &[RawRecord]) -> Vec<AttributeRecord> {
    raws.iter().map(decode).collect()
}
