use crate::record::{AttrKind, AttrValue, AttributeRecord};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Slant {
    Normal,
    Oblique,
    Italic,
    /// A native style value with no CSS counterpart. Kept so it can be dropped at output time.
    Other(i32),
}

impl Slant {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Normal,
            1 => Self::Oblique,
            2 => Self::Italic,
            other => Self::Other(other),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Oblique => 1,
            Self::Italic => 2,
            Self::Other(raw) => raw,
        }
    }

    pub fn css_name(self) -> Option<&'static str> {
        match self {
            Self::Normal => Some("normal"),
            Self::Oblique => Some("oblique"),
            Self::Italic => Some("italic"),
            Self::Other(_) => None,
        }
    }
}

/// The formatting dimensions carried into span output.
///
/// New dimensions (underline, letter spacing, colors) are added as variants here plus a field on
/// [`StyleState`]; records of kinds without a variant are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleAttribute {
    /// Baseline offset in native units (1/1024 pt), positive is up.
    Rise(i32),
    /// Font size multiplier.
    Scale(f64),
    Style(Slant),
    /// CSS-like weight, 100..=1000.
    Weight(i32),
}

impl StyleAttribute {
    pub fn from_record(record: &AttributeRecord) -> Option<Self> {
        match (record.kind, record.value?) {
            (AttrKind::Rise, AttrValue::Int(v)) => Some(Self::Rise(v)),
            (AttrKind::Scale, AttrValue::Float(v)) => Some(Self::Scale(v)),
            (AttrKind::Style, AttrValue::Int(v)) => Some(Self::Style(Slant::from_raw(v))),
            (AttrKind::Weight, AttrValue::Int(v)) => Some(Self::Weight(v)),
            _ => None,
        }
    }
}

/// The active formatting at some offset. Unset fields inherit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rise: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Slant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

impl StyleState {
    pub fn is_empty(&self) -> bool {
        self.rise.is_none() && self.scale.is_none() && self.style.is_none() && self.weight.is_none()
    }

    /// Overwrites the dimension `attr` belongs to.
    pub fn apply(&mut self, attr: StyleAttribute) {
        match attr {
            StyleAttribute::Rise(v) => self.rise = Some(v),
            StyleAttribute::Scale(v) => self.scale = Some(v),
            StyleAttribute::Style(v) => self.style = Some(v),
            StyleAttribute::Weight(v) => self.weight = Some(v),
        }
    }

    /// Present attributes in output order: rise, scale, style, weight.
    pub fn attributes(&self) -> impl Iterator<Item = StyleAttribute> + '_ {
        [
            self.rise.map(StyleAttribute::Rise),
            self.scale.map(StyleAttribute::Scale),
            self.style.map(StyleAttribute::Style),
            self.weight.map(StyleAttribute::Weight),
        ]
        .into_iter()
        .flatten()
    }
}

/// `state` is active from `start` up to the next run's start (or the end of the text).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StyleRun {
    pub start: usize,
    pub state: StyleState,
}

impl StyleRun {
    pub fn new(start: usize, state: StyleState) -> Self {
        Self { start, state }
    }
}
