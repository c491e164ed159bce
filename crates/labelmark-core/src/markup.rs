//! Inline label markup.
//!
//! The accepted grammar is a small XML dialect:
//!
//! - convenience tags `b`, `big`, `i`, `s`, `small`, `sub`, `sup`, `tt`, `u`
//! - `span` with font attributes (`weight`, `style`, `size`, `rise`, `underline`, ...)
//!
//! Parsing strips the tags and produces the plain text together with one native record per
//! attribute, each covering the byte range of the element that set it.
//!
//! Relative sizes (`big`, `small`, `sub`, `sup`, `size="larger"`, `size="smaller"`) compound
//! with the enclosing element's scale, so `<big><big>` is 1.44. Size keywords such as `x-large`
//! are absolute and reset the scale.

use crate::record::{AttrKind, RawRecord};
use crate::{Error, Result};

/// Native units per point.
pub const UNITS_PER_POINT: i32 = 1024;

const SCALE_SMALLER: f64 = 1.0 / 1.2;
const SCALE_LARGER: f64 = 1.2;
const SUPERSCRIPT_RISE: i32 = 5000;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMarkup {
    /// The markup with every tag removed and entities decoded.
    pub text: String,
    /// Records ordered by element start (outer elements first).
    pub records: Vec<RawRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    Int(AttrKind, i32),
    Float(AttrKind, f64),
    /// Scale factor relative to the enclosing element.
    RelativeScale(f64),
    Opaque(AttrKind),
}

impl Pending {
    fn encode(self, start: u32, end: u32) -> RawRecord {
        match self {
            Self::Int(kind, v) => RawRecord::int(kind, start, end, v),
            Self::Float(kind, v) => RawRecord::float(kind, start, end, v),
            Self::RelativeScale(v) => RawRecord::float(AttrKind::Scale, start, end, v),
            Self::Opaque(kind) => RawRecord::opaque(kind, start, end),
        }
    }
}

pub fn parse_markup(markup: &str) -> Result<ParsedMarkup> {
    let wrapped = format!("<markup>{markup}</markup>");
    let doc = roxmltree::Document::parse(&wrapped).map_err(|e| Error::markup(e.to_string()))?;

    let mut out = ParsedMarkup {
        text: String::with_capacity(markup.len()),
        records: Vec::new(),
    };
    walk_children(doc.root_element(), 1.0, &mut out)?;
    tracing::debug!(
        text_len = out.text.len(),
        records = out.records.len(),
        "parsed markup"
    );
    Ok(out)
}

fn walk_children(node: roxmltree::Node<'_, '_>, scale: f64, out: &mut ParsedMarkup) -> Result<()> {
    for child in node.children() {
        if child.is_text() {
            out.text.push_str(child.text().unwrap_or_default());
        } else if child.is_element() {
            walk_element(child, scale, out)?;
        }
    }
    Ok(())
}

fn walk_element(node: roxmltree::Node<'_, '_>, scale: f64, out: &mut ParsedMarkup) -> Result<()> {
    let mut pending = element_attributes(node)?;
    let mut inner_scale = scale;
    for p in &mut pending {
        match *p {
            Pending::RelativeScale(factor) => {
                inner_scale = scale * factor;
                *p = Pending::RelativeScale(inner_scale);
            }
            Pending::Float(AttrKind::Scale, absolute) => inner_scale = absolute,
            _ => {}
        }
    }
    let start = text_offset(&out.text)?;
    let first = out.records.len();

    walk_children(node, inner_scale, out)?;

    let end = text_offset(&out.text)?;
    if start < end && !pending.is_empty() {
        let encoded: Vec<RawRecord> = pending.into_iter().map(|p| p.encode(start, end)).collect();
        out.records.splice(first..first, encoded);
    }
    Ok(())
}

fn text_offset(text: &str) -> Result<u32> {
    u32::try_from(text.len()).map_err(|_| Error::markup("text exceeds the 32-bit offset range"))
}

fn element_attributes(node: roxmltree::Node<'_, '_>) -> Result<Vec<Pending>> {
    let tag = node.tag_name().name();
    if tag != "span" {
        if let Some(attr) = node.attributes().next() {
            return Err(Error::markup(format!(
                "tag '{tag}' does not support attribute '{}'",
                attr.name()
            )));
        }
    }

    let pending = match tag {
        "b" => vec![Pending::Int(AttrKind::Weight, 700)],
        "big" => vec![Pending::RelativeScale(SCALE_LARGER)],
        "i" => vec![Pending::Int(AttrKind::Style, 2)],
        "s" => vec![Pending::Int(AttrKind::Strikethrough, 1)],
        "small" => vec![Pending::RelativeScale(SCALE_SMALLER)],
        "sub" => vec![
            Pending::Int(AttrKind::Rise, -SUPERSCRIPT_RISE),
            Pending::RelativeScale(SCALE_SMALLER),
        ],
        "sup" => vec![
            Pending::Int(AttrKind::Rise, SUPERSCRIPT_RISE),
            Pending::RelativeScale(SCALE_SMALLER),
        ],
        "tt" => vec![Pending::Opaque(AttrKind::Family)],
        "u" => vec![Pending::Int(AttrKind::Underline, 1)],
        "span" => {
            let mut pending = Vec::new();
            for attr in node.attributes() {
                pending.push(span_attribute(attr.name(), attr.value())?);
            }
            pending
        }
        other => return Err(Error::markup(format!("unknown tag '{other}'"))),
    };
    Ok(pending)
}

fn span_attribute(name: &str, value: &str) -> Result<Pending> {
    let invalid = || Error::markup(format!("invalid value '{value}' for attribute '{name}'"));
    let value_lc = value.trim().to_ascii_lowercase();

    let pending = match name {
        "font_family" | "face" => Pending::Opaque(AttrKind::Family),
        "font" | "font_desc" => Pending::Opaque(AttrKind::FontDesc),
        "foreground" | "fgcolor" | "color" => Pending::Opaque(AttrKind::Foreground),
        "background" | "bgcolor" => Pending::Opaque(AttrKind::Background),
        "lang" => Pending::Opaque(AttrKind::Language),
        "size" | "font_size" => parse_size(&value_lc).ok_or_else(invalid)?,
        "style" | "font_style" => {
            let raw = match value_lc.as_str() {
                "normal" => 0,
                "oblique" => 1,
                "italic" => 2,
                _ => return Err(invalid()),
            };
            Pending::Int(AttrKind::Style, raw)
        }
        "weight" | "font_weight" => {
            Pending::Int(AttrKind::Weight, parse_weight(&value_lc).ok_or_else(invalid)?)
        }
        "variant" | "font_variant" => {
            let raw = match value_lc.as_str() {
                "normal" => 0,
                "smallcaps" | "small-caps" => 1,
                _ => return Err(invalid()),
            };
            Pending::Int(AttrKind::Variant, raw)
        }
        "stretch" | "font_stretch" => {
            let raw = match value_lc.as_str() {
                "ultracondensed" => 0,
                "extracondensed" => 1,
                "condensed" => 2,
                "semicondensed" => 3,
                "normal" => 4,
                "semiexpanded" => 5,
                "expanded" => 6,
                "extraexpanded" => 7,
                "ultraexpanded" => 8,
                _ => return Err(invalid()),
            };
            Pending::Int(AttrKind::Stretch, raw)
        }
        "underline" => {
            let raw = match value_lc.as_str() {
                "none" => 0,
                "single" => 1,
                "double" => 2,
                "low" => 3,
                "error" => 4,
                _ => return Err(invalid()),
            };
            Pending::Int(AttrKind::Underline, raw)
        }
        "strikethrough" => Pending::Int(
            AttrKind::Strikethrough,
            parse_bool(&value_lc).ok_or_else(invalid)?,
        ),
        "fallback" => Pending::Int(
            AttrKind::Fallback,
            parse_bool(&value_lc).ok_or_else(invalid)?,
        ),
        "rise" => Pending::Int(AttrKind::Rise, parse_units(&value_lc).ok_or_else(invalid)?),
        "letter_spacing" => Pending::Int(
            AttrKind::LetterSpacing,
            parse_units(&value_lc).ok_or_else(invalid)?,
        ),
        other => return Err(Error::markup(format!("unknown span attribute '{other}'"))),
    };
    Ok(pending)
}

fn parse_weight(value: &str) -> Option<i32> {
    let named = match value {
        "thin" => Some(100),
        "ultralight" => Some(200),
        "light" => Some(300),
        "book" => Some(380),
        "normal" => Some(400),
        "medium" => Some(500),
        "semibold" => Some(600),
        "bold" => Some(700),
        "ultrabold" => Some(800),
        "heavy" => Some(900),
        "ultraheavy" => Some(1000),
        _ => None,
    };
    named.or_else(|| {
        value
            .parse::<i32>()
            .ok()
            .filter(|w| (100..=1000).contains(w))
    })
}

fn parse_bool(value: &str) -> Option<i32> {
    match value {
        "true" => Some(1),
        "false" => Some(0),
        _ => None,
    }
}

/// Integer native units, or points with a `pt` suffix.
fn parse_units(value: &str) -> Option<i32> {
    match value.strip_suffix("pt") {
        Some(points) => {
            let points = points.trim().parse::<f64>().ok()?;
            let units = (points * f64::from(UNITS_PER_POINT)).round();
            (units.is_finite() && units.abs() <= f64::from(i32::MAX)).then_some(units as i32)
        }
        None => value.parse::<i32>().ok(),
    }
}

fn parse_size(value: &str) -> Option<Pending> {
    let scale = match value {
        "xx-small" => Some(SCALE_SMALLER.powi(3)),
        "x-small" => Some(SCALE_SMALLER.powi(2)),
        "small" => Some(SCALE_SMALLER),
        "medium" => Some(1.0),
        "large" => Some(SCALE_LARGER),
        "x-large" => Some(SCALE_LARGER.powi(2)),
        "xx-large" => Some(SCALE_LARGER.powi(3)),
        "smaller" => return Some(Pending::RelativeScale(SCALE_SMALLER)),
        "larger" => return Some(Pending::RelativeScale(SCALE_LARGER)),
        _ => None,
    };
    if let Some(scale) = scale {
        return Some(Pending::Float(AttrKind::Scale, scale));
    }
    let units = parse_units(value).filter(|u| *u > 0)?;
    Some(Pending::Int(AttrKind::Size, units))
}
