//! SVG `<tspan>` output for style runs.

use crate::number::format_number;
use labelmark_core::{StyleAttribute, StyleRun, StyleState, UNITS_PER_POINT};
use std::borrow::Cow;
use std::ops::Range;

pub const TSPAN_OPEN_PREFIX: &str = r#"<tspan style="dominant-baseline:inherit""#;
pub const TSPAN_CLOSE: &str = "</tspan>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanOptions {
    /// Close a span that is still open when the text ends.
    pub close_trailing: bool,
    /// XML-escape the copied text. When disabled, removing every tag from the output gives back
    /// the input text byte for byte.
    pub escape_text: bool,
}

impl Default for SpanOptions {
    fn default() -> Self {
        Self {
            close_trailing: true,
            escape_text: false,
        }
    }
}

/// Interleaves `text` with `<tspan>` tags so that each run's state applies from its start up to
/// the next run.
///
/// At most one span is open at a time. Every run closes the span opened by the previous one;
/// runs with an empty state open nothing. `runs` must be ordered by start; starts that go
/// backwards are treated as the current position.
pub fn serialize(text: &str, runs: &[StyleRun], options: &SpanOptions) -> String {
    let mut out = String::with_capacity(text.len() + runs.len() * 48);
    let mut last_index = 0usize;
    let mut open = false;

    for run in runs {
        let start = run.start.clamp(last_index, text.len());
        push_text(&mut out, text, last_index..start, options);
        last_index = start;

        if open {
            out.push_str(TSPAN_CLOSE);
            open = false;
        }
        if run.state.is_empty() {
            continue;
        }
        push_open_tag(&mut out, &run.state);
        open = true;
    }

    push_text(&mut out, text, last_index..text.len(), options);
    if open && options.close_trailing {
        out.push_str(TSPAN_CLOSE);
    }
    out
}

fn push_text(out: &mut String, text: &str, range: Range<usize>, options: &SpanOptions) {
    if range.is_empty() {
        return;
    }
    let chunk = match text.get(range.clone()) {
        Some(chunk) => Cow::Borrowed(chunk),
        None => {
            tracing::debug!(
                start = range.start,
                end = range.end,
                "run offset splits a character; emitting replacement characters"
            );
            String::from_utf8_lossy(&text.as_bytes()[range])
        }
    };
    if options.escape_text {
        out.push_str(&escape_xml(&chunk));
    } else {
        out.push_str(&chunk);
    }
}

fn push_open_tag(out: &mut String, state: &StyleState) {
    out.push_str(TSPAN_OPEN_PREFIX);
    for attr in state.attributes() {
        match attr {
            StyleAttribute::Rise(rise) => {
                // Native rise points up; SVG `dy` points down.
                let dy = -f64::from(rise) / f64::from(UNITS_PER_POINT);
                out.push_str(&format!(r#" dy="{}""#, format_number(dy)));
            }
            StyleAttribute::Scale(scale) => {
                out.push_str(&format!(r#" font-size="{}%""#, format_number(scale * 100.0)));
            }
            StyleAttribute::Style(slant) => {
                if let Some(name) = slant.css_name() {
                    out.push_str(&format!(r#" font-style="{name}""#));
                }
            }
            StyleAttribute::Weight(weight) => {
                out.push_str(&format!(r#" font-weight="{weight}""#));
            }
        }
    }
    out.push('>');
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelmark_core::Slant;

    fn state(f: impl FnOnce(&mut StyleState)) -> StyleState {
        let mut s = StyleState::default();
        f(&mut s);
        s
    }

    fn strip_tags(s: &str) -> String {
        let mut out = String::new();
        let mut in_tag = false;
        for ch in s.chars() {
            match ch {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => out.push(ch),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn no_runs_copies_text_verbatim() {
        let text = "x < y & \"z\"";
        assert_eq!(serialize(text, &[], &SpanOptions::default()), text);
    }

    #[test]
    fn bold_word_is_wrapped() {
        let runs = [
            StyleRun::new(0, StyleState::default()),
            StyleRun::new(6, state(|s| s.weight = Some(700))),
            StyleRun::new(10, StyleState::default()),
        ];
        assert_eq!(
            serialize("plain bold plain", &runs, &SpanOptions::default()),
            r#"plain <tspan style="dominant-baseline:inherit" font-weight="700">bold</tspan> plain"#
        );
    }

    #[test]
    fn attributes_follow_fixed_order() {
        let runs = [StyleRun::new(
            0,
            state(|s| {
                s.weight = Some(600);
                s.style = Some(Slant::Oblique);
                s.scale = Some(0.5);
                s.rise = Some(-2048);
            }),
        )];
        assert_eq!(
            serialize("x", &runs, &SpanOptions::default()),
            r#"<tspan style="dominant-baseline:inherit" dy="2" font-size="50%" font-style="oblique" font-weight="600">x</tspan>"#
        );
    }

    #[test]
    fn positive_rise_shifts_up() {
        let runs = [StyleRun::new(0, state(|s| s.rise = Some(5 * UNITS_PER_POINT)))];
        let out = serialize("x", &runs, &SpanOptions::default());
        assert!(out.contains(r#" dy="-5""#), "{out}");
    }

    #[test]
    fn tiny_rise_is_not_rounded_away() {
        let runs = [StyleRun::new(0, state(|s| s.rise = Some(-1)))];
        let out = serialize("x", &runs, &SpanOptions::default());
        assert!(out.contains(r#" dy="0.0009765625""#), "{out}");
    }

    #[test]
    fn unknown_slant_is_omitted() {
        let runs = [StyleRun::new(0, state(|s| s.style = Some(Slant::Other(9))))];
        assert_eq!(
            serialize("x", &runs, &SpanOptions::default()),
            r#"<tspan style="dominant-baseline:inherit">x</tspan>"#
        );
    }

    #[test]
    fn adjacent_styled_runs_close_before_opening() {
        let runs = [
            StyleRun::new(0, state(|s| s.weight = Some(700))),
            StyleRun::new(1, state(|s| s.style = Some(Slant::Italic))),
        ];
        assert_eq!(
            serialize("ab", &runs, &SpanOptions::default()),
            concat!(
                r#"<tspan style="dominant-baseline:inherit" font-weight="700">a</tspan>"#,
                r#"<tspan style="dominant-baseline:inherit" font-style="italic">b</tspan>"#
            )
        );
    }

    #[test]
    fn trailing_span_is_closed_by_default() {
        let runs = [StyleRun::new(2, state(|s| s.weight = Some(700)))];
        assert_eq!(
            serialize("abcd", &runs, &SpanOptions::default()),
            r#"ab<tspan style="dominant-baseline:inherit" font-weight="700">cd</tspan>"#
        );
    }

    #[test]
    fn trailing_span_can_be_left_open() {
        let runs = [StyleRun::new(2, state(|s| s.weight = Some(700)))];
        let options = SpanOptions {
            close_trailing: false,
            ..SpanOptions::default()
        };
        assert_eq!(
            serialize("abcd", &runs, &options),
            r#"ab<tspan style="dominant-baseline:inherit" font-weight="700">cd"#
        );
    }

    #[test]
    fn stripping_tags_gives_back_text() {
        let text = "alpha beta gamma";
        let runs = [
            StyleRun::new(0, state(|s| s.scale = Some(1.2))),
            StyleRun::new(3, StyleState::default()),
            StyleRun::new(3, state(|s| s.weight = Some(800))),
            StyleRun::new(9, state(|s| s.rise = Some(100))),
            StyleRun::new(40, StyleState::default()),
        ];
        for close_trailing in [true, false] {
            let options = SpanOptions {
                close_trailing,
                escape_text: false,
            };
            assert_eq!(strip_tags(&serialize(text, &runs, &options)), text);
        }
    }

    #[test]
    fn never_nests_or_closes_unopened() {
        let runs = [
            StyleRun::new(0, StyleState::default()),
            StyleRun::new(1, state(|s| s.weight = Some(700))),
            StyleRun::new(2, state(|s| s.weight = Some(400))),
            StyleRun::new(3, StyleState::default()),
            StyleRun::new(4, StyleState::default()),
            StyleRun::new(5, state(|s| s.style = Some(Slant::Italic))),
        ];
        let out = serialize("abcdefg", &runs, &SpanOptions::default());
        let mut depth = 0i32;
        let mut rest = out.as_str();
        while let Some(pos) = rest.find('<') {
            rest = &rest[pos..];
            if rest.starts_with(TSPAN_CLOSE) {
                depth -= 1;
            } else {
                depth += 1;
            }
            assert!((0..=1).contains(&depth), "{out}");
            rest = &rest[1..];
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn escapes_text_when_asked() {
        let runs = [StyleRun::new(2, state(|s| s.weight = Some(700)))];
        let options = SpanOptions {
            close_trailing: true,
            escape_text: true,
        };
        assert_eq!(
            serialize("a<b&", &runs, &options),
            r#"a&lt;<tspan style="dominant-baseline:inherit" font-weight="700">b&amp;</tspan>"#
        );
    }

    #[test]
    fn multibyte_text_splits_on_byte_offsets() {
        let runs = [
            StyleRun::new(2, state(|s| s.style = Some(Slant::Italic))),
            StyleRun::new(4, StyleState::default()),
        ];
        assert_eq!(
            serialize("éüa", &runs, &SpanOptions::default()),
            r#"é<tspan style="dominant-baseline:inherit" font-style="italic">ü</tspan>a"#
        );
    }

    #[test]
    fn offset_inside_a_character_is_replaced_not_dropped() {
        let runs = [StyleRun::new(1, state(|s| s.weight = Some(700)))];
        let out = serialize("éa", &runs, &SpanOptions::default());
        assert_eq!(
            out,
            "\u{FFFD}<tspan style=\"dominant-baseline:inherit\" font-weight=\"700\">\u{FFFD}a</tspan>"
        );
    }
}
