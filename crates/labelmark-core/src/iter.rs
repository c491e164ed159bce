//! Change-point iteration over overlapping attribute ranges.

use crate::record::AttributeRecord;
use serde::Serialize;

/// A maximal `start..end` interval over which the same set of records is active.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttrSegment {
    pub start: usize,
    pub end: usize,
    /// Active records in list order; later entries take precedence.
    pub records: Vec<AttributeRecord>,
}

/// Splits `0..text_len` at every record boundary.
///
/// Segments are returned in increasing offset order and cover the whole text, including
/// stretches where no record is active. Record bounds past `text_len` are clamped; empty
/// records never become active.
pub fn iter_segments(records: &[AttributeRecord], text_len: usize) -> Vec<AttrSegment> {
    let clamp = |v: u32| (v as usize).min(text_len);

    let mut points = Vec::with_capacity(records.len() * 2 + 2);
    points.push(0);
    points.push(text_len);
    for rec in records {
        points.push(clamp(rec.start));
        points.push(clamp(rec.end));
    }
    points.sort_unstable();
    points.dedup();

    if points.len() == 1 {
        return vec![AttrSegment {
            start: 0,
            end: 0,
            records: Vec::new(),
        }];
    }

    points
        .windows(2)
        .map(|w| {
            let (start, end) = (w[0], w[1]);
            let active = records
                .iter()
                .filter(|rec| {
                    let (s, e) = (clamp(rec.start), clamp(rec.end));
                    s < e && s <= start && end <= e
                })
                .copied()
                .collect();
            AttrSegment {
                start,
                end,
                records: active,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AttrKind, AttrValue};

    fn rec(kind: AttrKind, start: u32, end: u32, value: i32) -> AttributeRecord {
        AttributeRecord {
            kind,
            start,
            end,
            value: Some(AttrValue::Int(value)),
        }
    }

    #[test]
    fn no_records_yields_one_segment_over_text() {
        let segs = iter_segments(&[], 5);
        assert_eq!(segs.len(), 1);
        assert_eq!((segs[0].start, segs[0].end), (0, 5));
        assert!(segs[0].records.is_empty());
    }

    #[test]
    fn empty_text_yields_single_empty_segment() {
        let segs = iter_segments(&[rec(AttrKind::Weight, 0, 3, 700)], 0);
        assert_eq!(segs.len(), 1);
        assert_eq!((segs[0].start, segs[0].end), (0, 0));
        assert!(segs[0].records.is_empty());
    }

    #[test]
    fn single_record_splits_text_in_three() {
        let weight = rec(AttrKind::Weight, 6, 10, 700);
        let segs = iter_segments(&[weight], 16);
        let bounds: Vec<_> = segs.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(bounds, vec![(0, 6), (6, 10), (10, 16)]);
        assert!(segs[0].records.is_empty());
        assert_eq!(segs[1].records, vec![weight]);
        assert!(segs[2].records.is_empty());
    }

    #[test]
    fn overlapping_records_keep_list_order() {
        let outer = rec(AttrKind::Weight, 0, 8, 700);
        let inner = rec(AttrKind::Weight, 2, 4, 300);
        let segs = iter_segments(&[outer, inner], 8);
        let bounds: Vec<_> = segs.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(bounds, vec![(0, 2), (2, 4), (4, 8)]);
        assert_eq!(segs[1].records, vec![outer, inner]);
        assert_eq!(segs[2].records, vec![outer]);
    }

    #[test]
    fn record_bounds_are_clamped_to_text() {
        let segs = iter_segments(&[rec(AttrKind::Rise, 2, 100, 5000)], 4);
        let bounds: Vec<_> = segs.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(bounds, vec![(0, 2), (2, 4)]);
        assert_eq!(segs[1].records.len(), 1);
    }
}
