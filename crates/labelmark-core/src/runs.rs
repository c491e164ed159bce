use crate::iter::AttrSegment;
use crate::style::{StyleAttribute, StyleRun, StyleState};

/// Folds ordered segments into one [`StyleRun`] per distinct start offset.
///
/// Runs with an empty state are kept: they mark where formatting stops. A segment that does not
/// advance past the previous start is merged into the previous run, with its records applied on
/// top (last write wins per dimension).
pub fn compact(segments: &[AttrSegment]) -> Vec<StyleRun> {
    let mut runs: Vec<StyleRun> = Vec::with_capacity(segments.len());

    for segment in segments {
        let merge = runs.last().is_some_and(|last| segment.start <= last.start);
        if !merge {
            runs.push(StyleRun::new(segment.start, StyleState::default()));
        }
        let Some(run) = runs.last_mut() else {
            continue;
        };
        for attr in segment.records.iter().filter_map(StyleAttribute::from_record) {
            run.state.apply(attr);
        }
        tracing::trace!(start = run.start, state = ?run.state, "style run");
    }

    runs
}
