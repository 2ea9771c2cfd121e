use crate::config::Config;
use crate::error::{Result, SubfixError};
use crate::locate::find_next_big_gap;
use crate::subtitle::{Millis, Track};
use serde::Serialize;
use std::ops::Range;

/// A contiguous run of subtitles between two split points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub range: Range<usize>,
    pub start: Millis,
    pub end: Millis,
    /// Silence before the first subtitle of the segment (none for the first segment).
    pub gap_before: Option<Millis>,
}

/// Segment boundaries: exclusive end positions, strictly increasing, ending at `track.len()`.
///
/// Anchors are placed every `split_interval_ms` of track time. Each anchor is moved
/// forward to the next gap of at least `split_gap_ms`, so no line is cut.
pub fn compute_splits(track: &Track, config: &Config) -> Result<Vec<usize>> {
    if config.split_interval_ms <= 0 {
        return Err(SubfixError::Config(
            "Split interval must be greater than 0".to_string(),
        ));
    }
    let last_end = track
        .iter()
        .map(|s| s.end)
        .max()
        .ok_or(SubfixError::EmptyTrack)?;

    let mut splits: Vec<usize> = Vec::new();
    let mut anchor = config.split_interval_ms;
    while anchor <= last_end {
        let pos = find_next_big_gap(track, anchor, config.split_gap_ms);
        if pos == track.len() {
            break;
        }
        if splits.last().map_or(true, |&prev| pos > prev) {
            splits.push(pos);
        }
        anchor += config.split_interval_ms;
    }
    splits.push(track.len());

    Ok(splits)
}

/// Turn boundaries from [`compute_splits`] into position ranges beginning at `first`.
pub fn segments(first: usize, splits: &[usize]) -> Vec<Range<usize>> {
    let mut begin = first;
    splits
        .iter()
        .map(|&end| {
            let range = begin..end;
            begin = end;
            range
        })
        .collect()
}

pub fn describe(track: &Track, first: usize, splits: &[usize]) -> Vec<Segment> {
    segments(first, splits)
        .into_iter()
        .filter(|range| !range.is_empty())
        .map(|range| Segment {
            start: track[range.start].start,
            end: track[range.end - 1].end,
            gap_before: (range.start > 0).then(|| track.gap(range.start)),
            range,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::track_from;

    fn config(interval: Millis, gap: Millis) -> Config {
        Config {
            split_interval_ms: interval,
            split_gap_ms: gap,
            ..Default::default()
        }
    }

    fn long_track() -> Track {
        // One subtitle per second, with a 3s silence before positions 8 and 15
        let mut spans = Vec::new();
        let mut t = 0;
        for i in 0..20 {
            if i == 8 || i == 15 {
                t += 3000;
            }
            spans.push((t, t + 800, "line"));
            t += 1000;
        }
        track_from(&spans)
    }

    #[test]
    fn test_empty_track_is_an_error() {
        let err = compute_splits(&Track::default(), &config(1000, 500)).unwrap_err();
        assert!(matches!(err, SubfixError::EmptyTrack));
    }

    #[test]
    fn test_single_segment_without_big_gaps() {
        let track = track_from(&[(0, 800, "a"), (1000, 1800, "b")]);
        assert_eq!(compute_splits(&track, &config(500, 2000)).unwrap(), vec![2]);
    }

    #[test]
    fn test_splits_at_big_gaps() {
        let track = long_track();
        let splits = compute_splits(&track, &config(5000, 2000)).unwrap();

        assert_eq!(splits, vec![8, 15, 20]);
        for pair in splits.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for &cut in &splits[..splits.len() - 1] {
            assert!(track.gap(cut) >= 2000);
        }
    }

    #[test]
    fn test_interval_longer_than_track() {
        let track = long_track();
        let splits = compute_splits(&track, &config(60_000, 2000)).unwrap();
        assert_eq!(splits, vec![20]);
    }

    #[test]
    fn test_segments_and_describe() {
        let track = long_track();
        let splits = vec![8, 15, 20];

        assert_eq!(segments(0, &splits), vec![0..8, 8..15, 15..20]);
        assert_eq!(segments(3, &[5, 9]), vec![3..5, 5..9]);

        let described = describe(&track, 0, &splits);
        assert_eq!(described.len(), 3);
        assert_eq!(described[0].start, 0);
        assert_eq!(described[0].gap_before, None);
        assert_eq!(described[1].gap_before, Some(3200));
        assert_eq!(described[2].end, track[19].end);
    }
}
