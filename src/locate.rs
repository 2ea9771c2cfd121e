use crate::subtitle::{Millis, Track};

/// Position of the first subtitle whose end is at or after `time`, or `track.len()`.
pub fn locate(track: &Track, time: Millis) -> usize {
    track.as_slice().partition_point(|sub| sub.end < time)
}

/// First position at or after `from` whose gap to its predecessor is at least `threshold`.
///
/// Position 0 is never returned, since the start of the track is not a split point.
/// Returns `track.len()` when no such gap exists.
pub fn find_next_big_gap(track: &Track, from: Millis, threshold: Millis) -> usize {
    let start = locate(track, from).max(1);
    (start..track.len())
        .find(|&pos| track.gap(pos) >= threshold)
        .unwrap_or(track.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::track_from;

    fn sample() -> Track {
        track_from(&[
            (0, 1000, "a"),
            (1200, 2000, "b"),
            (5000, 6000, "c"),
            (6100, 7000, "d"),
            (10000, 11000, "e"),
        ])
    }

    #[test]
    fn test_locate_bounds() {
        let track = sample();
        assert_eq!(locate(&track, -5), 0);
        assert_eq!(locate(&track, 0), 0);
        assert_eq!(locate(&track, 11000), 4);
        assert_eq!(locate(&track, 11001), 5);
    }

    #[test]
    fn test_locate_inside_and_between() {
        let track = sample();
        assert_eq!(locate(&track, 1000), 0);
        assert_eq!(locate(&track, 1001), 1);
        assert_eq!(locate(&track, 1500), 1);
        assert_eq!(locate(&track, 3000), 2);
    }

    #[test]
    fn test_locate_empty_track() {
        assert_eq!(locate(&Track::default(), 100), 0);
    }

    #[test]
    fn test_find_next_big_gap() {
        let track = sample();
        assert_eq!(find_next_big_gap(&track, 0, 2000), 2);
        // 5500 falls inside "c", which itself follows a big gap
        assert_eq!(find_next_big_gap(&track, 5500, 2000), 2);
        assert_eq!(find_next_big_gap(&track, 6500, 2000), 4);
        assert_eq!(find_next_big_gap(&track, 11001, 2000), 5);
    }

    #[test]
    fn test_find_next_big_gap_skips_track_start() {
        let track = sample();
        // The first entry's sentinel gap would qualify, but the start is never a cut.
        assert_eq!(find_next_big_gap(&track, 0, 100), 1);
        assert_eq!(find_next_big_gap(&track, 0, 10_000), 5);
    }
}
