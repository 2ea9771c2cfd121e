pub mod io;
pub mod srt;

pub use io::{default_output_path, load_track, save_track, OutputTarget};

use serde::Serialize;
use std::ops::{Index, Range};

/// Millisecond timestamp or duration. Signed so overlaps show up as negative gaps.
pub type Millis = i64;

/// Gap reported for the first subtitle, which has no predecessor.
pub const NO_PREDECESSOR_GAP: Millis = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subtitle {
    /// Ordinal from the source file, used only for reporting.
    pub index: usize,
    pub start: Millis,
    pub end: Millis,
    pub text: String,
}

impl Subtitle {
    pub fn new(index: usize, start: Millis, end: Millis, text: impl Into<String>) -> Self {
        Self {
            index,
            start,
            end,
            text: text.into(),
        }
    }

    pub fn duration(&self) -> Millis {
        self.end - self.start
    }

    /// Number of characters shown, not counting line breaks.
    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| *c != '\n' && *c != '\r').count()
    }

    /// Reading speed, or `None` when the subtitle has no positive duration.
    pub fn chars_per_sec(&self) -> Option<f64> {
        let duration = self.duration();
        if duration <= 0 {
            return None;
        }
        Some(self.char_count() as f64 / (duration as f64 / 1000.0))
    }
}

/// An ordered subtitle track, sorted by start time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    subs: Vec<Subtitle>,
}

impl Track {
    pub fn new(mut subs: Vec<Subtitle>) -> Self {
        subs.sort_by_key(|s| s.start);
        Self { subs }
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subtitle> {
        self.subs.iter()
    }

    pub fn as_slice(&self) -> &[Subtitle] {
        &self.subs
    }

    pub fn last(&self) -> Option<&Subtitle> {
        self.subs.last()
    }

    /// Only end times may be changed through the track.
    pub fn set_end(&mut self, pos: usize, end: Millis) {
        self.subs[pos].end = end;
    }

    /// `track[i].start - track[i-1].end`, or [`NO_PREDECESSOR_GAP`] for the first entry.
    pub fn gap(&self, pos: usize) -> Millis {
        if pos == 0 {
            return NO_PREDECESSOR_GAP;
        }
        self.subs[pos].start - self.subs[pos - 1].end
    }

    /// Keep only `range` and renumber the kept entries from 1.
    pub fn crop(&mut self, range: Range<usize>) {
        self.subs.truncate(range.end);
        self.subs.drain(..range.start);
        for (i, sub) in self.subs.iter_mut().enumerate() {
            sub.index = i + 1;
        }
    }

    pub fn into_inner(self) -> Vec<Subtitle> {
        self.subs
    }
}

impl Index<usize> for Track {
    type Output = Subtitle;

    fn index(&self, pos: usize) -> &Subtitle {
        &self.subs[pos]
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Subtitle;
    type IntoIter = std::slice::Iter<'a, Subtitle>;

    fn into_iter(self) -> Self::IntoIter {
        self.subs.iter()
    }
}

#[cfg(test)]
pub(crate) fn track_from(spans: &[(Millis, Millis, &str)]) -> Track {
    Track::new(
        spans
            .iter()
            .enumerate()
            .map(|(i, (start, end, text))| Subtitle::new(i + 1, *start, *end, *text))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_and_reading_speed() {
        let sub = Subtitle::new(1, 1000, 3000, "Hello,\nworld!");
        assert_eq!(sub.duration(), 2000);
        assert_eq!(sub.char_count(), 12);
        assert_eq!(sub.chars_per_sec(), Some(6.0));
    }

    #[test]
    fn test_reading_speed_without_duration() {
        assert_eq!(Subtitle::new(1, 1000, 1000, "abc").chars_per_sec(), None);
        assert_eq!(Subtitle::new(1, 1000, 900, "abc").chars_per_sec(), None);
    }

    #[test]
    fn test_char_count_is_unicode_aware() {
        assert_eq!(Subtitle::new(1, 0, 1, "café ñ").char_count(), 6);
    }

    #[test]
    fn test_track_sorts_by_start() {
        let track = track_from(&[(2000, 3000, "b"), (0, 1000, "a")]);
        assert_eq!(track[0].text, "a");
        assert_eq!(track[1].text, "b");
    }

    #[test]
    fn test_gap() {
        let track = track_from(&[(0, 1000, "a"), (1050, 2000, "b"), (1900, 2500, "c")]);
        assert_eq!(track.gap(0), NO_PREDECESSOR_GAP);
        assert_eq!(track.gap(1), 50);
        assert_eq!(track.gap(2), -100);
    }

    #[test]
    fn test_crop_renumbers() {
        let mut track = track_from(&[(0, 1, "a"), (2, 3, "b"), (4, 5, "c"), (6, 7, "d")]);
        track.crop(1..3);
        assert_eq!(track.len(), 2);
        assert_eq!(track[0].text, "b");
        assert_eq!(track[0].index, 1);
        assert_eq!(track[1].text, "c");
        assert_eq!(track[1].index, 2);
    }
}
