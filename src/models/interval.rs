use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Closed-open time interval between two absolute instants.
/// Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Start instant (UTC)
    pub start: DateTime<Utc>,
    /// End instant (UTC)
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create a new interval, rejecting inverted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Length of the interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Check if a given instant lies inside this interval (inclusive start, exclusive end).
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// Check if this interval overlaps with another.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection with another interval, or `None` when the two are disjoint.
    ///
    /// A shared boundary instant yields a zero-length interval rather than
    /// `None`; callers filtering by a positive minimum duration discard it.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        Self::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::Interval;
    use chrono::{DateTime, Duration, Utc};

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&format!("2024-10-23T{hour:02}:{min:02}:00Z"))
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        assert!(Interval::new(at(10, 0), at(9, 0)).is_none());
        assert!(Interval::new(at(9, 0), at(10, 0)).is_some());
    }

    #[test]
    fn test_new_accepts_zero_length() {
        let iv = Interval::new(at(9, 0), at(9, 0)).unwrap();
        assert_eq!(iv.duration(), Duration::zero());
    }

    #[test]
    fn test_duration() {
        let iv = Interval::new(at(9, 0), at(10, 30)).unwrap();
        assert_eq!(iv.duration(), Duration::minutes(90));
    }

    #[test]
    fn test_contains_half_open() {
        let iv = Interval::new(at(9, 0), at(10, 0)).unwrap();
        assert!(iv.contains(at(9, 0)));
        assert!(iv.contains(at(9, 59)));
        assert!(!iv.contains(at(10, 0)));
    }

    #[test]
    fn test_overlaps() {
        let a = Interval::new(at(9, 0), at(10, 0)).unwrap();
        let b = Interval::new(at(9, 30), at(10, 30)).unwrap();
        let c = Interval::new(at(10, 0), at(11, 0)).unwrap();

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Touching intervals do not overlap.
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_intersect() {
        let a = Interval::new(at(9, 0), at(10, 0)).unwrap();
        let b = Interval::new(at(9, 30), at(10, 30)).unwrap();

        let overlap = a.intersect(&b).unwrap();
        assert_eq!(overlap.start, at(9, 30));
        assert_eq!(overlap.end, at(10, 0));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Interval::new(at(9, 0), at(10, 0)).unwrap();
        let b = Interval::new(at(11, 0), at(12, 0)).unwrap();
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn test_intersect_touching_is_zero_length() {
        let a = Interval::new(at(9, 0), at(10, 0)).unwrap();
        let b = Interval::new(at(10, 0), at(11, 0)).unwrap();
        let overlap = a.intersect(&b).unwrap();
        assert_eq!(overlap.duration(), Duration::zero());
    }

    #[test]
    fn test_serde_rfc3339_roundtrip() {
        let iv = Interval::new(at(9, 0), at(21, 0)).unwrap();
        let json = serde_json::to_string(&iv).unwrap();
        assert!(json.contains("2024-10-23T09:00:00Z"));
        let back: Interval = serde_json::from_str(&json).unwrap();
        assert_eq!(back, iv);
    }
}
