use crate::Tree;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y:%m:%d %H:%M:%S",
];

fn parse(raw: &str) -> Option<(NaiveDate, DateTime<Utc>)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let (date, instant) = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        (dt.date_naive(), dt.with_timezone(&Utc))
    } else if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        (naive.date(), naive.and_utc())
    } else {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        (date, date.and_hms_opt(0, 0, 0)?.and_utc())
    };
    // Keys are four-digit years
    (1..=9999).contains(&date.year()).then_some((date, instant))
}

/// Calendar date a timestamp is written in, in its own offset.
pub fn capture_date(raw: &str) -> Option<NaiveDate> {
    parse(raw).map(|(date, _)| date)
}

/// Point in time a timestamp denotes; offset-less values are read as UTC.
pub fn capture_instant(raw: &str) -> Option<DateTime<Utc>> {
    parse(raw).map(|(_, instant)| instant)
}

/// A date level entry: zero-padded key and the number of items below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: String,
    pub count: usize,
}

/// Items grouped by capture year, month and day, plus an `Unknown` bucket.
#[derive(Debug, Clone)]
pub struct DateTree<T> {
    known: Tree<T>,
    unknown: Vec<T>,
}

impl<T> Default for DateTree<T> {
    fn default() -> Self {
        DateTree {
            known: Tree::default(),
            unknown: Vec::new(),
        }
    }
}

impl<T> DateTree<T> {
    pub fn build<I, F>(items: I, time_of: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Option<&str>,
    {
        let mut tree = DateTree::default();
        for item in items {
            match time_of(&item).and_then(capture_date) {
                Some(date) => {
                    let keys = [
                        format!("{:04}", date.year()),
                        format!("{:02}", date.month()),
                        format!("{:02}", date.day()),
                    ];
                    tree.known.insert(&keys, item, "", "-");
                }
                None => tree.unknown.push(item),
            }
        }
        tree
    }

    fn buckets(node: Option<&Tree<T>>) -> Vec<Bucket> {
        node.map(|n| {
            n.children()
                .map(|(key, child)| Bucket {
                    key: key.to_string(),
                    count: child.descendant_count(),
                })
                .collect()
        })
        .unwrap_or_default()
    }

    pub fn years(&self) -> Vec<Bucket> {
        Self::buckets(Some(&self.known))
    }

    pub fn months(&self, year: &str) -> Vec<Bucket> {
        Self::buckets(self.known.descend(&[year]))
    }

    pub fn days(&self, year: &str, month: &str) -> Vec<Bucket> {
        Self::buckets(self.known.descend(&[year, month]))
    }

    /// Items captured on one day; empty when the day has none.
    pub fn items(&self, year: &str, month: &str, day: &str) -> &[T] {
        self.known
            .descend(&[year, month, day])
            .map(Tree::items)
            .unwrap_or(&[])
    }

    /// Items without a usable capture time.
    pub fn unknown(&self) -> &[T] {
        &self.unknown
    }

    pub fn len(&self) -> usize {
        self.known.descendant_count() + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 5).unwrap();
        for raw in [
            "2023-07-05T10:00:00Z",
            "2023-07-05T23:30:00-08:00",
            "2023-07-05 10:00:00",
            "2023-07-05 10:00:00.250",
            "2023-07-05T10:00:00",
            "2023:07:05 10:00:00",
            "2023-07-05",
        ] {
            assert_eq!(capture_date(raw), Some(expected), "{raw}");
        }
    }

    #[test]
    fn test_capture_date_rejects_garbage() {
        for raw in ["", "   ", "yesterday", "2023-13-01", "0000-01-01"] {
            assert_eq!(capture_date(raw), None, "{raw}");
        }
    }

    #[test]
    fn test_offset_date_stays_as_written() {
        // Late evening west of UTC is already the next day in UTC
        let raw = "2023-12-31T22:00:00-05:00";
        assert_eq!(capture_date(raw), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(capture_instant(raw).unwrap().year(), 2024);
    }

    #[test]
    fn test_levels_and_counts() {
        let items = vec![
            Some("2023-07-05T10:00:00Z"),
            Some("2023-07-05T11:00:00Z"),
            Some("2023-07-06T11:00:00Z"),
            Some("2022-01-01T00:00:00Z"),
            None,
            Some("not a date"),
        ];
        let tree = DateTree::build(items, |t| *t);

        assert_eq!(
            tree.years(),
            vec![
                Bucket { key: "2022".into(), count: 1 },
                Bucket { key: "2023".into(), count: 3 },
            ]
        );
        assert_eq!(tree.months("2023"), vec![Bucket { key: "07".into(), count: 3 }]);
        assert_eq!(tree.days("2023", "07").len(), 2);
        assert_eq!(tree.items("2023", "07", "05").len(), 2);
        assert!(tree.items("2023", "08", "01").is_empty());
        assert!(tree.months("1999").is_empty());
        assert_eq!(tree.unknown().len(), 2);
        assert_eq!(tree.len(), 6);
    }
}
