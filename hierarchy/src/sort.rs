use crate::date::capture_instant;
use api_client::{Album, PhotoPath, Photograph};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

pub trait Identified {
    fn id(&self) -> u64;
}

pub trait Timestamped {
    /// Time used for ordering: capture time, else creation time.
    fn sort_time(&self) -> Option<DateTime<Utc>>;
}

impl Identified for Photograph {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Timestamped for Photograph {
    fn sort_time(&self) -> Option<DateTime<Utc>> {
        self.time
            .as_deref()
            .and_then(capture_instant)
            .or(self.created_at)
    }
}

impl Identified for PhotoPath {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Timestamped for PhotoPath {
    fn sort_time(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Identified for Album {
    fn id(&self) -> u64 {
        self.id
    }
}

impl<T: Identified> Identified for &T {
    fn id(&self) -> u64 {
        (**self).id()
    }
}

impl<T: Timestamped> Timestamped for &T {
    fn sort_time(&self) -> Option<DateTime<Utc>> {
        (**self).sort_time()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Id,
    Time,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: Direction,
}

impl SortOrder {
    pub fn new(key: SortKey, direction: Direction) -> Self {
        SortOrder { key, direction }
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
    }

    fn compare<T: Identified + Timestamped>(&self, a: &T, b: &T) -> Ordering {
        let ordering = match self.key {
            SortKey::Id => a.id().cmp(&b.id()),
            // Items without any time come first when ascending
            SortKey::Time => a.sort_time().cmp(&b.sort_time()),
        };
        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// Stable sort: equal keys keep their input order in both directions.
pub fn sort_items<T: Identified + Timestamped>(items: &mut [T], order: SortOrder) {
    items.sort_by(|a, b| order.compare(a, b));
}
