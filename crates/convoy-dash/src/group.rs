//! Calendar-day grouping of fetched lists.
//!
//! Partitions a flat, server-ordered list into date-labeled buckets for
//! display. Groups appear in first-occurrence order of their day, and items
//! keep their relative order inside each group.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use convoy_core::types::{Event, EventDelivery};

/// Anything with a creation timestamp that can be bucketed by day.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

impl<T: Timestamped> Timestamped for &T {
    fn created_at(&self) -> DateTime<Utc> {
        (*self).created_at()
    }
}

impl Timestamped for Event {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for EventDelivery {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One display bucket: a day label and the items created on that day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<T> {
    /// Day-granularity label, e.g. "05 Jan, 2024". No time component.
    pub label: String,
    pub items: Vec<T>,
}

/// Formats a timestamp as the group label for its UTC calendar day.
///
/// Timestamps on the same UTC day always produce the same label, so items
/// that differ only in time of day collapse into one group.
pub fn day_label(ts: DateTime<Utc>) -> String {
    ts.format("%d %b, %Y").to_string()
}

/// Buckets items by UTC calendar day, preserving input order.
///
/// Single pass; group order reflects the first occurrence of each distinct
/// day in the input, and every item lands in exactly one group. An empty
/// input yields an empty grouping.
pub fn group_by_day<T: Timestamped>(items: impl IntoIterator<Item = T>) -> Vec<DayGroup<T>> {
    let mut groups: Vec<DayGroup<T>> = Vec::new();
    let mut index_by_label: HashMap<String, usize> = HashMap::new();

    for item in items {
        let label = day_label(item.created_at());
        match index_by_label.get(&label) {
            Some(&i) => groups[i].items.push(item),
            None => {
                index_by_label.insert(label.clone(), groups.len());
                groups.push(DayGroup {
                    label,
                    items: vec![item],
                });
            }
        }
    }

    groups
}

/// Flattens a grouping back into the item sequence it was built from.
pub fn flatten<T>(groups: Vec<DayGroup<T>>) -> Vec<T> {
    groups.into_iter().flat_map(|g| g.items).collect()
}
