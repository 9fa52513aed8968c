//! Grouping and deduplication of flight-inspiration results
//!
//! Results come back from the inspiration search as a flat list. Before they
//! are numbered for the user they are clustered by destination country, then
//! by destination city, and exact duplicate itineraries are dropped.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, instrument};

use crate::FlightResult;

/// A record that can be recognised as "the same trip" as another record
pub trait Itinerary {
    type Key: Eq + Hash;

    /// Key identifying the itinerary for duplicate removal
    fn dedup_key(&self) -> Self::Key;
}

/// Stable partition: one bucket per distinct key, buckets in first-seen
/// key order, members in input order.
fn partition_by<T, K, F>(items: Vec<T>, key: F) -> Vec<Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<Vec<T>> = Vec::new();

    for item in items {
        let slot = *slots.entry(key(&item)).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(item);
    }

    buckets
}

/// Keep the first record of every itinerary in a bucket
fn dedup_bucket<T: Itinerary>(mut bucket: Vec<T>) -> Vec<T> {
    if bucket.len() < 2 {
        return bucket;
    }

    let mut seen = HashSet::new();
    bucket.retain(|record| seen.insert(record.dedup_key()));
    bucket
}

/// Group `results` by `primary_key`, then by `secondary_key`, removing
/// duplicate itineraries inside each secondary group.
///
/// Groups are emitted in the order their key first appears. The secondary
/// pass runs over the primary-ordered stream as a whole, so a secondary key
/// shared across two primary groups ends up in the first of them.
#[instrument(level = "debug", skip_all, fields(input = results.len()))]
pub fn group_and_dedup<T, P, S, FP, FS>(results: Vec<T>, primary_key: FP, secondary_key: FS) -> Vec<T>
where
    T: Itinerary,
    P: Eq + Hash,
    S: Eq + Hash,
    FP: Fn(&T) -> P,
    FS: Fn(&T) -> S,
{
    if results.is_empty() {
        return results;
    }

    let primary_groups = partition_by(results, primary_key);
    debug!(groups = primary_groups.len(), "Partitioned results by primary key");

    let ordered: Vec<T> = primary_groups.into_iter().flatten().collect();
    let secondary_groups = partition_by(ordered, secondary_key);
    debug!(groups = secondary_groups.len(), "Partitioned results by secondary key");

    let grouped: Vec<T> = secondary_groups.into_iter().flat_map(dedup_bucket).collect();
    debug!(output = grouped.len(), "Grouping completed");

    grouped
}

/// Order inspiration results by destination country, then destination city,
/// with duplicate itineraries removed
pub fn group_by_destination(results: Vec<FlightResult>) -> Vec<FlightResult> {
    group_and_dedup(
        results,
        |r: &FlightResult| r.destination_country.clone(),
        |r: &FlightResult| r.destination_city.clone(),
    )
}
