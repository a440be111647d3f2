use serde::ser::{Serialize, SerializeMap, Serializer};

use super::row::{Record, Status};

/// Statuses ranked by `(lot, block)`. Index `i` is the i-th lot in that order
/// for this upload only; it means nothing across uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    statuses: Vec<Status>,
}

impl Dataset {
    /// Records sharing a `(lot, block)` pair keep their upload order.
    pub fn build(mut records: Vec<Record>) -> Self {
        records.sort_by_key(|r| (r.lot, r.block));
        Self {
            statuses: records.into_iter().map(|r| r.status).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Status> {
        self.statuses.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Status)> + '_ {
        self.statuses.iter().copied().enumerate()
    }

    pub fn sold_count(&self) -> usize {
        self.statuses.iter().filter(|s| **s == Status::Sold).count()
    }
}

// Serialized as an object keyed by decimal index, e.g. {"0":"SOLD","1":""}.
impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.statuses.len()))?;
        for (index, status) in self.iter() {
            map.serialize_entry(&index.to_string(), &status)?;
        }
        map.end()
    }
}
