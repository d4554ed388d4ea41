use std::collections::HashMap;

use tokio::time::{Duration, Instant};

use crate::constants::TOMBSTONE_TTL;

/// Short-lived markers for deleted block ids. While a tombstone is
/// live, debounced saves and remote applies for that id are dropped
/// instead of erroring; entries expire after a bounded grace period so
/// the map never grows with the lifetime of the session.
#[derive(Debug)]
pub struct TombstoneSet {
    entries: HashMap<String, Instant>,
    ttl: Duration,
}

impl Default for TombstoneSet {
    fn default() -> Self {
        Self::new(TOMBSTONE_TTL)
    }
}

impl TombstoneSet {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn insert(&mut self, block_id: impl Into<String>) {
        self.entries.insert(block_id.into(), Instant::now() + self.ttl);
    }

    pub fn contains(&mut self, block_id: &str) -> bool {
        self.prune();
        self.entries.contains_key(block_id)
    }

    pub fn len(&mut self) -> usize {
        self.prune();
        self.entries.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    fn prune(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, expiry| *expiry > now);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tombstones_expire_after_grace_period() {
        let mut tombstones = TombstoneSet::default();
        tombstones.insert("b1");
        assert!(tombstones.contains("b1"));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(tombstones.contains("b1"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!tombstones.contains("b1"));
        assert!(tombstones.is_empty());
    }
}
