//! Time-expiring member snapshot cache.

use std::time::Duration;

use metrics::counter;
use moka::sync::Cache;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::config::CacheSettings;
use crate::domain::entities::MemberRecord;

pub const CACHE_HIT_TOTAL: &str = "pkblog_member_cache_hit_total";
pub const CACHE_MISS_TOTAL: &str = "pkblog_member_cache_miss_total";
pub const CACHE_INSERT_TOTAL: &str = "pkblog_member_cache_insert_total";

/// Member id → snapshot, each entry living for a fixed TTL after insertion.
///
/// Expired entries are never returned; [`MemberCache::purge`] reclaims their
/// memory and is driven by [`spawn_purge_task`].
#[derive(Clone)]
pub struct MemberCache {
    members: Cache<String, MemberRecord>,
}

impl MemberCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let members = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { members }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.ttl, settings.max_capacity.get())
    }

    pub fn get(&self, member_id: &str) -> Option<MemberRecord> {
        match self.members.get(member_id) {
            Some(member) => {
                trace!(target = "pkblog::cache", member_id, "member cache hit");
                counter!(CACHE_HIT_TOTAL).increment(1);
                Some(member)
            }
            None => {
                counter!(CACHE_MISS_TOTAL).increment(1);
                None
            }
        }
    }

    /// Insert or overwrite, restarting the entry's TTL.
    pub fn put(&self, member_id: &str, member: MemberRecord) {
        debug!(target = "pkblog::cache", member_id, "updating member cache");
        self.members.insert(member_id.to_string(), member);
        counter!(CACHE_INSERT_TOTAL).increment(1);
    }

    /// Drop expired entries now instead of waiting for moka's own housekeeping.
    pub fn purge(&self) {
        self.members.run_pending_tasks();
    }

    pub fn len(&self) -> u64 {
        self.members.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Periodically purge expired entries until the returned handle is aborted.
pub fn spawn_purge_task(cache: MemberCache, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await; // Skip the first immediate tick
        loop {
            interval.tick().await;
            cache.purge();
            debug!(
                target = "pkblog::cache",
                entries = cache.len(),
                "purged expired members"
            );
        }
    })
}
