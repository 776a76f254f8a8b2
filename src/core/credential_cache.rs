use crate::core::types::AwsCredentials;
use crate::ports::AuthorizedRdsClient;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use moka::policy::EvictionPolicy;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct CachedRdsClient {
    pub client: AuthorizedRdsClient,
    pub credentials: AwsCredentials,
    pub inserted_at: Instant,
}

impl CachedRdsClient {
    pub(crate) fn new(client: AuthorizedRdsClient, credentials: AwsCredentials) -> Self {
        Self {
            client,
            credentials,
            inserted_at: Instant::now(),
        }
    }

    /// Valid while inside the cache window and the STS credentials have not expired.
    pub(crate) fn is_valid(&self, validity_window: Duration) -> bool {
        self.inserted_at.elapsed() < validity_window
            && self
                .credentials
                .expiry()
                .is_none_or(|expiry| expiry > SystemTime::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CredentialCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: u64,
}

/// Assumed-role RDS clients keyed by role ARN, bounded in size (LRU) and age.
pub(crate) struct CredentialCache {
    entries: Cache<String, Arc<CachedRdsClient>>,
    validity_window: Duration,

    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CredentialCache {
    pub(crate) fn new(max_capacity: u64, validity_window: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(validity_window)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self {
            entries,
            validity_window,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub(crate) fn validity_window(&self) -> Duration {
        self.validity_window
    }

    pub(crate) async fn get(&self, role_arn: &str) -> Option<Arc<CachedRdsClient>> {
        match self.entries.get(role_arn).await {
            Some(entry) if entry.is_valid(self.validity_window) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(role_arn, "Credential cache hit.");
                Some(entry)
            }
            Some(stale) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(role_arn, "Credential cache entry expired, discarding.");
                self.discard_if_current(role_arn, &stale).await;
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(role_arn, "Credential cache miss.");
                None
            }
        }
    }

    pub(crate) async fn put(&self, role_arn: String, entry: CachedRdsClient) -> Arc<CachedRdsClient> {
        let entry = Arc::new(entry);
        debug!(
            role_arn = %role_arn,
            expiry = ?entry.credentials.expiry(),
            "Storing assumed-role client in credential cache."
        );
        self.entries.insert(role_arn, Arc::clone(&entry)).await;
        entry
    }

    pub(crate) async fn evict(&self, role_arn: &str) {
        if self.entries.remove(role_arn).await.is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Removes `stale` only if it is still the entry stored for `role_arn`, so
    /// a client put by a concurrent request survives.
    async fn discard_if_current(&self, role_arn: &str, stale: &Arc<CachedRdsClient>) {
        let result = self
            .entries
            .entry_by_ref(role_arn)
            .and_compute_with(|current| {
                let op = match current {
                    Some(current) if Arc::ptr_eq(current.value(), stale) => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
        if matches!(result, CompResult::Removed(_)) {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[cfg(test)]
    pub(crate) async fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks().await;
    }

    pub(crate) fn stats(&self) -> CredentialCacheStats {
        CredentialCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            size: self.entries.entry_count(),
        }
    }
}
