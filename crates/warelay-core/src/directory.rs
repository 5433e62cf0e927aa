//! Multi-key in-memory tenant directory with cache-aside loader fallback.
//!
//! Four independent mappings (verify_token, phone_number_id, waba_id,
//! tenant_id) point at the same shared records. A record indexed once is
//! reachable through every key it defines. On a local miss, the async
//! resolvers consult an optional external [`TenantLoader`] and index the
//! result into all four maps, so one backing-store round trip amortizes
//! across future lookups by any key.
//!
//! The directory is an explicit object constructed at startup and passed by
//! handle, not ambient global state; tests build a fresh one each.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures_util::future::BoxFuture;

use warelay_types::error::DirectoryError;
use warelay_types::tenant::TenantRecord;

/// Async backing-store lookups consulted on cache miss.
///
/// Methods return boxed futures so the loader can live behind `Arc<dyn _>`.
pub trait TenantLoader: Send + Sync {
    fn by_verify_token<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, Result<Option<TenantRecord>, DirectoryError>>;

    fn by_phone_number_id<'a>(
        &'a self,
        phone_number_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<TenantRecord>, DirectoryError>>;

    fn by_waba_id<'a>(
        &'a self,
        waba_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<TenantRecord>, DirectoryError>>;
}

/// All four maps live in one struct behind one lock so an insert is atomic
/// with respect to readers: a concurrent lookup sees either none or all of a
/// record's keys, never a partially indexed tenant.
#[derive(Default)]
struct Index {
    by_verify_token: HashMap<String, Arc<TenantRecord>>,
    by_phone_id: HashMap<String, Arc<TenantRecord>>,
    by_waba_id: HashMap<String, Arc<TenantRecord>>,
    by_tenant_id: HashMap<String, Arc<TenantRecord>>,
}

/// The process-wide tenant index.
///
/// A pure cache-aside layer: when a loader is configured the backing store
/// is the source of truth and entries are never evicted (no TTL).
pub struct TenantDirectory {
    index: RwLock<Index>,
    loader: RwLock<Option<Arc<dyn TenantLoader>>>,
}

impl TenantDirectory {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(Index::default()),
            loader: RwLock::new(None),
        }
    }

    /// Attach the external backing-store loader consulted on cache miss.
    pub fn set_loader(&self, loader: Arc<dyn TenantLoader>) {
        *self.loader.write().unwrap_or_else(PoisonError::into_inner) = Some(loader);
    }

    // A poisoned lock means a reader panicked mid-lookup; the index itself
    // is still structurally consistent, so recover rather than propagate.
    fn read_index(&self) -> RwLockReadGuard<'_, Index> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_index(&self) -> RwLockWriteGuard<'_, Index> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn loader(&self) -> Option<Arc<dyn TenantLoader>> {
        self.loader
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Index a record under all of its keys.
    ///
    /// Validation happens before any map is touched, so a malformed record
    /// fails loudly instead of producing a partially indexed tenant.
    /// Re-indexing with the same keys is an idempotent overwrite.
    pub fn index(&self, record: TenantRecord) -> Result<Arc<TenantRecord>, DirectoryError> {
        validate(&record)?;
        let record = Arc::new(record);

        let mut index = self.write_index();
        index
            .by_verify_token
            .insert(record.verify_token.clone(), Arc::clone(&record));
        index
            .by_phone_id
            .insert(record.phone_number_id.clone(), Arc::clone(&record));
        if let Some(waba_id) = &record.waba_id {
            index.by_waba_id.insert(waba_id.clone(), Arc::clone(&record));
        }
        index
            .by_tenant_id
            .insert(record.tenant_id.clone(), Arc::clone(&record));
        Ok(record)
    }

    /// Index a batch of records (dev seeding). Returns how many were indexed.
    pub fn seed(
        &self,
        records: impl IntoIterator<Item = TenantRecord>,
    ) -> Result<usize, DirectoryError> {
        let mut count = 0;
        for record in records {
            self.index(record)?;
            count += 1;
        }
        Ok(count)
    }

    pub async fn resolve_by_verify_token(&self, token: &str) -> Option<Arc<TenantRecord>> {
        let key = token.trim();
        if let Some(tenant) = self.read_index().by_verify_token.get(key) {
            return Some(Arc::clone(tenant));
        }
        let loader = self.loader()?;
        let result = loader.by_verify_token(key).await;
        self.index_loaded(key, result)
    }

    pub async fn resolve_by_phone_number_id(&self, id: &str) -> Option<Arc<TenantRecord>> {
        let key = id.trim();
        if let Some(tenant) = self.read_index().by_phone_id.get(key) {
            return Some(Arc::clone(tenant));
        }
        let loader = self.loader()?;
        let result = loader.by_phone_number_id(key).await;
        self.index_loaded(key, result)
    }

    pub async fn resolve_by_waba_id(&self, id: &str) -> Option<Arc<TenantRecord>> {
        let key = id.trim();
        if let Some(tenant) = self.read_index().by_waba_id.get(key) {
            return Some(Arc::clone(tenant));
        }
        let loader = self.loader()?;
        let result = loader.by_waba_id(key).await;
        self.index_loaded(key, result)
    }

    /// Synchronous, local-only resolution for the outbound send path.
    ///
    /// Prefers an explicit tenant_id match over a phone_number_id match.
    /// Never consults the loader: the caller supplies an explicit hint here,
    /// not an attacker-controlled webhook payload.
    pub fn resolve_for_send(
        &self,
        tenant_id: Option<&str>,
        phone_number_id: Option<&str>,
    ) -> Option<Arc<TenantRecord>> {
        let index = self.read_index();
        if let Some(tenant) = tenant_id.and_then(|id| index.by_tenant_id.get(id.trim())) {
            return Some(Arc::clone(tenant));
        }
        if let Some(tenant) = phone_number_id.and_then(|id| index.by_phone_id.get(id.trim())) {
            return Some(Arc::clone(tenant));
        }
        None
    }

    /// Phone-number-id keys currently indexed (debug endpoint).
    pub fn phone_number_ids(&self) -> Vec<String> {
        self.read_index().by_phone_id.keys().cloned().collect()
    }

    /// Number of distinct tenants indexed.
    pub fn len(&self) -> usize {
        self.read_index().by_tenant_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index a loader hit into all four maps.
    ///
    /// Two concurrent misses for the same key may both reach the loader;
    /// the second index call is a harmless overwrite.
    fn index_loaded(
        &self,
        key: &str,
        result: Result<Option<TenantRecord>, DirectoryError>,
    ) -> Option<Arc<TenantRecord>> {
        match result {
            Ok(Some(record)) => match self.index(record) {
                Ok(tenant) => Some(tenant),
                Err(err) => {
                    tracing::error!(key, error = %err, "loader returned malformed tenant record");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(key, error = %err, "tenant loader lookup failed");
                None
            }
        }
    }
}

impl Default for TenantDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(record: &TenantRecord) -> Result<(), DirectoryError> {
    if record.tenant_id.trim().is_empty() {
        return Err(DirectoryError::MissingField("tenant_id"));
    }
    if record.phone_number_id.trim().is_empty() {
        return Err(DirectoryError::MissingField("phone_number_id"));
    }
    if record.verify_token.trim().is_empty() {
        return Err(DirectoryError::MissingField("verify_token"));
    }
    if record.access_token.trim().is_empty() {
        return Err(DirectoryError::MissingField("access_token"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::json;

    fn tenant(tenant_id: &str, phone_id: &str, token: &str, waba: Option<&str>) -> TenantRecord {
        serde_json::from_value(json!({
            "tenant_id": tenant_id,
            "display_name": format!("Tenant {tenant_id}"),
            "waba_id": waba,
            "phone_number_id": phone_id,
            "verify_token": token,
            "access_token": "access-token",
            "engine": {"type": "rules"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn indexed_tenant_is_reachable_via_every_key() {
        let directory = TenantDirectory::new();
        directory
            .index(tenant("t1", "555", "tok1", Some("w1")))
            .unwrap();

        assert!(directory.resolve_by_verify_token("tok1").await.is_some());
        assert!(directory.resolve_by_phone_number_id("555").await.is_some());
        assert!(directory.resolve_by_waba_id("w1").await.is_some());
        assert!(directory.resolve_for_send(Some("t1"), None).is_some());
    }

    #[tokio::test]
    async fn string_and_numeric_wire_keys_resolve_identically() {
        let directory = TenantDirectory::new();
        let record: TenantRecord = serde_json::from_value(json!({
            "tenant_id": "t1",
            "display_name": "Numeric",
            "phone_number_id": 123,
            "verify_token": "tok",
            "access_token": "at",
            "engine": {"type": "rules"}
        }))
        .unwrap();
        directory.index(record).unwrap();

        // A later payload delivering the id as the string "123" hits the
        // same entry.
        assert!(directory.resolve_by_phone_number_id("123").await.is_some());
    }

    #[tokio::test]
    async fn reindexing_overwrites_without_duplicating() {
        let directory = TenantDirectory::new();
        directory.index(tenant("t1", "555", "tok1", None)).unwrap();
        directory.index(tenant("t1", "555", "tok1", None)).unwrap();

        assert_eq!(directory.len(), 1);
        assert_eq!(directory.phone_number_ids(), vec!["555".to_string()]);
    }

    #[tokio::test]
    async fn resolve_for_send_prefers_tenant_id_over_phone_id() {
        let directory = TenantDirectory::new();
        directory.index(tenant("a", "111", "tok-a", None)).unwrap();
        directory.index(tenant("b", "222", "tok-b", None)).unwrap();

        let hit = directory
            .resolve_for_send(Some("a"), Some("222"))
            .expect("tenant resolves");
        assert_eq!(hit.tenant_id, "a");
    }

    #[tokio::test]
    async fn unresolved_lookups_return_none_without_a_loader() {
        let directory = TenantDirectory::new();
        assert!(directory.resolve_by_verify_token("nope").await.is_none());
        assert!(directory.resolve_by_phone_number_id("0").await.is_none());
        assert!(directory.resolve_by_waba_id("0").await.is_none());
        assert!(directory.resolve_for_send(Some("x"), Some("y")).is_none());
    }

    #[test]
    fn malformed_record_fails_before_indexing() {
        let directory = TenantDirectory::new();
        let mut record = tenant("t1", "555", "tok1", None);
        record.access_token = String::new();

        assert!(matches!(
            directory.index(record),
            Err(DirectoryError::MissingField("access_token"))
        ));
        assert!(directory.is_empty());
        assert!(directory.phone_number_ids().is_empty());
    }

    struct SlowLoader {
        calls: AtomicUsize,
    }

    impl TenantLoader for SlowLoader {
        fn by_verify_token<'a>(
            &'a self,
            _token: &'a str,
        ) -> BoxFuture<'a, Result<Option<TenantRecord>, DirectoryError>> {
            Box::pin(async { Ok(None) })
        }

        fn by_phone_number_id<'a>(
            &'a self,
            phone_number_id: &'a str,
        ) -> BoxFuture<'a, Result<Option<TenantRecord>, DirectoryError>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(25)).await;
                Ok(Some(tenant("loaded", phone_number_id, "loaded-tok", Some("w9"))))
            })
        }

        fn by_waba_id<'a>(
            &'a self,
            _waba_id: &'a str,
        ) -> BoxFuture<'a, Result<Option<TenantRecord>, DirectoryError>> {
            Box::pin(async { Ok(None) })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_cache_misses_leave_one_consistent_record() {
        let directory = Arc::new(TenantDirectory::new());
        directory.set_loader(Arc::new(SlowLoader {
            calls: AtomicUsize::new(0),
        }));

        let a = {
            let directory = Arc::clone(&directory);
            tokio::spawn(async move { directory.resolve_by_phone_number_id("777").await })
        };
        let b = {
            let directory = Arc::clone(&directory);
            tokio::spawn(async move { directory.resolve_by_phone_number_id("777").await })
        };
        let (a, b) = (a.await.unwrap(), b.await.unwrap());

        assert!(a.is_some() && b.is_some());
        // Both racers may have hit the loader; the second index call is a
        // harmless overwrite and the record stays reachable via every key.
        assert_eq!(directory.len(), 1);
        assert!(directory.resolve_by_verify_token("loaded-tok").await.is_some());
        assert!(directory.resolve_by_waba_id("w9").await.is_some());
        assert!(directory.resolve_for_send(Some("loaded"), None).is_some());
    }

    #[tokio::test]
    async fn loader_miss_is_not_cached_as_a_hit() {
        let directory = TenantDirectory::new();
        directory.set_loader(Arc::new(SlowLoader {
            calls: AtomicUsize::new(0),
        }));
        assert!(directory.resolve_by_waba_id("unknown").await.is_none());
        assert!(directory.is_empty());
    }
}
