//! The progress store - sole owner of the technology collection.

use techtrack_core::{
    seed_technologies, snapshot, CoreError, Date, NewTechnology, ProgressSummary, Result, Technology,
    TechnologyFilter, TechnologyId, TechnologyPatch, TechnologyStatus,
};
use techtrack_storage::KeyValueStore;
use tracing::{debug, info, warn};
use crate::deadline;
use crate::selector::{RandomSource, ThreadRandom};

/// Storage key for the persisted collection. Bump the suffix when the
/// snapshot format changes incompatibly.
pub const STORAGE_KEY: &str = "techtrack.technologies.v1";

/// Configuration for the progress store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Key the collection is persisted under
    pub storage_key: String,
    /// Collection used when nothing valid is persisted
    pub seed: Vec<Technology>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            seed: seed_technologies(),
        }
    }
}

/// Where the collection came from when the store was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Decoded from the persisted snapshot
    Restored,
    /// Fell back to the seed collection
    Seeded(SeedReason),
}

/// Why the seed collection was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedReason {
    /// Nothing stored under the key
    Missing,
    /// The backend failed to read
    Unreadable(String),
    /// The stored payload was malformed or failed validation
    Invalid(String),
}

/// Owner of the technology collection.
///
/// Every id-addressed mutation is tolerant: an unknown id is a no-op that
/// returns `false`, because callers may hold ids from a stale view. Every
/// mutation that touches the collection writes it through to the backend;
/// write failures are logged and dropped so the in-memory session carries on.
pub struct ProgressStore<S: KeyValueStore> {
    storage: S,
    technologies: Vec<Technology>,
    random: Box<dyn RandomSource>,
    config: StoreConfig,
    origin: LoadOrigin,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Open with the default configuration.
    pub async fn open(storage: S) -> Self {
        Self::open_with_config(storage, StoreConfig::default()).await
    }

    /// Open, rehydrating from `storage` or falling back to `config.seed`.
    /// Never fails.
    pub async fn open_with_config(storage: S, config: StoreConfig) -> Self {
        let (technologies, origin) = match storage.get(&config.storage_key).await {
            Ok(Some(bytes)) => match snapshot::decode(&bytes) {
                Ok(items) => (items, LoadOrigin::Restored),
                Err(e) => {
                    warn!(key = %config.storage_key, error = %e, "discarding persisted technologies");
                    (config.seed.clone(), LoadOrigin::Seeded(SeedReason::Invalid(e.to_string())))
                }
            },
            Ok(None) => (config.seed.clone(), LoadOrigin::Seeded(SeedReason::Missing)),
            Err(e) => {
                warn!(key = %config.storage_key, error = %e, "failed to read persisted technologies");
                (config.seed.clone(), LoadOrigin::Seeded(SeedReason::Unreadable(e.to_string())))
            }
        };

        info!(count = technologies.len(), origin = ?origin, "progress store opened");

        Self {
            storage,
            technologies,
            random: Box::new(ThreadRandom),
            config,
            origin,
        }
    }

    /// Set the random source used by [`ProgressStore::random_select_next`].
    pub fn with_random_source(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Where the collection came from at open.
    pub fn origin(&self) -> &LoadOrigin {
        &self.origin
    }

    /// The backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // === Reads ===

    /// All technologies in insertion order.
    pub fn technologies(&self) -> &[Technology] {
        &self.technologies
    }

    /// Look up one technology.
    pub fn get(&self, id: TechnologyId) -> Option<&Technology> {
        self.technologies.iter().find(|t| t.id == id)
    }

    /// Matching technologies, as a new sequence.
    pub fn filter(&self, filter: &TechnologyFilter) -> Vec<Technology> {
        filter.apply(&self.technologies)
    }

    /// Progress derived from the live collection.
    pub fn progress(&self) -> ProgressSummary {
        ProgressSummary::of(&self.technologies)
    }

    /// Unfinished technologies past their deadline.
    pub fn overdue(&self, today: Date) -> Vec<&Technology> {
        deadline::overdue(&self.technologies, today)
    }

    /// Unfinished technologies due within `within_days` of `today`.
    pub fn upcoming(&self, today: Date, within_days: u32) -> Vec<&Technology> {
        deadline::upcoming(&self.technologies, today, within_days)
    }

    // === Single-record mutations ===

    /// Set a status directly.
    pub async fn update_status(&mut self, id: TechnologyId, status: TechnologyStatus) -> bool {
        self.mutate(id, "update_status", |t| t.status = status).await
    }

    /// Advance a status one step along the cycle.
    pub async fn cycle_status(&mut self, id: TechnologyId) -> bool {
        self.mutate(id, "cycle_status", |t| t.status = t.status.next()).await
    }

    /// Replace notes.
    pub async fn update_notes(&mut self, id: TechnologyId, notes: impl Into<String>) -> bool {
        let notes = notes.into();
        self.mutate(id, "update_notes", |t| t.notes = notes).await
    }

    /// Replace or clear the deadline.
    pub async fn update_deadline(&mut self, id: TechnologyId, deadline: Option<Date>) -> bool {
        self.mutate(id, "update_deadline", |t| t.deadline = deadline).await
    }

    /// Merge a partial update. `Ok(false)` when the id is unknown; an empty
    /// title is rejected before anything changes.
    pub async fn edit_technology(&mut self, id: TechnologyId, patch: TechnologyPatch) -> Result<bool> {
        patch.validate()?;
        let Some(tech) = self.find_mut(id) else {
            debug!(%id, "edit_technology: unknown id, ignoring");
            return Ok(false);
        };
        patch.apply(tech)?;
        debug!(%id, "edit_technology");
        self.persist().await;
        Ok(true)
    }

    /// Append a new technology under a fresh id.
    pub async fn add_technology(&mut self, input: NewTechnology) -> Result<Technology> {
        let id = TechnologyId::allocate(self.technologies.iter().map(|t| &t.id))
            .ok_or_else(|| CoreError::InvalidInput("no free technology id".to_string()))?;
        let tech = input.into_technology(id)?;
        self.technologies.push(tech.clone());
        debug!(%id, title = %tech.title, "add_technology");
        self.persist().await;
        Ok(tech)
    }

    // === Bulk mutations ===

    /// Set `status` on every listed id that exists. Returns how many records
    /// were updated.
    pub async fn bulk_update_status(&mut self, ids: &[TechnologyId], status: TechnologyStatus) -> usize {
        let mut updated = 0;
        for tech in self.technologies.iter_mut().filter(|t| ids.contains(&t.id)) {
            tech.status = status;
            updated += 1;
        }
        debug!(requested = ids.len(), updated, %status, "bulk_update_status");
        if updated > 0 {
            self.persist().await;
        }
        updated
    }

    /// Mark every technology completed.
    pub async fn mark_all_completed(&mut self) -> usize {
        self.set_all(TechnologyStatus::Completed).await
    }

    /// Reset every technology to not-started.
    pub async fn reset_all_statuses(&mut self) -> usize {
        self.set_all(TechnologyStatus::NotStarted).await
    }

    /// Pick one not-started technology uniformly at random and advance it to
    /// in-progress. `None` when nothing is not-started.
    pub async fn random_select_next(&mut self) -> Option<TechnologyId> {
        let candidates: Vec<usize> = self
            .technologies
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status == TechnologyStatus::NotStarted)
            .map(|(i, _)| i)
            .collect();

        if candidates.is_empty() {
            debug!("random_select_next: no not-started technologies");
            return None;
        }

        let pick = self.random.pick_index(candidates.len());
        let Some(&index) = candidates.get(pick) else {
            warn!(pick, candidates = candidates.len(), "random source returned an out-of-range index");
            return None;
        };

        let tech = &mut self.technologies[index];
        tech.status = tech.status.next();
        let id = tech.id;
        debug!(%id, "random_select_next");
        self.persist().await;
        Some(id)
    }

    // === Snapshots ===

    /// Serialized form of the current collection.
    pub fn export_snapshot(&self) -> Result<Vec<u8>> {
        snapshot::encode(&self.technologies)
    }

    /// Replace the collection with a decoded snapshot. The collection is left
    /// untouched when the payload is invalid.
    pub async fn import_snapshot(&mut self, bytes: &[u8]) -> Result<usize> {
        let items = snapshot::decode(bytes)?;
        let count = items.len();
        self.technologies = items;
        info!(count, "imported technologies");
        self.persist().await;
        Ok(count)
    }

    /// Replace the collection with the configured seed.
    pub async fn restore_seed(&mut self) {
        self.technologies = self.config.seed.clone();
        info!(count = self.technologies.len(), "restored seed technologies");
        self.persist().await;
    }

    // === Internals ===

    fn find_mut(&mut self, id: TechnologyId) -> Option<&mut Technology> {
        self.technologies.iter_mut().find(|t| t.id == id)
    }

    async fn mutate(&mut self, id: TechnologyId, op: &'static str, f: impl FnOnce(&mut Technology)) -> bool {
        let Some(tech) = self.find_mut(id) else {
            debug!(%id, op, "unknown id, ignoring");
            return false;
        };
        f(tech);
        debug!(%id, op, status = %tech.status, "updated technology");
        self.persist().await;
        true
    }

    async fn set_all(&mut self, status: TechnologyStatus) -> usize {
        for tech in &mut self.technologies {
            tech.status = status;
        }
        let updated = self.technologies.len();
        debug!(updated, %status, "set all statuses");
        if updated > 0 {
            self.persist().await;
        }
        updated
    }

    /// Write the collection through to the backend. Failures are logged,
    /// never returned.
    async fn persist(&mut self) {
        let bytes = match snapshot::encode(&self.technologies) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to encode technologies; keeping in-memory state only");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.config.storage_key, &bytes).await {
            warn!(key = %self.config.storage_key, error = %e, "failed to persist technologies; keeping in-memory state only");
        }
    }
}
