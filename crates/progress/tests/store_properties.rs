use std::collections::VecDeque;
use techtrack_core::{
    seed_technologies, snapshot, CoreError, NewTechnology, ProgressSummary, Technology,
    TechnologyFilter, TechnologyId, TechnologyStatus,
};
use techtrack_progress::{
    LoadOrigin, ProgressStore, RandomSource, SeedReason, SeededRandom, StoreConfig, STORAGE_KEY,
};
use techtrack_storage::{KeyValueStore, MemoryStore, StorageError};

/// Replays a fixed list of picks.
struct ScriptedRandom(VecDeque<usize>);

impl RandomSource for ScriptedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        let pick = self.0.pop_front().unwrap_or(0);
        assert!(pick < len, "script pick {pick} out of range for {len}");
        pick
    }
}

/// Backend whose reads and writes always fail.
struct BrokenStore;

#[async_trait::async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> techtrack_storage::Result<Option<Vec<u8>>> {
        Err(StorageError::Other("disk unplugged".to_string()))
    }

    async fn set(&mut self, _key: &str, _value: &[u8]) -> techtrack_storage::Result<()> {
        Err(StorageError::Other("quota exceeded".to_string()))
    }
}

fn tech(id: u64, title: &str, status: TechnologyStatus) -> Technology {
    Technology::new(TechnologyId::new(id), title, "").with_status(status)
}

async fn store_with(items: Vec<Technology>) -> ProgressStore<MemoryStore> {
    let backend = MemoryStore::with_entry(STORAGE_KEY, snapshot::encode(&items).unwrap());
    let store = ProgressStore::open(backend).await;
    assert_eq!(store.origin(), &LoadOrigin::Restored);
    store
}

fn statuses(store: &ProgressStore<MemoryStore>) -> Vec<TechnologyStatus> {
    store.technologies().iter().map(|t| t.status).collect()
}

#[tokio::test]
async fn test_cycle_three_times_restores_status() {
    let mut store = ProgressStore::open(MemoryStore::new()).await;
    let before = statuses(&store);

    for tech in seed_technologies() {
        for _ in 0..3 {
            assert!(store.cycle_status(tech.id).await);
        }
    }

    assert_eq!(statuses(&store), before);
}

#[tokio::test]
async fn test_cycle_walks_forward() {
    let mut store = ProgressStore::open(MemoryStore::new()).await;
    let id = TechnologyId::new(3);

    store.cycle_status(id).await;
    assert_eq!(store.get(id).unwrap().status, TechnologyStatus::InProgress);
    store.cycle_status(id).await;
    assert_eq!(store.get(id).unwrap().status, TechnologyStatus::Completed);
    store.cycle_status(id).await;
    assert_eq!(store.get(id).unwrap().status, TechnologyStatus::NotStarted);
}

#[tokio::test]
async fn test_progress_survives_reload() {
    let backend = MemoryStore::new();
    let mut store = ProgressStore::open(backend.clone()).await;
    store.add_technology(NewTechnology::titled("Routing")).await.unwrap();
    store.update_status(TechnologyId::new(3), TechnologyStatus::Completed).await;

    let live = store.progress();
    assert_eq!(live.total, 4);
    assert_eq!(live.completed, 2);
    assert_eq!(live.percent, 50);

    let reloaded = ProgressStore::open(backend).await;
    assert_eq!(reloaded.origin(), &LoadOrigin::Restored);
    assert_eq!(reloaded.progress(), live);
    assert_eq!(reloaded.technologies(), store.technologies());
}

#[tokio::test]
async fn test_progress_tracks_every_mutation() {
    let mut store = ProgressStore::open(MemoryStore::new()).await;
    assert_eq!(store.progress().percent, 33);

    store.update_status(TechnologyId::new(2), TechnologyStatus::Completed).await;
    assert_eq!(store.progress().percent, 67);
    assert_eq!(store.progress(), ProgressSummary::of(store.technologies()));
}

#[tokio::test]
async fn test_mark_all_completed_reaches_full_progress() {
    let mut store = ProgressStore::open(MemoryStore::new()).await;
    assert_eq!(store.mark_all_completed().await, 3);
    let summary = store.progress();
    assert_eq!(summary.percent, 100);
    assert_eq!(summary.completed, summary.total);
}

#[tokio::test]
async fn test_reset_all_reaches_zero_progress() {
    let mut store = ProgressStore::open(MemoryStore::new()).await;
    assert_eq!(store.reset_all_statuses().await, 3);
    let summary = store.progress();
    assert_eq!(summary.percent, 0);
    assert_eq!(summary.not_started, 3);
}

#[tokio::test]
async fn test_random_select_without_candidates_is_noop() {
    let mut store = store_with(vec![
        tech(1, "A", TechnologyStatus::Completed),
        tech(2, "B", TechnologyStatus::InProgress),
    ])
    .await;
    let before = store.technologies().to_vec();

    assert_eq!(store.random_select_next().await, None);
    assert_eq!(store.technologies(), before.as_slice());
}

#[tokio::test]
async fn test_random_select_single_candidate_is_deterministic() {
    let mut store = store_with(vec![
        tech(1, "A", TechnologyStatus::Completed),
        tech(2, "B", TechnologyStatus::NotStarted),
        tech(3, "C", TechnologyStatus::InProgress),
    ])
    .await;

    assert_eq!(store.random_select_next().await, Some(TechnologyId::new(2)));
    assert_eq!(
        statuses(&store),
        vec![
            TechnologyStatus::Completed,
            TechnologyStatus::InProgress,
            TechnologyStatus::InProgress,
        ]
    );

    assert_eq!(store.random_select_next().await, None);
}

#[tokio::test]
async fn test_random_select_draws_only_from_current_candidates() {
    let store = store_with(vec![
        tech(1, "A", TechnologyStatus::NotStarted),
        tech(2, "B", TechnologyStatus::Completed),
        tech(3, "C", TechnologyStatus::NotStarted),
        tech(4, "D", TechnologyStatus::NotStarted),
    ])
    .await;
    let mut store = store.with_random_source(Box::new(ScriptedRandom(VecDeque::from([1, 1, 0]))));

    // Candidates [1, 3, 4] -> pick 1 -> id 3
    assert_eq!(store.random_select_next().await, Some(TechnologyId::new(3)));
    // Candidates [1, 4] -> pick 1 -> id 4
    assert_eq!(store.random_select_next().await, Some(TechnologyId::new(4)));
    // Candidates [1] -> id 1
    assert_eq!(store.random_select_next().await, Some(TechnologyId::new(1)));
    assert_eq!(store.random_select_next().await, None);
    assert_eq!(store.get(TechnologyId::new(2)).unwrap().status, TechnologyStatus::Completed);
}

#[tokio::test]
async fn test_seeded_random_select_is_reproducible() {
    let items: Vec<Technology> = (1..=6)
        .map(|i| tech(i, &format!("T{i}"), TechnologyStatus::NotStarted))
        .collect();

    let mut picks = Vec::new();
    for _ in 0..2 {
        let store = store_with(items.clone()).await;
        let mut store = store.with_random_source(Box::new(SeededRandom::new(11)));
        let mut order = Vec::new();
        while let Some(id) = store.random_select_next().await {
            order.push(id);
        }
        assert_eq!(order.len(), 6);
        picks.push(order);
    }
    assert_eq!(picks[0], picks[1]);
}

#[tokio::test]
async fn test_bulk_update_skips_unknown_ids() {
    let mut store = store_with(vec![
        tech(1, "A", TechnologyStatus::NotStarted),
        tech(2, "B", TechnologyStatus::InProgress),
        tech(5, "E", TechnologyStatus::NotStarted),
    ])
    .await;

    let updated = store
        .bulk_update_status(
            &[TechnologyId::new(1), TechnologyId::new(2), TechnologyId::new(3)],
            TechnologyStatus::Completed,
        )
        .await;

    assert_eq!(updated, 2);
    assert_eq!(
        statuses(&store),
        vec![
            TechnologyStatus::Completed,
            TechnologyStatus::Completed,
            TechnologyStatus::NotStarted,
        ]
    );
}

#[tokio::test]
async fn test_bulk_update_order_does_not_matter() {
    let ids = [TechnologyId::new(3), TechnologyId::new(1)];
    let reversed = [TechnologyId::new(1), TechnologyId::new(3)];

    let mut a = ProgressStore::open(MemoryStore::new()).await;
    let mut b = ProgressStore::open(MemoryStore::new()).await;
    a.bulk_update_status(&ids, TechnologyStatus::InProgress).await;
    b.bulk_update_status(&reversed, TechnologyStatus::InProgress).await;
    b.bulk_update_status(&reversed, TechnologyStatus::InProgress).await;

    assert_eq!(a.technologies(), b.technologies());
}

#[tokio::test]
async fn test_filter_status_and_search() {
    let store = store_with(vec![
        tech(1, "Hooks", TechnologyStatus::Completed),
        tech(2, "JSX", TechnologyStatus::Completed),
        tech(3, "Hooks Advanced", TechnologyStatus::InProgress),
    ])
    .await;

    let filter = TechnologyFilter::status(TechnologyStatus::Completed).with_search("hook");
    let found = store.filter(&filter);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, TechnologyId::new(1));
    assert_eq!(store.technologies().len(), 3);
}

#[tokio::test]
async fn test_snapshot_roundtrip_after_clear() {
    let mut store = ProgressStore::open(MemoryStore::new()).await;
    store.update_notes(TechnologyId::new(2), "fragments and keys").await;
    store
        .update_deadline(TechnologyId::new(3), techtrack_core::Date::from_ymd_opt(2025, 6, 30))
        .await;
    let expected = store.technologies().to_vec();
    let exported = store.export_snapshot().unwrap();

    store.reset_all_statuses().await;
    store.update_notes(TechnologyId::new(2), "").await;
    assert_ne!(store.technologies(), expected.as_slice());

    assert_eq!(store.import_snapshot(&exported).await.unwrap(), 3);
    assert_eq!(store.technologies(), expected.as_slice());
}

#[tokio::test]
async fn test_add_with_empty_title_fails() {
    let mut store = ProgressStore::open(MemoryStore::new()).await;
    let err = store.add_technology(NewTechnology::titled("")).await.unwrap_err();

    assert!(matches!(err, CoreError::InvalidInput(_)));
    assert_eq!(store.technologies().len(), 3);
}

#[tokio::test]
async fn test_add_never_reuses_ids() {
    let mut store = store_with(vec![
        tech(2, "B", TechnologyStatus::NotStarted),
        tech(9, "I", TechnologyStatus::NotStarted),
    ])
    .await;

    let first = store.add_technology(NewTechnology::titled("New")).await.unwrap();
    let second = store.add_technology(NewTechnology::titled("Newer")).await.unwrap();
    assert_eq!(first.id, TechnologyId::new(10));
    assert_eq!(second.id, TechnologyId::new(11));
}

#[tokio::test]
async fn test_add_after_max_id_stays_unique() {
    let mut store = store_with(vec![
        tech(u64::MAX, "Max", TechnologyStatus::NotStarted),
        tech(1, "One", TechnologyStatus::NotStarted),
    ])
    .await;

    let added = store.add_technology(NewTechnology::titled("New")).await.unwrap();
    assert_eq!(added.id, TechnologyId::new(2));

    let mut ids: Vec<TechnologyId> = store.technologies().iter().map(|t| t.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    assert!(store.cycle_status(added.id).await);
    assert_eq!(store.get(TechnologyId::new(u64::MAX)).unwrap().status, TechnologyStatus::NotStarted);
}

#[tokio::test]
async fn test_invalid_snapshot_falls_back_to_seed() {
    for payload in [&b"garbage"[..], br#"[{"id":1,"title":""}]"#, br#"[{"id":1,"title":"A"},{"id":1,"title":"B"}]"#] {
        let store = ProgressStore::open(MemoryStore::with_entry(STORAGE_KEY, payload.to_vec())).await;
        assert!(matches!(store.origin(), LoadOrigin::Seeded(SeedReason::Invalid(_))));
        assert_eq!(store.technologies(), seed_technologies().as_slice());
    }
}

#[tokio::test]
async fn test_broken_backend_never_blocks_session() {
    let mut store = ProgressStore::open_with_config(BrokenStore, StoreConfig::default()).await;
    assert!(matches!(store.origin(), LoadOrigin::Seeded(SeedReason::Unreadable(_))));

    assert!(store.cycle_status(TechnologyId::new(3)).await);
    let added = store.add_technology(NewTechnology::titled("Testing")).await.unwrap();
    store.mark_all_completed().await;

    assert_eq!(store.get(added.id).unwrap().status, TechnologyStatus::Completed);
    assert_eq!(store.progress().percent, 100);
}

#[tokio::test]
async fn test_file_backed_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    {
        let backend = techtrack_storage::JsonFileStore::new(dir.path()).await.unwrap();
        let mut store = ProgressStore::open(backend).await;
        store.add_technology(NewTechnology::titled("Context API")).await.unwrap();
        store.cycle_status(TechnologyId::new(4)).await;
    }

    let backend = techtrack_storage::JsonFileStore::new(dir.path()).await.unwrap();
    let store = ProgressStore::open(backend).await;
    assert_eq!(store.origin(), &LoadOrigin::Restored);
    let added = store.get(TechnologyId::new(4)).unwrap();
    assert_eq!(added.title, "Context API");
    assert_eq!(added.status, TechnologyStatus::InProgress);
    assert_eq!(store.storage().revision(STORAGE_KEY).await.unwrap(), 2);
}
