use pipenet_core::{
    CompressorStation, EntityKind, Pipe, Record, RecordStore, RecordValidationError, RepairAction,
    StoreError, WorkshopDirection,
};
use std::collections::HashSet;

fn pipe(name: &str) -> Pipe {
    Pipe::new(name, 10, 500).unwrap()
}

fn station(name: &str, total: u32, active: u32) -> CompressorStation {
    CompressorStation::new(name, total, active, 1).unwrap()
}

#[test]
fn add_and_get_roundtrip() {
    let mut store = RecordStore::new();
    let id = store.add_pipe(Pipe::new("A", 10, 500).unwrap());

    let loaded = store.pipe(id).unwrap();
    assert_eq!(loaded.id(), id);
    assert_eq!(loaded.name(), "A");
    assert_eq!(loaded.length(), 10);
    assert_eq!(loaded.diameter(), 500);
    assert!(!loaded.under_repair());
}

#[test]
fn deleted_id_is_reused_by_next_add() {
    let mut store = RecordStore::new();
    assert_eq!(store.add_pipe(pipe("A")), 1);
    assert_eq!(store.add_pipe(pipe("B")), 2);

    store.delete_pipe(1).unwrap();
    assert!(store.pipe(1).is_err());
    assert_eq!(store.pipes().map(|p| p.id()).collect::<Vec<_>>(), vec![2]);

    assert_eq!(store.add_pipe(pipe("C")), 1);
    assert_eq!(store.pipe(1).unwrap().name(), "C");
}

#[test]
fn ids_stay_pairwise_distinct_across_add_delete_sequences() {
    let mut store = RecordStore::new();
    let mut live = Vec::new();
    for round in 0..50u32 {
        live.push(store.add_station(station("s", 4, 2)));
        if round % 3 == 0 {
            let victim = live.remove((round as usize * 7) % live.len());
            store.delete_station(victim).unwrap();
        }
        let unique: HashSet<_> = live.iter().collect();
        assert_eq!(unique.len(), live.len());
        assert_eq!(store.station_count(), live.len());
    }
}

#[test]
fn kinds_have_independent_id_sequences() {
    let mut store = RecordStore::new();
    assert_eq!(store.add_pipe(pipe("p")), 1);
    assert_eq!(store.add_station(station("s", 1, 0)), 1);
    assert_eq!(store.add_pipe(pipe("q")), 2);
}

#[test]
fn missing_ids_return_not_found() {
    let mut store = RecordStore::new();
    assert_eq!(
        store.pipe(9).unwrap_err(),
        StoreError::NotFound {
            kind: EntityKind::Pipe,
            id: 9
        }
    );
    assert!(matches!(
        store.delete_station(3),
        Err(StoreError::NotFound {
            kind: EntityKind::Station,
            id: 3
        })
    ));
    assert!(store.update_pipe(1, |p| p.set_length(5)).is_err());
    assert!(store.toggle_repair(1).is_err());
}

#[test]
fn update_rejects_invalid_edits_without_mutation() {
    let mut store = RecordStore::new();
    let id = store.add_station(station("North", 5, 2));

    let err = store
        .update_station(id, |s| {
            s.set_name("changed")?;
            s.set_workshops(5, 9)
        })
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::Invalid(RecordValidationError::ActiveExceedsTotal {
            active: 9,
            total: 5
        })
    );
    assert_eq!(store.station(id).unwrap().name(), "North");
    assert_eq!(store.station(id).unwrap().active_workshops(), 2);
}

#[test]
fn update_cannot_change_record_id() {
    let mut store = RecordStore::new();
    let id = store.add_pipe(pipe("A"));
    store
        .update_pipe(id, |p| {
            p.set_id(77);
            p.set_diameter(1200)
        })
        .unwrap();

    let updated = store.pipe(id).unwrap();
    assert_eq!(updated.id(), id);
    assert_eq!(updated.diameter(), 1200);
}

#[test]
fn find_by_name_is_case_insensitive_substring() {
    let mut store = RecordStore::new();
    let north = store.add_pipe(pipe("North Main"));
    store.add_pipe(pipe("South"));
    let northern = store.add_pipe(pipe("NORTHERN spur"));

    let mut found = store.find_by_name(EntityKind::Pipe, "north");
    found.sort_unstable();
    assert_eq!(found, vec![north, northern]);
    assert!(store.find_by_name(EntityKind::Station, "north").is_empty());
}

#[test]
fn find_pipes_by_repair_status_matches_exactly() {
    let mut store = RecordStore::new();
    let a = store.add_pipe(pipe("a"));
    let b = store.add_pipe(pipe("b"));
    store.toggle_repair(b).unwrap();

    assert_eq!(store.find_pipes_by_repair_status(true), vec![b]);
    assert_eq!(store.find_pipes_by_repair_status(false), vec![a]);
}

#[test]
fn unused_percentage_search_uses_inclusive_bounds() {
    let mut store = RecordStore::new();
    let half = store.add_station(station("half", 10, 5));

    assert_eq!(store.station(half).unwrap().unused_percentage(), Some(50.0));
    assert_eq!(store.find_stations_by_unused_percentage(40.0, 60.0), vec![half]);
    assert_eq!(store.find_stations_by_unused_percentage(50.0, 50.0), vec![half]);
    assert!(store.find_stations_by_unused_percentage(0.0, 30.0).is_empty());
}

#[test]
fn unused_percentage_search_excludes_stations_without_workshops() {
    let mut store = RecordStore::new();
    store.add_station(station("empty", 0, 0));
    let idle = store.add_station(station("idle", 3, 0));

    assert_eq!(store.find_stations_by_unused_percentage(0.0, 100.0), vec![idle]);
}

#[test]
fn batch_mutate_counts_only_changed_pipes_and_skips_missing() {
    let mut store = RecordStore::new();
    let a = store.add_pipe(pipe("a"));
    let b = store.add_pipe(pipe("b"));
    store.toggle_repair(b).unwrap();

    let changed = store.batch_mutate(&[a, b, 99], RepairAction::MarkUnderRepair);
    assert_eq!(changed, 1);
    assert!(store.pipe(a).unwrap().under_repair());
    assert!(store.pipe(b).unwrap().under_repair());

    assert_eq!(store.batch_mutate(&[a, b], RepairAction::MarkUnderRepair), 0);
    assert_eq!(store.batch_mutate(&[a, b], RepairAction::ToggleRepair), 2);
    assert_eq!(store.find_pipes_by_repair_status(true), Vec::<u32>::new());
}

#[test]
fn batch_mutate_applies_duplicate_ids_once() {
    let mut store = RecordStore::new();
    let a = store.add_pipe(pipe("a"));

    assert_eq!(store.batch_mutate(&[a, a, a], RepairAction::ToggleRepair), 1);
    assert!(store.pipe(a).unwrap().under_repair());
}

#[test]
fn batch_delete_removes_present_subset_and_is_idempotent() {
    let mut store = RecordStore::new();
    let a = store.add_pipe(pipe("a"));
    let b = store.add_pipe(pipe("b"));
    let c = store.add_pipe(pipe("c"));

    assert_eq!(store.batch_delete(EntityKind::Pipe, &[a, c, 42]), 2);
    assert_eq!(store.pipes().map(|p| p.id()).collect::<Vec<_>>(), vec![b]);

    let snapshot = store.clone();
    assert_eq!(store.batch_delete(EntityKind::Pipe, &[a, c, 42]), 0);
    assert_eq!(store, snapshot);
}

#[test]
fn batch_delete_releases_ids() {
    let mut store = RecordStore::new();
    let ids: Vec<_> = (0..3).map(|_| store.add_station(station("s", 2, 1))).collect();

    store.batch_delete(EntityKind::Station, &ids);
    assert!(store.is_empty());
    assert_eq!(store.add_station(station("fresh", 2, 1)), 1);
}

#[test]
fn adjust_workshops_starts_and_stops_within_bounds() {
    let mut store = RecordStore::new();
    let id = store.add_station(station("North", 10, 5));

    assert_eq!(
        store.adjust_workshops(id, 3, WorkshopDirection::Start).unwrap(),
        8
    );
    assert_eq!(
        store.adjust_workshops(id, 8, WorkshopDirection::Stop).unwrap(),
        0
    );
}

#[test]
fn adjust_workshops_rejects_overflow_atomically() {
    let mut store = RecordStore::new();
    let id = store.add_station(station("full", 5, 5));

    let err = store
        .adjust_workshops(id, 1, WorkshopDirection::Start)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRange { station_id, .. } if station_id == id));
    assert_eq!(store.station(id).unwrap().active_workshops(), 5);

    let err = store
        .adjust_workshops(id, 6, WorkshopDirection::Stop)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRange { .. }));
    assert_eq!(store.station(id).unwrap().active_workshops(), 5);

    assert!(matches!(
        store.adjust_workshops(id, u32::MAX, WorkshopDirection::Start),
        Err(StoreError::InvalidRange { .. })
    ));
}

#[test]
fn adjust_workshops_on_missing_station_is_not_found() {
    let mut store = RecordStore::new();
    assert!(matches!(
        store.adjust_workshops(1, 1, WorkshopDirection::Stop),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn clear_resets_records_and_allocators() {
    let mut store = RecordStore::new();
    store.add_pipe(pipe("a"));
    store.add_station(station("s", 1, 1));
    store.clear();

    assert_eq!(store, RecordStore::new());
}
