use pipenet_core::{
    parse, serialize, CompressorStation, EntityKind, ParseErrorKind, Pipe, RecordStore,
    RecordValidationError, RepairAction, WorkshopDirection,
};

fn populated_store() -> RecordStore {
    let mut store = RecordStore::new();
    let a = store.add_pipe(Pipe::new("Main line", 120, 1420).unwrap());
    let b = store.add_pipe(Pipe::new("Spur  with  spaces ", 3, 530).unwrap());
    store.add_pipe(Pipe::new("", 1, 1).unwrap());
    store.batch_mutate(&[b], RepairAction::ToggleRepair);
    store.delete_pipe(a).unwrap();

    let north = store.add_station(CompressorStation::new("North", 10, 5, 2).unwrap());
    store.add_station(CompressorStation::new("Empty", 0, 0, -1).unwrap());
    store
        .adjust_workshops(north, 2, WorkshopDirection::Start)
        .unwrap();
    store
}

#[test]
fn serialize_then_load_reproduces_store() {
    let original = populated_store();
    let text = original.serialize();

    let mut restored = RecordStore::new();
    restored.load(&text).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn roundtrip_preserves_allocator_behavior() {
    let mut original = populated_store();
    let mut restored = parse(&serialize(&original)).unwrap();

    let next_original = original.add_pipe(Pipe::new("next", 1, 1).unwrap());
    let next_restored = restored.add_pipe(Pipe::new("next", 1, 1).unwrap());
    assert_eq!(next_original, 1);
    assert_eq!(next_restored, next_original);
    assert_eq!(restored, original);
}

#[test]
fn serialized_text_matches_documented_layout() {
    let mut store = RecordStore::new();
    store.add_pipe(Pipe::new("A", 10, 500).unwrap());
    store.add_pipe(Pipe::new("B", 20, 700).unwrap());
    store.delete_pipe(1).unwrap();
    store.add_station(CompressorStation::new("KS-1", 6, 4, 3).unwrap());

    let expected = "\
[NEXT_PIPE_ID]
1
[NEXT_STATION_ID]
2
[USED_PIPE_IDS]
2
[USED_STATION_IDS]
1
[PIPE]
2
B
20
700
0
[STATION]
1
KS-1
6
4
3
";
    assert_eq!(serialize(&store), expected);
}

#[test]
fn names_that_look_like_tags_roundtrip() {
    let mut store = RecordStore::new();
    store.add_pipe(Pipe::new("[STATION]", 4, 200).unwrap());
    store.add_pipe(Pipe::new("[NEXT_PIPE_ID]", 5, 300).unwrap());
    store.add_station(CompressorStation::new("[PIPE]", 3, 1, 2).unwrap());
    store.add_station(CompressorStation::new("[USED_STATION_IDS]", 0, 0, 0).unwrap());

    let restored = parse(&serialize(&store)).unwrap();
    assert_eq!(restored, store);
    assert_eq!(restored.pipe(1).unwrap().name(), "[STATION]");
    assert_eq!(restored.station(2).unwrap().name(), "[USED_STATION_IDS]");
}

#[test]
fn counter_at_top_of_id_range_wraps_on_next_add() {
    let mut store = parse("[NEXT_PIPE_ID]\n4294967295\n[USED_PIPE_IDS]\n1\n").unwrap();

    assert_eq!(store.add_pipe(Pipe::new("top", 1, 1).unwrap()), u32::MAX);
    assert_eq!(store.add_pipe(Pipe::new("wrapped", 1, 1).unwrap()), 2);

    let restored = parse(&serialize(&store)).unwrap();
    assert_eq!(restored, store);
}

#[test]
fn parse_skips_unknown_lines_between_blocks() {
    let text = "\
# exported by hand
[NEXT_PIPE_ID]
4
garbage
[PIPE]
3
Loose
7
300
1
[SOMETHING_ELSE]
";
    let store = parse(text).unwrap();
    let pipe = store.pipe(3).unwrap();
    assert_eq!(pipe.name(), "Loose");
    assert!(pipe.under_repair());
    assert_eq!(store.allocator(EntityKind::Pipe).next_candidate(), 4);
}

#[test]
fn parse_reserves_ids_of_records_missing_from_used_sets() {
    let text = "[PIPE]\n1\nOnly\n5\n100\n0\n";
    let mut store = parse(text).unwrap();

    assert!(store.allocator(EntityKind::Pipe).is_in_use(1));
    assert_eq!(store.add_pipe(Pipe::new("new", 1, 1).unwrap()), 2);
}

#[test]
fn malformed_number_reports_field_and_line() {
    let text = "[PIPE]\n1\nBad\nten\n100\n0\n";
    let err = parse(text).unwrap_err();
    assert_eq!(err.line, 4);
    assert_eq!(
        err.kind,
        ParseErrorKind::InvalidNumber {
            field: "pipe length",
            value: "ten".to_string()
        }
    );
}

#[test]
fn invalid_repair_flag_is_rejected() {
    let err = parse("[PIPE]\n1\nBad\n10\n100\nyes\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidFlag("yes".to_string()));
}

#[test]
fn zero_ids_and_counters_are_rejected() {
    let err = parse("[NEXT_STATION_ID]\n0\n").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::ZeroId { .. }));

    let err = parse("[USED_PIPE_IDS]\n1 0 2\n").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::ZeroId { .. }));
}

#[test]
fn station_violating_workshop_bound_is_rejected() {
    let err = parse("[STATION]\n1\nOver\n2\n3\n1\n").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::InvalidRecord {
            kind: EntityKind::Station,
            error: RecordValidationError::ActiveExceedsTotal {
                active: 3,
                total: 2
            }
        }
    );
}

#[test]
fn duplicate_record_ids_are_rejected() {
    let text = "[PIPE]\n1\na\n1\n1\n0\n[PIPE]\n1\nb\n1\n1\n0\n";
    let err = parse(text).unwrap_err();
    assert_eq!(err.line, 7);
    assert_eq!(
        err.kind,
        ParseErrorKind::DuplicateId {
            kind: EntityKind::Pipe,
            id: 1
        }
    );
}

#[test]
fn failed_load_leaves_store_unchanged() {
    let mut store = populated_store();
    let before = store.clone();
    let broken = format!("{}[STATION]\n9\nTail\nx\n", store.serialize());

    let err = store.load(&broken).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::InvalidNumber { .. }));
    assert_eq!(store, before);
}

#[test]
fn load_replaces_existing_state_completely() {
    let mut store = populated_store();
    store.load(&RecordStore::new().serialize()).unwrap();
    assert_eq!(store, RecordStore::new());
}
