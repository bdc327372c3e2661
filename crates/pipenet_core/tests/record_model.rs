use pipenet_core::{CompressorStation, Pipe, Record, RecordValidationError};

#[test]
fn pipe_new_sets_defaults() {
    let pipe = Pipe::new("Main", 10, 500).unwrap();

    assert_eq!(pipe.id(), 0);
    assert_eq!(pipe.name(), "Main");
    assert!(!pipe.under_repair());
    assert_eq!(pipe.status_label(), "Operational");
}

#[test]
fn pipe_new_rejects_non_positive_dimensions() {
    assert_eq!(
        Pipe::new("x", 0, 500).unwrap_err(),
        RecordValidationError::NonPositiveLength
    );
    assert_eq!(
        Pipe::new("x", 10, 0).unwrap_err(),
        RecordValidationError::NonPositiveDiameter
    );
}

#[test]
fn names_with_line_breaks_are_rejected() {
    assert_eq!(
        Pipe::new("two\nlines", 1, 1).unwrap_err(),
        RecordValidationError::MultilineName
    );
    assert_eq!(
        CompressorStation::new("cr\rname", 1, 0, 1).unwrap_err(),
        RecordValidationError::MultilineName
    );
}

#[test]
fn station_new_enforces_workshop_bound() {
    let err = CompressorStation::new("KS", 3, 4, 1).unwrap_err();
    assert_eq!(
        err,
        RecordValidationError::ActiveExceedsTotal {
            active: 4,
            total: 3
        }
    );
    assert!(CompressorStation::new("KS", 3, 3, 1).is_ok());
}

#[test]
fn setters_reject_values_that_break_invariants() {
    let mut pipe = Pipe::new("Main", 10, 500).unwrap();
    assert_eq!(
        pipe.set_length(0).unwrap_err(),
        RecordValidationError::NonPositiveLength
    );
    assert_eq!(
        pipe.set_diameter(0).unwrap_err(),
        RecordValidationError::NonPositiveDiameter
    );
    assert_eq!(
        pipe.set_name("a\nb").unwrap_err(),
        RecordValidationError::MultilineName
    );
    assert_eq!((pipe.name(), pipe.length(), pipe.diameter()), ("Main", 10, 500));

    let mut station = CompressorStation::new("KS", 4, 2, 1).unwrap();
    assert_eq!(
        station.set_workshops(1, 5).unwrap_err(),
        RecordValidationError::ActiveExceedsTotal {
            active: 5,
            total: 1
        }
    );
    assert_eq!(
        (station.total_workshops(), station.active_workshops()),
        (4, 2)
    );
    station.set_workshops(6, 6).unwrap();
    assert_eq!(station.idle_workshops(), 0);
}

#[test]
fn unused_percentage_and_idle_workshops() {
    let station = CompressorStation::new("KS", 4, 1, 1).unwrap();
    assert_eq!(station.unused_percentage(), Some(75.0));
    assert_eq!(station.idle_workshops(), 3);

    let empty = CompressorStation::new("empty", 0, 0, 1).unwrap();
    assert_eq!(empty.unused_percentage(), None);
}

#[test]
fn display_renders_single_line_summaries() {
    let mut pipe = Pipe::new("A", 10, 500).unwrap();
    pipe.set_id(1);
    assert_eq!(
        pipe.to_string(),
        "ID: 1 | Name: A | Length: 10 km | Diameter: 500 mm | Under repair: No"
    );

    let mut station = CompressorStation::new("North", 10, 5, 2).unwrap();
    station.set_id(3);
    assert_eq!(
        station.to_string(),
        "ID: 3 | Name: North | Workshops: 5/10 | Class: 2"
    );
}

#[test]
fn serialization_uses_snake_case_wire_fields() {
    let mut pipe = Pipe::new("Main", 10, 500).unwrap();
    pipe.set_id(4);
    pipe.set_under_repair(true);

    let json = serde_json::to_value(&pipe).unwrap();
    assert_eq!(json["id"], 4);
    assert_eq!(json["name"], "Main");
    assert_eq!(json["length"], 10);
    assert_eq!(json["diameter"], 500);
    assert_eq!(json["under_repair"], true);

    let decoded: Pipe = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, pipe);
}

#[test]
fn deserialize_rejects_invalid_station() {
    let value = serde_json::json!({
        "id": 1,
        "name": "Over",
        "total_workshops": 2,
        "active_workshops": 5,
        "station_class": 1
    });

    let err = serde_json::from_value::<CompressorStation>(value).unwrap_err();
    assert!(
        err.to_string()
            .contains("active workshops (5) must be <= total workshops (2)"),
        "unexpected error: {err}"
    );
}
