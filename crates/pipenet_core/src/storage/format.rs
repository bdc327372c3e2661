//! Line-oriented text format for full store snapshots.
//!
//! # Responsibility
//! - Render allocator state and every record as tagged line blocks.
//! - Rebuild a store from that text, failing on malformed values.
//!
//! # Invariants
//! - Header sections come first, then `[PIPE]` blocks, then `[STATION]` blocks.
//! - Parsing is tag-driven: lines outside a recognized section are skipped.
//! - A parse either yields a complete store or an error; never a partial store.

use crate::model::pipe::Pipe;
use crate::model::record::{EntityKind, Record, RecordId, RecordValidationError};
use crate::model::station::CompressorStation;
use crate::repo::id_allocator::IdAllocator;
use crate::repo::record_store::RecordStore;
use crate::repo::table::RecordTable;
use log::trace;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter::Enumerate;
use std::str::{FromStr, Lines};

pub const NEXT_PIPE_ID_TAG: &str = "[NEXT_PIPE_ID]";
pub const NEXT_STATION_ID_TAG: &str = "[NEXT_STATION_ID]";
pub const USED_PIPE_IDS_TAG: &str = "[USED_PIPE_IDS]";
pub const USED_STATION_IDS_TAG: &str = "[USED_STATION_IDS]";
pub const PIPE_TAG: &str = "[PIPE]";
pub const STATION_TAG: &str = "[STATION]";

/// Failure while parsing persisted text, with the 1-based line it occurred on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidNumber {
        field: &'static str,
        value: String,
    },
    /// Repair flag other than `0` or `1`.
    InvalidFlag(String),
    UnexpectedEof {
        field: &'static str,
    },
    ZeroId {
        field: &'static str,
    },
    InvalidRecord {
        kind: EntityKind,
        error: RecordValidationError,
    },
    DuplicateId {
        kind: EntityKind,
        id: RecordId,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            ParseErrorKind::InvalidNumber { field, value } => {
                write!(f, "invalid {field} `{value}`")
            }
            ParseErrorKind::InvalidFlag(value) => {
                write!(f, "invalid repair flag `{value}`; expected 0|1")
            }
            ParseErrorKind::UnexpectedEof { field } => {
                write!(f, "unexpected end of input while reading {field}")
            }
            ParseErrorKind::ZeroId { field } => write!(f, "{field} must be positive"),
            ParseErrorKind::InvalidRecord { kind, error } => write!(f, "invalid {kind}: {error}"),
            ParseErrorKind::DuplicateId { kind, id } => write!(f, "duplicate {kind} id {id}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ParseErrorKind::InvalidRecord { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Renders the full store state in the persisted text format.
pub fn serialize(store: &RecordStore) -> String {
    Snapshot(store).to_string()
}

struct Snapshot<'a>(&'a RecordStore);

impl Display for Snapshot<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let pipes = self.0.pipe_table();
        let stations = self.0.station_table();

        writeln!(f, "{NEXT_PIPE_ID_TAG}")?;
        writeln!(f, "{}", pipes.allocator().next_candidate())?;
        writeln!(f, "{NEXT_STATION_ID_TAG}")?;
        writeln!(f, "{}", stations.allocator().next_candidate())?;
        writeln!(f, "{USED_PIPE_IDS_TAG}")?;
        writeln!(f, "{}", join_ids(pipes.allocator()))?;
        writeln!(f, "{USED_STATION_IDS_TAG}")?;
        writeln!(f, "{}", join_ids(stations.allocator()))?;

        for pipe in pipes.iter() {
            writeln!(f, "{PIPE_TAG}")?;
            writeln!(f, "{}", pipe.id)?;
            writeln!(f, "{}", pipe.name)?;
            writeln!(f, "{}", pipe.length)?;
            writeln!(f, "{}", pipe.diameter)?;
            writeln!(f, "{}", u8::from(pipe.under_repair))?;
        }
        for station in stations.iter() {
            writeln!(f, "{STATION_TAG}")?;
            writeln!(f, "{}", station.id)?;
            writeln!(f, "{}", station.name)?;
            writeln!(f, "{}", station.total_workshops)?;
            writeln!(f, "{}", station.active_workshops)?;
            writeln!(f, "{}", station.station_class)?;
        }
        Ok(())
    }
}

fn join_ids(ids: &IdAllocator) -> String {
    ids.in_use()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses persisted text into a fresh store.
///
/// # Errors
/// - Returns `ParseError` on malformed numbers, flags, truncated blocks,
///   invalid records or duplicate record IDs.
pub fn parse(text: &str) -> Result<RecordStore, ParseError> {
    let mut cursor = LineCursor::new(text);
    let mut next_pipe_id: RecordId = 1;
    let mut next_station_id: RecordId = 1;
    let mut used_pipe_ids = BTreeSet::new();
    let mut used_station_ids = BTreeSet::new();
    let mut pipes = BTreeMap::new();
    let mut stations = BTreeMap::new();

    while let Some((line_no, line)) = cursor.next_line() {
        match line.trim() {
            NEXT_PIPE_ID_TAG => next_pipe_id = cursor.id("next pipe id")?,
            NEXT_STATION_ID_TAG => next_station_id = cursor.id("next station id")?,
            USED_PIPE_IDS_TAG => used_pipe_ids = cursor.id_list("used pipe ids")?,
            USED_STATION_IDS_TAG => used_station_ids = cursor.id_list("used station ids")?,
            PIPE_TAG => {
                let pipe = parse_pipe(&mut cursor)?;
                insert_unique(&mut pipes, pipe, line_no)?;
            }
            STATION_TAG => {
                let station = parse_station(&mut cursor)?;
                insert_unique(&mut stations, station, line_no)?;
            }
            _ => trace!("event=store_parse module=storage status=skip line={line_no}"),
        }
    }

    Ok(RecordStore::from_tables(
        RecordTable::from_parts(IdAllocator::from_parts(next_pipe_id, used_pipe_ids), pipes),
        RecordTable::from_parts(
            IdAllocator::from_parts(next_station_id, used_station_ids),
            stations,
        ),
    ))
}

fn parse_pipe(cursor: &mut LineCursor<'_>) -> Result<Pipe, ParseError> {
    let id = cursor.id("pipe id")?;
    let name = cursor.text("pipe name")?;
    let length = cursor.number("pipe length")?;
    let diameter = cursor.number("pipe diameter")?;
    let (flag_line, flag) = cursor.expect_line("repair flag")?;
    let under_repair = match flag.trim() {
        "0" => false,
        "1" => true,
        other => {
            return Err(ParseError {
                line: flag_line,
                kind: ParseErrorKind::InvalidFlag(other.to_string()),
            })
        }
    };

    let pipe = Pipe {
        id,
        name,
        length,
        diameter,
        under_repair,
    };
    validate_record(&pipe, flag_line)?;
    Ok(pipe)
}

fn parse_station(cursor: &mut LineCursor<'_>) -> Result<CompressorStation, ParseError> {
    let id = cursor.id("station id")?;
    let name = cursor.text("station name")?;
    let total_workshops = cursor.number("total workshops")?;
    let active_workshops = cursor.number("active workshops")?;
    let station_class = cursor.number("station class")?;

    let station = CompressorStation {
        id,
        name,
        total_workshops,
        active_workshops,
        station_class,
    };
    validate_record(&station, cursor.line_no)?;
    Ok(station)
}

fn validate_record<T: Record>(record: &T, line: usize) -> Result<(), ParseError> {
    record.validate().map_err(|error| ParseError {
        line,
        kind: ParseErrorKind::InvalidRecord {
            kind: T::KIND,
            error,
        },
    })
}

fn insert_unique<T: Record>(
    records: &mut BTreeMap<RecordId, T>,
    record: T,
    tag_line: usize,
) -> Result<(), ParseError> {
    let id = record.id();
    if records.insert(id, record).is_some() {
        return Err(ParseError {
            line: tag_line,
            kind: ParseErrorKind::DuplicateId { kind: T::KIND, id },
        });
    }
    Ok(())
}

/// Line reader that tracks 1-based line numbers for error reporting.
struct LineCursor<'a> {
    lines: Enumerate<Lines<'a>>,
    line_no: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let (index, line) = self.lines.next()?;
        self.line_no = index + 1;
        Some((self.line_no, line))
    }

    fn expect_line(&mut self, field: &'static str) -> Result<(usize, &'a str), ParseError> {
        let line = self.line_no + 1;
        self.next_line().ok_or(ParseError {
            line,
            kind: ParseErrorKind::UnexpectedEof { field },
        })
    }

    fn text(&mut self, field: &'static str) -> Result<String, ParseError> {
        self.expect_line(field).map(|(_, value)| value.to_string())
    }

    fn number<T: FromStr>(&mut self, field: &'static str) -> Result<T, ParseError> {
        let (line, value) = self.expect_line(field)?;
        parse_number(value, field, line)
    }

    fn id(&mut self, field: &'static str) -> Result<RecordId, ParseError> {
        let (line, value) = self.expect_line(field)?;
        parse_id(value, field, line)
    }

    fn id_list(&mut self, field: &'static str) -> Result<BTreeSet<RecordId>, ParseError> {
        let (line, value) = self.expect_line(field)?;
        value
            .split_whitespace()
            .map(|token| parse_id(token, field, line))
            .collect()
    }
}

fn parse_number<T: FromStr>(value: &str, field: &'static str, line: usize) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError {
        line,
        kind: ParseErrorKind::InvalidNumber {
            field,
            value: value.to_string(),
        },
    })
}

fn parse_id(value: &str, field: &'static str, line: usize) -> Result<RecordId, ParseError> {
    let id: RecordId = parse_number(value, field, line)?;
    if id == 0 {
        return Err(ParseError {
            line,
            kind: ParseErrorKind::ZeroId { field },
        });
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::{parse, serialize, ParseErrorKind};
    use crate::model::pipe::Pipe;
    use crate::model::station::CompressorStation;
    use crate::repo::record_store::RecordStore;

    #[test]
    fn empty_store_serializes_headers_only() {
        let text = serialize(&RecordStore::new());
        assert_eq!(
            text,
            "[NEXT_PIPE_ID]\n1\n[NEXT_STATION_ID]\n1\n[USED_PIPE_IDS]\n\n[USED_STATION_IDS]\n\n"
        );
    }

    #[test]
    fn pipe_block_uses_fixed_field_order() {
        let mut store = RecordStore::new();
        let id = store.add_pipe(Pipe::new("Main line", 12, 700).unwrap());
        store.toggle_repair(id).unwrap();

        let text = serialize(&store);
        assert!(text.ends_with("[PIPE]\n1\nMain line\n12\n700\n1\n"), "{text}");
    }

    #[test]
    fn station_block_uses_fixed_field_order() {
        let mut store = RecordStore::new();
        store.add_station(CompressorStation::new("North", 8, 3, -2).unwrap());

        let text = serialize(&store);
        assert!(text.ends_with("[STATION]\n1\nNorth\n8\n3\n-2\n"), "{text}");
    }

    #[test]
    fn parse_accepts_crlf_and_trailing_space_in_id_lists() {
        let text = "[NEXT_PIPE_ID]\r\n3\r\n[USED_PIPE_IDS]\r\n1 2 \r\n";
        let store = parse(text).unwrap();
        assert_eq!(store.pipe_table().allocator().next_candidate(), 3);
        assert_eq!(
            store.pipe_table().allocator().in_use().collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn parse_reports_truncated_block_with_line() {
        let err = parse("[PIPE]\n1\nname\n10\n").unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedEof {
                field: "pipe diameter"
            }
        );
    }
}
