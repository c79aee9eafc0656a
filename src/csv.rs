use serde::Serialize;
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::{Booking, Command, Pnr};

/// Errors that can occur when reading command rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open command file: {0}")]
    Open(csv::Error),

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: u64, source: csv::Error },

    #[error("line {line}: unrecognized command '{command}'")]
    UnrecognizedCommand { line: u64, command: String },

    #[error("line {line}: {command} missing {field}")]
    MissingField {
        line: u64,
        command: &'static str,
        field: &'static str,
    },

    #[error("line {line}: {command} has invalid {field} '{value}'")]
    InvalidNumber {
        line: u64,
        command: &'static str,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    pnr: Pnr,
    status: &'static str,
    from: &'a str,
    to: &'a str,
    passengers: u32,
    seats: String,
}

/// Read commands from a csv file.
///
/// Rows have no header and a per-command arity:
/// `book,<from>,<to>,<passengers>` or `cancel,<pnr>,<seats>`.
/// Lines starting with `#` are ignored.
pub fn read_commands(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Command, CsvError>>, CsvError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_path(path)
        .map_err(CsvError::Open)?;

    Ok(reader
        .into_records()
        .enumerate()
        .map(|(idx, result)| {
            let fallback = idx as u64 + 1;
            let record = result.map_err(|source| CsvError::Parse {
                line: source.position().map_or(fallback, |p| p.line()),
                source,
            })?;
            let line = record.position().map_or(fallback, |p| p.line());
            parse_record(line, &record)
        }))
}

fn parse_record(line: u64, record: &csv::StringRecord) -> Result<Command, CsvError> {
    let command = record.get(0).unwrap_or_default();
    match command.to_ascii_lowercase().as_str() {
        "book" => Ok(Command::Book {
            from: field(record, line, "book", 1, "origin")?.to_string(),
            to: field(record, line, "book", 2, "destination")?.to_string(),
            passengers: number(record, line, "book", 3, "passenger count")?,
        }),
        "cancel" => Ok(Command::Cancel {
            pnr: number(record, line, "cancel", 1, "pnr")?,
            seats: number(record, line, "cancel", 2, "seat count")?,
        }),
        _ => Err(CsvError::UnrecognizedCommand {
            line,
            command: command.to_string(),
        }),
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    line: u64,
    command: &'static str,
    idx: usize,
    name: &'static str,
) -> Result<&'r str, CsvError> {
    record
        .get(idx)
        .filter(|value| !value.is_empty())
        .ok_or(CsvError::MissingField {
            line,
            command,
            field: name,
        })
}

fn number<T: FromStr>(
    record: &csv::StringRecord,
    line: u64,
    command: &'static str,
    idx: usize,
    name: &'static str,
) -> Result<T, CsvError> {
    let value = field(record, line, command, idx, name)?;
    value.parse().map_err(|_| CsvError::InvalidNumber {
        line,
        command,
        field: name,
        value: value.to_string(),
    })
}

/// Write confirmed then waitlisted bookings in csv format
pub fn write_bookings<'a>(
    writer: impl io::Write,
    confirmed: impl IntoIterator<Item = &'a Booking>,
    waitlisted: impl IntoIterator<Item = &'a Booking>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);

    let rows = confirmed
        .into_iter()
        .map(|b| (b, "confirmed"))
        .chain(waitlisted.into_iter().map(|b| (b, "waitlisted")));

    for (booking, status) in rows {
        let seats: Vec<String> = booking.seats.iter().map(ToString::to_string).collect();
        writer.serialize(OutputRow {
            pnr: booking.pnr,
            status,
            from: &booking.from,
            to: &booking.to,
            passengers: booking.passengers,
            seats: seats.join(" "),
        })?;
    }

    writer.flush()?;
    Ok(())
}
