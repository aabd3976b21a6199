//! CSV row codec for flights.
//!
//! Converts between the persisted row layout
//! (`flight ID,Arrival,Departure,success`) and [`Flight`] values. Framing
//! (quoting, line endings, header handling) is left to the `csv` crate via
//! [`reader`] and [`writer`].

use std::io::{Read, Write};

use chrono::{NaiveTime, Timelike};

use crate::error::{Error, Result};
use crate::flight::Flight;

/// Column header row, kept verbatim for compatibility with existing files.
pub const CSV_COLUMNS: [&str; 4] = ["flight ID", "Arrival", "Departure", "success"];

/// The `success` column is recomputed on load, so it may be absent.
const REQUIRED_FIELDS: usize = CSV_COLUMNS.len() - 1;

const TIME_FORMAT: &str = "%H:%M";
const TIME_FORMAT_WITH_SECONDS: &str = "%H:%M:%S";

/// Parse an `HH:MM` (or `HH:MM:SS`) time of day.
///
/// Every component must be exactly two digits. Leap seconds are rejected.
///
/// # Errors
///
/// Returns [`Error::MalformedRow`] if the text is not a valid 24-hour time.
pub fn parse_time(field: &str) -> Result<NaiveTime> {
    let invalid = |reason: &str| Error::malformed_row(format!("invalid time {field:?}: {reason}"));

    let format = match field.len() {
        5 => TIME_FORMAT,
        8 => TIME_FORMAT_WITH_SECONDS,
        _ => return Err(invalid("expected HH:MM")),
    };
    let well_formed = field.bytes().enumerate().all(|(i, b)| {
        if i % 3 == 2 {
            b == b':'
        } else {
            b.is_ascii_digit()
        }
    });
    if !well_formed {
        return Err(invalid("expected HH:MM"));
    }

    let time = NaiveTime::parse_from_str(field, format).map_err(|e| invalid(&e.to_string()))?;
    if time.nanosecond() >= 1_000_000_000 {
        return Err(invalid("leap seconds are not supported"));
    }
    Ok(time)
}

/// Format a time of day as zero-padded `HH:MM`.
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Decode one CSV row into a flight.
///
/// Fields are trimmed before use. An empty row decodes to `None` so that
/// callers can skip blank lines. Any `success` column is ignored and the
/// returned flight starts out as [`SuccessStatus::Missing`].
///
/// [`SuccessStatus::Missing`]: crate::flight::SuccessStatus::Missing
///
/// # Errors
///
/// Returns [`Error::MalformedRow`] if the row has fewer than three fields or
/// either time fails to parse.
pub fn parse_row<S: AsRef<str>>(fields: &[S]) -> Result<Option<Flight>> {
    if fields.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = fields.iter().map(|f| f.as_ref().trim()).collect();
    if fields.len() < REQUIRED_FIELDS {
        return Err(Error::malformed_row(format!(
            "row missing required information: {fields:?}"
        )));
    }

    let arrival = parse_time(fields[1])?;
    let departure = parse_time(fields[2])?;
    Ok(Some(Flight::new(fields[0], arrival, departure)))
}

/// Encode a flight as the four persisted fields.
#[must_use]
pub fn to_row(flight: &Flight) -> [String; 4] {
    [
        flight.flight_id.clone(),
        format_time(flight.arrival),
        format_time(flight.departure),
        flight.success().as_str().to_string(),
    ]
}

/// Build a CSV reader over a flights document.
///
/// The first row is consumed as the header, rows may carry three or four
/// fields, every field is trimmed and blank lines are skipped.
pub fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source)
}

/// Build a CSV writer for a flights document.
///
/// Rows end in CRLF, matching files written by earlier tooling.
pub fn writer<W: Write>(destination: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(destination)
}
