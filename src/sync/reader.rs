use std::{borrow::Cow, str};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::domain::GuestRecord;

/// Decode a guest report into records, skipping rows that cannot hold a guest.
///
/// There is no header row. Undecodable bytes are dropped, as are rows with
/// fewer than three columns or without an `@` in the third.
pub fn read_guests(contents: &[u8]) -> Vec<GuestRecord> {
    let text = decode(contents);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut guests = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row = index + 1;
        match record {
            Ok(record) => match guest_from_row(&record) {
                Some(guest) => guests.push(guest),
                None => debug!(row, "skipping row without a guest email"),
            },
            Err(error) => warn!(row, %error, "skipping unreadable row"),
        }
    }
    guests
}

pub fn guest_from_row(record: &StringRecord) -> Option<GuestRecord> {
    if record.len() < 3 || !record[2].contains('@') {
        return None;
    }
    Some(GuestRecord::new(&record[0], &record[1], &record[2]))
}

/// Drops invalid byte sequences and keeps everything else, including any
/// U+FFFD already present in the report.
fn decode(contents: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = str::from_utf8(contents) {
        return Cow::Borrowed(text);
    }

    let mut text = String::with_capacity(contents.len());
    let mut rest = contents;
    loop {
        match str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                return Cow::Owned(text);
            }
            Err(error) => {
                let (valid, invalid) = rest.split_at(error.valid_up_to());
                text.push_str(str::from_utf8(valid).unwrap_or_default());
                rest = &invalid[error.error_len().unwrap_or(invalid.len())..];
            }
        }
    }
}
