//! Company exports from the Justice open-data portal.

use std::borrow::Cow;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};

/// One company row, with English field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub ico: String,
    pub name: String,
    pub legal_form: String,
    pub address: String,
    pub registry_court: String,
    pub file_number: String,
    pub registration_date: String,
}

const COLUMNS: [&str; 7] = [
    "ico",
    "nazev",
    "pravni_forma",
    "sidlo",
    "rejstrikovy_soud",
    "spisova_znacka",
    "datum_zapisu",
];

/// Position of each known Czech column in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex([Option<usize>; 7]);

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut positions = [None; 7];
        for (slot, column) in positions.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(column));
        }
        Self(positions)
    }

    fn record(&self, row: &StringRecord) -> CompanyRecord {
        let cell = |slot: usize| {
            self.0[slot]
                .and_then(|index| row.get(index))
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        CompanyRecord {
            ico: cell(0),
            name: cell(1),
            legal_form: cell(2),
            address: cell(3),
            registry_court: cell(4),
            file_number: cell(5),
            registration_date: cell(6),
        }
    }
}

/// UTF-8 when valid, otherwise Windows-1250.
pub fn decode(raw: &[u8]) -> Cow<'_, str> {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => encoding_rs::WINDOWS_1250.decode_without_bom_handling(raw).0,
    };
    match text {
        Cow::Borrowed(text) => Cow::Borrowed(text.trim_start_matches('\u{feff}')),
        Cow::Owned(text) => match text.strip_prefix('\u{feff}') {
            Some(stripped) => Cow::Owned(stripped.to_string()),
            None => Cow::Owned(text),
        },
    }
}

/// Rows of `text` one at a time.
pub fn parse_stream(
    text: &str,
) -> Result<impl Iterator<Item = Result<CompanyRecord, csv::Error>> + '_, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let columns = ColumnIndex::from_headers(reader.headers()?);
    Ok(reader
        .into_records()
        .map(move |row| row.map(|row| columns.record(&row))))
}

pub fn parse_all(raw: &[u8]) -> Result<Vec<CompanyRecord>, csv::Error> {
    let text = decode(raw);
    let rows = parse_stream(&text)?;
    rows.collect()
}
