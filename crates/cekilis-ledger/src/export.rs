//! Spreadsheet export of a giveaway's winners.
//!
//! Produces a UTF-8 CSV with a byte-order mark so spreadsheet software
//! picks the right encoding. Column order is fixed: handle, full name,
//! phone, address, notes, date won.
//!
//! Cells that a spreadsheet would evaluate as a formula (leading `=`, `+`,
//! `-`, `@`, tab or carriage return) are prefixed with `'` so they open as
//! plain text.

use std::borrow::Cow;

use cekilis_types::{Giveaway, Winner};
use chrono::{FixedOffset, NaiveDate};

use crate::collation::fold;

/// UTF-8 byte-order mark.
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header row, in column order.
pub const HEADER: [&str; 6] = ["Hesap Adı", "Ad Soyad", "Telefon", "Adres", "Notlar", "Tarih"];

/// Errors raised while writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The CSV writer failed.
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    /// The writer could not be flushed into the output buffer.
    #[error("csv export failed: {0}")]
    Io(#[from] std::io::Error),

    /// The configured UTC offset is out of range.
    #[error("invalid utc offset: {0} minutes")]
    Offset(i32),
}

/// Build a UTC offset from a minute count.
///
/// # Errors
///
/// [`ExportError::Offset`] if the offset is a day or more.
pub fn utc_offset(minutes: i32) -> Result<FixedOffset, ExportError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(ExportError::Offset(minutes))
}

/// Render `winners` as CSV bytes, dates shown in `offset`.
pub fn export_csv(winners: &[Winner], offset: FixedOffset) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(BOM.to_vec());
    writer.write_record(HEADER)?;

    for winner in winners {
        let date = winner
            .created_at
            .with_timezone(&offset)
            .format("%d.%m.%Y")
            .to_string();
        let cells = [
            text_cell(&winner.handle),
            text_cell(&winner.full_name),
            text_cell(&winner.phone),
            text_cell(&winner.address),
            text_cell(winner.notes.as_deref().unwrap_or_default()),
            Cow::Borrowed(date.as_str()),
        ];
        writer.write_record(cells.iter().map(|cell| cell.as_bytes()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// `value` as a cell spreadsheets will not evaluate.
fn text_cell(value: &str) -> Cow<'_, str> {
    if value.starts_with(['=', '+', '-', '@', '\t', '\r']) {
        Cow::Owned(format!("'{value}"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Download name for the export of `giveaway`, stamped with `today`.
pub fn export_file_name(giveaway: &Giveaway, today: NaiveDate) -> String {
    format!(
        "kazananlar-{}-{}.csv",
        slug(&giveaway.name),
        today.format("%Y-%m-%d")
    )
}

/// ASCII slug of a giveaway name: Turkish letters transliterated, every
/// other run of non-alphanumerics collapsed to one dash.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in fold(name).chars() {
        let c = match c {
            'ç' => 'c',
            'ğ' => 'g',
            'ı' => 'i',
            'ö' => 'o',
            'ş' => 's',
            'ü' => 'u',
            other => other,
        };
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        String::from("cekilis")
    } else {
        trimmed.to_owned()
    }
}
