//! Message sources: SMS-backup CSV exports, plain text files, stdin.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::io::BufRead;
use std::path::Path;

use paisa_ingest::types::RawMessage;

/// Read an exported SMS dump with `body` and (optionally) `date` columns.
/// Column order is free; rows with an empty body are skipped, rows with an
/// unparseable date keep the message and drop the timestamp.
pub fn read_csv_messages(path: &Path, tz: Tz) -> Result<Vec<RawMessage>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.clone();
    let body_idx = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("body"))
        .ok_or_else(|| anyhow!("no 'body' column in {}", path.display()))?;
    let date_idx = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("date"));

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let body = record.get(body_idx).unwrap_or("").trim();
        if body.is_empty() {
            continue;
        }
        let received_at = date_idx
            .and_then(|i| record.get(i))
            .and_then(|s| parse_message_date(s, tz));
        out.push(RawMessage {
            body: body.to_string(),
            received_at,
        });
    }
    Ok(out)
}

/// One message per non-empty line.
pub fn read_text_messages(path: &Path) -> Result<Vec<RawMessage>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(lines_to_messages(text.lines()))
}

pub fn read_stdin_messages() -> Result<Vec<RawMessage>> {
    let stdin = std::io::stdin();
    let lines: Vec<String> = stdin
        .lock()
        .lines()
        .collect::<std::io::Result<_>>()
        .context("read stdin")?;
    Ok(lines_to_messages(lines.iter().map(|s| s.as_str())))
}

fn lines_to_messages<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<RawMessage> {
    lines
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(RawMessage::new)
        .collect()
}

/// Accepts RFC3339, "YYYY-MM-DD HH:MM:SS" (local to `tz`), or a bare date.
fn parse_message_date(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return tz.from_local_datetime(&ndt).single().map(|dt| dt.with_timezone(&Utc));
    }
    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = nd.and_hms_opt(0, 0, 0)?;
        return tz.from_local_datetime(&midnight).single().map(|dt| dt.with_timezone(&Utc));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::io::Write;

    fn ist() -> Tz {
        "Asia/Kolkata".parse().unwrap()
    }

    #[test]
    fn test_read_csv_with_date_column() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "date,body").unwrap();
        writeln!(f, "2025-06-10 09:15:00,\"HDFC Bank: Rs.250.00 debited from A/C X4567\"").unwrap();
        writeln!(f, ",\"SBI: Rs.900 credited to A/C X1\"").unwrap();
        writeln!(f, "2025-06-11,").unwrap();

        let msgs = read_csv_messages(f.path(), ist()).unwrap();
        assert_eq!(msgs.len(), 2);
        assert!(msgs[0].received_at.is_some());
        // 09:15 IST = 03:45 UTC
        assert_eq!(msgs[0].received_at.unwrap().time().hour(), 3);
        assert!(msgs[1].received_at.is_none());
    }

    #[test]
    fn test_missing_body_column_errors() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "text,when").unwrap();
        writeln!(f, "hello,2025-06-10").unwrap();
        assert!(read_csv_messages(f.path(), ist()).is_err());
    }

    #[test]
    fn test_text_file_one_message_per_line() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "HDFC Bank: Rs.120.00 debited from A/C X2").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "  Your OTP is 4455  ").unwrap();

        let msgs = read_text_messages(f.path()).unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].body, "Your OTP is 4455");
    }

    #[test]
    fn test_date_formats() {
        assert!(parse_message_date("2025-06-10T09:15:00+05:30", ist()).is_some());
        assert!(parse_message_date("2025-06-10 09:15:00", ist()).is_some());
        assert!(parse_message_date("2025-06-10", ist()).is_some());
        assert!(parse_message_date("last tuesday", ist()).is_none());
    }
}
