use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

static LOCAL_TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})[-/.年](\d{1,2})[-/.月](\d{1,2})日?(?:(?:\s+|T)(\d{1,2}):(\d{2})(?::(\d{2})(?:\.\d+)?)?)?$",
    )
    .expect("valid local timestamp regex")
});

/// Parses a game timestamp as exported by shogi-extend and similar tools.
///
/// Accepts RFC 3339 and `Y-M-D[ H:MM[:SS]]` with `-`, `/`, `.` or `年月日`
/// date separators. Both read as wall-clock time; an RFC 3339 offset is
/// dropped, not applied. Blank input is `Ok(None)`; anything else
/// that does not parse is `Err` with the reason.
pub fn parse_timestamp(raw: &str) -> Result<Option<NaiveDateTime>, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(parsed.naive_local()));
    }

    let Some(caps) = LOCAL_TIMESTAMP_RE.captures(s) else {
        return Err("unrecognized date format".to_string());
    };

    let field = |idx: usize| -> Result<u32, String> {
        caps.get(idx)
            .map_or(Ok(0), |m| m.as_str().parse::<u32>())
            .map_err(|e| e.to_string())
    };
    let year = caps[1].parse::<i32>().map_err(|e| e.to_string())?;
    let (month, day) = (field(2)?, field(3)?);
    let (hour, minute, second) = (field(4)?, field(5)?, field(6)?);

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| "chrono: date out of range".to_string())?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| "chrono: time out of range".to_string())?;
    Ok(Some(NaiveDateTime::new(date, time)))
}
