//! Wall-clock collaborators: time-of-day canonicalization, IANA zone
//! resolution, and current-time formatting.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Local, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SchedulerError};

/// Parse one `h:m:s` entry into canonical zero-padded `HH:MM:SS`.
///
/// Whitespace around each colon-separated part is tolerated; leading zeros
/// are optional. Anything that does not split into exactly three in-range
/// integer parts is rejected.
pub fn canonical_time(raw: &str) -> Result<String> {
    let invalid = || SchedulerError::InvalidTimeFormat(raw.to_string());

    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let mut fields = [0u32; 3];
    for (field, part) in fields.iter_mut().zip(&parts) {
        *field = part.trim().parse().map_err(|_| invalid())?;
    }

    let [h, m, s] = fields;
    if h > 23 || m > 59 || s > 59 {
        return Err(invalid());
    }

    Ok(format!("{h:02}:{m:02}:{s:02}"))
}

/// Canonicalize a whole set of trigger times and sort it ascending.
///
/// The returned snapshot is immutable; callers replace it wholesale rather
/// than mutating in place. Duplicates are kept — membership checks make them
/// harmless.
pub fn canonicalize_times<I, S>(raw: I) -> Result<Arc<[String]>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut canonical = raw
        .into_iter()
        .map(|entry| canonical_time(entry.as_ref()))
        .collect::<Result<Vec<String>>>()?;
    canonical.sort();
    Ok(canonical.into())
}

/// Resolve an IANA zone identifier, total over arbitrary strings.
pub fn resolve_zone(id: &str) -> Result<Tz> {
    Tz::from_str(id).map_err(|_| SchedulerError::InvalidTimeZone(id.to_string()))
}

/// Format "now" as 24-hour `HH:MM:SS`, localized to `zone` if given, else to
/// the system's local time.
pub fn current_time_string(zone: Option<Tz>) -> String {
    match zone {
        Some(tz) => Utc::now().with_timezone(&tz).format("%H:%M:%S").to_string(),
        None => Local::now().format("%H:%M:%S").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_loose_entries() {
        assert_eq!(canonical_time("9:5:3").unwrap(), "09:05:03");
        assert_eq!(canonical_time("23:29:16").unwrap(), "23:29:16");
        assert_eq!(canonical_time(" 7 : 30 : 00 ").unwrap(), "07:30:00");
        assert_eq!(canonical_time("0:0:0").unwrap(), "00:00:00");
    }

    #[test]
    fn rejects_malformed_entries() {
        for bad in ["bad", "1:2", "1:2:3:4", "", "::", "a:b:c", "1:2:"] {
            assert!(canonical_time(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn rejects_out_of_range_fields() {
        for bad in ["25:00:00", "24:00:00", "10:60:00", "10:00:60", "-1:0:0"] {
            assert!(canonical_time(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn sorts_ascending_and_keeps_duplicates() {
        let times = canonicalize_times(["10:00:00", "05:00:00", "5:0:0"]).unwrap();
        assert_eq!(&*times, &["05:00:00", "05:00:00", "10:00:00"]);
    }

    #[test]
    fn whole_set_rejected_on_one_bad_entry() {
        assert!(canonicalize_times(["10:00:00", "nope"]).is_err());
    }

    #[test]
    fn resolves_known_zone_and_rejects_unknown() {
        assert_eq!(resolve_zone("America/New_York").unwrap(), Tz::America__New_York);
        assert!(resolve_zone("Not/A_Zone").is_err());
        assert!(resolve_zone("").is_err());
    }

    #[test]
    fn formats_hh_mm_ss() {
        for formatted in [
            current_time_string(None),
            current_time_string(Some(Tz::Asia__Tokyo)),
        ] {
            let bytes = formatted.as_bytes();
            assert_eq!(bytes.len(), 8, "{formatted}");
            assert_eq!(bytes[2], b':');
            assert_eq!(bytes[5], b':');
        }
    }
}
