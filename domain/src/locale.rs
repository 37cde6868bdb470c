//! Picks a supported locale for a request and renders timestamps for it.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use entity::locale::Locale;
use log::*;

/// Returns the most preferred supported locale named in an `Accept-Language` header.
///
/// Entries are ordered by their `q` weight (default 1, ties keep header order);
/// entries with `q=0`, wildcards and unsupported languages are skipped.
pub fn resolve_accept_language(header: &str) -> Option<Locale> {
    let mut candidates: Vec<(f32, Locale)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            let weight = parts
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            if tag == "*" || weight <= 0.0 {
                return None;
            }
            Locale::from_tag(tag).map(|locale| (weight, locale))
        })
        .collect();

    // sort_by is stable, so equal weights keep header order
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
    candidates.first().map(|(_, locale)| *locale)
}

/// Parses an IANA time zone name, falling back to UTC for unknown names.
pub fn time_zone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!("Unknown time zone '{name}', using UTC");
        Tz::UTC
    })
}

/// Renders `timestamp` in `time_zone` using a pattern customary for `locale`.
pub fn format_timestamp(timestamp: DateTime<Utc>, locale: Locale, time_zone_name: &str) -> String {
    let local = timestamp.with_timezone(&time_zone(time_zone_name));
    let pattern = match locale {
        Locale::EnUs => "%b %-d, %Y, %-I:%M %p %Z",
        Locale::PtBr => "%d/%m/%Y %H:%M %Z",
        Locale::DeDe => "%d.%m.%Y, %H:%M %Z",
        Locale::JaJp => "%Y/%m/%d %H:%M %Z",
    };
    local.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accept_language_prefers_the_highest_weighted_supported_tag() {
        assert_eq!(
            resolve_accept_language("fr-FR, de-DE;q=0.7, pt-BR;q=0.9"),
            Some(Locale::PtBr)
        );
        assert_eq!(resolve_accept_language("ja"), Some(Locale::JaJp));
        assert_eq!(
            resolve_accept_language("en-GB,en;q=0.9"),
            Some(Locale::EnUs)
        );
    }

    #[test]
    fn accept_language_ignores_wildcards_and_zero_weights() {
        assert_eq!(resolve_accept_language("*, de;q=0"), None);
        assert_eq!(resolve_accept_language("fr, it"), None);
        assert_eq!(resolve_accept_language(""), None);
    }

    #[test]
    fn timestamps_render_in_the_account_time_zone() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 5, 15, 4, 0).unwrap();

        assert_eq!(
            format_timestamp(timestamp, Locale::EnUs, "America/New_York"),
            "Jan 5, 2024, 10:04 AM EST"
        );
        assert_eq!(
            format_timestamp(timestamp, Locale::DeDe, "Europe/Berlin"),
            "05.01.2024, 16:04 CET"
        );
        assert_eq!(
            format_timestamp(timestamp, Locale::JaJp, "Asia/Tokyo"),
            "2024/01/06 00:04 JST"
        );
    }

    #[test]
    fn unknown_time_zones_fall_back_to_utc() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 5, 15, 4, 0).unwrap();

        assert_eq!(
            format_timestamp(timestamp, Locale::PtBr, "Mars/Olympus_Mons"),
            "05/01/2024 15:04 UTC"
        );
    }
}
