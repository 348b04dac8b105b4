//! Zone lookup and wall-clock conversion over the `chrono-tz` database.

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use log::warn;

/// Zone used when a caller omits one or supplies an unknown identifier.
pub const DEFAULT_TIME_ZONE: &str = "Asia/Kolkata";

const DEFAULT_TZ: Tz = Tz::Asia__Kolkata;

/// A point in time as handed over by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTime {
    /// Wall-clock time with no zone attached; interpreted in the zone passed
    /// alongside it.
    Wall(NaiveDateTime),
    /// Already an absolute instant; returned unchanged by [`to_absolute`].
    Absolute(DateTime<Utc>),
}

impl From<NaiveDateTime> for LocalTime {
    fn from(value: NaiveDateTime) -> Self {
        Self::Wall(value)
    }
}

impl From<DateTime<Utc>> for LocalTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Absolute(value)
    }
}

/// Returns `true` iff `zone_id` is an IANA zone or a known Windows zone id.
pub fn is_valid_zone(zone_id: &str) -> bool {
    lookup_zone(zone_id).is_some()
}

/// Resolves `zone_id`, falling back to [`DEFAULT_TIME_ZONE`] when unknown.
pub fn resolve_zone(zone_id: &str) -> Tz {
    lookup_zone(zone_id).unwrap_or_else(|| {
        warn!("event=zone_fallback module=time status=fallback fallback_zone={DEFAULT_TIME_ZONE}");
        DEFAULT_TZ
    })
}

fn lookup_zone(zone_id: &str) -> Option<Tz> {
    zone_id
        .parse::<Tz>()
        .ok()
        .or_else(|| super::windows::to_iana(zone_id))
}

/// Interprets `local` as wall-clock time in `zone_id` and returns the UTC instant.
///
/// Wall times inside a DST fold resolve to the earlier of the two instants.
/// Wall times inside a DST gap are read with the offset in effect just before
/// the gap, which moves them forward by the gap length.
pub fn to_absolute(local: impl Into<LocalTime>, zone_id: &str) -> DateTime<Utc> {
    match local.into() {
        LocalTime::Absolute(instant) => instant,
        LocalTime::Wall(naive) => wall_to_utc(naive, resolve_zone(zone_id)),
    }
}

/// Renders a UTC instant as wall-clock time in `zone_id`, keeping the offset.
pub fn from_absolute(instant: DateTime<Utc>, zone_id: &str) -> DateTime<FixedOffset> {
    let zone = resolve_zone(zone_id);
    instant.with_timezone(&zone).fixed_offset()
}

fn wall_to_utc(naive: NaiveDateTime, zone: Tz) -> DateTime<Utc> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(local) => local.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Gaps never span a full day, so the offset a day earlier is the
            // pre-transition offset.
            let before_gap = naive - Duration::days(1);
            let offset = zone.offset_from_utc_datetime(&before_gap).fix();
            Utc.from_utc_datetime(&(naive - Duration::seconds(i64::from(offset.local_minus_utc()))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn known_zones_are_valid_and_garbage_is_not() {
        assert!(is_valid_zone("UTC"));
        assert!(is_valid_zone("Etc/GMT+5"));
        assert!(is_valid_zone("America/New_York"));
        assert!(is_valid_zone("Asia/Kolkata"));
        assert!(!is_valid_zone("Mars/Olympus_Mons"));
        assert!(!is_valid_zone(""));
        assert!(!is_valid_zone("not a zone"));
    }

    #[test]
    fn windows_zone_ids_resolve_like_their_iana_zone() {
        assert!(is_valid_zone("India Standard Time"));
        assert!(is_valid_zone("W. Europe Standard Time"));

        let local = wall(2030, 7, 1, 12, 0);
        assert_eq!(
            to_absolute(local, "Eastern Standard Time"),
            to_absolute(local, "America/New_York")
        );
        let instant = Utc.with_ymd_and_hms(2030, 1, 15, 4, 30, 0).unwrap();
        assert_eq!(
            from_absolute(instant, "India Standard Time").naive_local(),
            wall(2030, 1, 15, 10, 0)
        );
    }

    #[test]
    fn to_absolute_applies_zone_offset() {
        let utc = to_absolute(wall(2030, 1, 15, 10, 0), "Asia/Kolkata");
        assert_eq!(utc, Utc.with_ymd_and_hms(2030, 1, 15, 4, 30, 0).unwrap());

        let utc = to_absolute(wall(2030, 7, 1, 12, 0), "America/New_York");
        assert_eq!(utc, Utc.with_ymd_and_hms(2030, 7, 1, 16, 0, 0).unwrap());
    }

    #[test]
    fn to_absolute_returns_tagged_instants_unchanged() {
        let instant = Utc.with_ymd_and_hms(2030, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(to_absolute(instant, "America/New_York"), instant);
        assert_eq!(to_absolute(instant, "bogus"), instant);
    }

    #[test]
    fn invalid_zone_falls_back_to_default() {
        let local = wall(2030, 1, 15, 10, 0);
        assert_eq!(
            to_absolute(local, "Nowhere/Special"),
            to_absolute(local, DEFAULT_TIME_ZONE)
        );

        let instant = Utc.with_ymd_and_hms(2030, 1, 15, 4, 30, 0).unwrap();
        let rendered = from_absolute(instant, "Nowhere/Special");
        assert_eq!(rendered.naive_local(), local);
        assert_eq!(rendered.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn round_trip_preserves_wall_clock_time() {
        for zone in ["UTC", "Asia/Kolkata", "America/New_York", "Europe/Berlin"] {
            let local = wall(2031, 11, 20, 18, 45);
            let back = from_absolute(to_absolute(local, zone), zone);
            assert_eq!(back.naive_local(), local, "zone {zone}");
        }
    }

    #[test]
    fn dst_fold_resolves_to_earlier_instant() {
        // 2030-11-03 01:30 happens twice in New York.
        let utc = to_absolute(wall(2030, 11, 3, 1, 30), "America/New_York");
        assert_eq!(utc, Utc.with_ymd_and_hms(2030, 11, 3, 5, 30, 0).unwrap());
    }

    #[test]
    fn dst_gap_shifts_forward() {
        // 2030-03-10 02:30 does not exist in New York; clocks jump 02:00 -> 03:00.
        let utc = to_absolute(wall(2030, 3, 10, 2, 30), "America/New_York");
        assert_eq!(utc, Utc.with_ymd_and_hms(2030, 3, 10, 7, 30, 0).unwrap());
        let rendered = from_absolute(utc, "America/New_York");
        assert_eq!(rendered.naive_local(), wall(2030, 3, 10, 3, 30));
    }
}
