//! Event filter parameters and the matching predicate shared by every store

use chrono::{DateTime, Datelike, Utc};

use super::{is_unset, unset_instant, Event};

/// Filter over stored events.
///
/// Zero numbers, an empty name and the zero instant are wildcards. Every
/// other field must equal the event's corresponding value for it to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParams {
    pub day: u32,
    /// ISO-8601 week of year
    pub week: u32,
    pub month: u32,
    pub year: u32,
    /// Compared case-insensitively
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Order results ascending by start time
    pub sorting: bool,
}

impl Default for EventParams {
    fn default() -> Self {
        Self {
            day: 0,
            week: 0,
            month: 0,
            year: 0,
            name: String::new(),
            start: unset_instant(),
            end: unset_instant(),
            sorting: false,
        }
    }
}

impl EventParams {
    /// Filter that matches every event
    pub fn all() -> Self {
        Self::default()
    }

    pub fn sorted(mut self) -> Self {
        self.sorting = true;
        self
    }

    /// True when no dimension is constrained
    pub fn is_wildcard(&self) -> bool {
        self.day == 0
            && self.week == 0
            && self.month == 0
            && self.year == 0
            && self.name.is_empty()
            && is_unset(&self.start)
            && is_unset(&self.end)
    }

    /// Whether `event` satisfies every non-wildcard field.
    ///
    /// Date parts come from the event's UTC start.
    pub fn matches(&self, event: &Event) -> bool {
        let start = &event.start;

        (self.day == 0 || start.day() == self.day)
            && (self.week == 0 || start.iso_week().week() == self.week)
            && (self.month == 0 || start.month() == self.month)
            && (self.year == 0 || i64::from(start.year()) == i64::from(self.year))
            && (self.name.is_empty()
                || event.name.to_lowercase() == self.name.to_lowercase())
            && (is_unset(&self.start) || event.start == self.start)
            && (is_unset(&self.end) || event.end == self.end)
    }

    /// Keep the matching events and apply the requested ordering.
    ///
    /// Input is expected in insertion (id) order so that ties stay stable.
    pub fn apply<I>(&self, events: I) -> Vec<Event>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut result: Vec<Event> = events.into_iter().filter(|e| self.matches(e)).collect();
        if self.sorting {
            sort_by_start(&mut result);
        }
        result
    }
}

/// Stable ascending sort by start instant.
pub fn sort_by_start(events: &mut [Event]) {
    events.sort_by_key(|e| e.start);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn event(id: i64, name: &str, start: DateTime<Utc>) -> Event {
        let mut e = Event::new(name, start, start + Duration::hours(1));
        e.id = id;
        e
    }

    /// Reference implementation: a list of independent conditions, all required.
    fn reference_matches(p: &EventParams, e: &Event) -> bool {
        let mut conditions = Vec::new();
        if p.day != 0 {
            conditions.push(e.start.day() == p.day);
        }
        if p.week != 0 {
            conditions.push(e.start.iso_week().week() == p.week);
        }
        if p.month != 0 {
            conditions.push(e.start.month() == p.month);
        }
        if p.year != 0 {
            conditions.push(e.start.year() == p.year as i32);
        }
        if !p.name.is_empty() {
            conditions.push(e.name.to_lowercase() == p.name.to_lowercase());
        }
        if p.start != unset_instant() {
            conditions.push(e.start == p.start);
        }
        if p.end != unset_instant() {
            conditions.push(e.end == p.end);
        }
        conditions.into_iter().all(|c| c)
    }

    /// Small xorshift generator so the property test is reproducible.
    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn below(&mut self, n: u64) -> u64 {
            self.next() % n
        }
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let p = EventParams::all();
        assert!(p.is_wildcard());
        let e = event(1, "Standup", Utc.with_ymd_and_hms(2023, 1, 10, 9, 0, 0).unwrap());
        assert!(p.matches(&e));
    }

    #[test]
    fn test_day_filter() {
        let p = EventParams { day: 10, ..Default::default() };
        let on_10th = event(1, "A", Utc.with_ymd_and_hms(2023, 1, 10, 9, 0, 0).unwrap());
        let on_11th = event(2, "B", Utc.with_ymd_and_hms(2023, 1, 11, 9, 0, 0).unwrap());
        assert!(p.matches(&on_10th));
        assert!(!p.matches(&on_11th));
    }

    #[test]
    fn test_all_fields_are_and_combined() {
        let start = Utc.with_ymd_and_hms(2023, 1, 10, 9, 0, 0).unwrap();
        let e = event(1, "Standup", start);

        // Day matches but month does not: must be rejected
        let p = EventParams { day: 10, month: 2, ..Default::default() };
        assert!(!p.matches(&e));

        // Name matches but year does not
        let p = EventParams { name: "standup".into(), year: 2022, ..Default::default() };
        assert!(!p.matches(&e));

        let p = EventParams {
            day: 10,
            week: 2,
            month: 1,
            year: 2023,
            name: "STANDUP".into(),
            start,
            end: start + Duration::hours(1),
            sorting: false,
        };
        assert!(p.matches(&e));
    }

    #[test]
    fn test_iso_week_across_year_boundary() {
        // 2021-01-03 belongs to ISO week 53 of 2020
        let e = event(1, "Late", Utc.with_ymd_and_hms(2021, 1, 3, 12, 0, 0).unwrap());
        assert!(EventParams { week: 53, ..Default::default() }.matches(&e));
        assert!(EventParams { week: 53, year: 2021, ..Default::default() }.matches(&e));
        assert!(!EventParams { week: 1, ..Default::default() }.matches(&e));
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let e = event(1, "Team Sync", Utc.with_ymd_and_hms(2023, 5, 1, 9, 0, 0).unwrap());
        assert!(EventParams { name: "team sync".into(), ..Default::default() }.matches(&e));
        assert!(!EventParams { name: "team".into(), ..Default::default() }.matches(&e));
    }

    #[test]
    fn test_matches_agrees_with_reference() {
        let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
        let names = ["Standup", "standup", "Review", "Lunch"];
        let base = Utc.with_ymd_and_hms(2022, 12, 20, 0, 0, 0).unwrap();

        let events: Vec<Event> = (0..60)
            .map(|i| {
                let start = base + Duration::hours(rng.below(24 * 40) as i64);
                event(i, names[rng.below(names.len() as u64) as usize], start)
            })
            .collect();

        for _ in 0..2000 {
            let pick = &events[rng.below(events.len() as u64) as usize];
            let p = EventParams {
                day: if rng.below(2) == 0 { 0 } else { rng.below(31) as u32 + 1 },
                week: if rng.below(3) == 0 { pick.start.iso_week().week() } else { 0 },
                month: if rng.below(2) == 0 { 0 } else { rng.below(12) as u32 + 1 },
                year: match rng.below(3) {
                    0 => 2022,
                    1 => 2023,
                    _ => 0,
                },
                name: if rng.below(2) == 0 {
                    String::new()
                } else {
                    names[rng.below(4) as usize].to_string()
                },
                start: if rng.below(4) == 0 { pick.start } else { unset_instant() },
                end: if rng.below(5) == 0 { pick.end } else { unset_instant() },
                sorting: false,
            };

            for e in &events {
                assert_eq!(
                    p.matches(e),
                    reference_matches(&p, e),
                    "params {:?} event {:?}",
                    p,
                    e
                );
            }
        }
    }

    #[test]
    fn test_apply_sorts_stably() {
        let t = |h| Utc.with_ymd_and_hms(2023, 1, 10, h, 0, 0).unwrap();
        let events = vec![
            event(1, "C", t(12)),
            event(2, "A", t(8)),
            event(3, "B", t(12)),
            event(4, "D", t(9)),
        ];

        let sorted = EventParams::all().sorted().apply(events.clone());
        let ids: Vec<i64> = sorted.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);

        let unsorted = EventParams::all().apply(events);
        let ids: Vec<i64> = unsorted.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
