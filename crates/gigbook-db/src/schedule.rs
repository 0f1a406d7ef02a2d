//! Past/upcoming classification of the shows booked at a venue or by an
//! artist.
//!
//! Classification is always computed against the clock at call time and is
//! never stored. A show starting exactly at the evaluation instant is neither
//! past nor upcoming.

use chrono::{DateTime, Utc};

use crate::entities::show;

/// An entity together with every show it is booked into, ordered by start
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct Booked<M> {
    pub entity: M,
    shows: Vec<show::Model>,
}

/// Shows split around an evaluation instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> Partition<T> {
    pub fn map<U, F>(self, mut f: F) -> Partition<U>
    where
        F: FnMut(T) -> U,
    {
        Partition {
            past: self.past.into_iter().map(&mut f).collect(),
            upcoming: self.upcoming.into_iter().map(&mut f).collect(),
        }
    }
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self {
            past: Vec::new(),
            upcoming: Vec::new(),
        }
    }
}

impl<M> Booked<M> {
    pub fn new(entity: M, mut shows: Vec<show::Model>) -> Self {
        shows.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        Self { entity, shows }
    }

    pub fn shows(&self) -> &[show::Model] {
        &self.shows
    }

    pub fn into_parts(self) -> (M, Vec<show::Model>) {
        (self.entity, self.shows)
    }

    pub fn past_shows(&self) -> Vec<&show::Model> {
        self.past_shows_at(Utc::now())
    }

    pub fn past_shows_at(&self, now: DateTime<Utc>) -> Vec<&show::Model> {
        self.shows.iter().filter(|s| starts_at(s) < now).collect()
    }

    pub fn upcoming_shows(&self) -> Vec<&show::Model> {
        self.upcoming_shows_at(Utc::now())
    }

    pub fn upcoming_shows_at(&self, now: DateTime<Utc>) -> Vec<&show::Model> {
        self.shows.iter().filter(|s| starts_at(s) > now).collect()
    }

    pub fn num_past_shows(&self) -> usize {
        self.num_past_shows_at(Utc::now())
    }

    pub fn num_past_shows_at(&self, now: DateTime<Utc>) -> usize {
        self.shows.iter().filter(|s| starts_at(s) < now).count()
    }

    pub fn num_upcoming_shows(&self) -> usize {
        self.num_upcoming_shows_at(Utc::now())
    }

    pub fn num_upcoming_shows_at(&self, now: DateTime<Utc>) -> usize {
        self.shows.iter().filter(|s| starts_at(s) > now).count()
    }

    /// Both halves evaluated against the same instant.
    pub fn partition_at(&self, now: DateTime<Utc>) -> Partition<&show::Model> {
        Partition {
            past: self.past_shows_at(now),
            upcoming: self.upcoming_shows_at(now),
        }
    }
}

fn starts_at(show: &show::Model) -> DateTime<Utc> {
    show.start_time.with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap()
    }

    fn show_at(start: DateTime<Utc>) -> show::Model {
        show::Model {
            id: Uuid::new_v4(),
            start_time: start.fixed_offset(),
            artist_id: Uuid::new_v4(),
            venue_id: Uuid::new_v4(),
        }
    }

    fn booked(offsets_hours: &[i64]) -> Booked<&'static str> {
        let shows = offsets_hours
            .iter()
            .map(|h| show_at(now() + Duration::hours(*h)))
            .collect();
        Booked::new("The Musical Hop", shows)
    }

    #[test]
    fn test_past_and_upcoming_are_split_on_now() {
        let b = booked(&[-48, 24, -1, 72]);
        assert_eq!(b.num_past_shows_at(now()), 2);
        assert_eq!(b.num_upcoming_shows_at(now()), 2);
        assert!(b
            .past_shows_at(now())
            .iter()
            .all(|s| s.start_time < now()));
        assert!(b
            .upcoming_shows_at(now())
            .iter()
            .all(|s| s.start_time > now()));
    }

    #[test]
    fn test_show_at_exactly_now_is_in_neither_set() {
        let b = booked(&[-1, 0, 1]);
        let p = b.partition_at(now());
        assert_eq!(p.past.len(), 1);
        assert_eq!(p.upcoming.len(), 1);
        assert_eq!(
            b.num_past_shows_at(now()) + b.num_upcoming_shows_at(now()),
            b.shows().len() - 1
        );
    }

    #[test]
    fn test_counts_cover_every_show_not_at_now() {
        let b = booked(&[-5, -3, 0, 0, 2, 9, 100]);
        let not_now = b
            .shows()
            .iter()
            .filter(|s| s.start_time != now())
            .count();
        assert_eq!(
            b.num_past_shows_at(now()) + b.num_upcoming_shows_at(now()),
            not_now
        );
    }

    #[test]
    fn test_shows_sorted_ascending() {
        let b = booked(&[10, -10, 5, -20]);
        let times: Vec<_> = b.shows().iter().map(|s| s.start_time).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);

        let past = b.past_shows_at(now());
        assert!(past[0].start_time < past[1].start_time);
    }

    #[test]
    fn test_offsets_compare_by_instant() {
        // 21:30 at UTC+2 is 19:30 UTC, half an hour before `now`.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let mut s = show_at(now());
        s.start_time = plus_two
            .with_ymd_and_hms(2024, 6, 1, 21, 30, 0)
            .unwrap();
        let b = Booked::new((), vec![s]);
        assert_eq!(b.num_past_shows_at(now()), 1);
        assert_eq!(b.num_upcoming_shows_at(now()), 0);
    }

    #[test]
    fn test_show_moves_to_past_as_clock_advances() {
        let b = booked(&[3]);
        assert_eq!(b.num_upcoming_shows_at(now()), 1);
        let later = now() + Duration::hours(4);
        assert_eq!(b.num_upcoming_shows_at(later), 0);
        assert_eq!(b.num_past_shows_at(later), 1);
    }

    #[test]
    fn test_no_shows() {
        let b = Booked::new((), vec![]);
        assert!(b.past_shows().is_empty());
        assert!(b.upcoming_shows().is_empty());
        assert_eq!(b.num_past_shows(), 0);
        assert_eq!(b.num_upcoming_shows(), 0);
    }

    #[test]
    fn test_partition_map() {
        let b = booked(&[-1, 1, 2]);
        let p = b.partition_at(now()).map(|s| s.id);
        assert_eq!(p.past.len(), 1);
        assert_eq!(p.upcoming.len(), 2);
    }
}
