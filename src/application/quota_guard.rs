//! Guest creation cooldown tracking.
//!
//! This is a courtesy throttle keyed by client address, not a security
//! boundary: state lives in process memory and resets on restart. It is
//! distinct from the coarse per-minute request limiter in
//! [`crate::api::middleware::rate_limit`], which caps request volume
//! regardless of outcome.

use std::net::IpAddr;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Tracks the last successful guest link creation per client address.
///
/// `try_reserve` performs the check and the timestamp write under the map's
/// per-key lock, so two concurrent guest requests from one address cannot
/// both pass. A reservation taken for a create that subsequently fails is
/// undone with [`QuotaGuard::rollback`], keeping quota consumption tied to
/// persisted links only.
pub struct QuotaGuard {
    cooldown: Duration,
    entries: DashMap<IpAddr, DateTime<Utc>>,
}

/// Proof of a successful reservation, holding what `rollback` needs to
/// restore the prior state.
#[derive(Debug)]
pub struct QuotaReservation {
    key: IpAddr,
    previous: Option<DateTime<Utc>>,
}

impl QuotaGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            entries: DashMap::new(),
        }
    }

    /// Reserves a guest creation slot for `key`.
    ///
    /// Denials return the remaining wait, rounded up to whole minutes.
    pub fn try_reserve(&self, key: IpAddr) -> Result<QuotaReservation, i64> {
        self.try_reserve_at(key, Utc::now())
    }

    fn try_reserve_at(&self, key: IpAddr, now: DateTime<Utc>) -> Result<QuotaReservation, i64> {
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let last = *occupied.get();
                let next_allowed = last + self.cooldown;
                if now < next_allowed {
                    return Err(minutes_ceil(next_allowed - now));
                }
                occupied.insert(now);
                Ok(QuotaReservation {
                    key,
                    previous: Some(last),
                })
            }
            Entry::Vacant(vacant) => {
                vacant.insert(now);
                Ok(QuotaReservation {
                    key,
                    previous: None,
                })
            }
        }
    }

    /// Undoes a reservation after a failed create, restoring the timestamp
    /// that was in place before it.
    pub fn rollback(&self, reservation: QuotaReservation) {
        match reservation.previous {
            Some(previous) => {
                self.entries.insert(reservation.key, previous);
            }
            None => {
                self.entries.remove(&reservation.key);
            }
        }
    }
}

/// Rounds a remaining wait up to whole minutes, never below one.
fn minutes_ceil(remaining: Duration) -> i64 {
    let ms = remaining.num_milliseconds().max(0);
    ((ms + 59_999) / 60_000).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> IpAddr {
        "203.0.113.7".parse().unwrap()
    }

    fn guard() -> QuotaGuard {
        QuotaGuard::new(Duration::hours(1))
    }

    #[test]
    fn test_first_reservation_succeeds() {
        let guard = guard();
        assert!(guard.try_reserve(key()).is_ok());
    }

    #[test]
    fn test_reservation_within_cooldown_is_denied() {
        let guard = guard();
        let now = Utc::now();

        guard.try_reserve_at(key(), now).unwrap();

        let denied = guard.try_reserve_at(key(), now + Duration::minutes(10));
        assert_eq!(denied.unwrap_err(), 50);
    }

    #[test]
    fn test_retry_minutes_round_up() {
        let guard = guard();
        let now = Utc::now();

        guard.try_reserve_at(key(), now).unwrap();

        // 59m30s remaining rounds up to a full hour
        let denied = guard.try_reserve_at(key(), now + Duration::seconds(30));
        assert_eq!(denied.unwrap_err(), 60);
    }

    #[test]
    fn test_immediate_retry_reports_full_window() {
        let guard = guard();
        let now = Utc::now();

        guard.try_reserve_at(key(), now).unwrap();

        let denied = guard.try_reserve_at(key(), now);
        assert_eq!(denied.unwrap_err(), 60);
    }

    #[test]
    fn test_reservation_after_cooldown_succeeds_and_resets_window() {
        let guard = guard();
        let now = Utc::now();

        guard.try_reserve_at(key(), now).unwrap();

        let later = now + Duration::minutes(61);
        guard.try_reserve_at(key(), later).unwrap();

        // the window restarts from the second creation
        let denied = guard.try_reserve_at(key(), later + Duration::minutes(59));
        assert!(denied.is_err());
        assert!(guard.try_reserve_at(key(), later + Duration::minutes(60)).is_ok());
    }

    #[test]
    fn test_distinct_keys_do_not_interfere() {
        let guard = guard();
        let now = Utc::now();
        let other: IpAddr = "198.51.100.4".parse().unwrap();

        guard.try_reserve_at(key(), now).unwrap();
        assert!(guard.try_reserve_at(other, now).is_ok());
    }

    #[test]
    fn test_rollback_of_first_reservation_clears_entry() {
        let guard = guard();
        let now = Utc::now();

        let reservation = guard.try_reserve_at(key(), now).unwrap();
        guard.rollback(reservation);

        assert!(guard.try_reserve_at(key(), now).is_ok());
    }

    #[test]
    fn test_rollback_restores_previous_timestamp() {
        let guard = guard();
        let now = Utc::now();

        guard.try_reserve_at(key(), now).unwrap();

        let later = now + Duration::minutes(61);
        let reservation = guard.try_reserve_at(key(), later).unwrap();
        guard.rollback(reservation);

        // back on the original window: 61 minutes in, a retry is allowed again
        assert!(guard.try_reserve_at(key(), later).is_ok());
    }
}
