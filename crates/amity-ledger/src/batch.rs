//! Adaptive batch-size control loop.
//!
//! Slow-start-style growth on high utilization, halving back-off when the
//! batch sat idle past expiry, bounded to `[MIN_BATCH_SIZE,
//! MAX_BATCH_SIZE]` on both sides.  This is the system's only control
//! loop; actual message batching happens outside the reducer.

use amity_shared::constants::{BATCH_IDLE_SECS, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use amity_shared::Principal;
use amity_store::Database;
use chrono::{DateTime, Utc};

use crate::error::{LedgerError, Result};
use crate::events::Event;

/// Re-tune the caller's batch size from its recent utilization.
///
/// Idle past expiry: halve (floor, clamped to the minimum), drop the
/// in-flight items and restamp.  Otherwise, at >= 50% utilization the
/// size doubles (clamped to the maximum).
pub fn optimize(db: &Database, caller: &Principal, now: DateTime<Utc>) -> Result<Event> {
    let mut batch = db.get_batch_or_default(caller, now)?;
    let elapsed = (now - batch.last_batch_at).num_seconds();

    if elapsed > BATCH_IDLE_SECS {
        batch.batch_size = (batch.batch_size / 2).max(MIN_BATCH_SIZE);
        batch.current_items = 0;
        batch.last_batch_at = now;
    } else if batch.current_items >= batch.batch_size / 2 {
        batch.batch_size = (batch.batch_size * 2).min(MAX_BATCH_SIZE);
    }
    db.upsert_batch(&batch)?;

    Ok(Event::BatchOptimized {
        principal: *caller,
        batch_size: batch.batch_size,
        timestamp: now,
    })
}

/// Directly set the caller's batch size, bounds-checked.
pub fn set_size(db: &Database, caller: &Principal, size: u32, now: DateTime<Utc>) -> Result<Event> {
    if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&size) {
        return Err(LedgerError::InvalidInput(format!(
            "batch size must be within [{MIN_BATCH_SIZE}, {MAX_BATCH_SIZE}], got {size}"
        )));
    }

    let mut batch = db.get_batch_or_default(caller, now)?;
    batch.batch_size = size;
    db.upsert_batch(&batch)?;

    Ok(Event::BatchSizeSet {
        principal: *caller,
        batch_size: size,
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use amity_store::Batch;
    use chrono::Duration;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    const P: Principal = Principal([1; 32]);

    fn seed(db: &Database, size: u32, items: u32, at: DateTime<Utc>) {
        let mut batch = Batch::default_for(P, at);
        batch.batch_size = size;
        batch.current_items = items;
        db.upsert_batch(&batch).unwrap();
    }

    #[test]
    fn idle_batch_halves_with_floor_at_minimum() {
        let db = db();
        let start = Utc::now();
        seed(&db, 16, 7, start);

        optimize(&db, &P, start + Duration::seconds(BATCH_IDLE_SECS + 1)).unwrap();

        let batch = db.get_batch(&P).unwrap().unwrap();
        // 16 / 2 = 8, floored up to the minimum of 10.
        assert_eq!(batch.batch_size, 10);
        assert_eq!(batch.current_items, 0);
    }

    #[test]
    fn high_utilization_doubles_up_to_maximum() {
        let db = db();
        let now = Utc::now();
        seed(&db, 60, 30, now);

        optimize(&db, &P, now).unwrap();
        assert_eq!(db.get_batch(&P).unwrap().unwrap().batch_size, 100);
    }

    #[test]
    fn low_utilization_within_window_is_unchanged() {
        let db = db();
        let now = Utc::now();
        seed(&db, 40, 19, now);

        optimize(&db, &P, now + Duration::seconds(10)).unwrap();
        let batch = db.get_batch(&P).unwrap().unwrap();
        assert_eq!(batch.batch_size, 40);
        assert_eq!(batch.current_items, 19);
    }

    #[test]
    fn size_stays_bounded_over_any_sequence() {
        let db = db();
        let mut now = Utc::now();
        seed(&db, 50, 50, now);

        for i in 0..50 {
            // Alternate saturation and long idleness.
            if i % 2 == 0 {
                let mut batch = db.get_batch(&P).unwrap().unwrap();
                batch.current_items = batch.batch_size;
                db.upsert_batch(&batch).unwrap();
            } else {
                now += Duration::seconds(BATCH_IDLE_SECS + 100);
            }
            optimize(&db, &P, now).unwrap();

            let size = db.get_batch(&P).unwrap().unwrap().batch_size;
            assert!((MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&size));
        }
    }

    #[test]
    fn set_size_bounds_checked() {
        let db = db();
        let now = Utc::now();

        assert!(matches!(
            set_size(&db, &P, 9, now).unwrap_err(),
            LedgerError::InvalidInput(_)
        ));
        assert!(matches!(
            set_size(&db, &P, 101, now).unwrap_err(),
            LedgerError::InvalidInput(_)
        ));

        set_size(&db, &P, 10, now).unwrap();
        assert_eq!(db.get_batch(&P).unwrap().unwrap().batch_size, 10);
        set_size(&db, &P, 100, now).unwrap();
        assert_eq!(db.get_batch(&P).unwrap().unwrap().batch_size, 100);
    }
}
