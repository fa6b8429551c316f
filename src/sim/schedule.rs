//! Delayed-action queue
//!
//! Spawn cadences, entity lifetimes and enemy fire are all entries in one
//! list serviced by the simulation loop. Each entry carries its due time, the
//! action, an optional repeat period and a cancellation key.

use super::state::EntityId;

/// Cancellation handle for scheduled entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleKey {
    EnemySpawns,
    AsteroidSpawns,
    /// Every timer owned by one entity
    Entity(EntityId),
}

/// Work performed when an entry comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SpawnEnemy,
    SpawnAsteroid,
    EnemyFire(EntityId),
    /// End of a fragment's drift; fade then expire
    BeginFade(EntityId),
    /// Lifetime over (left the field or finished fading)
    Expire(EntityId),
}

#[derive(Debug, Clone)]
struct Entry {
    due: f64,
    action: Action,
    key: ScheduleKey,
    period: Option<f64>,
    /// Firings left for counted repeats; `None` repeats forever
    remaining: Option<u32>,
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Scheduler {
    /// Run `action` once at `due`
    pub fn once(&mut self, key: ScheduleKey, action: Action, due: f64) {
        self.push(key, action, due, None, Some(1));
    }

    /// Run `action` at `first_due` and then every `period` until cancelled
    pub fn repeating(&mut self, key: ScheduleKey, action: Action, first_due: f64, period: f64) {
        self.push(key, action, first_due, Some(period), None);
    }

    /// Run `action` `count` times, `period` apart, starting at `first_due`
    pub fn repeat_n(
        &mut self,
        key: ScheduleKey,
        action: Action,
        first_due: f64,
        period: f64,
        count: u32,
    ) {
        if count == 0 {
            return;
        }
        self.push(key, action, first_due, Some(period), Some(count));
    }

    fn push(
        &mut self,
        key: ScheduleKey,
        action: Action,
        due: f64,
        period: Option<f64>,
        remaining: Option<u32>,
    ) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            due,
            action,
            key,
            period,
            remaining,
            seq,
        });
    }

    /// Drop every entry with this key. Cancelling twice is a no-op.
    pub fn cancel(&mut self, key: ScheduleKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        before - self.entries.len()
    }

    pub fn is_armed(&self, key: ScheduleKey) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending due time
    pub fn next_due(&self) -> Option<f64> {
        self.entries.iter().map(|e| e.due).reduce(f64::min)
    }

    /// Pop the earliest entry due at or before `now`
    ///
    /// Ties go to the entry scheduled first. Repeating entries are re-queued
    /// one period later; a lagging frame never replays missed periods.
    pub fn pop_due(&mut self, now: f64) -> Option<Action> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[index];
        let action = entry.action;
        if let Some(remaining) = entry.remaining.as_mut() {
            *remaining -= 1;
        }

        match (entry.period, entry.remaining) {
            (_, Some(0)) | (None, _) => {
                self.entries.swap_remove(index);
            }
            (Some(period), _) => {
                let mut next = entry.due + period;
                if next <= now {
                    next = now + period;
                }
                entry.due = next;
            }
        }

        log::trace!("Scheduled action fired at {:.3}: {:?}", now, action);
        Some(action)
    }
}
