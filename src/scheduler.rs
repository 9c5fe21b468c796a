//! Deterministic timer wheel driven by a virtual clock.
//!
//! Nothing here reads wall-clock time: the owner calls [`Scheduler::pop_due`]
//! with a target instant and handles each firing before asking for the next
//! one, so a task cancelled while handling an earlier firing never fires.

use std::time::Duration;

pub type TaskId = u64;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A task that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    pub id: TaskId,
    pub kind: K,
    pub generation: u64,
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct Task<K> {
    id: TaskId,
    kind: K,
    generation: u64,
    due: Duration,
    period: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    now: Duration,
    next_id: TaskId,
    tasks: Vec<Task<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            tasks: Vec::new(),
        }
    }
}

impl<K: Copy> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of live tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Fire every `period`, first one period from now
    pub fn schedule_repeating(&mut self, kind: K, generation: u64, period: Duration) -> TaskId {
        let period = period.max(MIN_PERIOD);
        self.insert(kind, generation, period, Some(period))
    }

    /// Fire once, `delay` from now
    pub fn schedule_once(&mut self, kind: K, generation: u64, delay: Duration) -> TaskId {
        self.insert(kind, generation, delay, None)
    }

    fn insert(
        &mut self,
        kind: K,
        generation: u64,
        delay: Duration,
        period: Option<Duration>,
    ) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            kind,
            generation,
            due: self.now + delay,
            period,
        });
        id
    }

    /// Remove a task. Returns false if it was not scheduled (already fired or cancelled).
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Pop the earliest task due at or before `until`, moving the clock to its due time.
    ///
    /// Ties go to the task registered first. When nothing is due the clock
    /// moves to `until` and `None` is returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<K>> {
        let pos = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(pos, _)| pos);

        let Some(pos) = pos else {
            self.now = self.now.max(until);
            return None;
        };

        let task = &mut self.tasks[pos];
        let fired = Fired {
            id: task.id,
            kind: task.kind,
            generation: task.generation,
            at: task.due,
        };
        self.now = self.now.max(task.due);

        let period = task.period;
        match period {
            Some(period) => task.due += period,
            None => {
                self.tasks.remove(pos);
            }
        }

        Some(fired)
    }
}
