//! Cooperative update scheduling.
//!
//! The render loop is single-threaded; this module just tracks when each
//! periodic job is next due so the loop can poll cheaply. Three cadences
//! coexist: per-second clock ticks, per-minute marker label refreshes, and
//! the slow terminator recompute. Resize events go through a debouncer so a
//! drag produces one reprojection, not hundreds.

use std::time::{Duration, Instant};

use crate::constants::RESIZE_DEBOUNCE;

/// Handle for a registered periodic job. Cancelling the handle stops the job;
/// a job's lifetime is tied to whatever owns the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

struct Task {
    id: TaskId,
    interval: Duration,
    next_due: Instant,
}

/// Poll-based registry of periodic jobs.
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job firing every `interval`, first due one interval from
    /// now.
    pub fn register(&mut self, interval: Duration, now: Instant) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            interval,
            next_due: now + interval,
        });
        id
    }

    /// Deregister a job. Unknown ids are a no-op, so teardown paths can
    /// cancel unconditionally.
    pub fn cancel(&mut self, id: TaskId) {
        self.tasks.retain(|task| task.id != id);
    }

    /// Jobs due at `now`, each advanced to its next deadline.
    ///
    /// A job that fell multiple intervals behind (suspend, long render)
    /// fires once and re-anchors on `now` rather than replaying the backlog.
    pub fn due(&mut self, now: Instant) -> Vec<TaskId> {
        let mut fired = Vec::new();
        for task in &mut self.tasks {
            if now >= task.next_due {
                fired.push(task.id);
                task.next_due = now + task.interval;
            }
        }
        fired
    }

    /// The earliest upcoming deadline, for sizing the poll sleep.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.iter().map(|task| task.next_due).min()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Trailing-edge debouncer for resize events.
///
/// Every trigger pushes the deadline out by the window; the action fires
/// once, after events stop arriving.
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn for_resize() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }

    /// Record an event, restarting the quiet-period window.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// True once the window has elapsed with no further triggers. Consumes
    /// the pending state, so the action runs exactly once per burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_secs(1);

    #[test]
    fn job_is_not_due_before_its_interval() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(TICK, start);

        assert!(scheduler.due(start).is_empty());
        assert_eq!(scheduler.due(start + TICK), vec![id]);
    }

    #[test]
    fn firing_advances_the_deadline() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(TICK, start);

        assert_eq!(scheduler.due(start + TICK), vec![id]);
        assert!(scheduler.due(start + TICK).is_empty());
        assert_eq!(scheduler.due(start + TICK * 2), vec![id]);
    }

    #[test]
    fn a_lagging_job_fires_once_not_per_missed_interval() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(TICK, start);

        // Ten intervals pass unobserved
        assert_eq!(scheduler.due(start + TICK * 10), vec![id]);
        // Re-anchored on the observation, not on the original schedule
        assert!(scheduler.due(start + TICK * 10 + TICK / 2).is_empty());
        assert_eq!(scheduler.due(start + TICK * 11), vec![id]);
    }

    #[test]
    fn cancelled_jobs_never_fire_again() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let keep = scheduler.register(TICK, start);
        let drop = scheduler.register(TICK, start);

        scheduler.cancel(drop);
        assert_eq!(scheduler.due(start + TICK), vec![keep]);
        // Cancelling twice is fine
        scheduler.cancel(drop);
    }

    #[test]
    fn mixed_cadences_fire_independently() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let fast = scheduler.register(TICK, start);
        let slow = scheduler.register(TICK * 60, start);

        assert_eq!(scheduler.due(start + TICK), vec![fast]);
        let at_minute = scheduler.due(start + TICK * 60);
        assert!(at_minute.contains(&fast));
        assert!(at_minute.contains(&slow));
    }

    #[test]
    fn debouncer_coalesces_a_burst_into_one_firing() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(200));

        for ms in [0u64, 50, 100, 150] {
            debouncer.trigger(start + Duration::from_millis(ms));
            assert!(!debouncer.fire(start + Duration::from_millis(ms + 10)));
        }

        // 200ms of quiet after the last trigger
        assert!(debouncer.fire(start + Duration::from_millis(150 + 200)));
        // Consumed: no second firing
        assert!(!debouncer.fire(start + Duration::from_millis(1000)));
    }

    #[test]
    fn debouncer_is_idle_until_triggered() {
        let mut debouncer = Debouncer::for_resize();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire(Instant::now()));
    }
}
