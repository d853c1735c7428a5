//! Auto-off bookkeeping: one cancellable schedule per powered-on device.
//!
//! [`AutoOffTimers`] does not spawn anything itself; it hands out a
//! [`Schedule`] (ticket + cancellation token) that the caller races against
//! a sleep. When the sleep wins, the caller must [`claim`](AutoOffTimers::claim)
//! the ticket before switching the device off, so a schedule that was
//! cancelled or replaced in the meantime never acts.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use powerhub_domain::id::DeviceId;

/// Handle for a single armed auto-off.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub ticket: u64,
    pub token: CancellationToken,
}

/// Pending auto-off schedules keyed by device.
#[derive(Debug)]
pub struct AutoOffTimers {
    root: CancellationToken,
    next_ticket: u64,
    pending: HashMap<DeviceId, Schedule>,
}

impl Default for AutoOffTimers {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}

impl AutoOffTimers {
    /// Create an empty set whose schedules are all children of `root`.
    #[must_use]
    pub fn new(root: CancellationToken) -> Self {
        Self {
            root,
            next_ticket: 0,
            pending: HashMap::new(),
        }
    }

    /// Arm a new schedule for `device_id`, cancelling the previous one.
    pub fn arm(&mut self, device_id: DeviceId) -> Schedule {
        self.next_ticket += 1;
        let schedule = Schedule {
            ticket: self.next_ticket,
            token: self.root.child_token(),
        };
        if let Some(previous) = self.pending.insert(device_id, schedule.clone()) {
            previous.token.cancel();
        }
        schedule
    }

    /// Cancel the pending schedule for `device_id`, if any.
    ///
    /// Returns `true` when something was cancelled.
    pub fn disarm(&mut self, device_id: DeviceId) -> bool {
        match self.pending.remove(&device_id) {
            Some(schedule) => {
                schedule.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Take ownership of an expired schedule.
    ///
    /// Succeeds only if `ticket` is still the current, uncancelled schedule
    /// for `device_id`; the schedule is removed on success.
    pub fn claim(&mut self, device_id: DeviceId, ticket: u64) -> bool {
        let current = self
            .pending
            .get(&device_id)
            .is_some_and(|s| s.ticket == ticket && !s.token.is_cancelled());
        if current {
            self.pending.remove(&device_id);
        }
        current
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Cancel every pending schedule, including ones armed later.
    pub fn cancel_all(&mut self) {
        self.root.cancel();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_arm_schedule_with_increasing_tickets() {
        let mut timers = AutoOffTimers::default();
        let a = timers.arm(DeviceId::new());
        let b = timers.arm(DeviceId::new());
        assert!(b.ticket > a.ticket);
        assert_eq!(timers.len(), 2);
    }

    #[test]
    fn should_cancel_previous_schedule_when_rearmed() {
        let mut timers = AutoOffTimers::default();
        let id = DeviceId::new();
        let first = timers.arm(id);
        let second = timers.arm(id);

        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert!(!timers.claim(id, first.ticket));
        assert!(timers.claim(id, second.ticket));
    }

    #[test]
    fn should_cancel_token_when_disarmed() {
        let mut timers = AutoOffTimers::default();
        let id = DeviceId::new();
        let schedule = timers.arm(id);

        assert!(timers.disarm(id));
        assert!(schedule.token.is_cancelled());
        assert!(timers.is_empty());
        assert!(!timers.claim(id, schedule.ticket));
    }

    #[test]
    fn should_report_nothing_to_disarm_for_unknown_device() {
        let mut timers = AutoOffTimers::default();
        assert!(!timers.disarm(DeviceId::new()));
    }

    #[test]
    fn should_claim_schedule_only_once() {
        let mut timers = AutoOffTimers::default();
        let id = DeviceId::new();
        let schedule = timers.arm(id);

        assert!(timers.claim(id, schedule.ticket));
        assert!(!timers.claim(id, schedule.ticket));
        assert!(timers.is_empty());
    }

    #[test]
    fn should_cancel_all_children_of_root() {
        let mut timers = AutoOffTimers::default();
        let a = timers.arm(DeviceId::new());
        let b = timers.arm(DeviceId::new());

        timers.cancel_all();

        assert!(a.token.is_cancelled());
        assert!(b.token.is_cancelled());
        assert!(timers.is_empty());
        assert!(timers.arm(DeviceId::new()).token.is_cancelled());
    }
}
