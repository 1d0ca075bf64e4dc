use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;

use crate::commands::giveaway::models::Participant;

// How many ticks the user has for confirming that they want to leave.
pub const LEAVE_CONFIRMATION_TICKS: u32 = 299;
pub const LEAVE_CONFIRMATION_TICK: Duration = Duration::from_secs(1);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EnterOutcome {
    Entered,
    // The user is already in the list, a leave confirmation has to be offered.
    AlreadyEntered,
    // Entries are not accepted anymore.
    Closed,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LeaveOutcome {
    Left,
    TimedOut,
    // Another wait for the same user is running, its counter was reset instead.
    AlreadyPending,
    // The user has no entry to leave.
    NotEntered,
    Closed,
}

#[derive(Debug)]
struct PendingLeave {
    remaining: AtomicU32,
    confirmed: AtomicBool,
}

#[derive(Debug, Default)]
struct Entries {
    order: Vec<u64>,
    participants: HashMap<u64, Participant>,
    closed: bool,
}

// Participants of a single giveaway session. Insertion order is preserved for
// the output, all mutations go through one lock so the count never drifts.
#[derive(Debug)]
pub struct EntryLedger {
    entries: Mutex<Entries>,
    pending: DashMap<u64, Arc<PendingLeave>>,
    confirmation_ticks: u32,
    tick: Duration,
}

impl EntryLedger {
    pub fn new() -> Self {
        EntryLedger::with_confirmation_window(LEAVE_CONFIRMATION_TICKS, LEAVE_CONFIRMATION_TICK)
    }

    pub fn with_confirmation_window(confirmation_ticks: u32, tick: Duration) -> Self {
        EntryLedger {
            entries: Mutex::new(Entries::default()),
            pending: DashMap::new(),
            confirmation_ticks,
            tick,
        }
    }

    pub fn enter(&self, participant: Participant) -> EnterOutcome {
        let mut entries = self.entries.lock();
        if entries.closed {
            return EnterOutcome::Closed;
        }

        let user_id = participant.user_id();
        if entries.participants.contains_key(&user_id) {
            return EnterOutcome::AlreadyEntered;
        }

        entries.order.push(user_id);
        entries.participants.insert(user_id, participant);
        EnterOutcome::Entered
    }

    // Waits until the user confirms leaving or the confirmation window expires.
    // The counter is decremented once per tick.
    pub async fn begin_leave_confirmation(&self, user_id: u64) -> LeaveOutcome {
        {
            let entries = self.entries.lock();
            if entries.closed {
                return LeaveOutcome::Closed;
            }
            if !entries.participants.contains_key(&user_id) {
                return LeaveOutcome::NotEntered;
            }
        }

        let pending = match self.pending.entry(user_id) {
            Entry::Occupied(existing) => {
                let existing = existing.get();
                existing.remaining.store(self.confirmation_ticks, Ordering::SeqCst);
                existing.confirmed.store(false, Ordering::SeqCst);
                return LeaveOutcome::AlreadyPending;
            }
            Entry::Vacant(vacant) => {
                let pending = Arc::new(PendingLeave {
                    remaining: AtomicU32::new(self.confirmation_ticks),
                    confirmed: AtomicBool::new(false),
                });
                vacant.insert(pending.clone());
                pending
            }
        };

        let outcome = loop {
            if pending.confirmed.load(Ordering::SeqCst) {
                break LeaveOutcome::Left;
            }

            if self.is_closed() {
                break LeaveOutcome::Closed;
            }

            let remaining = pending.remaining.load(Ordering::SeqCst);
            if remaining == 0 {
                break LeaveOutcome::TimedOut;
            }

            pending.remaining.store(remaining - 1, Ordering::SeqCst);
            tokio::time::sleep(self.tick).await;
        };

        self.pending
            .remove_if(&user_id, |_, current| Arc::ptr_eq(current, &pending));
        // A confirmation may land right before the wait is unregistered
        match pending.confirmed.load(Ordering::SeqCst) {
            true => LeaveOutcome::Left,
            false => outcome,
        }
    }

    // Confirms the pending wait and removes the participant right away, under
    // the same lock that freezes the entries. Without a pending wait nothing
    // changes and `TimedOut` is returned.
    pub fn confirm_leave(&self, user_id: u64) -> LeaveOutcome {
        let Some(pending) = self.pending.get(&user_id) else {
            return LeaveOutcome::TimedOut;
        };

        let mut entries = self.entries.lock();
        if entries.closed {
            return LeaveOutcome::Closed;
        }
        if !Self::remove(&mut entries, user_id) {
            return LeaveOutcome::NotEntered;
        }
        pending.confirmed.store(true, Ordering::SeqCst);
        LeaveOutcome::Left
    }

    pub fn count(&self) -> usize {
        self.entries.lock().order.len()
    }

    pub fn snapshot(&self) -> Vec<Participant> {
        let entries = self.entries.lock();
        Self::ordered(&entries)
    }

    // Stops accepting any changes and returns the frozen list of participants.
    pub fn close(&self) -> Vec<Participant> {
        let mut entries = self.entries.lock();
        entries.closed = true;
        Self::ordered(&entries)
    }

    pub fn is_closed(&self) -> bool {
        self.entries.lock().closed
    }

    fn remove(entries: &mut Entries, user_id: u64) -> bool {
        if entries.closed || entries.participants.remove(&user_id).is_none() {
            return false;
        }

        entries.order.retain(|id| *id != user_id);
        true
    }

    fn ordered(entries: &Entries) -> Vec<Participant> {
        entries
            .order
            .iter()
            .filter_map(|user_id| entries.participants.get(user_id).cloned())
            .collect()
    }
}
