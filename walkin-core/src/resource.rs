//! The single shared exclusive resource.
//!
//! Exclusion comes only from a one-permit semaphore. The "locked" flag is a
//! separate relaxed atomic that is written after the permit is taken and
//! cleared after it is returned; readers may observe it at any point in
//! between. That observation window is what produces walk-ins.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::Rng;
use tokio::sync::Semaphore;

use crate::decision::DecisionEngine;

#[derive(Debug)]
pub struct Resource {
    permit: Semaphore,
    locked: AtomicBool,
    lock_probability: f64,
    occupants: AtomicUsize,
    peak_occupancy: AtomicUsize,
}

impl Resource {
    pub fn new(lock_probability: f64) -> Self {
        Self {
            permit: Semaphore::new(1),
            locked: AtomicBool::new(false),
            lock_probability,
            occupants: AtomicUsize::new(0),
            peak_occupancy: AtomicUsize::new(0),
        }
    }

    /// Non-blocking attempt to get in. On success the new occupant locks the
    /// door with the configured probability, drawn from `rng`.
    pub fn try_acquire<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Occupancy<'_>> {
        let permit = self.permit.try_acquire().ok()?;
        // Returned by hand in `vacate`.
        permit.forget();

        let inside = self.occupants.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_occupancy.fetch_max(inside, Ordering::SeqCst);

        let locked = DecisionEngine::will_lock(rng, self.lock_probability);
        self.locked.store(locked, Ordering::Relaxed);

        Some(Occupancy {
            resource: self,
            locked,
        })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    /// True when nobody holds the resource right now.
    pub fn is_available(&self) -> bool {
        self.permit.available_permits() > 0
    }

    pub fn occupants(&self) -> usize {
        self.occupants.load(Ordering::SeqCst)
    }

    pub fn peak_occupancy(&self) -> usize {
        self.peak_occupancy.load(Ordering::SeqCst)
    }

    fn vacate(&self) {
        self.occupants.fetch_sub(1, Ordering::SeqCst);
        self.permit.add_permits(1);
        // Cleared after the permit is back: a new occupant's flag can be
        // overwritten here.
        self.locked.store(false, Ordering::Relaxed);
    }
}

/// Proof of holding the resource. Releasing happens exactly once, either
/// through [`Occupancy::release`] or on drop.
#[derive(Debug)]
#[must_use = "dropping an Occupancy releases the resource immediately"]
pub struct Occupancy<'a> {
    resource: &'a Resource,
    locked: bool,
}

impl Occupancy<'_> {
    /// Whether this occupant locked the door when getting in.
    pub fn locked_door(&self) -> bool {
        self.locked
    }

    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Occupancy<'_> {
    fn drop(&mut self) {
        self.resource.vacate();
    }
}
