//! Running maximum of a collection's size.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashSet;

/// Anything with a current membership size.
pub trait Membership {
    fn member_count(&self) -> usize;
}

impl<T> Membership for Vec<T> {
    fn member_count(&self) -> usize {
        self.len()
    }
}

impl<T, S> Membership for HashSet<T, S> {
    fn member_count(&self) -> usize {
        self.len()
    }
}

impl<T: Eq + std::hash::Hash> Membership for DashSet<T> {
    fn member_count(&self) -> usize {
        self.len()
    }
}

/// Monotonic peak of an observed size. Seeded at bind time, so the peak is
/// never below the size the collection had when tracking started.
#[derive(Debug, Default)]
pub struct PeakTracker {
    max: AtomicUsize,
}

impl PeakTracker {
    pub fn new(initial: usize) -> Self {
        Self {
            max: AtomicUsize::new(initial),
        }
    }

    pub fn bind<C: Membership + ?Sized>(collection: &C) -> Self {
        Self::new(collection.member_count())
    }

    pub fn record(&self, len: usize) {
        self.max.fetch_max(len, Ordering::Relaxed);
    }

    pub fn read(&self) -> usize {
        self.max.load(Ordering::Relaxed)
    }
}
