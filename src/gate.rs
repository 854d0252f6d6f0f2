use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Counting admission gate bounding how many cast tasks run their body at once.
///
/// Throttles texture and image access, it carries no ordering guarantees.
#[derive(Debug)]
pub struct AdmissionGate {
    capacity: usize,
    available: Mutex<usize>,
    released: Condvar,
}

/// Held while a task runs; returns its slot to the gate on drop.
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct Permit<'a> {
    gate: &'a AdmissionGate,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            available: Mutex::new(capacity),
            released: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        *self.lock()
    }

    /// Blocks until a slot is free.
    pub fn acquire(&self) -> Permit<'_> {
        let mut available = self.lock();
        while *available == 0 {
            available = self
                .released
                .wait(available)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *available -= 1;
        Permit { gate: self }
    }

    // a panicking task never leaves the counter half-updated, so poisoning is ignored
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.available.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        *self.gate.lock() += 1;
        self.gate.released.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn permits_return_on_drop() {
        let gate = AdmissionGate::new(2);
        let a = gate.acquire();
        let b = gate.acquire();
        assert_eq!(gate.available(), 0);
        drop(a);
        assert_eq!(gate.available(), 1);
        drop(b);
        assert_eq!(gate.available(), gate.capacity());
    }

    #[test]
    fn never_admits_more_than_capacity() {
        let gate = AdmissionGate::new(3);
        let running = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| {
                    let _permit = gate.acquire();
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(2));
                    running.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(gate.available(), 3);
    }
}
