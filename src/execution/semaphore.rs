use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Blocking counting semaphore that bounds how many column tasks run at once, independently of
/// the pool size.
///
/// Permits are handed out as [`ColumnPermit`] guards and returned on drop, so a column task
/// that panics inside a detector still frees its slot. Lock poisoning is ignored: the guarded
/// state is a plain counter.
pub struct Semaphore {
    available: Mutex<usize>,
    freed: Condvar,
}

/// One in-flight slot; released when dropped.
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct ColumnPermit<'a> {
    sem: &'a Semaphore,
    waited: Duration,
}

impl ColumnPermit<'_> {
    /// Time spent blocked before the slot was granted (zero if none).
    pub fn waited(&self) -> Duration {
        self.waited
    }
}

impl Drop for ColumnPermit<'_> {
    fn drop(&mut self) {
        self.sem.release();
    }
}

impl Semaphore {
    /// A zero count is raised to one; the engine rejects zero before getting here.
    pub fn new(permits: usize) -> Self {
        Self {
            available: Mutex::new(permits.max(1)),
            freed: Condvar::new(),
        }
    }

    /// Block until a slot is free.
    pub fn acquire(&self) -> ColumnPermit<'_> {
        let mut available = self.available.lock().unwrap_or_else(PoisonError::into_inner);
        let waited = if *available == 0 {
            let start = Instant::now();
            available = self
                .freed
                .wait_while(available, |n| *n == 0)
                .unwrap_or_else(PoisonError::into_inner);
            start.elapsed()
        } else {
            Duration::ZERO
        };
        *available -= 1;
        ColumnPermit { sem: self, waited }
    }

    fn release(&self) {
        let mut available = self.available.lock().unwrap_or_else(PoisonError::into_inner);
        *available += 1;
        self.freed.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::Semaphore;

    #[test]
    fn acquire_without_contention_does_not_wait() {
        let sem = Semaphore::new(2);
        let a = sem.acquire();
        let b = sem.acquire();
        assert_eq!(a.waited(), Duration::ZERO);
        assert_eq!(b.waited(), Duration::ZERO);
    }

    #[test]
    fn dropping_a_permit_unblocks_a_waiter() {
        let sem = Semaphore::new(1);
        let held = sem.acquire();
        std::thread::scope(|s| {
            s.spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                drop(held);
            });
            assert!(sem.acquire().waited() > Duration::ZERO);
        });
    }

    #[test]
    fn permit_is_returned_when_the_holder_panics() {
        let sem = Arc::new(Semaphore::new(1));
        let worker = {
            let sem = Arc::clone(&sem);
            std::thread::spawn(move || {
                let _permit = sem.acquire();
                panic!("detector blew up");
            })
        };
        assert!(worker.join().is_err());
        assert_eq!(sem.acquire().waited(), Duration::ZERO);
    }
}
