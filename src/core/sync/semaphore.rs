//=========================================================================
// Counting Semaphore
//=========================================================================
//
// Admission control for the obstacle pool.
//
// Architecture:
//   bounded(limit) channel pre-filled with `limit` tokens
//     acquire()  → recv a token        → Permit
//     Permit::drop → send the token back
//
// A permit is released on every exit path of its holder (normal return,
// cancellation, unwinding panic) because release happens in `Drop`.
// `in_use` is decremented before the token returns, so it can never be
// observed above `limit`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{bounded, select, Receiver, Sender};
use log::error;

//=== Internal Dependencies ===============================================

use super::stop_signal::StopSignal;

//=== Semaphore ===========================================================

pub struct Semaphore {
    tokens: Receiver<()>,
    returns: Sender<()>,
    limit: usize,
    in_use: AtomicUsize,
    peak: AtomicUsize,
}

impl Semaphore {
    pub fn new(limit: usize) -> Self {
        let (returns, tokens) = bounded(limit);
        for _ in 0..limit {
            // Capacity equals limit, so this never fails.
            let _ = returns.try_send(());
        }

        Self {
            tokens,
            returns,
            limit,
            in_use: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    //--- Acquisition ------------------------------------------------------

    /// Blocks until a permit is free or `stop` fires.
    ///
    /// Returns `None` when cancelled; a permit won in a race with the
    /// stop signal is handed straight back.
    pub fn acquire(&self, stop: &StopSignal) -> Option<Permit<'_>> {
        if stop.is_triggered() {
            return None;
        }

        let admitted = select! {
            recv(self.tokens) -> token => token.ok().map(|()| self.admit()),
            recv(stop.listener()) -> _ => None,
        };

        let permit = admitted?;
        if stop.is_triggered() {
            return None;
        }
        Some(permit)
    }

    /// Takes a permit only if one is free right now.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        self.tokens.try_recv().ok().map(|()| self.admit())
    }

    fn admit(&self) -> Permit<'_> {
        let now = self.in_use.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
        Permit { semaphore: self }
    }

    fn release(&self) {
        self.in_use.fetch_sub(1, Ordering::AcqRel);
        if self.returns.try_send(()).is_err() {
            error!("Semaphore token could not be returned (limit {})", self.limit);
        }
    }

    //--- Telemetry --------------------------------------------------------

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Permits currently held.
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Acquire)
    }

    /// Highest number of permits ever held at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }

    pub fn available(&self) -> usize {
        self.tokens.len()
    }
}

//=== Permit ==============================================================

/// Scoped admission; releases its token on drop.
#[must_use = "a permit is released as soon as it is dropped"]
pub struct Permit<'a> {
    semaphore: &'a Semaphore,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn hands_out_exactly_limit_permits() {
        let semaphore = Semaphore::new(2);
        let a = semaphore.try_acquire();
        let b = semaphore.try_acquire();
        let c = semaphore.try_acquire();

        assert!(a.is_some());
        assert!(b.is_some());
        assert!(c.is_none());
        assert_eq!(semaphore.in_use(), 2);
        assert_eq!(semaphore.available(), 0);
    }

    #[test]
    fn drop_releases_permit() {
        let semaphore = Semaphore::new(1);
        {
            let _permit = semaphore.try_acquire().unwrap();
            assert!(semaphore.try_acquire().is_none());
        }
        assert_eq!(semaphore.in_use(), 0);
        assert!(semaphore.try_acquire().is_some());
        assert_eq!(semaphore.peak(), 1);
    }

    #[test]
    fn panic_releases_permit() {
        let semaphore = Semaphore::new(1);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _permit = semaphore.try_acquire().unwrap();
            panic!("worker fault");
        }));

        assert!(result.is_err());
        assert_eq!(semaphore.in_use(), 0);
        assert_eq!(semaphore.available(), 1);
    }

    #[test]
    fn blocked_acquire_is_cancelled_by_stop() {
        let semaphore = Arc::new(Semaphore::new(1));
        let stop = Arc::new(StopSignal::new());
        let held = semaphore.try_acquire().unwrap();

        let waiter = {
            let semaphore = Arc::clone(&semaphore);
            let stop = Arc::clone(&stop);
            thread::spawn(move || semaphore.acquire(&stop).is_some())
        };

        thread::sleep(Duration::from_millis(20));
        stop.trigger();

        assert!(!waiter.join().unwrap());
        drop(held);
        assert_eq!(semaphore.in_use(), 0);
    }

    #[test]
    fn blocked_acquire_proceeds_when_permit_frees() {
        let semaphore = Arc::new(Semaphore::new(1));
        let stop = Arc::new(StopSignal::new());
        let held = semaphore.try_acquire().unwrap();

        let waiter = {
            let semaphore = Arc::clone(&semaphore);
            let stop = Arc::clone(&stop);
            thread::spawn(move || semaphore.acquire(&stop).is_some())
        };

        thread::sleep(Duration::from_millis(20));
        drop(held);

        assert!(waiter.join().unwrap());
        assert_eq!(semaphore.in_use(), 0);
    }

    #[test]
    fn in_use_never_exceeds_limit_under_contention() {
        let semaphore = Arc::new(Semaphore::new(3));
        let stop = Arc::new(StopSignal::new());

        let workers: Vec<_> = (0..12)
            .map(|_| {
                let semaphore = Arc::clone(&semaphore);
                let stop = Arc::clone(&stop);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let permit = semaphore.acquire(&stop).unwrap();
                        assert!(semaphore.in_use() <= 3);
                        thread::yield_now();
                        drop(permit);
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        assert!(semaphore.peak() <= 3);
        assert_eq!(semaphore.in_use(), 0);
        assert_eq!(semaphore.available(), 3);
    }
}
