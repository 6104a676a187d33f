/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::TravelInterrupted;

/**
 * Time source for the engine.
 *
 * `sleep` is the only place the engine blocks while servicing a call. `elapsed` is
 * the time since the clock was created and stamps `Moved` events.
 */
pub trait Clock: Send {
    fn sleep(&self, duration: Duration) -> Result<(), TravelInterrupted>;
    fn elapsed(&self) -> Duration;
}

/// Wall-clock time. Travel blocks the engine thread for real.
pub struct ThreadClock {
    started: Instant,
}

impl ThreadClock {
    pub fn new() -> ThreadClock {
        ThreadClock {
            started: Instant::now(),
        }
    }
}

impl Default for ThreadClock {
    fn default() -> Self {
        ThreadClock::new()
    }
}

impl Clock for ThreadClock {
    fn sleep(&self, duration: Duration) -> Result<(), TravelInterrupted> {
        thread::sleep(duration);
        Ok(())
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/**
 * Virtual time. `sleep` returns at once and advances a shared counter, so a clone
 * kept outside the engine can read how long the simulated travel took.
 *
 * `interrupt_next(n)` makes the next `n` sleeps fail without advancing time.
 */
#[derive(Clone, Default)]
pub struct SimulatedClock {
    elapsed: Arc<Mutex<Duration>>,
    interrupts: Arc<AtomicUsize>,
}

impl SimulatedClock {
    pub fn new() -> SimulatedClock {
        SimulatedClock::default()
    }

    pub fn interrupt_next(&self, sleeps: usize) {
        self.interrupts.store(sleeps, Ordering::SeqCst);
    }
}

impl Clock for SimulatedClock {
    fn sleep(&self, duration: Duration) -> Result<(), TravelInterrupted> {
        let pending = self
            .interrupts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if pending.is_ok() {
            return Err(TravelInterrupted);
        }

        let mut elapsed = self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        *elapsed += duration;
        Ok(())
    }

    fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
