use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

/// Cancel-and-restart debouncer for interactive search input.
///
/// Each `schedule` cancels any pending action and arms a new one that
/// fires after the idle delay, so only the most recent keystroke's action
/// executes. Dropping the debouncer cancels the pending action.
pub struct Debouncer {
    delay: Duration,
    shared: Arc<Shared>,
}

struct Shared {
    generation: Mutex<u64>,
    wakeup: Condvar,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            shared: Arc::new(Shared {
                generation: Mutex::new(0),
                wakeup: Condvar::new(),
            }),
        }
    }

    /// Schedule `action` to run after the idle delay, canceling any
    /// previously scheduled action.
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let armed = {
            let mut generation = self.shared.generation.lock().unwrap();
            *generation += 1;
            self.shared.wakeup.notify_all();
            *generation
        };

        let shared = Arc::clone(&self.shared);
        let delay = self.delay;
        thread::spawn(move || {
            let guard = shared.generation.lock().unwrap();
            // Wait out the delay; a newer schedule (or cancel) bumps the
            // generation and wakes us early.
            let (guard, _) = shared
                .wakeup
                .wait_timeout_while(guard, delay, |generation| *generation == armed)
                .unwrap();
            let still_current = *guard == armed;
            drop(guard);
            if still_current {
                action();
            }
        });
    }

    /// Cancel the pending action, if any.
    pub fn cancel(&self) {
        let mut generation = self.shared.generation.lock().unwrap();
        *generation += 1;
        self.shared.wakeup.notify_all();
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
