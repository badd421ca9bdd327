use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// A cancellable periodic background thread.
///
/// The thread sleeps for `interval`, runs the task, and repeats until the task
/// returns `false` or [`Sweeper::stop`] is called. It never keeps the process
/// alive on its own.
pub struct Sweeper {
    name: String,
    stop_flag: Arc<AtomicBool>,
    thread: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Sweeper {
    pub fn spawn<F>(name: impl Into<String>, interval: Duration, mut task: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let name = name.into();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let flag_clone = stop_flag.clone();

        debug!("Starting sweeper {} with interval: {:?}", name, interval);
        let spawned = thread::Builder::new().name(name.clone()).spawn(move || loop {
            let started = Instant::now();
            thread::park_timeout(interval);

            if flag_clone.load(Ordering::SeqCst) {
                debug!("Sweeper stopping...");
                break;
            }
            let slept = started.elapsed();
            if slept < interval {
                debug!("Sweeper woken early after {:?}, sweeping anyway", slept);
            }

            if !task() {
                debug!("Sweeper task finished, exiting");
                break;
            }
        });

        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Failed to spawn sweeper {}: {}", name, e);
                None
            }
        };

        Sweeper {
            name,
            stop_flag,
            thread: Mutex::new(handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        let thread = self.thread.lock().unwrap_or_else(|e| e.into_inner());
        thread.as_ref().map_or(false, |handle| !handle.is_finished())
    }

    /// Signals the thread to exit and waits for it. Safe to call repeatedly.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);

        let handle = self
            .thread
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        let Some(handle) = handle else {
            return;
        };

        if handle.thread().id() == thread::current().id() {
            // Stopping from inside the task; the flag ends the loop on the next wake.
            return;
        }

        handle.thread().unpark();
        if let Err(e) = handle.join() {
            error!("Error joining sweeper {}: {:?}", self.name, e);
        } else {
            info!("Sweeper {} stopped", self.name);
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Sweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweeper")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_runs_task_periodically() {
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_clone = runs.clone();
        let sweeper = Sweeper::spawn("test-sweeper", Duration::from_millis(20), move || {
            runs_clone.fetch_add(1, Ordering::SeqCst);
            true
        });

        thread::sleep(Duration::from_millis(200));
        assert!(sweeper.is_running());
        sweeper.stop();
        assert!(runs.load(Ordering::SeqCst) >= 2);
        assert!(!sweeper.is_running());
    }

    #[test]
    fn test_stop_is_prompt_and_idempotent() {
        let sweeper = Sweeper::spawn("slow-sweeper", Duration::from_secs(3600), || true);
        let started = Instant::now();
        sweeper.stop();
        sweeper.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!sweeper.is_running());
    }

    #[test]
    fn test_task_returning_false_ends_thread() {
        let sweeper = Sweeper::spawn("one-shot", Duration::from_millis(10), || false);
        thread::sleep(Duration::from_millis(200));
        assert!(!sweeper.is_running());
    }

    #[test]
    fn test_no_runs_after_stop() {
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_clone = runs.clone();
        let sweeper = Sweeper::spawn("stopped", Duration::from_millis(10), move || {
            runs_clone.fetch_add(1, Ordering::SeqCst);
            true
        });
        sweeper.stop();
        let after_stop = runs.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
        assert_eq!(runs.load(Ordering::SeqCst), after_stop);
    }
}
