// arena/worker.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};

/// Runs `on_step` against shared state on its own thread until stopped.
///
/// `on_step` runs with the state locked; the duration it returns is slept
/// with the lock released. Dropping the worker stops and joins the thread.
pub struct Worker {
    should_stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn start<S, F>(state: Arc<Mutex<S>>, mut on_step: F) -> Self
    where
        S: Send + 'static,
        F: FnMut(&mut S) -> Duration + Send + 'static,
    {
        let should_stop = Arc::new(AtomicBool::new(false));
        let stop_flag = should_stop.clone();
        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                let wait = match state.lock() {
                    Ok(mut guard) => on_step(&mut guard),
                    Err(_) => {
                        warn!("worker state poisoned, stopping");
                        break;
                    }
                };
                if !wait.is_zero() {
                    thread::sleep(wait);
                }
            }
        });
        info!("worker started");
        Self { should_stop, handle: Some(handle) }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else { return };
        self.should_stop.store(true, Ordering::Relaxed);
        if handle.join().is_err() {
            warn!("worker thread panicked");
        }
        info!("worker stopped");
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}
