//! Fixed worker pool fed by a shared queue
//!
//! Workers pull boxed closures off an unbounded channel and run each one to
//! completion. There are no priorities and no stealing; the search is correct
//! under any execution order. A panicking job is caught, logged and forwarded
//! on a separate channel so the thread blocked on a search can give up
//! instead of waiting for a result that will never come.
//!
//! Dropping the [`Scheduler`] closes the queue; workers finish whatever is
//! still queued (including jobs those jobs schedule) and then exit.

use crate::diagnostics::Counters;
use crate::error::SearchError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// State shared by the scheduler, its workers and every [`Spawner`].
#[derive(Default)]
pub(crate) struct Shared {
    pub counters: Counters,
    pending: Mutex<usize>,
    idle: Condvar,
}

impl Shared {
    fn begin(&self) {
        Counters::bump(&self.counters.tasks_scheduled);
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn finish(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending -= 1;
        if *pending == 0 {
            self.idle.notify_all();
        }
    }
}

/// Cloneable handle for queueing work from any thread.
#[derive(Clone)]
pub(crate) struct Spawner {
    queue: Sender<Job>,
    shared: Arc<Shared>,
}

impl Spawner {
    /// Queue `job` and return immediately.
    ///
    /// If every worker is gone the job runs on the calling thread instead, so
    /// a node's children are never silently lost.
    pub fn schedule<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.begin();
        if let Err(rejected) = self.queue.send(Box::new(job)) {
            log::warn!("worker queue closed, running job inline");
            Counters::bump(&self.shared.counters.tasks_executed);
            (rejected.into_inner())();
            self.shared.finish();
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.shared.counters
    }
}

pub struct Scheduler {
    queue: Option<Sender<Job>>,
    shared: Arc<Shared>,
    panics: Receiver<String>,
    workers: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Start `workers` threads.
    pub fn new(workers: usize) -> Result<Self, SearchError> {
        if workers == 0 {
            return Err(SearchError::NoWorkers);
        }
        let (queue, jobs) = unbounded::<Job>();
        let (panic_sink, panics) = unbounded::<String>();
        let shared = Arc::new(Shared::default());

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let jobs = jobs.clone();
            let shared = Arc::clone(&shared);
            let panic_sink = panic_sink.clone();
            let handle = thread::Builder::new()
                .name(format!("search-worker-{id}"))
                .spawn(move || work(id, jobs, shared, panic_sink))?;
            handles.push(handle);
        }

        Ok(Scheduler {
            queue: Some(queue),
            shared,
            panics,
            workers: handles,
        })
    }

    /// Size of the pool, fixed at construction.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    pub(crate) fn spawner(&self) -> Option<Spawner> {
        self.queue.as_ref().map(|queue| Spawner {
            queue: queue.clone(),
            shared: Arc::clone(&self.shared),
        })
    }

    /// Queue a job from outside the search tree.
    pub fn schedule<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(spawner) = self.spawner() {
            spawner.schedule(job);
        }
    }

    /// Block until every scheduled job has finished running.
    pub fn wait_idle(&self) {
        let mut pending = self.shared.pending.lock().unwrap_or_else(PoisonError::into_inner);
        while *pending > 0 {
            pending = self.shared.idle.wait(pending).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Messages of jobs that panicked since the last [`Scheduler::reset`].
    pub(crate) fn panics(&self) -> &Receiver<String> {
        &self.panics
    }

    pub(crate) fn counters(&self) -> &Counters {
        &self.shared.counters
    }

    /// Clear counters and stale panic reports before a new search.
    pub(crate) fn reset(&self) {
        self.wait_idle();
        self.shared.counters.reset();
        for stale in self.panics.try_iter() {
            log::debug!("discarding stale worker panic: {stale}");
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.queue.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("search worker exited abnormally");
            }
        }
    }
}

fn work(id: usize, jobs: Receiver<Job>, shared: Arc<Shared>, panic_sink: Sender<String>) {
    log::trace!("worker {id} started");
    while let Ok(job) = jobs.recv() {
        Counters::bump(&shared.counters.tasks_executed);
        if let Err(cause) = panic::catch_unwind(AssertUnwindSafe(job)) {
            let message = describe(cause.as_ref());
            log::error!("worker {id} job panicked: {message}");
            let _ = panic_sink.send(message);
        }
        shared.finish();
    }
    log::trace!("worker {id} stopped");
}

fn describe(cause: &(dyn Any + Send)) -> String {
    if let Some(s) = cause.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_runs_every_job() {
        let scheduler = Scheduler::new(2).unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let ran = Arc::clone(&ran);
            scheduler.schedule(move || {
                ran.fetch_add(1, Ordering::Relaxed);
            });
        }
        scheduler.wait_idle();
        assert_eq!(ran.load(Ordering::Relaxed), 100);
        let counters = scheduler.counters().snapshot();
        assert_eq!(counters.tasks_scheduled, 100);
        assert_eq!(counters.tasks_executed, 100);
    }

    #[test]
    fn test_jobs_can_schedule_jobs() {
        fn fan(spawner: Spawner, depth: usize, ran: Arc<AtomicUsize>) {
            ran.fetch_add(1, Ordering::Relaxed);
            if depth == 0 {
                return;
            }
            for _ in 0..2 {
                let next = spawner.clone();
                let ran = Arc::clone(&ran);
                spawner.schedule(move || fan(next, depth - 1, ran));
            }
        }

        let scheduler = Scheduler::new(3).unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        let spawner = scheduler.spawner().unwrap();
        let root = spawner.clone();
        let counter = Arc::clone(&ran);
        spawner.schedule(move || fan(root, 5, counter));
        scheduler.wait_idle();
        // 1 + 2 + 4 + ... + 32
        assert_eq!(ran.load(Ordering::Relaxed), 63);
    }

    #[test]
    fn test_panicking_job_is_reported() {
        let scheduler = Scheduler::new(1).unwrap();
        scheduler.schedule(|| panic!("boom"));
        scheduler.wait_idle();
        let message = scheduler.panics().try_recv().unwrap();
        assert!(message.contains("boom"));

        // worker survives the panic
        let ran = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ran);
        scheduler.schedule(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        scheduler.wait_idle();
        assert_eq!(ran.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_drop_drains_queue() {
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let scheduler = Scheduler::new(1).unwrap();
            for _ in 0..50 {
                let ran = Arc::clone(&ran);
                scheduler.schedule(move || {
                    ran.fetch_add(1, Ordering::Relaxed);
                });
            }
        }
        assert_eq!(ran.load(Ordering::Relaxed), 50);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(Scheduler::new(0), Err(SearchError::NoWorkers)));
    }
}
