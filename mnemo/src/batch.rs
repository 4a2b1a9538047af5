//! Parallel batch generation.
//!
//! A batch derives wallets `0..count` on a small pool of workers. Index `i`
//! is handled by worker `i % workers`, and each worker walks its indices in
//! ascending order. Workers share nothing but a cancel flag; every finished
//! task travels over a channel to the collector on the caller's side, which
//! owns the result buffer and writes slot `i` only.
//!
//! The first failed task cancels the batch. Workers stop before their next
//! task, anything still in flight is discarded, and the caller gets that
//! task's error with no partial results.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use tracing::{debug, trace, warn};
use zeroize::Zeroizing;

use crate::config::Config;
use crate::{DeriveMnemonic, Deriver, Error, MasterSeed, Progress, Result, WordCount};

/// Parameters for one batch.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Master seed.
    pub seed: MasterSeed,
    /// Number of wallets, derived for indices `0..count`.
    pub count: u32,
    /// Words per phrase.
    pub word_count: WordCount,
    /// PBKDF2 iterations.
    pub iterations: u32,
}

impl BatchRequest {
    /// Create a request.
    pub fn new(seed: MasterSeed, count: u32, word_count: WordCount, iterations: u32) -> Self {
        Self {
            seed,
            count,
            word_count,
            iterations,
        }
    }
}

/// Lifecycle of a [`Batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Created, not started.
    Idle,
    /// Workers are running.
    Running,
    /// Every task finished.
    Completed,
    /// A task failed; results were discarded.
    Failed,
}

/// Phrases of a finished batch, in index order.
pub struct BatchResult(Vec<Zeroizing<String>>);

impl BatchResult {
    /// Number of phrases.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the result is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Phrase of wallet `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|phrase| phrase.as_str())
    }

    /// Phrases in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|phrase| phrase.as_str())
    }

    /// Take the phrases.
    pub fn into_vec(self) -> Vec<Zeroizing<String>> {
        self.0
    }
}

impl fmt::Debug for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchResult({} phrases)", self.0.len())
    }
}

impl IntoIterator for BatchResult {
    type Item = Zeroizing<String>;
    type IntoIter = std::vec::IntoIter<Zeroizing<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Indices handled by `worker` out of `workers`, in dispatch order.
pub fn assigned_indices(worker: usize, workers: usize, total: u32) -> impl Iterator<Item = u32> {
    (worker as u32..total).step_by(workers.max(1))
}

/// A finished task as reported by a worker.
struct TaskOutcome {
    index: u32,
    result: Result<Zeroizing<String>>,
}

/// Run one task, turning a panic into [`Error::Worker`].
fn run_task<D: DeriveMnemonic + ?Sized>(deriver: &D, index: u32) -> Result<Zeroizing<String>> {
    panic::catch_unwind(AssertUnwindSafe(|| deriver.derive(index))).unwrap_or_else(|payload| {
        Err(Error::Worker {
            index,
            reason: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("task panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("task panicked: {msg}")
    } else {
        String::from("task panicked")
    }
}

/// Worker loop. `emit` returns `false` once nobody is listening.
fn run_worker<D, F>(
    deriver: &D,
    worker: usize,
    workers: usize,
    total: u32,
    cancel: &AtomicBool,
    mut emit: F,
) where
    D: DeriveMnemonic + ?Sized,
    F: FnMut(TaskOutcome) -> bool,
{
    for index in assigned_indices(worker, workers, total) {
        if cancel.load(Ordering::Acquire) {
            trace!(worker, index, "batch cancelled, worker stopping");
            return;
        }
        trace!(worker, index, "task started");
        let result = run_task(deriver, index);
        if !emit(TaskOutcome { index, result }) {
            return;
        }
    }
}

/// Caller-side result buffer.
struct Collector {
    slots: Vec<Option<Zeroizing<String>>>,
    completed: u32,
    total: u32,
}

impl Collector {
    fn new(total: u32) -> Self {
        Self {
            slots: (0..total).map(|_| None).collect(),
            completed: 0,
            total,
        }
    }

    /// Store a finished task, or surface its error.
    fn accept(&mut self, outcome: TaskOutcome) -> Result<Progress> {
        let TaskOutcome { index, result } = outcome;
        let phrase = result?;
        let slot = self
            .slots
            .get_mut(index as usize)
            .ok_or_else(|| Error::Worker {
                index,
                reason: String::from("index outside the batch"),
            })?;
        if slot.is_some() {
            return Err(Error::Worker {
                index,
                reason: String::from("slot reported twice"),
            });
        }
        *slot = Some(phrase);
        self.completed += 1;
        Ok(Progress {
            completed: self.completed,
            total: self.total,
        })
    }

    fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    fn finish(self) -> Result<BatchResult> {
        self.slots
            .into_iter()
            .zip(0u32..)
            .map(|(slot, index)| {
                slot.ok_or_else(|| Error::Worker {
                    index,
                    reason: String::from("worker exited before finishing"),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(BatchResult)
    }
}

/// One run of the batch orchestrator.
///
/// A batch runs at most once: after it completes or fails, running it again
/// returns [`Error::BatchReused`]. Create a new batch for a new run.
pub struct Batch<D = Deriver> {
    deriver: Arc<D>,
    count: u32,
    workers: usize,
    state: BatchState,
}

impl Batch<Deriver> {
    /// Validate `request` against `config` and prepare a batch.
    ///
    /// Parameters are checked here, before any worker exists.
    pub fn new(request: BatchRequest, config: &Config) -> Result<Self> {
        config.validate()?;
        config.check_count(request.count)?;
        config.check_iterations(request.iterations)?;
        let deriver = Deriver::new(request.seed, request.word_count, request.iterations)?;
        Self::with_deriver(deriver, request.count, config)
    }
}

impl<D: DeriveMnemonic> Batch<D> {
    /// Prepare a batch of `count` tasks run through a custom deriver.
    pub fn with_deriver(deriver: D, count: u32, config: &Config) -> Result<Self> {
        config.validate()?;
        config.check_count(count)?;
        Ok(Self {
            deriver: Arc::new(deriver),
            count,
            workers: config.worker_count(count),
            state: BatchState::Idle,
        })
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> BatchState {
        self.state
    }

    /// Number of tasks.
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Number of workers the batch runs on.
    pub const fn workers(&self) -> usize {
        self.workers
    }

    fn begin(&mut self) -> Result<()> {
        if self.state != BatchState::Idle {
            return Err(Error::BatchReused);
        }
        self.state = BatchState::Running;
        debug!(count = self.count, workers = self.workers, "batch started");
        Ok(())
    }

    fn finish(&mut self, outcome: &Result<BatchResult>) {
        match outcome {
            Ok(_) => {
                self.state = BatchState::Completed;
                debug!(count = self.count, "batch completed");
            }
            Err(e) => {
                self.state = BatchState::Failed;
                warn!(error = %e, "batch failed");
            }
        }
    }

    /// Run the batch on scoped threads, blocking until it finishes.
    ///
    /// `on_progress` is called on the calling thread after every finished
    /// task, in completion order.
    pub fn run<F: FnMut(Progress)>(&mut self, mut on_progress: F) -> Result<BatchResult> {
        self.begin()?;
        let outcome = self.execute(&mut on_progress);
        self.finish(&outcome);
        outcome
    }

    fn execute(&self, on_progress: &mut dyn FnMut(Progress)) -> Result<BatchResult> {
        let (total, workers) = (self.count, self.workers);
        let deriver: &D = &self.deriver;
        let cancel = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            for worker in 0..workers {
                let tx = tx.clone();
                let cancel = &cancel;
                let spawned = thread::Builder::new()
                    .name(format!("mnemo-worker-{worker}"))
                    .spawn_scoped(scope, move || {
                        run_worker(deriver, worker, workers, total, cancel, |outcome| {
                            tx.send(outcome).is_ok()
                        });
                    });
                if let Err(e) = spawned {
                    cancel.store(true, Ordering::Release);
                    return Err(Error::Worker {
                        index: worker as u32,
                        reason: format!("failed to spawn worker: {e}"),
                    });
                }
            }
            drop(tx);

            let mut collector = Collector::new(total);
            for outcome in rx.iter() {
                match collector.accept(outcome) {
                    Ok(progress) => {
                        on_progress(progress);
                        if collector.is_complete() {
                            break;
                        }
                    }
                    Err(e) => {
                        cancel.store(true, Ordering::Release);
                        return Err(e);
                    }
                }
            }
            collector.finish()
        })
    }
}

#[cfg(feature = "async")]
impl<D: DeriveMnemonic + 'static> Batch<D> {
    /// Run the batch on tokio's blocking pool without blocking the caller.
    ///
    /// Must be awaited inside a tokio runtime. `on_progress` runs on the
    /// awaiting task.
    pub async fn run_async<F: FnMut(Progress) + Send>(
        &mut self,
        mut on_progress: F,
    ) -> Result<BatchResult> {
        self.begin()?;
        let outcome = self.execute_async(&mut on_progress).await;
        self.finish(&outcome);
        outcome
    }

    async fn execute_async(
        &self,
        on_progress: &mut (dyn FnMut(Progress) + Send),
    ) -> Result<BatchResult> {
        let (total, workers) = (self.count, self.workers);
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut tasks = tokio::task::JoinSet::new();

        for worker in 0..workers {
            let deriver = Arc::clone(&self.deriver);
            let cancel = Arc::clone(&cancel);
            let tx = tx.clone();
            tasks.spawn_blocking(move || {
                run_worker(&*deriver, worker, workers, total, &cancel, |outcome| {
                    tx.send(outcome).is_ok()
                });
            });
        }
        drop(tx);

        let mut collector = Collector::new(total);
        while let Some(outcome) = rx.recv().await {
            match collector.accept(outcome) {
                Ok(progress) => {
                    on_progress(progress);
                    if collector.is_complete() {
                        break;
                    }
                }
                Err(e) => {
                    cancel.store(true, Ordering::Release);
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        // All results are in; this only reaps the workers.
        while tasks.join_next().await.is_some() {}
        collector.finish()
    }
}

/// Derive wallets `0..request.count` in parallel, blocking until done.
///
/// # Example
///
/// ```
/// use mnemo::{generate_batch, BatchRequest, Config, MasterSeed, WordCount};
///
/// let seed = MasterSeed::new("correct horse").unwrap();
/// let request = BatchRequest::new(seed, 3, WordCount::Words12, 1_000);
/// let mut seen = Vec::new();
/// let phrases = generate_batch(request, &Config::default(), |p| seen.push(p.completed)).unwrap();
/// assert_eq!(phrases.len(), 3);
/// assert_eq!(seen, [1, 2, 3]);
/// ```
pub fn generate_batch<F: FnMut(Progress)>(
    request: BatchRequest,
    config: &Config,
    on_progress: F,
) -> Result<BatchResult> {
    Batch::new(request, config)?.run(on_progress)
}

/// Derive wallets `0..request.count` in parallel without blocking the caller.
#[cfg(feature = "async")]
pub async fn generate_batch_async<F: FnMut(Progress) + Send>(
    request: BatchRequest,
    config: &Config,
    on_progress: F,
) -> Result<BatchResult> {
    Batch::new(request, config)?.run_async(on_progress).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::AtomicU32;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::generate_mnemonic;

    fn seed() -> MasterSeed {
        MasterSeed::new("correct horse").unwrap()
    }

    /// Fails (or panics) at one index, sleeps on the others.
    struct Faulty {
        fail_at: u32,
        panic: bool,
        delay: Duration,
        calls: AtomicU32,
    }

    impl Faulty {
        fn new(fail_at: u32, panic: bool, delay: Duration) -> Self {
            Self {
                fail_at,
                panic,
                delay,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl DeriveMnemonic for Faulty {
        fn derive(&self, index: u32) -> Result<Zeroizing<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if index == self.fail_at {
                if self.panic {
                    panic!("boom at {index}");
                }
                return Err(Error::KeyDerivation);
            }
            thread::sleep(self.delay);
            Ok(Zeroizing::new(format!("phrase {index}")))
        }
    }

    /// Records which thread handled which index.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(u32, Option<String>)>>,
    }

    impl DeriveMnemonic for Recorder {
        fn derive(&self, index: u32) -> Result<Zeroizing<String>> {
            let name = thread::current().name().map(str::to_owned);
            self.seen.lock().unwrap().push((index, name));
            Ok(Zeroizing::new(index.to_string()))
        }
    }

    #[test]
    fn round_robin_assignment() {
        let indices: Vec<u32> = assigned_indices(1, 4, 10).collect();
        assert_eq!(indices, [1, 5, 9]);

        let mut all: Vec<u32> = (0..4).flat_map(|w| assigned_indices(w, 4, 10)).collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn worker_pool_is_bounded() {
        let config = Config::default();
        let small = Batch::new(BatchRequest::new(seed(), 2, WordCount::Words12, 1), &config).unwrap();
        assert_eq!(small.workers(), 2);
        let large = Batch::new(BatchRequest::new(seed(), 12, WordCount::Words12, 1), &config).unwrap();
        assert_eq!(large.workers(), 4);
    }

    #[test]
    fn order_matches_single_derivation() {
        let request = BatchRequest::new(seed(), 5, WordCount::Words12, 1000);
        let result = generate_batch(request, &Config::default(), |_| {}).unwrap();

        assert_eq!(result.len(), 5);
        for (index, phrase) in result.iter().enumerate() {
            let single = generate_mnemonic(&seed(), index as u32, WordCount::Words12, 1000).unwrap();
            assert_eq!(phrase, single.as_str());
        }
    }

    #[test]
    fn every_index_derived_once_on_its_worker() {
        let mut batch = Batch::with_deriver(Recorder::default(), 10, &Config::default()).unwrap();
        let result = batch.run(|_| {}).unwrap();
        assert_eq!(result.iter().collect::<Vec<_>>(), ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);

        let deriver = Arc::clone(&batch.deriver);
        let seen = deriver.seen.lock().unwrap();
        assert_eq!(seen.len(), 10);
        let unique: HashSet<u32> = seen.iter().map(|(i, _)| *i).collect();
        assert_eq!(unique.len(), 10);
        for (index, name) in seen.iter() {
            let expected = format!("mnemo-worker-{}", index % 4);
            assert_eq!(name.as_deref(), Some(expected.as_str()));
        }
    }

    #[test]
    fn progress_is_monotonic_and_ends_at_total() {
        let mut reports = Vec::new();
        let request = BatchRequest::new(seed(), 7, WordCount::Words12, 10);
        generate_batch(request, &Config::default(), |p| reports.push(p)).unwrap();

        assert_eq!(reports.len(), 7);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.completed, i as u32 + 1);
            assert_eq!(report.total, 7);
        }
        assert!(reports.last().unwrap().is_done());
    }

    #[test]
    fn failure_discards_results() {
        let faulty = Faulty::new(3, false, Duration::ZERO);
        let mut batch = Batch::with_deriver(faulty, 8, &Config::default()).unwrap();
        let err = batch.run(|_| {}).unwrap_err();
        assert!(matches!(err, Error::KeyDerivation));
        assert_eq!(batch.state(), BatchState::Failed);
    }

    #[test]
    fn panic_becomes_worker_failure() {
        let faulty = Faulty::new(2, true, Duration::ZERO);
        let mut batch = Batch::with_deriver(faulty, 4, &Config::default()).unwrap();
        match batch.run(|_| {}) {
            Err(Error::Worker { index, reason }) => {
                assert_eq!(index, 2);
                assert!(reason.contains("boom at 2"), "{reason}");
            }
            other => panic!("expected worker failure, got {other:?}"),
        }
    }

    #[test]
    fn failure_cancels_remaining_tasks() {
        let faulty = Faulty::new(0, false, Duration::from_millis(30));
        let mut batch = Batch::with_deriver(faulty, 20, &Config::default()).unwrap();
        assert!(batch.run(|_| {}).is_err());
        let calls = batch.deriver.calls.load(Ordering::SeqCst);
        assert!(calls < 20, "{calls} tasks ran after cancellation");
    }

    #[test]
    fn batch_runs_once() {
        let mut batch = Batch::new(BatchRequest::new(seed(), 1, WordCount::Words12, 1), &Config::default()).unwrap();
        assert_eq!(batch.state(), BatchState::Idle);
        assert!(batch.run(|_| {}).is_ok());
        assert_eq!(batch.state(), BatchState::Completed);
        assert!(matches!(batch.run(|_| {}), Err(Error::BatchReused)));
        assert_eq!(batch.state(), BatchState::Completed);
    }

    #[test]
    fn invalid_parameters_fail_before_work() {
        let config = Config::default();
        assert!(matches!(
            Batch::new(BatchRequest::new(seed(), 0, WordCount::Words12, 10), &config),
            Err(Error::InvalidCount { count: 0, .. })
        ));
        assert!(matches!(
            Batch::new(BatchRequest::new(seed(), 21, WordCount::Words12, 10), &config),
            Err(Error::InvalidCount { count: 21, .. })
        ));
        assert!(matches!(
            Batch::new(BatchRequest::new(seed(), 3, WordCount::Words12, 0), &config),
            Err(Error::InvalidIterations { iterations: 0, .. })
        ));
        assert!(matches!(
            Batch::new(BatchRequest::new(seed(), 3, WordCount::Words12, 1_000_001), &config),
            Err(Error::InvalidIterations { .. })
        ));
    }

    #[test]
    fn result_debug_is_redacted() {
        let request = BatchRequest::new(seed(), 2, WordCount::Words12, 1);
        let result = generate_batch(request, &Config::default(), |_| {}).unwrap();
        assert_eq!(format!("{result:?}"), "BatchResult(2 phrases)");
    }

    #[cfg(feature = "async")]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_matches_sync() {
        let config = Config::default();
        let sync = generate_batch(BatchRequest::new(seed(), 6, WordCount::Words18, 50), &config, |_| {}).unwrap();

        let mut reports = Vec::new();
        let asynchronous = generate_batch_async(
            BatchRequest::new(seed(), 6, WordCount::Words18, 50),
            &config,
            |p| reports.push(p.completed),
        )
        .await
        .unwrap();

        assert_eq!(sync.iter().collect::<Vec<_>>(), asynchronous.iter().collect::<Vec<_>>());
        assert_eq!(reports, [1, 2, 3, 4, 5, 6]);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn async_failure_propagates() {
        let faulty = Faulty::new(1, false, Duration::from_millis(5));
        let mut batch = Batch::with_deriver(faulty, 6, &Config::default()).unwrap();
        let err = batch.run_async(|_| {}).await.unwrap_err();
        assert!(matches!(err, Error::KeyDerivation));
        assert_eq!(batch.state(), BatchState::Failed);
        assert!(matches!(batch.run_async(|_| {}).await, Err(Error::BatchReused)));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn async_failure_cancels_remaining_tasks() {
        let faulty = Faulty::new(0, false, Duration::from_millis(30));
        let mut batch = Batch::with_deriver(faulty, 20, &Config::default()).unwrap();
        assert!(batch.run_async(|_| {}).await.is_err());

        // Let in-flight tasks drain; cancelled workers must not pick up more.
        tokio::time::sleep(Duration::from_millis(150)).await;
        let calls = batch.deriver.calls.load(Ordering::SeqCst);
        assert!(calls < 20, "{calls} tasks ran after cancellation");
    }
}
