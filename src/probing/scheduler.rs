//! Bounded worker pool running probes over a list of URLs.
//!
//! A fixed number of worker tasks pull input indices from a shared cursor, so
//! at most `worker_count` probes are in flight at any time. Each worker writes
//! its result into the slot owned by that index; output order therefore never
//! depends on completion order.

use futures::future::join_all;
use log::{debug, error, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tokio_util::sync::CancellationToken;

use crate::core::error::Result;
use crate::core::types::{ProbeConfig, ProbeResult, RunResult, UrlRequest};
use crate::probing::client::RetryClient;
use crate::probing::normalize::prepare;
use crate::probing::probe::probe;
use crate::probing::transport::{ReqwestTransport, Transport};
use crate::reporting::logging::log_probe_result;

/// Receives `(completed, total)` each time a probe finishes.
///
/// Calls come from worker tasks, one at a time and with strictly increasing
/// `completed`. An index whose worker failed mid-probe is reported once its
/// placeholder is filled. Indices never started because the run was
/// cancelled are not reported.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Progress sink that ignores every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Completion count shared by the workers of one run.
struct CompletionCounter {
    completed: Mutex<usize>,
    total: usize,
}

impl CompletionCounter {
    fn new(total: usize) -> Self {
        Self {
            completed: Mutex::new(0),
            total,
        }
    }

    /// Count one completion and report it while still holding the lock.
    fn record(&self, sink: &dyn ProgressSink) {
        let mut completed = self.completed.lock().unwrap_or_else(PoisonError::into_inner);
        *completed += 1;
        sink.on_progress(*completed, self.total);
    }
}

/// Runs probes for a whole URL list with one shared client.
///
/// The cancellation token is not reset between runs: once cancelled, every
/// later `run` on the same scheduler returns placeholders only.
pub struct Scheduler<T> {
    client: Arc<RetryClient<T>>,
    config: Arc<ProbeConfig>,
    cancel: CancellationToken,
}

impl Scheduler<ReqwestTransport> {
    /// Validate the config and build the pooled production client.
    pub fn from_config(config: ProbeConfig) -> Result<Self> {
        config.validate()?;
        let client = RetryClient::from_config(&config)?;
        Self::new(client, config)
    }
}

impl<T: Transport + 'static> Scheduler<T> {
    /// Fails with a configuration error before any work is dispatched.
    pub fn new(client: RetryClient<T>, config: ProbeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: Arc::new(client),
            config: Arc::new(config),
            cancel: CancellationToken::new(),
        })
    }

    /// Use an externally owned token to stop dispatching new probes.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn client(&self) -> &RetryClient<T> {
        &self.client
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Probe every URL and return results in input order.
    ///
    /// Returns only after every worker has finished. The result always has
    /// one entry per input; indices never started because of cancellation
    /// (or a failed worker) are reported as `CouldNotConnect`, or `EmptyUrl`
    /// for blank input.
    pub async fn run(&self, urls: &[String], progress: Arc<dyn ProgressSink>) -> RunResult {
        let total = urls.len();
        if total == 0 {
            return RunResult::default();
        }

        let inputs: Arc<[UrlRequest]> = urls.iter().map(UrlRequest::new).collect();
        let slots: Arc<[OnceLock<ProbeResult>]> = (0..total).map(|_| OnceLock::new()).collect();
        let cursor = Arc::new(AtomicUsize::new(0));
        let counter = Arc::new(CompletionCounter::new(total));
        let worker_count = self.config.worker_count().min(total);

        debug!("Dispatching {total} probes over {worker_count} workers");

        let handles: Vec<_> = (0..worker_count)
            .map(|worker_id| {
                let client = Arc::clone(&self.client);
                let config = Arc::clone(&self.config);
                let inputs = Arc::clone(&inputs);
                let slots = Arc::clone(&slots);
                let cursor = Arc::clone(&cursor);
                let counter = Arc::clone(&counter);
                let progress = Arc::clone(&progress);
                let cancel = self.cancel.clone();

                tokio::spawn(async move {
                    loop {
                        if cancel.is_cancelled() {
                            debug!("Worker {worker_id} stopping: run cancelled");
                            break;
                        }
                        let index = cursor.fetch_add(1, Ordering::SeqCst);
                        if index >= inputs.len() {
                            break;
                        }

                        let result = probe(&client, &inputs[index].raw, &config).await;
                        log_probe_result(&result);
                        if slots[index].set(result).is_err() {
                            error!("Result slot {index} was written twice");
                        }
                        counter.record(progress.as_ref());
                    }
                })
            })
            .collect();

        for (worker_id, outcome) in join_all(handles).await.into_iter().enumerate() {
            if let Err(err) = outcome {
                error!("Probe worker {worker_id} failed: {err}");
            }
        }

        // indices below this were taken by a worker; any of them still empty
        // belonged to a worker that failed mid-probe
        let claimed = cursor.load(Ordering::SeqCst).min(total);
        let mut unfinished = 0;
        let results = slots
            .iter()
            .zip(inputs.iter())
            .enumerate()
            .map(|(index, (slot, request))| match slot.get() {
                Some(result) => result.clone(),
                None => {
                    unfinished += 1;
                    if index < claimed {
                        counter.record(progress.as_ref());
                    }
                    unreached(&request.raw)
                }
            })
            .collect();

        if unfinished > 0 {
            warn!("{unfinished} of {total} URLs were not probed and are reported as unreachable");
        }

        RunResult::new(results)
    }
}

/// Placeholder for an input that was never probed.
fn unreached(raw: &str) -> ProbeResult {
    let url = prepare(raw);
    if url.is_empty() {
        ProbeResult::empty()
    } else {
        ProbeResult::could_not_connect(url)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::core::types::ProbeStatus;
    use crate::probing::fake::ScriptedTransport;
    use std::time::Duration;

    fn scheduler(transport: ScriptedTransport, workers: usize) -> Scheduler<ScriptedTransport> {
        let config = ProbeConfig::builder()
            .worker_count(workers)
            .max_retries(0)
            .backoff_factor(Duration::from_millis(1))
            .build()
            .unwrap();
        let client = RetryClient::new(transport, &config);
        Scheduler::new(client, config).unwrap()
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_completion_counter__reports_each_completion() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |completed: usize, total: usize| seen.lock().unwrap().push((completed, total))
        };
        let counter = CompletionCounter::new(3);

        counter.record(&sink);
        counter.record(&sink);
        counter.record(&sink);

        assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_unreached__keeps_empty_input_empty() {
        assert_eq!(unreached("  ").status(), ProbeStatus::EmptyUrl);

        let result = unreached("a.com");
        assert_eq!(result.status(), ProbeStatus::CouldNotConnect);
        assert_eq!(result.url(), "https://a.com");
        assert_eq!(result.status_code(), "000");
    }

    #[tokio::test]
    async fn test_run__empty_input_returns_empty_result() {
        let scheduler = scheduler(ScriptedTransport::always(Ok(200)), 4);

        let result = scheduler.run(&[], Arc::new(NoProgress)).await;

        assert!(result.is_empty());
        assert_eq!(scheduler.client().transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_run__fills_every_index_in_input_order() {
        let scheduler = scheduler(ScriptedTransport::always(Ok(200)), 3);
        let input = urls(&["a.com", "", "http://b.com", "  c.com  ", "d.com"]);

        let result = scheduler.run(&input, Arc::new(NoProgress)).await;

        let actual: Vec<&str> = result.iter().map(|r| r.url()).collect();
        assert_eq!(
            actual,
            vec![
                "https://a.com",
                "",
                "http://b.com",
                "https://c.com",
                "https://d.com"
            ]
        );
        assert_eq!(result.get(1).map(|r| r.status()), Some(ProbeStatus::EmptyUrl));
        // blank input never reaches the transport
        assert_eq!(scheduler.client().transport().calls(), 4);
    }

    #[tokio::test]
    async fn test_run__reports_progress_for_every_input() {
        let scheduler = scheduler(ScriptedTransport::always(Ok(404)), 2);
        let input = urls(&["a.com", "b.com", "c.com", "d.com", "e.com"]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |completed: usize, total: usize| seen.lock().unwrap().push((completed, total))
        };

        scheduler.run(&input, Arc::new(sink)).await;

        let seen = seen.lock().unwrap();
        let expected: Vec<(usize, usize)> = (1..=5).map(|i| (i, 5)).collect();
        assert_eq!(*seen, expected);
    }

    #[tokio::test]
    async fn test_run__cancelled_before_start_fills_placeholders() {
        let scheduler = scheduler(ScriptedTransport::always(Ok(200)), 2);
        let token = scheduler.cancellation_token();
        token.cancel();
        let input = urls(&["a.com", "   ", "b.com"]);

        let result = scheduler.run(&input, Arc::new(NoProgress)).await;

        assert_eq!(result.len(), 3);
        assert_eq!(
            result.get(0).map(|r| r.status()),
            Some(ProbeStatus::CouldNotConnect)
        );
        assert_eq!(result.get(1).map(|r| r.status()), Some(ProbeStatus::EmptyUrl));
        assert_eq!(result.get(2).map(|r| r.url()), Some("https://b.com"));
        assert_eq!(scheduler.client().transport().calls(), 0);
    }

    #[test]
    fn test_new__accepts_default_config() {
        let config = ProbeConfig::default();
        let client = RetryClient::with_policy(
            ScriptedTransport::always(Ok(200)),
            0,
            Duration::from_millis(1),
        );

        let scheduler = Scheduler::new(client, config.clone()).unwrap();

        assert_eq!(scheduler.config(), &config);
        assert!(!scheduler.cancellation_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_run__cancellation_carries_over_to_later_runs() {
        let scheduler = scheduler(ScriptedTransport::always(Ok(200)), 2);
        let input = urls(&["a.com", "b.com"]);

        let first = scheduler.run(&input, Arc::new(NoProgress)).await;
        assert!(first.iter().all(|r| r.is_working()));

        scheduler.cancellation_token().cancel();
        let second = scheduler.run(&input, Arc::new(NoProgress)).await;

        assert!(
            second
                .iter()
                .all(|r| r.status() == ProbeStatus::CouldNotConnect)
        );
        assert_eq!(scheduler.client().transport().calls(), 2);
    }
}
