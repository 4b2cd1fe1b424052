//! Scripted transport for unit tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::probing::transport::{ProbeMethod, Transport, TransportError, TransportErrorKind};

pub(crate) type Outcome = Result<u16, TransportError>;

pub(crate) fn connect_error() -> Outcome {
    Err(TransportError::new(
        TransportErrorKind::Connect,
        "connection refused",
    ))
}

/// Answers the n-th call for a method with the n-th scripted outcome,
/// repeating the last one once the script runs out.
pub(crate) struct ScriptedTransport {
    head: Vec<Outcome>,
    get: Vec<Outcome>,
    head_calls: AtomicUsize,
    get_calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn always(outcome: Outcome) -> Self {
        Self::per_method(vec![outcome.clone()], vec![outcome])
    }

    pub(crate) fn sequence(outcomes: Vec<Outcome>) -> Self {
        Self::per_method(outcomes.clone(), outcomes)
    }

    pub(crate) fn per_method(head: Vec<Outcome>, get: Vec<Outcome>) -> Self {
        assert!(!head.is_empty() && !get.is_empty(), "script cannot be empty");
        Self {
            head,
            get,
            head_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> usize {
        self.head_calls() + self.get_calls()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, method: ProbeMethod, url: &str) -> Outcome {
        self.urls.lock().unwrap().push(url.to_string());
        let (script, counter) = match method {
            ProbeMethod::Head => (&self.head, &self.head_calls),
            ProbeMethod::Get => (&self.get, &self.get_calls),
        };
        let call = counter.fetch_add(1, Ordering::SeqCst);
        script[call.min(script.len() - 1)].clone()
    }
}
