pub mod fixtures;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use snapauth::{
    AuthenticatorError, AuthorizationRequest, CeremonyCompletion, PlatformAuthenticator,
    PlatformCredential, Transport, TransportError,
};

/// One scripted backend response.
pub enum TransportScript {
    /// Return this body.
    Respond(String),
    /// Fail below the envelope layer.
    Fail(TransportError),
    /// Never respond; models a backend call that hangs.
    Stall,
}

/// Transport double that pops one scripted response per call and records
/// every call for assertion. An exhausted script stalls.
pub struct MockTransport {
    script: Mutex<VecDeque<TransportScript>>,
    calls: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MockTransport {
    pub fn new(script: Vec<TransportScript>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_paths(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn call_body(&self, index: usize) -> serde_json::Value {
        self.calls.lock().unwrap()[index].1.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let parsed = serde_json::from_slice(&body).expect("request body must be valid JSON");
        self.calls.lock().unwrap().push((path.to_string(), parsed));
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(TransportScript::Respond(body)) => Ok(body.into_bytes()),
            Some(TransportScript::Fail(error)) => Err(error),
            Some(TransportScript::Stall) | None => std::future::pending().await,
        }
    }
}

/// One scripted authenticator reaction to an invocation.
pub enum AuthenticatorScript {
    /// Report this outcome immediately.
    Respond(Result<PlatformCredential, AuthenticatorError>),
    /// Keep the completion handle so the test can fire it later.
    Hold,
}

/// Platform authenticator double.
///
/// Records invocations and cancellations; held completion handles stay
/// accessible so tests can exercise late and repeated callbacks.
pub struct MockAuthenticator {
    script: Mutex<VecDeque<AuthenticatorScript>>,
    pub invocations: Mutex<Vec<Vec<AuthorizationRequest>>>,
    pub held: Mutex<Vec<CeremonyCompletion>>,
    cancels: AtomicUsize,
}

impl MockAuthenticator {
    pub fn new(script: Vec<AuthenticatorScript>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            invocations: Mutex::new(Vec::new()),
            held: Mutex::new(Vec::new()),
            cancels: AtomicUsize::new(0),
        })
    }

    pub fn held_count(&self) -> usize {
        self.held.lock().unwrap().len()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    /// Fires the completion handle held for invocation `index`.
    pub fn fire(&self, index: usize, outcome: Result<PlatformCredential, AuthenticatorError>) {
        self.held.lock().unwrap()[index].complete(outcome);
    }
}

impl PlatformAuthenticator for MockAuthenticator {
    fn invoke(&self, requests: Vec<AuthorizationRequest>, completion: CeremonyCompletion) {
        self.invocations.lock().unwrap().push(requests);
        match self.script.lock().unwrap().pop_front() {
            Some(AuthenticatorScript::Respond(outcome)) => completion.complete(outcome),
            Some(AuthenticatorScript::Hold) | None => {
                self.held.lock().unwrap().push(completion);
            }
        }
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

/// Enables tracing output for a test run when RUST_LOG is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Polls `predicate` until it holds, panicking if it never does.
pub async fn wait_for(mut predicate: impl FnMut() -> bool) {
    for _ in 0..500 {
        if predicate() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition was not reached in time");
}

/// Yields long enough for any ready task to run.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
