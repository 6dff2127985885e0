//! In-memory route source for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use travel_core::{
    BackendDescriptor, BackendKind, BackendRegistry, RouteSource, SearchQuery, ServiceOutcome,
    SourceError, SourceResult,
};

pub fn registry() -> BackendRegistry {
    BackendRegistry::new(vec![
        BackendDescriptor::new(BackendKind::Train, "http://localhost:49892").unwrap(),
        BackendDescriptor::new(BackendKind::Bus, "http://localhost:49893").unwrap(),
        BackendDescriptor::new(BackendKind::Flight, "http://localhost:49889").unwrap(),
    ])
    .unwrap()
}

pub fn route(id: i64) -> Value {
    json!({ "id": id, "from": "Zagreb", "to": "Split" })
}

/// Scripted behaviour for one backend
#[derive(Clone)]
pub enum Script {
    Routes(Vec<Value>),
    Fail(String),
    NotFound,
    Status(u16),
    Unreachable,
}

/// Route source that answers from a script after a per-backend delay
pub struct FakeSource {
    scripts: HashMap<BackendKind, (Duration, Script)>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, kind: BackendKind, delay: Duration, script: Script) -> Self {
        self.scripts.insert(kind, (delay, script));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn play(&self, kind: BackendKind) -> Script {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, script) = self
            .scripts
            .get(&kind)
            .cloned()
            .unwrap_or((Duration::ZERO, Script::Routes(vec![])));
        tokio::time::sleep(delay).await;
        script
    }
}

#[async_trait]
impl RouteSource for FakeSource {
    async fn search(
        &self,
        backend: &BackendDescriptor,
        _query: &SearchQuery,
        _credential: Option<&str>,
    ) -> ServiceOutcome {
        match self.play(backend.kind).await {
            Script::Routes(routes) => ServiceOutcome::success(backend.clone(), routes),
            Script::Fail(message) => ServiceOutcome::failure(backend.clone(), message),
            Script::NotFound | Script::Status(_) | Script::Unreachable => ServiceOutcome::failure(
                backend.clone(),
                format!("{} service is unavailable", backend.kind.display_name()),
            ),
        }
    }

    async fn fetch_by_id(
        &self,
        backend: &BackendDescriptor,
        id: i64,
        _credential: Option<&str>,
    ) -> SourceResult<Value> {
        match self.play(backend.kind).await {
            Script::Routes(routes) => routes
                .into_iter()
                .find(|r| r["id"] == id)
                .ok_or_else(|| SourceError::NotFound(id.to_string())),
            Script::Fail(message) => Err(SourceError::Malformed(message)),
            Script::NotFound => Err(SourceError::NotFound(id.to_string())),
            Script::Status(status) => Err(SourceError::Status { status }),
            Script::Unreachable => Err(SourceError::Transport("connection refused".into())),
        }
    }
}
