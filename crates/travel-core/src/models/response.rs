//! Aggregated response envelope

use chrono::{DateTime, Utc};
use serde::ser::Serializer;
use serde::Serialize;
use serde_json::Value;

use crate::models::{BackendKind, ServiceOutcome};

/// The single merged envelope returned for a multi-backend search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResponse {
    pub search_criteria: SearchCriteria,
    pub results: BackendReports,
    pub summary: Summary,
}

/// Echo of the client's filters plus the request timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCriteria {
    pub from: Option<String>,
    pub to: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Client-facing view of one [`ServiceOutcome`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendReport {
    pub success: bool,
    pub count: usize,
    pub routes: Option<Vec<Value>>,
    pub error: Option<String>,
}

impl From<ServiceOutcome> for BackendReport {
    fn from(outcome: ServiceOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            count: outcome.route_count(),
            routes: outcome.routes().map(<[Value]>::to_vec),
            error: outcome.error().map(String::from),
        }
    }
}

/// Per-backend reports in configured order.
///
/// Serialized as a JSON object keyed by backend identifier, preserving
/// insertion order so clients can render deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendReports(Vec<(BackendKind, BackendReport)>);

impl BackendReports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: BackendKind, report: BackendReport) {
        self.0.push((kind, report));
    }

    pub fn get(&self, kind: BackendKind) -> Option<&BackendReport> {
        self.0.iter().find(|(k, _)| *k == kind).map(|(_, r)| r)
    }

    /// Backend identifiers in presentation order
    pub fn kinds(&self) -> Vec<BackendKind> {
        self.0.iter().map(|(k, _)| *k).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BackendKind, &BackendReport)> {
        self.0.iter().map(|(k, r)| (*k, r))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for BackendReports {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(kind, report)| (kind.as_str(), report)))
    }
}

/// Summary statistics over all backend outcomes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_routes: usize,
    pub services_queried: usize,
    pub services_successful: usize,
    pub execution_time_ms: f64,
}
