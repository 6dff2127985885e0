//! Result combiner - merges per-backend outcomes into one envelope

use std::time::Duration;

use chrono::{DateTime, Utc};
use travel_core::{
    AggregatedResponse, BackendRegistry, BackendReport, BackendReports, SearchCriteria,
    SearchQuery, ServiceOutcome, Summary,
};

/// Merge per-backend outcomes into the aggregated response.
///
/// Pure: no I/O and no failure modes. Outcomes are re-associated by backend
/// identity, so arrival order is irrelevant; reports appear in the registry's
/// configured order, followed by any outcome for a backend the registry does
/// not list. A configured backend with no outcome is reported as failed, so
/// every configured backend appears exactly once.
pub fn combine(
    query: &SearchQuery,
    registry: &BackendRegistry,
    mut outcomes: Vec<ServiceOutcome>,
    elapsed: Duration,
    timestamp: DateTime<Utc>,
) -> AggregatedResponse {
    for backend in registry.iter() {
        if !outcomes.iter().any(|o| o.kind() == backend.kind) {
            outcomes.push(ServiceOutcome::failure(
                backend.clone(),
                format!("No response from {} service", backend.kind.display_name()),
            ));
        }
    }
    outcomes.sort_by_key(|o| registry.position(o.kind()).unwrap_or(usize::MAX));

    let services_queried = outcomes.len();
    let services_successful = outcomes.iter().filter(|o| o.is_success()).count();
    let total_routes = outcomes.iter().map(ServiceOutcome::route_count).sum();

    let mut results = BackendReports::new();
    for outcome in outcomes {
        results.push(outcome.kind(), BackendReport::from(outcome));
    }

    AggregatedResponse {
        search_criteria: SearchCriteria {
            from: query.from.clone(),
            to: query.to.clone(),
            timestamp,
        },
        results,
        summary: Summary {
            total_routes,
            services_queried,
            services_successful,
            execution_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{registry, route};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use travel_core::BackendKind;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 15, 17, 21, 36).unwrap()
    }

    #[test]
    fn counts_only_successful_routes() {
        let reg = registry();
        let train = reg.get(BackendKind::Train).unwrap().clone();
        let bus = reg.get(BackendKind::Bus).unwrap().clone();
        let flight = reg.get(BackendKind::Flight).unwrap().clone();

        let outcomes = vec![
            ServiceOutcome::success(train, vec![route(1), route(2)]),
            ServiceOutcome::failure(bus, "Bus service returned 500 Internal Server Error"),
            ServiceOutcome::success(flight, vec![route(3), route(4), route(5)]),
        ];

        let response = combine(
            &SearchQuery::default(),
            &reg,
            outcomes,
            Duration::from_millis(250),
            at(),
        );

        assert_eq!(response.summary.total_routes, 5);
        assert_eq!(response.summary.services_queried, 3);
        assert_eq!(response.summary.services_successful, 2);
        assert_eq!(response.summary.execution_time_ms, 250.0);

        let bus = response.results.get(BackendKind::Bus).unwrap();
        assert!(!bus.success);
        assert_eq!(bus.count, 0);
        assert_eq!(bus.routes, None);
        assert_eq!(
            bus.error.as_deref(),
            Some("Bus service returned 500 Internal Server Error")
        );
    }

    #[test]
    fn presents_backends_in_configured_order() {
        let reg = registry();
        let mut outcomes: Vec<ServiceOutcome> = reg
            .iter()
            .map(|b| ServiceOutcome::success(b.clone(), vec![]))
            .collect();
        outcomes.reverse();

        let response = combine(&SearchQuery::default(), &reg, outcomes, Duration::ZERO, at());

        assert_eq!(
            response.results.kinds(),
            vec![BackendKind::Train, BackendKind::Bus, BackendKind::Flight]
        );
    }

    #[test]
    fn missing_outcome_is_reported_as_failure() {
        let reg = registry();
        let train = reg.get(BackendKind::Train).unwrap().clone();

        let response = combine(
            &SearchQuery::default(),
            &reg,
            vec![ServiceOutcome::success(train, vec![route(1)])],
            Duration::ZERO,
            at(),
        );

        assert_eq!(response.results.len(), 3);
        assert_eq!(response.summary.services_successful, 1);
        let flight = response.results.get(BackendKind::Flight).unwrap();
        assert_eq!(
            flight.error.as_deref(),
            Some("No response from Flight service")
        );
    }

    #[test]
    fn echoes_query_and_timestamp() {
        let reg = registry();
        let outcomes = reg
            .iter()
            .map(|b| ServiceOutcome::success(b.clone(), vec![]))
            .collect();

        let query = SearchQuery::new(Some("Zagreb"), Some(""));
        let response = combine(&query, &reg, outcomes, Duration::ZERO, at());

        assert_eq!(response.search_criteria.from.as_deref(), Some("Zagreb"));
        assert_eq!(response.search_criteria.to.as_deref(), Some(""));
        assert_eq!(response.search_criteria.timestamp, at());
    }

    #[test]
    fn combine_is_idempotent() {
        let reg = registry();
        let outcomes: Vec<ServiceOutcome> = reg
            .iter()
            .enumerate()
            .map(|(i, b)| {
                if i == 1 {
                    ServiceOutcome::failure(b.clone(), "Bus service is unavailable")
                } else {
                    ServiceOutcome::success(b.clone(), vec![route(i as i64)])
                }
            })
            .collect();

        let query = SearchQuery::new(Some("Split"), None);
        let first = combine(&query, &reg, outcomes.clone(), Duration::from_millis(7), at());
        let second = combine(&query, &reg, outcomes, Duration::from_millis(7), at());

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
