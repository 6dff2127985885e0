//! Backend (route provider) models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RegistryError;
use crate::models::SearchQuery;

/// The closed set of route-provider services the gateway knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Train,
    Bus,
    Flight,
}

impl BackendKind {
    /// All known kinds, in default presentation order
    pub const ALL: [BackendKind; 3] = [BackendKind::Train, BackendKind::Bus, BackendKind::Flight];

    /// Lowercase identifier used in paths, config and JSON keys
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Train => "train",
            BackendKind::Bus => "bus",
            BackendKind::Flight => "flight",
        }
    }

    /// Capitalised name used in human-readable messages
    pub fn display_name(&self) -> &'static str {
        match self {
            BackendKind::Train => "Train",
            BackendKind::Bus => "Bus",
            BackendKind::Flight => "Flight",
        }
    }

    /// Match a service-type token case-insensitively
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RegistryError::UnknownKind(s.to_string()))
    }
}

/// One provider service bound to its network address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDescriptor {
    pub kind: BackendKind,
    pub base_url: Url,
}

impl BackendDescriptor {
    /// Create a descriptor, rejecting anything that is not an http(s) base URL
    pub fn new(kind: BackendKind, base_url: &str) -> Result<Self, RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidUrl { kind, reason };

        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("'{}' is not an http(s) base URL", base_url)));
        }

        Ok(Self {
            kind,
            base_url: url,
        })
    }

    /// `GET {base}/api/routes` with `from`/`to` appended only when non-empty
    pub fn search_url(&self, query: &SearchQuery) -> Result<Url, url::ParseError> {
        let mut url = self.endpoint("api/routes")?;

        let filters: Vec<(&str, &str)> = [("from", query.from_filter()), ("to", query.to_filter())]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();

        if !filters.is_empty() {
            url.query_pairs_mut().extend_pairs(filters);
        }

        Ok(url)
    }

    /// `GET {base}/api/routes/{id}`
    pub fn route_url(&self, id: i64) -> Result<Url, url::ParseError> {
        self.endpoint(&format!("api/routes/{}", id))
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{}/{}", base, path))
    }
}

/// The fixed, ordered set of backends the gateway queries.
///
/// Built once at process start and injected into the aggregator and the
/// single-service router. The configured order is the order backends are
/// presented in every aggregated response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRegistry {
    backends: Vec<BackendDescriptor>,
}

impl BackendRegistry {
    /// Build a registry; at least one backend, at most one per kind
    pub fn new(backends: Vec<BackendDescriptor>) -> Result<Self, RegistryError> {
        if backends.is_empty() {
            return Err(RegistryError::Empty);
        }

        for (i, backend) in backends.iter().enumerate() {
            if backends[..i].iter().any(|b| b.kind == backend.kind) {
                return Err(RegistryError::Duplicate(backend.kind));
            }
        }

        Ok(Self { backends })
    }

    /// Look up the descriptor bound to a kind
    pub fn get(&self, kind: BackendKind) -> Option<&BackendDescriptor> {
        self.backends.iter().find(|b| b.kind == kind)
    }

    /// Position of a kind in configured order
    pub fn position(&self, kind: BackendKind) -> Option<usize> {
        self.backends.iter().position(|b| b.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackendDescriptor> {
        self.backends.iter()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Comma-separated configured identifiers, e.g. `"train, bus, flight"`
    pub fn valid_types(&self) -> String {
        self.backends
            .iter()
            .map(|b| b.kind.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(kind: BackendKind, url: &str) -> BackendDescriptor {
        BackendDescriptor::new(kind, url).unwrap()
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(BackendKind::parse("FLIGHT"), Some(BackendKind::Flight));
        assert_eq!(BackendKind::parse("Train"), Some(BackendKind::Train));
        assert_eq!(BackendKind::parse("bus"), Some(BackendKind::Bus));
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert_eq!(BackendKind::parse("boat"), None);
        assert_eq!(BackendKind::parse(""), None);
        assert!("ferry".parse::<BackendKind>().is_err());
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&BackendKind::Flight).unwrap();
        assert_eq!(json, "\"flight\"");
    }

    #[test]
    fn descriptor_rejects_non_http_urls() {
        assert!(BackendDescriptor::new(BackendKind::Bus, "").is_err());
        assert!(BackendDescriptor::new(BackendKind::Bus, "mailto:ops@example.com").is_err());
        assert!(BackendDescriptor::new(BackendKind::Bus, "ftp://example.com").is_err());
    }

    #[test]
    fn search_url_without_filters_has_no_query() {
        let d = descriptor(BackendKind::Train, "http://localhost:49892");
        let url = d.search_url(&SearchQuery::default()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:49892/api/routes");
    }

    #[test]
    fn search_url_skips_empty_filters() {
        let d = descriptor(BackendKind::Train, "http://localhost:49892/");
        let query = SearchQuery::new(Some(""), Some("Berlin"));
        let url = d.search_url(&query).unwrap();
        assert_eq!(url.as_str(), "http://localhost:49892/api/routes?to=Berlin");
    }

    #[test]
    fn search_url_escapes_filter_values() {
        let d = descriptor(BackendKind::Bus, "http://localhost:49893");
        let query = SearchQuery::new(Some("New York"), Some("a&b=c"));
        let url = d.search_url(&query).unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("from".to_string(), "New York".to_string()),
                ("to".to_string(), "a&b=c".to_string()),
            ]
        );
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn route_url_keeps_base_path() {
        let d = descriptor(BackendKind::Flight, "http://gateway.local/flight/");
        let url = d.route_url(2).unwrap();
        assert_eq!(url.as_str(), "http://gateway.local/flight/api/routes/2");
    }

    #[test]
    fn registry_rejects_empty_and_duplicates() {
        assert!(matches!(
            BackendRegistry::new(vec![]),
            Err(RegistryError::Empty)
        ));

        let result = BackendRegistry::new(vec![
            descriptor(BackendKind::Bus, "http://a:1"),
            descriptor(BackendKind::Bus, "http://b:2"),
        ]);
        assert!(matches!(
            result,
            Err(RegistryError::Duplicate(BackendKind::Bus))
        ));
    }

    #[test]
    fn registry_keeps_configured_order() {
        let registry = BackendRegistry::new(vec![
            descriptor(BackendKind::Flight, "http://f:1"),
            descriptor(BackendKind::Train, "http://t:2"),
        ])
        .unwrap();

        assert_eq!(registry.valid_types(), "flight, train");
        assert_eq!(registry.position(BackendKind::Train), Some(1));
        assert_eq!(registry.position(BackendKind::Bus), None);
        assert!(registry.get(BackendKind::Bus).is_none());
    }
}
