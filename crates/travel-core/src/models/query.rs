//! Search query model

use serde::{Deserialize, Serialize};

/// Client search filters, forwarded to every backend as opaque strings.
///
/// An absent or empty value means "no filter on that field".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl SearchQuery {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(String::from),
            to: to.map(String::from),
        }
    }

    /// `from` filter, `None` when absent or empty
    pub fn from_filter(&self) -> Option<&str> {
        self.from.as_deref().filter(|v| !v.is_empty())
    }

    /// `to` filter, `None` when absent or empty
    pub fn to_filter(&self) -> Option<&str> {
        self.to.as_deref().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_not_filters() {
        let query = SearchQuery::new(Some(""), None);
        assert_eq!(query.from_filter(), None);
        assert_eq!(query.to_filter(), None);
    }

    #[test]
    fn values_pass_through_unchanged() {
        let query = SearchQuery::new(Some(" Zagreb "), Some("Split"));
        assert_eq!(query.from_filter(), Some(" Zagreb "));
        assert_eq!(query.to_filter(), Some("Split"));
    }
}
