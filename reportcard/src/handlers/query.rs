//! Query parameters for list operations
//!
//! `GET /api/classes?page=2&size=50&sort=name,desc&sort=id` reads page 2
//! (0-indexed) with 50 records per page, ordered by `name` descending then
//! `id` ascending. `sort` may repeat, so the query string is read as raw
//! key/value pairs rather than into a fixed struct.
//!
//! Values that do not parse fall back to their defaults instead of failing
//! the request: a bad `page` means page 0, a bad `size` means the configured
//! default size.
//!
//! # Example
//!
//! ```rust
//! use reportcard::config::PaginationConfig;
//! use reportcard::handlers::ListQuery;
//!
//! let query = ListQuery::from_pairs(vec![
//!     ("page".to_string(), "1".to_string()),
//!     ("size".to_string(), "5000".to_string()),
//!     ("sort".to_string(), "name,desc".to_string()),
//! ]);
//! let request = query.page_request(&PaginationConfig::default());
//!
//! assert_eq!(request.page, 1);
//! assert_eq!(request.size, 2000);
//! assert_eq!(request.sort.len(), 1);
//! ```

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use super::error::{ApiError, ApiOperation};
use crate::config::PaginationConfig;
use crate::repository::{PageRequest, SortOrder};

/// Paging and sorting parameters of a list request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Page number (0-indexed). None means the first page.
    pub page: Option<u64>,

    /// Requested page size, before clamping
    pub size: Option<u64>,

    /// Sort expressions (`field[,asc|desc]`), most significant first
    pub sort: Vec<String>,
}

impl ListQuery {
    /// Build from decoded query-string pairs. Unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => query.page = parse_number(&value, "page"),
                "size" => query.size = parse_number(&value, "size"),
                "sort" => query.sort.push(value),
                _ => {}
            }
        }
        query
    }

    /// Resolve against configured limits.
    ///
    /// The size is clamped to `[1, max_size]`. Sort expressions with an
    /// empty field name are dropped.
    pub fn page_request(&self, limits: &PaginationConfig) -> PageRequest {
        let max = limits.max_size.max(1);
        let size = self.size.unwrap_or(limits.default_size).clamp(1, max);
        self.sort
            .iter()
            .filter_map(|expr| SortOrder::parse(expr))
            .fold(PageRequest::new(self.page.unwrap_or(0), size), |request, order| {
                request.with_sort(order)
            })
    }
}

fn parse_number(value: &str, name: &str) -> Option<u64> {
    match value.trim().parse::<i64>() {
        Ok(n) => Some(u64::try_from(n).unwrap_or(0)),
        Err(_) => {
            tracing::debug!(parameter = name, value, "Ignoring unparsable paging parameter");
            None
        }
    }
}

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::bad_request(ApiOperation::List, e.body_text()))?;
        Ok(Self::from_pairs(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::OrderDirection;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let request = ListQuery::default().page_request(&PaginationConfig::default());
        assert_eq!(request, PageRequest::new(0, 20));
    }

    #[test]
    fn test_repeated_sort_keeps_order() {
        let query = ListQuery::from_pairs(pairs(&[
            ("sort", "lastName,desc"),
            ("sort", "firstName"),
            ("sort", ",asc"),
        ]));
        let request = query.page_request(&PaginationConfig::default());

        assert_eq!(request.sort.len(), 2);
        assert_eq!(request.sort[0].property, "lastName");
        assert_eq!(request.sort[0].direction, OrderDirection::Descending);
        assert_eq!(request.sort[1], SortOrder::asc("firstName"));
    }

    #[test]
    fn test_size_is_clamped() {
        let limits = PaginationConfig {
            default_size: 20,
            max_size: 100,
        };
        let zero = ListQuery::from_pairs(pairs(&[("size", "0")]));
        assert_eq!(zero.page_request(&limits).size, 1);

        let huge = ListQuery::from_pairs(pairs(&[("size", "100000")]));
        assert_eq!(huge.page_request(&limits).size, 100);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let query = ListQuery::from_pairs(pairs(&[("page", "two"), ("size", "lots")]));
        assert_eq!(query.page, None);
        assert_eq!(query.size, None);
        assert_eq!(
            query.page_request(&PaginationConfig::default()),
            PageRequest::new(0, 20)
        );
    }

    #[test]
    fn test_negative_page_is_first_page() {
        let query = ListQuery::from_pairs(pairs(&[("page", "-3")]));
        assert_eq!(query.page, Some(0));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let query = ListQuery::from_pairs(pairs(&[("cacheBuster", "123"), ("page", "4")]));
        assert_eq!(query.page, Some(4));
        assert!(query.sort.is_empty());
    }

    #[tokio::test]
    async fn test_extract_from_request() {
        let request = axum::http::Request::builder()
            .uri("/api/classes?page=1&size=5&sort=name%2Cdesc&sort=id")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let query = ListQuery::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(query.page, Some(1));
        assert_eq!(query.size, Some(5));
        assert_eq!(query.sort, vec!["name,desc".to_string(), "id".to_string()]);
    }

    #[tokio::test]
    async fn test_extract_without_query_string() {
        let request = axum::http::Request::builder()
            .uri("/api/classes")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let query = ListQuery::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(query, ListQuery::default());
    }
}
