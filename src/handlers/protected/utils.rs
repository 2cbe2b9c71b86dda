use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use serde::Deserialize;

use crate::database::Resource;
use crate::error::ApiError;
use crate::filter::{FilterError, PageRequest};

/// Raw list query string. Values stay textual so malformed numbers become a
/// pagination error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub status: Option<String>,
}

impl ListParams {
    /// Validate `page`/`pageSize` against the resource ceiling. Absent values
    /// default to page 1 and the configured page size.
    pub fn page_request<R: Resource>(&self, default_page_size: u32) -> Result<PageRequest, FilterError> {
        let page = parse_number("page", self.page.as_deref(), 1)?;
        let page_size = parse_number(
            "pageSize",
            self.page_size.as_deref(),
            i64::from(default_page_size.min(R::MAX_PAGE_SIZE)),
        )?;
        PageRequest::new(page, page_size, R::MAX_PAGE_SIZE)
    }

    /// The `status` filter value, treating an empty parameter as absent
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

fn parse_number(name: &str, raw: Option<&str>, default: i64) -> Result<i64, FilterError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map_err(|_| FilterError::InvalidPagination(format!("{} is not an integer: {:?}", name, value))),
    }
}

/// Numeric `:id` path segment; anything else is a 400 naming the resource
pub fn parse_id(path: Result<Path<String>, PathRejection>, label: &str) -> Result<i64, ApiError> {
    let invalid = || ApiError::bad_request(format!("Invalid {} id", label));
    let Path(raw) = path.map_err(|_| invalid())?;
    raw.trim().parse::<i64>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::lead::Leads;

    fn params(page: Option<&str>, page_size: Option<&str>) -> ListParams {
        ListParams {
            page: page.map(String::from),
            page_size: page_size.map(String::from),
            status: None,
        }
    }

    #[test]
    fn defaults_apply_when_absent() {
        let req = params(None, None).page_request::<Leads>(10).unwrap();
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), 10);

        let capped = params(None, None).page_request::<Leads>(500).unwrap();
        assert_eq!(capped.page_size(), 100);
    }

    #[test]
    fn rejects_non_numeric_and_out_of_range() {
        for (page, size) in [
            (Some("abc"), None),
            (Some(""), None),
            (Some("0"), None),
            (None, Some("0")),
            (None, Some("101")),
            (Some("1.5"), Some("10")),
        ] {
            assert!(
                matches!(
                    params(page, size).page_request::<Leads>(10),
                    Err(FilterError::InvalidPagination(_))
                ),
                "page={:?} pageSize={:?}",
                page,
                size
            );
        }
    }

    #[test]
    fn empty_status_means_no_filter() {
        let mut p = ListParams::default();
        assert_eq!(p.status(), None);
        p.status = Some("".into());
        assert_eq!(p.status(), None);
        p.status = Some("active".into());
        assert_eq!(p.status(), Some("active"));
    }

    #[test]
    fn parses_numeric_ids_only() {
        assert_eq!(parse_id(Ok(Path("42".to_string())), "lead").unwrap(), 42);
        assert_eq!(
            parse_id(Ok(Path("abc".to_string())), "lead").unwrap_err(),
            ApiError::bad_request("Invalid lead id")
        );
    }
}
