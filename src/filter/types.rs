use serde::{Deserialize, Serialize};

use super::error::FilterError;

/// A value bound to a `?` placeholder in generated SQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
}

/// Equality predicate applied to both the count and the select query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    pub column: String,
    pub value: SqlParam,
}

impl FilterCondition {
    pub fn eq(column: impl Into<String>, value: SqlParam) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// A validated page window. Construction rejects out-of-range input, so
/// holding one means the numbers are safe to turn into LIMIT/OFFSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64, max_page_size: u32) -> Result<Self, FilterError> {
        if page < 1 || page > i64::from(u32::MAX) {
            return Err(FilterError::InvalidPagination(format!(
                "page must be a positive integer, got {}",
                page
            )));
        }
        if page_size < 1 || page_size > i64::from(max_page_size) {
            return Err(FilterError::InvalidPagination(format!(
                "pageSize must be between 1 and {}, got {}",
                max_page_size, page_size
            )));
        }

        Ok(Self {
            page: page as u32,
            page_size: page_size as u32,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }
}

/// Pagination block shared by every list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let page_size = request.limit();
        let total = total.max(0);
        // An empty result still reports one (empty) page
        let total_pages = ((total + page_size - 1) / page_size).max(1);

        Self {
            page: request.page(),
            page_size: request.page_size(),
            total,
            total_pages,
        }
    }
}

/// `{ data, pagination }` envelope returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Everything a list endpoint needs: the page window plus equality filters
/// keyed by the resource's public filter names.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: PageRequest,
    pub filters: Vec<FilterCondition>,
}

impl ListQuery {
    pub fn new(page: PageRequest) -> Self {
        Self {
            page,
            filters: vec![],
        }
    }

    pub fn with_filter(mut self, condition: FilterCondition) -> Self {
        self.filters.push(condition);
        self
    }
}
