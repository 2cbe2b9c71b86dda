use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    #[error("Invalid filter value for {column}: {value}")]
    InvalidFilterValue { column: String, value: String },

    #[error("Invalid pagination parameters: {0}")]
    InvalidPagination(String),
}
