use serde::Serialize;
use sqlx::{sqlite::SqliteRow, FromRow};

/// Describes a listable table to the generic [`Repository`](super::repository::Repository).
///
/// Implementors are zero-sized markers; everything is associated consts and
/// types so the repository can build its SQL without per-resource copies.
pub trait Resource: Send + Sync + 'static {
    /// Base table. Pagination totals are counted here and rows are ordered
    /// newest-first by its `id`.
    const TABLE: &'static str;

    /// Singular, capitalised name used in client-facing messages ("Lead not found")
    const LABEL: &'static str;

    /// Select list, trusted SQL
    const SELECT: &'static str;

    /// Optional join appended to the select statement only
    const JOIN: &'static str = "";

    /// Largest accepted `pageSize`
    const MAX_PAGE_SIZE: u32;

    /// Columns of [`Self::TABLE`] that list endpoints may filter on by equality
    const FILTERS: &'static [&'static str] = &[];

    type Row: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;
    type Record: From<Self::Row> + Serialize + Send;
}
