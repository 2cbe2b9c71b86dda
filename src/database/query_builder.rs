use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Row, Sqlite, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::filter::types::SqlParam;
use crate::filter::Filter;

/// Runs the statements produced by a [`Filter`] and decodes rows into `T`
pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        Ok(Self {
            filter: Filter::new(table_name)?,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(&mut self) -> &mut Filter {
        &mut self.filter
    }

    pub async fn select_all(&self, pool: &SqlitePool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.filter.to_sql();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn select_optional(&self, pool: &SqlitePool) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.filter.to_sql();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let row = q.fetch_optional(pool).await?;
        Ok(row)
    }

    pub async fn count(&self, pool: &SqlitePool) -> Result<i64, DatabaseError> {
        let sql_result = self.filter.to_count_sql();
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

fn bind_param_query<'q>(
    q: Query<'q, Sqlite, SqliteArguments<'q>>,
    v: &SqlParam,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match v {
        SqlParam::Text(s) => q.bind(s.clone()),
        SqlParam::Integer(i) => q.bind(*i),
    }
}

fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    v: &SqlParam,
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>>
where
    O: for<'r> FromRow<'r, SqliteRow>,
{
    match v {
        SqlParam::Text(s) => q.bind(s.clone()),
        SqlParam::Integer(i) => q.bind(*i),
    }
}
