use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::database::resource::Resource;
use crate::filter::{FilterError, ListQuery, Page, Pagination, SortDirection, SqlParam};

/// Read and delete operations shared by every [`Resource`]. Writes that need
/// per-table columns are added in `impl Repository<X>` blocks next to the model.
pub struct Repository<R> {
    pool: SqlitePool,
    _phantom: std::marker::PhantomData<R>,
}

impl<R: Resource> Repository<R> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// One page of rows, newest first, plus a total counted under the same filters.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<R::Record>, DatabaseError> {
        let mut builder = self.builder()?;
        for condition in &query.filters {
            if !R::FILTERS.contains(&condition.column.as_str()) {
                return Err(FilterError::UnsupportedFilter(condition.column.clone()).into());
            }
            builder
                .filter()
                .where_eq(&qualified::<R>(&condition.column), condition.value.clone())?;
        }
        builder
            .filter()
            .order(&qualified::<R>("id"), SortDirection::Desc)?
            .page(query.page);

        let total = builder.count(&self.pool).await?;
        let rows = builder.select_all(&self.pool).await?;

        Ok(Page {
            data: rows.into_iter().map(R::Record::from).collect(),
            pagination: Pagination::new(query.page, total),
        })
    }

    pub async fn select_one(&self, id: i64) -> Result<Option<R::Record>, DatabaseError> {
        let mut builder = self.builder()?;
        builder.filter().where_eq(&qualified::<R>("id"), SqlParam::Integer(id))?;
        let row = builder.select_optional(&self.pool).await?;
        Ok(row.map(R::Record::from))
    }

    pub async fn select_404(&self, id: i64) -> Result<R::Record, DatabaseError> {
        self.select_one(id).await?.ok_or_else(|| self.not_found())
    }

    /// Delete by id. A missing row is reported as `NotFound`, never as success.
    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = ?", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(self.not_found());
        }
        Ok(())
    }

    pub(crate) fn not_found(&self) -> DatabaseError {
        DatabaseError::NotFound(format!("{} not found", R::LABEL))
    }

    fn builder(&self) -> Result<QueryBuilder<R::Row>, DatabaseError> {
        let mut builder = QueryBuilder::<R::Row>::new(R::TABLE)?;
        builder.filter().select(R::SELECT).join(R::JOIN);
        Ok(builder)
    }
}

fn qualified<R: Resource>(column: &str) -> String {
    format!("{}.{}", R::TABLE, column)
}
