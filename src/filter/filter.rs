use super::error::FilterError;
use super::types::{FilterCondition, FilterOrderInfo, PageRequest, SortDirection, SqlParam, SqlResult};

/// Builds a paired SELECT / COUNT statement over one table. Both statements
/// share the same WHERE clause and parameters so the reported total always
/// matches the rows that can be paged through.
pub struct Filter {
    table_name: String,
    select_clause: String,
    joins: Vec<String>,
    conditions: Vec<FilterCondition>,
    order_data: Vec<FilterOrderInfo>,
    page: Option<PageRequest>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            select_clause: "*".to_string(),
            joins: vec![],
            conditions: vec![],
            order_data: vec![],
            page: None,
        })
    }

    /// Replace the select list. The fragment is trusted SQL owned by the caller.
    pub fn select(&mut self, columns: &str) -> &mut Self {
        self.select_clause = columns.to_string();
        self
    }

    /// Append a join to the select statement only; counts stay on the base table.
    pub fn join(&mut self, join: &str) -> &mut Self {
        if !join.trim().is_empty() {
            self.joins.push(join.to_string());
        }
        self
    }

    pub fn where_eq(&mut self, column: &str, value: SqlParam) -> Result<&mut Self, FilterError> {
        Self::validate_column(column)?;
        self.conditions.push(FilterCondition::eq(column, value));
        Ok(self)
    }

    pub fn order(&mut self, column: &str, sort: SortDirection) -> Result<&mut Self, FilterError> {
        Self::validate_column(column)?;
        self.order_data.push(FilterOrderInfo {
            column: column.to_string(),
            sort,
        });
        Ok(self)
    }

    pub fn page(&mut self, page: PageRequest) -> &mut Self {
        self.page = Some(page);
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = self.build_where_clause();

        let mut from_clause = quote_identifier(&self.table_name);
        for join in &self.joins {
            from_clause.push(' ');
            from_clause.push_str(join);
        }

        let query = [
            format!("SELECT {}", self.select_clause),
            format!("FROM {}", from_clause),
            where_clause,
            self.build_order_clause(),
            self.build_limit_clause(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let (where_clause, params) = self.build_where_clause();
        let base = format!("SELECT COUNT(*) AS count FROM {}", quote_identifier(&self.table_name));
        let query = if where_clause.is_empty() {
            base
        } else {
            format!("{} {}", base, where_clause)
        };
        SqlResult { query, params }
    }

    fn build_where_clause(&self) -> (String, Vec<SqlParam>) {
        if self.conditions.is_empty() {
            return (String::new(), vec![]);
        }

        let clauses = self
            .conditions
            .iter()
            .map(|c| format!("{} = ?", quote_identifier(&c.column)))
            .collect::<Vec<_>>()
            .join(" AND ");
        let params = self.conditions.iter().map(|c| c.value.clone()).collect();

        (format!("WHERE {}", clauses), params)
    }

    fn build_order_clause(&self) -> String {
        if self.order_data.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .order_data
            .iter()
            .map(|i| format!("{} {}", quote_identifier(&i.column), i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }

    fn build_limit_clause(&self) -> String {
        match self.page {
            Some(p) => format!("LIMIT {} OFFSET {}", p.limit(), p.offset()),
            None => String::new(),
        }
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if !is_identifier(name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }

    /// Columns may be bare (`status`) or table-qualified (`leads.status`).
    fn validate_column(column: &str) -> Result<(), FilterError> {
        let mut parts = column.split('.');
        let valid = match (parts.next(), parts.next(), parts.next()) {
            (Some(col), None, None) => is_identifier(col),
            (Some(table), Some(col), None) => is_identifier(table) && is_identifier(col),
            _ => false,
        };
        if !valid {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column)));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Quote a (possibly table-qualified) identifier that already passed validation
fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part))
        .collect::<Vec<_>>()
        .join(".")
}
