// src/fetch.rs
//! Runs one JSON-API driven SELECT and dumps the rows into a document

use sqlx::SqlitePool;

use crate::db::row_to_record;
use crate::error::ApiResult;
use crate::jsonapi::{Document, Record, ResourceSchema};
use crate::query_builders::{
    bind_args, order_by, select_expressions, FieldExpressions, NestedExpressions, PageSpec,
    QueryArg, QueryParams,
};

/// Callback run on every record before it is dumped
pub type Enricher<'a> = Box<dyn Fn(&mut Record) + Send + Sync + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Single,
    Many,
}

enum Rows {
    Single(Option<Record>),
    Many(Vec<Record>),
}

/// Columns picked for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub fields: Vec<String>,
    pub expressions: FieldExpressions,
}

impl Selection {
    /// Merges root and nested maps and resolves the requested fields against them.
    ///
    /// A requested nested group name expands to all fields of the group. `id`
    /// is always selected.
    pub fn resolve(
        root: &FieldExpressions,
        nested: &[NestedExpressions],
        requested: Option<&[&str]>,
    ) -> Self {
        let mut expressions = root.clone();
        for group in nested {
            expressions.extend(&group.fields);
        }

        let mut fields: Vec<String> = match requested {
            Some(requested) => {
                let mut fields: Vec<String> = requested
                    .iter()
                    .filter(|f| expressions.contains(f))
                    .map(|f| f.to_string())
                    .collect();

                for group in nested.iter().filter(|g| requested.contains(&g.name.as_str())) {
                    fields.extend(group.fields.fields().map(str::to_string));
                }
                fields
            }
            None => expressions.fields().map(str::to_string).collect(),
        };

        if !fields.iter().any(|f| f == "id") {
            fields.push("id".to_string());
        }

        Self { fields, expressions }
    }

    pub fn to_sql(&self) -> String {
        select_expressions(&self.fields, &self.expressions)
    }
}

/// Builder for a JSON-API fetch.
///
/// ```ignore
/// let doc = FetchQuery::new(&MAP_SCHEMA, MAP_TABLE, &fields, 1000, &params)
///     .filter("version.id = ?", vec![QueryArg::integer(id)])
///     .enricher(|record| enrich(record))
///     .fetch_one(&pool)
///     .await?;
/// ```
pub struct FetchQuery<'a> {
    schema: &'a ResourceSchema,
    table: &'a str,
    fields: &'a FieldExpressions,
    max_page_size: i64,
    params: &'a QueryParams,
    where_clause: Option<String>,
    where_extension: Option<String>,
    args: Vec<QueryArg>,
    nested: Vec<NestedExpressions>,
    enricher: Option<Enricher<'a>>,
    sort: Option<String>,
    paginate: bool,
}

impl<'a> FetchQuery<'a> {
    pub fn new(
        schema: &'a ResourceSchema,
        table: &'a str,
        fields: &'a FieldExpressions,
        max_page_size: i64,
        params: &'a QueryParams,
    ) -> Self {
        Self {
            schema,
            table,
            fields,
            max_page_size,
            params,
            where_clause: None,
            where_extension: None,
            args: Vec::new(),
            nested: Vec::new(),
            enricher: None,
            sort: None,
            paginate: true,
        }
    }

    /// WHERE condition (without the keyword) and its arguments
    pub fn filter(mut self, condition: impl Into<String>, args: Vec<QueryArg>) -> Self {
        self.where_clause = Some(condition.into()).filter(|c: &String| !c.trim().is_empty());
        self.args.extend(args);
        self
    }

    /// Text appended after the WHERE condition, for tables that already carry one
    pub fn where_extension(mut self, extension: impl Into<String>) -> Self {
        self.where_extension = Some(extension.into()).filter(|c: &String| !c.trim().is_empty());
        self
    }

    pub fn args(mut self, args: Vec<QueryArg>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn nested(mut self, group: NestedExpressions) -> Self {
        self.nested.push(group);
        self
    }

    pub fn enricher(mut self, enricher: impl Fn(&mut Record) + Send + Sync + 'a) -> Self {
        self.enricher = Some(Box::new(enricher));
        self
    }

    /// Sort expression used instead of the request's `sort` parameter
    pub fn sort(mut self, expression: impl Into<String>) -> Self {
        self.sort = Some(expression.into()).filter(|s: &String| !s.is_empty());
        self
    }

    pub fn without_pagination(mut self) -> Self {
        self.paginate = false;
        self
    }

    pub async fn fetch_one(self, pool: &SqlitePool) -> ApiResult<Document> {
        self.fetch(pool, Shape::Single).await
    }

    pub async fn fetch_many(self, pool: &SqlitePool) -> ApiResult<Document> {
        self.fetch(pool, Shape::Many).await
    }

    /// Builds the statement for `shape`. All client input is validated here.
    fn build_sql(&self, shape: Shape) -> ApiResult<String> {
        let requested = self.params.fields(self.schema.resource_type);
        let selection = Selection::resolve(self.fields, &self.nested, requested.as_deref());

        let mut sql = format!("SELECT {} FROM {}", selection.to_sql(), self.table);

        if let Some(condition) = &self.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        if let Some(extension) = &self.where_extension {
            sql.push(' ');
            sql.push_str(extension.trim());
        }

        if shape == Shape::Many {
            let limit = if self.paginate {
                Some(PageSpec::from_params(self.params, self.max_page_size)?.to_sql())
            } else {
                None
            };

            let sort = self.sort.as_deref().or_else(|| self.params.sort()).unwrap_or("");
            let order = order_by(sort, &selection.fields)?;
            if !order.is_empty() {
                sql.push(' ');
                sql.push_str(&order);
            }

            if let Some(limit) = limit {
                sql.push(' ');
                sql.push_str(&limit);
            }
        }

        Ok(sql)
    }

    async fn fetch(self, pool: &SqlitePool, shape: Shape) -> ApiResult<Document> {
        let sql = self.build_sql(shape)?;
        tracing::debug!(resource = self.schema.resource_type, %sql, args = self.args.len(), "fetching");

        let rows = {
            let mut conn = pool.acquire().await?;
            let query = bind_args(sqlx::query(&sql), &self.args);

            match shape {
                Shape::Single => {
                    let row = query.fetch_optional(&mut *conn).await?;
                    Rows::Single(row.as_ref().map(row_to_record).transpose()?)
                }
                Shape::Many => {
                    let rows = query.fetch_all(&mut *conn).await?;
                    Rows::Many(rows.iter().map(row_to_record).collect::<Result<_, _>>()?)
                }
            }
        };

        let mut document = match rows {
            Rows::Single(mut record) => {
                if let (Some(enrich), Some(record)) = (&self.enricher, record.as_mut()) {
                    enrich(record);
                }
                self.schema.dump_one(record.as_ref())
            }
            Rows::Many(mut records) => {
                if let Some(enrich) = &self.enricher {
                    records.iter_mut().for_each(|record| enrich(record));
                }
                self.schema.dump_many(&records)
            }
        };

        document.copy_ids_into_attributes();
        Ok(document)
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, QueryError};
    use crate::jsonapi::{FieldKind, SchemaField};
    use serde_json::{json, Value};
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SCHEMA: ResourceSchema = ResourceSchema::new(
        "item",
        &[
            SchemaField::new("id", FieldKind::String),
            SchemaField::new("name", FieldKind::String),
            SchemaField::new("likes", FieldKind::Integer),
            SchemaField::new("owner_name", FieldKind::String),
            SchemaField::new("owner_id", FieldKind::Integer),
        ],
    );

    const TABLE: &str = "item i LEFT JOIN owner o ON o.id = i.owner_id";

    fn fields() -> FieldExpressions {
        FieldExpressions::from_pairs(&[("id", "i.id"), ("name", "i.name"), ("likes", "i.likes")])
    }

    fn owner() -> NestedExpressions {
        NestedExpressions::new(
            "owner",
            FieldExpressions::from_pairs(&[("owner_id", "o.id"), ("owner_name", "o.login")]),
        )
    }

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        for statement in [
            "CREATE TABLE owner (id INTEGER PRIMARY KEY, login TEXT NOT NULL)",
            "CREATE TABLE item (id INTEGER PRIMARY KEY, name TEXT NOT NULL, likes INTEGER NOT NULL, owner_id INTEGER)",
            "INSERT INTO owner (id, login) VALUES (1, 'User 1'), (2, 'User 2')",
            "INSERT INTO item (id, name, likes, owner_id) VALUES \
                (1, 'alpha', 5, 1), (2, 'beta', 9, 2), (3, 'gamma', 1, 2), (4, 'delta', 7, NULL)",
        ] {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }
        pool
    }

    fn json(doc: &Document) -> Value {
        serde_json::to_value(doc).unwrap()
    }

    fn names(doc: &Document) -> Vec<String> {
        doc.resources()
            .iter()
            .map(|r| r.attributes["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_selection_forces_id() {
        let selection = Selection::resolve(&fields(), &[], Some(&["name"]));
        assert_eq!(selection.fields, vec!["name", "id"]);
        assert_eq!(selection.to_sql(), "i.name AS \"name\", i.id AS \"id\"");
    }

    #[test]
    fn test_selection_expands_nested_group() {
        let selection = Selection::resolve(&fields(), &[owner()], Some(&["name", "owner"]));
        assert_eq!(selection.fields, vec!["name", "owner_id", "owner_name", "id"]);
    }

    #[test]
    fn test_selection_all_includes_nested() {
        let selection = Selection::resolve(&fields(), &[owner()], None);
        assert_eq!(selection.fields, vec!["id", "name", "likes", "owner_id", "owner_name"]);
    }

    #[test]
    fn test_build_sql_many() {
        let params = QueryParams::from_pairs(&[
            ("fields[item]", "name,likes"),
            ("sort", "-likes"),
            ("page[size]", "10"),
            ("page[number]", "2"),
        ]);
        let f = fields();
        let sql = FetchQuery::new(&SCHEMA, "item", &f, 100, &params)
            .filter("likes > ?", vec![QueryArg::integer(0)])
            .build_sql(Shape::Many)
            .unwrap();

        assert_eq!(
            sql,
            "SELECT i.name AS \"name\", i.likes AS \"likes\", i.id AS \"id\" FROM item \
             WHERE likes > ? ORDER BY \"likes\" DESC LIMIT 10, 10"
        );
    }

    #[test]
    fn test_build_sql_single_ignores_sort_and_page() {
        let params = QueryParams::from_pairs(&[("sort", "nope"), ("page[size]", "x")]);
        let f = fields();
        let sql = FetchQuery::new(&SCHEMA, "item", &f, 100, &params)
            .filter("i.id = ?", vec![QueryArg::integer(1)])
            .build_sql(Shape::Single)
            .unwrap();

        assert!(sql.ends_with("FROM item WHERE i.id = ?"));
    }

    #[test]
    fn test_build_sql_where_extension_without_where() {
        let params = QueryParams::default();
        let f = fields();
        let sql = FetchQuery::new(&SCHEMA, "item WHERE likes > 0", &f, 100, &params)
            .where_extension(" AND likes < ?")
            .without_pagination()
            .build_sql(Shape::Many)
            .unwrap();

        assert!(sql.ends_with("FROM item WHERE likes > 0 AND likes < ?"));
    }

    #[test]
    fn test_sort_override_takes_precedence() {
        let params = QueryParams::from_pairs(&[("sort", "password")]);
        let f = fields();
        let sql = FetchQuery::new(&SCHEMA, "item", &f, 100, &params)
            .sort("-name")
            .without_pagination()
            .build_sql(Shape::Many)
            .unwrap();

        assert!(sql.ends_with("ORDER BY \"name\" DESC"));
    }

    #[test]
    fn test_sort_must_be_selected() {
        let params = QueryParams::from_pairs(&[("fields[item]", "name"), ("sort", "likes")]);
        let f = fields();
        let err = FetchQuery::new(&SCHEMA, "item", &f, 100, &params)
            .build_sql(Shape::Many)
            .unwrap_err();

        assert!(matches!(err, ApiError::Query(QueryError::InvalidSortField(ref c)) if c == "likes"));
    }

    #[actix_rt::test]
    async fn test_fetch_many_with_id_in_attributes() {
        let pool = pool().await;
        let params = QueryParams::from_pairs(&[("fields[item]", "name"), ("sort", "name")]);
        let f = fields();

        let doc = FetchQuery::new(&SCHEMA, TABLE, &f, 100, &params)
            .fetch_many(&pool)
            .await
            .unwrap();

        let value = json(&doc);
        assert_eq!(value["data"].as_array().unwrap().len(), 4);
        assert_eq!(
            value["data"][0],
            json!({"type": "item", "id": "1", "attributes": {"name": "alpha", "id": "1"}})
        );
        assert_eq!(names(&doc), vec!["alpha", "beta", "delta", "gamma"]);
    }

    #[actix_rt::test]
    async fn test_fetch_many_paginates() {
        let pool = pool().await;
        let params = QueryParams::from_pairs(&[("sort", "-likes"), ("page[size]", "2"), ("page[number]", "2")]);
        let f = fields();

        let doc = FetchQuery::new(&SCHEMA, TABLE, &f, 100, &params)
            .fetch_many(&pool)
            .await
            .unwrap();

        assert_eq!(names(&doc), vec!["alpha", "gamma"]);
    }

    #[actix_rt::test]
    async fn test_fetch_many_past_the_end_is_empty() {
        let pool = pool().await;
        let params = QueryParams::from_pairs(&[("page[size]", "2"), ("page[number]", "50")]);
        let f = fields();

        let doc = FetchQuery::new(&SCHEMA, TABLE, &f, 100, &params)
            .fetch_many(&pool)
            .await
            .unwrap();

        assert!(doc.is_empty());
        assert_eq!(json(&doc), json!({"data": []}));
    }

    #[actix_rt::test]
    async fn test_fetch_many_without_pagination_ignores_max() {
        let pool = pool().await;
        let params = QueryParams::default();
        let f = fields();

        let doc = FetchQuery::new(&SCHEMA, TABLE, &f, 1, &params)
            .without_pagination()
            .fetch_many(&pool)
            .await
            .unwrap();

        assert_eq!(doc.resources().len(), 4);
    }

    #[actix_rt::test]
    async fn test_fetch_one_with_args_and_nested() {
        let pool = pool().await;
        let params = QueryParams::from_pairs(&[("fields[item]", "owner")]);
        let f = fields();

        let doc = FetchQuery::new(&SCHEMA, TABLE, &f, 100, &params)
            .filter("i.id = ?", vec![QueryArg::integer(2)])
            .nested(owner())
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(
            json(&doc),
            json!({"data": {"type": "item", "id": "2", "attributes": {
                "owner_id": 2, "owner_name": "User 2", "id": "2"
            }}})
        );
    }

    #[actix_rt::test]
    async fn test_fetch_one_not_found() {
        let pool = pool().await;
        let params = QueryParams::default();
        let f = fields();
        let calls = AtomicUsize::new(0);

        let doc = FetchQuery::new(&SCHEMA, TABLE, &f, 100, &params)
            .filter("i.id = ?", vec![QueryArg::integer(99)])
            .enricher(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .fetch_one(&pool)
            .await
            .unwrap();

        assert!(doc.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[actix_rt::test]
    async fn test_enricher_runs_per_row() {
        let pool = pool().await;
        let params = QueryParams::default();
        let f = fields();
        let calls = AtomicUsize::new(0);

        let doc = FetchQuery::new(&SCHEMA, TABLE, &f, 100, &params)
            .enricher(|record| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(Value::String(name)) = record.get_mut("name") {
                    *name = name.to_uppercase();
                }
            })
            .fetch_many(&pool)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(names(&doc).iter().all(|n| n.chars().all(|c| c.is_ascii_uppercase())));
    }

    #[actix_rt::test]
    async fn test_invalid_input_fails_before_database() {
        let pool = pool().await;
        let params = QueryParams::from_pairs(&[("page[size]", "1000")]);
        let f = fields();

        // The table does not exist, a database round trip would fail differently
        let err = FetchQuery::new(&SCHEMA, "missing_table", &f, 100, &params)
            .fetch_many(&pool)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Query(QueryError::InvalidPageSize(ref v)) if v == "1000"));
    }

    #[actix_rt::test]
    async fn test_database_error_propagates() {
        let pool = pool().await;
        let params = QueryParams::default();
        let f = fields();

        let err = FetchQuery::new(&SCHEMA, "missing_table", &f, 100, &params)
            .fetch_many(&pool)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::DatabaseError(_)));
        // The connection went back to the pool
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
