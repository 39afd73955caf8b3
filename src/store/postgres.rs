//! PostgreSQL entity store (JSONB documents)

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    types::Json,
    Pool, Postgres, QueryBuilder, Row,
};
use uuid::Uuid;

use super::{
    project, Collection, Direction, Document, EntityStore, Filter, FindOptions, Sort,
};
use crate::{
    config::StoreConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    /// Connect and apply pending migrations
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to run database migrations: {}", e)))?;

        tracing::info!("Database migrations completed");
        Ok(Self { pool })
    }
}

fn row_to_document(row: PgRow) -> AppResult<Document> {
    let id: Uuid = row.try_get("id")?;
    let Json(body): Json<Value> = row.try_get("body")?;
    Ok(Document { id, body })
}

/// Field names are inlined into SQL, so only plain identifiers are accepted.
fn field_name(field: &str) -> AppResult<&str> {
    if !field.is_empty() && field.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        Ok(field)
    } else {
        Err(AppError::Internal(format!("Invalid document field name: {}", field)))
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) -> AppResult<()> {
    match filter {
        Filter::All => {}
        Filter::Eq(field, value) => {
            builder
                .push(format!(" AND body -> '{}' = ", field_name(field)?))
                .push_bind(Json(value.clone()));
        }
        Filter::Contains(field, value) => {
            builder
                .push(format!(" AND body -> '{}' @> ", field_name(field)?))
                .push_bind(Json(Value::Array(vec![value.clone()])));
        }
        Filter::IdIn(ids) => {
            builder.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
        }
    }
    Ok(())
}

/// Order like `MemoryStore`: the collation, then raw code points, then insertion.
fn push_order(builder: &mut QueryBuilder<'_, Postgres>, sort: Option<&Sort>) -> AppResult<()> {
    let Some(sort) = sort else {
        builder.push(" ORDER BY seq");
        return Ok(());
    };
    let field = field_name(sort.field)?;
    let direction = match sort.direction {
        Direction::Ascending => " ASC NULLS FIRST",
        Direction::Descending => " DESC NULLS LAST",
    };
    match sort.collation.icu_name() {
        Some(icu) => {
            builder.push(format!(
                " ORDER BY body ->> '{field}' COLLATE \"{icu}\"{direction}, body ->> '{field}' COLLATE \"C\"{direction}"
            ));
        }
        None => {
            builder.push(format!(" ORDER BY body ->> '{field}' COLLATE \"C\"{direction}"));
        }
    }
    builder.push(", seq");
    Ok(())
}

#[async_trait]
impl EntityStore for PgStore {
    async fn insert(&self, collection: Collection, body: Value) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection.as_str())
            .bind(id)
            .bind(Json(body))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get_by_id(&self, collection: Collection, id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query("SELECT id, body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(row_to_document)
            .transpose()
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> AppResult<Vec<Document>> {
        let mut builder = QueryBuilder::new("SELECT id, body FROM documents WHERE collection = ");
        builder.push_bind(collection.as_str());
        push_filter(&mut builder, filter)?;

        push_order(&mut builder, options.sort.as_ref())?;

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| {
                let doc = row_to_document(row)?;
                Ok(match &options.projection {
                    Some(fields) => Document {
                        id: doc.id,
                        body: project(doc.body, fields),
                    },
                    None => doc,
                })
            })
            .collect()
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
    ) -> AppResult<Option<Document>> {
        sqlx::query(
            r#"
            UPDATE documents SET body = $3, updated_at = now()
            WHERE collection = $1 AND id = $2
            RETURNING id, body
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(body))
        .fetch_optional(&self.pool)
        .await?
        .map(row_to_document)
        .transpose()
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> AppResult<u64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM documents WHERE collection = ");
        builder.push_bind(collection.as_str());
        push_filter(&mut builder, filter)?;
        let count = builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
