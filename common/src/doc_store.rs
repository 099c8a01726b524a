use anyhow::Result;
use anyhow::bail;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::Pool;
use sqlx::Postgres;
use sqlx::Row;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use std::env;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub name: String,
    pub port: u16,
    pub host: String,
    pub user: String,
}

pub async fn startup_store(config: &DatabaseConfig) -> DocStore {
    match DocStore::new(config).await {
        Err(val) => {
            info!("Document store startup error: {val}");
            std::process::exit(1);
        }
        Ok(val) => val,
    }
}

/// Statements for the collection tables. Every collection is a table of
/// `(local_id UUID, doc JSONB)`; equality filters address document
/// fields through `doc->>'field'`.
#[derive(Debug)]
pub struct DocQueryBuilder;

impl DocQueryBuilder {
    pub fn prepare_fetch_statement(collection: &str, filters: &[&str]) -> String {
        if filters.is_empty() {
            return format!("SELECT local_id, doc FROM {collection}");
        }

        let placeholders: String = (1..=filters.len())
            .map(|i| format!("doc->>'{}' = ${}", filters[i - 1], i))
            .collect::<Vec<String>>()
            .join(" AND ");

        format!("SELECT local_id, doc FROM {collection} WHERE {placeholders}")
    }

    pub fn prepare_insert_statement(collection: &str) -> String {
        format!("INSERT INTO {collection} (local_id, doc) VALUES ($1, $2)")
    }

    pub fn prepare_update_statement(collection: &str) -> String {
        format!("UPDATE {collection} SET doc = $2 WHERE local_id = $1")
    }

    pub fn prepare_delete_statement(collection: &str) -> String {
        format!("DELETE FROM {collection} WHERE local_id = $1")
    }
}

/// A stored document together with its store-assigned id.
#[derive(Debug, Clone, Serialize)]
pub struct Document<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug)]
pub struct DocStore {
    pub pool: Pool<Postgres>,
}

impl DocStore {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let dbpass =
            env::var("DB_PASSWORD").expect("Failed to read the DB_PASSWORD environment variable.");
        let database_url = format!(
            "postgresql://{}:{}@{}:{}/{}?sslmode=disable",
            config.user, dbpass, config.host, config.port, config.name
        );
        let pool = match PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .test_before_acquire(false)
            .connect(&database_url)
            .await
        {
            Ok(pool) => pool,
            Err(err) => {
                bail!(
                    "Failed to startup store connection pool with url: {} error={}",
                    database_url,
                    err
                );
            }
        };

        Ok(Self { pool })
    }

    pub async fn fetch_all<T>(&self, collection: &str) -> Result<Vec<Document<T>>, sqlx::Error>
    where
        T: DeserializeOwned,
    {
        self.fetch_filtered(collection, &[]).await
    }

    /// Fetch documents matching equality filters on document fields,
    /// e.g. `[("accountId", "ACC-1042")]`.
    pub async fn fetch_filtered<T>(
        &self,
        collection: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<Document<T>>, sqlx::Error>
    where
        T: DeserializeOwned,
    {
        let fields: Vec<&str> = filters.iter().map(|(field, _)| *field).collect();
        let statement = DocQueryBuilder::prepare_fetch_statement(collection, &fields);

        let mut query = sqlx::query(&statement);
        for (_, value) in filters {
            query = query.bind(*value);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                Ok(Document {
                    id: row.try_get("local_id")?,
                    body: row.try_get::<Json<T>, _>("doc")?.0,
                })
            })
            .collect()
    }

    pub async fn insert<T>(&self, collection: &str, body: &T) -> Result<Uuid, sqlx::Error>
    where
        T: Serialize + Sync,
    {
        let id = Uuid::new_v4();
        let statement = DocQueryBuilder::prepare_insert_statement(collection);
        sqlx::query(&statement)
            .bind(id)
            .bind(Json(body))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    /// Replace a document body. Returns false when the id is unknown.
    pub async fn update<T>(&self, collection: &str, id: Uuid, body: &T) -> Result<bool, sqlx::Error>
    where
        T: Serialize + Sync,
    {
        let statement = DocQueryBuilder::prepare_update_statement(collection);
        let result = sqlx::query(&statement)
            .bind(id)
            .bind(Json(body))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, sqlx::Error> {
        let statement = DocQueryBuilder::prepare_delete_statement(collection);
        let result = sqlx::query(&statement).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_statement_whole_collection() {
        let sql = DocQueryBuilder::prepare_fetch_statement("expenses", &Vec::default());
        assert_eq!(sql, "SELECT local_id, doc FROM expenses");
    }

    #[test]
    fn test_fetch_statement_with_doc_filters() {
        let filters = vec!["accountId", "projectId"];
        let sql = DocQueryBuilder::prepare_fetch_statement("expenses", &filters);
        assert_eq!(
            sql,
            "SELECT local_id, doc FROM expenses WHERE doc->>'accountId' = $1 AND doc->>'projectId' = $2"
        );
    }

    #[test]
    fn test_insert_statement() {
        let sql = DocQueryBuilder::prepare_insert_statement("earnings");
        assert_eq!(sql, "INSERT INTO earnings (local_id, doc) VALUES ($1, $2)");
    }

    #[test]
    fn test_update_statement() {
        let sql = DocQueryBuilder::prepare_update_statement("accounts");
        assert_eq!(sql, "UPDATE accounts SET doc = $2 WHERE local_id = $1");
    }

    #[test]
    fn test_delete_statement() {
        let sql = DocQueryBuilder::prepare_delete_statement("clients");
        assert_eq!(sql, "DELETE FROM clients WHERE local_id = $1");
    }
}
