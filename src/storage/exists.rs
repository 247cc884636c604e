use std::future::Future;

use sqlx::QueryBuilder;

use super::schema::Database;
use super::types::DatabaseError;
use crate::unique::{is_identifier, ExistenceCheck, Matcher, UniqueConfig};

/// Existence check against one table of a [`Database`].
///
/// A candidate is taken when some row has `config.field` equal to it, is not
/// the row `config.ignore_id`, is not soft-deleted (with
/// `config.soft_delete`), and satisfies every `config.matching_values` filter.
///
/// Table and column names are spliced into the SQL, so every one of them is
/// checked with [`is_identifier`] and quoted; values are always bound.
#[derive(Clone)]
pub struct TableCheck {
    db: Database,
    table: String,
    id_column: String,
    deleted_column: String,
}

impl TableCheck {
    /// Checks `table`, with `id` and `deleted_at` as the id and soft-delete columns.
    pub fn new(db: Database, table: &str) -> Result<Self, DatabaseError> {
        Ok(Self {
            db,
            table: identifier(table)?.to_string(),
            id_column: "id".to_string(),
            deleted_column: "deleted_at".to_string(),
        })
    }

    pub fn with_id_column(mut self, column: &str) -> Result<Self, DatabaseError> {
        self.id_column = identifier(column)?.to_string();
        Ok(self)
    }

    pub fn with_deleted_column(mut self, column: &str) -> Result<Self, DatabaseError> {
        self.deleted_column = identifier(column)?.to_string();
        Ok(self)
    }

    fn build_query<'a>(
        &self,
        candidate: &'a str,
        config: &'a UniqueConfig,
    ) -> Result<QueryBuilder<'a, sqlx::Sqlite>, DatabaseError> {
        let field = identifier(&config.field)?;

        let mut builder: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("SELECT EXISTS(SELECT 1 FROM ");
        builder
            .push(quoted(&self.table))
            .push(" WHERE ")
            .push(quoted(field))
            .push(" = ")
            .push_bind(candidate);

        if let Some(id) = config.ignore_id {
            builder
                .push(" AND ")
                .push(quoted(&self.id_column))
                .push(" != ")
                .push_bind(id);
        }

        if config.soft_delete {
            builder
                .push(" AND ")
                .push(quoted(&self.deleted_column))
                .push(" IS NULL");
        }

        for condition in &config.matching_values {
            // Conditions validate their column on construction.
            builder.push(" AND ").push(quoted(condition.column()));
            match condition.matcher() {
                Matcher::Compare(op, value) => {
                    builder.push(" ").push(op.as_sql()).push(" ").push_bind(value.as_str());
                }
                Matcher::AnyOf(values) => {
                    builder.push(" IN (");
                    let mut separated = builder.separated(", ");
                    for value in values {
                        separated.push_bind(value.as_str());
                    }
                    separated.push_unseparated(")");
                }
            }
        }

        builder.push(")");
        Ok(builder)
    }
}

impl ExistenceCheck for TableCheck {
    type Error = DatabaseError;

    fn exists(
        &self,
        candidate: &str,
        config: &UniqueConfig,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        async move {
            let mut builder = self.build_query(candidate, config)?;
            let found: i64 = builder
                .build_query_scalar::<i64>()
                .fetch_one(self.db.pool())
                .await
                .map_err(DatabaseError::from_sqlx)?;
            Ok(found != 0)
        }
    }
}

fn identifier(name: &str) -> Result<&str, DatabaseError> {
    if is_identifier(name) {
        Ok(name)
    } else {
        Err(DatabaseError::InvalidIdentifier(name.to_string()))
    }
}

fn quoted(name: &str) -> String {
    format!("\"{}\"", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unique::Condition;

    async fn posts_db() -> Database {
        let db = Database::open(":memory:").await.unwrap();
        sqlx::query(
            r#"
            CREATE TABLE posts (
                id INTEGER PRIMARY KEY,
                slug TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'published',
                views INTEGER NOT NULL DEFAULT 0,
                deleted_at TEXT
            )
        "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        sqlx::query(
            r#"
            INSERT INTO posts (id, slug, status, views, deleted_at) VALUES
                (1, 'hello', 'published', 5, NULL),
                (2, 'draft-post', 'draft', 0, NULL),
                (3, 'removed', 'published', 50, '2024-01-01 00:00:00')
        "#,
        )
        .execute(db.pool())
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_exists_matches_field() {
        let check = TableCheck::new(posts_db().await, "posts").unwrap();
        let config = UniqueConfig::for_field("slug");
        assert!(check.exists("hello", &config).await.unwrap());
        assert!(!check.exists("goodbye", &config).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_ignores_own_row() {
        let check = TableCheck::new(posts_db().await, "posts").unwrap();
        let config = UniqueConfig::for_field("slug").with_ignore_id(1);
        assert!(!check.exists("hello", &config).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_soft_delete() {
        let check = TableCheck::new(posts_db().await, "posts").unwrap();
        let config = UniqueConfig::for_field("slug");
        assert!(check.exists("removed", &config).await.unwrap());
        assert!(!check
            .exists("removed", &config.with_soft_delete(true))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_exists_conditions() {
        let check = TableCheck::new(posts_db().await, "posts").unwrap();

        let drafts = UniqueConfig::for_field("slug")
            .with_condition(Condition::parse("status", "draft").unwrap());
        assert!(check.exists("draft-post", &drafts).await.unwrap());
        assert!(!check.exists("hello", &drafts).await.unwrap());

        let popular = UniqueConfig::for_field("slug")
            .with_condition(Condition::parse("views", ">=10").unwrap());
        assert!(!check.exists("hello", &popular).await.unwrap());
        assert!(check.exists("removed", &popular).await.unwrap());

        let any = UniqueConfig::for_field("slug")
            .with_condition(Condition::any_of("status", ["draft", "archived"]).unwrap());
        assert!(check.exists("draft-post", &any).await.unwrap());
        assert!(!check.exists("hello", &any).await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_bad_identifiers() {
        let db = posts_db().await;
        assert!(matches!(
            TableCheck::new(db.clone(), "posts; DROP TABLE posts"),
            Err(DatabaseError::InvalidIdentifier(_))
        ));

        let check = TableCheck::new(db, "posts").unwrap();
        let result = check.exists("x", &UniqueConfig::for_field("slug\"--")).await;
        assert!(matches!(result, Err(DatabaseError::InvalidIdentifier(_))));
    }

    #[tokio::test]
    async fn test_missing_table_is_database_error() {
        let check = TableCheck::new(posts_db().await, "nope").unwrap();
        let result = check.exists("x", &UniqueConfig::for_field("slug")).await;
        assert!(matches!(result, Err(DatabaseError::Other(_))));
    }

    #[tokio::test]
    async fn test_make_unique_against_table() {
        let db = posts_db().await;
        sqlx::query("INSERT INTO posts (slug) VALUES ('hello-2')")
            .execute(db.pool())
            .await
            .unwrap();

        let check = TableCheck::new(db, "posts").unwrap();
        let config = UniqueConfig::for_field("slug");
        let slug = crate::unique::make_unique("hello", &check, &config).await.unwrap();
        assert_eq!(slug, "hello-3");
    }
}
