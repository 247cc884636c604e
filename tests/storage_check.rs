//! Integration tests for the table-backed existence check.
//!
//! Each test creates its own SQLite database (in memory unless the test is
//! about files) and its own schema through `Database::pool`.

use pretty_assertions::assert_eq;
use textfmt::storage::{Database, DatabaseError, TableCheck};
use textfmt::unique::{make_unique, unique_slug, Condition, ExistenceCheck, UniqueConfig};

async fn media_db() -> Database {
    let db = Database::open(":memory:").await.unwrap();
    sqlx::query(
        r#"
        CREATE TABLE media (
            media_id INTEGER PRIMARY KEY,
            filename TEXT NOT NULL,
            owner_id INTEGER NOT NULL,
            removed_on TEXT
        )
    "#,
    )
    .execute(db.pool())
    .await
    .unwrap();
    db
}

async fn insert_media(db: &Database, filename: &str, owner_id: i64, removed: bool) -> i64 {
    let removed_on = removed.then_some("2024-06-01 12:00:00");
    let result = sqlx::query("INSERT INTO media (filename, owner_id, removed_on) VALUES (?, ?, ?)")
        .bind(filename)
        .bind(owner_id)
        .bind(removed_on)
        .execute(db.pool())
        .await
        .unwrap();
    result.last_insert_rowid()
}

fn media_check(db: Database) -> TableCheck {
    TableCheck::new(db, "media")
        .unwrap()
        .with_id_column("media_id")
        .unwrap()
        .with_deleted_column("removed_on")
        .unwrap()
}

#[tokio::test]
async fn test_filename_resolution_per_owner() {
    let db = media_db().await;
    insert_media(&db, "avatar.png", 1, false).await;
    insert_media(&db, "avatar-2.png", 1, false).await;
    insert_media(&db, "avatar.png", 2, false).await;

    let check = media_check(db);
    let owner_one = UniqueConfig::for_field("filename")
        .with_filename(true)
        .with_condition(Condition::parse("owner_id", "1").unwrap());
    let owner_three = UniqueConfig::for_field("filename")
        .with_filename(true)
        .with_condition(Condition::parse("owner_id", "3").unwrap());

    assert_eq!(
        make_unique("avatar.png", &check, &owner_one).await.unwrap(),
        "avatar-3.png"
    );
    assert_eq!(
        make_unique("avatar.png", &check, &owner_three).await.unwrap(),
        "avatar.png"
    );
}

#[tokio::test]
async fn test_updating_a_row_keeps_its_own_value() {
    let db = media_db().await;
    let id = insert_media(&db, "cover.jpg", 1, false).await;

    let check = media_check(db);
    let config = UniqueConfig::for_field("filename")
        .with_filename(true)
        .with_ignore_id(id);
    assert_eq!(
        make_unique("cover.jpg", &check, &config).await.unwrap(),
        "cover.jpg"
    );
}

#[tokio::test]
async fn test_soft_deleted_rows_free_their_value() {
    let db = media_db().await;
    insert_media(&db, "banner.gif", 1, true).await;

    let check = media_check(db);
    let config = UniqueConfig::for_field("filename").with_filename(true);
    assert_eq!(
        make_unique("banner.gif", &check, &config).await.unwrap(),
        "banner-2.gif"
    );
    assert_eq!(
        make_unique("banner.gif", &check, &config.with_soft_delete(true))
            .await
            .unwrap(),
        "banner.gif"
    );
}

#[tokio::test]
async fn test_condition_operators() {
    let db = media_db().await;
    insert_media(&db, "a.png", 5, false).await;

    let check = media_check(db);
    let cases = [
        ("owner_id=5", true),
        ("owner_id=!=5", false),
        ("owner_id=>4", true),
        ("owner_id=>=6", false),
        ("owner_id=<=5", true),
        ("owner_id=<5", false),
    ];
    for (filter, expected) in cases {
        let condition: Condition = filter.parse().unwrap();
        let config = UniqueConfig::for_field("filename").with_condition(condition);
        assert_eq!(
            check.exists("a.png", &config).await.unwrap(),
            expected,
            "filter {}",
            filter
        );
    }
}

#[tokio::test]
async fn test_unique_slug_against_file_database() {
    let dir = std::env::temp_dir().join("textfmt_storage_test_file");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("posts.db");
    std::fs::remove_file(&path).ok();

    let db = Database::open(path.to_str().unwrap()).await.unwrap();
    sqlx::query("CREATE TABLE posts (id INTEGER PRIMARY KEY, slug TEXT NOT NULL)")
        .execute(db.pool())
        .await
        .unwrap();
    sqlx::query("INSERT INTO posts (slug) VALUES ('release-notes'), ('release-notes-2')")
        .execute(db.pool())
        .await
        .unwrap();

    let check = TableCheck::new(db.clone(), "posts").unwrap();
    let config = UniqueConfig::for_field("slug");
    let slug = unique_slug("Release Notes", &check, &config).await.unwrap();
    assert_eq!(slug, "release-notes-3");

    db.pool().close().await;
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_bad_column_names_rejected() {
    let db = media_db().await;
    assert!(matches!(
        TableCheck::new(db.clone(), "media").unwrap().with_id_column("id--"),
        Err(DatabaseError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        TableCheck::new(db, "media")
            .unwrap()
            .with_deleted_column("removed on"),
        Err(DatabaseError::InvalidIdentifier(_))
    ));
}
