use oxide_dialect::prelude::*;

async fn seeded_db() -> Database {
    let db = Database::connect_with("sqlite::memory:", DatabaseOptions::default().max_connections(1))
        .await
        .expect("Failed to open in-memory SQLite database");

    for sql in [
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, email TEXT)",
        "CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL)",
        "CREATE INDEX idx_users_name ON users (name)",
        "CREATE VIEW active_users AS SELECT id FROM users",
    ] {
        sqlx::query(sql)
            .execute(db.pool())
            .await
            .expect("Failed to seed database");
    }

    db
}

async fn index_exists(db: &Database, index: &str) -> bool {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'index' AND name = ?")
            .bind(index)
            .fetch_optional(db.pool())
            .await
            .unwrap();
    row.is_some()
}

#[tokio::test]
async fn test_selects_sqlite_dialect() {
    let db = seeded_db().await;
    assert_eq!(db.dialect().kind(), DialectKind::Sqlite);
    assert_eq!(db.dialect().resolve_schema_name(&db.scope()).unwrap(), "main");
}

#[tokio::test]
async fn test_has_table() {
    let db = seeded_db().await;

    assert!(db.has_table("users").await.unwrap());
    assert!(db.has_table("orders").await.unwrap());
    assert!(!db.has_table("products").await.unwrap());
    // Views are not tables.
    assert!(!db.has_table("active_users").await.unwrap());
}

#[tokio::test]
async fn test_has_column() {
    let db = seeded_db().await;

    assert!(db.has_column("users", "email").await.unwrap());
    assert!(db.has_column("orders", "user_id").await.unwrap());
    assert!(!db.has_column("users", "phone").await.unwrap());
    assert!(!db.has_column("products", "id").await.unwrap());
}

#[tokio::test]
async fn test_table_created_after_check() {
    let db = seeded_db().await;
    assert!(!db.has_table("products").await.unwrap());

    sqlx::query("CREATE TABLE products (id INTEGER PRIMARY KEY)")
        .execute(db.pool())
        .await
        .unwrap();

    assert!(db.has_table("products").await.unwrap());
}

#[tokio::test]
async fn test_remove_index() {
    let db = seeded_db().await;
    assert!(index_exists(&db, "idx_users_name").await);

    db.remove_index("users", "idx_users_name").await.unwrap();

    assert!(!index_exists(&db, "idx_users_name").await);
}

#[tokio::test]
async fn test_remove_missing_index_fails() {
    let db = seeded_db().await;

    let result = db.remove_index("users", "idx_x").await;
    assert!(matches!(result, Err(DialectError::Database(_))));
}

#[tokio::test]
async fn test_closed_pool_is_an_error() {
    let db = seeded_db().await;
    db.pool().close().await;

    assert!(matches!(
        db.has_table("users").await,
        Err(DialectError::Database(_))
    ));
    assert!(matches!(
        db.has_column("users", "id").await,
        Err(DialectError::Database(_))
    ));
}

#[tokio::test]
async fn test_pool_scope() {
    let db = seeded_db().await;

    let mut scope = db.table("users");
    assert_eq!(scope.table_name(), Some("users"));
    assert_eq!(scope.quoted_table_name().unwrap(), "\"users\"");
    assert_eq!(scope.source(), "sqlite::memory:");

    let placeholder = scope.add_to_vars("Ada");
    assert_eq!(placeholder, "?");
    scope.raw(format!("INSERT INTO users (name) VALUES ({placeholder})"));
    assert_eq!(scope.exec().await.unwrap(), 1);

    let mut count = scope.child();
    assert!(count.vars().is_empty());
    let placeholder = count.add_to_vars("Ada");
    count.raw(format!("SELECT count(*) FROM users WHERE name = {placeholder}"));
    assert_eq!(count.fetch_count().await.unwrap(), 1);

    assert!(matches!(
        db.scope().quoted_table_name(),
        Err(DialectError::MissingTable)
    ));
}

#[tokio::test]
async fn test_unknown_scheme_is_rejected() {
    let result = Database::connect("oracle://scott@localhost/orcl").await;
    assert!(matches!(result, Err(DialectError::UnknownDialect(_))));
}
