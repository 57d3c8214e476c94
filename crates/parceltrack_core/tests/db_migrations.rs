use parceltrack_core::db::migrations::latest_version;
use parceltrack_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_object_exists(&conn, "table", "parcel");
    assert_object_exists(&conn, "index", "idx_parcel_client");
}

#[test]
fn open_db_enables_foreign_key_enforcement() {
    let conn = open_db_in_memory().unwrap();

    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parceltrack.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_object_exists(&conn_second, "table", "parcel");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaAhead { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rows_survive_reopen_of_file_database() {
    use parceltrack_core::{Parcel, ParcelRepository, SqliteParcelRepository};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parceltrack.db");

    let conn = open_db(&path).unwrap();
    let repo = SqliteParcelRepository::try_new(&conn).unwrap();
    let number = repo.add(&Parcel::new(7, "durable")).unwrap();
    drop(repo);
    drop(conn);

    let conn = open_db(&path).unwrap();
    let repo = SqliteParcelRepository::try_new(&conn).unwrap();
    let stored = repo.get(number).unwrap();
    assert_eq!(stored.client, 7);
    assert_eq!(stored.address, "durable");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_object_exists(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
