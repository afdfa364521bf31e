use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                email           TEXT NOT NULL,
                role            TEXT NOT NULL,
                reward_points   INTEGER NOT NULL DEFAULT 0 CHECK (reward_points >= 0),
                created_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE complaints (
                id                  TEXT PRIMARY KEY,
                user_id             TEXT NOT NULL,
                user_name           TEXT NOT NULL,
                title               TEXT NOT NULL,
                description         TEXT NOT NULL,
                category            TEXT NOT NULL,
                status              TEXT NOT NULL DEFAULT 'open',
                assigned_department TEXT,
                latitude            REAL NOT NULL,
                longitude           REAL NOT NULL,
                address             TEXT NOT NULL DEFAULT '',
                image               TEXT,
                created_at          TEXT NOT NULL
            );

            CREATE INDEX idx_complaints_created
                ON complaints(created_at);

            CREATE TABLE complaint_votes (
                seq             INTEGER PRIMARY KEY AUTOINCREMENT,
                complaint_id    TEXT NOT NULL REFERENCES complaints(id),
                user_id         TEXT NOT NULL,
                UNIQUE(complaint_id, user_id)
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
