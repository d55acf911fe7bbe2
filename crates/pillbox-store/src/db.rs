use rusqlite::{Connection, Result};

/// Initialise all tables for the plan store. Safe to call on every startup —
/// CREATE IF NOT EXISTS means it's idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_users_table(conn)?;
    create_pills_table(conn)?;
    create_user_plans_table(conn)?;
    Ok(())
}

fn create_users_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            user_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );",
    )
}

fn create_pills_table(conn: &Connection) -> Result<()> {
    // Shared lookup table across all users; rows are created lazily on first
    // reference and never deleted.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS pills (
            pill_id INTEGER PRIMARY KEY AUTOINCREMENT,
            color   TEXT NOT NULL UNIQUE
        );",
    )
}

fn create_user_plans_table(conn: &Connection) -> Result<()> {
    // quantity has INTEGER affinity but old data may carry text; reads go
    // through a normalising helper. The unique index makes the composite key
    // (user, day, time, pill) hold at most one quantity.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS user_plans (
            user_id     INTEGER NOT NULL,
            day_of_week TEXT    NOT NULL,
            time_day    TEXT    NOT NULL,
            pill_id     INTEGER NOT NULL,
            quantity    INTEGER NOT NULL DEFAULT 0
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_user_plans_slot
            ON user_plans (user_id, day_of_week, time_day, pill_id);",
    )
}
