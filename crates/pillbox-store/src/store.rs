use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::Connection;
use tracing::{info, warn};

use pillbox_core::types::{PillColor, PlanEntry, Weekday};

use crate::{
    db::init_db,
    error::{Result, StoreError},
    types::User,
};

/// Handle over the plan database. Cheap to clone; all clones share one
/// `Connection` behind a mutex, which serialises multi-statement operations
/// like the per-combination edit overwrite.
#[derive(Clone)]
pub struct PlanStore {
    conn: Arc<Mutex<Connection>>,
}

impl PlanStore {
    /// Wrap `conn`, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a new user and return its rowid.
    pub fn create_user(&self, name: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO users (name, created_at) VALUES (?1, ?2)",
            rusqlite::params![name, now],
        )?;
        let user_id = conn.last_insert_rowid();
        info!(user_id, name, "user created");
        Ok(user_id)
    }

    /// Fetch a user by id, or `NotFound`.
    pub fn get_user(&self, user_id: i64) -> Result<User> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT user_id, name, created_at FROM users WHERE user_id = ?1",
            [user_id],
            row_to_user,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound { user_id },
            other => StoreError::Database(other),
        })
    }

    /// All users ordered by registration.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT user_id, name, created_at FROM users ORDER BY user_id")?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Look a user up by display name for the inbound sync path.
    ///
    /// Names are not unique; when several users share one, the earliest
    /// registration wins and the ambiguity is logged so an operator can see
    /// sync requests are racing over it.
    pub fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, name, created_at FROM users WHERE name = ?1 ORDER BY user_id",
        )?;
        let matches = stmt
            .query_map([name], row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        if matches.len() > 1 {
            warn!(name, count = matches.len(), "ambiguous user name in lookup");
        }
        Ok(matches.into_iter().next())
    }

    pub fn update_user_name(&self, user_id: i64, name: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE users SET name = ?1 WHERE user_id = ?2",
            rusqlite::params![name, user_id],
        )?;
        Ok(())
    }

    /// Remove the user row and all of their plan rows. Deleting an unknown id
    /// is a no-op, not an error.
    pub fn delete_user(&self, user_id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM users WHERE user_id = ?1", [user_id])?;
        conn.execute("DELETE FROM user_plans WHERE user_id = ?1", [user_id])?;
        if n > 0 {
            info!(user_id, "user deleted");
        }
        Ok(())
    }

    /// Idempotent upsert-or-fetch for the pill lookup table.
    pub fn ensure_pill_types(&self, colors: &[PillColor]) -> Result<HashMap<PillColor, i64>> {
        let conn = self.conn.lock().unwrap();
        let mut ids = HashMap::with_capacity(colors.len());
        for &color in colors {
            conn.execute(
                "INSERT OR IGNORE INTO pills (color) VALUES (?1)",
                [color.as_str()],
            )?;
            let pill_id: i64 = conn.query_row(
                "SELECT pill_id FROM pills WHERE color = ?1",
                [color.as_str()],
                |row| row.get(0),
            )?;
            ids.insert(color, pill_id);
        }
        Ok(ids)
    }

    /// Create-path write: one row per entry with a non-zero quantity.
    ///
    /// Zero entries are skipped here but still zeroed by
    /// [`overwrite_plan_entries`](Self::overwrite_plan_entries) on edit; the
    /// asymmetry is deliberate and load-bearing for the device payloads.
    pub fn insert_plan_entries(&self, user_id: i64, entries: &[PlanEntry]) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "INSERT INTO user_plans (user_id, day_of_week, time_day, pill_id, quantity)
             VALUES (?1, ?2, ?3, (SELECT pill_id FROM pills WHERE color = ?4), ?5)
             ON CONFLICT (user_id, day_of_week, time_day, pill_id)
             DO UPDATE SET quantity = excluded.quantity",
        )?;
        let mut written = 0u32;
        for entry in entries.iter().filter(|e| e.quantity > 0) {
            stmt.execute(rusqlite::params![
                user_id,
                entry.day.as_str(),
                entry.time,
                entry.color.as_str(),
                entry.quantity,
            ])?;
            written += 1;
        }
        info!(user_id, rows = written, "plan entries inserted");
        Ok(())
    }

    /// Edit-path write: an UPDATE for every supplied combination, zeroes
    /// included. Combinations that never had a row stay absent (UPDATE of a
    /// missing row is a no-op), matching the create-path sparseness.
    pub fn overwrite_plan_entries(&self, user_id: i64, entries: &[PlanEntry]) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "UPDATE user_plans SET quantity = ?1
             WHERE user_id = ?2 AND day_of_week = ?3 AND time_day = ?4
               AND pill_id = (SELECT pill_id FROM pills WHERE color = ?5)",
        )?;
        for entry in entries {
            stmt.execute(rusqlite::params![
                entry.quantity,
                user_id,
                entry.day.as_str(),
                entry.time,
                entry.color.as_str(),
            ])?;
        }
        info!(user_id, "plan entries overwritten");
        Ok(())
    }

    /// All plan rows for a user joined with the pill color, optionally
    /// filtered to one day. Rows with a day or color the enums don't know are
    /// skipped with a warning rather than failing the whole query.
    pub fn plan_entries(&self, user_id: i64, day: Option<Weekday>) -> Result<Vec<PlanEntry>> {
        let conn = self.conn.lock().unwrap();
        let sql = "SELECT user_plans.day_of_week, user_plans.time_day, pills.color,
                          user_plans.quantity
                   FROM user_plans
                   JOIN pills ON user_plans.pill_id = pills.pill_id
                   WHERE user_plans.user_id = ?1";

        let rows: Vec<(String, String, String, u32)> = match day {
            Some(day) => {
                let mut stmt =
                    conn.prepare_cached(&format!("{sql} AND user_plans.day_of_week = ?2"))?;
                let rows = stmt
                    .query_map(rusqlite::params![user_id, day.as_str()], row_to_raw_plan)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare_cached(sql)?;
                let rows = stmt
                    .query_map([user_id], row_to_raw_plan)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };

        let entries = rows
            .into_iter()
            .filter_map(|(day_str, time, color_str, quantity)| {
                let day: Weekday = match day_str.parse() {
                    Ok(d) => d,
                    Err(_) => {
                        warn!(user_id, day = %day_str, "skipping plan row with unknown day");
                        return None;
                    }
                };
                let color: PillColor = match color_str.parse() {
                    Ok(c) => c,
                    Err(_) => {
                        warn!(user_id, color = %color_str, "skipping plan row with unknown color");
                        return None;
                    }
                };
                Some(PlanEntry {
                    day,
                    time,
                    color,
                    quantity,
                })
            })
            .collect();
        Ok(entries)
    }
}

/// Map a SELECT row (user_id, name, created_at) to a User. Centralised so
/// every user query in this crate stays consistent.
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Map a plan SELECT row, normalising the loosely typed quantity column.
fn row_to_raw_plan(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, u32)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        read_quantity(row, 3)?,
    ))
}

/// Quantities were historically written as text or number interchangeably;
/// normalise either representation to a non-negative integer.
fn read_quantity(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u32> {
    use rusqlite::types::ValueRef;
    let value = match row.get_ref(idx)? {
        ValueRef::Integer(n) => n.max(0) as u32,
        ValueRef::Real(f) => f.max(0.0) as u32,
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0),
        _ => 0,
    };
    Ok(value)
}
