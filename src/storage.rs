//! SQLite storage layer for Carbonico.
//!
//! One table, `calculations`, holds every saved footprint. The activities are
//! kept as JSON text in the [`ActivityRecord`] wire format; dates are stored
//! as Unix milliseconds.

use chrono::{DateTime, TimeZone, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};

use crate::model::{ActivityRecord, Calculation, NewCalculation};

/// Per-user aggregate read from storage, before ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAggregate {
    pub username: String,
    pub calculations_count: i64,
    pub average_footprint: f64,
    pub best_footprint: f64,
    pub last_calculation: DateTime<Utc>,
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Create a new storage instance and initialize the schema.
    ///
    /// # Arguments
    ///
    /// * `database_url` - SQLite connection string (e.g., "sqlite:carbonico.db" or "sqlite::memory:")
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Every in-memory connection is its own database, and closing the
        // only connection drops all of its rows
        let options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = options.connect(database_url).await?;

        let storage = Self { pool };
        storage.initialize_schema().await?;

        Ok(storage)
    }

    /// Create the database schema if it doesn't exist.
    async fn initialize_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS calculations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                carbon_footprint REAL NOT NULL,
                date INTEGER NOT NULL,
                activities TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // History and leaderboard queries group and order by user and date
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_calculations_username_date
            ON calculations(username, date)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a calculation and return the stored row.
    pub async fn insert_calculation(
        &self,
        calculation: &NewCalculation,
    ) -> anyhow::Result<Calculation> {
        let activities = serde_json::to_string(&calculation.activities)?;

        let result = sqlx::query(
            r#"
            INSERT INTO calculations (username, carbon_footprint, date, activities)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&calculation.username)
        .bind(calculation.carbon_footprint)
        .bind(calculation.date.timestamp_millis())
        .bind(activities)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            r#"
            SELECT id, username, carbon_footprint, date, activities
            FROM calculations
            WHERE id = ?
            "#,
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await?;

        calculation_from_row(&row)
    }

    /// All calculations, newest first.
    pub async fn list_calculations(&self) -> anyhow::Result<Vec<Calculation>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, carbon_footprint, date, activities
            FROM calculations
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(calculation_from_row).collect()
    }

    /// Calculations of one user, oldest first.
    pub async fn list_user_calculations(&self, username: &str) -> anyhow::Result<Vec<Calculation>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, carbon_footprint, date, activities
            FROM calculations
            WHERE username = ?
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(calculation_from_row).collect()
    }

    /// Per-user aggregates, lowest average footprint first.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of users to return
    pub async fn user_aggregates(&self, limit: u32) -> anyhow::Result<Vec<UserAggregate>> {
        let rows = sqlx::query(
            r#"
            SELECT username,
                   COUNT(*) AS calculations_count,
                   CAST(AVG(carbon_footprint) AS REAL) AS average_footprint,
                   CAST(MIN(carbon_footprint) AS REAL) AS best_footprint,
                   MAX(date) AS last_date
            FROM calculations
            GROUP BY username
            ORDER BY average_footprint ASC, username ASC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> anyhow::Result<UserAggregate> {
                Ok(UserAggregate {
                    username: row.try_get("username")?,
                    calculations_count: row.try_get("calculations_count")?,
                    average_footprint: row.try_get("average_footprint")?,
                    best_footprint: row.try_get("best_footprint")?,
                    last_calculation: millis_to_datetime(row.try_get("last_date")?)?,
                })
            })
            .collect()
    }

    /// Distinct usernames ordered by their latest calculation, newest first.
    pub async fn recent_usernames(&self, limit: u32) -> anyhow::Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT username, MAX(date) AS last_date
            FROM calculations
            GROUP BY username
            ORDER BY last_date DESC, MAX(id) DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| -> anyhow::Result<String> { Ok(r.try_get("username")?) })
            .collect()
    }
}

fn calculation_from_row(row: &SqliteRow) -> anyhow::Result<Calculation> {
    let activities: String = row.try_get("activities")?;
    let activities: ActivityRecord = serde_json::from_str(&activities)?;

    Ok(Calculation {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        carbon_footprint: row.try_get("carbon_footprint")?,
        date: millis_to_datetime(row.try_get("date")?)?,
        activities,
    })
}

fn millis_to_datetime(millis: i64) -> anyhow::Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| anyhow::anyhow!("stored date {millis} is out of range"))
}
