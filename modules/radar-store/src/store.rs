//! SQLite-backed persistence for venues and their signals.
//!
//! Deduplication lives in the schema, not in application code: the
//! `venues.place_ref` and `signals(venue_id, content)` unique
//! constraints are the authority, and writers use `ON CONFLICT DO
//! NOTHING` so that concurrent scans of the same venue converge on a
//! single row instead of failing.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use radar_common::{
    NewVenue, RadarError, Region, Result, ScoreUpdate, Signal, SignalSource, Venue,
};

pub struct RadarStore {
    pool: SqlitePool,
}

impl RadarStore {
    /// Open the database at `url`, creating and migrating it if needed.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        // `:memory:` needs a single connection that never closes; a
        // second connection would see a different, empty database.
        let in_memory = url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.max_connections(5);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(db_err)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(db_err)?;

        tracing::debug!(url, "Venue database ready");
        Ok(Self { pool })
    }

    /// Fetch the venue for `place_ref`, inserting it first if this is
    /// the first time the place has been seen. Score fields start at
    /// their schema defaults and are only touched by
    /// [`update_venue_scores`](Self::update_venue_scores).
    pub async fn get_or_create_venue(&self, defaults: &NewVenue) -> Result<Venue> {
        sqlx::query(
            r#"
            INSERT INTO venues (id, place_ref, name, city, region, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(place_ref) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&defaults.place_ref)
        .bind(&defaults.name)
        .bind(&defaults.city)
        .bind(defaults.region.as_str())
        .bind(&defaults.address)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let row = sqlx::query_as::<_, VenueRow>("SELECT * FROM venues WHERE place_ref = ?1")
            .bind(&defaults.place_ref)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        row.into_venue()
    }

    pub async fn find_venue_by_place_ref(&self, place_ref: &str) -> Result<Option<Venue>> {
        let row = sqlx::query_as::<_, VenueRow>("SELECT * FROM venues WHERE place_ref = ?1")
            .bind(place_ref)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(VenueRow::into_venue).transpose()
    }

    /// Substring match on the venue name, used to decide whether an
    /// on-demand scan request is already covered. LIKE metacharacters
    /// in the needle match themselves, not arbitrary text.
    pub async fn find_venue_by_name(&self, needle: &str) -> Result<Option<Venue>> {
        let row = sqlx::query_as::<_, VenueRow>(
            r"SELECT * FROM venues WHERE name LIKE '%' || ?1 || '%' ESCAPE '\' LIMIT 1",
        )
        .bind(escape_like(needle))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(VenueRow::into_venue).transpose()
    }

    /// Store a signal unless the venue already holds one with the same
    /// text. Returns whether a row was actually written.
    pub async fn insert_signal(&self, signal: &Signal) -> Result<bool> {
        let outcome = sqlx::query(
            r#"
            INSERT INTO signals (id, venue_id, source, content, url, sentiment, weight, published_at, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(venue_id, content) DO NOTHING
            "#,
        )
        .bind(signal.id.to_string())
        .bind(signal.venue_id.to_string())
        .bind(signal.source.to_string())
        .bind(&signal.content)
        .bind(&signal.url)
        .bind(signal.sentiment)
        .bind(signal.weight)
        .bind(signal.published_at)
        .bind(signal.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(outcome.rows_affected() > 0)
    }

    pub async fn find_signal(&self, venue_id: Uuid, content: &str) -> Result<Option<Signal>> {
        let row = sqlx::query_as::<_, SignalRow>(
            "SELECT * FROM signals WHERE venue_id = ?1 AND content = ?2",
        )
        .bind(venue_id.to_string())
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(SignalRow::into_signal).transpose()
    }

    /// All stored signals for a venue, newest first. Score recomputes
    /// read the full history so that decay weights frozen at insertion
    /// keep contributing.
    pub async fn signals_for_venue(&self, venue_id: Uuid) -> Result<Vec<Signal>> {
        let rows = sqlx::query_as::<_, SignalRow>(
            "SELECT * FROM signals WHERE venue_id = ?1 ORDER BY published_at DESC",
        )
        .bind(venue_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(SignalRow::into_signal).collect()
    }

    /// Overwrite the derived score fields in one shot.
    pub async fn update_venue_scores(&self, venue_id: Uuid, update: &ScoreUpdate) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE venues
            SET net_sentiment = ?2,
                composite_score = ?3,
                signal_count = ?4,
                anchor_rating = ?5,
                anchor_rating_count = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(venue_id.to_string())
        .bind(update.net_sentiment)
        .bind(update.composite_score)
        .bind(update.signal_count)
        .bind(update.anchor_rating)
        .bind(update.anchor_rating_count)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Venues ordered by composite score, optionally narrowed to one
    /// region.
    pub async fn ranked_venues(&self, region: Option<Region>, limit: i64) -> Result<Vec<Venue>> {
        let rows = match region {
            Some(region) => {
                sqlx::query_as::<_, VenueRow>(
                    "SELECT * FROM venues WHERE region = ?1 ORDER BY composite_score DESC LIMIT ?2",
                )
                .bind(region.as_str())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, VenueRow>(
                    "SELECT * FROM venues ORDER BY composite_score DESC LIMIT ?1",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;
        rows.into_iter().map(VenueRow::into_venue).collect()
    }

    pub async fn list_venues(&self, limit: i64, offset: i64) -> Result<Vec<Venue>> {
        let rows = sqlx::query_as::<_, VenueRow>(
            "SELECT * FROM venues ORDER BY created_at, id LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(VenueRow::into_venue).collect()
    }

    /// Maintenance path. The ingestion pipeline only ever adds and
    /// rescores; removal is a manual act.
    pub async fn delete_venue(&self, venue_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM venues WHERE id = ?1")
            .bind(venue_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    pub async fn signal_count(&self, venue_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM signals WHERE venue_id = ?1")
            .bind(venue_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }
}

fn db_err(e: impl std::fmt::Display) -> RadarError {
    RadarError::Database(e.to_string())
}

/// `%` and `_` are wildcards inside a LIKE pattern; scan queries carry
/// raw user text, so both must be neutralized before interpolation.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_")
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| RadarError::Database(format!("Bad row id '{raw}': {e}")))
}

#[derive(Debug, sqlx::FromRow)]
struct VenueRow {
    id: String,
    place_ref: String,
    name: String,
    city: String,
    region: String,
    address: Option<String>,
    anchor_rating: Option<f64>,
    anchor_rating_count: i64,
    composite_score: f64,
    net_sentiment: f64,
    signal_count: i64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl VenueRow {
    fn into_venue(self) -> Result<Venue> {
        Ok(Venue {
            id: parse_id(&self.id)?,
            place_ref: self.place_ref,
            name: self.name,
            city: self.city,
            // Rows are only ever written through Region::as_str, so an
            // unknown value means a hand-edited database.
            region: Region::from_str_loose(&self.region).unwrap_or(Region::Center),
            address: self.address,
            anchor_rating: self.anchor_rating,
            anchor_rating_count: self.anchor_rating_count,
            composite_score: self.composite_score,
            net_sentiment: self.net_sentiment,
            signal_count: self.signal_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SignalRow {
    id: String,
    venue_id: String,
    source: String,
    content: String,
    url: Option<String>,
    sentiment: f64,
    weight: f64,
    published_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl SignalRow {
    fn into_signal(self) -> Result<Signal> {
        Ok(Signal {
            id: parse_id(&self.id)?,
            venue_id: parse_id(&self.venue_id)?,
            source: SignalSource::from_str_loose(&self.source),
            content: self.content,
            url: self.url,
            sentiment: self.sentiment,
            weight: self.weight,
            published_at: self.published_at,
            created_at: self.created_at,
        })
    }
}
