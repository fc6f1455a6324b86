//! Postgres integration tests
//!
//! To run these tests:
//! 1. Ensure Postgres is running and accessible
//! 2. Set TEST_DATABASE_URL (e.g. postgres://postgres@localhost/wxc_test)
//! 3. Run: cargo test -p wxc-db --test postgres -- --ignored --test-threads=1
//!
//! The tests create their own tables and drop them first, so point them at
//! a scratch database.

use chrono::NaiveDate;
use wxc_core::{MonthLabel, ObservationRow, StationId};
use wxc_db::{PgStore, WeatherStore};

const SCHEMA: &str = r#"
DROP VIEW IF EXISTS monthly_leaderboard_view;
DROP TABLE IF EXISTS leaderboard_source;
DROP TABLE IF EXISTS monthly_winners;
DROP TABLE IF EXISTS predictions;
DROP TABLE IF EXISTS actual_weather;
CREATE TABLE actual_weather (
    id BIGSERIAL PRIMARY KEY,
    station_id TEXT NOT NULL,
    date DATE NOT NULL DEFAULT CURRENT_DATE,
    temp DOUBLE PRECISION,
    wind_speed DOUBLE PRECISION,
    wind_dir DOUBLE PRECISION,
    precip DOUBLE PRECISION,
    UNIQUE (station_id, date)
);
CREATE TABLE predictions (
    id BIGSERIAL PRIMARY KEY,
    user_id UUID NOT NULL,
    p_high DOUBLE PRECISION
);
CREATE TABLE monthly_winners (
    id BIGSERIAL PRIMARY KEY,
    user_id UUID NOT NULL,
    username TEXT,
    score NUMERIC,
    month_year TEXT NOT NULL
);
CREATE TABLE leaderboard_source (
    user_id UUID NOT NULL,
    username TEXT,
    grand_avg NUMERIC
);
CREATE VIEW monthly_leaderboard_view AS
    SELECT user_id, username, grand_avg FROM leaderboard_source
"#;

async fn setup() -> anyhow::Result<PgStore> {
    let url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/wxc_test".to_string());
    let store = PgStore::connect(&url).await?;

    for statement in SCHEMA.split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement).execute(store.pool()).await?;
        }
    }
    Ok(store)
}

fn row(temp: f64) -> ObservationRow {
    ObservationRow {
        station_id: StationId::new("KATL").unwrap(),
        date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        temp: Some(temp),
        wind_speed: None,
        wind_dir: Some(180.0),
        precip: 0.0,
    }
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_upsert_keeps_one_row_per_station_day() -> anyhow::Result<()> {
    let store = setup().await?;

    store.upsert_observation(&row(10.0)).await?;
    store.upsert_observation(&row(14.5)).await?;

    let (count, temp): (i64, Option<f64>) =
        sqlx::query_as("SELECT COUNT(*), MAX(temp) FROM actual_weather")
            .fetch_one(store.pool())
            .await?;
    assert_eq!(count, 1);
    assert_eq!(temp, Some(14.5));

    store.close().await;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_reset_month_archives_and_wipes() -> anyhow::Result<()> {
    let store = setup().await?;

    sqlx::query(
        "INSERT INTO leaderboard_source VALUES \
         ('00000000-0000-0000-0000-000000000001', 'alice', 2.5), \
         ('00000000-0000-0000-0000-000000000002', 'bob', 4.0)",
    )
    .execute(store.pool())
    .await?;
    sqlx::query("INSERT INTO predictions (user_id, p_high) VALUES ('00000000-0000-0000-0000-000000000002', 70)")
        .execute(store.pool())
        .await?;
    store.upsert_observation(&row(12.0)).await?;

    let close = store.reset_month(&MonthLabel::custom("Dec-2025")).await?;

    let winner = close.winner.expect("winner archived");
    assert_eq!(winner.user_id, "00000000-0000-0000-0000-000000000001");
    assert_eq!(winner.username.as_deref(), Some("alice"));
    assert_eq!(winner.score, Some(2.5));
    assert_eq!(close.predictions_deleted, 1);
    assert_eq!(close.observations_deleted, 1);

    let (winners,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM monthly_winners")
        .fetch_one(store.pool())
        .await?;
    assert_eq!(winners, 1);

    store.close().await;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_failed_reset_rolls_back_winner() -> anyhow::Result<()> {
    let store = setup().await?;

    sqlx::query("INSERT INTO leaderboard_source VALUES ('00000000-0000-0000-0000-000000000001', 'alice', 2.5)")
        .execute(store.pool())
        .await?;
    store.upsert_observation(&row(12.0)).await?;
    sqlx::query("DROP TABLE predictions")
        .execute(store.pool())
        .await?;

    assert!(store.reset_month(&MonthLabel::custom("Dec-2025")).await.is_err());

    let (winners,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM monthly_winners")
        .fetch_one(store.pool())
        .await?;
    assert_eq!(winners, 0);

    store.close().await;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_reset_month_with_text_user_ids() -> anyhow::Result<()> {
    let store = setup().await?;

    for statement in [
        "DROP VIEW monthly_leaderboard_view",
        "ALTER TABLE leaderboard_source ALTER COLUMN user_id TYPE TEXT",
        "ALTER TABLE monthly_winners ALTER COLUMN user_id TYPE TEXT",
        "CREATE VIEW monthly_leaderboard_view AS \
         SELECT user_id, username, grand_avg FROM leaderboard_source",
        "INSERT INTO leaderboard_source VALUES ('u1', 'alice', 2.5)",
    ] {
        sqlx::query(statement).execute(store.pool()).await?;
    }
    store.upsert_observation(&row(12.0)).await?;

    let close = store.reset_month(&MonthLabel::custom("Dec-2025")).await?;

    assert_eq!(close.winner.map(|w| w.user_id), Some("u1".to_string()));
    assert_eq!(close.observations_deleted, 1);

    let (user_id, month_year): (String, String) =
        sqlx::query_as("SELECT user_id, month_year FROM monthly_winners")
            .fetch_one(store.pool())
            .await?;
    assert_eq!(user_id, "u1");
    assert_eq!(month_year, "Dec-2025");

    store.close().await;
    Ok(())
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_reset_month_with_null_username() -> anyhow::Result<()> {
    let store = setup().await?;

    sqlx::query(
        "INSERT INTO leaderboard_source VALUES \
         ('00000000-0000-0000-0000-000000000001', NULL, 2.5), \
         ('00000000-0000-0000-0000-000000000002', 'bob', NULL)",
    )
    .execute(store.pool())
    .await?;
    store.upsert_observation(&row(12.0)).await?;

    let close = store.reset_month(&MonthLabel::custom("Dec-2025")).await?;

    let winner = close.winner.expect("winner archived");
    assert_eq!(winner.user_id, "00000000-0000-0000-0000-000000000001");
    assert_eq!(winner.username, None);
    assert_eq!(winner.score, Some(2.5));
    assert_eq!(close.observations_deleted, 1);

    let (username,): (Option<String>,) = sqlx::query_as("SELECT username FROM monthly_winners")
        .fetch_one(store.pool())
        .await?;
    assert_eq!(username, None);

    store.close().await;
    Ok(())
}
