use chrono::NaiveDate;
use wxc_core::{MonthLabel, ObservationRow, StationId};
use wxc_db::{tables, LeaderboardEntry, MemoryStore, MonthlyWinner, WeatherStore};
use wxc_jobs::reset;

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for (id, station) in ["KATL", "KORD"].iter().enumerate() {
        store
            .add_prediction(serde_json::json!({"id": id + 1, "station_id": station}))
            .await;
        store
            .upsert_observation(&ObservationRow {
                station_id: StationId::new(station).unwrap(),
                date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
                temp: Some(4.0),
                wind_speed: Some(10.0),
                wind_dir: Some(45.0),
                precip: 0.0,
            })
            .await
            .unwrap();
    }
    store
}

#[tokio::test]
async fn archives_leaderboard_winner() {
    let store = seeded_store().await;
    store
        .set_leaderboard(vec![LeaderboardEntry {
            user_id: "u1".into(),
            username: Some("alice".into()),
            grand_avg: Some(2.5),
        }])
        .await;

    let label = MonthLabel::custom("Dec-2025");
    let close = reset::run(&store, &label).await.unwrap();

    let expected = MonthlyWinner {
        user_id: "u1".into(),
        username: Some("alice".into()),
        score: Some(2.5),
        month_year: label,
    };
    assert_eq!(close.winner, Some(expected.clone()));
    assert_eq!(store.winners().await, vec![expected]);
}

#[tokio::test]
async fn picks_lowest_grand_average() {
    let store = seeded_store().await;
    store
        .set_leaderboard(vec![
            LeaderboardEntry {
                user_id: "u2".into(),
                username: Some("bob".into()),
                grand_avg: Some(6.75),
            },
            LeaderboardEntry {
                user_id: "u3".into(),
                username: Some("carol".into()),
                grand_avg: Some(1.25),
            },
        ])
        .await;

    let close = reset::run(&store, &MonthLabel::custom("Jan-2026"))
        .await
        .unwrap();

    assert_eq!(close.winner.and_then(|w| w.username), Some("carol".to_string()));
}

#[tokio::test]
async fn empty_leaderboard_still_wipes_tables() {
    let store = seeded_store().await;

    let close = reset::run(&store, &MonthLabel::custom("Dec-2025"))
        .await
        .unwrap();

    assert_eq!(close.winner, None);
    assert!(store.winners().await.is_empty());
    assert_eq!(
        store.delete_calls().await,
        vec![tables::PREDICTIONS, tables::ACTUAL_WEATHER]
    );
    assert_eq!(close.predictions_deleted, 2);
    assert_eq!(close.observations_deleted, 2);
}

#[tokio::test]
async fn working_tables_are_empty_after_reset() {
    let store = seeded_store().await;
    store
        .set_leaderboard(vec![LeaderboardEntry {
            user_id: "u1".into(),
            username: Some("alice".into()),
            grand_avg: Some(2.5),
        }])
        .await;

    reset::run(&store, &MonthLabel::custom("Dec-2025"))
        .await
        .unwrap();

    assert_eq!(store.prediction_count().await, 0);
    assert!(store.observations().await.is_empty());
}

#[tokio::test]
async fn second_reset_deletes_nothing() {
    let store = seeded_store().await;

    reset::run(&store, &MonthLabel::custom("Dec-2025"))
        .await
        .unwrap();
    let again = reset::run(&store, &MonthLabel::custom("Dec-2025"))
        .await
        .unwrap();

    assert_eq!(again.winner, None);
    assert_eq!(again.predictions_deleted, 0);
    assert_eq!(again.observations_deleted, 0);
}
