use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{AggregateStats, SingleMatchStats};

/// Largest window FACEIT serves in one page.
pub const MAX_WINDOW: u32 = 100;

#[derive(Debug, Serialize)]
pub struct EloResponse {
    pub elo: u32,
}

#[derive(Debug, Deserialize)]
pub struct WindowParams {
    pub size: Option<u32>,
}

pub async fn elo(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<EloResponse>, ApiError> {
    let elo = state.stats.player_elo(&username).await?;
    Ok(Json(EloResponse { elo }))
}

pub async fn last_window(
    State(state): State<AppState>,
    Path(username): Path<String>,
    params: Result<Query<WindowParams>, QueryRejection>,
) -> Result<Json<AggregateStats>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let size = params
        .size
        .unwrap_or(state.stats.config().default_window);
    if size > MAX_WINDOW {
        return Err(ApiError::BadRequest(format!(
            "size must be at most {}",
            MAX_WINDOW
        )));
    }

    let player_id = state.stats.resolve_player_id(&username).await?;
    let stats = state.stats.window_stats(&player_id, size).await?;
    Ok(Json(stats))
}

pub async fn last_game(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<SingleMatchStats>, ApiError> {
    let player_id = state.stats.resolve_player_id(&username).await?;
    let stats = state.stats.last_match(&player_id).await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::{EngineConfig, TrackerConfig};
    use crate::engine::StatsService;
    use crate::fetch::MockStatSource;
    use crate::models::{GameProfile, MatchStatRecord, PlayerProfile};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn make_player(nickname: &str, elo: u32) -> PlayerProfile {
        PlayerProfile {
            player_id: format!("{}-id", nickname),
            nickname: nickname.to_string(),
            games: [(
                "cs2".to_string(),
                GameProfile {
                    faceit_elo: Some(elo),
                    skill_level: Some(8),
                },
            )]
            .into_iter()
            .collect(),
        }
    }

    fn make_record(kills: &str, deaths: &str, headshots: &str, result: &str) -> MatchStatRecord {
        MatchStatRecord {
            kills: Some(kills.into()),
            deaths: Some(deaths.into()),
            assists: Some("5".into()),
            mvps: Some("3".into()),
            headshots: Some(headshots.into()),
            kd_ratio: Some("2.0".into()),
            kr_ratio: Some("0.8".into()),
            result: Some(result.into()),
            match_id: Some(format!("1-{}", kills)),
        }
    }

    fn setup_test_state(source: MockStatSource) -> AppState {
        AppState {
            stats: StatsService::new(Arc::new(source), EngineConfig::default(), "cs2"),
            tracker: Arc::new(TrackerConfig::default()),
            cors_origin: "*".to_string(),
        }
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_elo() {
        let state = setup_test_state(MockStatSource::new().with_player(make_player("rui", 2011)));
        let (status, json) = get_json(build_router(state), "/api/v1/elo/rui").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["elo"], 2011);
    }

    #[tokio::test]
    async fn test_elo_unknown_player() {
        let state = setup_test_state(MockStatSource::new());
        let (status, json) = get_json(build_router(state), "/api/v1/elo/ghost").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_last20_explicit_size() {
        let state = setup_test_state(
            MockStatSource::new()
                .with_player(make_player("rui", 2011))
                .with_matches(vec![
                    make_record("10", "5", "5", "1"),
                    make_record("20", "10", "0", "0"),
                ]),
        );
        let (status, json) = get_json(build_router(state), "/api/v1/last20/rui?size=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["avgKills"], 15);
        assert_eq!(json["avgDeaths"], 8);
        assert_eq!(json["avgAssists"], 5);
        assert_eq!(json["avgMvps"], 3);
        assert_eq!(json["headshotPercent"], 25.0);
        assert_eq!(json["avgKdRatio"], 2.0);
        assert_eq!(json["avgKrRatio"], 0.8);
        assert_eq!(json["windowSize"], 2);
    }

    #[tokio::test]
    async fn test_last20_default_size() {
        let state = setup_test_state(
            MockStatSource::new()
                .with_player(make_player("rui", 2011))
                .with_matches(vec![make_record("40", "20", "20", "1")]),
        );
        let (status, json) = get_json(build_router(state), "/api/v1/last20/rui").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["windowSize"], 20);
        assert_eq!(json["matchesCounted"], 1);
        assert_eq!(json["avgKills"], 2);
    }

    #[tokio::test]
    async fn test_last20_bad_size() {
        let state = setup_test_state(MockStatSource::new().with_player(make_player("rui", 2011)));
        let app = build_router(state);

        let (status, json) = get_json(app.clone(), "/api/v1/last20/rui?size=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let (status, _) = get_json(app.clone(), "/api/v1/last20/rui?size=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = get_json(app, "/api/v1/last20/rui?size=0").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "NO_DATA");
    }

    #[tokio::test]
    async fn test_last20_upstream_failure() {
        let state = setup_test_state(
            MockStatSource::new()
                .with_player(make_player("rui", 2011))
                .failing_with(500),
        );
        let (status, json) = get_json(build_router(state), "/api/v1/last20/rui").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_last_game() {
        let state = setup_test_state(
            MockStatSource::new()
                .with_player(make_player("rui", 2011))
                .with_matches(vec![
                    make_record("12", "16", "6", "0"),
                    make_record("30", "10", "15", "1"),
                ]),
        );
        let (status, json) = get_json(build_router(state), "/api/v1/lastGame/rui").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["kills"], 12);
        assert_eq!(json["result"], "L");
        assert_eq!(json["headshotPercent"], 50.0);
        assert_eq!(json["matchId"], "1-12");
    }

    #[tokio::test]
    async fn test_last_game_malformed_record() {
        let mut bad = make_record("12", "16", "6", "0");
        bad.kd_ratio = Some("1.2.3".into());
        let state = setup_test_state(
            MockStatSource::new()
                .with_player(make_player("rui", 2011))
                .with_matches(vec![bad]),
        );
        let (status, json) = get_json(build_router(state), "/api/v1/lastGame/rui").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("K/D Ratio"));
    }
}
