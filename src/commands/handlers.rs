use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use super::{AdminClaims, Command, CommandKind, CommandReply, CommandRequest, TokenConfig};
use crate::shared::{AppError, AppState};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/commands", post(post_command))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })
}

fn require_admin(headers: &HeaderMap, tokens: &TokenConfig) -> Result<AdminClaims, AppError> {
    let claims = tokens.validate_token(bearer_token(headers)?)?;
    if !claims.admin {
        warn!(sub = %claims.sub, "Non-admin token used for a privileged command");
        return Err(AppError::Forbidden(format!("{} is not an administrator", claims.sub)));
    }
    Ok(claims)
}

/// POST /commands
///
/// Body: `{"command": "addplayer", "args": ["Name"]}`. Every command except
/// `listplayers` needs an admin bearer token.
#[instrument(name = "post_command", skip_all)]
pub async fn post_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CommandRequest>,
) -> Result<Json<CommandReply>, AppError> {
    info!(command = %request.command, args = request.args.len(), "Command received");
    let kind = CommandKind::parse(&request.command)?;

    if kind.requires_admin() {
        let claims = require_admin(&headers, &state.tokens)?;
        info!(sub = %claims.sub, %kind, "Privileged command authorised");
    }

    let command = Command::from_parts(kind, &request.args)?;
    let reply = state.commands.execute(command).await?;
    Ok(Json(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryEntry;
    use crate::publish::{Destination, InMemoryPublisher};
    use crate::shared::test_utils::AppStateBuilder;
    use crate::tracker::PlayerMatchStats;
    use std::sync::Arc;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt; // for `oneshot`

    async fn call(
        state: AppState,
        body: Value,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method("POST")
            .uri("/commands")
            .header("content-type", "application/json");
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let request = request.body(Body::from(body.to_string())).unwrap();

        let response = routes(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let state = AppStateBuilder::new().build().await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = routes(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_listplayers_needs_no_token() {
        let state = AppStateBuilder::new().with_players(&["Alice"]).build().await;

        let (status, body) = call(state, json!({ "command": "listplayers" }), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["players"], json!(["Alice"]));
    }

    #[tokio::test]
    async fn test_privileged_command_without_token_is_401() {
        let state = AppStateBuilder::new().build().await;

        let (status, body) = call(
            state,
            json!({ "command": "addplayer", "args": ["Bob"] }),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].as_str().unwrap().contains("authorization"));
    }

    #[tokio::test]
    async fn test_non_admin_token_is_403() {
        let state = AppStateBuilder::new().build().await;
        let token = state.tokens.create_token("viewer", false).unwrap();

        let (status, _) = call(
            state,
            json!({ "command": "addplayer", "args": ["Bob"] }),
            Some(&token),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_garbage_token_is_401() {
        let state = AppStateBuilder::new().build().await;

        let (status, _) = call(state, json!({ "command": "weeklynow" }), Some("not-a-jwt")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_add_then_duplicate_is_409() {
        let state = AppStateBuilder::new().with_players(&["Alice"]).build().await;
        let token = state.tokens.create_token("ops", true).unwrap();

        let (status, body) = call(
            state.clone(),
            json!({ "command": "addplayer", "args": ["Bob"] }),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "Now tracking Bob (2 players)");

        let (status, _) = call(
            state,
            json!({ "command": "addplayer", "args": ["bob"] }),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_remove_unknown_player_is_404() {
        let state = AppStateBuilder::new().build().await;
        let token = state.tokens.create_token("ops", true).unwrap();

        let (status, _) = call(
            state,
            json!({ "command": "removeplayer", "args": ["Ghost"] }),
            Some(&token),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_command_is_400() {
        let state = AppStateBuilder::new().build().await;

        let (status, body) = call(state, json!({ "command": "dance" }), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Unknown command"));
    }

    #[tokio::test]
    async fn test_weeklynow_publishes_to_weekly_channel() {
        let publisher = Arc::new(InMemoryPublisher::new());
        let state = AppStateBuilder::new()
            .with_history(vec![HistoryEntry {
                match_id: "m-1".to_string(),
                player_name: "Alice".to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                map: "Tiger_Main".to_string(),
                mode: "duo".to_string(),
                category: "NORMAL".to_string(),
                stats: PlayerMatchStats::default(),
            }])
            .with_publisher(publisher.clone())
            .build()
            .await;
        let token = state.tokens.create_token("ops", true).unwrap();

        let (status, body) = call(state, json!({ "command": "weeklynow" }), Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["published"], 2);
        assert_eq!(publisher.sent_to(Destination::Weekly).await.len(), 2);
    }

    #[tokio::test]
    async fn test_testpost_returns_preview() {
        let state = AppStateBuilder::new().with_players(&["Alice"]).build().await;
        let token = state.tokens.create_token("ops", true).unwrap();

        let (status, body) = call(state, json!({ "command": "testpost" }), Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["published"], 0);
        assert!(body["preview"].as_str().unwrap().contains("Alice"));
    }
}
