//! Liveness and usage-stats endpoints

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::routes::{error_response, json_response, ErrorResponse};
use crate::server::AppState;

/// GET /status response: current liveness of both stores
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub redis: bool,
    pub db: bool,
}

/// GET /stats response: document counts in the persistent store
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub users: u64,
    pub files: u64,
}

/// GET /status
///
/// Always 200; the liveness checks themselves cannot fail, only answer false.
pub async fn handle_status(state: &AppState) -> Response<Full<Bytes>> {
    let (redis, db) = tokio::join!(state.kv.is_alive(), state.db.is_alive());

    json_response(StatusCode::OK, &StatusResponse { redis, db })
}

/// GET /stats
///
/// 500 when the persistent store is unreachable, either up front (liveness
/// says no) or when a count fails mid-request.
pub async fn handle_stats(state: &AppState) -> Response<Full<Bytes>> {
    if !state.db.is_alive().await {
        return json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ErrorResponse {
                error: "Database not connected".to_string(),
            },
        );
    }

    match tokio::try_join!(state.db.nb_users(), state.db.nb_files()) {
        Ok((users, files)) => json_response(StatusCode::OK, &StatsResponse { users, files }),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::parts;
    use crate::server::AppState;
    use crate::store::memory::{MemorySessions, MemoryUsers};
    use crate::store::PersistentStore;
    use std::sync::Arc;

    fn state() -> (AppState, Arc<MemoryUsers>, Arc<MemorySessions>) {
        let db = Arc::new(MemoryUsers::new());
        let kv = Arc::new(MemorySessions::new());
        (AppState::for_tests(db.clone(), kv.clone()), db, kv)
    }

    #[tokio::test]
    async fn status_reports_both_stores() {
        let (state, db, kv) = state();

        let (status, body) = parts(handle_status(&state).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "redis": true, "db": true }));

        db.set_alive(false);
        kv.set_alive(false);
        let (status, body) = parts(handle_status(&state).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "redis": false, "db": false }));
    }

    #[tokio::test]
    async fn stats_counts_users_and_files() {
        let (state, db, _kv) = state();
        db.insert_user("a@b.com", "digest-a").await.unwrap();
        db.insert_user("c@d.com", "digest-c").await.unwrap();
        db.set_nb_files(30);

        let (status, body) = parts(handle_stats(&state).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "users": 2, "files": 30 }));
    }

    #[tokio::test]
    async fn stats_is_500_when_db_is_down() {
        let (state, db, _kv) = state();
        db.set_alive(false);

        let (status, body) = parts(handle_stats(&state).await).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database not connected");
    }
}
