use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use chrono::NaiveDate;
use dreamloop_core::{
    Category, ContentRecord, Coordinates, NewContentRecord, Profile, WeatherSnapshot,
};
use dreamloop_daily::{
    Collaborators, ContentStore, DeviceDirectory, ProfileSource, PushTransport, TextGenerator,
    WeatherSource,
};
use dreamloop_db::DbError;
use dreamloop_generator::{GeneratedContent, GenerationInput};
use dreamloop_push::{PushMessage, PushTicket};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use super::*;

/// In-memory stand-in for every collaborator the orchestrator needs.
#[derive(Default)]
struct Stub {
    profiles: Vec<Profile>,
    unavailable: bool,
    listed: AtomicUsize,
    records: Mutex<HashMap<(Uuid, NaiveDate), ContentRecord>>,
}

#[async_trait]
impl ProfileSource for Stub {
    async fn list_eligible(&self) -> Result<Vec<Profile>, DailyError> {
        self.listed.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(DailyError::Db(DbError::Sqlx(sqlx::Error::PoolTimedOut)));
        }
        Ok(self.profiles.clone())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>, DailyError> {
        Ok(self.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }
}

#[async_trait]
impl ContentStore for Stub {
    async fn find(
        &self,
        user_id: Uuid,
        day: NaiveDate,
    ) -> Result<Option<ContentRecord>, DailyError> {
        Ok(self.records.lock().unwrap().get(&(user_id, day)).cloned())
    }

    async fn upsert(&self, record: &NewContentRecord) -> Result<ContentRecord, DailyError> {
        let mut records = self.records.lock().unwrap();
        let stored = records
            .entry((record.user_id, record.for_date))
            .or_insert_with(|| ContentRecord {
                id: 1,
                user_id: record.user_id,
                for_date: record.for_date,
                lines: record.lines.clone(),
                category: record.category,
                visual_theme: record.visual_theme.clone(),
                weather: record.weather.clone(),
                card_image_url: None,
                model: record.model.clone(),
                prompt_version: record.prompt_version,
                created_at: Utc::now(),
            });
        Ok(stored.clone())
    }
}

#[async_trait]
impl TextGenerator for Stub {
    fn model_id(&self) -> &str {
        "stub/model"
    }

    async fn generate(&self, _input: &GenerationInput) -> Result<GeneratedContent, DailyError> {
        Ok(GeneratedContent {
            lines: vec!["Breathe in.".to_string(), "Begin again.".to_string()],
            category: Category::Calm,
            visual_theme: "soft dawn".to_string(),
        })
    }
}

#[async_trait]
impl WeatherSource for Stub {
    async fn current(
        &self,
        _coordinates: Option<Coordinates>,
        _timezone: &str,
    ) -> Option<WeatherSnapshot> {
        None
    }
}

#[async_trait]
impl DeviceDirectory for Stub {
    async fn device_tokens(&self, _user_id: Uuid) -> Result<Vec<String>, DailyError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl PushTransport for Stub {
    async fn send_batch(&self, _messages: &[PushMessage]) -> Result<Vec<PushTicket>, DailyError> {
        Ok(Vec::new())
    }
}

fn profile() -> Profile {
    Profile {
        user_id: Uuid::new_v4(),
        goals: Vec::new(),
        tone: None,
        language: None,
        timezone: Some("UTC".to_string()),
        coordinates: None,
        daily_time_local: Some("00:00".to_string()),
        wants_push: true,
        is_paused: false,
    }
}

fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("postgres://dreamloop@127.0.0.1:1/dreamloop")
        .expect("lazy pool")
}

fn app_with(stub: Arc<Stub>, auth: AuthState, dev_routes: bool) -> Router {
    let orchestrator = DailyOrchestrator::new(Collaborators {
        profiles: stub.clone(),
        content: stub.clone(),
        generator: stub.clone(),
        weather: stub.clone(),
        devices: stub.clone(),
        push: stub,
    });
    let state = AppState {
        pool: unreachable_pool(),
        orchestrator: Arc::new(orchestrator),
    };
    build_app(state, auth, dev_routes)
}

fn open_auth() -> AuthState {
    AuthState::from_secret(None, true).expect("auth")
}

fn post(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("not_found", StatusCode::NOT_FOUND),
        ("bad_request", StatusCode::BAD_REQUEST),
        ("unauthorized", StatusCode::UNAUTHORIZED),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "x").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[tokio::test]
async fn cron_rejects_missing_or_wrong_token_before_any_work() {
    let stub = Arc::new(Stub::default());
    let auth = AuthState::from_secret(Some("cron-secret"), false).expect("auth");
    let app = app_with(stub.clone(), auth, false);

    let missing = app
        .clone()
        .oneshot(post("/api/v1/cron/daily", None))
        .await
        .expect("response");
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(missing).await["error"]["code"], "unauthorized");

    let wrong = app
        .oneshot(post("/api/v1/cron/daily", Some("guess")))
        .await
        .expect("response");
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(stub.listed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejected_callers_cannot_lock_out_the_trigger() {
    let stub = Arc::new(Stub {
        profiles: vec![profile()],
        ..Stub::default()
    });
    let auth = AuthState::from_secret(Some("cron-secret"), false).expect("auth");
    let app = app_with(stub.clone(), auth, false);

    for _ in 0..150 {
        let rejected = app
            .clone()
            .oneshot(post("/api/v1/cron/daily", Some("wrong")))
            .await
            .expect("response");
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
    }

    let authorized = app
        .oneshot(post("/api/v1/cron/daily", Some("cron-secret")))
        .await
        .expect("response");
    assert_eq!(authorized.status(), StatusCode::OK);
    assert_eq!(stub.listed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cron_runs_the_pass_and_reports_totals() {
    let stub = Arc::new(Stub {
        profiles: vec![profile()],
        ..Stub::default()
    });
    let auth = AuthState::from_secret(Some("cron-secret"), false).expect("auth");
    let app = app_with(stub, auth, false);

    let response = app
        .oneshot(post("/api/v1/cron/daily", Some("cron-secret")))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["results"][0]["status"], "sent");
    assert_eq!(json["data"]["results"][0]["sent"], 0);
    assert_eq!(json["data"]["totals"]["users"], 1);
    assert_eq!(json["data"]["totals"]["sent"], 1);
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn cron_returns_500_when_profiles_cannot_be_loaded() {
    let stub = Arc::new(Stub {
        unavailable: true,
        ..Stub::default()
    });
    let app = app_with(stub, open_auth(), false);

    let response = app
        .oneshot(post("/api/v1/cron/daily", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"]["code"], "internal_error");
}

#[tokio::test]
async fn dev_routes_are_not_mounted_outside_development() {
    let app = app_with(Arc::new(Stub::default()), open_auth(), false);

    let response = app
        .oneshot(post(
            &format!("/api/v1/dev/generate-today?user_id={}", Uuid::new_v4()),
            None,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dev_generate_today_validates_user_id() {
    let app = app_with(Arc::new(Stub::default()), open_auth(), true);

    let missing = app
        .clone()
        .oneshot(post("/api/v1/dev/generate-today", None))
        .await
        .expect("response");
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let invalid = app
        .clone()
        .oneshot(post("/api/v1/dev/generate-today?user_id=nope", None))
        .await
        .expect("response");
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let unknown = app
        .oneshot(post(
            &format!("/api/v1/dev/generate-today?user_id={}", Uuid::new_v4()),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dev_generate_then_push_today() {
    let user = profile();
    let user_id = user.user_id;
    let stub = Arc::new(Stub {
        profiles: vec![user],
        ..Stub::default()
    });
    let app = app_with(stub, open_auth(), true);

    let push_before = app
        .clone()
        .oneshot(post(
            &format!("/api/v1/dev/push-today?user_id={user_id}"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(push_before.status(), StatusCode::NOT_FOUND);

    let generated = app
        .clone()
        .oneshot(post(
            &format!("/api/v1/dev/generate-today?user_id={user_id}"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(generated.status(), StatusCode::OK);
    let json = json_body(generated).await;
    assert_eq!(json["data"]["lines"][1], "Begin again.");
    assert_eq!(json["data"]["category"], "calm");

    let pushed = app
        .oneshot(post(
            &format!("/api/v1/dev/push-today?user_id={user_id}"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(pushed.status(), StatusCode::OK);
    assert_eq!(json_body(pushed).await["data"]["sent"], 0);
}

#[tokio::test]
async fn health_reports_degraded_without_a_database() {
    let app = app_with(Arc::new(Stub::default()), open_auth(), false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["data"]["database"], "unavailable");
}
