//! Route handlers for the REST API.

pub mod chat;
pub mod diary;
pub mod health;
pub mod metrics;
pub mod profile;
pub mod progress;
pub mod wellbeing;

use axum::routing::{get, patch, post};
use axum::Router;
use database::Page;
use serde::Serialize;

use crate::state::AppState;

/// A plain list response.
#[derive(Debug, Serialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

impl<T> PageResponse<T> {
    fn new(found: Page<T>, page: i64, page_size: i64) -> Self {
        Self {
            items: found.items,
            page,
            page_size,
            total: found.total,
        }
    }
}

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    let api = Router::new()
        .route("/health", get(health::health))
        // Profile
        .route("/auth/me", get(profile::me).patch(profile::update_me))
        // Diary
        .route("/diario", get(diary::list).post(diary::create))
        .route(
            "/diario/:id",
            get(diary::get).patch(diary::update).delete(diary::delete),
        )
        // Chat
        .route("/chat/invoke", post(chat::invoke))
        .route(
            "/chat/mensajes",
            get(chat::list_messages).post(chat::create_message),
        )
        .route("/chat/history", get(chat::history))
        .route(
            "/chat/feedback",
            get(chat::list_feedback).post(chat::feedback),
        )
        // Metrics
        .route("/dashboard", get(metrics::dashboard))
        .route(
            "/metricas/periodo",
            get(metrics::get_period).put(metrics::upsert_period),
        )
        .route("/metricas/generar", post(metrics::generate))
        // Wellbeing content
        .route(
            "/consejos/recomendaciones",
            get(wellbeing::list_recommendations).post(wellbeing::create_recommendation),
        )
        .route(
            "/consejos/desafios",
            get(wellbeing::list_challenges).post(wellbeing::create_challenge),
        )
        .route(
            "/consejos/desafios-usuario",
            get(wellbeing::list_user_challenges).post(wellbeing::assign_challenge),
        )
        .route(
            "/consejos/desafios-usuario/:id/completar",
            patch(wellbeing::complete_challenge),
        )
        .route("/progreso", get(progress::progress));

    Router::new()
        .route("/", get(health::banner))
        .nest("/api/v1", api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use database::Database;
    use orchestrator::{Orchestrator, ScriptedBrain};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::testing::StaticVerifier;

    async fn test_app() -> Router {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        let orchestrator = Orchestrator::new(db, Arc::new(ScriptedBrain)).with_persona("Eres Auri.");
        router().with_state(AppState::new(orchestrator, Arc::new(StaticVerifier)))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            request = request.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    const ANA: Option<&str> = Some("Bearer token-ana");
    const LUIS: Option<&str> = Some("Bearer token-luis");

    #[tokio::test]
    async fn test_banner_and_health() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("/api/v1/health"));

        let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["uptime_sec"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_auth_required() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/api/v1/diario", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");

        let (status, _) = send(&app, "GET", "/api/v1/diario", Some("Bearer nope"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_optional_auth_rejects_bad_header() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/api/v1/consejos/desafios", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(body["page"], 1);

        let (status, _) =
            send(&app, "GET", "/api/v1/consejos/desafios", Some("token-ana"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "GET", "/api/v1/consejos/recomendaciones", ANA, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_diary_crud() {
        let app = test_app().await;

        let (status, entry) = send(
            &app,
            "POST",
            "/api/v1/diario",
            ANA,
            Some(json!({"titulo": "Lunes", "contenido": "Hoy me sentí muy feliz"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry["emocion_predominante"], "alegría");
        assert_eq!(entry["categoria_emocional"], "positiva");
        assert_eq!(entry["fuente_modelo"], "heuristic-v1");
        let id = entry["id"].as_i64().unwrap();

        let (status, page) = send(&app, "GET", "/api/v1/diario?page_size=5", ANA, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 1);
        assert_eq!(page["page_size"], 5);

        let uri = format!("/api/v1/diario/{}", id);
        let (status, _) = send(&app, "GET", &uri, LUIS, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, updated) = send(
            &app,
            "PATCH",
            &uri,
            ANA,
            Some(json!({"contenido": "Estoy triste"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["emocion_predominante"], "tristeza");

        let (status, body) = send(&app, "DELETE", &uri, ANA, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);

        let (status, body) = send(&app, "DELETE", &uri, ANA, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn test_bad_input_is_400() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/diario",
            ANA,
            Some(json!({"titulo": "sin contenido"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/diario",
            ANA,
            Some(json!({"contenido": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/v1/diario/abc", ANA, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/v1/diario?page=0", ANA, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_and_feedback() {
        let app = test_app().await;

        let (status, reply) = send(
            &app,
            "POST",
            "/api/v1/chat/invoke",
            ANA,
            Some(json!({"texto": "Hola Auri"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!reply["respuesta"].as_str().unwrap().is_empty());
        assert!(reply["mensaje_usuario_id"].is_i64());
        let assistant_id = reply["mensaje_asistente_id"].as_i64().unwrap();

        let (status, turn) = send(
            &app,
            "POST",
            "/api/v1/chat/mensajes",
            ANA,
            Some(json!({"texto": "Sigo aquí"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(turn["user_message"]["rol"], "user");
        assert_eq!(turn["assistant_message"]["rol"], "assistant");

        let (_, messages) = send(&app, "GET", "/api/v1/chat/mensajes?limit=10", ANA, None).await;
        assert_eq!(messages["items"].as_array().unwrap().len(), 4);

        let (_, history) = send(&app, "GET", "/api/v1/chat/history", ANA, None).await;
        assert_eq!(history["items"][0]["role"], "user");

        let feedback = json!({"mensaje_id": assistant_id, "puntuacion": 5});
        let (status, _) =
            send(&app, "POST", "/api/v1/chat/feedback", LUIS, Some(feedback.clone())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, created) =
            send(&app, "POST", "/api/v1/chat/feedback", ANA, Some(feedback.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["puntuacion"], 5);

        let (status, body) =
            send(&app, "POST", "/api/v1/chat/feedback", ANA, Some(feedback)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "conflict");

        let (status, mine) = send(&app, "GET", "/api/v1/chat/feedback", ANA, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine["items"].as_array().unwrap().len(), 1);
        assert_eq!(mine["items"][0]["mensaje_id"], assistant_id);

        let (_, theirs) = send(&app, "GET", "/api/v1/chat/feedback", LUIS, None).await;
        assert!(theirs["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_metrics_and_progress() {
        let app = test_app().await;

        let (status, progress) = send(&app, "GET", "/api/v1/progreso", ANA, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(progress["total_reflexiones"], 0);
        assert_eq!(progress["interacciones_con_auri"], 0);

        let (status, _) = send(&app, "POST", "/api/v1/metricas/generar", ANA, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send(
            &app,
            "POST",
            "/api/v1/diario",
            ANA,
            Some(json!({"contenido": "Me siento tranquilo y agradecido"})),
        )
        .await;

        let (status, metric) = send(&app, "POST", "/api/v1/metricas/generar", ANA, None).await;
        assert_eq!(status, StatusCode::OK);
        let period = metric["periodo"].as_str().unwrap().to_string();
        assert_eq!(metric["emociones_predominantes"]["positiva"], 1.0);

        let uri = format!("/api/v1/metricas/periodo?periodo={}", period);
        let (status, fetched) = send(&app, "GET", &uri, ANA, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["id"], metric["id"]);

        let (status, _) = send(
            &app,
            "GET",
            "/api/v1/metricas/periodo?periodo=2020-W01",
            ANA,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, dashboard) = send(&app, "GET", "/api/v1/dashboard", ANA, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["total_entradas_diario"], 1);
        assert_eq!(dashboard["fuente_modelo"], "fallback");

        let (_, progress) = send(&app, "GET", "/api/v1/progreso", ANA, None).await;
        assert_eq!(progress["total_reflexiones"], 1);
        assert!(progress["recomendacion_actual"].is_string());
    }

    #[tokio::test]
    async fn test_challenge_flow() {
        let app = test_app().await;

        let (status, challenge) = send(
            &app,
            "POST",
            "/api/v1/consejos/desafios",
            ANA,
            Some(json!({"descripcion": "Camina 10 minutos"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(challenge["dificultad"], "facil");
        let challenge_id = challenge["id"].as_i64().unwrap();

        let assign = json!({"desafio_id": challenge_id});
        let (status, assignment) = send(
            &app,
            "POST",
            "/api/v1/consejos/desafios-usuario",
            ANA,
            Some(assign.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(assignment["completado"], false);

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/consejos/desafios-usuario",
            ANA,
            Some(assign),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/consejos/desafios-usuario",
            ANA,
            Some(json!({"desafio_id": 999})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let uri = format!(
            "/api/v1/consejos/desafios-usuario/{}/completar",
            assignment["id"]
        );
        let (status, completed) = send(&app, "PATCH", &uri, ANA, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(completed["completado"], true);

        let (_, done) = send(
            &app,
            "GET",
            "/api/v1/consejos/desafios-usuario?completado=true",
            ANA,
            None,
        )
        .await;
        assert_eq!(done["items"].as_array().unwrap().len(), 1);

        let (_, progress) = send(&app, "GET", "/api/v1/progreso", ANA, None).await;
        assert_eq!(progress["desafios_completados"], 1);
    }

    #[tokio::test]
    async fn test_profile() {
        let app = test_app().await;

        let (status, profile) = send(&app, "GET", "/api/v1/auth/me", ANA, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["id"], "ana");
        assert_eq!(profile["email"], "ana@example.com");

        let (status, profile) = send(
            &app,
            "PATCH",
            "/api/v1/auth/me",
            ANA,
            Some(json!({"nombre": "Ana"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["nombre"], "Ana");
    }
}
