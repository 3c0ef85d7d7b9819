use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/auth/register", post(handlers::auth_register))
        .route("/api/auth/login", post(handlers::auth_login))
        .route("/api/auth/logout", post(handlers::auth_logout))
        .route("/api/auth/session", get(handlers::auth_session))
        .route(
            "/api/medications",
            get(handlers::medications_list).post(handlers::medications_create),
        )
        .route(
            "/api/medications/:id",
            put(handlers::medications_update).delete(handlers::medications_delete),
        )
        .route(
            "/api/schedules",
            get(handlers::schedules_list).post(handlers::schedules_create),
        )
        .route(
            "/api/schedules/:id",
            axum::routing::delete(handlers::schedules_delete),
        )
        .route("/api/schedules/:id/status", post(handlers::schedules_status))
        .route(
            "/api/schedules/:id/whatsapp-link",
            get(handlers::schedule_whatsapp_link),
        )
        .route("/api/schedules/alerts", get(handlers::alerts_list))
        .route(
            "/api/schedules/alerts/simulate",
            post(handlers::alerts_simulate),
        )
        .route(
            "/api/caregivers",
            get(handlers::caregivers_list).post(handlers::caregivers_create),
        )
        .route(
            "/api/caregivers/:id",
            put(handlers::caregivers_update).delete(handlers::caregivers_delete),
        )
        .route(
            "/api/reminders",
            get(handlers::reminders_get).put(handlers::reminders_update),
        )
        .route("/api/reminders/test-link", get(handlers::reminders_test_link))
        .route("/api/reports/medication", get(handlers::reports_medication))
        .route("/api/reports/quality", get(handlers::reports_quality))
        .route("/api/reports/financial", get(handlers::reports_financial))
        .route("/api/reports/:kind/pdf", get(handlers::reports_pdf))
        .route(
            "/api/community/posts",
            get(handlers::posts_list).post(handlers::posts_create),
        )
        .route("/api/community/posts/:id/like", post(handlers::posts_like))
        .route("/api/community/groups", get(handlers::groups_list))
        .route("/api/community/groups/:id/join", post(handlers::groups_join))
        .route("/api/reference", get(handlers::reference_list))
        .route(
            "/api/reference/:id/favorite",
            post(handlers::reference_favorite),
        )
        .with_state(state)
}
