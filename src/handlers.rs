use crate::auth::{self, AuthError};
use crate::errors::AppError;
use crate::links;
use crate::models::{
    next_id, Caregiver, CaregiverForm, Group, LinkResponse, LoginRequest, LoginResponse,
    LogoutRequest, Medication, MedicationForm, Post, PostForm, RangeQuery,
    ReferenceEntry, ReferenceQuery, RegisterRequest, ReminderSettings, Schedule, ScheduleForm,
    ScheduleQuery, ScheduleStatus, ScheduleView, StatusChangeRequest, TestLinksResponse, UserView,
};
use crate::pdf;
use crate::reports::{self, ReportKind};
use crate::schedule::{self, TransitionError};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Local;
use tracing::info;

pub async fn index() -> Html<String> {
    Html(render_index(&Local::now().date_naive().to_string()))
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingField(_) => AppError::bad_request(err.to_string()),
            AuthError::EmailTaken => AppError::conflict(err.to_string()),
            AuthError::InvalidCredentials => AppError::unauthorized(err.to_string()),
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotFound(_) => AppError::not_found(err.to_string()),
            TransitionError::AlreadyResolved { .. } => AppError::conflict(err.to_string()),
            TransitionError::InvalidTarget => AppError::bad_request(err.to_string()),
        }
    }
}

// ---- auth -------------------------------------------------------------

pub async fn auth_register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<UserView>, AppError> {
    let mut data = state.data.lock().await;
    let user = auth::register(&mut data, payload)?;
    persist_data(&state.data_path, &data).await?;
    info!("registered account for {}", user.email);
    Ok(Json(user))
}

pub async fn auth_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let mut data = state.data.lock().await;
    let session = auth::login(&mut data, &payload.email, &payload.password)?;
    persist_data(&state.data_path, &data).await?;
    Ok(Json(session))
}

pub async fn auth_logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut data = state.data.lock().await;
    auth::logout(&mut data, &payload.token);
    persist_data(&state.data_path, &data).await?;
    Ok(Json(serde_json::json!({ "logged_out": true })))
}

pub async fn auth_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserView>, AppError> {
    let token = headers
        .get("x-session-token")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("missing session token"))?;
    let data = state.data.lock().await;
    auth::session_user(&data, token)
        .map(Json)
        .ok_or_else(|| AppError::unauthorized("session expired"))
}

// ---- medications ------------------------------------------------------

pub async fn medications_list(State(state): State<AppState>) -> Json<Vec<Medication>> {
    let data = state.data.lock().await;
    Json(data.medications.clone())
}

pub async fn medications_create(
    State(state): State<AppState>,
    Json(payload): Json<MedicationForm>,
) -> Result<Json<Medication>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("name is required"));
    }
    if payload.dosage.trim().is_empty() {
        return Err(AppError::bad_request("dosage is required"));
    }

    let mut data = state.data.lock().await;
    let medication = Medication {
        id: next_id(&data.medications, |medication| medication.id),
        name: payload.name.trim().to_string(),
        dosage: payload.dosage.trim().to_string(),
        interval: payload.interval,
        observations: payload.observations,
        price: payload.price,
        pharmacy: payload.pharmacy,
        image: payload.image,
    };
    data.medications.push(medication.clone());
    persist_data(&state.data_path, &data).await?;
    Ok(Json(medication))
}

pub async fn medications_update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<MedicationForm>,
) -> Result<Json<Medication>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("name is required"));
    }

    let mut data = state.data.lock().await;
    let medication = data
        .medications
        .iter_mut()
        .find(|medication| medication.id == id)
        .ok_or_else(|| AppError::not_found(format!("medication {id} not found")))?;
    medication.name = payload.name.trim().to_string();
    medication.dosage = payload.dosage.trim().to_string();
    medication.interval = payload.interval;
    medication.observations = payload.observations;
    medication.price = payload.price;
    medication.pharmacy = payload.pharmacy;
    medication.image = payload.image;
    let updated = medication.clone();
    persist_data(&state.data_path, &data).await?;
    Ok(Json(updated))
}

pub async fn medications_delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut data = state.data.lock().await;
    let before = data.medications.len();
    // schedules pointing at this id are left alone; their name lookup
    // falls back to a placeholder
    data.medications.retain(|medication| medication.id != id);
    if data.medications.len() == before {
        return Err(AppError::not_found(format!("medication {id} not found")));
    }
    persist_data(&state.data_path, &data).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

// ---- schedules --------------------------------------------------------

pub async fn schedules_list(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Json<Vec<ScheduleView>> {
    let data = state.data.lock().await;
    Json(schedule::views_for_date(&data, query.date))
}

pub async fn schedules_create(
    State(state): State<AppState>,
    Json(payload): Json<ScheduleForm>,
) -> Result<Json<ScheduleView>, AppError> {
    let mut data = state.data.lock().await;
    if !data
        .medications
        .iter()
        .any(|medication| medication.id == payload.medication_id)
    {
        return Err(AppError::bad_request(format!(
            "medication {} does not exist",
            payload.medication_id
        )));
    }

    let entry = Schedule {
        id: next_id(&data.schedules, |schedule| schedule.id),
        medication_id: payload.medication_id,
        date: payload.date,
        time: payload.time,
        status: ScheduleStatus::Pending,
        alerted: false,
        missed_reason: None,
    };
    data.schedules.push(entry.clone());
    persist_data(&state.data_path, &data).await?;
    Ok(Json(schedule::schedule_view(&data, &entry)))
}

pub async fn schedules_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<StatusChangeRequest>,
) -> Result<Json<ScheduleView>, AppError> {
    let mut data = state.data.lock().await;
    schedule::apply_status(&mut data, id, payload.status, payload.reason)?;
    persist_data(&state.data_path, &data).await?;

    let view = data
        .schedules
        .iter()
        .find(|schedule| schedule.id == id)
        .map(|entry| schedule::schedule_view(&data, entry))
        .ok_or_else(|| AppError::not_found(format!("schedule {id} not found")))?;
    Ok(Json(view))
}

pub async fn schedules_delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut data = state.data.lock().await;
    if !schedule::remove_schedule(&mut data, id) {
        return Err(AppError::not_found(format!("schedule {id} not found")));
    }
    persist_data(&state.data_path, &data).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

pub async fn alerts_list(State(state): State<AppState>) -> Json<Vec<ScheduleView>> {
    let data = state.data.lock().await;
    Json(schedule::alert_views(&data))
}

pub async fn alerts_simulate(
    State(state): State<AppState>,
) -> Result<Json<Option<ScheduleView>>, AppError> {
    let mut data = state.data.lock().await;
    let Some(id) = schedule::trigger_next_alert(&mut data) else {
        return Ok(Json(None));
    };
    persist_data(&state.data_path, &data).await?;

    let view = data
        .schedules
        .iter()
        .find(|schedule| schedule.id == id)
        .map(|entry| schedule::schedule_view(&data, entry));
    info!("alert raised for schedule {id}");
    Ok(Json(view))
}

pub async fn schedule_whatsapp_link(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<LinkResponse>, AppError> {
    let data = state.data.lock().await;
    let entry = data
        .schedules
        .iter()
        .find(|schedule| schedule.id == id)
        .ok_or_else(|| AppError::not_found(format!("schedule {id} not found")))?;
    let name = schedule::medication_name(&data, entry.medication_id);
    Ok(Json(LinkResponse {
        url: links::schedule_reminder_link(&name, entry.date, &entry.time),
    }))
}

// ---- caregivers -------------------------------------------------------

pub async fn caregivers_list(State(state): State<AppState>) -> Json<Vec<Caregiver>> {
    let data = state.data.lock().await;
    Json(data.caregivers.clone())
}

pub async fn caregivers_create(
    State(state): State<AppState>,
    Json(payload): Json<CaregiverForm>,
) -> Result<Json<Caregiver>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("name is required"));
    }

    let mut data = state.data.lock().await;
    let caregiver = Caregiver {
        id: next_id(&data.caregivers, |caregiver| caregiver.id),
        name: payload.name.trim().to_string(),
        phone: payload.phone,
        email: payload.email,
        shift: payload.shift,
        notes: payload.notes,
    };
    data.caregivers.push(caregiver.clone());
    persist_data(&state.data_path, &data).await?;
    Ok(Json(caregiver))
}

pub async fn caregivers_update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<CaregiverForm>,
) -> Result<Json<Caregiver>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("name is required"));
    }

    let mut data = state.data.lock().await;
    let caregiver = data
        .caregivers
        .iter_mut()
        .find(|caregiver| caregiver.id == id)
        .ok_or_else(|| AppError::not_found(format!("caregiver {id} not found")))?;
    caregiver.name = payload.name.trim().to_string();
    caregiver.phone = payload.phone;
    caregiver.email = payload.email;
    caregiver.shift = payload.shift;
    caregiver.notes = payload.notes;
    let updated = caregiver.clone();
    persist_data(&state.data_path, &data).await?;
    Ok(Json(updated))
}

pub async fn caregivers_delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut data = state.data.lock().await;
    let before = data.caregivers.len();
    data.caregivers.retain(|caregiver| caregiver.id != id);
    if data.caregivers.len() == before {
        return Err(AppError::not_found(format!("caregiver {id} not found")));
    }
    persist_data(&state.data_path, &data).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

// ---- reminders --------------------------------------------------------

pub async fn reminders_get(State(state): State<AppState>) -> Json<ReminderSettings> {
    let data = state.data.lock().await;
    Json(data.reminder_settings.clone())
}

pub async fn reminders_update(
    State(state): State<AppState>,
    Json(mut payload): Json<ReminderSettings>,
) -> Result<Json<ReminderSettings>, AppError> {
    payload.lead_minutes = payload.lead_minutes.min(60);
    let mut data = state.data.lock().await;
    data.reminder_settings = payload;
    persist_data(&state.data_path, &data).await?;
    Ok(Json(data.reminder_settings.clone()))
}

pub async fn reminders_test_link(State(state): State<AppState>) -> Json<TestLinksResponse> {
    let data = state.data.lock().await;
    Json(links::test_message_links(&data.reminder_settings))
}

// ---- reports ----------------------------------------------------------

pub async fn reports_medication(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Json<Vec<crate::models::MedicationReportRow>> {
    let (start, end) = reports::resolve_range(query.start, query.end);
    let data = state.data.lock().await;
    Json(reports::build_medication_report(&data, start, end))
}

pub async fn reports_quality(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Json<crate::models::QualityReport> {
    let (start, end) = reports::resolve_range(query.start, query.end);
    let data = state.data.lock().await;
    Json(reports::build_quality_report(&data, start, end))
}

pub async fn reports_financial(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<crate::models::FinancialReport>, AppError> {
    let (start, end) = reports::resolve_range(query.start, query.end);
    let data = state.data.lock().await;
    let report = reports::build_financial_report(&data, start, end)
        .map_err(AppError::internal)?;
    Ok(Json(report))
}

pub async fn reports_pdf(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, AppError> {
    let kind: ReportKind = kind
        .parse()
        .map_err(|_| AppError::bad_request("unknown report type"))?;
    let (start, end) = reports::resolve_range(query.start, query.end);
    let now = Local::now();
    let generated_at = now.format("%d/%m/%Y %H:%M").to_string();

    let data = state.data.lock().await;
    let bytes = match kind {
        ReportKind::Medication => pdf::medication_report_pdf(
            &reports::build_medication_report(&data, start, end),
            start,
            end,
            &generated_at,
        )?,
        ReportKind::Financial => {
            let report = reports::build_financial_report(&data, start, end)
                .map_err(AppError::internal)?;
            pdf::financial_report_pdf(&report, start, end, &generated_at)?
        }
        ReportKind::Quality => pdf::quality_report_pdf(
            &reports::build_quality_report(&data, start, end),
            start,
            end,
            &generated_at,
        )?,
    };
    drop(data);

    let filename = pdf::report_filename(kind, now.date_naive());
    info!("generated {filename} ({} bytes)", bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ---- community --------------------------------------------------------

pub async fn posts_list(State(state): State<AppState>) -> Json<Vec<Post>> {
    let data = state.data.lock().await;
    let mut posts = data.posts.clone();
    posts.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    Json(posts)
}

pub async fn posts_create(
    State(state): State<AppState>,
    Json(payload): Json<PostForm>,
) -> Result<Json<Post>, AppError> {
    if payload.content.trim().is_empty() {
        return Err(AppError::bad_request("content is required"));
    }

    let mut data = state.data.lock().await;
    let avatar = if payload.avatar.trim().is_empty() {
        initials(&payload.author)
    } else {
        payload.avatar
    };
    let post = Post {
        id: next_id(&data.posts, |post| post.id),
        author: payload.author,
        avatar,
        content: payload.content.trim().to_string(),
        date: Local::now().date_naive(),
        likes: 0,
        comments: 0,
        category: payload.category,
    };
    data.posts.push(post.clone());
    persist_data(&state.data_path, &data).await?;
    Ok(Json(post))
}

pub async fn posts_like(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Post>, AppError> {
    let mut data = state.data.lock().await;
    let post = data
        .posts
        .iter_mut()
        .find(|post| post.id == id)
        .ok_or_else(|| AppError::not_found(format!("post {id} not found")))?;
    post.likes += 1;
    let updated = post.clone();
    persist_data(&state.data_path, &data).await?;
    Ok(Json(updated))
}

pub async fn groups_list(State(state): State<AppState>) -> Json<Vec<Group>> {
    let data = state.data.lock().await;
    Json(data.groups.clone())
}

pub async fn groups_join(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Group>, AppError> {
    let mut data = state.data.lock().await;
    let group = data
        .groups
        .iter_mut()
        .find(|group| group.id == id)
        .ok_or_else(|| AppError::not_found(format!("group {id} not found")))?;
    group.members += 1;
    let updated = group.clone();
    persist_data(&state.data_path, &data).await?;
    Ok(Json(updated))
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

// ---- medication reference database ------------------------------------

pub async fn reference_list(
    State(state): State<AppState>,
    Query(query): Query<ReferenceQuery>,
) -> Json<Vec<ReferenceEntry>> {
    let needle = query.search.trim().to_lowercase();
    let data = state.data.lock().await;
    let entries = data
        .reference
        .iter()
        .filter(|entry| !query.favorites || entry.favorite)
        .filter(|entry| {
            needle.is_empty()
                || entry.name.to_lowercase().contains(&needle)
                || entry.generic.to_lowercase().contains(&needle)
                || entry.classification.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    Json(entries)
}

pub async fn reference_favorite(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ReferenceEntry>, AppError> {
    let mut data = state.data.lock().await;
    let entry = data
        .reference
        .iter_mut()
        .find(|entry| entry.id == id)
        .ok_or_else(|| AppError::not_found(format!("reference entry {id} not found")))?;
    entry.favorite = !entry.favorite;
    let updated = entry.clone();
    persist_data(&state.data_path, &data).await?;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::initials;

    #[test]
    fn initials_take_the_first_two_words() {
        assert_eq!(initials("Maria Silva"), "MS");
        assert_eq!(initials("Ana"), "A");
        assert_eq!(initials("João Pereira Santos"), "JP");
        assert_eq!(initials(""), "");
    }
}
