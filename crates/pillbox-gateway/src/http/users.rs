use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use serde_json::{json, Value};

use pillbox_codec::{entries_from_form, ScheduleGrid};
use pillbox_core::types::PillColor;
use pillbox_store::User;

use crate::{app::AppState, error::ApiError};

/// GET / — all registered users.
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.store.list_users()?))
}

/// GET /createUser — the blank weekly grid a caregiver fills in.
pub async fn create_user_form() -> Json<Value> {
    Json(ScheduleGrid::new().nested())
}

/// POST /createUser — register a user and their initial schedule.
///
/// The form carries `name` plus sparse `{Day}_{time}_{color}` quantities;
/// only non-zero slots get a row. The committed schedule is mirrored to the
/// device before redirecting.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, ApiError> {
    let name = form
        .get("name")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("name is required".to_string()))?;

    let user_id = state.store.create_user(name)?;
    state.store.ensure_pill_types(&PillColor::ALL)?;

    let entries = entries_from_form(&form);
    state.store.insert_plan_entries(user_id, &entries)?;

    // Fire-and-forget: a broker hiccup never undoes the write above.
    state.relay.publish_schedule(user_id, name, &entries).await;

    Ok(Redirect::to("/"))
}

/// GET /displayUser/{user_id} — the user plus their total nested grid.
pub async fn display_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let user = state.store.get_user(user_id)?;
    let entries = state.store.plan_entries(user_id, None)?;
    let grid = ScheduleGrid::from_entries(&entries);
    Ok(Json(json!({ "user": user, "plan": grid.nested() })))
}

/// GET|POST /deleteUser/{user_id} — idempotent removal, always redirects.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Redirect, ApiError> {
    state.store.delete_user(user_id)?;
    Ok(Redirect::to("/"))
}

/// GET /editUser/{user_id} — pre-filled grid for the edit form.
pub async fn edit_user_form(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    display_user(State(state), Path(user_id)).await
}

/// POST /editUser/{user_id} — overwrite the name and every slot quantity.
///
/// Unlike create, every day/time/color combination is written, so slots the
/// caregiver cleared are zeroed rather than left at their old value.
pub async fn edit_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, ApiError> {
    let user = state.store.get_user(user_id)?;
    let name = form
        .get("name")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or(user.name);

    state.store.update_user_name(user_id, &name)?;
    state.store.ensure_pill_types(&PillColor::ALL)?;

    let entries = entries_from_form(&form);
    state.store.overwrite_plan_entries(user_id, &entries)?;

    state.relay.publish_schedule(user_id, &name, &entries).await;

    Ok(Redirect::to(&format!("/displayUser/{user_id}")))
}
