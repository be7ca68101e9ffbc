//! Profile handlers
//!
//! Profiles are keyed by owner; every mutation goes through
//! `ProfileStore::update_by_user` so the read-modify-write is atomic.

use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::models::{
    parse_id, EducationInput, ExperienceInput, Profile, ProfileInput, ProfileView, UserSummary,
};
use crate::core::validate::ValidJson;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

const NO_PROFILE: &str = "There is no profile for this user";

async fn populate(state: &AppState, profile: Profile) -> ProfileView {
    let owner = state
        .users
        .find_by_id(&profile.user)
        .await
        .map(|user| UserSummary::from(&user));
    profile.populate(owner)
}

/// GET /api/profile/me
pub async fn get_me(State(state): State<AppState>, ctx: Ctx) -> Result<Json<ProfileView>> {
    info!("GET /api/profile/me - {}", ctx.user_id());

    let profile = state
        .profiles
        .find_by_user(ctx.user_id())
        .await
        .ok_or_else(|| Error::bad_request(NO_PROFILE))?;

    Ok(Json(populate(&state, profile).await))
}

/// GET /api/profile
pub async fn list_profiles(State(state): State<AppState>) -> Json<Vec<ProfileView>> {
    info!("GET /api/profile");

    let mut views = Vec::new();
    for profile in state.profiles.all().await {
        views.push(populate(&state, profile).await);
    }
    Json(views)
}

/// GET /api/profile/user/:user_id
pub async fn get_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileView>> {
    info!("GET /api/profile/user/{}", user_id);

    let user_id = parse_id(&user_id).ok_or_else(|| Error::bad_request(NO_PROFILE))?;
    let profile = state
        .profiles
        .find_by_user(&user_id)
        .await
        .ok_or_else(|| Error::bad_request(NO_PROFILE))?;

    Ok(Json(populate(&state, profile).await))
}

/// POST /api/profile
///
/// Creates the caller's profile or merges the submitted fields into it.
pub async fn upsert_profile(
    State(state): State<AppState>,
    ctx: Ctx,
    ValidJson(req): ValidJson<ProfileInput>,
) -> Result<Json<Profile>> {
    info!("POST /api/profile - {}", ctx.user_id());

    if req.skill_list().is_empty() {
        return Err(Error::field("skills", "Skills is required"));
    }
    if state.users.find_by_id(ctx.user_id()).await.is_none() {
        return Err(Error::not_found("User not found"));
    }

    let profile = state.profiles.upsert(ctx.user_id(), req).await?;
    Ok(Json(profile))
}

/// PUT /api/profile/experience
pub async fn add_experience(
    State(state): State<AppState>,
    ctx: Ctx,
    ValidJson(req): ValidJson<ExperienceInput>,
) -> Result<Json<Profile>> {
    info!("PUT /api/profile/experience - {}", ctx.user_id());

    let entry = req.into_entry()?;
    let (profile, ()) = state
        .profiles
        .update_by_user(ctx.user_id(), |p| {
            p.details.experience.insert(0, entry);
            Ok::<_, Error>(())
        })
        .await?
        .ok_or_else(|| Error::not_found(NO_PROFILE))?;

    Ok(Json(profile))
}

/// DELETE /api/profile/experience/:exp_id
pub async fn delete_experience(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(exp_id): Path<String>,
) -> Result<Json<Profile>> {
    info!("DELETE /api/profile/experience/{} - {}", exp_id, ctx.user_id());

    let exp_id = parse_id(&exp_id);
    let (profile, _) = state
        .profiles
        .update_by_user(ctx.user_id(), |p| {
            exp_id.and_then(|id| p.remove_experience(&id))
                .ok_or_else(|| Error::not_found("Experience not found"))
        })
        .await?
        .ok_or_else(|| Error::bad_request(NO_PROFILE))?;

    Ok(Json(profile))
}

/// PUT /api/profile/education
pub async fn add_education(
    State(state): State<AppState>,
    ctx: Ctx,
    ValidJson(req): ValidJson<EducationInput>,
) -> Result<Json<Profile>> {
    info!("PUT /api/profile/education - {}", ctx.user_id());

    let entry = req.into_entry()?;
    let (profile, ()) = state
        .profiles
        .update_by_user(ctx.user_id(), |p| {
            p.details.education.insert(0, entry);
            Ok::<_, Error>(())
        })
        .await?
        .ok_or_else(|| Error::not_found(NO_PROFILE))?;

    Ok(Json(profile))
}

/// DELETE /api/profile/education/:edu_id
pub async fn delete_education(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(edu_id): Path<String>,
) -> Result<Json<Profile>> {
    info!("DELETE /api/profile/education/{} - {}", edu_id, ctx.user_id());

    let edu_id = parse_id(&edu_id);
    let (profile, _) = state
        .profiles
        .update_by_user(ctx.user_id(), |p| {
            edu_id.and_then(|id| p.remove_education(&id))
                .ok_or_else(|| Error::not_found("Education not found"))
        })
        .await?
        .ok_or_else(|| Error::bad_request(NO_PROFILE))?;

    Ok(Json(profile))
}

/// DELETE /api/profile
///
/// Removes the caller's posts, profile and account, in that order.
pub async fn delete_account(State(state): State<AppState>, ctx: Ctx) -> Result<Json<&'static str>> {
    let user_id = ctx.user_id();
    info!("DELETE /api/profile - {}", user_id);

    let posts = state.posts.delete_by_author(user_id).await?;
    state.profiles.delete_by_user(user_id).await?;
    state.users.delete(user_id).await?;

    info!("Deleted account {} ({} posts)", user_id, posts);
    Ok(Json("User deleted"))
}

/// GET /api/profile/github/:username
pub async fn get_github_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>> {
    info!("GET /api/profile/github/{}", username);

    state
        .github
        .user(&username)
        .await
        .map(Json)
        .ok_or_else(|| Error::not_found("No Github profile found"))
}
