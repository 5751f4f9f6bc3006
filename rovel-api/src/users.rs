use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rovel_domain::user::Role;
use rovel_domain::validate::{validate_registration, validate_user_update};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::password;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    id: String,
    name: String,
    email: String,
    password: Option<String>,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_registration(&req.name, &req.email, &req.password)
        .map_err(AppError::ValidationMap)?;

    let hash = password::hash_password(&req.password)?;

    let user = match state
        .users
        .create(&req.name, &req.email, &hash, Role::AGENT)
        .await
    {
        Ok(user) => user,
        Err(rovel_store::StoreError::EmailTaken) => {
            return Err(AppError::Conflict(
                "Un utilisateur avec cet email existe déjà.".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("agent account created for {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Utilisateur enregistré avec succès",
            "user": user,
        })),
    ))
}

/// GET /users (administrator)
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = state.users.list().await?;
    Ok(Json(json!({ "users": users })))
}

/// GET /user?id=
pub async fn get_user(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(query.id.as_deref())?;

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé".to_string()))?;

    Ok(Json(user))
}

/// PUT /user
///
/// A user may edit their own record; administrators may edit anyone.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.id.is_empty() || req.name.is_empty() || req.email.is_empty() {
        return Err(AppError::Validation("Champs requis manquants".to_string()));
    }

    let id = parse_id(Some(&req.id))?;
    if !claims.is_admin() && claims.sub != req.id {
        return Err(AppError::Authorization("Accès non autorisé.".to_string()));
    }

    // an empty password field means "keep the current one"
    let password = req.password.as_deref().filter(|p| !p.is_empty());
    validate_user_update(&req.name, &req.email, password).map_err(AppError::ValidationMap)?;

    let hash = match password {
        Some(password) => Some(password::hash_password(password)?),
        None => None,
    };

    let updated = match state
        .users
        .update(id, &req.name, &req.email, hash.as_deref())
        .await
    {
        Ok(updated) => updated,
        Err(rovel_store::StoreError::EmailTaken) => {
            return Err(AppError::Conflict(
                "Un utilisateur avec cet email existe déjà.".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    if !updated {
        return Err(AppError::NotFound("Utilisateur non trouvé".to_string()));
    }

    Ok(Json(json!({ "message": "Utilisateur mis à jour avec succès." })))
}

/// DELETE /user?id= (administrator)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<IdQuery>,
) -> Result<impl IntoResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Authorization(
            "Accès non autorisé. Réservé aux administrateurs.".to_string(),
        ));
    }

    let id = parse_id(query.id.as_deref())?;

    if !state.users.delete(id).await? {
        return Err(AppError::NotFound("Utilisateur non trouvé".to_string()));
    }

    Ok(Json(json!({ "message": "Utilisateur supprimé avec succès." })))
}

fn parse_id(id: Option<&str>) -> Result<Uuid, AppError> {
    let id = id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("ID requis".to_string()))?;

    Uuid::parse_str(id).map_err(|_| AppError::Validation("ID invalide".to_string()))
}
