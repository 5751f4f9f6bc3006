use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rovel_domain::ticket::TicketDraft;
use rovel_domain::validate::validate_ticket;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", post(create_ticket).get(list_tickets))
        .route(
            "/tickets/{id}",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
}

// ============================================================================
// Issuance
// ============================================================================

/// POST /tickets
///
/// Runs the issuance pipeline: validate, resolve the agent, persist, encode,
/// render, deliver. Once the insert commits the ticket exists; a later
/// failure is reported with the ticket id rather than rolled back.
async fn create_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<TicketDraft>,
) -> Result<Response, AppError> {
    let booking = validate_ticket(&draft).map_err(AppError::ValidationMap)?;

    // a session whose email no longer maps to an account is stale
    let agent = state
        .users
        .find_by_email(&claims.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé.".to_string()))?;

    match state.issuer.issue(booking, agent.id).await {
        Ok(receipt) => Ok(Json(json!({
            "message": "Ticket enregistré, généré et envoyé avec succès !",
            "ticketId": receipt.ticket.id,
        }))
        .into_response()),
        Err(err) => match err.ticket_id {
            None => Err(AppError::Internal(err.to_string())),
            Some(id) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Le ticket est enregistré mais n'a pas pu être envoyé.",
                    "ticketId": id,
                })),
            )
                .into_response()),
        },
    }
}

// ============================================================================
// Scoped CRUD
// ============================================================================

/// GET /tickets
async fn list_tickets(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, AppError> {
    let tickets = if claims.is_admin() {
        state.tickets.list_all().await?
    } else {
        state.tickets.list_by_owner(owner_id(&claims)?).await?
    };

    Ok(Json(json!({ "tickets": tickets })).into_response())
}

/// GET /tickets/{id}
async fn get_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let ticket = if claims.is_admin() {
        state.tickets.find_any(id).await?
    } else {
        state.tickets.find_for_owner(id, owner_id(&claims)?).await?
    };

    let ticket = ticket.ok_or_else(|| AppError::NotFound("Ticket non trouvé.".to_string()))?;
    Ok(Json(ticket).into_response())
}

/// PUT /tickets/{id}
async fn update_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(draft): Json<TicketDraft>,
) -> Result<Response, AppError> {
    let booking = validate_ticket(&draft).map_err(AppError::ValidationMap)?;

    let updated = state
        .tickets
        .update_for_owner(id, owner_id(&claims)?, &booking)
        .await?;

    if !updated {
        return Err(AppError::NotFound(
            "Ticket non trouvé ou non autorisé pour la mise à jour.".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Ticket mis à jour avec succès." })).into_response())
}

/// DELETE /tickets/{id}
async fn delete_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let deleted = if claims.is_admin() {
        state.tickets.delete_any(id).await?
    } else {
        state
            .tickets
            .delete_for_owner(id, owner_id(&claims)?)
            .await?
    };

    if !deleted {
        return Err(AppError::NotFound("Ticket non trouvé".to_string()));
    }

    Ok(Json(json!({ "message": "Ticket supprimé avec succès." })).into_response())
}

fn owner_id(claims: &Claims) -> Result<Uuid, AppError> {
    claims
        .user_id()
        .ok_or_else(|| AppError::Authentication("Authentification requise.".to_string()))
}
