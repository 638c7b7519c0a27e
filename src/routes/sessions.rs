use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::config::IngestSettings;
use crate::core::{top_matches, MatchFilter, MatchingSession, SessionError, DEFAULT_TOP_MATCHES};
use crate::models::{
    AssignmentResponse, CreateSessionRequest, ErrorResponse, HealthResponse, MatchesQuery,
    MatchesResponse, ReplaceCriteriaRequest, ScoringWeights, SessionResponse, SetStatusRequest,
};
use crate::services::{parse_mentees, parse_mentors, SessionStore, SharedSession};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub weights: ScoringWeights,
    pub ingest: IngestSettings,
}

/// Configure all session routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/sessions", web::post().to(create_session))
        .route("/sessions/{id}", web::get().to(get_session))
        .route("/sessions/{id}", web::delete().to(delete_session))
        .route("/sessions/{id}/criteria", web::put().to(replace_criteria))
        .route("/sessions/{id}/matches", web::get().to(list_matches))
        .route("/sessions/{id}/matches/status", web::post().to(set_status))
        .route("/sessions/{id}/assignment", web::get().to(get_assignment));
}

fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

async fn lookup(state: &AppState, id: &Uuid) -> Result<SharedSession, HttpResponse> {
    state.sessions.get(id).await.map_err(|e| {
        tracing::debug!("Session lookup failed: {}", e);
        error_response(StatusCode::NOT_FOUND, "Session not found", e)
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        sessions: state.sessions.stats().sessions,
    })
}

/// Create session endpoint
///
/// POST /api/v1/sessions
///
/// Request body:
/// ```json
/// {
///   "mentorsCsv": "string",
///   "menteesCsv": "string",
///   "criteria": [
///     {
///       "menteeId": "string",
///       "attribute": "mentorId",
///       "condition": "not_equals",
///       "value": "string"
///     }
///   ]
/// }
/// ```
async fn create_session(
    state: web::Data<AppState>,
    req: web::Json<CreateSessionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_session request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let mentors = match parse_mentors(req.mentors_csv.as_bytes(), &state.ingest.mentor_columns) {
        Ok(mentors) => mentors,
        Err(e) => {
            tracing::info!("Failed to parse mentor CSV: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid mentor CSV", e);
        }
    };

    let mentees = match parse_mentees(req.mentees_csv.as_bytes(), &state.ingest.mentee_columns) {
        Ok(mentees) => mentees,
        Err(e) => {
            tracing::info!("Failed to parse mentee CSV: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid mentee CSV", e);
        }
    };

    let session = MatchingSession::new(mentors, mentees, req.into_inner().criteria, state.weights);
    let summary = session.summary();
    let session_id = state.sessions.insert(session).await;

    tracing::info!(
        "Session {} created: {} mentors, {} mentees, {} matches ({} excluded)",
        session_id,
        summary.mentor_count,
        summary.mentee_count,
        summary.match_count,
        summary.excluded_count
    );

    HttpResponse::Created().json(SessionResponse { session_id, summary })
}

/// GET /api/v1/sessions/{id}
async fn get_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session_id = path.into_inner();
    let session = match lookup(&state, &session_id).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let summary = session.lock().await.summary();
    HttpResponse::Ok().json(SessionResponse { session_id, summary })
}

/// DELETE /api/v1/sessions/{id}
async fn delete_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session_id = path.into_inner();
    match state.sessions.remove(&session_id).await {
        Ok(()) => {
            tracing::info!("Session {} deleted", session_id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_response(StatusCode::NOT_FOUND, "Session not found", e),
    }
}

/// Replace exclusion criteria
///
/// PUT /api/v1/sessions/{id}/criteria
///
/// Rebuilds the match set; review statuses and the optimal assignment start over.
async fn replace_criteria(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ReplaceCriteriaRequest>,
) -> impl Responder {
    let session_id = path.into_inner();
    let session = match lookup(&state, &session_id).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let mut session = session.lock().await;
    session.replace_criteria(req.into_inner().criteria);

    HttpResponse::Ok().json(SessionResponse {
        session_id,
        summary: session.summary(),
    })
}

/// List matches
///
/// GET /api/v1/sessions/{id}/matches?mentorId={id}&menteeId={id}&limit={n}
///
/// Without query parameters the full ranked list is returned. With a filter
/// the best `limit` (default 3) matches for that mentor or mentee are returned.
async fn list_matches(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<MatchesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let session = match lookup(&state, &path.into_inner()).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let session = session.lock().await;

    let matches = if query.is_filtered() {
        let filter = MatchFilter::from_ids(query.mentor_id.as_deref(), query.mentee_id.as_deref());
        let limit = query.limit.unwrap_or(DEFAULT_TOP_MATCHES);
        top_matches(session.matches(), filter, limit)
            .into_iter()
            .cloned()
            .collect()
    } else {
        session.matches().to_vec()
    };

    HttpResponse::Ok().json(MatchesResponse {
        total_results: session.matches().len(),
        matches,
    })
}

/// Optimal assignment
///
/// GET /api/v1/sessions/{id}/assignment
///
/// The first call solves the assignment; later calls return the same pairing
/// with approvals and rejections filtered out of `pending`.
async fn get_assignment(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session = match lookup(&state, &path.into_inner()).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut session = session.lock().await;

    let assignment = session.assignment().clone();
    let pending = session.pending_pairs();
    let approved = session.approved_pairs().cloned().collect();

    HttpResponse::Ok().json(AssignmentResponse {
        assignment,
        pending,
        approved,
    })
}

/// Set match status
///
/// POST /api/v1/sessions/{id}/matches/status
///
/// Request body:
/// ```json
/// {
///   "mentorId": "string",
///   "menteeId": "string",
///   "status": "approved|rejected|pending"
/// }
/// ```
async fn set_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<SetStatusRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let session_id = path.into_inner();
    let session = match lookup(&state, &session_id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    let mut session = session.lock().await;

    match session.set_status(&req.mentor_id, &req.mentee_id, req.status) {
        Ok(updated) => {
            tracing::info!(
                "Session {}: {} -> {} marked {:?}",
                session_id,
                req.mentor_id,
                req.mentee_id,
                req.status
            );
            HttpResponse::Ok().json(updated)
        }
        Err(e @ SessionError::MatchNotFound { .. }) => {
            error_response(StatusCode::NOT_FOUND, "Match not found", e)
        }
        Err(e @ SessionError::AlreadyPaired(_)) => {
            error_response(StatusCode::CONFLICT, "Already paired", e)
        }
    }
}
