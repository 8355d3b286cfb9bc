use std::sync::Arc;
use rocket::{State, get, post, put, delete, http::Status, serde::json::{self, Json}};
use serde::Serialize;
use tracing::{debug, warn, instrument};
use shared::models::*;
use crate::{
    documents::DocumentStore,
    error::ApiError,
    processor::VoterProcessor,
    utils::{parse_poll_id, parse_voter_id},
};

type ApiResult<T> = Result<T, ApiError>;

pub struct AppState {
    pub voters: VoterProcessor,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            voters: VoterProcessor::new(store),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_error: Option<String>,
}

fn decode_body<T>(body: Result<Json<T>, json::Error<'_>>) -> ApiResult<T> {
    body.map(Json::into_inner).map_err(|e| {
        debug!("Rejected request body: {}", e);
        ApiError::BadRequest(e.to_string())
    })
}

#[get("/voter")]
pub async fn list_voters(state: &State<AppState>) -> ApiResult<Json<Vec<Voter>>> {
    Ok(Json(state.voters.list_all().await?))
}

#[post("/voter", format = "json", data = "<voter>")]
pub async fn create_voter(
    state: &State<AppState>,
    voter: Result<Json<Voter>, json::Error<'_>>,
) -> ApiResult<Json<Voter>> {
    let voter = decode_body(voter)?;
    Ok(Json(state.voters.create(voter).await?))
}

#[delete("/voter")]
pub async fn delete_all_voters(state: &State<AppState>) -> ApiResult<Status> {
    state.voters.delete_all().await?;
    Ok(Status::Ok)
}

#[get("/voter/<id>")]
pub async fn get_voter(state: &State<AppState>, id: &str) -> ApiResult<Json<Voter>> {
    let id = parse_voter_id(id)?;
    Ok(Json(state.voters.get(id).await?))
}

#[instrument(skip(state, voter))]
#[put("/voter/<id>", format = "json", data = "<voter>")]
pub async fn update_voter(
    state: &State<AppState>,
    id: &str,
    voter: Result<Json<Voter>, json::Error<'_>>,
) -> ApiResult<Json<Voter>> {
    let id = parse_voter_id(id)?;
    let voter = decode_body(voter)?;
    if voter.voter_id != id {
        return Err(ApiError::BadRequest(format!(
            "VoterId {} does not match path id {}", voter.voter_id, id
        )));
    }

    Ok(Json(state.voters.update(voter).await?))
}

#[delete("/voter/<id>")]
pub async fn delete_voter(state: &State<AppState>, id: &str) -> ApiResult<Status> {
    let id = parse_voter_id(id)?;
    state.voters.delete(id).await?;
    Ok(Status::Ok)
}

#[instrument(skip(state, vote))]
#[post("/voter/<id>", format = "json", data = "<vote>")]
pub async fn add_vote(
    state: &State<AppState>,
    id: &str,
    vote: Result<Json<VoteRecord>, json::Error<'_>>,
) -> ApiResult<Json<Voter>> {
    let id = parse_voter_id(id)?;
    let vote = decode_body(vote)?;
    Ok(Json(state.voters.add_vote(id, vote).await?))
}

#[get("/voter/<id>/polls")]
pub async fn get_vote_history(state: &State<AppState>, id: &str) -> ApiResult<Json<Vec<VoteRecord>>> {
    let id = parse_voter_id(id)?;
    Ok(Json(state.voters.history(id).await?))
}

#[get("/voter/<id>/polls/<poll_id>")]
pub async fn get_vote(state: &State<AppState>, id: &str, poll_id: &str) -> ApiResult<Json<VoteRecord>> {
    let id = parse_voter_id(id)?;
    let poll_id = parse_poll_id(poll_id)?;
    Ok(Json(state.voters.vote(id, poll_id).await?))
}

#[get("/health")]
pub async fn health(state: &State<AppState>) -> (Status, Json<HealthStatus>) {
    let version = env!("CARGO_PKG_VERSION");
    match state.voters.store().ping().await {
        Ok(()) => (Status::Ok, Json(HealthStatus { status: "ok", version, store_error: None })),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                Status::ServiceUnavailable,
                Json(HealthStatus { status: "unavailable", version, store_error: Some(e.to_string()) }),
            )
        }
    }
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}
