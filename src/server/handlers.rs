//! Request handlers.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, MutexGuard};

use super::AppState;
use crate::engine;
use crate::error::{EngineError, Result};
use crate::storage::{RegattaDatabase, TeamSpeedEstimate};
use crate::{RaceId, TeamId};

/// Header carrying the authenticated caller's team, set upstream.
pub const TEAM_HEADER: &str = "X-Team-Id";

#[derive(Debug, Deserialize)]
pub struct SeasonQuery {
    pub season: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HeadToHeadQuery {
    pub opponent: Option<String>,
    #[serde(rename = "boatClass")]
    pub boat_class: Option<String>,
    pub season: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalculateBody {
    pub season: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BoatClassesResponse {
    boat_classes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RankingsResponse {
    rankings: Vec<engine::RankingEntry>,
}

#[derive(Debug, Serialize)]
struct HeadToHeadResponse {
    comparison: engine::HeadToHead,
}

#[derive(Debug, Serialize)]
struct CalculateResponse {
    estimate: Option<TeamSpeedEstimate>,
}

/// Caller's team from the upstream auth header.
fn team_id(req: &HttpRequest) -> Result<TeamId> {
    let raw = req
        .headers()
        .get(TEAM_HEADER)
        .ok_or(EngineError::MissingParameter { name: "X-Team-Id" })?;
    raw.to_str()
        .map_err(|e| EngineError::InvalidParameter {
            name: "X-Team-Id",
            message: e.to_string(),
        })?
        .parse()
}

fn lock_db(state: &AppState) -> Result<MutexGuard<'_, RegattaDatabase>> {
    state.db.lock().map_err(EngineError::internal)
}

/// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /boat-classes?season=`
pub async fn boat_classes(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    query: web::Query<SeasonQuery>,
) -> Result<HttpResponse> {
    let team = team_id(&req)?;
    let db = lock_db(&state)?;
    let boat_classes = engine::boat_classes(&db, team, query.season.as_deref())?;
    Ok(HttpResponse::Ok().json(BoatClassesResponse { boat_classes }))
}

/// `GET /rankings/{boat_class}?season=`
pub async fn rankings(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    query: web::Query<SeasonQuery>,
) -> Result<HttpResponse> {
    let team = team_id(&req)?;
    let boat_class = path.into_inner();
    let mut db = lock_db(&state)?;
    let rankings = engine::build_rankings(
        &mut db,
        state.model.as_ref(),
        team,
        &boat_class,
        query.season.as_deref(),
    )?;
    Ok(HttpResponse::Ok().json(RankingsResponse { rankings }))
}

/// `GET /head-to-head?opponent=&boatClass=&season=`
pub async fn head_to_head(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    query: web::Query<HeadToHeadQuery>,
) -> Result<HttpResponse> {
    let team = team_id(&req)?;
    let opponent = query
        .opponent
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(EngineError::MissingParameter { name: "opponent" })?;
    let boat_class = query
        .boat_class
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(EngineError::MissingParameter { name: "boatClass" })?;

    let db = lock_db(&state)?;
    let comparison =
        engine::build_head_to_head(&db, team, opponent, boat_class, query.season.as_deref())?;
    Ok(HttpResponse::Ok().json(HeadToHeadResponse { comparison }))
}

/// `POST /calculate/{boat_class}` with optional `{"season": ..}` body.
pub async fn calculate(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    body: Option<web::Json<CalculateBody>>,
) -> Result<HttpResponse> {
    let team = team_id(&req)?;
    let boat_class = path.into_inner();
    let season = body.and_then(|b| b.into_inner().season);

    let mut db = lock_db(&state)?;
    let estimate = engine::calculate_estimate(
        &mut db,
        state.model.as_ref(),
        team,
        &boat_class,
        season.as_deref(),
    )?;
    Ok(HttpResponse::Ok().json(CalculateResponse { estimate }))
}

/// `GET /analyze-race/{race_id}`
pub async fn analyze_race(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let team = team_id(&req)?;
    let race_id = RaceId::new(path.into_inner());

    let db = lock_db(&state)?;
    let analysis = engine::analyze_race(&db, state.model.as_ref(), team, race_id)?;
    Ok(HttpResponse::Ok().json(analysis))
}
