use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::analysis::Projector;
use crate::error::CarbonError;
use crate::models::{ProjectionResult, YearlyTotal};

use super::state::AppState;

// ---------------------------------------------------------------------------
// Error wrapper
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
    details: String,
}

#[derive(Debug)]
pub(crate) struct WebError(CarbonError);

impl From<CarbonError> for WebError {
    fn from(e: CarbonError) -> Self {
        WebError(e)
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_type) = match &self.0 {
            CarbonError::InvalidInput(_) | CarbonError::ParseError(_) => {
                (actix_web::http::StatusCode::BAD_REQUEST, "Bad Request")
            }
            CarbonError::UnknownSpecies(_) => {
                (actix_web::http::StatusCode::NOT_FOUND, "Not Found")
            }
            CarbonError::MissingField { .. } | CarbonError::EmptyHorizon { .. } => (
                actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
                "Unprocessable Entity",
            ),
            _ => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            ),
        };
        HttpResponse::build(status).json(ErrorBody {
            error: error_type.to_string(),
            details: self.0.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
pub struct SpeciesResponse {
    species: Vec<String>,
}

#[derive(Deserialize)]
pub struct SimulateRequest {
    species: String,
    years: Option<u32>,
    trees: Option<u32>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Serialize, Deserialize)]
pub struct SimulateResponse {
    result: ProjectionResult,
    summary: String,
}

#[derive(Deserialize)]
pub struct CompareRequest {
    species: Vec<String>,
    years: Option<u32>,
    trees: Option<u32>,
}

#[derive(Serialize, Deserialize)]
pub struct CompareResponse {
    results: Vec<ProjectionResult>,
    totals: Vec<YearlyTotal>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn species(state: web::Data<AppState>) -> HttpResponse {
    let species = state.repository.species_ids().into_iter().collect();
    HttpResponse::Ok().json(SpeciesResponse { species })
}

pub async fn simulate(
    state: web::Data<AppState>,
    body: web::Json<SimulateRequest>,
) -> Result<HttpResponse, WebError> {
    let body = body.into_inner();
    let years = body.years.unwrap_or(state.defaults.years);
    let trees = body.trees.unwrap_or(state.defaults.trees);
    let projector = Projector::new(state.repository.as_ref());

    let result = match (body.lat, body.lon) {
        (Some(lat), Some(lon)) => projector.project_at(
            &body.species,
            years,
            trees,
            state.climate.as_ref(),
            lat,
            lon,
        )?,
        (None, None) => projector.project(&body.species, years, trees, None)?,
        _ => {
            return Err(WebError(CarbonError::InvalidInput(
                "lat and lon must be given together".to_string(),
            )))
        }
    };

    let summary = result.summary(trees, years);
    Ok(HttpResponse::Ok().json(SimulateResponse { result, summary }))
}

pub async fn compare(
    state: web::Data<AppState>,
    body: web::Json<CompareRequest>,
) -> Result<HttpResponse, WebError> {
    if body.species.is_empty() {
        return Err(WebError(CarbonError::InvalidInput(
            "at least one species is required".to_string(),
        )));
    }
    let years = body.years.unwrap_or(state.defaults.years);
    let trees = body.trees.unwrap_or(state.defaults.trees);
    let projector = Projector::new(state.repository.as_ref());
    let (results, totals) = projector.compare(&body.species, years, trees)?;
    Ok(HttpResponse::Ok().json(CompareResponse { results, totals }))
}
