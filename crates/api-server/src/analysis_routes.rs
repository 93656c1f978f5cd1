//! Causal analysis, recommendation, and sector endpoints, plus the
//! authenticated saved-analysis CRUD.

use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{
    extract::{Path, State},
    middleware, Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use analysis_core::{CausalAnalysis, Recommendation, SavedAnalysis, SectorReport};
use analysis_store::SaveAnalysisFields;

use crate::auth::{self, CurrentUser};
use crate::{AppError, AppState};

#[derive(Deserialize)]
pub struct SaveAnalysisRequest {
    pub symbol: String,
    pub name: Option<String>,
    pub recommendation: Option<String>,
    pub notes: Option<String>,
    pub factors: Option<serde_json::Value>,
}

pub fn analysis_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/analysis/save", post(save_analysis))
        .route("/api/analysis/saved", get(list_saved))
        .route("/api/analysis/saved/:id", delete(delete_saved))
        .layer(middleware::from_fn_with_state(state, auth::require_auth));

    Router::new()
        .route("/api/analysis/causal/:symbol", get(causal_analysis))
        .route("/api/analysis/recommendation/:symbol", get(recommendation))
        .route("/api/analysis/sector/:sector", get(sector_analysis))
        .merge(protected)
}

fn normalized_symbol(raw: &str) -> Result<String, AppError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("Stock symbol is required".to_string()));
    }
    Ok(symbol)
}

async fn causal_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<CausalAnalysis>, AppError> {
    let symbol = normalized_symbol(&symbol)?;
    Ok(Json(state.analyzer.analyze(&symbol).await))
}

async fn recommendation(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Recommendation>, AppError> {
    let symbol = normalized_symbol(&symbol)?;
    let rec = state.recommender.recommend(&symbol, None).await?;
    Ok(Json(rec))
}

async fn sector_analysis(
    State(state): State<AppState>,
    Path(sector): Path<String>,
) -> Result<Json<SectorReport>, AppError> {
    let sector = sector.trim().to_string();
    if sector.is_empty() {
        return Err(AppError::BadRequest("Sector name is required".to_string()));
    }
    Ok(Json(state.sectors.analyze_sector(&sector).await))
}

async fn save_analysis(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<SaveAnalysisRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let symbol = normalized_symbol(&body.symbol)?;

    let record = state
        .store
        .upsert_analysis(
            user.id,
            &symbol,
            SaveAnalysisFields {
                name: body.name,
                recommendation: body.recommendation,
                notes: body.notes,
                factors: body.factors,
            },
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Analysis saved successfully",
            "analysis": record.into_api(),
        })),
    ))
}

async fn list_saved(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<SavedAnalysis>>, AppError> {
    let records = state.store.list_analyses(user.id).await?;
    Ok(Json(records.into_iter().map(|r| r.into_api()).collect()))
}

/// Ids are numeric on the wire; anything else can't name a stored row, so it
/// reads as not-found, the same as a numeric id with no row behind it.
fn parse_saved_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Analysis not found".to_string()))
}

async fn delete_saved(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_saved_id(&id)?;

    state.store.delete_analysis(user.id, id).await?;
    Ok(Json(json!({ "message": "Analysis deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_id_parsing() {
        assert_eq!(parse_saved_id("42").unwrap(), 42);

        // Malformed ids are indistinguishable from missing rows.
        assert!(matches!(
            parse_saved_id("not-a-number"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(parse_saved_id(""), Err(AppError::NotFound(_))));
    }
}
