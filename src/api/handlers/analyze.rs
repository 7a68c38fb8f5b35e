// src/api/handlers/analyze.rs
use actix_web::{error::InternalError, web, HttpResponse, Result};
use uuid::Uuid;
use crate::analyzer;
use crate::api::AppState;
use crate::errors::AnalyzeError;
use crate::models::{AnalysisRequest, ErrorResponse};
use crate::upload::DataUrl;

pub async fn analyze(
    state: web::Data<AppState>,
    req: web::Json<AnalysisRequest>,
) -> Result<HttpResponse> {
    let analysis_id = Uuid::new_v4();
    let image = req.into_inner().image;

    let outcome = match DataUrl::parse(&image) {
        Ok(image) => analyzer::analyze_graph(&state.config, &state.client, &image).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => {
            log::info!("[{}] Analysis completed", analysis_id);
            Ok(HttpResponse::Ok().json(result))
        }
        Err(e) => {
            log::error!("[{}] Error in analyze API: {}", analysis_id, e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse::analysis_failed(e.to_string())))
        }
    }
}

/// Body limits and decoding failures for `/api/analyze` answer with the same
/// error envelope as a failed analysis.
pub fn analyze_json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let details = AnalyzeError::InvalidRequest(err.to_string()).to_string();
            log::error!("Rejected analyze request: {}", details);
            let response = HttpResponse::InternalServerError()
                .json(ErrorResponse::analysis_failed(details));
            InternalError::from_response(err, response).into()
        })
}
