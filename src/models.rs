// src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User-facing message returned with every failed analysis.
pub const ANALYSIS_FAILED_MESSAGE: &str = "No se pudo analizar la gráfica. Por favor, asegúrate de que la imagen sea clara y contenga una gráfica matemática visible.";

pub const GENERIC_FAILURE_MESSAGE: &str = "Error al analizar la gráfica. Por favor, intenta de nuevo.";
pub const UNEXPECTED_FORMAT_MESSAGE: &str = "La respuesta del servidor no tiene el formato esperado.";
pub const CONNECTION_FAILURE_MESSAGE: &str = "Error de conexión. Por favor, verifica tu conexión a internet e intenta de nuevo.";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AnalysisRequest {
    pub image: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub equation: String,
    pub graph_type: String,
    pub steps: Vec<Step>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Step {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    /// Wraps a diagnostic in the fixed user-facing analysis failure message.
    pub fn analysis_failed(details: impl Into<String>) -> Self {
        Self {
            error: ANALYSIS_FAILED_MESSAGE.to_string(),
            details: details.into(),
        }
    }
}

/// Decides what the client shows for an `/api/analyze` response.
///
/// An `error` field or a non-success status wins over everything else. A
/// success body must carry a non-empty `equation`, a non-empty `graphType` and
/// a `steps` array; anything short of that is a format error, never a result.
pub fn interpret_response(success: bool, body: &Value) -> Result<AnalysisResult, String> {
    let error = body.get("error").filter(|e| is_truthy(e));
    if error.is_some() || !success {
        return Err(error
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()));
    }

    let present = ["equation", "steps", "graphType"]
        .iter()
        .all(|key| body.get(*key).is_some_and(is_truthy));
    if !present {
        return Err(UNEXPECTED_FORMAT_MESSAGE.to_string());
    }

    serde_json::from_value(body.clone()).map_err(|e| {
        log::warn!("Analysis response has the required keys but the wrong shape: {}", e);
        UNEXPECTED_FORMAT_MESSAGE.to_string()
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
