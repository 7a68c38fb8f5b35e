// src/session.rs
//! Client-side analysis flow: one image at a time, four visible states.

use thiserror::Error;
use crate::models::AnalysisResult;

/// What the user currently sees. The uploaded image stays on screen in every
/// state except `Idle`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Analyzing { image: String },
    Result { image: String, result: AnalysisResult },
    Error { image: String, message: String },
}

impl AnalysisState {
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisState::Idle => "idle",
            AnalysisState::Analyzing { .. } => "analyzing",
            AnalysisState::Result { .. } => "result",
            AnalysisState::Error { .. } => "error",
        }
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            AnalysisState::Idle => None,
            AnalysisState::Analyzing { image }
            | AnalysisState::Result { image, .. }
            | AnalysisState::Error { image, .. } => Some(image),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("cannot start an analysis while the session is {0}")]
    Busy(&'static str),

    #[error("no analysis is in flight (session is {0})")]
    NotAnalyzing(&'static str),
}

#[derive(Debug, Default)]
pub struct Session {
    state: AnalysisState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// Idle -> Analyzing. A new upload is only possible from Idle, so at most
    /// one analysis is ever in flight.
    pub fn begin(&mut self, image: String) -> Result<(), SessionError> {
        if self.state != AnalysisState::Idle {
            return Err(SessionError::Busy(self.state.name()));
        }
        self.state = AnalysisState::Analyzing { image };
        Ok(())
    }

    /// Analyzing -> Result | Error.
    pub fn finish(&mut self, outcome: Result<AnalysisResult, String>) -> Result<(), SessionError> {
        let image = match std::mem::take(&mut self.state) {
            AnalysisState::Analyzing { image } => image,
            other => {
                let name = other.name();
                self.state = other;
                return Err(SessionError::NotAnalyzing(name));
            }
        };

        self.state = match outcome {
            Ok(result) => AnalysisState::Result { image, result },
            Err(message) => AnalysisState::Error { image, message },
        };
        Ok(())
    }

    /// Back to Idle with image, result and error cleared.
    pub fn reset(&mut self) {
        self.state = AnalysisState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Step;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            equation: "y = 2x + 1".to_string(),
            graph_type: "lineal".to_string(),
            steps: vec![Step {
                title: "Paso 1".to_string(),
                description: "...".to_string(),
                formula: None,
            }],
        }
    }

    #[test]
    fn test_success_path() {
        let mut session = Session::new();
        assert_eq!(session.state(), &AnalysisState::Idle);

        session.begin("data:image/png;base64,AAAA".to_string()).unwrap();
        assert_eq!(session.state().name(), "analyzing");

        session.finish(Ok(sample_result())).unwrap();
        match session.state() {
            AnalysisState::Result { image, result } => {
                assert_eq!(image, "data:image/png;base64,AAAA");
                assert_eq!(result.equation, "y = 2x + 1");
            }
            other => panic!("expected result, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_path_keeps_image() {
        let mut session = Session::new();
        session.begin("img".to_string()).unwrap();
        session.finish(Err("sin conexión".to_string())).unwrap();

        assert_eq!(
            session.state(),
            &AnalysisState::Error { image: "img".to_string(), message: "sin conexión".to_string() }
        );
        assert_eq!(session.state().image(), Some("img"));
    }

    #[test]
    fn test_only_one_analysis_in_flight() {
        let mut session = Session::new();
        session.begin("first".to_string()).unwrap();

        assert_eq!(session.begin("second".to_string()), Err(SessionError::Busy("analyzing")));
        assert_eq!(session.state().image(), Some("first"));
    }

    #[test]
    fn test_new_upload_requires_reset_after_result() {
        let mut session = Session::new();
        session.begin("first".to_string()).unwrap();
        session.finish(Ok(sample_result())).unwrap();

        assert_eq!(session.begin("second".to_string()), Err(SessionError::Busy("result")));
    }

    #[test]
    fn test_finish_without_begin_is_rejected() {
        let mut session = Session::new();
        assert_eq!(session.finish(Ok(sample_result())), Err(SessionError::NotAnalyzing("idle")));
        assert_eq!(session.state(), &AnalysisState::Idle);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut from_result = Session::new();
        from_result.begin("a".to_string()).unwrap();
        from_result.finish(Ok(sample_result())).unwrap();
        from_result.reset();
        assert_eq!(from_result.state(), &AnalysisState::Idle);
        assert_eq!(from_result.state().image(), None);

        let mut from_error = Session::new();
        from_error.begin("b".to_string()).unwrap();
        from_error.finish(Err("fallo".to_string())).unwrap();
        from_error.reset();
        assert_eq!(from_error.state(), &AnalysisState::Idle);

        from_error.begin("c".to_string()).unwrap();
        assert_eq!(from_error.state().name(), "analyzing");
    }
}
