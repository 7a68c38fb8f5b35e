// src/render.rs
//! Plain-text rendering of the analysis states for the terminal front-end.

use std::fmt;
use crate::models::AnalysisResult;
use crate::session::AnalysisState;

pub fn render_state(state: &AnalysisState) -> String {
    match state {
        AnalysisState::Idle => {
            "Sube una imagen de cualquier gráfica matemática (PNG, JPG, GIF) para obtener su ecuación.\n"
                .to_string()
        }
        AnalysisState::Analyzing { .. } => {
            "Analizando gráfica...\nIdentificando patrones y calculando la ecuación\n".to_string()
        }
        AnalysisState::Error { message, .. } => {
            format!("Error en el Análisis\n{}\n\nIntentar de nuevo: vuelve a ejecutar con otra imagen.\n", message)
        }
        AnalysisState::Result { result, .. } => render_result(result),
    }
}

pub fn render_result(result: &AnalysisResult) -> String {
    ResultView(result).to_string()
}

/// Equation card followed by the numbered derivation steps.
struct ResultView<'a>(&'a AnalysisResult);

impl fmt::Display for ResultView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "Ecuación Identificada")?;
        writeln!(f, "Tipo: {}", result.graph_type)?;
        writeln!(f)?;
        writeln!(f, "    {}", result.equation)?;
        writeln!(f)?;
        writeln!(f, "Análisis Paso a Paso")?;

        for (index, step) in result.steps.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "{:>2}. {}", index + 1, step.title)?;
            writeln!(f, "    {}", step.description)?;
            if let Some(formula) = step.formula.as_deref().filter(|s| !s.is_empty()) {
                writeln!(f, "    | {}", formula)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Step;

    #[test]
    fn test_render_straight_line_result() {
        let result = AnalysisResult {
            equation: "y = 2x + 1".to_string(),
            graph_type: "lineal".to_string(),
            steps: vec![Step {
                title: "Paso 1".to_string(),
                description: "...".to_string(),
                formula: None,
            }],
        };

        let out = render_state(&AnalysisState::Result { image: "img".to_string(), result });

        assert!(out.contains("y = 2x + 1"));
        assert!(out.contains("Tipo: lineal"));
        assert_eq!(out.matches("Paso 1").count(), 1);
        assert!(out.contains(" 1. Paso 1"));
        assert!(!out.contains(" 2. "));
        assert!(!out.contains("| "));
    }

    #[test]
    fn test_render_formula_when_present() {
        let result = AnalysisResult {
            equation: "y = x^2".to_string(),
            graph_type: "cuadrática".to_string(),
            steps: vec![
                Step {
                    title: "Vértice".to_string(),
                    description: "El vértice está en el origen".to_string(),
                    formula: Some("V = (0, 0)".to_string()),
                },
                Step {
                    title: "Apertura".to_string(),
                    description: "Abre hacia arriba".to_string(),
                    formula: Some(String::new()),
                },
            ],
        };

        let out = render_result(&result);
        assert!(out.contains("    | V = (0, 0)"));
        assert_eq!(out.matches("| ").count(), 1);
        assert!(out.contains(" 2. Apertura"));
    }

    #[test]
    fn test_render_result_layout() {
        let result = AnalysisResult {
            equation: "y = 2x + 1".to_string(),
            graph_type: "lineal".to_string(),
            steps: vec![Step {
                title: "Pendiente".to_string(),
                description: "Sube 2 por cada unidad".to_string(),
                formula: Some("m = 2".to_string()),
            }],
        };

        assert_eq!(
            render_result(&result),
            "Ecuación Identificada\nTipo: lineal\n\n    y = 2x + 1\n\nAnálisis Paso a Paso\n\n 1. Pendiente\n    Sube 2 por cada unidad\n    | m = 2\n"
        );
    }

    #[test]
    fn test_render_error_and_progress() {
        let error = AnalysisState::Error { image: "img".to_string(), message: "sin conexión".to_string() };
        assert!(render_state(&error).starts_with("Error en el Análisis\nsin conexión"));

        let analyzing = AnalysisState::Analyzing { image: "img".to_string() };
        assert!(render_state(&analyzing).starts_with("Analizando gráfica..."));
    }
}
