mod encoding;

pub use encoding::{encode_line, EncodedLine};

use super::domain::Dimension;
use super::history::TIMESTAMP_FORMAT;
use super::service::AssessmentOutcome;

/// Self-contained report document, ready for file-save or transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    bytes: Vec<u8>,
    degraded: bool,
}

impl RenderedReport {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Whether any character substitution occurred. Informational only;
    /// the document is complete either way.
    pub fn degraded(&self) -> bool {
        self.degraded
    }
}

/// Lays out the assessment as a portable latin-1 text document.
///
/// Rendering never fails: lines that cannot be encoded losslessly go
/// through the transliteration chain and come out degraded, not absent.
#[derive(Debug, Default)]
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, outcome: &AssessmentOutcome) -> RenderedReport {
        let mut lines = Vec::new();

        lines.push("FFS Assessment Report".to_string());
        lines.push("=====================".to_string());
        lines.push(String::new());
        lines.push(format!(
            "Date: {}",
            outcome.timestamp.format(TIMESTAMP_FORMAT)
        ));
        lines.push(format!("Context: {}", outcome.context));
        lines.push(format!("Overall FFS: {:.2}", outcome.composite));
        if let Some(delta) = &outcome.delta {
            lines.push(format!("Change from previous: {:+.2}", delta.composite));
        }

        lines.push(String::new());
        lines.push("Component Scores:".to_string());
        for dimension in Dimension::ordered() {
            let mut line = format!(
                "  {}: {:.1}/10",
                dimension.label(),
                outcome.scores.get(dimension)
            );
            if let Some(delta) = &outcome.delta {
                line.push_str(&format!(" ({:+.1})", delta.dimension(dimension)));
            }
            lines.push(line);
        }

        if !outcome.recommendations.is_empty() {
            lines.push(String::new());
            lines.push("Recommendations:".to_string());
            for (dimension, guidance) in &outcome.recommendations {
                lines.push(String::new());
                lines.push(format!("{}:", dimension.label()));
                for (index, advice) in guidance.iter().enumerate() {
                    lines.push(format!("  {}. {}", index + 1, advice));
                }
            }
        }

        let mut bytes = Vec::new();
        let mut degraded = false;
        for line in &lines {
            let encoded = encode_line(line);
            degraded |= encoded.degraded;
            bytes.extend(encoded.bytes);
            bytes.push(b'\n');
        }

        RenderedReport { bytes, degraded }
    }
}
