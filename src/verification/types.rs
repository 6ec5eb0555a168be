use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::VerifyError;
use crate::chunking::BBox;

/// Relative weight of each verification signal in the combined confidence.
///
/// Weights are configuration, not constants: they must be non-negative and
/// sum to 1 so the combined score stays in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub grounding: f32,
    pub consistency: f32,
    pub relevance: f32,
    pub domain: f32,
}

impl Default for SignalWeights {
    /// Grounding carries the largest weight: it is the direct
    /// hallucination signal.
    fn default() -> Self {
        Self {
            grounding: 0.4,
            consistency: 0.2,
            relevance: 0.2,
            domain: 0.2,
        }
    }
}

impl SignalWeights {
    pub fn validate(&self) -> Result<(), VerifyError> {
        let weights = [self.grounding, self.consistency, self.relevance, self.domain];

        if weights.iter().any(|w| *w < 0.0) {
            return Err(VerifyError::InvalidConfig {
                reason: "signal weights must be non-negative".to_string(),
            });
        }

        let sum: f32 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-4 {
            return Err(VerifyError::InvalidConfig {
                reason: format!("signal weights must sum to 1.0, got {sum}"),
            });
        }

        Ok(())
    }
}

/// Topic vocabulary the answer is expected to stay within.
///
/// Opaque to the verifier beyond membership checks; an empty term set
/// disables the domain signal (it scores 1.0).
#[derive(Debug, Clone, Default)]
pub struct DomainDescriptor {
    pub name: String,
    pub terms: HashSet<String>,
}

impl DomainDescriptor {
    pub fn new(name: impl Into<String>, terms: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            terms: terms.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// No vocabulary restriction; the domain signal always scores 1.0.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Clinical/medical vocabulary used by the default deployment.
    pub fn medical() -> Self {
        const TERMS: &[&str] = &[
            "diagnosis", "diagnosed", "patient", "treatment", "symptom", "symptoms",
            "prescribed", "prescription", "medication", "medications", "dose", "dosage", "mg",
            "ml", "blood", "pressure", "glucose", "diabetes", "hypertension", "chronic",
            "acute", "clinical", "medical", "lab", "labs", "test", "tests", "result",
            "results", "history", "exam", "examination", "physician", "doctor", "hospital",
            "discharge", "admission", "allergy", "allergies", "therapy", "surgery",
            "procedure", "imaging", "scan", "mri", "ct", "xray", "ultrasound", "prognosis",
            "condition", "disease", "disorder", "syndrome", "infection", "fever", "pain",
            "heart", "cardiac", "renal", "hepatic", "pulmonary", "respiratory", "oncology",
            "tumor", "cancer", "biopsy", "pathology", "radiology", "vitals", "pulse",
            "temperature", "weight", "height", "bmi", "cholesterol", "a1c", "hba1c",
            "insulin", "metformin", "documents", "record", "records", "report",
        ];
        Self::new("medical", TERMS.iter().map(|t| t.to_string()))
    }
}

/// One supporting passage cited for the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// 1-based source page.
    pub page_number: u32,
    /// Verbatim passage text, exactly as retrieved.
    pub exact_chunk: String,
    pub bbox: Option<BBox>,
    /// `exact_chunk` with the tokens shared with the answer wrapped in
    /// `**..**`; `exact_chunk` itself is never altered.
    pub highlighted: String,
}

/// Outcome of answer verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Weighted combination of the four signals, in `[0, 1]`.
    pub confidence_score: f32,
    pub grounding_score: f32,
    pub consistency_score: f32,
    pub relevance_score: f32,
    pub domain_score: f32,
    /// `confidence_score >= confidence_threshold`.
    pub meets_threshold: bool,
    /// One entry per passage judged to support the answer, in passage order.
    pub evidence: Vec<Evidence>,
}

impl VerificationReport {
    /// All five scores, for range assertions.
    pub fn scores(&self) -> [f32; 5] {
        [
            self.confidence_score,
            self.grounding_score,
            self.consistency_score,
            self.relevance_score,
            self.domain_score,
        ]
    }
}
