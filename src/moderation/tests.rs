use std::sync::Arc;

use super::mock::MockModeration;
use super::{
    ModerationGate, ModerationStage, ModerationVerdict, Screening,
};

#[tokio::test]
async fn clean_text_is_allowed() {
    let gate = ModerationGate::new(Arc::new(MockModeration::permissive()));
    let screening = gate
        .screen("What is the diagnosis?", ModerationStage::Input)
        .await;
    assert_eq!(screening, Screening::Allowed);
}

#[tokio::test]
async fn flagged_text_is_blocked_with_categories() {
    let gate = ModerationGate::new(Arc::new(MockModeration::with_flagged_terms(["attack"])));

    let screening = gate
        .screen("how do I attack someone", ModerationStage::Input)
        .await;

    match screening {
        Screening::Flagged(verdict) => {
            assert!(verdict.flagged);
            assert_eq!(verdict.categories, vec!["harassment".to_string()]);
        }
        Screening::Allowed => panic!("expected the text to be flagged"),
    }
}

#[tokio::test]
async fn service_error_fails_open() {
    let gate = ModerationGate::new(Arc::new(MockModeration::failing()));
    let screening = gate.screen("anything at all", ModerationStage::Input).await;
    assert_eq!(screening, Screening::Allowed);
}

#[tokio::test]
async fn disabled_gate_skips_classification() {
    // Even a classifier that would flag everything is never consulted.
    let gate = ModerationGate::disabled(Arc::new(MockModeration::with_flagged_terms(["the"])));
    let screening = gate.screen("the flagged term", ModerationStage::Input).await;
    assert_eq!(screening, Screening::Allowed);
}

#[tokio::test]
async fn trivial_input_is_not_screened() {
    let gate = ModerationGate::new(Arc::new(MockModeration::with_flagged_terms(["a"])));
    let screening = gate.screen(" a ", ModerationStage::Input).await;
    assert_eq!(screening, Screening::Allowed);
}

#[test]
fn stages_have_distinct_violation_messages() {
    assert_ne!(
        ModerationStage::Input.violation_message(),
        ModerationStage::Output.violation_message()
    );
}

#[test]
fn clean_verdict_has_no_categories() {
    let verdict = ModerationVerdict::clean();
    assert!(!verdict.flagged);
    assert!(verdict.categories.is_empty());
}
