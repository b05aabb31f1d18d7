//! The intent branch decision.
//!
//! After classification the pipeline either continues to SQL generation or
//! terminates early. The decision deliberately favors the database path:
//! only a confident off-topic verdict short-circuits, so an ambiguous
//! classification still attempts query generation.

use super::state::PipelineState;

/// Minimum confidence (exclusive) for an off-topic verdict to end the run.
pub const SHORT_CIRCUIT_CONFIDENCE: f64 = 0.7;

/// Outcome of the post-classification branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchState {
    /// Classification has not run yet.
    Pending,
    /// Continue to SQL generation.
    ProceedToSql,
    /// Confident off-topic verdict; skip the remaining stages.
    ShortCircuitEnd,
    /// A stage recorded an error; the run is over.
    Failed,
}

/// Evaluates the branch for a state that has passed the ClassifyIntent stage.
pub fn decide_after_intent(state: &PipelineState) -> BranchState {
    if state.has_error() {
        return BranchState::Failed;
    }

    match &state.intent {
        Some(intent)
            if !intent.is_database_related && intent.confidence > SHORT_CIRCUIT_CONFIDENCE =>
        {
            BranchState::ShortCircuitEnd
        }
        Some(_) => BranchState::ProceedToSql,
        // No verdict recorded and no error: treat as ambiguous and proceed.
        None => BranchState::ProceedToSql,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::state::QuestionIntent;

    fn state_with_intent(intent: QuestionIntent) -> PipelineState {
        let mut state = PipelineState::new("q");
        state.intent = Some(intent);
        state
    }

    #[test]
    fn test_confident_off_topic_short_circuits() {
        let state = state_with_intent(QuestionIntent::off_topic(0.9));
        assert_eq!(decide_after_intent(&state), BranchState::ShortCircuitEnd);
    }

    #[test]
    fn test_database_related_proceeds() {
        let state = state_with_intent(QuestionIntent::database_related(0.95));
        assert_eq!(decide_after_intent(&state), BranchState::ProceedToSql);
    }

    #[test]
    fn test_ambiguous_off_topic_proceeds() {
        let state = state_with_intent(QuestionIntent::off_topic(0.5));
        assert_eq!(decide_after_intent(&state), BranchState::ProceedToSql);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Exactly 0.7 is not confident enough to short-circuit.
        let state = state_with_intent(QuestionIntent::off_topic(0.7));
        assert_eq!(decide_after_intent(&state), BranchState::ProceedToSql);
    }

    #[test]
    fn test_error_wins_over_intent() {
        let mut state = state_with_intent(QuestionIntent::off_topic(0.99));
        state.error = Some("Intent classification failed: boom".to_string());
        assert_eq!(decide_after_intent(&state), BranchState::Failed);
    }
}
