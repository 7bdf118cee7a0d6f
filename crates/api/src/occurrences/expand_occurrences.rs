use crate::{
    error::EditorError,
    session::{RuleSession, RuleSnapshot, Tagged},
    shared::usecase::{execute, UseCase},
};
use recurrence_editor_api_structs::codec::CodecError;
use recurrence_editor_domain::{validate_in, Occurrences, RecurrenceRule, ValidationError};
use recurrence_editor_infra::RecurrenceContext;

fn handle_error(e: UseCaseErrors) -> EditorError {
    match e {
        UseCaseErrors::InvalidRule(e) => EditorError::InvalidRule(e),
        UseCaseErrors::Codec(e) => EditorError::Codec(e),
        UseCaseErrors::ServiceUnavailable(e) => EditorError::ServiceUnavailable(e.to_string()),
    }
}

/// Asks the occurrence service for the dates of the rule currently being
/// edited. The response is tagged with the snapshot it was computed for,
/// pass it to `RuleSession::accept` once it arrives.
pub async fn expand_occurrences(
    session: &RuleSession,
    ctx: &RecurrenceContext,
) -> Result<Tagged<Occurrences>, EditorError> {
    let usecase = ExpandOccurrencesUseCase {
        rule: session.rule().clone(),
    };

    execute(usecase, ctx).await.map_err(handle_error)
}

#[derive(Debug)]
pub struct ExpandOccurrencesUseCase {
    pub rule: RecurrenceRule,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InvalidRule(ValidationError),
    Codec(CodecError),
    ServiceUnavailable(anyhow::Error),
}

#[async_trait::async_trait(?Send)]
impl UseCase for ExpandOccurrencesUseCase {
    type Response = Tagged<Occurrences>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &RecurrenceContext) -> Result<Self::Response, Self::Errors> {
        if let Some(e) = validate_in(&self.rule, &ctx.config.timezone) {
            return Err(UseCaseErrors::InvalidRule(e));
        }
        let snapshot = RuleSnapshot::new(&self.rule).map_err(UseCaseErrors::Codec)?;

        let occurrences = ctx
            .occurrence_service
            .expand(snapshot.serialized())
            .await
            .map_err(UseCaseErrors::ServiceUnavailable)?;

        Ok(Tagged {
            snapshot,
            value: occurrences,
        })
    }
}
