use crate::{
    error::EditorError,
    session::{RuleSession, RuleSnapshot, Tagged},
    shared::usecase::{execute, Subscriber, UseCase},
};
use recurrence_editor_api_structs::codec::CodecError;
use recurrence_editor_domain::{validate_in, RecurrenceRule, SeriesStatus};
use recurrence_editor_infra::RecurrenceContext;
use tracing::info;

pub(crate) fn handle_error(e: UseCaseErrors) -> EditorError {
    match e {
        UseCaseErrors::Codec(e) => EditorError::Codec(e),
        UseCaseErrors::ServiceUnavailable(e) => EditorError::ServiceUnavailable(e.to_string()),
    }
}

pub async fn check_series_status(
    session: &RuleSession,
    ctx: &RecurrenceContext,
) -> Result<Tagged<SeriesStatus>, EditorError> {
    let usecase = CheckSeriesStatusUseCase {
        rule: session.rule().clone(),
    };

    execute(usecase, ctx).await.map_err(handle_error)
}

/// Status of the series described by a rule. A rule failing validation is
/// answered locally with the validation message, only valid rules are sent
/// to the occurrence service.
#[derive(Debug)]
pub struct CheckSeriesStatusUseCase {
    pub rule: RecurrenceRule,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    Codec(CodecError),
    ServiceUnavailable(anyhow::Error),
}

#[async_trait::async_trait(?Send)]
impl UseCase for CheckSeriesStatusUseCase {
    type Response = Tagged<SeriesStatus>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &RecurrenceContext) -> Result<Self::Response, Self::Errors> {
        let snapshot = RuleSnapshot::new(&self.rule).map_err(UseCaseErrors::Codec)?;

        let status = match validate_in(&self.rule, &ctx.config.timezone) {
            Some(e) => SeriesStatus {
                valid: false,
                status_text: e.to_string(),
            },
            None => ctx
                .occurrence_service
                .status(snapshot.serialized())
                .await
                .map_err(UseCaseErrors::ServiceUnavailable)?,
        };

        Ok(Tagged {
            snapshot,
            value: status,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(LogRejectedSeries)]
    }
}

pub struct LogRejectedSeries;

#[async_trait::async_trait(?Send)]
impl Subscriber<CheckSeriesStatusUseCase> for LogRejectedSeries {
    async fn notify(&self, e: &Tagged<SeriesStatus>, _ctx: &RecurrenceContext) {
        if !e.value.valid {
            info!(
                "Series was rejected: `{}`. Rule: {}",
                e.value.status_text,
                e.snapshot.serialized()
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use recurrence_editor_domain::{PatternType, WeekDay};
    use recurrence_editor_infra::InMemoryOccurrenceService;
    use std::sync::Arc;

    const NOW: i64 = 1_710_504_000_000;

    fn setup() -> (RecurrenceContext, Arc<InMemoryOccurrenceService>) {
        let service = Arc::new(InMemoryOccurrenceService::new());
        (RecurrenceContext::create_inmemory(NOW, service.clone()), service)
    }

    #[tokio::test]
    async fn asks_the_service_about_valid_rules() {
        let (ctx, service) = setup();
        service.set_status(SeriesStatus {
            valid: true,
            status_text: "10 occurrences".into(),
        });
        let mut session = RuleSession::new(&ctx);
        session
            .editor_mut()
            .set_pattern_type(PatternType::Weekly)
            .unwrap();

        let res = check_series_status(&session, &ctx).await.unwrap();
        let status = session.accept(res).unwrap();
        assert!(status.valid);
        assert_eq!(status.status_text, "10 occurrences");
        assert_eq!(service.requests().len(), 1);
    }

    #[tokio::test]
    async fn answers_invalid_rules_locally() {
        let (ctx, service) = setup();
        let mut session = RuleSession::new(&ctx);
        session
            .editor_mut()
            .set_pattern_type(PatternType::Weekly)
            .unwrap();
        session
            .editor_mut()
            .toggle_week_day(WeekDay::Friday, false)
            .unwrap();

        let res = check_series_status(&session, &ctx).await.unwrap();
        assert_eq!(
            res.value,
            SeriesStatus {
                valid: false,
                status_text: "No weekday specified".into(),
            }
        );
        assert!(service.requests().is_empty());
    }

    #[tokio::test]
    async fn series_end_is_checked_in_the_configured_zone() {
        let (mut ctx, service) = setup();
        ctx.config.timezone = "America/New_York".parse().unwrap();
        let mut session = RuleSession::new(&ctx);
        session
            .editor_mut()
            .set_pattern_type(PatternType::Weekly)
            .unwrap();
        // 03:00 UTC on the start day, still the day before in New York
        session
            .editor_mut()
            .set_series_end_date(NOW - 9 * 3_600_000)
            .unwrap();

        let res = check_series_status(&session, &ctx).await.unwrap();
        assert!(!res.value.valid);
        assert_eq!(res.value.status_text, "The series ends before it starts");
        assert!(service.requests().is_empty());
    }
}
