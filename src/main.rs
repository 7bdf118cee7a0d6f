mod telemetry;

use recurrence_editor_api::{check_series_status, expand_occurrences, RuleSession};
use recurrence_editor_api_structs::{
    dtos::{OccurrenceDTO, SeriesStatusDTO},
    legacy,
};
use recurrence_editor_infra::setup_context;
use serde_json::json;
use std::io::Read;
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

const USAGE: &str = "Usage: recurrence_editor [--expand] [--status] [--legacy] < rule";

/// Reads a serialized rule (JSON or the legacy pipe format) from stdin and
/// prints it normalized, together with its validation result. With
/// `--expand` or `--status` the rule is also sent to the occurrence service
/// configured through `OCCURRENCE_SERVICE_URL`.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("recurrence_editor".into(), "info".into());
    init_subscriber(subscriber);

    let mut expand = false;
    let mut status = false;
    let mut legacy_output = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--expand" => expand = true,
            "--status" => status = true,
            "--legacy" => legacy_output = true,
            _ => {
                eprintln!("{}", USAGE);
                std::process::exit(2);
            }
        }
    }

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let ctx = setup_context();
    let session = RuleSession::from_serialized(input.trim(), &ctx);
    info!("Loaded a {:?} rule", session.rule().pattern_type());

    let serialized = if legacy_output {
        legacy::encode(session.rule())?
    } else {
        session.serialize()?
    };
    let mut output = json!({
        "rule": serialized,
        "validationError": session.editor().validate().map(|e| e.to_string()),
    });

    if expand {
        let res = expand_occurrences(&session, &ctx).await?;
        let occurrences = session.accept(res)?;
        output["occurrences"] = serde_json::to_value(
            occurrences
                .inner()
                .into_iter()
                .map(OccurrenceDTO::new)
                .collect::<Vec<_>>(),
        )?;
    }
    if status {
        let res = check_series_status(&session, &ctx).await?;
        let status = session.accept(res)?;
        output["status"] = serde_json::to_value(SeriesStatusDTO::new(status))?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
