use super::IOccurrenceService;
use recurrence_editor_api_structs::{expand_occurrences, get_series_status, RuleRequestBody};
use recurrence_editor_domain::{Occurrences, SeriesStatus};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

pub struct HttpOccurrenceService {
    client: Client,
    base_url: String,
}

impl HttpOccurrenceService {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        body: &impl Serialize,
        path: &str,
    ) -> anyhow::Result<T> {
        let res = match self
            .client
            .post(&format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                error!(
                    "[Network Error] Occurrence service POST {} error. Error message: {:?}",
                    path, e
                );
                return Err(anyhow::Error::new(e));
            }
        };
        let res = res.error_for_status().map_err(|e| {
            error!(
                "[Unexpected Status] Occurrence service POST {} error. Error message: {:?}",
                path, e
            );
            anyhow::Error::new(e)
        })?;
        res.json::<T>().await.map_err(|e| {
            error!(
                "[Unexpected Response] Occurrence service POST {} error. Error message: {:?}",
                path, e
            );
            anyhow::Error::new(e)
        })
    }
}

#[async_trait::async_trait]
impl IOccurrenceService for HttpOccurrenceService {
    async fn expand(&self, serialized_rule: &str) -> anyhow::Result<Occurrences> {
        let body = RuleRequestBody::new(serialized_rule);
        let res: expand_occurrences::APIResponse =
            self.post(&body, expand_occurrences::PATH).await?;
        Ok(res.into_occurrences())
    }

    async fn status(&self, serialized_rule: &str) -> anyhow::Result<SeriesStatus> {
        let body = RuleRequestBody::new(serialized_rule);
        let res: get_series_status::APIResponse =
            self.post(&body, get_series_status::PATH).await?;
        Ok(res.into())
    }
}
