use crate::collector::collect;
use crate::pipeline::build_report;
use chrono::Utc;
use llm_interface::{summarize, OpenAiProvider, NO_DATA_MESSAGE};
use reddit_client::{ClientCache, RedditClient};
use research_core::{
    CoreError, ForumSource, InsightRecord, RunConfig, RunReport, RunRequest, Settings,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Per-user-action entry point for the front-end. Owns the settings and the
/// forum client built for the current credentials.
#[derive(Debug)]
pub struct ResearchSession {
    settings: Settings,
    client_cache: ClientCache,
}

impl ResearchSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            client_cache: ClientCache::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn export_path(&self) -> &Path {
        &self.settings.export_path
    }

    /// Validates the form and resolves the forum client. Fails with
    /// `MissingCredentials` before any network activity.
    pub fn prepare(&mut self, request: &RunRequest) -> Result<PreparedRun, CoreError> {
        let config = request.to_config()?;
        let client = self.client_cache.get_or_create(&config.credentials)?;
        Ok(PreparedRun::new(client, config))
    }
}

/// A validated run, detached from the session so it can be moved onto the
/// executor.
#[derive(Debug)]
pub struct PreparedRun<S = RedditClient> {
    run_id: Uuid,
    config: RunConfig,
    source: Arc<S>,
}

impl<S: ForumSource + Send + Sync> PreparedRun<S> {
    pub fn new(source: Arc<S>, config: RunConfig) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            config,
            source,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Collect, then score and count. The first forum error aborts the run.
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn execute(self) -> Result<RunReport, CoreError> {
        let started_at = Utc::now();
        info!(
            "Collecting from {} communities, {} keywords, {} posts each",
            self.config.communities.len(),
            self.config.keywords.len(),
            self.config.post_limit
        );

        let records = collect(
            self.source.as_ref(),
            &self.config.communities,
            &self.config.keywords,
            self.config.post_limit,
        )
        .await?;

        if records.is_empty() {
            warn!("No records matched the configured keywords");
        } else {
            info!("Collected {} insights", records.len());
        }

        Ok(build_report(self.run_id, started_at, records))
    }
}

/// Runs the summarizer against OpenAI with `api_key`. An empty record set
/// yields the no-data message whatever the key.
pub async fn summarize_insights(
    records: &[InsightRecord],
    api_key: &str,
) -> Result<String, CoreError> {
    if records.is_empty() {
        return Ok(NO_DATA_MESSAGE.to_string());
    }

    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(CoreError::InvalidInput {
            message: "OpenAI API key is empty".to_string(),
        });
    }

    let provider = OpenAiProvider::new(api_key.to_string())?;
    summarize(records, &provider).await
}
