use iced::widget::{
    button, column, container, row, scrollable, slider, text, text_input, Column,
};
use iced::{Command, Element, Length, Theme};
use research_core::{
    ErrorReporter, RunReport, RunRequest, Settings, MAX_POST_LIMIT, MIN_POST_LIMIT,
};
use research_service::{export_csv, summarize_insights, ResearchSession};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub const NO_MATCHES_MESSAGE: &str = "No matching data found. Try different keywords.";

#[derive(Debug, Clone)]
pub enum Message {
    ClientIdChanged(String),
    ClientSecretChanged(String),
    UserAgentChanged(String),
    CommunitiesChanged(String),
    KeywordsChanged(String),
    PostLimitChanged(u32),
    LlmKeyChanged(String),
    RunResearch,
    ResearchFinished(Result<Arc<RunReport>, String>),
    SummaryFinished(Result<String, String>),
    DownloadCsv,
    CsvSaved(Result<PathBuf, String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Warning(String),
    Error(String),
}

pub struct App {
    session: ResearchSession,
    form: RunRequest,
    running: bool,
    summarizing: bool,
    collected: Option<usize>,
    report: Option<Arc<RunReport>>,
    summary: Option<Result<String, String>>,
    status: Option<Status>,
    reporter: ErrorReporter,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let form = RunRequest::from_settings(&settings);
        Self {
            session: ResearchSession::new(settings),
            form,
            running: false,
            summarizing: false,
            collected: None,
            report: None,
            summary: None,
            status: None,
            reporter: ErrorReporter::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// "Collected N insights" for the last finished run, zero included.
    pub fn collected_message(&self) -> Option<String> {
        self.collected
            .map(|count| format!("Collected {} insights", count))
    }

    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_deref()
    }

    pub fn summary(&self) -> Option<&Result<String, String>> {
        self.summary.as_ref()
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::ClientIdChanged(value) => self.form.client_id = value,
            Message::ClientSecretChanged(value) => self.form.client_secret = value,
            Message::UserAgentChanged(value) => self.form.user_agent = value,
            Message::CommunitiesChanged(value) => self.form.communities = value,
            Message::KeywordsChanged(value) => self.form.keywords = value,
            Message::PostLimitChanged(value) => {
                self.form.post_limit = value.clamp(MIN_POST_LIMIT, MAX_POST_LIMIT)
            }
            Message::LlmKeyChanged(value) => self.form.llm_api_key = value,
            Message::RunResearch => return self.start_run(),
            Message::ResearchFinished(result) => return self.finish_run(result),
            Message::SummaryFinished(result) => {
                self.summarizing = false;
                if let Err(message) = &result {
                    warn!("Summary failed: {}", message);
                }
                self.summary = Some(result);
            }
            Message::DownloadCsv => {
                if let Some(report) = &self.report {
                    let records = report.records.clone();
                    let path = self.session.export_path().to_path_buf();
                    let reporter = self.reporter;
                    return Command::perform(
                        async move {
                            export_csv(records, path)
                                .await
                                .map_err(|e| reporter.report_error(&e))
                        },
                        Message::CsvSaved,
                    );
                }
            }
            Message::CsvSaved(Ok(path)) => {
                self.status = Some(Status::Info(format!("Saved {}", path.display())));
            }
            Message::CsvSaved(Err(message)) => {
                self.status = Some(Status::Error(message));
            }
        }
        Command::none()
    }

    fn start_run(&mut self) -> Command<Message> {
        if self.running {
            return Command::none();
        }

        self.collected = None;
        self.report = None;
        self.summary = None;

        match self.session.prepare(&self.form) {
            Ok(run) => {
                info!("Starting run {}", run.run_id());
                self.running = true;
                self.status = Some(Status::Info("Collecting data...".to_string()));
                let reporter = self.reporter;
                Command::perform(
                    async move {
                        run.execute()
                            .await
                            .map(Arc::new)
                            .map_err(|e| reporter.report_error(&e))
                    },
                    Message::ResearchFinished,
                )
            }
            Err(e) => {
                self.status = Some(Status::Error(self.reporter.report_warning(&e)));
                Command::none()
            }
        }
    }

    fn finish_run(&mut self, result: Result<Arc<RunReport>, String>) -> Command<Message> {
        self.running = false;

        let report = match result {
            Ok(report) => report,
            Err(message) => {
                self.status = Some(Status::Error(message));
                return Command::none();
            }
        };

        self.collected = Some(report.records.len());
        if report.is_empty() {
            self.status = Some(Status::Warning(NO_MATCHES_MESSAGE.to_string()));
            return Command::none();
        }

        self.status = None;
        self.report = Some(Arc::clone(&report));

        let api_key = self.form.llm_api_key.trim().to_string();
        if api_key.is_empty() {
            return Command::none();
        }

        self.summarizing = true;
        let reporter = self.reporter;
        Command::perform(
            async move {
                summarize_insights(&report.records, &api_key)
                    .await
                    .map_err(|e| reporter.report_error(&e))
            },
            Message::SummaryFinished,
        )
    }

    pub fn view(&self) -> Element<Message, Theme> {
        let main_content: Element<Message, Theme> =
            row![self.sidebar(), self.results()].spacing(20).into();

        container(main_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .into()
    }

    fn sidebar(&self) -> Element<Message, Theme> {
        let run_button = button("Run Research")
            .on_press_maybe((!self.running).then_some(Message::RunResearch));

        column![
            text("Reddit API").size(18),
            text_input("Client ID", &self.form.client_id).on_input(Message::ClientIdChanged),
            text_input("Client Secret", &self.form.client_secret)
                .on_input(Message::ClientSecretChanged)
                .secure(true),
            text_input("User Agent", &self.form.user_agent).on_input(Message::UserAgentChanged),
            text("Subreddits (comma separated)").size(14),
            text_input("Entrepreneur,marketing", &self.form.communities)
                .on_input(Message::CommunitiesChanged),
            text("Keywords (comma separated)").size(14),
            text_input("hate,problem,wish", &self.form.keywords)
                .on_input(Message::KeywordsChanged),
            text(format!("Posts per subreddit: {}", self.form.post_limit)).size(14),
            slider(
                MIN_POST_LIMIT..=MAX_POST_LIMIT,
                self.form.post_limit,
                Message::PostLimitChanged
            ),
            text("OpenAI API Key (optional)").size(14),
            text_input("sk-...", &self.form.llm_api_key)
                .on_input(Message::LlmKeyChanged)
                .secure(true),
            run_button,
        ]
        .spacing(10)
        .width(Length::Fixed(320.0))
        .into()
    }

    fn results(&self) -> Element<Message, Theme> {
        let mut content = Column::new()
            .spacing(15)
            .push(text("Reddit Market Research Tool").size(24));

        if let Some(collected) = self.collected_message() {
            content = content.push(text(collected).size(16));
        }

        if let Some(status) = &self.status {
            let line = match status {
                Status::Info(message) => message.clone(),
                Status::Warning(message) => format!("Warning: {}", message),
                Status::Error(message) => format!("Error: {}", message),
            };
            content = content.push(text(line).size(16));
        }

        if let Some(report) = &self.report {
            content = content
                .push(records_table(report))
                .push(text("Top Keywords").size(18))
                .push(keyword_list(report));

            if self.summarizing {
                content = content.push(text("Generating AI insights...").size(14));
            }
            match &self.summary {
                Some(Ok(summary)) => {
                    content = content
                        .push(text("AI Insights").size(18))
                        .push(text(summary).size(14));
                }
                Some(Err(message)) => {
                    content = content.push(text(format!("Summary failed: {}", message)).size(14));
                }
                None => {}
            }

            content = content.push(button("Download CSV").on_press(Message::DownloadCsv));
        }

        scrollable(content).width(Length::Fill).height(Length::Fill).into()
    }
}

fn records_table(report: &RunReport) -> Element<Message, Theme> {
    let header = row![
        text("source").width(Length::Fixed(80.0)),
        text("subreddit").width(Length::Fixed(120.0)),
        text("text").width(Length::FillPortion(4)),
        text("score").width(Length::Fixed(60.0)),
        text("sentiment").width(Length::Fixed(80.0)),
        text("url").width(Length::FillPortion(2)),
    ]
    .spacing(10);

    report
        .records
        .iter()
        .fold(Column::new().spacing(6).push(header), |table, record| {
            let sentiment = record
                .sentiment
                .map(|value| format!("{:.3}", value))
                .unwrap_or_default();
            table.push(
                row![
                    text(record.source.to_string()).width(Length::Fixed(80.0)),
                    text(&record.community).width(Length::Fixed(120.0)),
                    text(&record.text).size(13).width(Length::FillPortion(4)),
                    text(record.score).width(Length::Fixed(60.0)),
                    text(sentiment).width(Length::Fixed(80.0)),
                    text(&record.url).size(12).width(Length::FillPortion(2)),
                ]
                .spacing(10),
            )
        })
        .into()
}

fn keyword_list(report: &RunReport) -> Element<Message, Theme> {
    report
        .frequencies
        .iter()
        .fold(Column::new().spacing(2), |list, entry| {
            list.push(text(format!("{}: {}", entry.token, entry.count)).size(14))
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_core::{InsightRecord, RecordSource};

    fn report(records: Vec<InsightRecord>) -> Arc<RunReport> {
        Arc::new(RunReport {
            run_id: uuid::Uuid::new_v4(),
            started_at: chrono::Utc::now(),
            records,
            frequencies: Vec::new(),
        })
    }

    fn record() -> InsightRecord {
        InsightRecord {
            source: RecordSource::Post,
            community: "test".to_string(),
            text: "I have a problem".to_string(),
            score: 5,
            url: "https://www.reddit.com/r/test/comments/a/".to_string(),
            sentiment: Some(-0.2),
        }
    }

    #[test]
    fn test_form_starts_from_settings() {
        let app = App::new(Settings::default());
        assert_eq!(app.form.user_agent, "market_research_app");
        assert_eq!(app.form.communities, "Entrepreneur,marketing,startups");
        assert_eq!(app.form.keywords, "hate,problem,wish,annoying,frustrating");
        assert_eq!(app.form.post_limit, 50);
        assert!(app.status().is_none());
    }

    #[test]
    fn test_run_without_credentials_asks_for_them() {
        let mut app = App::new(Settings::default());
        let _ = app.update(Message::RunResearch);
        assert!(!app.is_running());
        assert_eq!(
            app.status(),
            Some(&Status::Error(
                "Please enter Reddit API credentials".to_string()
            ))
        );
    }

    #[test]
    fn test_post_limit_is_clamped() {
        let mut app = App::new(Settings::default());
        let _ = app.update(Message::PostLimitChanged(500));
        assert_eq!(app.form.post_limit, 200);
        let _ = app.update(Message::PostLimitChanged(1));
        assert_eq!(app.form.post_limit, 10);
    }

    #[test]
    fn test_empty_result_warns() {
        let mut app = App::new(Settings::default());
        app.running = true;
        let _ = app.update(Message::ResearchFinished(Ok(report(Vec::new()))));
        assert!(!app.is_running());
        assert!(app.report().is_none());
        assert_eq!(
            app.collected_message().as_deref(),
            Some("Collected 0 insights")
        );
        assert_eq!(
            app.status(),
            Some(&Status::Warning(NO_MATCHES_MESSAGE.to_string()))
        );
    }

    #[test]
    fn test_results_shown_without_summary_key() {
        let mut app = App::new(Settings::default());
        let _ = app.update(Message::ResearchFinished(Ok(report(vec![record()]))));
        assert_eq!(
            app.collected_message().as_deref(),
            Some("Collected 1 insights")
        );
        assert!(app.status().is_none());
        assert_eq!(app.report().map(|r| r.records.len()), Some(1));
        assert!(!app.summarizing);
        assert!(app.summary().is_none());
    }

    #[test]
    fn test_summary_failure_keeps_results() {
        let mut app = App::new(Settings::default());
        let _ = app.update(Message::LlmKeyChanged("sk-test".to_string()));
        let _ = app.update(Message::ResearchFinished(Ok(report(vec![record()]))));
        assert!(app.summarizing);

        let _ = app.update(Message::SummaryFinished(Err("Invalid API key".to_string())));
        assert!(!app.summarizing);
        assert!(app.report().is_some());
        assert_eq!(app.summary(), Some(&Err("Invalid API key".to_string())));
    }

    #[test]
    fn test_failed_run_reports_error() {
        let mut app = App::new(Settings::default());
        app.running = true;
        let _ = app.update(Message::ResearchFinished(Err("Subreddit not found".to_string())));
        assert!(!app.is_running());
        assert!(app.collected_message().is_none());
        assert_eq!(
            app.status(),
            Some(&Status::Error("Subreddit not found".to_string()))
        );
    }
}
