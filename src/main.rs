use gui::App;
use iced::{Application, Settings};
use research_core::{CoreError, Settings as ResearchSettings};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "reddit_research=info,research_service=debug,reddit_client=info,gui=info";

fn main() -> Result<(), CoreError> {
    let settings = ResearchSettings::load()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(settings.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Reddit Market Research Tool");

    let iced_settings = Settings {
        window: iced::window::Settings {
            size: iced::Size::new(1200.0, 800.0),
            min_size: Some(iced::Size::new(800.0, 600.0)),
            ..Default::default()
        },
        ..Settings::with_flags(settings)
    };

    ResearchApp::run(iced_settings).map_err(|e| {
        tracing::error!("Application error: {}", e);
        CoreError::Internal {
            message: format!("GUI error: {e}"),
        }
    })
}

struct ResearchApp {
    app: App,
}

impl Application for ResearchApp {
    type Message = gui::Message;
    type Theme = iced::Theme;
    type Executor = iced::executor::Default;
    type Flags = ResearchSettings;

    fn new(flags: Self::Flags) -> (Self, iced::Command<Self::Message>) {
        tracing::info!("Initializing application");
        (Self { app: App::new(flags) }, iced::Command::none())
    }

    fn title(&self) -> String {
        "Reddit Market Research Tool".to_string()
    }

    fn update(&mut self, message: Self::Message) -> iced::Command<Self::Message> {
        self.app.update(message)
    }

    fn view(&self) -> iced::Element<Self::Message> {
        self.app.view()
    }
}
