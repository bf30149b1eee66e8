use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{ApiConfig, HttpSurveyApi, ProgressConfig, SurveyApi, SurveyLoopService};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_LOG_FILTER: &str = "survey=info,services=info,ui=info";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String },
    InvalidDuration { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
            ArgsError::InvalidDuration { raw } => {
                write!(f, "invalid --progress-duration value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    survey_loop: Arc<SurveyLoopService>,
}

impl UiApp for DesktopApp {
    fn survey_loop(&self) -> Arc<SurveyLoopService> {
        Arc::clone(&self.survey_loop)
    }
}

#[derive(Debug)]
struct Args {
    api: ApiConfig,
    progress_duration: Duration,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p survey -- [--api-url <url>] [--progress-duration <ms>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url {}", ApiConfig::DEFAULT_BASE_URL);
    eprintln!(
        "  --progress-duration {}",
        ProgressConfig::DEFAULT_DURATION.as_millis()
    );
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SURVEY_API_URL, SURVEY_PROGRESS_DURATION_MS, RUST_LOG");
}

impl Args {
    /// Environment first, then flags.
    fn parse(
        env: impl Fn(&str) -> Option<String>,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Option<Self>, ArgsError> {
        let mut api = parse_api_url(
            env("SURVEY_API_URL").unwrap_or_else(|| ApiConfig::DEFAULT_BASE_URL.to_string()),
        )?;
        let mut progress_duration = match env("SURVEY_PROGRESS_DURATION_MS") {
            Some(raw) => parse_duration(raw)?,
            None => ProgressConfig::DEFAULT_DURATION,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    api = parse_api_url(require_value(args, "--api-url")?)?;
                }
                "--progress-duration" => {
                    progress_duration = parse_duration(require_value(args, "--progress-duration")?)?;
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self {
            api,
            progress_duration,
        }))
    }
}

fn parse_api_url(raw: String) -> Result<ApiConfig, ArgsError> {
    if raw.trim().is_empty() {
        return Err(ArgsError::InvalidApiUrl { raw });
    }
    ApiConfig::parse(raw.trim()).map_err(|_| ArgsError::InvalidApiUrl { raw })
}

fn parse_duration(raw: String) -> Result<Duration, ArgsError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ArgsError::InvalidDuration { raw })
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(|key| std::env::var(key).ok(), &mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let Some(parsed) = parsed else {
        print_usage();
        return Ok(());
    };

    init_tracing();
    tracing::info!(
        api = %parsed.api.base_url(),
        progress_ms = parsed.progress_duration.as_millis() as u64,
        "starting survey client"
    );

    let api: Arc<dyn SurveyApi> = Arc::new(HttpSurveyApi::new(parsed.api));
    let survey_loop = SurveyLoopService::new(api)
        .with_progress(ProgressConfig::default().with_duration(parsed.progress_duration));
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        survey_loop: Arc::new(survey_loop),
    });
    let context = build_app_context(&app);

    // Some dev setups default the window to always-on-top.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Survey")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
