use clap::Parser;
use exani::app::App;
use exani::config::export::ReportExporter;
use exani::config::{ExamConfig, ExamType, Settings};
use exani::exam::ExamController;
use exani::models::QuestionBank;
use exani::util::parse_time_limit;
use exani::{ExaniError, Result, APP_NAME, LOG_FILE};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "exani")]
#[command(about = "EXANI-II exam simulator for the terminal")]
#[command(version)]
struct Cli {
    /// Question bank JSON file (defaults to the built-in bank)
    #[arg(short, long)]
    bank: Option<PathBuf>,

    /// Exam preset: transversales, disciplinares, completo, ingles
    #[arg(short, long)]
    exam_type: Option<ExamType>,

    /// Number of questions
    #[arg(short, long)]
    questions: Option<usize>,

    /// Time limit in minutes, or a duration such as "1h 30m"
    #[arg(short, long, value_parser = parse_time_limit)]
    time_limit: Option<u32>,

    /// Directory for exported results
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Log file (defaults to the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Settings for this run: the stored settings with CLI values on top
    fn apply(&self, settings: &Settings) -> Result<Settings> {
        let mut effective = settings.clone();

        if let Some(exam_type) = self.exam_type {
            effective.exam = ExamConfig::preset(exam_type);
        }
        if let Some(count) = self.questions {
            effective.exam.question_count = count;
        }
        if let Some(minutes) = self.time_limit {
            effective.exam.time_limit_minutes = minutes;
        }
        if let Some(dir) = &self.export_dir {
            effective.export_dir = Some(dir.clone());
        }
        if let Some(bank) = &self.bank {
            effective.bank_path = Some(bank.clone());
        }

        effective.exam.validate()?;
        Ok(effective)
    }
}

fn default_log_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        ExaniError::ConfigError("Unable to determine data directory".to_string())
    })?;
    Ok(data_dir.join(APP_NAME).join(LOG_FILE))
}

/// Log to a file; the terminal belongs to the TUI
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).append(true).open(path)?;

    let directive = "exani=info"
        .parse()
        .map_err(|e| ExaniError::ConfigError(format!("Invalid log directive: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_bank(settings: &Settings) -> Result<QuestionBank> {
    match &settings.bank_path {
        Some(path) => {
            info!(path = %path.display(), "loading question bank");
            QuestionBank::load(path)
        }
        None => QuestionBank::builtin(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = match &cli.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    init_logging(&log_path)?;

    let stored = Settings::load()?;
    let settings = cli.apply(&stored)?;
    let bank = load_bank(&settings)?;
    info!(questions = bank.len(), "question bank ready");

    let controller = ExamController::new(bank, settings.exam.clone());
    let exporter = ReportExporter::from_settings(&settings)?;

    let mut app = App::new(controller, exporter)?;
    let outcome = app.run();

    // Only the exam configuration is remembered; path overrides are per run
    let to_save = Settings {
        exam: app.core().last_config().clone(),
        ..stored
    };
    if let Err(e) = to_save.save() {
        warn!(error = %e, "settings not saved");
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::parse_from([
            "exani",
            "--exam-type",
            "disciplinares",
            "--questions",
            "20",
            "--time-limit",
            "1h 30m",
            "--export-dir",
            "/tmp/out",
        ]);
        let settings = cli.apply(&Settings::default()).unwrap();

        assert_eq!(settings.exam.exam_type, ExamType::Disciplinares);
        assert_eq!(settings.exam.modules, ExamConfig::disciplinares().modules);
        assert_eq!(settings.exam.question_count, 20);
        assert_eq!(settings.exam.time_limit_minutes, 90);
        assert_eq!(settings.export_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(settings.bank_path, None);
    }

    #[test]
    fn test_no_flags_keeps_settings() {
        let cli = Cli::parse_from(["exani"]);
        let stored = Settings::default();
        assert_eq!(cli.apply(&stored).unwrap(), stored);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let cli = Cli::parse_from(["exani", "--questions", "0"]);
        assert!(matches!(
            cli.apply(&Settings::default()),
            Err(ExaniError::ConfigError(_))
        ));

        assert!(Cli::try_parse_from(["exani", "--exam-type", "medicina"]).is_err());
        assert!(Cli::try_parse_from(["exani", "--time-limit", "90s"]).is_err());
    }
}
