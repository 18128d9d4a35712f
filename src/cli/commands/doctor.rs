//! Doctor command - verify external tools and show the effective configuration.

use crate::cli::preflight::{self, Tool};
use crate::cli::Output;
use crate::config::{ModelSize, Settings, WHISPER_MODEL_ENV};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: Option<&str>) -> anyhow::Result<()> {
    Output::header("tubescribe Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    for tool in preflight::required_tools(settings) {
        let check = check_tool(&tool);
        check.print();
        checks.push(check);
    }

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    let model_check = check_model_env();
    model_check.print();
    checks.push(model_check);

    println!();

    println!("{}", style("Effective Settings").bold());
    print_settings(settings);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Captions still work, the Whisper fallback will not.",
            errors
        ));
        anyhow::bail!("{} doctor check(s) failed", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! tubescribe is ready to use.");
    }

    Ok(())
}

fn check_tool(tool: &Tool) -> CheckResult {
    let hint = install_hint(&tool.name);
    match tool.probe() {
        Ok(version) => CheckResult::ok(&tool.name, &truncate(&version, 50)),
        Err(e) => CheckResult::error(&tool.name, &e.to_string(), hint),
    }
}

fn check_config_file(explicit: Option<&str>) -> CheckResult {
    if let Some(path) = explicit {
        return CheckResult::ok("Config file", path);
    }

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override them", config_path.display()),
        )
    }
}

fn check_model_env() -> CheckResult {
    match std::env::var(WHISPER_MODEL_ENV) {
        Ok(raw) => match raw.parse::<ModelSize>() {
            Ok(model) => CheckResult::ok(WHISPER_MODEL_ENV, model.as_str()),
            Err(_) => CheckResult::warning(
                WHISPER_MODEL_ENV,
                &format!("'{}' is not a model size, using base", raw),
                &format!("Valid models: {}", valid_models()),
            ),
        },
        Err(_) => CheckResult::ok(WHISPER_MODEL_ENV, "not set"),
    }
}

fn print_settings(settings: &Settings) {
    Output::kv(
        "Server",
        &format!("{}:{}", settings.server.host, settings.server.port),
    );
    Output::kv("Whisper model", settings.whisper.model.as_str());
    Output::kv(
        "Whisper timeout",
        &format!("{}s", settings.whisper_timeout().as_secs()),
    );
    Output::kv(
        "Download timeout",
        &format!("{}s", settings.download_timeout().as_secs()),
    );
    Output::kv(
        "Caption timeout",
        &format!("{}s", settings.caption_timeout().as_secs()),
    );
    Output::kv(
        "Metadata timeout",
        &format!("{}s", settings.metadata_timeout().as_secs()),
    );
    Output::kv(
        "Caption languages",
        &settings.captions.default_languages.join(", "),
    );
    Output::kv("Scratch directory", &settings.temp_dir().display().to_string());
}

fn valid_models() -> String {
    ModelSize::ALL
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}

/// Platform-specific install hint for a tool.
fn install_hint(name: &str) -> &'static str {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match name {
        "ffmpeg" if cfg!(target_os = "macos") => "Install with: brew install ffmpeg",
        "ffmpeg" => "Install with: sudo apt install ffmpeg (or your package manager)",
        "yt-dlp" if cfg!(target_os = "macos") => "Install with: brew install yt-dlp",
        "yt-dlp" => "Install with: pip install yt-dlp (or your package manager)",
        "whisper" => "Install with: pip install openai-whisper",
        _ => "Check the program path in the config file",
    }
}
