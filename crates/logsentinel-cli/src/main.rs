use anyhow::Result;
use clap::Parser;
use logsentinel_cli::app::{self, LaunchOptions};
use logsentinel_core::{RepoContext, Settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logsentinel")]
#[command(about = "LogSentinel - diagnose node logs as configuration issues or software bugs")]
#[command(version)]
struct Cli {
    /// Run a single analysis and print the reply
    #[arg(short, long)]
    prompt: Option<String>,

    /// Attach a log or config file (repeatable)
    #[arg(short, long = "file")]
    files: Vec<PathBuf>,

    /// Repository URL; any repository flag enables repository access
    #[arg(long)]
    repo_url: Option<String>,

    /// Repository branch
    #[arg(long)]
    branch: Option<String>,

    /// Build version of the failing node
    #[arg(long)]
    build: Option<String>,

    /// File holding a relevant code snippet
    #[arg(long)]
    snippet_file: Option<PathBuf>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Color theme (dark, tokyo-night, dracula)
    #[arg(long)]
    theme: Option<String>,

    /// Write the effective settings (including --model and --theme) to the
    /// config file and exit
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn launch_options(&self) -> LaunchOptions {
        let mut repo = RepoContext::default();
        if let Some(ref url) = self.repo_url {
            repo.repo_url = url.clone();
        }
        if let Some(ref branch) = self.branch {
            repo.branch = branch.clone();
        }
        if let Some(ref build) = self.build {
            repo.build_version = build.clone();
        }
        repo.has_access = self.repo_url.is_some()
            || self.branch.is_some()
            || self.build.is_some()
            || self.snippet_file.is_some();

        LaunchOptions {
            files: self.files.clone(),
            repo,
            snippet_file: self.snippet_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load();

    if let Some(ref model) = cli.model {
        settings.llm.model = model.clone();
    }
    if let Some(ref theme) = cli.theme {
        settings.ui.theme = theme.clone();
    }

    if cli.save_config {
        settings.save()?;
        println!("Saved settings to {}", Settings::config_path().display());
        return Ok(());
    }

    let theme = settings.ui.theme.clone();
    let launch = cli.launch_options();

    if let Some(ref prompt) = cli.prompt {
        app::run_single_prompt(&settings, prompt, &launch).await?;
    } else {
        app::run_tui(settings, &theme, launch).await?;
    }

    Ok(())
}
