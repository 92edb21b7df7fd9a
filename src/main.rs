use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use release_engine::cli::{PreparedRelease, ReleaseEngine};
use release_engine::config::{self, RawInputs, RunSettings};
use release_engine::git::Git2Repository;
use release_engine::notes::GhNotesFetcher;
use release_engine::process::CommandRunner;
use release_engine::publish::GhReleaseBackend;
use release_engine::ui;

#[derive(clap::Parser)]
#[command(
    name = "release-engine",
    version,
    about = "Decide the next version, render release notes and publish the release"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Compute and preview the release without tagging or publishing")]
    dry_run: bool,

    #[arg(long, help = "Write the rendered release notes to this file")]
    notes_file: Option<PathBuf>,

    #[arg(long, help = "Enable debug logging")]
    debug: bool,
}

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_engine")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    initialize_logger(args.debug)?;

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let mut raw = RawInputs::from_env();
    if args.dry_run {
        raw.dry_run = Some("true".to_string());
    }
    let (settings, warnings) = RunSettings::resolve(raw)?;
    for warning in &warnings {
        ui::display_warning(warning);
    }
    if settings.dry_run {
        ui::display_status("Dry run: nothing will be tagged, pushed or published");
    }

    let repo = Git2Repository::open(".")
        .context("Git repository error")?
        .with_token(settings.token.clone());

    let mut runner = CommandRunner::new();
    if let Some(token) = &settings.token {
        runner = runner.with_env("GH_TOKEN", token.clone());
    }
    let fetcher = GhNotesFetcher::new(runner.clone());
    let backend = GhReleaseBackend::new(runner);

    let engine = ReleaseEngine::new(&settings, &config, &repo, &fetcher, &backend);
    let prepared = engine.prepare()?;

    for warning in &prepared.warnings {
        ui::display_warning(warning);
    }
    ui::display_decision(&prepared.decision, settings.context.name());
    if let Some(count) = prepared.commit_count {
        ui::display_status(&format!("{} commit(s) since the last release", count));
    }
    ui::display_notes_preview(&prepared.notes, config.notes.preview_lines);

    if let Some(path) = &args.notes_file {
        fs::write(path, prepared.notes.as_str())
            .with_context(|| format!("Failed to write notes to {}", path.display()))?;
    }
    report_outputs(&prepared)?;

    let published = engine.publish(&prepared)?;
    ui::display_published(&published);

    Ok(())
}

/// Print outputs on stdout and append them to `$GITHUB_OUTPUT` when set.
fn report_outputs(prepared: &PreparedRelease) -> Result<()> {
    let lines = prepared.output_lines();
    for line in &lines {
        println!("{}", line);
    }

    if let Some(path) = std::env::var_os("GITHUB_OUTPUT") {
        append_lines(Path::new(&path), &lines)
            .with_context(|| format!("Failed to write outputs to {:?}", path))?;
    }

    Ok(())
}

fn append_lines(path: &Path, lines: &[String]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(())
}
