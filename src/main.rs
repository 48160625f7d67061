use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use pr_release::action::{self, ActionInputs};
use pr_release::cli::orchestration::{ReleaseOutcome, ReleaseWorkflow, NOT_A_PULL_REQUEST};
use pr_release::config::{self, Config, ReleaseMode, VersionSource};
use pr_release::git::Git2TagSource;
use pr_release::platform::GitHubPlatform;
use pr_release::{ui, ReleaseError};

#[derive(clap::Parser)]
#[command(
    name = "pr-release",
    about = "Tag a release from the conventional commits of a merged pull request",
    version
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "Access token for the GitHub API (defaults to the github-token input)"
    )]
    token: Option<String>,

    #[arg(long, env = "GITHUB_EVENT_PATH", help = "Path to the triggering event payload")]
    event_path: Option<PathBuf>,

    #[arg(long, env = "GITHUB_REPOSITORY", help = "Repository as owner/name")]
    repository: Option<String>,

    #[arg(long, env = "GITHUB_SHA", help = "Commit the release tag points at")]
    sha: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", help = "GitHub API root URL")]
    api_url: Option<String>,

    #[arg(long, help = "Commit message source: merge or squash")]
    mode: Option<ReleaseMode>,

    #[arg(long, help = "Current version source: latest or nearest")]
    version_source: Option<VersionSource>,

    #[arg(long, help = "Annotate the tag with 'Release vX.Y.Z' instead of notes")]
    no_release_notes: bool,

    #[arg(long, help = "Compute the release without creating the tag")]
    dry_run: bool,

    #[arg(long, default_value = ".", help = "Path inside the local git repository")]
    repo_path: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "release failed");
        ui::display_error(&action::failure_message(&e));
        action::set_failed(&e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let inputs = ActionInputs::from_env()?;

    let config_path = args.config.clone().or_else(|| inputs.config.clone());
    let mut config = config::load_config(config_path.as_deref())?;
    config.apply_inputs(&inputs);
    apply_args(&mut config, &args);
    config.validate()?;

    let event = action::load_event(
        args.event_path.as_deref(),
        args.repository.as_deref(),
        args.sha.as_deref(),
    )?
    .ok_or_else(|| ReleaseError::precondition(NOT_A_PULL_REQUEST))?;

    let token = args
        .token
        .clone()
        .or_else(|| inputs.github_token.clone())
        .ok_or_else(|| ReleaseError::config("the github-token input is required"))?;

    let platform = GitHubPlatform::new(&token, &event.owner, &event.repo, args.api_url.as_deref())?;
    let tags = Git2TagSource::open(&args.repo_path)
        .with_context(|| format!("Failed to open git repository at {}", args.repo_path.display()))?
        .with_token(token);

    let outcome = ReleaseWorkflow::new(&platform, &tags, &config)
        .run(Some(&event))
        .await?;

    report_outputs(&outcome)?;

    if outcome.published {
        action::notice(&format!("Released {}", outcome.tag));
    }
    ui::display_success(&format!(
        "{} {} for pull request #{}",
        if outcome.published { "Published" } else { "Computed" },
        outcome.tag,
        event.number
    ));

    Ok(())
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(mode) = args.mode {
        config.release.mode = mode;
    }
    if let Some(source) = args.version_source {
        config.version.source = source;
    }
    if args.no_release_notes {
        config.release.release_notes = false;
    }
    if args.dry_run {
        config.dry_run = true;
    }
}

/// Writes the step outputs. Once the tag is published a write failure only
/// warns, so the run still reports the release it made.
fn report_outputs(outcome: &ReleaseOutcome) -> Result<()> {
    match write_outputs(outcome) {
        Err(e) if outcome.published => {
            tracing::warn!(error = %e, tag = %outcome.tag, "failed to write step outputs");
            action::warning(&format!(
                "Released {} but failed to write step outputs: {}",
                outcome.tag, e
            ));
            Ok(())
        }
        result => result,
    }
}

fn write_outputs(outcome: &ReleaseOutcome) -> Result<()> {
    action::set_output("version", &outcome.version.to_string())?;
    action::set_output("tag", &outcome.tag)?;
    action::set_output("previous-tag", &outcome.previous_tag)?;
    action::set_output("increment", &outcome.increment.to_string())?;
    action::set_output("release-notes", &outcome.notes)?;
    Ok(())
}
