use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strsync::config::Config;
use strsync::github::GithubClient;
use strsync::sync::{SyncOutcome, sync_fenix_strings};
use strsync::types::RepoId;

/// The major version whose release branch gets synced. Bumped by hand when
/// a new beta cycle starts.
const FENIX_MAJOR_VERSION: u64 = 87;

#[derive(Parser)]
#[command(
    name = "strsync",
    version,
    about = "Sync localized strings from the main branch to the active beta release branch"
)]
struct Cli {
    #[command(subcommand)]
    product: Product,
}

#[derive(Subcommand)]
enum Product {
    /// Sync strings for the Fenix repository.
    Fenix,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging isn't up yet; configuration errors go to stdout.
            println!("{e}. Exiting.");
            std::process::exit(1);
        }
    };

    let default_filter = if config.debug {
        "strsync=debug"
    } else {
        "strsync=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let octocrab = match octocrab::Octocrab::builder()
        .personal_token(config.github_token.clone())
        .build()
    {
        Ok(octocrab) => octocrab,
        Err(e) => {
            println!("Could not build the GitHub client: {e}. Exiting.");
            std::process::exit(1);
        }
    };

    // Fail fast on a bad token rather than partway through a run.
    if octocrab.current().user().await.is_err() {
        println!("Could not get authenticated user. Exiting.");
        std::process::exit(1);
    }

    match cli.product {
        Product::Fenix => {
            let repo = RepoId::new(&config.repository_owner, "fenix");
            tracing::info!(repo = %repo, major = FENIX_MAJOR_VERSION, "starting sync");
            let client = GithubClient::new(octocrab, repo);

            match sync_fenix_strings(
                &client,
                FENIX_MAJOR_VERSION,
                &config.author,
                config.dry_run,
            )
            .await
            {
                Ok(outcome) => report(&outcome),
                Err(e) => {
                    tracing::error!(error = %e, "sync failed");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn report(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::NotBeta { release_branch, .. } => {
            tracing::info!(branch = %release_branch, "nothing to do: branch is not in beta");
        }
        SyncOutcome::UpToDate { release_branch } => {
            tracing::info!(branch = %release_branch, "nothing to do: strings already match");
        }
        SyncOutcome::DryRun { would_update, .. } => {
            tracing::info!(count = would_update.len(), "dry run complete");
        }
        SyncOutcome::Synced {
            pull_request,
            updated_paths,
            ..
        } => {
            tracing::info!(
                pr = %pull_request.number,
                files = updated_paths.len(),
                "sync complete"
            );
        }
    }
}
