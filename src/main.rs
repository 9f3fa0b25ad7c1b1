//! Command-line entry point: one subcommand, one API call, JSON on stdout.

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use ghdeploy::deployments::{
    CreateDeployment, CreateDeploymentStatus, DeploymentState, ListDeploymentsFilter,
};
use ghdeploy::github::{Credential, GithubClient, GITHUB_API_BASE_URL};

#[derive(Parser)]
#[command(name = "ghdeploy", version, about = "GitHub deployments client")]
struct Cli {
    /// Personal access token used for every request
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long, global = true, env = "GHDEPLOY_API_URL", default_value = GITHUB_API_BASE_URL)]
    api_url: Url,

    /// Log request diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct RepoArgs {
    /// Repository owner
    #[arg(long)]
    owner: String,

    /// Repository name
    #[arg(long)]
    repo: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List deployments, optionally filtered
    ListDeployments {
        #[command(flatten)]
        repo: RepoArgs,
        /// Only deployments for this SHA
        #[arg(long)]
        sha: Option<String>,
        /// Only deployments for this ref (branch, tag, or SHA)
        #[arg(long)]
        r#ref: Option<String>,
        /// Only deployments for this task
        #[arg(long)]
        task: Option<String>,
        /// Only deployments for this environment
        #[arg(long)]
        environment: Option<String>,
    },

    /// Fetch a single deployment
    GetDeployment {
        #[command(flatten)]
        repo: RepoArgs,
        /// Deployment id
        #[arg(long)]
        id: u64,
    },

    /// Create a deployment for a ref
    CreateDeployment {
        #[command(flatten)]
        repo: RepoArgs,
        /// The ref to deploy (branch, tag, or SHA)
        #[arg(long)]
        r#ref: String,
        /// Task to execute (server default: deploy)
        #[arg(long)]
        task: Option<String>,
        /// Merge the default branch into the ref first (server default: true)
        #[arg(long)]
        auto_merge: Option<bool>,
        /// Status contexts to verify, comma separated (server default: all)
        #[arg(long, value_delimiter = ',')]
        required_contexts: Option<Vec<String>>,
        /// Extra JSON payload recorded with the deployment
        #[arg(long)]
        payload: Option<String>,
        /// Target environment (server default: production)
        #[arg(long)]
        environment: Option<String>,
        /// Short description of the deployment
        #[arg(long)]
        description: Option<String>,
    },

    /// Attach a status to a deployment
    CreateDeploymentStatus {
        #[command(flatten)]
        repo: RepoArgs,
        /// Deployment id
        #[arg(long)]
        id: u64,
        /// One of: error, failure, inactive, in_progress, queued, pending
        #[arg(long)]
        state: DeploymentState,
        /// URL with output to associate with this status
        #[arg(long)]
        target_url: Option<String>,
        /// Full URL of the deployment log (replaces target-url)
        #[arg(long)]
        log_url: Option<String>,
        /// Short description (at most 140 characters)
        #[arg(long)]
        description: Option<String>,
        /// Environment to record for this status
        #[arg(long)]
        environment: Option<String>,
        /// URL for accessing the environment
        #[arg(long)]
        environment_url: Option<String>,
        /// Mark prior non-production deployments of the environment inactive
        #[arg(long)]
        auto_inactive: Option<bool>,
    },

    #[command(external_subcommand)]
    External(Vec<String>),
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "ghdeploy=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Help and unrecognized subcommands print usage and exit cleanly,
    // before any credential handling or network activity.
    let command = match cli.command {
        Some(Commands::External(_)) | None => {
            Cli::command().print_help()?;
            return Ok(());
        }
        Some(command) => command,
    };

    let token = cli
        .token
        .context("--token is required (or set GITHUB_TOKEN)")?;
    let github = GithubClient::with_base_url(Credential { token }, cli.api_url);
    let deployments = github.deployments();

    let output = match command {
        Commands::ListDeployments {
            repo,
            sha,
            r#ref,
            task,
            environment,
        } => {
            let filter = ListDeploymentsFilter {
                sha,
                r#ref,
                task,
                environment,
            };
            serde_json::to_string(&deployments.list(&repo.owner, &repo.repo, &filter)?)?
        }
        Commands::GetDeployment { repo, id } => {
            serde_json::to_string(&deployments.get(&repo.owner, &repo.repo, id)?)?
        }
        Commands::CreateDeployment {
            repo,
            r#ref,
            task,
            auto_merge,
            required_contexts,
            payload,
            environment,
            description,
        } => {
            let deployment = CreateDeployment {
                r#ref,
                task,
                auto_merge,
                required_contexts,
                payload,
                environment,
                description,
            };
            serde_json::to_string(&deployments.create(&repo.owner, &repo.repo, &deployment)?)?
        }
        Commands::CreateDeploymentStatus {
            repo,
            id,
            state,
            target_url,
            log_url,
            description,
            environment,
            environment_url,
            auto_inactive,
        } => {
            let status = CreateDeploymentStatus {
                state,
                target_url,
                log_url,
                description,
                environment,
                environment_url,
                auto_inactive,
            };
            serde_json::to_string(&deployments.create_status(
                &repo.owner,
                &repo.repo,
                id,
                &status,
            )?)?
        }
        Commands::External(_) => unreachable!("handled before dispatch"),
    };

    println!("{output}");
    Ok(())
}
