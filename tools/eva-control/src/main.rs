//! eva-control: signed HTTP administration commands for an EVA instance.
//!
//! One command in, one outcome out, process exits:
//! 0 for a 2xx response, 1 for an application or signing failure, 2 when
//! the instance cannot be reached.

use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use eva_client::{
    Command, CommandRouter, ControlAction, ControlError, HttpTransport, ProcessTarget, Signer,
    DEFAULT_TIMEOUT_SECS,
};

/// Remote control for an EVA event-processing instance.
#[derive(Parser, Debug)]
#[command(name = "eva-control")]
#[command(about = "Issue signed administration commands to an EVA instance")]
struct Cli {
    /// Base URL of the EVA REST interface
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// External signing program
    #[arg(long, default_value = Signer::DEFAULT_PROGRAM)]
    signer: String,

    /// Sign with a specific key (passed to the signer as --local-user)
    #[arg(long)]
    sign_key: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Check that the instance is alive
    Health,
    /// Ask the instance to shut down or drain
    Control(ControlArgs),
    /// Ask an adapter to re-process a product or data instance
    Process(ProcessArgs),
    /// Inspect or delete queued jobs
    Jobs(JobsArgs),
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("action").required(true).multiple(false).args(["shutdown", "drain"])
))]
struct ControlArgs {
    /// Finish running jobs, then terminate
    #[arg(long)]
    shutdown: bool,

    /// Stop accepting new events, keep processing queued jobs
    #[arg(long)]
    drain: bool,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("instance").required(true).multiple(false).args(["productinstance", "datainstance"])
))]
struct ProcessArgs {
    /// Adapter that should process the instance
    #[arg(long)]
    adapter: String,

    /// Productstatus productinstance UUID
    #[arg(long)]
    productinstance: Option<Uuid>,

    /// Productstatus datainstance UUID
    #[arg(long)]
    datainstance: Option<Uuid>,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("mode").required(true).multiple(false).args(["list", "delete"])
))]
struct JobsArgs {
    /// List all queued jobs
    #[arg(long)]
    list: bool,

    /// Delete the job with this ID
    #[arg(long, value_name = "JOBID")]
    delete: Option<String>,
}

/// Map the parsed CLI onto the command taxonomy. The ArgGroups above
/// guarantee exactly one selector per group, so the fallback arms are
/// unreachable in practice.
fn build_command(cli: &CliCommand) -> Command {
    match cli {
        CliCommand::Health => Command::Health,
        CliCommand::Control(args) => {
            let action = if args.shutdown {
                ControlAction::Shutdown
            } else {
                ControlAction::Drain
            };
            Command::Control(action)
        }
        CliCommand::Process(args) => {
            let target = match (args.productinstance, args.datainstance) {
                (Some(uuid), None) => ProcessTarget::ProductInstance(uuid),
                (None, Some(uuid)) => ProcessTarget::DataInstance(uuid),
                _ => unreachable!("clap ArgGroup enforces exactly one instance selector"),
            };
            Command::Process {
                adapter: args.adapter.clone(),
                target,
            }
        }
        CliCommand::Jobs(args) => match &args.delete {
            Some(job_id) => Command::JobsDelete {
                job_id: job_id.clone(),
            },
            None => Command::JobsList,
        },
    }
}

async fn run(cli: &Cli) -> i32 {
    let command = build_command(&cli.command);

    let mut signer = Signer::new(&cli.signer);
    if let Some(key) = &cli.sign_key {
        signer = signer.with_key(key);
    }

    let transport = match HttpTransport::new(&cli.server, signer, cli.timeout) {
        Ok(transport) => transport,
        Err(err) => {
            error!("{err}");
            return err.exit_code();
        }
    };

    let router = CommandRouter::new(transport);
    match router.run(&command).await {
        Ok(outcome) => outcome.interpret(),
        Err(err) => {
            if let ControlError::SigningFailure { .. } = err {
                error!("aborting command, nothing was sent");
            }
            error!("{err}");
            err.exit_code()
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let code = run(&cli).await;
    std::process::exit(code);
}
