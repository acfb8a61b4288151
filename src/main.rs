use clap::{Parser, Subcommand};
use gem_ledger::{
    AmountArg, AuditFeed, AuditFeedConfig, Command, CommandHandlers, Config, LedgerStore,
    MemberInfo, Reply, Responder, RoleId, UserId,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gem-ledger")]
#[command(about = "Run gem ledger commands against the configured stats file")]
struct Cli {
    /// Id of the user running the command
    #[arg(long)]
    actor: String,

    /// Display name of the acting user (defaults to the id)
    #[arg(long)]
    name: Option<String>,

    /// Avatar URL of the acting user
    #[arg(long)]
    avatar: Option<String>,

    /// Role ids held by the acting user
    #[arg(long = "role")]
    roles: Vec<u64>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Show your own gem total
    Stats,
    /// Log gems given by a user (admin only)
    Log {
        user: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(long)]
        user_name: Option<String>,
    },
    /// Remove gems from a user's total (admin only)
    Removestats {
        user: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(long)]
        user_name: Option<String>,
    },
    /// Show another user's gem total (admin only)
    Adminstats {
        user: String,
        #[arg(long)]
        user_name: Option<String>,
    },
}

struct StdoutResponder;

impl Responder for StdoutResponder {
    fn respond(&self, _actor: &UserId, reply: &Reply, _private: bool) {
        println!("{}", reply);
    }
}

fn member(id: &str, name: Option<&str>) -> MemberInfo {
    MemberInfo::new(id, name.unwrap_or(id))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gem_ledger=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let store = match LedgerStore::open(config.store_config()) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, path = %config.stats_path.display(), "failed to open gem ledger");
            return ExitCode::FAILURE;
        }
    };
    info!(path = %store.path().display(), "gem ledger ready");

    let mut actor = member(&cli.actor, cli.name.as_deref());
    actor.avatar_url = cli.avatar;
    actor.roles = cli.roles.into_iter().map(RoleId).collect();

    let feed = AuditFeed::new();
    let audit = feed.subscribe(config.log_channel_id, AuditFeedConfig::default());
    let handlers = CommandHandlers::new(&config, &store);

    let target;
    let command = match &cli.command {
        CliCommand::Stats => Command::Stats,
        CliCommand::Log {
            user,
            amount,
            user_name,
        } => {
            target = member(user, user_name.as_deref());
            Command::Log {
                user: &target,
                amount: AmountArg::from(amount.as_str()),
            }
        }
        CliCommand::Removestats {
            user,
            amount,
            user_name,
        } => {
            target = member(user, user_name.as_deref());
            Command::RemoveStats {
                user: &target,
                amount: AmountArg::from(amount.as_str()),
            }
        }
        CliCommand::Adminstats { user, user_name } => {
            target = member(user, user_name.as_deref());
            Command::AdminStats { user: &target }
        }
    };

    let reply = handlers.dispatch(&actor, command, &StdoutResponder, &feed);

    for entry in audit.drain() {
        match serde_json::to_string(&entry) {
            Ok(line) => println!("{}", line),
            Err(e) => error!(error = %e, "failed to encode audit entry"),
        }
    }

    if reply.is_rejected() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
