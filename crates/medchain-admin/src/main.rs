// Operator CLI for MedChain admins

use clap::{Parser, Subcommand};
use medchain_admin::AdminConfig;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "medchain-admin")]
#[command(about = "MedChain admin - co-sign query ledger transactions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = "medchain.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new Ed25519 key pair
    Keygen {
        /// Write the key pair to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sign the action of a JSON sign request
    Sign {
        /// Sign request file
        #[arg(short, long)]
        request: PathBuf,
    },

    /// Build a signing proposal for one query instruction
    Prepare {
        /// Target instance (hex); the parent darc instance for spawns
        #[arg(short, long)]
        instance: String,

        /// spawn, update or verifystatus
        #[arg(long, default_value = "spawn")]
        command: String,

        /// Query arguments as id or id=status
        #[arg(short, long = "arg", required = true)]
        args: Vec<String>,

        /// Signer identities in slot order
        #[arg(short, long = "signer", required = true)]
        signers: Vec<String>,

        /// Proposal id (defaults to the first query id)
        #[arg(long)]
        id: Option<String>,
    },

    /// Merge signed replies into one transaction
    Merge {
        /// Sign reply files
        #[arg(required = true)]
        replies: Vec<PathBuf>,

        /// Require every slot to be filled and valid
        #[arg(long)]
        verify: bool,
    },

    /// Run a create/update/verify scenario against an in-memory ledger
    Demo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AdminConfig::load(&cli.config)?;

    // Initialize tracing
    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Keygen { output } => commands::keygen::run(output.as_deref())?,
        Commands::Sign { request } => commands::sign::run(&config, &request)?,
        Commands::Prepare {
            instance,
            command,
            args,
            signers,
            id,
        } => commands::prepare::run(&config, &instance, &command, &args, &signers, id)?,
        Commands::Merge { replies, verify } => commands::merge::run(&replies, verify)?,
        Commands::Demo => commands::demo::run()?,
    }

    Ok(())
}
