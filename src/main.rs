use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wallet_backup::archive::ExportArchive;
use wallet_backup::audit::{AuditLogger, AuditReporter};
use wallet_backup::cli::{
    handle_debug_command, handle_export_command, handle_history_command, handle_inspect_command,
    handle_list_command, handle_restore_command, DebugCommands, ExportArgs, InspectArgs,
    RestoreArgs,
};
use wallet_backup::config::{paths::WalletPaths, settings::Settings};
use wallet_backup::restore::{RestoreOrchestrator, RestoreStatus};
use wallet_backup::snapshot::SnapshotCodec;
use wallet_backup::storage::Storage;
use wallet_backup::telemetry::TracingReporter;

#[derive(Parser)]
#[command(
    name = "wallet-backup",
    version,
    about = "Export and restore wallet configuration snapshots",
    long_about = "wallet-backup exports the preferences, address book, network \
                  configurations and accounts of a local wallet into a single \
                  snapshot file, and restores them section by section."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the current configuration
    Export(ExportArgs),

    /// Restore configuration from an export file
    Restore(RestoreArgs),

    /// Show what an export file would restore
    Inspect(InspectArgs),

    /// List export files
    #[command(alias = "ls")]
    List,

    /// Show recent exports and restores from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,

    /// Administrative commands
    #[command(subcommand)]
    Debug(DebugCommands),
}

fn init_tracing(settings: &Settings) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = WalletPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings);

    let storage = Storage::open(&paths, &settings)?;
    let archive = ExportArchive::new(&paths);
    let codec = if settings.export.pretty {
        SnapshotCodec::pretty()
    } else {
        SnapshotCodec::new()
    };
    let orchestrator = RestoreOrchestrator::for_storage(&storage, &settings.features)
        .with_codec(codec)
        .with_telemetry((
            TracingReporter,
            AuditReporter::new(AuditLogger::new(paths.audit_log())),
        ));

    match cli.command {
        Some(Commands::Export(args)) => {
            handle_export_command(&orchestrator, &archive, args)?;
        }
        Some(Commands::Restore(args)) => {
            let status = handle_restore_command(&orchestrator, &archive, args)?;
            if matches!(
                status,
                Some(RestoreStatus::PartialFailure | RestoreStatus::Failure)
            ) {
                std::process::exit(2);
            }
        }
        Some(Commands::Inspect(args)) => {
            handle_inspect_command(&orchestrator, &archive, args)?;
        }
        Some(Commands::List) => {
            handle_list_command(&archive)?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&AuditLogger::new(paths.audit_log()), limit)?;
        }
        Some(Commands::Config) => {
            println!("wallet-backup Configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Log level:        {}", settings.log_level);
            println!("  Locale:           {}", settings.locale);
            println!("  Pretty export:    {}", settings.export.pretty);
            println!("  Security alerts:  {}", settings.features.security_alerts);
            println!("  Snap accounts:    {}", settings.features.snap_accounts);
            println!();
            println!("Sections: {}", orchestrator.section_names().join(", "));
        }
        Some(Commands::Debug(cmd)) => {
            handle_debug_command(&storage, cmd)?;
        }
        None => {
            println!("wallet-backup - wallet configuration export and restore");
            println!();
            println!("Run 'wallet-backup --help' for usage information.");
        }
    }

    Ok(())
}
