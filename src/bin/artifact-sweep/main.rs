use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::{debug, info, trace};

use artifact_sweep::config::{Command, Config, ConnectionConfig, DeleteConfig, ScanConfig};
use artifact_sweep::deleter::{DeletionConfirmer, validate_records};
use artifact_sweep::export::{read_csv_file, write_csv_file};
use artifact_sweep::safety::{StdioPromptHandler, resolve_personal_access_token};
use artifact_sweep::storage::azure_devops::Connection;
use artifact_sweep::types::error::exit_code_from_error;
use artifact_sweep::{ArtifactScanPipeline, CLIArgs};

mod tracing_init;

/// artifact-sweep - Audit and prune Azure DevOps build artifact containers.
///
/// This binary is a thin wrapper over the artifact-sweep library.
#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    if let Some(shell) = cli_args.auto_complete_shell {
        generate(
            shell,
            &mut CLIArgs::command(),
            "artifact-sweep",
            &mut std::io::stdout(),
        );

        return Ok(());
    }

    let config = load_config_exit_if_err(cli_args);

    start_tracing_if_necessary(&config);

    trace!("config = {:?}", config);

    if let Err(e) = run(config).await {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code_from_error(&e));
    }

    Ok(())
}

fn load_config_exit_if_err(cli_args: CLIArgs) -> Config {
    match Config::try_from(cli_args) {
        Ok(config) => config,
        Err(error_message) => {
            clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit()
        }
    }
}

fn start_tracing_if_necessary(config: &Config) -> bool {
    let Some(tracing_config) = config.tracing_config.as_ref() else {
        return false;
    };

    tracing_init::init_tracing(tracing_config);
    true
}

async fn run(config: Config) -> Result<()> {
    match config.command {
        Command::Scan(scan_config) => run_scan(config.connection, scan_config).await,
        Command::Delete(delete_config) => run_delete(config.connection, delete_config).await,
    }
}

async fn run_scan(connection_config: ConnectionConfig, scan_config: ScanConfig) -> Result<()> {
    let token = resolve_personal_access_token(connection_config.pat.clone(), &StdioPromptHandler)?;
    let connection = Connection::connect(&connection_config, token).await?;

    let start_time = tokio::time::Instant::now();
    debug!("scan start.");

    let out_csv = scan_config.out_csv.clone();
    let pipeline =
        ArtifactScanPipeline::new(scan_config, connection.build_service(), connection.storage());
    let rows = pipeline.run().await?;
    write_csv_file(&out_csv, &rows)?;

    let duration_sec = format!("{:.3}", start_time.elapsed().as_secs_f32());
    debug!(duration_sec = duration_sec, "scan has been completed.");
    Ok(())
}

async fn run_delete(connection_config: ConnectionConfig, delete_config: DeleteConfig) -> Result<()> {
    let records = validate_records(read_csv_file(&delete_config.in_csv)?)?;

    let confirmer = DeletionConfirmer::new(&delete_config);
    if !confirmer.confirm(&records)? {
        debug!("deletion declined by user.");
        return Ok(());
    }

    let token =
        resolve_personal_access_token(connection_config.pat.clone(), confirmer.prompt_handler())?;
    let connection = Connection::connect(&connection_config, token).await?;

    let report = confirmer.execute(&connection.storage(), &records).await?;
    if delete_config.dry_run {
        info!("{} item(s) would have been deleted.", report.simulated);
    } else {
        info!("{} item(s) deleted.", report.deleted);
    }
    Ok(())
}
