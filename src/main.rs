use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::bail;
use clap::{Parser, Subcommand};
use safe_decode_uri_component::{
    batch::{self, DecodeReport},
    log_error, log_info,
    utils::{self, LogLevel},
    DecodeOptions, Decoder, Policy,
};

#[derive(Parser, Debug)]
#[command(name = "safe-decode", version, about = "Percent-decode URI components without panicking")]
struct Cli {
    /// Minimum level written to stderr (debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode one or more percent-encoded strings
    Decode {
        /// Encoded strings, one result line per input
        inputs: Vec<String>,

        /// Read inputs from a file, one per line
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// strict, lenient or pass-through
        #[arg(long, short, default_value_t = Policy::PassThrough)]
        policy: Policy,

        /// Print one JSON object per input instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Percent-encode a string
    Encode { input: String },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    utils::set_global_log_level(cli.log_level);

    match cli.command {
        Command::Decode {
            inputs,
            file,
            policy,
            json,
        } => decode_inputs(inputs, file, policy, json),
        Command::Encode { input } => {
            println!("{}", utils::url_encode(&input));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn decode_inputs(
    inputs: Vec<String>,
    file: Option<PathBuf>,
    policy: Policy,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let decoder = Decoder::new(DecodeOptions { policy });

    let mut reports = batch::decode_all(&decoder, &inputs);
    if let Some(path) = file {
        reports.extend(batch::decode_file(&decoder, path)?);
    }
    if reports.is_empty() {
        bail!("nothing to decode: pass inputs or --file");
    }

    log_info!("Main", "decoded {} input(s) with {} policy", reports.len(), policy);

    let mut failed = 0;
    for report in &reports {
        print_report(report, json)?;
        if !report.is_ok() {
            failed += 1;
        }
    }

    if failed > 0 {
        log_error!("Main", "{} of {} input(s) failed to decode", failed, reports.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &DecodeReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }

    match (&report.decoded, &report.error) {
        (Some(decoded), _) => println!("{}", decoded),
        (None, Some(err)) => eprintln!("{}: {}", report.input, err),
        (None, None) => {}
    }
    Ok(())
}
