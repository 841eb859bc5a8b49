mod args;
mod output;

use anyhow::{Context, Result};
use maildiag_lib::{Diagnosis, Kind, ParserOptions, parse};

use std::io::{self, BufRead};

use args::{Cli, Commands, decode_control_pictures};
use output::{OutputRow, any_failed, explain_lines, write_explain_json, write_reports};

#[cfg(feature = "with-tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    // RUST_LOG=maildiag_lib=trace pour suivre la pile de contextes
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn diagnose_one(
    cli: &Cli,
    address: &str,
    options: &ParserOptions,
    expected: Option<Kind>,
) -> OutputRow {
    let address = if cli.control_pictures {
        decode_control_pictures(address)
    } else {
        address.to_string()
    };
    OutputRow::new(parse(&address, options), expected)
}

fn explain(cli: &Cli, tag: &str) -> Result<()> {
    let kind: Kind = tag.parse().context("explain")?;
    let diagnosis = Diagnosis::new(kind);
    match cli.format.as_str() {
        "json" => write_explain_json(&diagnosis),
        _ => {
            println!("{} (code {})", diagnosis.tag(), diagnosis.code());
            for line in explain_lines(&diagnosis) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    #[cfg(feature = "with-tracing")]
    init_tracing();

    let cli = Cli::parse();
    let expected = cli.expected_kind()?;
    let mut rows: Vec<OutputRow> = Vec::new();

    if cli.stdin {
        let options = cli.parser_options(None)?;
        for line in io::stdin().lock().lines() {
            let address = line.context("read stdin")?;
            rows.push(diagnose_one(&cli, &address, &options, expected));
        }
    } else {
        match &cli.cmd {
            Some(Commands::Validate { mode, email }) => {
                let options = cli.parser_options(mode.as_deref())?;
                rows.push(diagnose_one(&cli, email, &options, expected));
            }
            Some(Commands::Explain { tag }) => return explain(&cli, tag),
            None => {
                Cli::clap_command().print_help()?;
                println!();
                return Ok(());
            }
        }
    }

    write_reports(&rows, &cli)?;

    // codes de sortie : 0 OK, 2 invalides (ou attente non satisfaite), 1 fatal
    if any_failed(&rows) {
        std::process::exit(2);
    }
    Ok(())
}
