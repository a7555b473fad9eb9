// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::{Parser, ValueEnum};
use fxql_parser::{FxqlResponse, FxqlService};
use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// FXQL - Parse currency-exchange statements
///
/// Reads FXQL source from a file (or stdin) and prints the accepted
/// records, or every invalid field with its position.
#[derive(Parser, Debug)]
#[command(name = "fxql")]
#[command(about = "Parses and validates FXQL statements", long_about = None)]
struct Args {
    /// Path to a file with FXQL statements; `-` or omitted reads stdin
    ///
    /// Example: fxql rates.fxql --format csv > rates.csv
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The JSON response envelope
    Json,
    /// One CSV row per accepted record
    Csv,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let source = match read_source(args.input.as_ref()) {
        Ok(source) => source,
        Err(e) => {
            error!("Error reading input: {e}");
            process::exit(1);
        }
    };

    let service = FxqlService::new();
    let response = FxqlResponse::from(service.process(&source));

    let written = match args.format {
        Format::Json => write_json(&response, io::stdout().lock()),
        Format::Csv => write_csv(&response, io::stdout().lock(), io::stderr().lock()),
    };
    if let Err(e) = written {
        error!("Error writing output: {e}");
        process::exit(1);
    }

    if !response.is_success() {
        process::exit(1);
    }
}

/// Reads the whole submission from `path`, or stdin for `None` / `-`.
fn read_source(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

/// Writes the response envelope as pretty-printed JSON.
fn write_json<W: Write>(response: &FxqlResponse, mut writer: W) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(&mut writer, response)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes accepted records as CSV to `out`, anything else as plain lines to `err`.
///
/// # CSV Format
///
/// Columns follow [`CSV_HEADER`]. The header is written even when no
/// statement was found.
fn write_csv<W: Write, E: Write>(
    response: &FxqlResponse,
    out: W,
    mut err: E,
) -> Result<(), Box<dyn Error>> {
    match response {
        FxqlResponse::Parsed { data, .. } => {
            let mut wtr = csv::Writer::from_writer(out);
            for entry in data {
                wtr.serialize(entry)?;
            }
            if data.is_empty() {
                wtr.write_record(CSV_HEADER)?;
            }
            wtr.flush()?;
        }
        FxqlResponse::Rejected { message, .. } => {
            for line in message {
                writeln!(err, "{line}")?;
            }
        }
        FxqlResponse::Failed { message, .. } => writeln!(err, "{message}")?,
    }
    Ok(())
}

const CSV_HEADER: [&str; 6] = [
    "EntryId",
    "SourceCurrency",
    "DestinationCurrency",
    "SellPrice",
    "BuyPrice",
    "CapAmount",
];
