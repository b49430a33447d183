// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: translate a flat cabinet export into a module forest (JSON).
//!
//! Usage:
//!   cabinet-translate <records.json> [options]

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use cabinet_lite_processing::{AnyCatalog, HttpCatalog, StaticCatalog, TranslateConfig, Translator};
use tracing_subscriber::EnvFilter;

struct Args {
    input: PathBuf,
    catalog_file: Option<PathBuf>,
    catalog_url: Option<String>,
    output: Option<PathBuf>,
    pretty: bool,
}

fn print_usage() {
    eprintln!("Usage: cabinet-translate <records.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --catalog <file>       JSON array of board reference codes");
    eprintln!("  --catalog-url <url>    Fetch board codes over HTTP");
    eprintln!("                         (default: $CABINET_CATALOG_URL)");
    eprintln!("  --output <file>        Write the forest here instead of stdout");
    eprintln!("  --pretty               Indent the JSON output");
    eprintln!();
    eprintln!("Other settings come from CABINET_* environment variables;");
    eprintln!("RUST_LOG sets the log level.");
}

fn take_value(args: &[String], i: &mut usize) -> anyhow::Result<String> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i).cloned().with_context(|| format!("missing value for {}", flag))
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return Ok(None);
    }

    let mut parsed = Args {
        input: PathBuf::from(&args[1]),
        catalog_file: None,
        catalog_url: None,
        output: None,
        pretty: false,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" => parsed.catalog_file = Some(PathBuf::from(take_value(&args, &mut i)?)),
            "--catalog-url" => parsed.catalog_url = Some(take_value(&args, &mut i)?),
            "--output" => parsed.output = Some(PathBuf::from(take_value(&args, &mut i)?)),
            "--pretty" => parsed.pretty = true,
            other => bail!("unknown option: {}", other),
        }
        i += 1;
    }
    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            print_usage();
            std::process::exit(1);
        }
    };

    let mut config = TranslateConfig::from_env();
    if let Some(url) = args.catalog_url {
        config.catalog_url = Some(url);
    }

    let catalog = match (&args.catalog_file, &config.catalog_url) {
        (Some(path), _) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("cannot read catalog '{}'", path.display()))?;
            AnyCatalog::Static(StaticCatalog::from_json(&json)?)
        }
        (None, Some(url)) => {
            let timeout = Duration::from_secs(config.http_timeout_secs);
            AnyCatalog::Http(HttpCatalog::new(url, timeout)?)
        }
        (None, None) => AnyCatalog::Static(StaticCatalog::default()),
    };

    let input = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("cannot read records '{}'", args.input.display()))?;

    let translator = Translator::new(catalog, config);
    let forest = translator.translate_json(&input).await?;
    let json = if args.pretty {
        forest.to_json_pretty()?
    } else {
        forest.to_json()?
    };

    match &args.output {
        Some(path) => tokio::fs::write(path, json)
            .await
            .with_context(|| format!("cannot write '{}'", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
