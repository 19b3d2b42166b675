//! `tldextract` command: split hostnames or URLs from the command line.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use serde::Serialize;

use tldextract_r::{Config, Engine, ExtractResult};

/// Parse hostname from a URL or FQDN.
#[derive(Parser, Debug)]
#[command(name = "tldextract", version, about)]
struct Cli {
    /// FQDNs or URLs to split
    #[arg(value_name = "FQDN|URL")]
    input: Vec<String>,

    /// Output one JSON object per input
    #[arg(short, long)]
    json: bool,

    /// Force fetch the latest suffix list before processing
    #[arg(short, long)]
    update: bool,

    /// Use an alternate URL or local file for suffix list data (repeatable)
    #[arg(long = "suffix-list-url", value_name = "URL|PATH")]
    suffix_list_urls: Vec<String>,

    /// Use an alternate suffix list cache directory
    #[arg(short, long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Include private domains
    #[arg(short = 'p', long, alias = "private-domains")]
    include_private_domains: bool,

    /// Never contact the network; use local files, the cache and the snapshot
    #[arg(long)]
    offline: bool,

    /// Don't fall back to the bundled snapshot of the suffix list
    #[arg(long)]
    no_fallback_to_snapshot: bool,

    /// Treat an additional suffix as public (repeatable)
    #[arg(long = "extra-suffix", value_name = "SUFFIX")]
    extra_suffixes: Vec<String>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    result: &'a ExtractResult,
    fqdn: String,
    registered_domain: String,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new()
            .with_private_domains(self.include_private_domains)
            .with_fallback_to_snapshot(!self.no_fallback_to_snapshot)
            .with_suffix_list_urls(self.suffix_list_urls.iter().cloned())
            .with_offline(self.offline)
            .with_extra_suffixes(self.extra_suffixes.iter().cloned());
        if let Some(ref dir) = self.cache_dir {
            config = config.with_cache_dir(dir);
        }
        config
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let engine = Engine::new(cli.config())?;

    if cli.update {
        engine.refresh(true)?;
    }

    let mut inputs: Vec<&String> = cli.input.iter().collect();
    inputs.sort();

    for input in inputs {
        let result = engine.extract(input)?;
        if cli.json {
            let output = JsonOutput {
                result: &result,
                fqdn: result.fqdn(),
                registered_domain: result.registered_domain(),
            };
            println!("{}", serde_json::to_string(&output)?);
        } else {
            println!("{}", result);
        }
    }
    Ok(())
}

/// Write usage to `out`; a failed write is logged rather than fatal
fn print_usage<W: Write>(out: &mut W) -> bool {
    match Cli::command().write_help(out) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to print usage: {}", e);
            false
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if cli.input.is_empty() && !cli.update {
        print_usage(&mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tldextract: {}", e);
            ExitCode::FAILURE
        }
    }
}
