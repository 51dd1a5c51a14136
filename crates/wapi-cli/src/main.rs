//! WAPI command-line reader
//!
//! Reads one WAPI object type with paging and prints the records as JSON:
//!
//! ```text
//! wapi-cli record:host zone=example.com name~=^web
//! ```
//!
//! Connection settings come from `WAPI_*` environment variables (see
//! `wapi_client::config`). `WAPI_MAX_RESULTS` bounds the read, `WAPI_PAGE_SIZE`
//! sets the page size and `WAPI_RETURN_FIELDS` takes a comma-separated list.

use anyhow::{bail, Context, Result};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wapi_client::{ClientConfig, ReadOptions, WapiClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(object) = args.next() else {
        bail!("usage: wapi-cli <object> [field=value ...]");
    };
    let filters = args
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| format!("filter '{}' is not in field=value form", arg))
        })
        .collect::<Result<Vec<_>>>()?;

    let config = ClientConfig::from_env().context("loading WAPI configuration")?;
    let options = read_options()?;

    info!("Configuration:");
    info!("  WAPI base URL: {}", config.session().base_url());
    info!("  TLS verify: {}", config.tls_verify);

    let client = WapiClient::new(&config)?;
    let filter_refs: Vec<(&str, &str)> = filters
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let records = client
        .read_paged(&object, &filter_refs, &options)
        .await
        .with_context(|| format!("reading {}", object))?;

    info!("Read {} {} record(s)", records.len(), object);
    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}

fn read_options() -> Result<ReadOptions> {
    let mut options = ReadOptions::new();

    if let Ok(value) = env::var("WAPI_PAGE_SIZE") {
        options = options.page_size(
            value
                .parse()
                .with_context(|| format!("WAPI_PAGE_SIZE must be an integer, got '{}'", value))?,
        );
    }
    if let Ok(value) = env::var("WAPI_MAX_RESULTS") {
        options = options.max_results(
            value
                .parse()
                .with_context(|| format!("WAPI_MAX_RESULTS must be an integer, got '{}'", value))?,
        );
    }
    if let Ok(value) = env::var("WAPI_RETURN_FIELDS") {
        options = options.return_fields(value.split(',').map(str::trim).filter(|f| !f.is_empty()));
    }

    Ok(options)
}
