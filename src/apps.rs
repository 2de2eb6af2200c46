use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, error::ErrorKind};

use crate::config::{CurateConfig, StoreConfig, UnpackConfig};
use crate::constants::curate::{DEFAULT_TOKENIZER_MODEL, MAX_TOKEN_LENGTH};
use crate::constants::store::DEFAULT_REGION;
use crate::curate::curate;
use crate::transport::store::ObjectStoreClient;
use crate::unpack::unpack;

#[derive(Debug, Args)]
struct StoreArgs {
    #[arg(
        long = "endpoint_url",
        value_name = "URL",
        help = "Object-store endpoint (defaults to $AWS_ENDPOINT_URL, then http://localhost:4566; \
                an empty value uses the provider default)"
    )]
    endpoint_url: Option<String>,
    #[arg(long, default_value = DEFAULT_REGION, help = "Object-store region")]
    region: String,
    #[arg(
        long = "local_store_root",
        value_name = "DIR",
        conflicts_with = "endpoint_url",
        help = "Serve buckets from subdirectories of DIR instead of an S3 endpoint"
    )]
    local_store_root: Option<PathBuf>,
}

impl StoreArgs {
    fn into_config(self) -> StoreConfig {
        let mut config = StoreConfig::from_env().with_region(self.region);
        match self.endpoint_url {
            Some(endpoint) if endpoint.trim().is_empty() => config = config.without_endpoint(),
            Some(endpoint) => config = config.with_endpoint(endpoint),
            None => {}
        }
        if let Some(root) = self.local_store_root {
            config = config.with_local_root(root);
        }
        config
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "unpack_to_raw",
    disable_help_subcommand = true,
    about = "Unpack and combine protein data, then upload to the object store",
    long_about = "Read every CSV or data- file under the train/, test/ and dev/ subfolders of --input_dir, concatenate them into one table with a header, and upload it to --bucket_name as --output_file_name."
)]
struct UnpackCli {
    #[arg(
        long = "input_dir",
        value_name = "PATH",
        help = "Path to input directory containing subfolders"
    )]
    input_dir: PathBuf,
    #[arg(long = "bucket_name", help = "Destination bucket name")]
    bucket_name: String,
    #[arg(
        long = "output_file_name",
        help = "Name of the output combined CSV file"
    )]
    output_file_name: String,
    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Debug, Parser)]
#[command(
    name = "process_to_curated",
    disable_help_subcommand = true,
    about = "Process data from the staging bucket to the curated bucket",
    long_about = "Download a combined table from --bucket_staging, tokenize its sequence column into fixed-length token columns, and upload the result to --bucket_curated."
)]
struct CurateCli {
    #[arg(long = "bucket_staging", help = "Name of the staging bucket")]
    bucket_staging: String,
    #[arg(long = "bucket_curated", help = "Name of the curated bucket")]
    bucket_curated: String,
    #[arg(
        long = "input_file",
        help = "Name of the input file in the staging bucket"
    )]
    input_file: String,
    #[arg(
        long = "output_file",
        help = "Name of the output file in the curated bucket"
    )]
    output_file: String,
    #[arg(
        long = "model_name",
        default_value = DEFAULT_TOKENIZER_MODEL,
        help = "Tokenizer model name"
    )]
    model_name: String,
    #[arg(
        long = "max_length",
        default_value_t = MAX_TOKEN_LENGTH,
        value_parser = parse_positive_usize,
        help = "Number of token columns per row"
    )]
    max_length: usize,
    #[arg(
        long = "tokenizer_file",
        value_name = "PATH",
        help = "Local tokenizer.json or vocab.txt used instead of downloading --model_name"
    )]
    tokenizer_file: Option<PathBuf>,
    #[command(flatten)]
    store: StoreArgs,
}

/// Run the unpacker with command-line arguments (program name excluded).
pub fn run_unpack<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();

    let Some(cli) =
        parse_cli::<UnpackCli, _>(std::iter::once("unpack_to_raw".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let client = ObjectStoreClient::from_config(&cli.store.into_config())?;
    let config = UnpackConfig::new(cli.input_dir, cli.bucket_name, cli.output_file_name);
    let summary = unpack(&client, &config)?;

    println!(
        "Combined file ({} rows from {} files) uploaded to bucket '{}' as '{}'.",
        summary.rows, summary.files, config.bucket, config.output_key
    );
    Ok(())
}

/// Run the curator with command-line arguments (program name excluded).
pub fn run_curate<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();

    let Some(cli) = parse_cli::<CurateCli, _>(
        std::iter::once("process_to_curated".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let client = ObjectStoreClient::from_config(&cli.store.into_config())?;
    let mut config = CurateConfig::new(
        cli.bucket_staging,
        cli.bucket_curated,
        cli.input_file,
        cli.output_file,
    )
    .with_tokenizer_model(cli.model_name)
    .with_max_length(cli.max_length);
    if let Some(path) = cli.tokenizer_file {
        config = config.with_tokenizer_file(path);
    }
    let summary = curate(&client, &config)?;

    println!(
        "Processing and upload completed successfully ({} rows, {} columns).",
        summary.rows, summary.columns
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!(
            "Could not parse --max_length value '{}' as a positive integer",
            raw
        )
    })?;
    if parsed == 0 {
        return Err("--max_length must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
