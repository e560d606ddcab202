use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::Ordering;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use corkscrew_core::{
    ConfigLoader, Crawler, Document, FetchConfig, Fetcher, ProductConfig, ProductRecord, RecordBuilder, SiteConfig,
    record_to_json, write_csv_file, write_records,
};
use owo_colors::OwoColorize;

mod echo;
use echo::{print_banner, print_info, print_step, print_success, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for single-page extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Invalid format: {}. Valid options: json, csv", s)),
        }
    }
}

/// Crawl e-commerce product pages into structured records
#[derive(Parser, Debug)]
#[command(name = "corkscrew")]
#[command(author = "Corkscrew Contributors")]
#[command(version = VERSION)]
#[command(about = "Crawl product pages into structured records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose progress output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl collection pages with a site configuration and write a CSV
    Crawl(CrawlArgs),
    /// Extract one product page and print the record
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Site configuration name (e.g. "totalwine")
    #[arg(long, value_name = "NAME")]
    site: String,

    /// Product configuration name (e.g. "wine")
    #[arg(long, value_name = "TYPE")]
    product: String,

    /// File with collection page URLs, one per line ("#" comments allowed)
    #[arg(long, value_name = "FILE")]
    collections: PathBuf,

    /// Output CSV file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Max products to crawl
    #[arg(long, value_name = "NUM")]
    limit: Option<usize>,

    /// Custom configuration directory
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Originating page URL when reading from a file or stdin
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Site configuration name (omit for pure auto-detection)
    #[arg(long, value_name = "NAME")]
    site: Option<String>,

    /// Product configuration name
    #[arg(long, value_name = "TYPE")]
    product: Option<String>,

    /// Custom configuration directory
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Output format (json, csv)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn config_loader(config_dir: Option<&PathBuf>) -> ConfigLoader {
    match config_dir {
        Some(dir) => ConfigLoader::new(dir),
        None => ConfigLoader::default(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.verbose {
        print_banner();
    }

    match cli.command {
        Command::Crawl(args) => run_crawl(args, cli.verbose).await,
        Command::Extract(args) => run_extract(args, cli.verbose).await,
    }
}

async fn run_crawl(args: CrawlArgs, verbose: bool) -> anyhow::Result<()> {
    let mut loader = config_loader(args.config_dir.as_ref());

    let site = loader
        .load_site(&args.site)
        .with_context(|| format!("Failed to load site config '{}'", args.site))?;
    let product = loader
        .load_product(&args.product)
        .with_context(|| format!("Failed to load product config '{}'", args.product))?;

    let collection_urls = read_url_file(&args.collections)?;
    if collection_urls.is_empty() {
        anyhow::bail!("No collection URLs in {}", args.collections.display());
    }

    if verbose {
        print_info(&format!(
            "Site: {}  Product type: {}  Collections: {}",
            site.site.name,
            product.product_type,
            collection_urls.len()
        ));
        print_step(1, 3, "Scanning collection pages for product links");
    }

    let builder = RecordBuilder::from_config(&site, &product).context("Invalid field configuration")?;
    let fetcher = Fetcher::new(FetchConfig::from_site(&site.site, &site.error_handling))
        .context("Failed to build HTTP client")?;
    let mut crawler = Crawler::new(fetcher, builder);

    // Ctrl-C stops iteration between URLs; records gathered so far are
    // still written below.
    let cancel = crawler.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.store(true, Ordering::Relaxed);
        }
    });

    let mut product_urls = crawler.discover(&collection_urls).await;
    if let Some(limit) = args.limit {
        product_urls.truncate(limit);
    }

    if product_urls.is_empty() {
        print_warning("No product URLs found on collection pages");
        return Ok(());
    }

    if verbose {
        print_step(2, 3, &format!("Crawling {} product pages", product_urls.len()));
    }

    let records = crawler.crawl(&product_urls).await;

    if verbose {
        print_step(3, 3, "Writing output");
    }

    let field_order = product.enabled_field_names();
    write_csv_file(&args.output, &records, &field_order)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    print_success(&format!(
        "Saved {} records to {}",
        records.len(),
        args.output.display().bright_white()
    ));

    Ok(())
}

async fn run_extract(args: ExtractArgs, verbose: bool) -> anyhow::Result<()> {
    let mut loader = config_loader(args.config_dir.as_ref());

    let site = match &args.site {
        Some(name) => loader
            .load_site(name)
            .with_context(|| format!("Failed to load site config '{}'", name))?,
        None => SiteConfig::default(),
    };
    let product = match &args.product {
        Some(name) => loader
            .load_product(name)
            .with_context(|| format!("Failed to load product config '{}'", name))?,
        None => ProductConfig::default(),
    };

    let is_remote = args.input.starts_with("http://") || args.input.starts_with("https://");

    let html = if args.input == "-" {
        if verbose {
            print_step(1, 3, "Reading from stdin");
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else if is_remote {
        if verbose {
            print_step(1, 3, &format!("Fetching {}", args.input.bright_white().underline()));
        }
        let config = FetchConfig {
            timeout: args.timeout,
            user_agent: args
                .user_agent
                .clone()
                .unwrap_or_else(|| FetchConfig::default().user_agent),
            ..FetchConfig::default()
        };
        let mut fetcher = Fetcher::new(config).context("Failed to build HTTP client")?;
        fetcher.fetch(&args.input).await.context("Failed to fetch URL")?
    } else {
        if verbose {
            print_step(1, 3, &format!("Reading file {}", args.input.bright_white()));
        }
        fs::read_to_string(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };

    let page_url = if is_remote {
        args.input.clone()
    } else {
        args.url.clone().unwrap_or_default()
    };

    if verbose {
        print_step(2, 3, "Extracting product record");
    }

    let doc = if page_url.is_empty() {
        Document::parse(&html)
    } else {
        Document::parse_with_url(&html, &page_url).context("Invalid page URL")?
    };

    let builder = RecordBuilder::from_config(&site, &product).context("Invalid field configuration")?;
    let record = builder.build(&doc, &page_url);

    if !record.is_valid() {
        print_warning("No title found on this page");
    }

    if verbose {
        print_step(3, 3, "Writing output");
    }

    let output = render_record(&record, &product, args.format)?;

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Record written to {}", path.display()));
        }
        None => {
            println!("{}", output.trim_end());
        }
    }

    Ok(())
}

fn render_record(record: &ProductRecord, product: &ProductConfig, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&record_to_json(record)).context("Failed to serialize record")
        }
        OutputFormat::Csv => {
            let field_order: Vec<String> = if product.fields.is_empty() && product.extra_fields.is_empty() {
                record.field_names().map(str::to_string).collect()
            } else {
                product.enabled_field_names()
            };

            let mut out = Vec::new();
            write_records(&mut out, std::slice::from_ref(record), &field_order)
                .context("Failed to serialize record")?;
            String::from_utf8(out).context("CSV output was not valid UTF-8")
        }
    }
}

fn read_url_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
