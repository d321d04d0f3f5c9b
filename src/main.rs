#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(
    name = "confmeta2schema",
    about = "Generate a JSON Schema for configuration files from configuration-property metadata"
)]
struct Cli {
    /// Paths or URLs of metadata files
    #[arg(value_name = "METADATA", required = true)]
    inputs: Vec<String>,

    /// Output file (stdout when absent)
    #[arg(short, long, value_name = "OUT")]
    output: Option<std::path::PathBuf>,

    /// TOML file with synthesis options
    #[arg(long, value_name = "FILE")]
    config: Option<std::path::PathBuf>,

    /// JSON type catalogue used to expand composite types
    #[arg(long, value_name = "CATALOG")]
    types: Option<std::path::PathBuf>,

    /// Include properties under this prefix (repeatable)
    #[arg(long, value_name = "PREFIX")]
    include: Vec<String>,

    /// Include every property
    #[arg(long, default_value_t = false)]
    all: bool,

    /// Emit YAML instead of JSON
    #[arg(long, default_value_t = false)]
    yaml: bool,

    /// Print the diagnostic report to stderr
    #[arg(long, default_value_t = false)]
    diagnostics: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    use tracing_subscriber::filter::{EnvFilter, LevelFilter};

    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> confschema::Result<()> {
    use confschema::introspect::TypeCatalog;
    use confschema::sources::load_locations;
    use confschema::{Error, SchemaBuilder, SchemaConfig};

    let config = match &cli.config {
        Some(path) => SchemaConfig::from_file(path)?,
        None => SchemaConfig::default(),
    };
    let catalog = match &cli.types {
        Some(path) => TypeCatalog::from_file(path)?,
        None => TypeCatalog::new(),
    };

    let fragments = load_locations(&cli.inputs);
    let catalogue = confschema::metadata::merge(fragments);

    let included = if cli.all {
        vec![String::new()]
    } else {
        cli.include.clone()
    };
    let synthesis = SchemaBuilder::new(&config)
        .with_introspector(&catalog)
        .with_refinements(&catalog)
        .build(&catalogue, &included);

    let rendered = if cli.yaml {
        serde_yaml::to_string(&synthesis.document)
            .map_err(|e| Error::Render(e.to_string()))?
    } else {
        let mut text = synthesis.document.to_json_pretty()?;
        text.push('\n');
        text
    };

    match &cli.output {
        Some(path) => std::fs::write(path, rendered).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?,
        None => print!("{rendered}"),
    }

    if cli.diagnostics {
        eprintln!("{}", serde_json::to_string_pretty(&synthesis.diagnostics)?);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary is only available with the `cli` feature enabled.");
    std::process::exit(1);
}
