//! Binary to generate VK API bindings.
//!
//! Usage: `vkbindgen --schema-dir vk-api-schema --out src/vk`
//!
//! Reads the schema documents from `--schema-dir` and publishes the generated
//! module directory at `--out`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vk_bindgen::{BindgenError, Bundle, GenerateSettings, SchemaSet, generate, output};

#[derive(Parser, Debug)]
#[expect(clippy::struct_excessive_bools)]
#[command(name = "vkbindgen", version, about = "Generate Rust bindings from the VK API schema")]
struct Cli {
    /// Directory holding objects.json, responses.json, methods.json,
    /// errors.json and package.json
    #[arg(long, default_value = "vk-api-schema")]
    schema_dir: PathBuf,

    /// Module directory to publish
    #[arg(long, default_value = "src/vk")]
    out: PathBuf,

    /// Print the generated files instead of writing them
    #[arg(long)]
    dry_run: bool,

    /// Reject unknown or unsupported schema keywords
    #[arg(long)]
    strict: bool,

    /// Fail when two allOf members declare the same field
    #[arg(long)]
    deny_merged_collisions: bool,

    /// Skip the generated test files
    #[arg(long)]
    no_tests: bool,

    /// Module path the generated code uses for the support runtime
    #[arg(long, default_value = vk_bindgen::settings::DEFAULT_RUNTIME_PATH)]
    runtime_path: String,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> GenerateSettings {
        GenerateSettings {
            deny_invalid_unknown_json_schema: self.strict,
            deny_merged_collisions: self.deny_merged_collisions,
            runtime_path: self.runtime_path.clone(),
            emit_tests: !self.no_tests,
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter: EnvFilter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run(cli: &Cli) -> Result<(), BindgenError> {
    let schemas: SchemaSet = SchemaSet::from_dir(&cli.schema_dir)?;
    let bundle: Bundle = generate(&schemas, &cli.settings())?;
    if cli.dry_run {
        for (name, source) in bundle.files() {
            println!("// ---- {name} ----");
            println!("{source}");
        }
        return Ok(());
    }
    output::publish(&bundle, &cli.out)
}

fn main() {
    let cli: Cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
