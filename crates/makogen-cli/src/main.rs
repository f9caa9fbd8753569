//! makogen - print the public members of the classes declared in a namespace
//!
//! Prints one `Name: member,member` line per class/struct found in the
//! given file, or in the files directly inside the given directory.

use anyhow::Context;
use clap::{ArgAction, Parser};
use makogen_api::{render, ListerConfig, MemberLister, OutputFormat, DEFAULT_NAMESPACE};
use makogen_cpp::CppLister;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

mod logging;

/// List the public members of every class/struct declared in a C++ namespace
#[derive(Parser, Debug)]
#[command(name = "makogen", version, about)]
struct Cli {
    /// Source file, or directory whose files are listed (not recursive)
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Namespace whose classes are listed
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Define a macro for conditional blocks (applied after the defaults)
    #[arg(short = 'D', value_name = "NAME[=VALUE]")]
    define: Vec<String>,

    /// Undefine a macro (applied after every -D)
    #[arg(short = 'U', value_name = "NAME")]
    undefine: Vec<String>,

    /// Output format: text or json
    #[arg(long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Abort on the first file with syntax errors
    #[arg(long)]
    strict: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn lister_config(&self) -> ListerConfig {
        let mut config = ListerConfig::default()
            .with_namespace(&self.namespace)
            .with_strict(self.strict);

        for definition in &self.define {
            config = config.with_define(definition);
        }
        for name in &self.undefine {
            config = config.with_undefine(name);
        }

        config
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.lister_config();
    debug!(?config, "lister configuration");

    let lister = CppLister::with_config(config);
    let summaries = lister
        .list_public_members(&cli.path)
        .with_context(|| format!("cannot list {}", cli.path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&summaries, cli.format, &mut out).context("cannot write listing")?;

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.verbose, cli.quiet));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
