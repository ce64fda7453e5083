mod synth;

use std::fmt::Write as _;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use kt_db::{File, check_file};
use kt_errors::{Diagnostic, Renderer};
use kt_psi::PsiFactory;
use kt_stubs::{StubRegistry, serialize_tree};
use salsa::DatabaseImpl;
use synth::Template;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the syntax tree of a file.
    Parse { path: Utf8PathBuf },
    /// Print the stub tree of a file.
    Stubs {
        path: Utf8PathBuf,
        /// Also print the serialized streams.
        #[arg(long)]
        bytes: bool,
    },
    /// Build a fragment from text and print its tree.
    Synth {
        #[arg(value_enum)]
        template: Template,
        text: String,
    },
    /// Report the errors in a file.
    Check { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let db = DatabaseImpl::default();
    match cli.command {
        Command::Parse { path } => {
            let file = load(&db, path)?;
            print!("{:#?}", file.parse(&db).syntax_node());
            report(&db, file);
        }
        Command::Stubs { path, bytes } => {
            let file = load(&db, path)?;
            let tree = file.stub_tree(&db);
            print!("{tree:?}");

            if bytes {
                let bytes = serialize_tree(StubRegistry::standard(), tree)
                    .context("failed to serialize the stub tree")?;
                println!("shape:   {}", hex(&bytes.shape));
                println!("payload: {}", hex(&bytes.payload));
            }
        }
        Command::Synth { template, text } => {
            let factory = PsiFactory::new();
            if template == Template::Declaration {
                let count = factory.file(text.as_str())?.declarations().count();
                anyhow::ensure!(count == 1, "expected one declaration, found {count}");
            }

            let node = synth::synthesize(&factory, template, &text)
                .with_context(|| format!("failed to synthesize {template:?} from `{text}`"))?;
            print!("{node:#?}");
        }
        Command::Check { path } => {
            let file = load(&db, path)?;
            let errors = report(&db, file);
            anyhow::ensure!(errors == 0, "{errors} error(s) in `{}`", file.path(&db));
        }
    }

    Ok(())
}

fn load(db: &DatabaseImpl, path: Utf8PathBuf) -> anyhow::Result<File> {
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read `{path}`"))?;
    tracing::debug!(%path, bytes = text.len(), "loaded");
    Ok(File::new(db, path, text))
}

/// Renders the diagnostics of `file` to stderr and returns how many there were.
fn report(db: &DatabaseImpl, file: File) -> usize {
    let renderer = Renderer::styled();
    let diagnostics = check_file::accumulated::<Diagnostic>(db, file);

    let path = file.path(db).as_str();
    let text = file.text(db);

    for diagnostic in &diagnostics {
        eprintln!("{}", diagnostic.render(&renderer, path, text));
    }
    diagnostics.len()
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}
