#![forbid(unsafe_code)]

//! samlsig CLI: verify and sign SAML 2.0 messages.

use clap::{Parser, Subcommand};
use samlsig_core::{algorithm, Error};
use samlsig_dsig::DsigContext;
use samlsig_xml::Document;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "samlsig",
    about = "SAML 2.0 XML Signature verification and signing",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the signatures of a SAML message
    Verify {
        /// Input XML file
        file: PathBuf,

        /// Public key (SPKI, PEM or DER)
        #[arg(short = 'k', long)]
        key: PathBuf,

        /// Verbose output (debug logging, canonical data)
        #[arg(short, long)]
        verbose: bool,
    },

    /// Sign a SAML message template
    Sign {
        /// Template XML file (with empty DigestValue/SignatureValue)
        template: PathBuf,

        /// Private key (PKCS#8, PEM or DER)
        #[arg(short = 'k', long)]
        key: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output (debug logging, canonical data)
        #[arg(short, long)]
        verbose: bool,
    },

    /// List supported algorithms
    Info,
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Verify { verbose, .. } | Commands::Sign { verbose, .. } => *verbose,
        Commands::Info => false,
    };
    init_tracing(verbose);

    let result = match cli.command {
        Commands::Verify { file, key, verbose } => cmd_verify(&file, &key, verbose),
        Commands::Sign {
            template,
            key,
            output,
            verbose,
        } => cmd_sign(&template, &key, output, verbose),
        Commands::Info => cmd_info(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over the `--verbose` default.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_verify(file: &Path, key: &Path, verbose: bool) -> Result<(), Error> {
    let doc = Document::parse_bytes(&read_file(file)?)?;
    let key = samlsig_keys::loader::load_key_file(key)?;
    let ctx = DsigContext::new(key).with_debug(verbose);

    tracing::info!(file = %file.display(), "verifying");
    if samlsig_dsig::verify(&ctx, &doc)? {
        println!("OK");
        Ok(())
    } else {
        println!("INVALID");
        process::exit(1);
    }
}

fn cmd_sign(template: &Path, key: &Path, output: Option<PathBuf>, verbose: bool) -> Result<(), Error> {
    let mut doc = Document::parse_bytes(&read_file(template)?)?;
    let key = samlsig_keys::loader::load_key_file(key)?;
    let ctx = DsigContext::new(key).with_debug(verbose);

    tracing::info!(template = %template.display(), "signing");
    samlsig_dsig::sign(&ctx, &mut doc)?;

    let mut signed = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    signed.push_str(&doc.to_xml());
    signed.push('\n');
    write_output(output, signed.as_bytes())
}

fn cmd_info() -> Result<(), Error> {
    println!("samlsig: SAML 2.0 XML Signature profile");
    println!();
    println!("Digest algorithms:");
    println!("  {}", algorithm::SHA1);
    println!("  {}", algorithm::SHA256);
    println!();
    println!("Signature algorithms (RSA PKCS#1 v1.5):");
    println!("  {}", algorithm::RSA_SHA1);
    println!("  {}", algorithm::RSA_SHA256);
    println!();
    println!("Transforms:");
    println!("  {}", algorithm::ENVELOPED_SIGNATURE);
    println!("  {}", algorithm::EXC_C14N);
    println!("  {}", algorithm::EXC_C14N_WITH_COMMENTS);
    println!();
    println!("Key formats:");
    println!("  SPKI public keys, PKCS#8 private keys (PEM or DER)");
    Ok(())
}

// ── Utility functions ────────────────────────────────────────────────

fn with_path(path: &Path, e: std::io::Error) -> Error {
    Error::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display())))
}

fn read_file(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| with_path(path, e))
}

fn write_output(path: Option<PathBuf>, data: &[u8]) -> Result<(), Error> {
    match path {
        Some(p) => std::fs::write(&p, data).map_err(|e| with_path(&p, e)),
        None => {
            use std::io::Write;
            std::io::stdout().write_all(data).map_err(Error::Io)
        }
    }
}
