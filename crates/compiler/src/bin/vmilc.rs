//! vmilc - assembles VMIL text into loadable images and lists existing images.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use compiler::{assemble, disassemble, ImageBuilder, ImageHeader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "vmilc")]
#[command(author, version, about = "VMIL assembler and image tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a source file into an image
    Assemble {
        /// VMIL assembly source
        input: PathBuf,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Number of 8-byte variable slots
        #[arg(long, default_value = "0")]
        vars: u64,

        /// Fault handler offset from the entry point
        #[arg(long, default_value = "0")]
        error_displacement: u64,

        /// Memory region size (defaults to the smallest that fits)
        #[arg(long)]
        image_len: Option<u64>,
    },

    /// Print the header and code listing of an image
    Disasm {
        /// Image file
        image: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vmilc=info,compiler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Assemble {
            input,
            output,
            vars,
            error_displacement,
            image_len,
        } => {
            let source = fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;

            let code = match assemble(&source) {
                Ok(code) => code,
                Err(err) => {
                    eprint!("{}", err.render(&input.display().to_string(), &source));
                    bail!("assembly of {} failed", input.display());
                }
            };

            let mut builder = ImageBuilder::new(code)
                .variables(vars)
                .error_displacement(error_displacement);
            if let Some(len) = image_len {
                builder = builder.image_len(len);
            }
            let image = builder.build().context("cannot build image")?;

            fs::write(&output, &image)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "{} {} ({} bytes)",
                "wrote".green().bold(),
                output.display(),
                image.len()
            );
        }
        Command::Disasm { image } => {
            let bytes =
                fs::read(&image).with_context(|| format!("failed to read {}", image.display()))?;
            let Some((header, code)) = ImageHeader::parse(&bytes) else {
                bail!("{} is too short to hold an image header", image.display());
            };

            println!("{}", image.display().to_string().bold().blue());
            println!("  image length       {}", header.image_len);
            println!("  variables          {}", header.variables);
            println!("  error displacement {}", header.error_displacement);
            println!();
            for line in disassemble(code) {
                println!("  {}", line);
            }
        }
    }
    Ok(())
}
