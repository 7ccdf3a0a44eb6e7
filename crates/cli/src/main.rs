//! `diamond` command line tool.
//!
//! Acts as deployment tooling for the registry: computes selectors, deploys a
//! registry from a TOML manifest and walks through a full upgrade sequence.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use diamond_registry::SystemClock;
use tracing_subscriber::EnvFilter;

mod commands;
mod manifest;

use manifest::Manifest;

#[derive(Parser, Debug)]
#[command(name = "diamond")]
#[command(about = "Upgradeable selector registry tooling")]
struct Args {
	/// Verbose logging (repeat for trace)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the canonical form and selector of each signature
	Selector {
		#[arg(required = true, value_name = "SIGNATURE")]
		signatures: Vec<String>,
	},
	/// Deploy a registry and print its bindings
	Deploy {
		/// Deployment manifest
		#[arg(short, long, value_name = "PATH")]
		manifest: Option<PathBuf>,
	},
	/// Deploy the token price ledger and upgrade it V1 -> V2 -> V3
	Demo {
		/// Date the registry clock reports, defaults to today
		#[arg(long, value_name = "YYYY-MM-DD")]
		today: Option<NaiveDate>,
	},
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	init_tracing(args.verbose);

	let lines = match args.command {
		Command::Selector { signatures } => commands::selectors(&signatures)?,
		Command::Deploy { manifest } => {
			let manifest = match manifest {
				Some(path) => Manifest::load(&path).with_context(|| format!("loading {}", path.display()))?,
				None => Manifest::default(),
			};
			let deployment = commands::deploy(&manifest, Arc::new(SystemClock))?;
			commands::describe(&deployment.diamond)
		}
		Command::Demo { today } => commands::demo(today.unwrap_or_else(|| Utc::now().date_naive()))?,
	};
	for line in lines {
		println!("{line}");
	}
	Ok(())
}

fn init_tracing(verbose: u8) {
	let default = match verbose {
		0 => "info",
		1 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
