// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod config;
mod plan;
mod run;

use config::Config;
use plan::Plan;
use run::Options;

/// Build the extension described by an `extension.toml`
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Build configuration
    #[arg(short, long, default_value = "extension.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the build steps
    Plan,
    /// Compile every entry and copy the static assets
    Build {
        /// Build wasm in release mode
        #[arg(long)]
        release: bool,

        /// Log the steps without running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Copy the static assets only
    CopyAssets,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Args { config, command } = Args::parse();

    let config = Config::load(&config)?;
    let plan = Plan::new(&config)?;

    match command {
        Cmd::Plan => {
            for step in plan.steps() {
                println!("{step}");
            }
        }
        Cmd::Build { release, dry_run } => {
            run::execute(plan.steps(), Options { release, dry_run })?;
        }
        Cmd::CopyAssets => {
            run::execute(&plan.assets, Options::default())?;
        }
    }

    Ok(())
}
