// Copyright 2026 Shinobu Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shinobu_common_telemetry::{LogFormat, LoggingOptions, init_global_logging, set_panic_hook};
use shinobu_nav::ContainerConfig;
use snafu::{ResultExt, Whatever};

mod build_info;
mod replay;

use replay::{Replayer, Script};

#[derive(Debug, Parser)]
#[clap(
name = "shinobu",
about = "shinobu-cmd",
author = build_info::AUTHOR,
version = build_info::FULL_VERSION)]
struct Cli {
    /// Level filter, e.g. `debug` or `info,shinobu_nav=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory for rotated log files.
    #[arg(long, global = true, default_value = "")]
    log_dir: String,

    /// Emit JSON log lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    commands: Commands,
}

impl Cli {
    fn logging_options(&self) -> LoggingOptions {
        LoggingOptions::builder()
            .dir(self.log_dir.clone())
            .maybe_level(self.log_level.clone())
            .log_format(if self.log_json {
                LogFormat::Json
            } else {
                LogFormat::Text
            })
            .build()
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    Replay(ReplayArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
#[command(flatten_help = true)]
#[command(long_about = r"

Replays a scripted session against a headless navigation container.
Examples:

shinobu replay demos/open_and_pick.toml
shinobu replay demos/open_and_pick.toml --config shinobu.toml --fps 120

")]
struct ReplayArgs {
    /// TOML script of timed steps.
    script: PathBuf,

    /// Container configuration; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 60)]
    fps: u32,
}

impl ReplayArgs {
    async fn run(&self) -> Result<(), Whatever> {
        let config = match &self.config {
            Some(path) => ContainerConfig::from_toml_file(path)
                .with_whatever_context(|_| format!("failed to load {}", path.display()))?,
            None => ContainerConfig::default(),
        };
        let script = Script::from_toml_file(&self.script)?;
        let summary = Replayer::new(&config, script, self.fps)?.run().await?;
        println!("{summary}");
        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
#[command(flatten_help = true)]
#[command(long_about = r"

Prints the default container configuration as TOML.
Examples:

shinobu config > shinobu.toml

")]
struct ConfigArgs {}

impl ConfigArgs {
    fn run(&self) -> Result<(), Whatever> {
        let text = ContainerConfig::default()
            .to_toml_string()
            .whatever_context("failed to encode the default config")?;
        print!("{text}");
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Whatever> {
    let cli = Cli::parse();
    let _guards = init_global_logging("shinobu", &cli.logging_options());
    set_panic_hook();
    match cli.commands {
        Commands::Replay(ra) => ra.run().await,
        Commands::Config(ca) => ca.run(),
    }
}
