// SPDX-License-Identifier: GPL-3.0-or-later
use std::fs;

use anyhow::{anyhow, Context};
use structopt::StructOpt;
use tracing::{debug, debug_span, error};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter, Registry};

use vibe_segment::driver;
use vibe_segment::settings::{self, Args, EngineSettings, PartialEngineSettings};

/// Configuration priority, least to greatest: defaults -> config file ->
/// `VIBE_`-prefixed environment variables -> CLI flags.
fn create_config(args: &Args) -> anyhow::Result<EngineSettings> {
    let config_text = match &args.config_path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("reading configuration file {:?}", path))?,
        ),
        None => None,
    };
    let env = PartialEngineSettings::from_env();
    let cli = args.as_overlay();
    settings::resolve(config_text.as_deref(), env, cli)
        .map_err(|e| anyhow!("invalid configuration: {}", e))
}

fn main() {
    let fmt_sub = tracing_fmt::Layer::default().with_thread_names(true);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("'info' was not recognized as a valid log filter");
    Registry::default().with(fmt_sub).with(env_filter).init();

    let args = Args::from_args();
    let span = debug_span!("setup");
    let engine = {
        let _enter = span.enter();
        let config = match create_config(&args) {
            Ok(config) => config,
            Err(e) => {
                error!("{:?}", e);
                std::process::exit(1);
            }
        };
        debug!(?config, "final config");
        config.build(args.seed)
    };

    let mut engine = match engine {
        Ok(engine) => engine,
        Err(e) => {
            error!("{:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating output directory {:?}", args.output_dir))
    {
        error!("{:?}", e);
        std::process::exit(1);
    }

    match driver::run(&mut engine, &args.input_dir, &args.output_dir) {
        Ok(0) => {
            error!("no input{{n}}.ppm frames found in {:?}", args.input_dir);
            std::process::exit(1);
        }
        Ok(_) => {}
        Err(e) => {
            error!("{:?}", e);
            std::process::exit(1);
        }
    }
}
