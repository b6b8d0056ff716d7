//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
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
//


use clap::Parser;
use rbngate_gateway::config::{Arguments, Configuration, SessionConfig, USAGE};
use rbngate_gateway::server;
use std::io::Write;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let code = run().await;

    // Standard input may still be parked in a blocking read
    std::process::exit(code);
}

async fn run() -> i32 {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging, standard output belongs to the cluster link
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(false)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    // Load configuration from a file with environment variable substitution
    let config = match arguments.config_file.as_deref() {
        Some(path) => match Configuration::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Configuration load error: {}", err);
                return 1;
            }
        },
        None => Configuration::default(),
    };
    debug!("Configuration loaded: {:?}", config);

    let session_config = match SessionConfig::resolve(&arguments, &config) {
        Ok(session_config) => session_config,
        Err(_) => {
            print!("{}", USAGE);
            let _ = std::io::stdout().flush();
            return 1;
        }
    };

    info!(
        "Starting RBN Gateway for {} ({})",
        session_config.cluster.call, session_config.cluster.prompt
    );

    let result = match arguments.listen {
        Some(addr) => server::serve_tcp(addr, session_config).await,
        None => server::serve_stdio(session_config).await,
    };

    match result {
        Ok(end) => {
            info!("Gateway finished: {:?}", end);
            0
        }
        Err(err) => {
            error!("Gateway error: {}", err);
            eprintln!("{}", err);
            1
        }
    }
}
