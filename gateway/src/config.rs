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


use crate::error::GatewayError;
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;
use std::net::SocketAddr;

/// Usage text printed when the gateway is started without its parameters
pub const USAGE: &str = "rbngate is a Gateway between a RBN server and a DXSpider server.\n\n\
You must enter the parameters...\n\
rbngate 'Cluster Callsign' 'Cluster Prompt' 'RBN Server' 'RBN Port' 'RBN User Callsign'\n\n\
Example:\n\
rbngate EA0XX-1 rbn-gw-spider telnet.reversebeacon.net 7000 EA0XYZ\n\n";

/// Feed program used by DXSpider installations of the legacy gateway
pub const DEFAULT_FEED_PROGRAM: &str = "/home/sysop/spider/contrib/ea3cv/rbnspots.pl";

#[derive(Debug, Default, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(help = "Call sign of the local cluster node")]
    pub cluster_call: Option<String>,

    #[arg(help = "Prompt label of the local cluster node")]
    pub cluster_prompt: Option<String>,

    #[arg(help = "Host name of the RBN telnet server")]
    pub feed_host: Option<String>,

    #[arg(help = "Port of the RBN telnet server")]
    pub feed_port: Option<String>,

    #[arg(help = "Call sign used to log in to the RBN telnet server")]
    pub feed_login: Option<String>,

    #[arg(short = 'c', long = "config", help = "Path to configuration file")]
    pub config_file: Option<String>,

    #[arg(short = 'e', long = "env", help = "Path to environment file")]
    pub env_file: Option<String>,

    #[arg(
        short = 'l',
        long = "listen",
        help = "Serve a single TCP peer on this address instead of stdin/stdout"
    )]
    pub listen: Option<SocketAddr>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub session: SessionOptions,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Self, GatewayError> {
        tracing::debug!("Loading configuration from file: {}", path);
        let file = std::fs::File::open(path)
            .map_err(|e| GatewayError::Config(format!("Failed to open config file: {}", e)))?;

        let conf = serde_yaml::from_reader(file)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(conf)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub call: Option<EnvField<String>>,
    pub prompt: Option<EnvField<String>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Executable that connects to the RBN and prints one spot per line
    pub program: Option<EnvField<String>>,

    /// Arguments placed before `-s host -p port -u login`
    #[serde(default)]
    pub args: Vec<String>,

    pub host: Option<EnvField<String>>,
    pub port: Option<EnvField<u16>>,
    pub login: Option<EnvField<String>>,
}

impl FeedConfig {
    /// Configured feed program, falling back to [`DEFAULT_FEED_PROGRAM`]
    pub fn program(&self) -> &str {
        self.program
            .as_ref()
            .map(|program| program.as_str())
            .unwrap_or(DEFAULT_FEED_PROGRAM)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Show the prompt line again after every handled command
    #[serde(default)]
    pub repeat_prompt: bool,
}

/// Identity of the local cluster node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterIdentity {
    pub call: String,
    pub prompt: String,
}

/// How to launch the feed program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub host: String,
    pub port: String,
    pub login: String,
}

impl FeedCommand {
    /// Full argument list handed to the feed program
    pub fn arguments(&self) -> Vec<String> {
        let mut args = self.args.clone();
        args.extend([
            "-s".to_string(),
            self.host.clone(),
            "-p".to_string(),
            self.port.clone(),
            "-u".to_string(),
            self.login.clone(),
        ]);
        args
    }
}

/// Everything a gateway session needs, merged from arguments and configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub cluster: ClusterIdentity,
    pub feed: FeedCommand,
    pub repeat_prompt: bool,
}

impl SessionConfig {
    /// Merge command line arguments over the configuration file.
    ///
    /// Fails with [`GatewayError::Usage`] if any of the five startup values
    /// is still missing.
    pub fn resolve(arguments: &Arguments, config: &Configuration) -> Result<Self, GatewayError> {
        fn pick(arg: &Option<String>, conf: &Option<EnvField<String>>) -> Option<String> {
            arg.clone().or_else(|| conf.as_ref().map(|value| value.as_str().to_string()))
        }

        let call = pick(&arguments.cluster_call, &config.cluster.call);
        let prompt = pick(&arguments.cluster_prompt, &config.cluster.prompt);
        let host = pick(&arguments.feed_host, &config.feed.host);
        let port = arguments
            .feed_port
            .clone()
            .or_else(|| config.feed.port.as_ref().map(|port| (**port).to_string()));
        let login = pick(&arguments.feed_login, &config.feed.login);

        match (call, prompt, host, port, login) {
            (Some(call), Some(prompt), Some(host), Some(port), Some(login)) => Ok(Self {
                cluster: ClusterIdentity { call, prompt },
                feed: FeedCommand {
                    program: config.feed.program().to_string(),
                    args: config.feed.args.clone(),
                    host,
                    port,
                    login,
                },
                repeat_prompt: config.session.repeat_prompt,
            }),
            _ => Err(GatewayError::Usage),
        }
    }
}
