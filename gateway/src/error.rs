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


//! Gateway error taxonomy

use thiserror::Error;

/// Errors that end a gateway run.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// One or more startup parameters are missing.
    #[error("Missing startup parameters")]
    Usage,

    /// The configuration file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The feed program could not be started.
    #[error("Failed to start feed program '{program}': {source}")]
    FeedSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The feed program was started without a readable standard output.
    #[error("Feed program standard output unavailable")]
    FeedOutput,

    /// Reading or writing the controlling stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

