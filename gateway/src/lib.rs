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


//! RBN Gateway Library
//!
//! This library bridges a Reverse Beacon Network spot feed into a DX cluster
//! node speaking the PC protocol: it greets the node, answers its handshake
//! and keep-alive messages and relays spot lines from an external feed
//! program.

pub mod codec;
pub mod config;
pub mod console;
pub mod error;
pub mod greeter;
pub mod relay;
pub mod responder;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::{Arguments, Configuration, SessionConfig};
pub use console::Console;
pub use error::GatewayError;
pub use relay::FeedRelay;
pub use responder::{Reaction, Responder};
pub use session::{Session, SessionEnd};
