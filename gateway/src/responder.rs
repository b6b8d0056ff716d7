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


//! Protocol responder
//!
//! Each sanitized command line from the peer is handled on its own:
//!
//! | Prefix | Reaction                                    |
//! |--------|---------------------------------------------|
//! | `bye`  | disconnect                                  |
//! | `PC51` | pong addressed to the sender                |
//! | `PC20` | `PC22^` plus an initialisation status line  |
//! | other  | ignored                                     |

use rbngate_common::PcMessage;
use rbngate_common::pc::{PC20, PC51};

/// Command that ends the session
pub const BYE: &str = "bye";

/// Reply written before the session ends
pub const BYE_REPLY: &str = "bye!";

/// What to do with one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Write these lines back to the peer
    Reply(Vec<String>),
    /// Say goodbye and end the session
    Disconnect,
    /// Nothing to answer
    Ignore,
}

/// Stateless responder for the PC messages the gateway understands
#[derive(Debug, Clone)]
pub struct Responder {
    cluster_call: String,
}

impl Responder {
    pub fn new(cluster_call: impl Into<String>) -> Self {
        Self {
            cluster_call: cluster_call.into(),
        }
    }

    /// Decide how to answer `command`. Prefix matches are case sensitive.
    pub fn react(&self, command: &str) -> Reaction {
        if command.starts_with(BYE) {
            return Reaction::Disconnect;
        }

        if command.starts_with(PC51) {
            return match PcMessage::parse(command) {
                Some(ping) => Reaction::Reply(vec![ping.pong(&self.cluster_call).to_string()]),
                None => Reaction::Ignore,
            };
        }

        if command.starts_with(PC20) {
            return Reaction::Reply(vec![
                PcMessage::init_done().to_string(),
                self.init_status(),
            ]);
        }

        Reaction::Ignore
    }

    fn init_status(&self) -> String {
        format!(
            "###### {} Initialized protocol between clusters ######",
            self.cluster_call
        )
    }
}
