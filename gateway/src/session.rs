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


//! Gateway session
//!
//! A session greets the peer once, then runs the feed relay and the protocol
//! responder side by side on the shared controlling stream until the peer
//! says `bye`, the peer hangs up or the feed ends. The feed program never
//! outlives the session.

use crate::codec::{LineReader, line_reader, sanitize_line};
use crate::config::SessionConfig;
use crate::console::Console;
use crate::error::GatewayError;
use crate::greeter;
use crate::relay::FeedRelay;
use crate::responder::{BYE_REPLY, Reaction, Responder};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use rbngate_common::Callsign;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::Instrument;
use uuid::Uuid;

/// Sent to the peer when the feed program cannot be started
pub const FEED_UNAVAILABLE: &str = "Error. RBN feed unavailable. Bye.";

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// No usable call sign was entered
    LoginRejected,
    /// The peer sent `bye`
    Bye,
    /// The controlling stream reached end of input
    InputClosed,
    /// The feed program closed its output
    FeedClosed,
}

/// One gateway run against a single cluster peer
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    config: SessionConfig,
    responder: Responder,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let responder = Responder::new(config.cluster.call.clone());
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            config,
            responder,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Serve the peer on `reader`/`writer` until the session ends
    pub async fn run<R, W>(&self, reader: R, writer: W) -> Result<SessionEnd, GatewayError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let span = tracing::info_span!("session", id = %self.id, cluster = %self.config.cluster.call);
        self.serve(reader, writer).instrument(span).await
    }

    async fn serve<R, W>(&self, reader: R, writer: W) -> Result<SessionEnd, GatewayError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let console = Console::new(writer);
        let mut lines = line_reader(reader);

        let Some(caller) = greeter::greet(&self.config.cluster, &mut lines, &console).await? else {
            return Ok(SessionEnd::LoginRejected);
        };
        tracing::info!("Cluster peer {} logged in", caller);

        let mut relay = match FeedRelay::spawn(&self.config.feed, console.clone()) {
            Ok(relay) => relay,
            Err(e) => {
                tracing::error!("Unable to start RBN feed: {}", e);
                let _ = console.send_line(FEED_UNAVAILABLE).await;
                return Err(e);
            }
        };

        let outcome = self.respond(&caller, &mut lines, &console, &mut relay).await;
        let stopped = relay.shutdown().await;

        let end = outcome?;
        stopped?;
        tracing::info!("Session with {} ended: {:?}", caller, end);
        Ok(end)
    }

    async fn respond<R, W>(
        &self,
        caller: &Callsign,
        lines: &mut LineReader<R>,
        console: &Console<W>,
        relay: &mut FeedRelay<W>,
    ) -> Result<SessionEnd, GatewayError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        loop {
            tokio::select! {
                line = lines.next() => {
                    let Some(line) = line else {
                        tracing::info!("Controlling stream closed by {}", caller);
                        return Ok(SessionEnd::InputClosed);
                    };

                    let command = sanitize_line(&line?);
                    match self.responder.react(&command) {
                        Reaction::Disconnect => {
                            console.send_line(BYE_REPLY).await?;
                            return Ok(SessionEnd::Bye);
                        }
                        Reaction::Reply(replies) => {
                            tracing::debug!("Answering {:?} with {:?}", command, replies);
                            console.send_lines(&replies).await?;
                        }
                        Reaction::Ignore => {
                            tracing::debug!("Ignoring {:?}", command);
                        }
                    }

                    if self.config.repeat_prompt {
                        console
                            .send_line(greeter::prompt_line(caller, &self.config.cluster, Utc::now()))
                            .await?;
                    }
                }
                relayed = relay.finished() => {
                    let relayed = relayed?;
                    tracing::warn!("RBN feed ended after {} spots", relayed);
                    return Ok(SessionEnd::FeedClosed);
                }
            }
        }
    }
}
