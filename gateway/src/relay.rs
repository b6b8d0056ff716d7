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


//! Feed relay
//!
//! Launches the feed program and copies every line it prints to the
//! controlling stream until the program closes its output or the session
//! shuts the relay down.

use crate::codec::{LineReader, line_reader};
use crate::config::FeedCommand;
use crate::console::Console;
use crate::error::GatewayError;
use futures::StreamExt;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

/// Running feed program and the task relaying its output
pub struct FeedRelay<W> {
    child: Child,
    pump: Option<JoinHandle<Result<u64, GatewayError>>>,
    console: Console<W>,
}

impl<W> FeedRelay<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Start the feed program and begin relaying its output
    pub fn spawn(feed: &FeedCommand, console: Console<W>) -> Result<Self, GatewayError> {
        let mut child = Command::new(&feed.program)
            .args(feed.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GatewayError::FeedSpawn {
                program: feed.program.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or(GatewayError::FeedOutput)?;

        tracing::info!(
            "Started feed program {} (pid {:?}) for {}:{} as {}",
            feed.program,
            child.id(),
            feed.host,
            feed.port,
            feed.login
        );

        let pump = tokio::spawn(relay_lines(line_reader(stdout), console.clone()));

        Ok(Self {
            child,
            pump: Some(pump),
            console,
        })
    }

    /// OS process id of the feed program while it runs
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait until the feed program closes its output.
    ///
    /// Returns the number of relayed lines. Once that has happened, later
    /// calls never complete.
    pub async fn finished(&mut self) -> Result<u64, GatewayError> {
        let Some(pump) = self.pump.as_mut() else {
            return std::future::pending().await;
        };

        let result = pump.await;
        self.pump = None;
        result.map_err(|e| GatewayError::Io(std::io::Error::other(e)))?
    }

    /// Stop relaying and kill the feed program
    pub async fn shutdown(mut self) -> Result<(), GatewayError> {
        if let Some(pump) = self.pump.take() {
            // Holding the console keeps the pump from being cut off mid line
            let _console = self.console.hold().await;
            pump.abort();
            let _ = pump.await;
        }

        match self.child.kill().await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Feed program stopped");
        Ok(())
    }
}

async fn relay_lines<R, W>(mut lines: LineReader<R>, console: Console<W>) -> Result<u64, GatewayError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut relayed = 0;
    while let Some(line) = lines.next().await {
        let line = line?;
        console.send_line(&line).await?;
        relayed += 1;
        tracing::trace!("Relayed spot: {}", String::from_utf8_lossy(&line));
    }

    tracing::info!("Feed program closed its output after {} lines", relayed);
    Ok(relayed)
}
