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


//! Shared controlling output stream
//!
//! The feed relay and the protocol responder both write to the peer. Every
//! write takes the lock, writes whole lines and flushes before releasing it,
//! so bytes of two lines never interleave.

use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, MutexGuard};

/// Line terminator used for everything the gateway writes
pub const LINE_ENDING: &[u8] = b"\r\n";

/// Cloneable handle to the controlling output stream
pub struct Console<W> {
    writer: Arc<Mutex<W>>,
}

impl<W> Clone for Console<W> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
        }
    }
}

impl<W: AsyncWrite + Unpin> Console<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    /// Write raw bytes without a terminator and flush
    pub async fn send(&self, data: &[u8]) -> std::io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(data).await?;
        writer.flush().await
    }

    /// Write one terminated line and flush
    pub async fn send_line(&self, line: impl AsRef<[u8]>) -> std::io::Result<()> {
        self.send_lines([line]).await
    }

    /// Write several terminated lines as one uninterrupted block and flush
    pub async fn send_lines<I, L>(&self, lines: I) -> std::io::Result<()>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut writer = self.writer.lock().await;
        for line in lines {
            writer.write_all(line.as_ref()).await?;
            writer.write_all(LINE_ENDING).await?;
        }
        writer.flush().await
    }

    /// Hold the stream exclusively; no line can be written until the guard drops
    pub async fn hold(&self) -> MutexGuard<'_, W> {
        self.writer.lock().await
    }

    /// Recover the writer once every other handle is gone
    pub fn into_inner(self) -> Option<W> {
        Arc::try_unwrap(self.writer).ok().map(Mutex::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_line_appends_crlf() {
        let console = Console::new(Vec::new());
        console.send_line("PC22^").await.unwrap();
        console.send(b"Please enter your callsign: ").await.unwrap();

        let output = console.into_inner().unwrap();
        assert_eq!(output, b"PC22^\r\nPlease enter your callsign: ");
    }

    #[tokio::test]
    async fn test_send_lines_block() {
        let console = Console::new(Vec::new());
        console
            .send_lines(["PC22^", "###### N0CALL Initialized protocol between clusters ######"])
            .await
            .unwrap();

        let output = String::from_utf8(console.into_inner().unwrap()).unwrap();
        assert_eq!(
            output,
            "PC22^\r\n###### N0CALL Initialized protocol between clusters ######\r\n"
        );
    }

    #[tokio::test]
    async fn test_into_inner_requires_last_handle() {
        let console = Console::new(Vec::<u8>::new());
        let other = console.clone();
        assert!(console.into_inner().is_none());
        assert!(other.into_inner().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_lines_do_not_interleave() {
        let console = Console::new(Vec::new());

        let mut handles = Vec::new();
        for writer in 0..4 {
            let console = console.clone();
            handles.push(tokio::spawn(async move {
                for n in 0..100 {
                    let line = format!("writer {} line {} {}", writer, n, "x".repeat(64));
                    console.send_line(line).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let output = String::from_utf8(console.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = output.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 400);
        for line in lines {
            assert!(line.starts_with("writer "));
            assert!(line.ends_with(&"x".repeat(64)));
        }
    }
}
