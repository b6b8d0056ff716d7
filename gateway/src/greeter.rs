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


//! Session greeter
//!
//! Runs once per session: shows the welcome banner, reads the caller's call
//! sign, announces this node with PC18 and prints the cluster prompt.

use crate::codec::{LineReader, sanitize_line};
use crate::config::ClusterIdentity;
use crate::console::Console;
use crate::error::GatewayError;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use rbngate_common::{Callsign, PcMessage};
use tokio::io::{AsyncRead, AsyncWrite};

/// Sent when no usable call sign was entered
pub const LOGIN_REJECTED: &str = "Error.\r\nPlease log in with a valid callsign. Bye.\r\n";

/// Welcome banner ending in the call sign prompt
pub fn welcome_banner(cluster: &ClusterIdentity) -> String {
    format!(
        "Welcome ...\r\n{} {}\r\n\r\nPlease enter your callsign: ",
        cluster.call, cluster.prompt
    )
}

/// Cluster prompt line, e.g. `N0CALL de EA0XX-1 19-Oct-2026 1405Z rbn-gw-spider >`
pub fn prompt_line(caller: &Callsign, cluster: &ClusterIdentity, now: DateTime<Utc>) -> String {
    format!(
        "{} de {} {}Z {} >",
        caller,
        cluster.call,
        now.format("%d-%b-%Y %H%M"),
        cluster.prompt
    )
}

/// Greet the peer and return its call sign.
///
/// Returns `Ok(None)` after telling the peer why when the stream ends before
/// a call sign arrives or the line holds nothing but whitespace.
pub async fn greet<R, W>(
    cluster: &ClusterIdentity,
    lines: &mut LineReader<R>,
    console: &Console<W>,
) -> Result<Option<Callsign>, GatewayError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.send(welcome_banner(cluster).as_bytes()).await?;

    let caller = match lines.next().await {
        Some(line) => Callsign::from_login(&sanitize_line(&line?)),
        None => None,
    };

    let Some(caller) = caller else {
        tracing::warn!("Login rejected, no call sign received");
        console.send(LOGIN_REJECTED.as_bytes()).await?;
        return Ok(None);
    };

    console
        .send_line(PcMessage::capabilities().to_string())
        .await?;
    console
        .send_line(prompt_line(&caller, cluster, Utc::now()))
        .await?;

    Ok(Some(caller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::line_reader;
    use chrono::TimeZone;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn cluster() -> ClusterIdentity {
        ClusterIdentity {
            call: "EA0XX-1".to_string(),
            prompt: "rbn-gw-spider".to_string(),
        }
    }

    async fn run_greeter(input: &[u8]) -> (Option<Callsign>, String) {
        let (mut client, server) = tokio::io::duplex(4096);
        let (reader, writer) = tokio::io::split(server);

        client.write_all(input).await.unwrap();
        client.shutdown().await.unwrap();

        let caller = {
            let mut lines = line_reader(reader);
            let console = Console::new(writer);
            greet(&cluster(), &mut lines, &console).await.unwrap()
        };

        let mut output = String::new();
        client.read_to_string(&mut output).await.unwrap();
        (caller, output)
    }

    #[test]
    fn test_welcome_banner() {
        assert_eq!(
            welcome_banner(&cluster()),
            "Welcome ...\r\nEA0XX-1 rbn-gw-spider\r\n\r\nPlease enter your callsign: "
        );
    }

    #[test]
    fn test_prompt_line_format() {
        let caller = Callsign::from_login("n0call").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 42).unwrap();
        assert_eq!(
            prompt_line(&caller, &cluster(), now),
            "N0CALL de EA0XX-1 07-Mar-2026 0905Z rbn-gw-spider >"
        );
    }

    #[tokio::test]
    async fn test_greet_accepts_call_sign() {
        let (caller, output) = run_greeter(b"  n0call  \r\n").await;

        assert_eq!(caller.unwrap().as_str(), "N0CALL");
        assert!(output.starts_with(&welcome_banner(&cluster())));
        assert!(output.contains(
            "PC18^DXSpider Version: 1.55 Build: 0.166 Git: 4868adf[i] pc9x^5455^\r\nN0CALL de EA0XX-1 "
        ));
        assert!(output.ends_with("Z rbn-gw-spider >\r\n"));
    }

    #[tokio::test]
    async fn test_greet_strips_telnet_negotiation() {
        let input = [[0xFFu8, 0xFB, 0x18].as_slice(), b"ea3cv\r\n"].concat();
        let (caller, _) = run_greeter(&input).await;
        assert_eq!(caller.unwrap().as_str(), "EA3CV");
    }

    #[tokio::test]
    async fn test_greet_rejects_end_of_stream() {
        let (caller, output) = run_greeter(b"").await;

        assert!(caller.is_none());
        assert_eq!(
            output,
            format!("{}{}", welcome_banner(&cluster()), LOGIN_REJECTED)
        );
    }

    #[tokio::test]
    async fn test_greet_rejection_transcript() {
        let reader = tokio_test::io::Builder::new().read(b"\t \r\n").build();
        let writer = tokio_test::io::Builder::new()
            .write(welcome_banner(&cluster()).as_bytes())
            .write(LOGIN_REJECTED.as_bytes())
            .build();

        let mut lines = line_reader(reader);
        let console = Console::new(writer);
        let caller = greet(&cluster(), &mut lines, &console).await.unwrap();
        assert!(caller.is_none());
    }

    #[tokio::test]
    async fn test_greet_rejects_blank_line() {
        let (caller, output) = run_greeter(b"   \r\n").await;

        assert!(caller.is_none());
        assert!(!output.contains("PC18^"));
        assert!(output.ends_with(LOGIN_REJECTED));
    }
}
