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


use rbngate_gateway::config::{ClusterIdentity, FeedCommand, SessionConfig};
use rbngate_gateway::server::serve_listener;
use rbngate_gateway::session::SessionEnd;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Duration, timeout};

fn session_config() -> SessionConfig {
    SessionConfig {
        cluster: ClusterIdentity {
            call: "EA0XX-1".to_string(),
            prompt: "rbn-gw-spider".to_string(),
        },
        feed: FeedCommand {
            program: "/bin/sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo 'DX de EA3CV-#: 7025.0 K1ABC CW 12 dB 22 WPM CQ 1405Z'; exec sleep 30".to_string(),
                "rbnspots".to_string(),
            ],
            host: "telnet.reversebeacon.net".to_string(),
            port: "7000".to_string(),
            login: "EA0XYZ".to_string(),
        },
        repeat_prompt: false,
    }
}

#[tokio::test]
async fn test_tcp_peer_session() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_listener(listener, session_config()));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"k1abc\r\n").await.unwrap();

    let mut seen = String::new();
    let mut buf = [0u8; 1024];
    while !seen.contains("12 dB 22 WPM CQ 1405Z\r\n") {
        let n = timeout(Duration::from_secs(10), stream.read(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert!(n > 0);
        seen.push_str(&String::from_utf8_lossy(&buf[..n]));
    }

    assert!(seen.starts_with("Welcome ...\r\nEA0XX-1 rbn-gw-spider\r\n"));
    assert!(seen.contains("K1ABC de EA0XX-1 "));

    stream.write_all(b"bye\r\n").await.unwrap();
    let mut rest = String::new();
    timeout(Duration::from_secs(10), stream.read_to_string(&mut rest))
        .await
        .unwrap()
        .unwrap();
    assert!(rest.ends_with("bye!\r\n"));

    let end = timeout(Duration::from_secs(10), server).await.unwrap().unwrap();
    assert_eq!(end.unwrap(), SessionEnd::Bye);
}
