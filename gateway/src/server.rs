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


//! Controlling stream transports
//!
//! DXSpider normally runs the gateway as a connect script with the cluster
//! link on standard input and output. For testing and for nodes that connect
//! out over the network, a single TCP peer can be served instead.

use crate::config::SessionConfig;
use crate::error::GatewayError;
use crate::session::{Session, SessionEnd};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Serve the peer attached to standard input and output
pub async fn serve_stdio(config: SessionConfig) -> Result<SessionEnd, GatewayError> {
    tracing::info!("Serving cluster peer on standard input/output");
    Session::new(config)
        .run(tokio::io::stdin(), tokio::io::stdout())
        .await
}

/// Bind `addr` and serve the first peer that connects
pub async fn serve_tcp(addr: SocketAddr, config: SessionConfig) -> Result<SessionEnd, GatewayError> {
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, config).await
}

/// Serve the first peer accepted on `listener`; further peers are refused
pub async fn serve_listener(
    listener: TcpListener,
    config: SessionConfig,
) -> Result<SessionEnd, GatewayError> {
    tracing::info!("Waiting for cluster peer on {}", listener.local_addr()?);

    let (stream, peer) = listener.accept().await?;
    drop(listener);
    tracing::info!("Cluster peer connected from {}", peer);

    let (reader, writer) = stream.into_split();
    let end = Session::new(config).run(reader, writer).await;
    tracing::info!("Cluster peer {} disconnected", peer);
    end
}
