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

//! RBN Gateway Common Types and Protocols
//!
//! This crate defines the protocol vocabulary shared by the gateway:
//! - PC protocol messages exchanged between DX cluster nodes
//! - Telnet control sequences and input sanitization
//! - Caller call sign normalization

pub mod callsign;
pub mod pc;
pub mod telnet;

pub use callsign::Callsign;
pub use pc::PcMessage;
