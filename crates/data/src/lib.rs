// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Pool data sources and the versioned depth service.
//!
//! The `depthbook-data` crate supplies raw pool state and tick reads to the depth pipeline:
//!
//! - [`source::TickDataSource`] is the seam every source implements.
//! - [`snapshot::SnapshotSource`] serves a JSON snapshot taken earlier.
//! - [`onchain::RpcTickSource`] reads Uniswap V3 style pools over JSON-RPC through Multicall3.
//! - [`service::DepthService`] runs requests against a source and publishes only the result of
//!   the latest request.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod contracts;
pub mod onchain;
pub mod rpc;
pub mod service;
pub mod snapshot;
pub mod source;
