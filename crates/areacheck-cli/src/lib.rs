// Copyright 2025 AreaCheck Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # AreaCheck CLI
//!
//! Command-line interface for the AreaCheck point-in-area service.
//!
//! This crate provides the main entry point for running AreaCheck:
//!
//! - **Server**: the HTTP service that evaluates points and keeps the history
//! - **Client commands**: one-shot `check` and `clear` calls for scripting
//!
//! ## Architecture
//!
//! The binary uses the `argh` crate for argument parsing and dispatches to the
//! functions in [`commands`], which wrap `areacheck-server` and
//! `areacheck-client`.
//!
//! ## Key Commands
//!
//! - `areacheck serve`: Start the HTTP server
//! - `areacheck check`: Evaluate one point (outputs raw JSON for scripting)
//! - `areacheck clear`: Empty the server's history

pub mod commands;
