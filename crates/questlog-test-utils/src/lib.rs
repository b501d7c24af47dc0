// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Questlog.
//!
//! - [`MemoryStore`] - in-memory implementation of every store trait, with
//!   switchable failure points
//! - [`MockGateway`] - records analysis submissions and can be told to fail
//! - [`TestHarness`] - a migrated SQLite store in a temp directory
//! - [`fixtures`] - ready-made characters and quests

pub mod fixtures;
pub mod harness;
pub mod memory_store;
pub mod mock_gateway;

pub use harness::TestHarness;
pub use memory_store::{FailPoint, MemoryStore};
pub use mock_gateway::MockGateway;
