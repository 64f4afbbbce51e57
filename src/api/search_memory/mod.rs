// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search memory API endpoint module
//!
//! Provides POST /search-memory/ for similarity search over a collection.

pub mod handler;

pub use handler::search_memory_handler;
