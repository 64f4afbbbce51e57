// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Save memory API endpoint module
//!
//! Provides POST /save-memory/ for embedding and storing a text memory.

pub mod handler;

pub use handler::save_memory_handler;
