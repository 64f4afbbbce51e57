// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload image API endpoint module
//!
//! Provides POST /upload-image/ which describes an image with the vision
//! model and saves the description as a memory.

pub mod form;
pub mod handler;

pub use form::read_upload_form;
pub use handler::upload_image_handler;
