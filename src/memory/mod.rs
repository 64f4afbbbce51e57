// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Memory records and the gateway pipelines that store and search them

pub mod gateway;
pub mod types;

pub use gateway::{GatewayError, MemoryGateway};
pub use types::{
    validate_collection, ImageUpload, MemoryMetadata, MemoryRecord, SaveOutcome, SearchQuery,
    ValidationError, DEFAULT_COLLECTION, DEFAULT_SEARCH_LIMIT, IMAGE_UPLOAD_TAG,
};
