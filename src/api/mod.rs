// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod auth;
pub mod errors;
pub mod http_server;
pub mod save_memory;
pub mod search_memory;
pub mod upload_image;

pub use auth::{require_api_key, verify_api_key, AuthError, API_KEY_HEADER};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_router, start_server, AppState};
pub use save_memory::save_memory_handler;
pub use search_memory::search_memory_handler;
pub use upload_image::{read_upload_form, upload_image_handler};
