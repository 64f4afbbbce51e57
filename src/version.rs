// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Memory Gateway

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-19";

/// Endpoints served by this build
pub const ENDPOINTS: &[&str] = &[
    "/save-memory/",
    "/search-memory/",
    "/upload-image/",
    "/health",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Memory Gateway {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get version info for the health endpoint
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "date": BUILD_DATE,
        "endpoints": ENDPOINTS,
    })
}
