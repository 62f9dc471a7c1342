//! Bearer credentials cho backend đã authenticate.
//!
//! Session thật (đăng ký, đăng nhập) do hệ thống auth bên ngoài quản lý;
//! client chỉ cần access token và user id, lưu trong file JSON
//! ở config directory.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Credentials dùng cho các endpoint cần bearer authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub user_id: String,
}

/// Lưu credentials vào file
pub fn save_credentials_to_file(credentials: &Credentials, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(credentials)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load credentials từ file
pub fn load_credentials_from_file(path: &Path) -> Result<Credentials> {
    let json = std::fs::read_to_string(path)?;
    let credentials: Credentials = serde_json::from_str(&json)?;
    Ok(credentials)
}
