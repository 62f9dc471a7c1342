//! CryptoBridge Core Library
//!
//! Thư viện core cho CryptoBridge - CLI client cho remote cryptographic service.
//! Cung cấp các chức năng:
//! - Dispatch các operation (generate password/key, encrypt, decrypt, hash, DH exchange)
//! - Validate parameters trước khi gọi network
//! - Build request (JSON hoặc multipart) và interpret response (JSON, binary, headers)
//! - So sánh hash files hoàn toàn local, không cần backend
//!
//! Nguyên tắc quan trọng: mọi phép toán mật mã đều chạy trên server,
//! client chỉ validate, đóng gói request và lưu kết quả.

pub mod auth;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod ops;

// Re-export main types
pub use auth::Credentials;
pub use client::{ControllerState, CryptoClient, OperationOutcome};
pub use config::Config;
pub use error::{ClientError, ValidationError};
pub use ops::{Operation, ResponseOutcome};
