//! Error taxonomy cho dispatch controller.
//!
//! Phân loại:
//! - `ValidationError`: lỗi local, phát hiện TRƯỚC khi gọi network, chặn dispatch
//! - `ClientError::Transport`: non-2xx hoặc network failure
//! - `ClientError::Parse`: response JSON/blob không đúng định dạng
//! - `ClientError::Busy`: đã có operation đang chờ response
//!
//! Companion-artifact fetch failure (side-channel) chỉ được log, không propagate.

use thiserror::Error;

/// Lỗi validation - pure function của parameters, không có side effect
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("select at least one character class for the password")]
    NoCharacterClass,

    #[error("password length must be between 8 and 128, got {0}")]
    PasswordLengthOutOfRange(u32),

    #[error("key name cannot be empty")]
    EmptyKeyName,

    #[error("CBC decryption requires the IV that was used for encryption")]
    MissingDecryptIv,

    #[error("hash comparison expects .txt hash files, got '{0}'")]
    NotTextArtifact(String),

    #[error("receive mode requires the public value from the other party")]
    MissingReceivedValue,

    #[error("DH parameter size must be 1024, 2048 or 3072, got {0}")]
    InvalidParameterSize(u32),
}

/// Lỗi của controller - mọi failure đưa controller về state `Failed`,
/// cho phép resubmit ngay lập tức. Không có automatic retry.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Lỗi đọc/ghi file local (input files, saved artifacts)
    #[error("file error: {0}")]
    Io(String),

    /// Non-2xx response hoặc network failure, message lấy từ `detail` hoặc status text
    #[error("request failed: {0}")]
    Transport(String),

    /// Response không parse được, surfaced với generic message
    #[error("cannot parse server response: {0}")]
    Parse(String),

    /// Chỉ cho phép một submission in-flight cho mỗi controller instance
    #[error("another operation is still awaiting a response")]
    Busy,

    /// Lệnh cần bearer credentials nhưng chưa lưu credentials nào
    #[error("not signed in - save credentials first")]
    NotSignedIn,
}
