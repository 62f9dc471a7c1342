//! Per-operation precondition checks - chạy TRƯỚC mọi network call.
//!
//! Pure function của parameters: không đọc filesystem, không side effect.
//! Validation error chặn dispatch, request không bao giờ được build.

use crate::error::ValidationError;
use crate::ops::{BlockMode, ExchangeMode, Operation};
use std::path::Path;

/// Độ dài password tối thiểu
pub const PASSWORD_MIN_LEN: u32 = 8;
/// Độ dài password tối đa
pub const PASSWORD_MAX_LEN: u32 = 128;

/// Extension bắt buộc cho hash artifacts khi so sánh
const HASH_ARTIFACT_EXT: &str = "txt";

/// Các kích thước DH parameters (bits) được backend hỗ trợ
pub const DH_PARAMETER_SIZES: [u32; 3] = [1024, 2048, 3072];

/// Validate operation. `Ok(())` nghĩa là operation sẵn sàng để dispatch.
pub fn validate(op: &Operation) -> Result<(), ValidationError> {
    match op {
        Operation::GeneratePassword {
            length,
            use_uppercase,
            use_lowercase,
            use_numbers,
            use_symbols,
        } => {
            if !(use_uppercase | use_lowercase | use_numbers | use_symbols) {
                return Err(ValidationError::NoCharacterClass);
            }
            if *length < PASSWORD_MIN_LEN || *length > PASSWORD_MAX_LEN {
                return Err(ValidationError::PasswordLengthOutOfRange(*length));
            }
            Ok(())
        }

        Operation::GenerateKey { key_name, .. } => {
            if key_name.trim().is_empty() {
                return Err(ValidationError::EmptyKeyName);
            }
            Ok(())
        }

        // Encrypt với CBC không cần IV: server sẽ tự generate và báo qua
        // header x-generated-iv. ECB không bao giờ dùng IV.
        Operation::EncryptSymmetric { .. } => Ok(()),

        // Decrypt với CBC BẮT BUỘC có IV - phải đúng IV đã dùng khi encrypt
        Operation::DecryptSymmetric { mode, iv, .. } => {
            if *mode == BlockMode::Cbc && iv.as_deref().map_or(true, |v| v.trim().is_empty()) {
                return Err(ValidationError::MissingDecryptIv);
            }
            Ok(())
        }

        Operation::EncryptAsymmetric { .. } | Operation::DecryptAsymmetric { .. } => Ok(()),

        Operation::HashFile { .. } => Ok(()),

        Operation::CompareHash { file_a, file_b } => {
            check_text_artifact(file_a)?;
            check_text_artifact(file_b)?;
            Ok(())
        }

        Operation::ShareKey {
            parameter_size,
            key_name,
            exchange_mode,
            received_value,
        } => {
            if key_name.trim().is_empty() {
                return Err(ValidationError::EmptyKeyName);
            }
            if !DH_PARAMETER_SIZES.contains(parameter_size) {
                return Err(ValidationError::InvalidParameterSize(*parameter_size));
            }
            if *exchange_mode == ExchangeMode::Receive
                && received_value
                    .as_deref()
                    .map_or(true, |v| v.trim().is_empty())
            {
                return Err(ValidationError::MissingReceivedValue);
            }
            Ok(())
        }
    }
}

fn check_text_artifact(path: &Path) -> Result<(), ValidationError> {
    let is_txt = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(HASH_ARTIFACT_EXT));
    if !is_txt {
        return Err(ValidationError::NotTextArtifact(
            path.display().to_string(),
        ));
    }
    Ok(())
}
