//! Request builder - map operation đã validate sang HTTP request shape.
//!
//! Hai loại body:
//! - JSON: generate-password, generate-key, share-key (flat object, snake_case keys)
//! - Multipart: các operation có file (encrypt, decrypt, hash)
//!
//! File bytes được đọc ngay lúc build - đây chính là submission snapshot:
//! file thay đổi trên disk sau đó không ảnh hưởng envelope đã build.

use crate::error::ClientError;
use crate::ops::{BlockMode, KeyType, Operation};
use serde_json::json;
use std::fs;
use std::path::Path;

/// Một file part trong multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Field name cố định theo từng operation (`file`, `key_file`, `publicKeyFile`, ...)
    pub field: &'static str,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Request shape đã đóng gói, sẵn sàng để gửi
#[derive(Debug, Clone)]
pub enum RequestEnvelope {
    Json {
        path: &'static str,
        body: serde_json::Value,
    },
    Multipart {
        path: &'static str,
        fields: Vec<(&'static str, String)>,
        files: Vec<FilePart>,
    },
}

impl RequestEnvelope {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Json { path, .. } | Self::Multipart { path, .. } => path,
        }
    }
}

/// Build request envelope cho operation. Operation phải validate xong trước.
pub fn build(op: &Operation) -> Result<RequestEnvelope, ClientError> {
    match op {
        Operation::GeneratePassword {
            length,
            use_uppercase,
            use_lowercase,
            use_numbers,
            use_symbols,
        } => Ok(RequestEnvelope::Json {
            path: "/generate/password",
            body: json!({
                "length": length,
                "use_uppercase": use_uppercase,
                "use_lowercase": use_lowercase,
                "use_numbers": use_numbers,
                "use_symbols": use_symbols,
            }),
        }),

        Operation::GenerateKey {
            key_type,
            symmetric_algorithm,
            asymmetric_algorithm,
            key_name,
        } => {
            // Route theo key type để chọn algorithm field đang active
            let algorithm = match key_type {
                KeyType::Symmetric => symmetric_algorithm.canonical(),
                KeyType::Asymmetric => asymmetric_algorithm.canonical(),
            };
            Ok(RequestEnvelope::Json {
                path: "/generate/key",
                body: json!({
                    "key_type": key_type.wire(),
                    "algorithm": algorithm,
                    "key_name": key_name.trim(),
                }),
            })
        }

        Operation::EncryptSymmetric {
            file,
            algorithm,
            mode,
            iv,
            key_file,
        } => symmetric_envelope("/encrypt/symmetric", file, algorithm.canonical(), *mode, iv, key_file),

        Operation::DecryptSymmetric {
            file,
            algorithm,
            mode,
            iv,
            key_file,
        } => symmetric_envelope("/decrypt/symmetric", file, algorithm.canonical(), *mode, iv, key_file),

        Operation::EncryptAsymmetric {
            file,
            algorithm,
            public_key_file,
        } => Ok(RequestEnvelope::Multipart {
            path: "/encrypt/asymmetric",
            fields: vec![("algorithm", algorithm.canonical().to_string())],
            files: vec![
                read_file_part("file", file)?,
                read_file_part("publicKeyFile", public_key_file)?,
            ],
        }),

        Operation::DecryptAsymmetric {
            file,
            algorithm,
            private_key_file,
        } => Ok(RequestEnvelope::Multipart {
            path: "/decrypt/asymmetric",
            fields: vec![("algorithm", algorithm.canonical().to_string())],
            files: vec![
                read_file_part("file", file)?,
                read_file_part("privateKeyFile", private_key_file)?,
            ],
        }),

        Operation::HashFile { file, algorithm } => Ok(RequestEnvelope::Multipart {
            path: "/hash",
            fields: vec![("algorithm", algorithm.canonical().to_string())],
            files: vec![read_file_part("file", file)?],
        }),

        Operation::ShareKey {
            parameter_size,
            key_name,
            exchange_mode,
            received_value,
        } => {
            let mut body = json!({
                "method": "DH",
                "parameter_size": parameter_size,
                "key_name": key_name.trim(),
                "exchange_mode": exchange_mode.wire(),
            });
            if let Some(value) = received_value {
                body["received_value"] = json!(value.trim());
            }
            Ok(RequestEnvelope::Json {
                path: "/share/dh",
                body,
            })
        }

        // Compare-hash chạy local, controller không bao giờ build request cho nó
        Operation::CompareHash { .. } => Err(ClientError::Io(
            "hash comparison runs locally and has no request".to_string(),
        )),
    }
}

fn symmetric_envelope(
    path: &'static str,
    file: &Path,
    algorithm: &'static str,
    mode: BlockMode,
    iv: &Option<String>,
    key_file: &Option<std::path::PathBuf>,
) -> Result<RequestEnvelope, ClientError> {
    let mut fields = vec![
        ("algorithm", algorithm.to_string()),
        ("mode", mode.canonical().to_string()),
    ];

    // IV chỉ gửi với CBC; ECB không bao giờ gửi IV kể cả khi user nhập
    if mode == BlockMode::Cbc {
        if let Some(iv) = iv.as_deref() {
            let iv = iv.trim();
            if !iv.is_empty() {
                fields.push(("iv", iv.to_string()));
            }
        }
    }

    let mut files = vec![read_file_part("file", file)?];
    if let Some(key_file) = key_file {
        files.push(read_file_part("key_file", key_file)?);
    }

    Ok(RequestEnvelope::Multipart {
        path,
        fields,
        files,
    })
}

fn read_file_part(field: &'static str, path: &Path) -> Result<FilePart, ClientError> {
    let bytes = fs::read(path)
        .map_err(|e| ClientError::Io(format!("cannot read {}: {}", path.display(), e)))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    Ok(FilePart {
        field,
        filename,
        bytes,
    })
}
