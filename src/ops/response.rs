//! Response interpreter - phân loại HTTP response theo operation.
//!
//! Ba loại outcome:
//! - `JsonResult`: kết quả JSON (generate-password)
//! - `BinaryArtifact`: byte payload để download, kèm side-channel metadata
//!   đọc từ headers (auto-generated key/IV, companion public-key name)
//! - `ErrorDetail`: non-2xx, message lấy từ JSON `detail` hoặc status text
//!
//! Không bao giờ fail với well-formed response; body malformed mới trả Parse error.

use crate::error::ClientError;
use crate::ops::{KeyType, Operation};
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};
use std::path::Path;

/// Header báo server đã tự generate encryption key
pub const HEADER_GENERATED_KEY: &str = "x-generated-key";
/// Header báo server đã tự generate IV
pub const HEADER_GENERATED_IV: &str = "x-generated-iv";
/// Header báo có companion public key để fetch riêng
pub const HEADER_PUBLIC_KEY_AVAILABLE: &str = "x-public-key-available";
/// Header chứa resource name của companion public key
pub const HEADER_PUBLIC_KEY_NAME: &str = "x-public-key-name";

/// Binary payload trả về từ backend, sẵn sàng để lưu local
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Side-channel metadata - thông tin nằm trong response headers thay vì body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideChannel {
    pub generated_key: bool,
    pub generated_iv: bool,
    pub public_key_available: bool,
    pub public_key_name: Option<String>,
}

/// Kết quả interpret một response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    JsonResult { password: String },
    BinaryArtifact {
        artifact: Artifact,
        side_channel: SideChannel,
    },
    ErrorDetail(String),
}

/// Snapshot của một HTTP response - tách khỏi reqwest để test không cần network
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Capture toàn bộ response (status, headers, body) từ reqwest
    pub fn capture(response: reqwest::blocking::Response) -> Result<Self, ClientError> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .map_err(|e| ClientError::Transport(e.to_string()))?
            .to_vec();
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Message cho non-2xx: thử parse JSON body lấy `detail`,
    /// fallback về status text nếu parse thất bại
    pub fn detail_message(&self) -> String {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
                return detail.to_string();
            }
        }
        reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", self.status))
    }

    /// Trích filename từ pattern `filename="..."` của content-disposition
    pub fn disposition_filename(&self) -> Option<String> {
        let value = self.headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
        let start = value.find("filename=\"")? + "filename=\"".len();
        let rest = &value[start..];
        let end = rest.find('"')?;
        Some(rest[..end].to_string())
    }

    fn header_flag(&self, name: &str) -> bool {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    fn header_string(&self, name: &str) -> Option<String> {
        let value = self.headers.get(name)?.to_str().ok()?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

/// Interpret response theo operation đã submit (snapshot).
pub fn interpret(op: &Operation, raw: &RawResponse) -> Result<ResponseOutcome, ClientError> {
    if !raw.is_success() {
        return Ok(ResponseOutcome::ErrorDetail(raw.detail_message()));
    }

    match op {
        Operation::GeneratePassword { .. } => {
            let value: serde_json::Value = serde_json::from_slice(&raw.body)
                .map_err(|e| ClientError::Parse(e.to_string()))?;
            let password = value
                .get("password")
                .and_then(|p| p.as_str())
                .ok_or_else(|| {
                    ClientError::Parse("response has no 'password' field".to_string())
                })?;
            Ok(ResponseOutcome::JsonResult {
                password: password.to_string(),
            })
        }

        Operation::GenerateKey {
            key_type, key_name, ..
        } => {
            let fallback = match key_type {
                KeyType::Symmetric => format!("{}.key", key_name.trim()),
                KeyType::Asymmetric => format!("{}.pem", key_name.trim()),
            };
            let side_channel = SideChannel {
                public_key_available: raw.header_flag(HEADER_PUBLIC_KEY_AVAILABLE),
                public_key_name: raw.header_string(HEADER_PUBLIC_KEY_NAME),
                ..SideChannel::default()
            };
            Ok(binary_outcome(raw, fallback, side_channel))
        }

        Operation::EncryptSymmetric { file, .. } | Operation::EncryptAsymmetric { file, .. } => {
            let side_channel = SideChannel {
                generated_key: raw.header_flag(HEADER_GENERATED_KEY),
                generated_iv: raw.header_flag(HEADER_GENERATED_IV),
                ..SideChannel::default()
            };
            Ok(binary_outcome(
                raw,
                format!("encrypted_{}", display_name(file)),
                side_channel,
            ))
        }

        Operation::DecryptSymmetric { file, .. } | Operation::DecryptAsymmetric { file, .. } => {
            Ok(binary_outcome(
                raw,
                format!("decrypted_{}", display_name(file)),
                SideChannel::default(),
            ))
        }

        // Hash trả về plain text (raw hash value, không phải JSON);
        // tự dựng text artifact từ nó để download
        Operation::HashFile { file, .. } => {
            let text = std::str::from_utf8(&raw.body)
                .map_err(|e| ClientError::Parse(e.to_string()))?;
            let hash = text.trim().to_string();
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string());
            Ok(ResponseOutcome::BinaryArtifact {
                artifact: Artifact {
                    filename: format!("{}_hash.txt", stem),
                    bytes: hash.into_bytes(),
                },
                side_channel: SideChannel::default(),
            })
        }

        Operation::ShareKey { key_name, .. } => Ok(binary_outcome(
            raw,
            format!("{}_dh.key", key_name.trim()),
            SideChannel::default(),
        )),

        Operation::CompareHash { .. } => Err(ClientError::Parse(
            "hash comparison has no server response".to_string(),
        )),
    }
}

fn binary_outcome(raw: &RawResponse, fallback: String, side_channel: SideChannel) -> ResponseOutcome {
    let filename = raw.disposition_filename().unwrap_or(fallback);
    ResponseOutcome::BinaryArtifact {
        artifact: Artifact {
            filename,
            bytes: raw.body.clone(),
        },
        side_channel,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{
        AsymmetricAlgorithm, BlockMode, HashAlgorithm, SymmetricAlgorithm,
    };
    use reqwest::header::HeaderValue;
    use std::path::PathBuf;

    fn raw(status: u16, headers: HeaderMap, body: &[u8]) -> RawResponse {
        RawResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    fn encrypt_op() -> Operation {
        Operation::EncryptSymmetric {
            file: PathBuf::from("report.pdf"),
            algorithm: SymmetricAlgorithm::Aes256,
            mode: BlockMode::Cbc,
            iv: None,
            key_file: None,
        }
    }

    #[test]
    fn test_password_extracted_from_json() {
        let op = Operation::GeneratePassword {
            length: 12,
            use_uppercase: true,
            use_lowercase: true,
            use_numbers: true,
            use_symbols: true,
        };
        let response = raw(200, HeaderMap::new(), br#"{"password": "P@ssw0rd!2345"}"#);
        assert_eq!(
            interpret(&op, &response).unwrap(),
            ResponseOutcome::JsonResult {
                password: "P@ssw0rd!2345".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_password_body_is_parse_error() {
        let op = Operation::GeneratePassword {
            length: 12,
            use_uppercase: true,
            use_lowercase: true,
            use_numbers: true,
            use_symbols: true,
        };
        let response = raw(200, HeaderMap::new(), b"not json");
        assert!(matches!(
            interpret(&op, &response),
            Err(ClientError::Parse(_))
        ));
    }

    #[test]
    fn test_error_detail_from_json_body() {
        let response = raw(400, HeaderMap::new(), br#"{"detail": "invalid IV length"}"#);
        assert_eq!(
            interpret(&encrypt_op(), &response).unwrap(),
            ResponseOutcome::ErrorDetail("invalid IV length".to_string())
        );
    }

    #[test]
    fn test_error_falls_back_to_status_text() {
        let response = raw(500, HeaderMap::new(), b"<html>oops</html>");
        assert_eq!(
            interpret(&encrypt_op(), &response).unwrap(),
            ResponseOutcome::ErrorDetail("Internal Server Error".to_string())
        );
    }

    #[test]
    fn test_filename_from_content_disposition() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"report.pdf.enc\""),
        );
        let response = raw(200, headers, b"ciphertext");
        match interpret(&encrypt_op(), &response).unwrap() {
            ResponseOutcome::BinaryArtifact { artifact, .. } => {
                assert_eq!(artifact.filename, "report.pdf.enc");
                assert_eq!(artifact.bytes, b"ciphertext");
            }
            other => panic!("expected binary artifact, got {:?}", other),
        }
    }

    #[test]
    fn test_encrypt_fallback_filename() {
        let response = raw(200, HeaderMap::new(), b"ciphertext");
        match interpret(&encrypt_op(), &response).unwrap() {
            ResponseOutcome::BinaryArtifact { artifact, .. } => {
                assert_eq!(artifact.filename, "encrypted_report.pdf");
            }
            other => panic!("expected binary artifact, got {:?}", other),
        }
    }

    #[test]
    fn test_decrypt_fallback_filename() {
        let op = Operation::DecryptAsymmetric {
            file: PathBuf::from("secret.enc"),
            algorithm: AsymmetricAlgorithm::Rsa2048,
            private_key_file: PathBuf::from("priv.pem"),
        };
        let response = raw(200, HeaderMap::new(), b"plaintext");
        match interpret(&op, &response).unwrap() {
            ResponseOutcome::BinaryArtifact { artifact, side_channel } => {
                assert_eq!(artifact.filename, "decrypted_secret.enc");
                assert_eq!(side_channel, SideChannel::default());
            }
            other => panic!("expected binary artifact, got {:?}", other),
        }
    }

    #[test]
    fn test_generated_key_and_iv_flags() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_GENERATED_KEY, HeaderValue::from_static("true"));
        headers.insert(HEADER_GENERATED_IV, HeaderValue::from_static("true"));
        let response = raw(200, headers, b"ciphertext");
        match interpret(&encrypt_op(), &response).unwrap() {
            ResponseOutcome::BinaryArtifact { side_channel, .. } => {
                assert!(side_channel.generated_key);
                assert!(side_channel.generated_iv);
            }
            other => panic!("expected binary artifact, got {:?}", other),
        }
    }

    #[test]
    fn test_companion_public_key_side_channel() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HEADER_PUBLIC_KEY_AVAILABLE,
            HeaderValue::from_static("true"),
        );
        headers.insert(
            HEADER_PUBLIC_KEY_NAME,
            HeaderValue::from_static("my_pair_public.pem"),
        );
        let op = Operation::GenerateKey {
            key_type: KeyType::Asymmetric,
            symmetric_algorithm: SymmetricAlgorithm::Aes256,
            asymmetric_algorithm: AsymmetricAlgorithm::Rsa2048,
            key_name: "my_pair".to_string(),
        };
        let response = raw(200, headers, b"private key bytes");
        match interpret(&op, &response).unwrap() {
            ResponseOutcome::BinaryArtifact { artifact, side_channel } => {
                // Không có content-disposition -> fallback theo key type
                assert_eq!(artifact.filename, "my_pair.pem");
                assert!(side_channel.public_key_available);
                assert_eq!(
                    side_channel.public_key_name.as_deref(),
                    Some("my_pair_public.pem")
                );
            }
            other => panic!("expected binary artifact, got {:?}", other),
        }
    }

    #[test]
    fn test_symmetric_key_fallback_extension() {
        let op = Operation::GenerateKey {
            key_type: KeyType::Symmetric,
            symmetric_algorithm: SymmetricAlgorithm::Aes128,
            asymmetric_algorithm: AsymmetricAlgorithm::Rsa2048,
            key_name: "session".to_string(),
        };
        let response = raw(200, HeaderMap::new(), b"key bytes");
        match interpret(&op, &response).unwrap() {
            ResponseOutcome::BinaryArtifact { artifact, .. } => {
                assert_eq!(artifact.filename, "session.key");
            }
            other => panic!("expected binary artifact, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_becomes_synthetic_text_artifact() {
        let op = Operation::HashFile {
            file: PathBuf::from("report.pdf"),
            algorithm: HashAlgorithm::Sha2_256,
        };
        let response = raw(200, HeaderMap::new(), b"abc123def456\n");
        match interpret(&op, &response).unwrap() {
            ResponseOutcome::BinaryArtifact { artifact, .. } => {
                assert_eq!(artifact.filename, "report_hash.txt");
                assert_eq!(artifact.bytes, b"abc123def456");
            }
            other => panic!("expected binary artifact, got {:?}", other),
        }
    }
}
