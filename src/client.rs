//! Dispatch controller - pipeline validate -> build -> send -> interpret -> save.
//!
//! State machine:
//! `Idle -> Validating -> (InvalidInput | Dispatching) -> AwaitingResponse
//!  -> (Succeeded | Failed)`.
//! Terminal states chỉ reset khi submit tiếp theo. Mỗi controller instance
//! chỉ cho phép MỘT submission in-flight - submit thứ hai trong lúc chờ
//! response bị từ chối với `Busy`.
//!
//! Operation được nhận by value lúc dispatch - đó là submission snapshot:
//! response handling luôn thấy parameters lúc submit.

use crate::auth::Credentials;
use crate::config::Config;
use crate::download::save_artifact;
use crate::error::ClientError;
use crate::ops::compare::{compare_hash_files, Comparison};
use crate::ops::request::{build, RequestEnvelope};
use crate::ops::response::{interpret, Artifact, RawResponse, ResponseOutcome, SideChannel};
use crate::ops::validate::validate;
use crate::ops::Operation;
use colored::Colorize;
use reqwest::blocking::multipart::{Form, Part};
use std::path::{Path, PathBuf};

/// Trạng thái của controller qua một vòng submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Validating,
    InvalidInput,
    Dispatching,
    AwaitingResponse,
    Succeeded,
    Failed,
}

/// Kết quả user-visible của một operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    /// Message hiển thị cho user
    pub message: String,
    /// Các artifact đã lưu xuống disk
    pub saved: Vec<PathBuf>,
}

/// Client cho remote cryptographic service
pub struct CryptoClient {
    http: reqwest::blocking::Client,
    base_url: String,
    credentials: Option<Credentials>,
    output_dir: PathBuf,
    state: ControllerState,
}

impl CryptoClient {
    pub fn new(config: &Config, credentials: Option<Credentials>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: config.resolved_api_url(),
            credentials,
            output_dir: config.output_dir.clone(),
            state: ControllerState::Idle,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Dispatch một operation. Validation lỗi -> không có network call nào.
    /// Mọi failure đưa controller về `Failed`, resubmit được ngay.
    pub fn dispatch(&mut self, op: Operation) -> Result<OperationOutcome, ClientError> {
        if self.state == ControllerState::AwaitingResponse {
            return Err(ClientError::Busy);
        }

        self.state = ControllerState::Validating;
        if let Err(e) = validate(&op) {
            self.state = ControllerState::InvalidInput;
            return Err(e.into());
        }

        let result = self.run(op);
        self.state = if result.is_ok() {
            ControllerState::Succeeded
        } else {
            ControllerState::Failed
        };
        result
    }

    fn run(&mut self, op: Operation) -> Result<OperationOutcome, ClientError> {
        // Compare-hash short-circuit toàn bộ pipeline network
        if let Operation::CompareHash { file_a, file_b } = &op {
            return compare_locally(file_a, file_b);
        }

        self.state = ControllerState::Dispatching;
        let envelope = build(&op)?;

        self.state = ControllerState::AwaitingResponse;
        let raw = self.send(envelope)?;

        match interpret(&op, &raw)? {
            ResponseOutcome::ErrorDetail(message) => Err(ClientError::Transport(message)),
            ResponseOutcome::JsonResult { password } => Ok(OperationOutcome {
                message: format!("Generated password: {}", password),
                saved: Vec::new(),
            }),
            ResponseOutcome::BinaryArtifact {
                artifact,
                side_channel,
            } => self.finish_artifact(&op, artifact, side_channel),
        }
    }

    /// Lưu primary artifact, fetch companion public key (best-effort)
    /// và dựng result message.
    fn finish_artifact(
        &self,
        op: &Operation,
        artifact: Artifact,
        side_channel: SideChannel,
    ) -> Result<OperationOutcome, ClientError> {
        let mut message = result_message(op, &artifact);

        // Auto-generated secrets KHÔNG được download tự động - chỉ nhắc user lưu
        if side_channel.generated_key {
            message.push_str(
                " The server auto-generated the encryption key - save it now, \
                 the file cannot be decrypted without it.",
            );
        }
        if side_channel.generated_iv {
            message.push_str(" The server auto-generated the IV - save it alongside the key.");
        }

        let mut saved = vec![save_artifact(&artifact, &self.output_dir)
            .map_err(|e| ClientError::Io(e.to_string()))?];

        // Companion public key: fetch riêng, failure chỉ log - primary result vẫn success
        if let Operation::GenerateKey { key_name, .. } = op {
            if side_channel.public_key_available {
                if let Some(resource) = side_channel.public_key_name.as_deref() {
                    match self.fetch_companion_public_key(resource, key_name) {
                        Ok(public_key) => match save_artifact(&public_key, &self.output_dir) {
                            Ok(path) => saved.push(path),
                            Err(e) => log_side_channel_failure(&e.to_string()),
                        },
                        Err(e) => log_side_channel_failure(&e.to_string()),
                    }
                }
            }
        }

        Ok(OperationOutcome { message, saved })
    }

    fn send(&self, envelope: RequestEnvelope) -> Result<RawResponse, ClientError> {
        let url = format!("{}{}", self.base_url, envelope.path());
        let request = match envelope {
            RequestEnvelope::Json { body, .. } => self.http.post(&url).json(&body),
            RequestEnvelope::Multipart { fields, files, .. } => {
                let mut form = Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                for part in files {
                    form = form.part(part.field, Part::bytes(part.bytes).file_name(part.filename));
                }
                self.http.post(&url).multipart(form)
            }
        };

        let response = request
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        RawResponse::capture(response)
    }

    /// Fetch companion public key được báo qua side-channel headers
    fn fetch_companion_public_key(
        &self,
        resource_name: &str,
        key_name: &str,
    ) -> Result<Artifact, ClientError> {
        let url = format!("{}/generate/key/public/{}", self.base_url, resource_name);
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let raw = RawResponse::capture(response)?;

        if !raw.is_success() {
            return Err(ClientError::Transport(raw.detail_message()));
        }

        let filename = raw
            .disposition_filename()
            .unwrap_or_else(|| format!("{}_public.pem", key_name.trim()));
        Ok(Artifact {
            filename,
            bytes: raw.body,
        })
    }

    /// Xóa tài khoản trên backend (bearer-authenticated).
    pub fn delete_account(&self) -> Result<(), ClientError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ClientError::NotSignedIn)?;

        let url = format!("{}/users/delete", self.base_url);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&credentials.access_token)
            .json(&serde_json::json!({ "userId": credentials.user_id }))
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let raw = RawResponse::capture(response)?;

        let value: serde_json::Value = serde_json::from_slice(&raw.body).unwrap_or_default();
        let success = raw.is_success()
            && value
                .get("success")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
        if success {
            return Ok(());
        }

        let message = value
            .get("error")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| raw.detail_message());
        Err(ClientError::Transport(message))
    }
}

fn compare_locally(file_a: &Path, file_b: &Path) -> Result<OperationOutcome, ClientError> {
    let comparison =
        compare_hash_files(file_a, file_b).map_err(|e| ClientError::Io(e.to_string()))?;
    let message = match comparison {
        Comparison::Match { hash } => format!("Hashes match: {}", hash),
        Comparison::Mismatch { hash_a, hash_b } => format!(
            "Hashes differ:\n  {}: {}\n  {}: {}",
            file_a.display(),
            hash_a,
            file_b.display(),
            hash_b
        ),
    };
    Ok(OperationOutcome {
        message,
        saved: Vec::new(),
    })
}

fn result_message(op: &Operation, artifact: &Artifact) -> String {
    match op {
        Operation::GenerateKey { key_name, .. } => {
            format!("Key '{}' generated", key_name.trim())
        }
        Operation::EncryptSymmetric { .. } | Operation::EncryptAsymmetric { .. } => {
            "File encrypted successfully.".to_string()
        }
        Operation::DecryptSymmetric { .. } | Operation::DecryptAsymmetric { .. } => {
            "File decrypted successfully.".to_string()
        }
        Operation::HashFile { file, algorithm } => format!(
            "{} hash of {}: {}",
            algorithm.canonical(),
            file.display(),
            String::from_utf8_lossy(&artifact.bytes)
        ),
        Operation::ShareKey { key_name, .. } => {
            format!("DH exchange material for '{}' generated", key_name.trim())
        }
        // Password và compare-hash không đi qua artifact path
        _ => "Operation completed.".to_string(),
    }
}

fn log_side_channel_failure(detail: &str) {
    eprintln!(
        "  {} Could not fetch companion public key: {}",
        "!".yellow(),
        detail
    );
}
