//! Operation model - tagged union cho các cryptographic operations.
//!
//! Mỗi variant chỉ mang đúng các field liên quan đến operation đó,
//! nên không thể có "stale field" từ operation khác lẫn vào request.
//! Algorithm tokens được normalize sang dạng canonical (uppercase,
//! dash-joined, ví dụ `aes-256` -> `AES-256`) trước khi gửi đi,
//! độc lập với cách hiển thị trên CLI.

pub mod compare;
pub mod request;
pub mod response;
pub mod validate;

pub use request::{FilePart, RequestEnvelope};
pub use response::{Artifact, RawResponse, ResponseOutcome, SideChannel};

use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

/// Thuật toán mã hóa đối xứng
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SymmetricAlgorithm {
    #[value(name = "aes-128")]
    Aes128,
    #[value(name = "aes-192")]
    Aes192,
    #[value(name = "aes-256")]
    Aes256,
    #[value(name = "3des")]
    TripleDes,
}

impl SymmetricAlgorithm {
    /// Canonical token gửi cho backend
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Aes128 => "AES-128",
            Self::Aes192 => "AES-192",
            Self::Aes256 => "AES-256",
            Self::TripleDes => "3DES",
        }
    }
}

impl fmt::Display for SymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

/// Thuật toán mã hóa bất đối xứng
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AsymmetricAlgorithm {
    #[value(name = "rsa-2048")]
    Rsa2048,
    #[value(name = "rsa-4096")]
    Rsa4096,
}

impl AsymmetricAlgorithm {
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Rsa2048 => "RSA-2048",
            Self::Rsa4096 => "RSA-4096",
        }
    }
}

impl fmt::Display for AsymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

/// Thuật toán hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashAlgorithm {
    #[value(name = "sha256")]
    Sha2_256,
    #[value(name = "sha512")]
    Sha2_512,
    #[value(name = "sha3-256")]
    Sha3_256,
    #[value(name = "sha3-512")]
    Sha3_512,
}

impl HashAlgorithm {
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Sha2_256 => "SHA2-256",
            Self::Sha2_512 => "SHA2-512",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha3_512 => "SHA3-512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

/// Block mode cho symmetric encryption
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BlockMode {
    #[value(name = "cbc")]
    Cbc,
    #[value(name = "ecb")]
    Ecb,
}

impl BlockMode {
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Cbc => "CBC",
            Self::Ecb => "ECB",
        }
    }
}

impl fmt::Display for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

/// Loại key cho generate-key (quyết định algorithm field nào được dùng)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyType {
    #[value(name = "symmetric")]
    Symmetric,
    #[value(name = "asymmetric")]
    Asymmetric,
}

impl KeyType {
    /// Giá trị gửi trong JSON body (lowercase, khác với algorithm tokens)
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Symmetric => "symmetric",
            Self::Asymmetric => "asymmetric",
        }
    }
}

/// Exchange mode cho Diffie-Hellman key sharing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExchangeMode {
    #[value(name = "generate")]
    Generate,
    #[value(name = "receive")]
    Receive,
}

impl ExchangeMode {
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Receive => "receive",
        }
    }
}

/// Một cryptographic operation với đầy đủ parameters của nó.
///
/// Được snapshot tại thời điểm submit: response handling luôn nhìn thấy
/// parameters lúc submit, không phải state bị mutate sau đó.
#[derive(Debug, Clone)]
pub enum Operation {
    GeneratePassword {
        length: u32,
        use_uppercase: bool,
        use_lowercase: bool,
        use_numbers: bool,
        use_symbols: bool,
    },
    GenerateKey {
        key_type: KeyType,
        /// Dùng khi key_type là symmetric
        symmetric_algorithm: SymmetricAlgorithm,
        /// Dùng khi key_type là asymmetric
        asymmetric_algorithm: AsymmetricAlgorithm,
        key_name: String,
    },
    EncryptSymmetric {
        file: PathBuf,
        algorithm: SymmetricAlgorithm,
        mode: BlockMode,
        /// Hex IV. CBC không có IV -> server tự generate (trả về header x-generated-iv)
        iv: Option<String>,
        key_file: Option<PathBuf>,
    },
    DecryptSymmetric {
        file: PathBuf,
        algorithm: SymmetricAlgorithm,
        mode: BlockMode,
        /// Hex IV. Bắt buộc với CBC - phải đúng IV đã dùng khi encrypt
        iv: Option<String>,
        key_file: Option<PathBuf>,
    },
    EncryptAsymmetric {
        file: PathBuf,
        algorithm: AsymmetricAlgorithm,
        public_key_file: PathBuf,
    },
    DecryptAsymmetric {
        file: PathBuf,
        algorithm: AsymmetricAlgorithm,
        private_key_file: PathBuf,
    },
    HashFile {
        file: PathBuf,
        algorithm: HashAlgorithm,
    },
    /// So sánh hai hash files - chạy hoàn toàn local, không gọi network
    CompareHash {
        file_a: PathBuf,
        file_b: PathBuf,
    },
    ShareKey {
        parameter_size: u32,
        key_name: String,
        exchange_mode: ExchangeMode,
        received_value: Option<String>,
    },
}

impl Operation {
    /// Operation này có chạy hoàn toàn local không (không gọi backend)
    pub fn is_local(&self) -> bool {
        matches!(self, Operation::CompareHash { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_symmetric_tokens() {
        assert_eq!(SymmetricAlgorithm::Aes128.canonical(), "AES-128");
        assert_eq!(SymmetricAlgorithm::Aes192.canonical(), "AES-192");
        assert_eq!(SymmetricAlgorithm::Aes256.canonical(), "AES-256");
        assert_eq!(SymmetricAlgorithm::TripleDes.canonical(), "3DES");
    }

    #[test]
    fn test_canonical_hash_tokens() {
        assert_eq!(HashAlgorithm::Sha2_256.canonical(), "SHA2-256");
        assert_eq!(HashAlgorithm::Sha2_512.canonical(), "SHA2-512");
        assert_eq!(HashAlgorithm::Sha3_256.canonical(), "SHA3-256");
        assert_eq!(HashAlgorithm::Sha3_512.canonical(), "SHA3-512");
    }

    #[test]
    fn test_canonical_asymmetric_and_mode_tokens() {
        assert_eq!(AsymmetricAlgorithm::Rsa2048.canonical(), "RSA-2048");
        assert_eq!(AsymmetricAlgorithm::Rsa4096.canonical(), "RSA-4096");
        assert_eq!(BlockMode::Cbc.canonical(), "CBC");
        assert_eq!(BlockMode::Ecb.canonical(), "ECB");
    }

    #[test]
    fn test_only_compare_is_local() {
        let compare = Operation::CompareHash {
            file_a: PathBuf::from("a_hash.txt"),
            file_b: PathBuf::from("b_hash.txt"),
        };
        assert!(compare.is_local());

        let hash = Operation::HashFile {
            file: PathBuf::from("a.bin"),
            algorithm: HashAlgorithm::Sha2_256,
        };
        assert!(!hash.is_local());
    }
}
