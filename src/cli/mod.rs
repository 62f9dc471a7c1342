//! CLI definitions và command implementations cho CryptoBridge.

pub mod commands;

use clap::{Parser, Subcommand};
use cryptobridge::ops::{
    AsymmetricAlgorithm, BlockMode, ExchangeMode, HashAlgorithm, KeyType, SymmetricAlgorithm,
};
use std::path::PathBuf;

/// CryptoBridge - CLI client for a remote cryptographic service
#[derive(Parser)]
#[command(name = "cryptobridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sinh password ngẫu nhiên trên server
    GeneratePassword {
        /// Độ dài password (8-128)
        #[arg(short, long, default_value_t = 12)]
        length: u32,

        /// Không dùng chữ hoa
        #[arg(long)]
        no_uppercase: bool,

        /// Không dùng chữ thường
        #[arg(long)]
        no_lowercase: bool,

        /// Không dùng chữ số
        #[arg(long)]
        no_numbers: bool,

        /// Không dùng ký tự đặc biệt
        #[arg(long)]
        no_symbols: bool,
    },

    /// Sinh key mới trên server và download về
    GenerateKey {
        /// Tên key (dùng làm tên file download)
        name: String,

        /// Loại key, quyết định algorithm nào được dùng
        #[arg(short = 't', long, value_enum, default_value_t = KeyType::Symmetric)]
        key_type: KeyType,

        /// Algorithm khi key type là symmetric
        #[arg(long, value_enum, default_value_t = SymmetricAlgorithm::Aes256)]
        symmetric_algorithm: SymmetricAlgorithm,

        /// Algorithm khi key type là asymmetric
        #[arg(long, value_enum, default_value_t = AsymmetricAlgorithm::Rsa2048)]
        asymmetric_algorithm: AsymmetricAlgorithm,
    },

    /// Mã hóa file bằng symmetric algorithm
    EncryptSymmetric {
        /// File cần mã hóa
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = SymmetricAlgorithm::Aes256)]
        algorithm: SymmetricAlgorithm,

        #[arg(short, long, value_enum, default_value_t = BlockMode::Cbc)]
        mode: BlockMode,

        /// IV dạng hex (CBC). Bỏ trống để server tự generate
        #[arg(long)]
        iv: Option<String>,

        /// Key file. Bỏ trống để server tự generate key
        #[arg(short, long)]
        key_file: Option<PathBuf>,
    },

    /// Giải mã file đã mã hóa symmetric
    DecryptSymmetric {
        /// File đã mã hóa
        file: PathBuf,

        /// Algorithm - phải đúng algorithm đã dùng khi mã hóa
        #[arg(short, long, value_enum, default_value_t = SymmetricAlgorithm::Aes256)]
        algorithm: SymmetricAlgorithm,

        /// Block mode - phải đúng mode đã dùng khi mã hóa
        #[arg(short, long, value_enum, default_value_t = BlockMode::Cbc)]
        mode: BlockMode,

        /// IV dạng hex - bắt buộc với CBC, phải đúng IV đã dùng khi mã hóa
        #[arg(long)]
        iv: Option<String>,

        #[arg(short, long)]
        key_file: Option<PathBuf>,
    },

    /// Mã hóa file bằng public key (asymmetric)
    EncryptAsymmetric {
        /// File cần mã hóa
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = AsymmetricAlgorithm::Rsa2048)]
        algorithm: AsymmetricAlgorithm,

        /// Public key file
        #[arg(short, long)]
        public_key: PathBuf,
    },

    /// Giải mã file bằng private key (asymmetric)
    DecryptAsymmetric {
        /// File đã mã hóa
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = AsymmetricAlgorithm::Rsa2048)]
        algorithm: AsymmetricAlgorithm,

        /// Private key file
        #[arg(short, long)]
        private_key: PathBuf,
    },

    /// Hash file trên server, kết quả lưu thành text file
    #[command(name = "hash")]
    HashFile {
        /// File cần hash
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = HashAlgorithm::Sha2_256)]
        algorithm: HashAlgorithm,
    },

    /// So sánh hai hash files (hoàn toàn local, không gọi backend)
    CompareHash {
        /// Hash file thứ nhất (.txt)
        file_a: PathBuf,

        /// Hash file thứ hai (.txt)
        file_b: PathBuf,
    },

    /// Sinh và chia sẻ key qua Diffie-Hellman exchange
    ShareKey {
        /// Tên key (dùng làm tên file download)
        name: String,

        /// Kích thước DH parameters (bits): 1024, 2048 hoặc 3072
        #[arg(short = 's', long, default_value_t = 2048)]
        parameter_size: u32,

        /// Generate parameters mới hoặc receive từ bên kia
        #[arg(short, long, value_enum, default_value_t = ExchangeMode::Generate)]
        mode: ExchangeMode,

        /// Public value nhận từ bên kia (bắt buộc với receive mode)
        #[arg(long)]
        received_value: Option<String>,
    },

    /// Lưu bearer credentials cho các lệnh cần authentication
    Auth {
        /// Access token từ hệ thống auth
        #[arg(long)]
        token: String,

        /// User ID
        #[arg(long)]
        user_id: String,
    },

    /// Xóa tài khoản trên backend (không thể hoàn tác)
    DeleteAccount,
}
