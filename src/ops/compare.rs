//! Local hash comparator - đường đi duy nhất KHÔNG qua backend.
//!
//! Đọc hai hash files (text) local, trim whitespace rồi so sánh
//! exact string equality. Một trong hai file đọc lỗi -> abort với error.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Kết quả so sánh hai hash files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Hai file chứa cùng một hash
    Match { hash: String },
    /// Hash khác nhau - báo cả hai giá trị, gắn nhãn theo nguồn
    Mismatch { hash_a: String, hash_b: String },
}

/// So sánh nội dung (đã trim) của hai hash files.
/// Verdict đối xứng: đổi chỗ A và B không đổi kết quả match/mismatch.
pub fn compare_hash_files(file_a: &Path, file_b: &Path) -> Result<Comparison> {
    let content_a = fs::read_to_string(file_a)
        .with_context(|| format!("Cannot read hash file: {}", file_a.display()))?;
    let content_b = fs::read_to_string(file_b)
        .with_context(|| format!("Cannot read hash file: {}", file_b.display()))?;

    let hash_a = content_a.trim();
    let hash_b = content_b.trim();

    if hash_a == hash_b {
        Ok(Comparison::Match {
            hash: hash_a.to_string(),
        })
    } else {
        Ok(Comparison::Mismatch {
            hash_a: hash_a.to_string(),
            hash_b: hash_b.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_hash(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_identical_hashes_match() -> Result<()> {
        let dir = TempDir::new()?;
        let a = write_hash(&dir, "a_hash.txt", "abc123");
        let b = write_hash(&dir, "b_hash.txt", "abc123");

        assert_eq!(
            compare_hash_files(&a, &b)?,
            Comparison::Match {
                hash: "abc123".to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() -> Result<()> {
        let dir = TempDir::new()?;
        let a = write_hash(&dir, "a_hash.txt", "abc123");
        let b = write_hash(&dir, "b_hash.txt", "abc123 \n");

        assert_eq!(
            compare_hash_files(&a, &b)?,
            Comparison::Match {
                hash: "abc123".to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn test_mismatch_reports_both_values() -> Result<()> {
        let dir = TempDir::new()?;
        let a = write_hash(&dir, "a_hash.txt", "abc123");
        let b = write_hash(&dir, "b_hash.txt", "def456");

        assert_eq!(
            compare_hash_files(&a, &b)?,
            Comparison::Mismatch {
                hash_a: "abc123".to_string(),
                hash_b: "def456".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_verdict_is_symmetric() -> Result<()> {
        let dir = TempDir::new()?;
        let a = write_hash(&dir, "a_hash.txt", "abc123");
        let b = write_hash(&dir, "b_hash.txt", "def456");

        let forward = compare_hash_files(&a, &b)?;
        let backward = compare_hash_files(&b, &a)?;
        assert!(matches!(forward, Comparison::Mismatch { .. }));
        assert!(matches!(backward, Comparison::Mismatch { .. }));
        Ok(())
    }

    #[test]
    fn test_unreadable_file_aborts() {
        let dir = TempDir::new().unwrap();
        let a = write_hash(&dir, "a_hash.txt", "abc123");
        let missing = dir.path().join("missing_hash.txt");

        assert!(compare_hash_files(&a, &missing).is_err());
    }
}
