//! Download trigger - lưu binary artifact xuống disk.
//!
//! Ghi qua temp file trong cùng thư mục rồi persist (rename),
//! nên write thất bại không bao giờ để lại artifact dở dang.
//! Tên file bị trùng được thêm suffix số thay vì ghi đè.

use crate::ops::Artifact;
use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Lưu artifact vào output directory, trả về đường dẫn đã ghi.
pub fn save_artifact(artifact: &Artifact, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create output dir: {}", output_dir.display()))?;

    let target = unique_path(output_dir, &artifact.filename);

    let mut temp = NamedTempFile::new_in(output_dir)
        .with_context(|| format!("Cannot create temp file in {}", output_dir.display()))?;
    temp.write_all(&artifact.bytes)
        .with_context(|| format!("Cannot write artifact: {}", target.display()))?;
    temp.persist(&target)
        .map_err(|e| anyhow!("Cannot save artifact {}: {}", target.display(), e))?;

    Ok(target)
}

/// Tìm tên file chưa tồn tại trong dir: `name`, `stem (1).ext`, `stem (2).ext`, ...
fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem.to_string(), format!(".{}", ext)),
        None => (filename.to_string(), String::new()),
    };

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{} ({}){}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact(name: &str, bytes: &[u8]) -> Artifact {
        Artifact {
            filename: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_saves_artifact_bytes() -> Result<()> {
        let dir = TempDir::new()?;
        let saved = save_artifact(&artifact("encrypted_report.pdf", b"ciphertext"), dir.path())?;

        assert_eq!(saved, dir.path().join("encrypted_report.pdf"));
        assert_eq!(std::fs::read(&saved)?, b"ciphertext");
        Ok(())
    }

    #[test]
    fn test_never_clobbers_existing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let first = save_artifact(&artifact("key.pem", b"one"), dir.path())?;
        let second = save_artifact(&artifact("key.pem", b"two"), dir.path())?;

        assert_eq!(first, dir.path().join("key.pem"));
        assert_eq!(second, dir.path().join("key (1).pem"));
        assert_eq!(std::fs::read(&first)?, b"one");
        assert_eq!(std::fs::read(&second)?, b"two");
        Ok(())
    }

    #[test]
    fn test_creates_output_dir() -> Result<()> {
        let dir = TempDir::new()?;
        let nested = dir.path().join("downloads");
        let saved = save_artifact(&artifact("a_hash.txt", b"abc123"), &nested)?;

        assert!(saved.starts_with(&nested));
        assert_eq!(std::fs::read_to_string(&saved)?, "abc123");
        Ok(())
    }

    #[test]
    fn test_suffix_for_extensionless_name() -> Result<()> {
        let dir = TempDir::new()?;
        save_artifact(&artifact("keyfile", b"one"), dir.path())?;
        let second = save_artifact(&artifact("keyfile", b"two"), dir.path())?;

        assert_eq!(second, dir.path().join("keyfile (1)"));
        Ok(())
    }
}
