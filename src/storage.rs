use std::fs;
use std::path::PathBuf;

use crate::certificate::models::CertificateArtifact;

const PDF_DIR: &str = "pdf";
const JPG_DIR: &str = "jpg";

/// Local directory layout for generated certificates:
/// `<root>/pdf/<filename>.pdf` and `<root>/jpg/<filename>.jpg`.
#[derive(Debug, Clone)]
pub struct CertificateStorage {
    root: PathBuf,
}

impl CertificateStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn pdf_dir(&self) -> PathBuf {
        self.root.join(PDF_DIR)
    }

    pub fn jpg_dir(&self) -> PathBuf {
        self.root.join(JPG_DIR)
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(self.pdf_dir())?;
        fs::create_dir_all(self.jpg_dir())?;
        log::debug!("Certificate directories ready under {}", self.root.display());
        Ok(())
    }

    /// Paths an artifact with this filename lives at. The name is sanitized so it
    /// can never point outside the certificate directories.
    pub fn artifact(&self, filename: &str) -> CertificateArtifact {
        let safe_name = sanitize_filename::sanitize(filename);
        CertificateArtifact {
            pdf_path: self.pdf_dir().join(format!("{}.pdf", safe_name)),
            jpg_path: self.jpg_dir().join(format!("{}.jpg", safe_name)),
            filename: safe_name,
        }
    }

    /// Whether both files of the artifact are present on disk.
    pub fn artifact_exists(&self, artifact: &CertificateArtifact) -> bool {
        artifact.pdf_path.is_file() && artifact.jpg_path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_artifact_paths() {
        let storage = CertificateStorage::new("certificates");
        let artifact = storage.artifact("certificate_jane_doe_1700000000000");
        assert_eq!(
            artifact.pdf_path,
            PathBuf::from("certificates/pdf/certificate_jane_doe_1700000000000.pdf")
        );
        assert_eq!(
            artifact.jpg_path,
            PathBuf::from("certificates/jpg/certificate_jane_doe_1700000000000.jpg")
        );
    }

    #[test]
    fn test_artifact_strips_path_traversal() {
        let storage = CertificateStorage::new("certificates");
        let artifact = storage.artifact("../../etc/passwd");
        assert!(!artifact.filename.contains('/'));
        assert!(artifact.pdf_path.starts_with("certificates/pdf"));
    }

    #[test]
    fn test_ensure_directories_and_exists() {
        let dir = tempdir().unwrap();
        let storage = CertificateStorage::new(dir.path().join("certificates"));
        storage.ensure_directories().unwrap();
        assert!(storage.pdf_dir().is_dir());
        assert!(storage.jpg_dir().is_dir());

        let artifact = storage.artifact("certificate_acme_1");
        assert!(!storage.artifact_exists(&artifact));

        fs::write(&artifact.pdf_path, b"pdf").unwrap();
        assert!(!storage.artifact_exists(&artifact));
        fs::write(&artifact.jpg_path, b"jpg").unwrap();
        assert!(storage.artifact_exists(&artifact));
    }
}
