use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn resolve_home(override_dir: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = home.context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".passbook"))
}

/// `$PASSBOOK_HOME`, or `~/.passbook`
pub fn passbook_home() -> Result<PathBuf> {
    resolve_home(std::env::var("PASSBOOK_HOME").ok(), std::env::var("HOME").ok())
}

pub fn ensure_passbook_home() -> Result<PathBuf> {
    let dir = passbook_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn read_document(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "document read");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let dir = resolve_home(Some("/tmp/pb".to_string()), Some("/home/me".to_string())).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/pb"));
    }

    #[test]
    fn test_default_under_home() {
        let dir = resolve_home(Some("  ".to_string()), Some("/home/me".to_string())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/me/.passbook"));
        assert!(resolve_home(None, None).is_err());
    }

    #[test]
    fn test_read_document_errors_name_the_path() {
        let err = read_document(Path::new("/nonexistent/passbook/statement.pdf")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/passbook/statement.pdf"));
    }
}
