// src/output/file.rs
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

fn ensure_parent(path: &Path) -> io::Result<()> {
    // 确保目录存在
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Creates or truncates `path` and writes `content`.
pub fn write_to_file(path: &Path, content: &str) -> io::Result<()> {
    ensure_parent(path)?;

    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Appends `content` to `path`, creating the file if needed. Never truncates.
pub fn append_to_file(path: &Path, content: &str) -> io::Result<()> {
    ensure_parent(path)?;

    // 以追加模式打开文件
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_creates_then_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        append_to_file(&path, "one\n").unwrap();
        append_to_file(&path, "two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_write_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        write_to_file(&path, "first version\n").unwrap();
        write_to_file(&path, "second\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
    }
}
