use std::io::Write;
use std::path::Path;

/// Atomically replace `dst` with `content` using write-to-temp-then-rename.
///
/// The destination is never left in a partial state: either the old file
/// remains or the new content is fully in place.
pub fn atomic_write(dst: &Path, content: &[u8]) -> std::io::Result<()> {
    // Temp name carries a nanosecond timestamp; `create_new` below refuses
    // to open a file that already exists under that name
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", nanos_suffix));

    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)?;

    let result = temp_file
        .write_all(content)
        .and_then(|_| temp_file.sync_all());
    drop(temp_file);
    if let Err(e) = result {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    // On Windows, rename fails if destination exists, so remove it first
    #[cfg(windows)]
    if dst.exists() {
        if let Err(e) = std::fs::remove_file(dst) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }
    }

    std::fs::rename(&temp_path, dst).inspect_err(|_| {
        let _ = std::fs::remove_file(&temp_path);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_creates_and_replaces() {
        let dir = std::env::temp_dir().join("wealthsage_fs_test_replace");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("file.json");

        atomic_write(&path, b"first").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        atomic_write(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        // No temp files left behind
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("tmp."))
            .collect();
        assert!(leftovers.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
