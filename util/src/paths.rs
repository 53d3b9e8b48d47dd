use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Report file for one test block: `{dir}/block_{block_id}.log`
///
/// Deterministic, so a re-run of the same block overwrites its own report.
pub fn block_report_path<P: AsRef<Path>>(dir: P, block_id: i64) -> PathBuf {
    dir.as_ref().join(format!("block_{block_id}.log"))
}
