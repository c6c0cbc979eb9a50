//! Input file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "gif", "jpg", "jpeg"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|known| e.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Image files directly inside `dir`.
pub fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && is_image_path(&path) {
            found.push(path);
        }
    }
    Ok(found)
}

/// Expand `inputs` (files or directories) into a sorted list of image paths.
///
/// With no inputs the current directory is scanned. Missing files either fail
/// the run or are skipped with a warning.
pub fn collect(inputs: &[PathBuf], treat_missing_as_error: bool) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    if inputs.is_empty() {
        let cwd = std::env::current_dir()?;
        paths = scan_dir(&cwd)?;
    }
    for input in inputs {
        if input.is_dir() {
            let found = scan_dir(input)?;
            if found.is_empty() {
                tracing::warn!("{} does not contain any images", input.display());
            }
            paths.extend(found);
        } else if input.is_file() {
            paths.push(input.clone());
        } else if treat_missing_as_error {
            bail!("could not find file: {}", input.display());
        } else {
            tracing::warn!("could not find file: {}", input.display());
        }
    }
    if paths.is_empty() {
        bail!("no input images were specified or found");
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn recognizes_image_extensions() {
        assert!(is_image_path(Path::new("a/b.PNG")));
        assert!(is_image_path(Path::new("c.jpeg")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("png")));
    }

    #[test]
    fn directories_expand_to_sorted_images() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        for name in ["b.png", "a.gif", "readme.md"] {
            fs::write(dir.join(name), b"").unwrap();
        }
        fs::create_dir(dir.join("nested.png")).unwrap();
        let paths = collect(&[dir.to_path_buf()], true).unwrap();
        assert_eq!(paths, vec![dir.join("a.gif"), dir.join("b.png")]);
    }

    #[test]
    fn missing_files_follow_the_policy() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join("x.png"), b"").unwrap();
        let inputs = vec![dir.join("x.png"), dir.join("gone.png"), dir.join("x.png")];

        assert!(collect(&inputs, true).is_err());
        assert_eq!(collect(&inputs, false).unwrap(), vec![dir.join("x.png")]);
    }

    #[test]
    fn nothing_found_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(collect(&[temp.path().to_path_buf()], true).is_err());
    }
}
