//! Pipeline coordination for image batches.

use crate::config::OutputFormat;
use crate::constants::{IMAGE_EXTENSIONS, output_extensions};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Result of checking whether a file should be processed.
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessCheck {
    /// File should be processed.
    Process,
    /// Skip - output already exists.
    SkipExists,
}

/// Determine the output directory for a file.
pub fn output_dir_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// Get output file path for a given format.
pub fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = input.file_stem().map_or_else(
        || std::borrow::Cow::Borrowed("output"),
        |s| s.to_string_lossy(),
    );

    let extension = match format {
        OutputFormat::Json => output_extensions::JSON,
        OutputFormat::Csv => output_extensions::CSV,
    };

    output_dir.join(format!("{stem}{extension}"))
}

/// Check if a file should be processed.
pub fn should_process(
    input: &Path,
    output_dir: &Path,
    formats: &[OutputFormat],
    force: bool,
) -> ProcessCheck {
    if !force {
        let all_exist = formats
            .iter()
            .all(|fmt| output_path_for(input, output_dir, *fmt).exists());
        if all_exist {
            return ProcessCheck::SkipExists;
        }
    }

    ProcessCheck::Process
}

/// Collect input images from paths (files and directories).
///
/// Directory contents are sorted so batches run in a stable order.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_image_file(path) {
                files.push(path.clone());
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            collect_image_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

fn collect_image_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_image_files_recursive(&path, files)?;
        } else if is_image_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file has a supported image extension.
fn is_image_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension().is_some_and(|ext| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(OsStr::new(known)))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_dir_for_with_explicit() {
        let input = Path::new("/data/bin.jpg");
        let output = output_dir_for(input, Some(Path::new("/results")));
        assert_eq!(output, PathBuf::from("/results"));
    }

    #[test]
    fn test_output_dir_for_without_explicit() {
        let input = Path::new("/data/bin.jpg");
        assert_eq!(output_dir_for(input, None), PathBuf::from("/data"));
        assert_eq!(output_dir_for(Path::new("bin.jpg"), None), PathBuf::from("."));
    }

    #[test]
    fn test_output_path_for_formats() {
        let json = output_path_for(Path::new("bin.jpg"), Path::new("/out"), OutputFormat::Json);
        assert_eq!(json, PathBuf::from("/out/bin.binwise.json"));

        let csv = output_path_for(Path::new("bin.jpg"), Path::new("/out"), OutputFormat::Csv);
        assert_eq!(csv, PathBuf::from("/out/bin.binwise.csv"));
    }

    #[test]
    fn test_output_path_for_unicode() {
        let path = output_path_for(
            Path::new("lajittelu_ää.png"),
            Path::new("/output"),
            OutputFormat::Json,
        );
        assert!(path.to_string_lossy().contains("lajittelu_ää"));
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("bin.jpg")));
        assert!(is_image_file(Path::new("bin.JPEG")));
        assert!(is_image_file(Path::new("bin.webp")));
        assert!(!is_image_file(Path::new("bin.txt")));
        assert!(!is_image_file(Path::new("jpg")));
    }

    #[test]
    fn test_should_process_respects_existing_outputs() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bin.jpg");
        let formats = [OutputFormat::Json, OutputFormat::Csv];

        assert_eq!(
            should_process(&input, dir.path(), &formats, false),
            ProcessCheck::Process
        );

        std::fs::write(dir.path().join("bin.binwise.json"), "{}").unwrap();
        assert_eq!(
            should_process(&input, dir.path(), &formats, false),
            ProcessCheck::Process
        );

        std::fs::write(dir.path().join("bin.binwise.csv"), "").unwrap();
        assert_eq!(
            should_process(&input, dir.path(), &formats, false),
            ProcessCheck::SkipExists
        );
        assert_eq!(
            should_process(&input, dir.path(), &formats, true),
            ProcessCheck::Process
        );
    }

    #[test]
    fn test_collect_input_files_recurses_and_sorts() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.png"), b"").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(nested.join("c.webp"), b"").unwrap();

        let files = collect_input_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "c.webp"]);
    }
}
