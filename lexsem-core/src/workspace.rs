use std::path::{Path, PathBuf};

/// Collects every file with the given extension under `path`. A path that
/// points at a file is returned as is, regardless of its extension.
pub fn search_for_sources<P: AsRef<Path>>(path: P, extension: &str) -> Vec<PathBuf> {
    let path = path.as_ref();
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut sources = vec![];
    search_for_sources_inner(path, extension, &mut sources);
    sources.sort();
    sources
}

fn search_for_sources_inner(path: &Path, extension: &str, sources: &mut Vec<PathBuf>) {
    let Ok(files) = std::fs::read_dir(path) else { return };

    for file in files.flatten() {
        let Ok(file_type) = file.file_type() else { continue };

        if file_type.is_dir() {
            search_for_sources_inner(&file.path(), extension, sources);
        }

        if file_type.is_file() {
            let path = file.path();

            if !path.extension().map(|ext| ext == extension).unwrap_or_default() {
                continue;
            };

            sources.push(path);
        }
    }
}
