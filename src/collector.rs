// ============================================================================
// File Collector
//
// Expands user-supplied paths (files and directories) into a flat, ordered
// list of absolute file paths. Directories are walked depth-first: the files
// of a directory come first, in case-insensitive name order, followed by each
// subdirectory in case-insensitive name order. Unreachable paths produce
// warnings, never errors.
// ============================================================================

use log::{debug, warn};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::errors::{MergerError, MergerResult};

/// Characters that may not appear in an extension token
const INVALID_EXTENSION_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Delimiters accepted between extension tokens
const EXTENSION_DELIMITERS: &[char] = &[',', ';', ' '];

/// Non-fatal problem met while expanding paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectWarning {
    PathNotFound(PathBuf),
    EnumerationFailure { directory: PathBuf, message: String },
}

impl fmt::Display for CollectWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectWarning::PathNotFound(path) => {
                write!(f, "path does not exist: {}", path.display())
            }
            CollectWarning::EnumerationFailure { directory, message } => write!(
                f,
                "failed to enumerate directory: {} ({})",
                directory.display(),
                message
            ),
        }
    }
}

/// Set of dot-prefixed, lowercased extensions that directory entries must match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Parse a comma, semicolon or space separated extension list
    ///
    /// `txt` and `*.txt` both become `.txt`. A `*` or `*.*` token anywhere,
    /// or a blank list, means "no filter" and yields `Ok(None)`.
    pub fn parse(input: &str) -> MergerResult<Option<Self>> {
        let mut extensions = BTreeSet::new();

        let tokens = input
            .split(EXTENSION_DELIMITERS)
            .map(str::trim)
            .filter(|token| !token.is_empty());

        for token in tokens {
            if token == "*" || token == "*.*" {
                return Ok(None);
            }

            let without_star = match token.strip_prefix('*') {
                Some(rest) if rest.starts_with('.') => rest,
                _ => token,
            };
            let normalized = if without_star.starts_with('.') {
                without_star.to_string()
            } else {
                format!(".{}", without_star)
            };

            if normalized.len() <= 1 || normalized.contains(INVALID_EXTENSION_CHARS) {
                return Err(MergerError::InvalidExtensionToken {
                    token: token.to_string(),
                });
            }

            extensions.insert(normalized.to_lowercase());
        }

        if extensions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Self { extensions }))
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        dotted_extension(path)
            .map(|extension| self.extensions.contains(&extension))
            .unwrap_or(false)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.extensions().collect();
        f.write_str(&joined.join(", "))
    }
}

/// Result of a path expansion
#[derive(Debug, Default)]
pub struct CollectedFiles {
    pub files: Vec<PathBuf>,
    pub warnings: Vec<CollectWarning>,
}

pub struct FileCollector;

impl FileCollector {
    /// Expand files and directories into an ordered list of absolute file paths
    ///
    /// The extension filter applies to files found inside directories only;
    /// an explicitly named file is always kept. Duplicates are not removed.
    pub fn expand<I, P>(paths: I, filter: Option<&ExtensionFilter>) -> CollectedFiles
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut collected = CollectedFiles::default();

        for raw in paths {
            let path = raw.as_ref();
            if path.as_os_str().to_string_lossy().trim().is_empty() {
                continue;
            }

            if path.is_file() {
                collected.files.push(normalize_path(path));
            } else if path.is_dir() {
                Self::walk_directory(&normalize_path(path), filter, &mut collected);
            } else {
                warn!("Ignoring missing path: {}", path.display());
                collected
                    .warnings
                    .push(CollectWarning::PathNotFound(path.to_path_buf()));
            }
        }

        debug!(
            "Collected {} files with {} warnings",
            collected.files.len(),
            collected.warnings.len()
        );
        collected
    }

    fn walk_directory(root: &Path, filter: Option<&ExtensionFilter>, collected: &mut CollectedFiles) {
        let mut pending = vec![root.to_path_buf()];

        while let Some(directory) = pending.pop() {
            let entries = match fs::read_dir(&directory) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Failed to list {}: {}", directory.display(), e);
                    collected.warnings.push(CollectWarning::EnumerationFailure {
                        directory: directory.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let mut files = Vec::new();
            let mut subdirectories = Vec::new();

            for entry in entries {
                let (entry, file_type) =
                    match entry.and_then(|entry| entry.file_type().map(|t| (entry, t))) {
                        Ok(pair) => pair,
                        Err(e) => {
                            collected.warnings.push(CollectWarning::EnumerationFailure {
                                directory: directory.clone(),
                                message: e.to_string(),
                            });
                            continue;
                        }
                    };

                let path = entry.path();
                if file_type.is_dir() {
                    subdirectories.push(path);
                } else if file_type.is_file() {
                    files.push(path);
                } else if file_type.is_symlink() {
                    // Linked files are read through; linked directories are not
                    // descended so a link cycle cannot recurse forever.
                    match fs::metadata(&path) {
                        Ok(meta) if meta.is_file() => files.push(path),
                        Ok(_) => debug!("Not following directory link {}", path.display()),
                        Err(e) => debug!("Skipping broken link {}: {}", path.display(), e),
                    }
                }
            }

            sort_case_insensitive(&mut files);
            sort_case_insensitive(&mut subdirectories);

            collected.files.extend(
                files
                    .into_iter()
                    .filter(|file| filter.map_or(true, |f| f.matches(file))),
            );

            // Reverse push so the first subdirectory is popped first
            pending.extend(subdirectories.into_iter().rev());
        }
    }
}

/// Drop items whose path was already seen, keeping the first occurrence and
/// the order of the rest
pub fn retain_first_occurrence<T, F>(items: Vec<T>, path_of: F) -> Vec<T>
where
    F: Fn(&T) -> &Path,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(path_of(item).to_path_buf()))
        .collect()
}

/// Absolute form of `path` with `.` and `..` removed lexically
///
/// Symbolic links are not resolved, so a link keeps its own path.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !matches!(
                    normalized.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Extension including the dot, lowercased; `.bashrc` counts as an extension,
/// a name ending in `.` has none
fn dotted_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let dot = name.rfind('.')?;
    if dot + 1 == name.len() {
        return None;
    }
    Some(name[dot..].to_lowercase())
}

fn sort_case_insensitive(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (name.to_uppercase(), name)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_parse_extension_list() {
        let filter = ExtensionFilter::parse("txt, *.md").unwrap().unwrap();
        let extensions: Vec<_> = filter.extensions().collect();
        assert_eq!(extensions, [".md", ".txt"]);
    }

    #[test]
    fn test_parse_mixed_delimiters_and_case() {
        let filter = ExtensionFilter::parse(".TXT;csv  log").unwrap().unwrap();
        assert_eq!(filter.to_string(), ".csv, .log, .txt");
        assert!(filter.matches(Path::new("dir/Report.Txt")));
        assert!(!filter.matches(Path::new("dir/notes.md")));
        assert!(!filter.matches(Path::new("dir/README")));
    }

    #[test]
    fn test_wildcard_disables_filter() {
        assert!(ExtensionFilter::parse("*").unwrap().is_none());
        assert!(ExtensionFilter::parse("txt,*.*").unwrap().is_none());
        assert!(ExtensionFilter::parse("   ").unwrap().is_none());
    }

    #[test]
    fn test_invalid_tokens_are_reported() {
        for token in ["a/b", "*.t?t", ".", "*.", "c:txt"] {
            match ExtensionFilter::parse(token) {
                Err(MergerError::InvalidExtensionToken { token: reported }) => {
                    assert_eq!(reported, token)
                }
                other => panic!("{token:?} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_dotted_extension() {
        assert_eq!(dotted_extension(Path::new("a/b.TXT")).as_deref(), Some(".txt"));
        assert_eq!(dotted_extension(Path::new(".bashrc")).as_deref(), Some(".bashrc"));
        assert_eq!(dotted_extension(Path::new("trailing.")), None);
        assert_eq!(dotted_extension(Path::new("plain")), None);
    }

    #[test]
    fn test_directory_expansion_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("A.txt"), "a").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("c.txt"), "c").unwrap();

        let collected = FileCollector::expand([root], None);
        assert!(collected.warnings.is_empty());

        let root = std::path::absolute(root).unwrap();
        assert_eq!(names(&collected.files, &root), ["A.txt", "b.txt", "sub/c.txt"]);
        assert!(collected.files.iter().all(|f| f.is_absolute()));
    }

    #[test]
    fn test_files_come_before_subdirectories() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a_dir").join("Deep")).unwrap();
        fs::create_dir(root.join("B_dir")).unwrap();
        fs::write(root.join("z.txt"), "z").unwrap();
        fs::write(root.join("a_dir").join("x.txt"), "x").unwrap();
        fs::write(root.join("a_dir").join("Deep").join("d.txt"), "d").unwrap();
        fs::write(root.join("B_dir").join("y.txt"), "y").unwrap();

        let collected = FileCollector::expand([root], None);
        let root = std::path::absolute(root).unwrap();
        assert_eq!(
            names(&collected.files, &root),
            ["z.txt", "a_dir/x.txt", "a_dir/Deep/d.txt", "B_dir/y.txt"]
        );
    }

    #[test]
    fn test_filter_applies_to_directory_entries_only() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("docs")).unwrap();
        fs::write(root.join("docs").join("keep.TXT"), "1").unwrap();
        fs::write(root.join("docs").join("skip.bin"), "2").unwrap();
        let explicit = root.join("explicit.bin");
        fs::write(&explicit, "3").unwrap();

        let filter = ExtensionFilter::parse("txt").unwrap();
        let collected =
            FileCollector::expand([root.join("docs"), explicit.clone()], filter.as_ref());

        let root = std::path::absolute(root).unwrap();
        assert_eq!(names(&collected.files, &root), ["docs/keep.TXT", "explicit.bin"]);
    }

    #[test]
    fn test_missing_and_blank_paths() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("present.txt");
        fs::write(&present, "p").unwrap();
        let missing = dir.path().join("missing.txt");

        let inputs = vec![
            PathBuf::from("   "),
            missing.clone(),
            present.clone(),
            PathBuf::new(),
        ];
        let collected = FileCollector::expand(inputs, None);

        assert_eq!(collected.files, [std::path::absolute(&present).unwrap()]);
        assert_eq!(collected.warnings, [CollectWarning::PathNotFound(missing.clone())]);
        assert_eq!(
            collected.warnings[0].to_string(),
            format!("path does not exist: {}", missing.display())
        );
    }

    #[test]
    fn test_input_order_is_preserved() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("z_first.txt");
        let second = dir.path().join("a_second.txt");
        fs::write(&first, "1").unwrap();
        fs::write(&second, "2").unwrap();

        let collected = FileCollector::expand([&first, &second, &first], None);
        assert_eq!(collected.files.len(), 3);
        assert_eq!(collected.files[0], std::path::absolute(&first).unwrap());
        assert_eq!(collected.files[1], std::path::absolute(&second).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_dot_segments_are_removed() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c.txt")), PathBuf::from("/a/c.txt"));
        assert_eq!(normalize_path(Path::new("/../x")), PathBuf::from("/x"));
    }

    #[test]
    fn test_same_file_through_dot_dot_is_merged_once() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("a.txt"), "a").unwrap();

        let direct = sub.join("a.txt");
        let roundabout = sub.join("..").join("sub").join("a.txt");
        let collected = FileCollector::expand([&direct, &roundabout], None);
        assert_eq!(collected.files[0], collected.files[1]);

        let unique = retain_first_occurrence(collected.files, |path| path.as_path());
        assert_eq!(unique, [normalize_path(&direct)]);
    }

    #[test]
    fn test_enumeration_failure_warns_and_continues() {
        let dir = tempdir().unwrap();
        let not_a_dir = dir.path().join("plain.txt");
        fs::write(&not_a_dir, "x").unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("kept.txt"), "k").unwrap();

        let mut collected = CollectedFiles::default();
        FileCollector::walk_directory(&not_a_dir, None, &mut collected);
        FileCollector::walk_directory(&docs, None, &mut collected);

        assert_eq!(collected.files, [docs.join("kept.txt")]);
        assert_eq!(collected.warnings.len(), 1);
        match &collected.warnings[0] {
            CollectWarning::EnumerationFailure { directory, .. } => {
                assert_eq!(directory, &not_a_dir)
            }
            other => panic!("unexpected warning {other:?}"),
        }
        assert!(collected.warnings[0]
            .to_string()
            .starts_with(&format!("failed to enumerate directory: {}", not_a_dir.display())));
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_links_are_not_followed() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        let inner = root.join("inner");
        fs::create_dir_all(&inner).unwrap();
        fs::write(inner.join("file.txt"), "f").unwrap();
        // Cycle back to the top, and a link to a file
        symlink(&root, inner.join("loop")).unwrap();
        symlink(inner.join("file.txt"), root.join("linked.txt")).unwrap();

        let collected = FileCollector::expand([&root], None);
        let root = normalize_path(&root);
        assert_eq!(names(&collected.files, &root), ["linked.txt", "inner/file.txt"]);
        assert!(collected.warnings.is_empty());
    }

    #[test]
    fn test_retain_first_occurrence() {
        let paths = vec![
            PathBuf::from("/a"),
            PathBuf::from("/b"),
            PathBuf::from("/a"),
            PathBuf::from("/c"),
            PathBuf::from("/b"),
        ];
        assert_eq!(
            retain_first_occurrence(paths, |path| path.as_path()),
            [PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]
        );
    }
}
