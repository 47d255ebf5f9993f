//! Root-confined view of the filesystem.
//!
//! Every operation goes through [`PathSandbox::resolve`] first, so a path that
//! lands outside the root is rejected before anything touches the disk.

use crate::constants::CHUNK_SIZE;
use crate::core_error::{FtpError, FtpResult};
use crate::core_log::logger;
use crate::core_sandbox::listing::ListEntry;
use crate::core_sandbox::transfer::{FileChunks, TransferType};
use log::debug;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

#[derive(Debug, Clone)]
pub struct PathSandbox {
    root: PathBuf,
    current_dir: PathBuf,
}

impl PathSandbox {
    pub fn new(root: impl AsRef<Path>) -> FtpResult<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(FtpError::NotADirectory(root.display().to_string()));
        }

        Ok(Self {
            current_dir: root.clone(),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Working directory as the client sees it, e.g. `/` or `/sub/dir`.
    pub fn pwd(&self) -> String {
        self.display_path(&self.current_dir)
    }

    /// Sandbox-relative, `/`-separated form of a path under the root.
    pub fn display_path(&self, path: &Path) -> String {
        let relative = match path.strip_prefix(&self.root) {
            Ok(relative) => relative,
            Err(_) => return "/".to_string(),
        };

        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        format!("/{}", parts.join("/"))
    }

    fn base_for(&self, path: &str) -> &Path {
        if path.starts_with('/') {
            &self.root
        } else {
            &self.current_dir
        }
    }

    /// Resolves a client path to a canonical absolute path inside the root.
    ///
    /// A leading `/` is anchored at the root, anything else at the working
    /// directory. Existing prefixes are followed to their real location, a
    /// missing tail is appended as written.
    pub fn resolve(&self, path: &str) -> FtpResult<PathBuf> {
        let base = self.base_for(path);
        let relative = Path::new(path.trim_start_matches('/'));
        let resolved = soft_canonicalize(base, relative)?;

        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(FtpError::SecurityViolation(format!(
                "{} -> {}",
                path,
                resolved.display()
            )))
        }
    }

    pub fn change_dir(&mut self, path: &str) -> FtpResult<()> {
        let target = self.resolve(path)?;
        if !target.exists() {
            return Err(FtpError::NotFound(path.to_string()));
        }
        if !target.is_dir() {
            return Err(FtpError::NotADirectory(path.to_string()));
        }

        debug!("Working directory {} -> {}", self.pwd(), self.display_path(&target));
        self.current_dir = target;
        Ok(())
    }

    pub fn change_dir_up(&mut self) -> FtpResult<()> {
        let parent = self
            .current_dir
            .parent()
            .ok_or_else(|| FtpError::SecurityViolation("..".to_string()))?
            .canonicalize()
            .map_err(|_| FtpError::NotFound("..".to_string()))?;

        if !parent.starts_with(&self.root) {
            return Err(FtpError::SecurityViolation(format!(
                ".. -> {}",
                parent.display()
            )));
        }

        self.current_dir = parent;
        Ok(())
    }

    /// Creates the directory and any missing parents. Returns the
    /// sandbox-relative path that was created.
    pub fn make_dir(&self, path: &str) -> FtpResult<String> {
        let target = self.resolve(path)?;
        if fs::symlink_metadata(&target).is_ok() {
            return Err(FtpError::AlreadyExists(path.to_string()));
        }

        fs::create_dir_all(&target)?;
        Ok(self.display_path(&target))
    }

    pub fn remove_dir(&self, path: &str) -> FtpResult<()> {
        let target = self.resolve(path)?;
        if target == self.root {
            return Err(FtpError::PermissionDenied(path.to_string()));
        }
        if !target.exists() {
            return Err(FtpError::NotFound(path.to_string()));
        }
        if !target.is_dir() {
            return Err(FtpError::NotADirectory(path.to_string()));
        }
        if fs::read_dir(&target)?.next().is_some() {
            return Err(FtpError::DirectoryNotEmpty(path.to_string()));
        }

        fs::remove_dir(&target)?;
        Ok(())
    }

    pub fn remove_file(&self, path: &str) -> FtpResult<()> {
        let target = self.resolve(path)?;
        if !target.exists() {
            return Err(FtpError::NotFound(path.to_string()));
        }
        if !target.is_file() {
            return Err(FtpError::NotAFile(path.to_string()));
        }

        fs::remove_file(&target)?;
        Ok(())
    }

    pub fn file_size(&self, path: &str) -> FtpResult<u64> {
        let target = self.resolve(path)?;
        let metadata = fs::metadata(&target).map_err(|_| FtpError::NotFound(path.to_string()))?;
        if !metadata.is_file() {
            return Err(FtpError::NotAFile(path.to_string()));
        }
        Ok(metadata.len())
    }

    /// First half of a rename: the canonical source, to be held by the
    /// session until RNTO.
    pub fn rename_from(&self, path: &str) -> FtpResult<PathBuf> {
        let source = self.resolve(path)?;
        if source == self.root {
            return Err(FtpError::PermissionDenied(path.to_string()));
        }
        if fs::symlink_metadata(&source).is_err() {
            return Err(FtpError::NotFound(path.to_string()));
        }
        Ok(source)
    }

    /// Second half of a rename. Returns the sandbox-relative destination.
    pub fn rename_to(&self, source: &Path, path: &str) -> FtpResult<String> {
        let destination = self.resolve(path)?;
        if !source.starts_with(&self.root) {
            return Err(FtpError::SecurityViolation(source.display().to_string()));
        }
        if fs::symlink_metadata(source).is_err() {
            return Err(FtpError::NotFound(self.display_path(source)));
        }

        fs::rename(source, &destination)?;
        Ok(self.display_path(&destination))
    }

    /// Lists a directory, a single file, or the matches of a glob pattern.
    ///
    /// Matches that resolve outside the root (symlinks, `..` inside a
    /// pattern) are dropped. Entries come back sorted by name.
    pub fn list(&self, path: Option<&str>) -> FtpResult<Vec<ListEntry>> {
        let path = path.unwrap_or("");
        let target = self.resolve(path)?;

        let candidates: Vec<PathBuf> = if target.is_dir() {
            fs::read_dir(&target)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<io::Result<_>>()?
        } else if target.exists() {
            vec![target]
        } else {
            self.glob_matches(path)?
        };

        let mut entries = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !self.is_contained(&candidate) {
                continue;
            }
            match ListEntry::from_path(&candidate) {
                Ok(entry) => entries.push(entry),
                Err(e) => debug!("Skipping {}: {}", candidate.display(), e),
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn glob_matches(&self, path: &str) -> FtpResult<Vec<PathBuf>> {
        let mut pattern = glob::Pattern::escape(&self.base_for(path).to_string_lossy());
        if !pattern.ends_with('/') {
            pattern.push('/');
        }
        pattern.push_str(path.trim_start_matches('/'));

        let matches = glob::glob(&pattern).map_err(|e| {
            debug!("Invalid glob pattern {:?}: {}", path, e);
            FtpError::NotFound(path.to_string())
        })?;
        Ok(matches.filter_map(Result::ok).collect())
    }

    /// Re-resolves a listing candidate and checks it still sits under the root.
    fn is_contained(&self, candidate: &Path) -> bool {
        match candidate.canonicalize() {
            Ok(real) if real.starts_with(&self.root) => true,
            Ok(real) => {
                logger::critical(format!(
                    "Dropped listing entry {} resolving outside the sandbox to {}",
                    candidate.display(),
                    real.display()
                ));
                false
            }
            Err(e) => {
                // dangling symlink: check where it would point
                let escapes = candidate
                    .parent()
                    .zip(candidate.file_name())
                    .and_then(|(dir, name)| soft_canonicalize(dir, Path::new(name)).ok())
                    .map_or(false, |target| !target.starts_with(&self.root));
                if escapes {
                    logger::critical(format!(
                        "Dropped dangling listing entry {} pointing outside the sandbox",
                        candidate.display()
                    ));
                } else {
                    debug!("Dropped unresolvable entry {}: {}", candidate.display(), e);
                }
                false
            }
        }
    }

    pub async fn read(&self, path: &str, transfer_type: TransferType) -> FtpResult<FileChunks> {
        let target = self.resolve(path)?;
        let metadata = fs::metadata(&target).map_err(|_| FtpError::NotFound(path.to_string()))?;
        if !metadata.is_file() {
            return Err(FtpError::NotAFile(path.to_string()));
        }

        let file = File::open(&target).await?;
        Ok(FileChunks::new(file, transfer_type))
    }

    /// Resolves an upload target and checks it can hold a regular file.
    pub fn resolve_for_write(&self, path: &str) -> FtpResult<PathBuf> {
        let target = self.resolve(path)?;
        if target.is_dir() {
            return Err(FtpError::NotAFile(path.to_string()));
        }
        match target.parent() {
            Some(parent) if parent.is_dir() => Ok(target),
            _ => Err(FtpError::NotFound(path.to_string())),
        }
    }

    /// Streams `source` into a new or truncated file at `target`, chunk by
    /// chunk. Whatever arrived before a failure stays on disk.
    pub async fn write<R>(&self, target: &Path, source: &mut R) -> FtpResult<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        if !target.starts_with(&self.root) {
            return Err(FtpError::SecurityViolation(target.display().to_string()));
        }

        let mut file = File::create(target).await?;
        let mut buffer = vec![0; CHUNK_SIZE];
        let mut written = 0u64;

        loop {
            let bytes_read = source.read(&mut buffer).await.map_err(FtpError::Transfer)?;
            if bytes_read == 0 {
                break;
            }
            file.write_all(&buffer[..bytes_read]).await?;
            written += bytes_read as u64;
        }

        file.flush().await?;
        Ok(written)
    }
}

/// `base` joined with `relative`, with `.`/`..` eliminated and every existing
/// prefix replaced by its canonical form. Components that don't exist yet are
/// kept as written. Dangling symlinks are followed lexically so their target
/// is what gets checked against the root.
fn soft_canonicalize(base: &Path, relative: &Path) -> io::Result<PathBuf> {
    let mut resolved = base.to_path_buf();

    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::RootDir | Component::Prefix(_) => {
                resolved = PathBuf::from(component.as_os_str());
            }
            Component::Normal(part) => {
                resolved.push(part);
                match fs::canonicalize(&resolved) {
                    Ok(real) => resolved = real,
                    Err(_) => {
                        let is_link = fs::symlink_metadata(&resolved)
                            .map(|m| m.file_type().is_symlink())
                            .unwrap_or(false);
                        if is_link {
                            let target = fs::read_link(&resolved)?;
                            resolved.pop();
                            resolved = lexical_join(&resolved, &target);
                        }
                    }
                }
            }
        }
    }

    Ok(resolved)
}

fn lexical_join(base: &Path, path: &Path) -> PathBuf {
    let mut joined = base.to_path_buf();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                joined.pop();
            }
            Component::RootDir | Component::Prefix(_) => {
                joined = PathBuf::from(component.as_os_str());
            }
            Component::Normal(part) => joined.push(part),
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sandbox() -> (TempDir, PathSandbox) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub/inner")).unwrap();
        fs::write(dir.path().join("a.txt"), b"alpha").unwrap();
        fs::write(dir.path().join("b.txt"), b"bravo").unwrap();
        fs::write(dir.path().join("notes.md"), b"# notes").unwrap();
        fs::write(dir.path().join("sub/c.txt"), b"charlie").unwrap();
        let sandbox = PathSandbox::new(dir.path()).unwrap();
        (dir, sandbox)
    }

    fn names(entries: &[ListEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_parent_traversal_is_rejected_everywhere() {
        let (_dir, mut sandbox) = sandbox();
        for start in ["/", "sub", "inner"] {
            if start != "/" {
                sandbox.change_dir(start).unwrap();
            }
            for path in [
                "../../../etc/passwd",
                "../../../../../../etc",
                "/../x",
                "sub/../../../../y",
            ] {
                let result = sandbox.resolve(path);
                assert!(
                    matches!(result, Err(FtpError::SecurityViolation(_))),
                    "{} from {} resolved to {:?}",
                    path,
                    sandbox.pwd(),
                    result
                );
            }
            assert!(sandbox.current_dir().starts_with(sandbox.root()));
        }
    }

    #[test]
    fn test_absolute_paths_anchor_at_root() {
        let (dir, mut sandbox) = sandbox();
        sandbox.change_dir("sub").unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(sandbox.resolve("/a.txt").unwrap(), root.join("a.txt"));
        assert_eq!(sandbox.resolve("c.txt").unwrap(), root.join("sub/c.txt"));
        assert_eq!(sandbox.resolve("/").unwrap(), root);
        assert_eq!(sandbox.resolve("..").unwrap(), root);
        assert_eq!(sandbox.resolve("./inner/../c.txt").unwrap(), root.join("sub/c.txt"));
    }

    #[test]
    fn test_missing_tail_resolves_lexically() {
        let (dir, sandbox) = sandbox();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(sandbox.resolve("new/deeper").unwrap(), root.join("new/deeper"));
        assert_eq!(sandbox.resolve("new/../sub").unwrap(), root.join("sub"));
    }

    #[test]
    fn test_cwd_then_cdup_restores_pwd() {
        let (_dir, mut sandbox) = sandbox();
        assert_eq!(sandbox.pwd(), "/");
        sandbox.change_dir("sub").unwrap();
        assert_eq!(sandbox.pwd(), "/sub");
        sandbox.change_dir("inner").unwrap();
        assert_eq!(sandbox.pwd(), "/sub/inner");
        sandbox.change_dir_up().unwrap();
        assert_eq!(sandbox.pwd(), "/sub");
        sandbox.change_dir_up().unwrap();
        assert_eq!(sandbox.pwd(), "/");
    }

    #[test]
    fn test_cdup_at_root_is_rejected() {
        let (_dir, mut sandbox) = sandbox();
        assert!(matches!(
            sandbox.change_dir_up(),
            Err(FtpError::SecurityViolation(_))
        ));
        assert_eq!(sandbox.pwd(), "/");
    }

    #[test]
    fn test_cwd_errors() {
        let (_dir, mut sandbox) = sandbox();
        assert!(matches!(sandbox.change_dir("missing"), Err(FtpError::NotFound(_))));
        assert!(matches!(sandbox.change_dir("a.txt"), Err(FtpError::NotADirectory(_))));
        assert!(matches!(sandbox.change_dir(".."), Err(FtpError::SecurityViolation(_))));
        assert_eq!(sandbox.pwd(), "/");
    }

    #[test]
    fn test_make_and_remove_dir() {
        let (dir, sandbox) = sandbox();
        assert_eq!(sandbox.make_dir("x/y/z").unwrap(), "/x/y/z");
        assert!(dir.path().join("x/y/z").is_dir());
        assert!(matches!(sandbox.make_dir("x/y"), Err(FtpError::AlreadyExists(_))));

        assert!(matches!(sandbox.remove_dir("x"), Err(FtpError::DirectoryNotEmpty(_))));
        sandbox.remove_dir("x/y/z").unwrap();
        assert!(!dir.path().join("x/y/z").exists());

        assert!(matches!(sandbox.remove_dir("a.txt"), Err(FtpError::NotADirectory(_))));
        assert!(matches!(sandbox.remove_dir("nope"), Err(FtpError::NotFound(_))));
        assert!(matches!(sandbox.remove_dir("/"), Err(FtpError::PermissionDenied(_))));
    }

    #[test]
    fn test_remove_file_and_size() {
        let (dir, sandbox) = sandbox();
        assert_eq!(sandbox.file_size("a.txt").unwrap(), 5);
        assert!(matches!(sandbox.file_size("sub"), Err(FtpError::NotAFile(_))));
        assert!(matches!(sandbox.file_size("ghost"), Err(FtpError::NotFound(_))));

        assert!(matches!(sandbox.remove_file("sub"), Err(FtpError::NotAFile(_))));
        sandbox.remove_file("a.txt").unwrap();
        assert!(!dir.path().join("a.txt").exists());
        assert!(matches!(sandbox.remove_file("a.txt"), Err(FtpError::NotFound(_))));
    }

    #[test]
    fn test_two_phase_rename() {
        let (dir, sandbox) = sandbox();
        let source = sandbox.rename_from("a.txt").unwrap();
        assert_eq!(sandbox.rename_to(&source, "sub/renamed.txt").unwrap(), "/sub/renamed.txt");
        assert!(dir.path().join("sub/renamed.txt").is_file());
        assert!(!dir.path().join("a.txt").exists());

        assert!(matches!(sandbox.rename_from("a.txt"), Err(FtpError::NotFound(_))));
        assert!(matches!(
            sandbox.rename_from("../outside"),
            Err(FtpError::SecurityViolation(_))
        ));
        let source = sandbox.rename_from("b.txt").unwrap();
        assert!(matches!(
            sandbox.rename_to(&source, "../../b.txt"),
            Err(FtpError::SecurityViolation(_))
        ));
        assert!(dir.path().join("b.txt").exists());
    }

    #[test]
    fn test_list_directory_sorted() {
        let (_dir, sandbox) = sandbox();
        let entries = sandbox.list(None).unwrap();
        assert_eq!(names(&entries), vec!["a.txt", "b.txt", "notes.md", "sub"]);
        assert!(entries[3].is_dir);

        let entries = sandbox.list(Some("sub")).unwrap();
        assert_eq!(names(&entries), vec!["c.txt", "inner"]);
    }

    #[test]
    fn test_list_single_file_and_glob() {
        let (_dir, mut sandbox) = sandbox();
        let entries = sandbox.list(Some("notes.md")).unwrap();
        assert_eq!(names(&entries), vec!["notes.md"]);

        let entries = sandbox.list(Some("*.txt")).unwrap();
        assert_eq!(names(&entries), vec!["a.txt", "b.txt"]);

        sandbox.change_dir("sub").unwrap();
        let entries = sandbox.list(Some("/*.md")).unwrap();
        assert_eq!(names(&entries), vec!["notes.md"]);

        assert!(sandbox.list(Some("nothing*")).unwrap().is_empty());
        assert!(matches!(
            sandbox.list(Some("../../*")),
            Err(FtpError::SecurityViolation(_))
        ));
    }

    #[test]
    fn test_empty_directory_lists_nothing() {
        let (_dir, sandbox) = sandbox();
        sandbox.make_dir("empty").unwrap();
        assert!(sandbox.list(Some("empty")).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_cannot_escape() {
        use std::os::unix::fs::symlink;

        let (dir, mut sandbox) = sandbox();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret"), b"top secret").unwrap();
        symlink(outside.path(), dir.path().join("escape")).unwrap();
        symlink(outside.path().join("not-yet"), dir.path().join("dangling")).unwrap();
        symlink(dir.path().join("sub"), dir.path().join("inside")).unwrap();

        assert!(matches!(sandbox.change_dir("escape"), Err(FtpError::SecurityViolation(_))));
        assert!(matches!(
            sandbox.file_size("escape/secret"),
            Err(FtpError::SecurityViolation(_))
        ));
        assert!(matches!(sandbox.resolve("dangling"), Err(FtpError::SecurityViolation(_))));
        assert!(matches!(
            sandbox.resolve_for_write("dangling"),
            Err(FtpError::SecurityViolation(_))
        ));

        let listed = sandbox.list(None).unwrap();
        assert!(!names(&listed).contains(&"escape"));
        assert!(!names(&listed).contains(&"dangling"));
        assert!(names(&listed).contains(&"inside"));

        sandbox.change_dir("inside").unwrap();
        assert_eq!(sandbox.pwd(), "/sub");
    }

    #[tokio::test]
    async fn test_read_translates_only_in_ascii() {
        let (dir, sandbox) = sandbox();
        fs::write(dir.path().join("lines.txt"), b"one\ntwo\r\nthree\n").unwrap();

        let mut chunks = sandbox.read("lines.txt", TransferType::Image).await.unwrap();
        let mut image = Vec::new();
        while let Some(chunk) = chunks.next_chunk().await.unwrap() {
            image.extend(chunk);
        }
        assert_eq!(image, b"one\ntwo\r\nthree\n");

        let mut chunks = sandbox.read("lines.txt", TransferType::Ascii).await.unwrap();
        let mut ascii = Vec::new();
        while let Some(chunk) = chunks.next_chunk().await.unwrap() {
            ascii.extend(chunk);
        }
        assert_eq!(ascii, b"one\r\ntwo\r\nthree\r\n");

        assert!(matches!(
            sandbox.read("sub", TransferType::Image).await,
            Err(FtpError::NotAFile(_))
        ));
        assert!(matches!(
            sandbox.read("missing", TransferType::Image).await,
            Err(FtpError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_write_truncates_and_streams() {
        let (dir, sandbox) = sandbox();
        let target = sandbox.resolve_for_write("a.txt").unwrap();
        let payload: Vec<u8> = (0..(CHUNK_SIZE * 3 + 7)).map(|i| (i % 256) as u8).collect();
        let mut source: &[u8] = &payload;

        let written = sandbox.write(&target, &mut source).await.unwrap();
        assert_eq!(written, payload.len() as u64);
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), payload);

        assert!(matches!(sandbox.resolve_for_write("sub"), Err(FtpError::NotAFile(_))));
        assert!(matches!(
            sandbox.resolve_for_write("no/such/dir/file"),
            Err(FtpError::NotFound(_))
        ));
    }
}
