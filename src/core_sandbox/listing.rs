use chrono::{DateTime, Local};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// One line of a LIST/NLST reply.
#[derive(Debug, Clone)]
pub struct ListEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub mode: u32,
    pub modified: SystemTime,
}

impl ListEntry {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(Self {
            name,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            mode: mode_bits(&metadata),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        })
    }

    /// `PERM 1 user group SIZE MON DD HH:MM NAME`
    pub fn to_list_line(&self) -> String {
        let modified: DateTime<Local> = self.modified.into();
        format!(
            "{} 1 user group {:>8} {} {}",
            permission_string(self.is_dir, self.mode),
            self.size,
            modified.format("%b %d %H:%M"),
            self.name
        )
    }
}

/// Renders the data-connection payload for LIST (long form) or NLST.
pub fn format_listing(entries: &[ListEntry], names_only: bool) -> String {
    let mut listing = String::new();
    for entry in entries {
        if names_only {
            listing.push_str(&entry.name);
        } else {
            listing.push_str(&entry.to_list_line());
        }
        listing.push_str("\r\n");
    }
    listing
}

pub fn permission_string(is_dir: bool, mode: u32) -> String {
    let mut perms = String::with_capacity(10);
    perms.push(if is_dir { 'd' } else { '-' });
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        perms.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        perms.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        perms.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    perms
}

#[cfg(unix)]
fn mode_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(metadata: &Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}
