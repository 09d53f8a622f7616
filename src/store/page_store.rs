//! Title-addressed flat file storage

use chrono::{DateTime, Local};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::Page;
use crate::error::{Result, WikiError};
use crate::helpers;

const PAGE_EXT: &str = ".txt";
const BACKUP_EXT: &str = ".bak";

/// Reads and writes pages in a single directory
///
/// There is no locking. Concurrent requests on the same title race, and the
/// last write wins.
#[derive(Debug, Clone)]
pub struct PageStore {
    pages_dir: PathBuf,
}

impl PageStore {
    pub fn new<P: AsRef<Path>>(pages_dir: P) -> Self {
        Self {
            pages_dir: pages_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file backing a page
    pub fn page_path(&self, title: &str) -> PathBuf {
        self.pages_dir.join(format!("{}{}", title, PAGE_EXT))
    }

    /// Path of the backup taken at `now`
    pub fn backup_path(&self, title: &str, now: &DateTime<Local>) -> PathBuf {
        self.pages_dir
            .join(format!("{}{}{}", title, helpers::stamp(now), BACKUP_EXT))
    }

    /// Load a page. Any read failure is reported as not found.
    pub fn load(&self, title: &str) -> Result<Page> {
        let path = self.page_path(title);
        let body = fs::read(&path).map_err(|source| WikiError::NotFound { path, source })?;
        Page::new(title, body)
    }

    /// Write a page, replacing whatever was stored under its title
    pub fn save(&self, page: &Page) -> Result<()> {
        let path = self.page_path(page.title());
        write_private(&path, page.body()).map_err(|e| WikiError::io("write", &path, e))?;
        tracing::debug!("Saved {:?} ({} bytes)", path, page.body().len());
        Ok(())
    }

    /// Copy the current body of a page into a timestamped backup
    pub fn backup(&self, title: &str) -> Result<PathBuf> {
        self.backup_at(title, &Local::now())
    }

    /// Copy the current body of a page into the backup named for `now`
    pub fn backup_at(&self, title: &str, now: &DateTime<Local>) -> Result<PathBuf> {
        let page = self.load(title)?;
        let path = self.backup_path(title, now);
        write_private(&path, page.body()).map_err(|e| WikiError::io("write", &path, e))?;
        tracing::info!("Backed up {} to {:?}", title, path);
        Ok(path)
    }

    /// Back up a page, then remove it. Returns the backup path.
    ///
    /// Nothing is removed unless the backup succeeded. A failed removal leaves
    /// the backup in place.
    pub fn delete(&self, title: &str) -> Result<PathBuf> {
        self.delete_with(title, |path| fs::remove_file(path))
    }

    fn delete_with<F>(&self, title: &str, remove: F) -> Result<PathBuf>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        let backup = self.backup(title)?;
        let path = self.page_path(title);
        remove(&path).map_err(|e| WikiError::io("remove", &path, e))?;
        tracing::info!("Deleted {:?}", path);
        Ok(backup)
    }

    /// Titles of all stored pages, in directory order.
    ///
    /// An unreadable directory lists as empty.
    pub fn list(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.pages_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", self.pages_dir, e);
                return Vec::new();
            }
        };

        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter_map(|name| {
                name.strip_suffix(PAGE_EXT)
                    .filter(|title| !title.is_empty())
                    .map(str::to_string)
            })
            .collect()
    }

    /// Cache-busting reference to an image slot. The image need not exist.
    pub fn image_ref(title: &str, index: u8) -> String {
        helpers::image_url(title, index, &helpers::now_stamp())
    }
}

/// Create or truncate `path` and write `data`, owner read/write only
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store() -> (TempDir, PageStore) {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = store();
        let page = Page::new("T", b"line one\nline two".to_vec()).unwrap();
        store.save(&page).unwrap();

        let loaded = store.load("T").unwrap();
        assert_eq!(loaded.title(), "T");
        assert_eq!(loaded.body(), page.body());
        assert_eq!(loaded.image_refs().len(), page.image_refs().len());
        for (a, b) in loaded.image_refs().iter().zip(page.image_refs()) {
            assert_eq!(a.split('?').next(), b.split('?').next());
        }
    }

    #[test]
    fn test_save_overwrites() {
        let (_dir, store) = store();
        store.save(&Page::new("T", "a much longer body").unwrap()).unwrap();
        store.save(&Page::new("T", "short").unwrap()).unwrap();
        assert_eq!(store.load("T").unwrap().body(), b"short");
    }

    #[cfg(unix)]
    #[test]
    fn test_save_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = store();
        store.save(&Page::new("Secret", "x").unwrap()).unwrap();
        let mode = fs::metadata(store.page_path("Secret"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let (_dir, store) = store();
        let err = store.load("Ghost").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Ghost.txt"));
    }

    #[test]
    fn test_backup_name_and_content() {
        let (dir, store) = store();
        store.save(&Page::new("Home", "body").unwrap()).unwrap();

        let now = Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 5).unwrap();
        let path = store.backup_at("Home", &now).unwrap();
        assert_eq!(path, dir.path().join("Home2024_01_15_10_30_05.bak"));
        assert_eq!(fs::read(&path).unwrap(), b"body");
        assert!(store.page_path("Home").exists());
    }

    #[test]
    fn test_delete_backs_up_then_removes() {
        let (_dir, store) = store();
        store.save(&Page::new("Old", "keep me").unwrap()).unwrap();

        let backup = store.delete("Old").unwrap();
        assert!(!store.page_path("Old").exists());
        assert_eq!(fs::read(&backup).unwrap(), b"keep me");
        assert!(store.load("Old").unwrap_err().is_not_found());
    }

    #[test]
    fn test_failed_removal_keeps_backup() {
        let (dir, store) = store();
        store.save(&Page::new("Stuck", "still here").unwrap()).unwrap();

        let err = store
            .delete_with("Stuck", |_| {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            })
            .unwrap_err();
        assert!(matches!(err, WikiError::Io { op: "remove", .. }));
        assert!(err.to_string().ends_with("Stuck.txt: denied"));

        assert_eq!(store.load("Stuck").unwrap().body(), b"still here");
        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|name| name.starts_with("Stuck") && name.ends_with(".bak"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read(dir.path().join(&backups[0])).unwrap(), b"still here");
    }

    #[test]
    fn test_delete_missing_page_touches_nothing() {
        let (dir, store) = store();
        store.save(&Page::new("Other", "x").unwrap()).unwrap();

        let err = store.delete("Ghost").unwrap_err();
        assert!(err.is_not_found());

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["Other.txt".to_string()]);
    }

    #[test]
    fn test_list() {
        let (dir, store) = store();
        store.save(&Page::new("Alpha", "a").unwrap()).unwrap();
        store.save(&Page::new("Beta", "b").unwrap()).unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        fs::write(dir.path().join("Alpha2024_01_15_10_30_05.bak"), "a").unwrap();

        let mut titles = store.list();
        titles.sort();
        assert_eq!(titles, vec!["Alpha", "Beta"]);

        let mut again = store.list();
        again.sort();
        assert_eq!(titles, again);
    }

    #[test]
    fn test_list_unreadable_dir_is_empty() {
        let store = PageStore::new("/nonexistent/flatwiki/pages");
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_image_ref() {
        let r = PageStore::image_ref("Home", 4);
        assert!(r.starts_with("/images/HomeImage4.jpg?"));
    }
}
