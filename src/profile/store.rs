//! # Profile Store
//!
//! Locates the profiles directory and loads or lists the profiles in it.
//!
//! ## Directory Resolution
//!
//! 1. `--profiles-dir` on the command line
//! 2. `profiles_dir` in the user config
//! 3. `./profiles` when it exists
//! 4. `~/.config/mirrordash/profiles`

use super::error::ProfileError;
use super::schema::Profile;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension of profile files.
pub const PROFILE_EXTENSION: &str = "toml";

/// One line of `--list` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    /// File stem, the value passed to `--profile`.
    pub stem: String,
    pub name: String,
    pub description: String,
}

/// A directory of `<name>.toml` profiles.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Pick the profiles directory from the explicit override, the configured
    /// directory, the working directory, or the platform config directory.
    pub fn resolve(explicit: Option<&Path>, configured: Option<&Path>) -> Self {
        if let Some(dir) = explicit.or(configured) {
            return Self::new(dir);
        }
        let local = PathBuf::from("profiles");
        if local.is_dir() {
            return Self::new(local);
        }
        let dir = directories::ProjectDirs::from("", "", "mirrordash")
            .map(|dirs| dirs.config_dir().join("profiles"))
            .unwrap_or(local);
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a profile with the given name would live at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{PROFILE_EXTENSION}"))
    }

    /// Load and validate the named profile.
    pub fn load(&self, name: &str) -> Result<Profile, ProfileError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(ProfileError::NotFound {
                name: name.to_string(),
                available: self.available(),
            });
        }
        let text = fs::read_to_string(&path).map_err(|source| ProfileError::Read {
            path: path.clone(),
            source,
        })?;
        let profile = Profile::from_toml(&text, &path)?;
        tracing::info!(profile = name, path = %path.display(), "loaded profile");
        Ok(profile)
    }

    /// Stems of every profile file, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut stems: Vec<String> = self
            .profile_paths()
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect();
        stems.sort();
        stems
    }

    /// Summaries of every profile, sorted by stem. Profiles that fail to load
    /// are still listed, with empty name and description.
    pub fn list(&self) -> Vec<ProfileSummary> {
        self.available()
            .into_iter()
            .map(|stem| match self.load(&stem) {
                Ok(profile) => ProfileSummary {
                    stem,
                    name: profile.name,
                    description: profile.description,
                },
                Err(e) => {
                    tracing::warn!(profile = %stem, error = %e, "skipping unreadable profile");
                    ProfileSummary {
                        stem,
                        name: String::new(),
                        description: String::new(),
                    }
                }
            })
            .collect()
    }

    fn profile_paths(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(PROFILE_EXTENSION))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, contents: &str) {
        fs::write(dir.join(file), contents).expect("write profile");
    }

    #[test]
    fn test_load_existing_profile() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write(
            temp_dir.path(),
            "work.toml",
            "name = \"Work\"\nmodules = [\"focus\"]\n",
        );

        let store = ProfileStore::new(temp_dir.path());
        let profile = store.load("work").expect("load");
        assert_eq!(profile.name, "Work");
        assert_eq!(profile.modules, vec!["focus"]);
    }

    #[test]
    fn test_missing_profile_lists_available() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write(temp_dir.path(), "b.toml", "");
        write(temp_dir.path(), "a.toml", "");
        write(temp_dir.path(), "notes.txt", "not a profile");

        let store = ProfileStore::new(temp_dir.path());
        match store.load("missing") {
            Err(ProfileError::NotFound { name, available }) => {
                assert_eq!(name, "missing");
                assert_eq!(available, vec!["a", "b"]);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_list_includes_broken_profiles() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write(
            temp_dir.path(),
            "good.toml",
            "name = \"Good\"\ndescription = \"works\"\n",
        );
        write(temp_dir.path(), "bad.toml", "refresh = -1\n");

        let store = ProfileStore::new(temp_dir.path());
        let list = store.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].stem, "bad");
        assert!(list[0].name.is_empty());
        assert_eq!(list[1].name, "Good");
        assert_eq!(list[1].description, "works");
    }

    #[test]
    fn test_nested_directories_are_ignored() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let nested = temp_dir.path().join("archive");
        fs::create_dir_all(&nested).expect("mkdir");
        write(&nested, "old.toml", "");

        let store = ProfileStore::new(temp_dir.path());
        assert!(store.available().is_empty());
    }

    #[test]
    fn test_missing_directory_has_no_profiles() {
        let store = ProfileStore::new("/nonexistent/mirrordash/profiles");
        assert!(store.available().is_empty());
        assert!(matches!(
            store.load("default"),
            Err(ProfileError::NotFound { .. })
        ));
    }

    #[test]
    fn test_explicit_dir_wins() {
        let store = ProfileStore::resolve(Some(Path::new("/a")), Some(Path::new("/b")));
        assert_eq!(store.dir(), Path::new("/a"));
        let store = ProfileStore::resolve(None, Some(Path::new("/b")));
        assert_eq!(store.dir(), Path::new("/b"));
    }
}
