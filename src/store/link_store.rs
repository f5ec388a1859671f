use crate::invite::InviteLink;
use crate::store::{StoreError, StoreResult};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Link file used when none is given
pub const DEFAULT_OUTPUT_PATH: &str = "invite_link.txt";

/// Store handle shared between the worker and a reader such as a UI
pub type SharedLinkStore = Arc<Mutex<LinkStore>>;

/// The deduplicated set of discovered invite links
///
/// Backed by a UTF-8 text file with one link per line. The in-memory set is
/// ordered, so persisting always writes the links sorted ascending.
#[derive(Debug, Clone)]
pub struct LinkStore {
    path: PathBuf,
    links: BTreeSet<InviteLink>,
}

impl LinkStore {
    /// Creates an empty store backed by `path` without reading it
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            links: BTreeSet::new(),
        }
    }

    /// Loads the store from its backing file
    ///
    /// Lines that are empty or do not start with `http` are skipped. A
    /// missing or unreadable file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);

        match std::fs::read_to_string(&store.path) {
            Ok(content) => {
                store.links = content.lines().filter_map(InviteLink::from_persisted).collect();
                tracing::info!(
                    "Loaded {} existing links from {}",
                    store.links.len(),
                    store.path.display()
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No existing file at {}, starting fresh", store.path.display());
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read {}, starting fresh: {}",
                    store.path.display(),
                    e
                );
            }
        }

        store
    }

    /// Merges links into the store
    ///
    /// # Returns
    ///
    /// The links that were not already present, in sorted order
    pub fn merge<I>(&mut self, links: I) -> BTreeSet<InviteLink>
    where
        I: IntoIterator<Item = InviteLink>,
    {
        let mut fresh = BTreeSet::new();
        for link in links {
            if !self.links.contains(&link) {
                fresh.insert(link.clone());
                self.links.insert(link);
            }
        }
        fresh
    }

    /// Writes the full set to the backing file
    ///
    /// The content goes to a temporary file in the same directory which is
    /// then renamed over the target, so readers see the old or the new file
    /// and never a partial one.
    pub fn persist(&self) -> StoreResult<()> {
        let mut content = String::with_capacity(self.links.len() * 32);
        for link in &self.links {
            content.push_str(link.as_str());
            content.push('\n');
        }

        let tmp_path = self.temp_path();
        std::fs::write(&tmp_path, content).map_err(|source| StoreError::Write {
            path: tmp_path.display().to_string(),
            source,
        })?;

        std::fs::rename(&tmp_path, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp_path);
            StoreError::Rename {
                path: self.path.display().to_string(),
                source,
            }
        })?;

        tracing::debug!("Persisted {} links to {}", self.links.len(), self.path.display());
        Ok(())
    }

    /// Returns true if the link is already stored
    pub fn contains(&self, link: &InviteLink) -> bool {
        self.links.contains(link)
    }

    /// Returns the number of stored links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if the store holds no links
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterates the stored links in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &InviteLink> {
        self.links.iter()
    }

    /// Returns the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wraps the store for sharing with a reader
    pub fn into_shared(self) -> SharedLinkStore {
        Arc::new(Mutex::new(self))
    }

    fn temp_path(&self) -> PathBuf {
        let tmp_name = format!(
            ".{}.tmp-{}",
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(DEFAULT_OUTPUT_PATH),
            std::process::id()
        );
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(tmp_name),
            _ => PathBuf::from(tmp_name),
        }
    }
}
