use std::path::{Component, Path, PathBuf};

use crate::mask::MaskPipeline;
use crate::{Error, Result, VaultConfig};

/// A normalized, vault-relative note path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VaultPath(PathBuf);

impl VaultPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn as_str_lossy(&self) -> String {
        self.0.to_string_lossy().to_string()
    }

    /// Canonical `/`-separated form used for link comparisons.
    pub fn to_slash(&self) -> String {
        self.0
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// `/`-separated path with the file extension dropped.
    pub fn without_extension(&self) -> String {
        VaultPath(self.0.with_extension("")).to_slash()
    }

    /// File name without extension; this is the note's title.
    pub fn stem(&self) -> String {
        self.0
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

impl TryFrom<&Path> for VaultPath {
    type Error = Error;

    /// Drops `.` segments; rejects empty, rooted and `..` paths.
    fn try_from(value: &Path) -> Result<Self> {
        let invalid = |reason: &str| {
            Error::InvalidVaultPath(format!("{reason}: {}", value.display()))
        };
        let mut cleaned = PathBuf::new();
        for component in value.components() {
            match component {
                Component::Normal(segment) => cleaned.push(segment),
                Component::CurDir => {}
                Component::ParentDir => return Err(invalid("leaves the vault")),
                Component::RootDir | Component::Prefix(_) => return Err(invalid("not relative")),
            }
        }
        if cleaned.as_os_str().is_empty() {
            return Err(invalid("empty note path"));
        }
        Ok(Self(cleaned))
    }
}

impl TryFrom<&str> for VaultPath {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        VaultPath::try_from(Path::new(value))
    }
}

#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    cfg: VaultConfig,
    pipeline: MaskPipeline,
}

impl Vault {
    /// Opens a vault, reading `.vaultkit.toml` from its root when present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let vault = Self::with_config(root, VaultConfig::default())?;
        let cfg = VaultConfig::load(&vault.root)?;
        Ok(Self { cfg, ..vault })
    }

    /// Opens a vault with an explicit config; the root is canonicalized.
    pub fn with_config(root: impl Into<PathBuf>, cfg: VaultConfig) -> Result<Self> {
        let root = root.into();
        let canonical = std::fs::canonicalize(&root).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => Error::VaultNotFound(root.clone()),
            _ => Error::io(&root, err),
        })?;
        Ok(Self {
            root: canonical,
            cfg,
            pipeline: MaskPipeline::standard(),
        })
    }

    /// Replaces the masking pipeline used by every vault-wide scan.
    pub fn with_pipeline(mut self, pipeline: MaskPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn pipeline(&self) -> &MaskPipeline {
        &self.pipeline
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &VaultConfig {
        &self.cfg
    }

    pub fn to_abs(&self, rel: &VaultPath) -> PathBuf {
        self.root.join(rel.as_path())
    }

    /// Maps a path on disk (absolute, or relative to the root) back to a
    /// vault path. Symlinks are resolved when the path exists.
    pub fn to_rel(&self, path: &Path) -> Result<VaultPath> {
        let joined = self.root.join(path);
        let resolved = std::fs::canonicalize(&joined).unwrap_or(joined);
        match resolved.strip_prefix(&self.root) {
            Ok(rel) => VaultPath::try_from(rel),
            Err(_) => Err(Error::PathOutsideVault(resolved)),
        }
    }

    /// The one exclusion rule every traversal shares: hidden directories and
    /// the trash directory, at any depth.
    pub fn is_excluded_dir_name(&self, name: &str) -> bool {
        (self.cfg.skip_hidden && name.starts_with('.')) || name == self.cfg.trash_dir
    }

    /// True when `rel` names a note file that no traversal would skip.
    pub fn is_note_rel(&self, rel: &Path) -> bool {
        let has_note_ext = rel
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext == self.cfg.note_extension);
        if !has_note_ext {
            return false;
        }
        let Some(parent) = rel.parent() else {
            return true;
        };
        !parent.components().any(|c| {
            let Component::Normal(part) = c else {
                return false;
            };
            self.is_excluded_dir_name(&part.to_string_lossy())
        })
    }

    /// Every note in the vault, in sorted traversal order.
    pub fn notes(&self) -> Result<Vec<VaultPath>> {
        let mut out = Vec::new();
        let walker = walkdir::WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !self.is_excluded_dir_name(&e.file_name().to_string_lossy())
            });

        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone());
                Error::io(path, err.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if !self.is_note_rel(rel) {
                continue;
            }
            out.push(VaultPath::try_from(rel)?);
        }
        Ok(out)
    }

    pub fn read_note(&self, rel: &VaultPath) -> Result<String> {
        let abs = self.to_abs(rel);
        std::fs::read_to_string(&abs).map_err(|e| Error::io(&abs, e))
    }

    pub fn write_note(&self, rel: &VaultPath, content: &str) -> Result<()> {
        let abs = self.to_abs(rel);
        std::fs::write(&abs, content).map_err(|e| Error::io(&abs, e))
    }
}
