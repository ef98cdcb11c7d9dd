//! Package metadata providers.
//!
//! A [`PackageProvider`] supplies every available [`PackageNode`] for one run.
//! The [`FilesystemProvider`] reads the root manifest plus one manifest per
//! installed package under the vendor directory:
//!
//! ```text
//! project/
//! ├── confmerge.toml            ← root package
//! └── vendor/
//!     ├── acme/lib-a/
//!     │   └── confmerge.toml    ← complete package
//!     └── acme/legacy/          ← no manifest: incomplete package
//! ```

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::MANIFEST_FILE;
use crate::core::ConfmergeError;
use crate::manifest::Manifest;
use crate::package::PackageNode;

/// Source of the package graph.
pub trait PackageProvider {
    /// All available packages: root first, installed packages sorted by name.
    fn packages(&self) -> Result<Vec<PackageNode>>;
}

/// Loads packages from `<vendor-dir>/<vendor>/<name>/confmerge.toml`.
#[derive(Debug, Clone)]
pub struct FilesystemProvider {
    root: Manifest,
    vendor_dir: PathBuf,
}

impl FilesystemProvider {
    /// Create a provider for an already loaded root manifest.
    pub fn new(root: Manifest, vendor_dir: impl Into<PathBuf>) -> Self {
        Self {
            root,
            vendor_dir: vendor_dir.into(),
        }
    }

    fn installed(&self) -> Result<Vec<PackageNode>> {
        if !self.vendor_dir.is_dir() {
            tracing::debug!("No vendor directory at {}", self.vendor_dir.display());
            return Ok(Vec::new());
        }

        let mut packages = Vec::new();
        for entry in WalkDir::new(&self.vendor_dir)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| {
                format!("Failed to scan vendor directory: {}", self.vendor_dir.display())
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }

            packages.push(self.load_installed(entry.path())?);
        }

        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(packages)
    }

    fn load_installed(&self, dir: &Path) -> Result<PackageNode> {
        let manifest_path = dir.join(MANIFEST_FILE);
        if manifest_path.is_file() {
            let manifest = Manifest::load(&manifest_path)?;
            let node = manifest.into_node(false)?;
            tracing::trace!("Loaded package {} from {}", node.name, dir.display());
            return Ok(node);
        }

        let name = dir
            .strip_prefix(&self.vendor_dir)
            .unwrap_or(dir)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        tracing::debug!("Package {name} has no {MANIFEST_FILE}; treating it as incomplete");
        Ok(PackageNode::new(name, dir).incomplete())
    }
}

impl PackageProvider for FilesystemProvider {
    fn packages(&self) -> Result<Vec<PackageNode>> {
        let root = self.root.clone().into_node(true)?;
        let mut packages = vec![root];
        packages.extend(self.installed()?);

        let mut names = HashSet::new();
        for package in &packages {
            if !names.insert(package.name.as_str()) {
                return Err(ConfmergeError::ManifestValidationError {
                    reason: format!("package name '{}' is declared more than once", package.name),
                }
                .into());
            }
        }

        tracing::debug!("Loaded {} packages", packages.len());
        Ok(packages)
    }
}

/// In-memory provider, useful when the graph comes from another tool.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    packages: Vec<PackageNode>,
}

impl StaticProvider {
    /// Wrap a prepared package list.
    pub fn new(packages: Vec<PackageNode>) -> Self {
        Self {
            packages,
        }
    }
}

impl PackageProvider for StaticProvider {
    fn packages(&self) -> Result<Vec<PackageNode>> {
        Ok(self.packages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn root_manifest(dir: &Path) -> Manifest {
        let path = dir.join(MANIFEST_FILE);
        write(
            &path,
            "[package]\nname = \"acme/app\"\nrequire = [\"acme/lib-b\", \"acme/lib-a\"]\n",
        );
        Manifest::load(&path).unwrap()
    }

    #[test]
    fn test_loads_root_and_installed_sorted() {
        let temp = TempDir::new().unwrap();
        let root = root_manifest(temp.path());
        write(
            &temp.path().join("vendor/acme/lib-b").join(MANIFEST_FILE),
            "[package]\nname = \"acme/lib-b\"\n",
        );
        write(
            &temp.path().join("vendor/acme/lib-a").join(MANIFEST_FILE),
            "[package]\nname = \"acme/lib-a\"\n[files]\nparams = \"p.php\"\n",
        );

        let packages =
            FilesystemProvider::new(root, temp.path().join("vendor")).packages().unwrap();
        let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["acme/app", "acme/lib-a", "acme/lib-b"]);
        assert!(packages[0].is_root);
        assert!(!packages[1].is_root);
        assert_eq!(packages[1].root_dir, temp.path().join("vendor/acme/lib-a"));
    }

    #[test]
    fn test_directory_without_manifest_is_incomplete() {
        let temp = TempDir::new().unwrap();
        let root = root_manifest(temp.path());
        fs::create_dir_all(temp.path().join("vendor/acme/legacy")).unwrap();

        let packages =
            FilesystemProvider::new(root, temp.path().join("vendor")).packages().unwrap();
        let legacy = packages.iter().find(|p| p.name == "acme/legacy").unwrap();
        assert!(!legacy.complete);
        assert!(legacy.files.is_empty());
    }

    #[test]
    fn test_missing_vendor_dir_yields_root_only() {
        let temp = TempDir::new().unwrap();
        let root = root_manifest(temp.path());
        let packages =
            FilesystemProvider::new(root, temp.path().join("vendor")).packages().unwrap();
        assert_eq!(packages.len(), 1);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let temp = TempDir::new().unwrap();
        let root = root_manifest(temp.path());
        write(
            &temp.path().join("vendor/acme/copy").join(MANIFEST_FILE),
            "[package]\nname = \"acme/app\"\n",
        );

        let err = FilesystemProvider::new(root, temp.path().join("vendor"))
            .packages()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfmergeError>(),
            Some(ConfmergeError::ManifestValidationError { .. })
        ));
    }

    #[test]
    fn test_static_provider_feeds_assembler() {
        use crate::assembly::Assembler;
        use crate::config::AssemblyConfig;
        use crate::package::CategoryFiles;

        let provider = StaticProvider::new(vec![
            PackageNode::new("app", "/app")
                .root()
                .with_requires(["lib"])
                .with_files(CategoryFiles::new().with("params", ["p.php"])),
            PackageNode::new("lib", "/lib")
                .with_files(CategoryFiles::new().with("params", ["p.php"])),
        ]);

        let packages = provider.packages().unwrap();
        let assembly =
            Assembler::new(AssemblyConfig::defaults(Path::new("/app"))).assemble(&packages).unwrap();
        assert_eq!(assembly.build_order.names(), vec!["lib", "app"]);
        assert_eq!(assembly.files["params"].len(), 2);
    }
}
