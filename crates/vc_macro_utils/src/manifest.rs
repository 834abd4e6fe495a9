use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item};

const FACADE_NAME: &str = "vc_persist";
const CRATE_PREFIX: &str = "vc_";

/// The dependency tables of the caller's Cargo.toml.
///
/// Used by proc-macro code to locate an accessible [`syn::Path`] for another
/// crate: generated code must name the crates it uses with paths that are
/// valid from the invoking crate, which may depend on the crate directly,
/// under another name, or only on the `vc_persist` facade.
///
/// # Example
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_serial"));
/// ```
///
/// Reading the manifest is not cheap: call it once per macro invocation and
/// pass the result around.
///
/// # Resolution rules
///
/// 1. If the requested package is listed in `dependencies`, return
///    `::dependency_name` (the key of the entry, which differs from the
///    package name for renamed dependencies).
/// 2. If the requested package name begins with `vc_` and the target crate
///    depends on the facade `vc_persist`, return `::vc_persist::short_name`
///    (e.g. `vc_serial` -> `::vc_persist::serial`).
/// 3. Repeat step 1-2 in `dev-dependencies`.
/// 4. Otherwise, fall back to the absolute path `::package_name`.
///
/// ## Note
///
/// Inside the requested crate itself, rule 4 applies. Adding
/// `extern crate self as vc_serial;` in its root makes `::vc_serial` valid
/// for unit tests and doc tests alike.
#[derive(Debug)]
pub struct Manifest {
    /// Package name -> name the crate is imported as.
    dependencies: BTreeMap<String, String>,
    dev_dependencies: BTreeMap<String, String>,
    modified_time: SystemTime,
}

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .unwrap_or_else(|| panic!("CARGO_MANIFEST_DIR should be auto-defined by cargo."));
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn modified_time(path: &Path) -> SystemTime {
        std::fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .unwrap_or_else(|_| panic!("Unable to read the modified time of {}", path.display()))
    }

    #[inline(never)]
    fn load(path: &Path, modified_time: SystemTime) -> Self {
        let source = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()));
        let document = Document::parse(source)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()));

        Self {
            dependencies: Self::dependency_table(document.get("dependencies")),
            dev_dependencies: Self::dependency_table(document.get("dev-dependencies")),
            modified_time,
        }
    }

    fn dependency_table(item: Option<&Item>) -> BTreeMap<String, String> {
        let Some(table) = item.and_then(Item::as_table_like) else {
            return BTreeMap::new();
        };

        table
            .iter()
            .map(|(key, value)| {
                let package = value
                    .as_table_like()
                    .and_then(|dep| dep.get("package"))
                    .and_then(|package| package.as_str())
                    .unwrap_or(key);
                (package.to_owned(), key.replace('-', "_"))
            })
            .collect()
    }

    #[inline]
    fn parse_str<T: syn::parse::Parse>(path: &str) -> T {
        syn::parse_str(path).unwrap_or_else(|_| panic!("`{path}` is not a valid path"))
    }

    fn find_in_deps(deps: &BTreeMap<String, String>, name: &str) -> Option<syn::Path> {
        if let Some(imported) = deps.get(name) {
            return Some(Self::parse_str(&format!("::{imported}")));
        }

        let module = name.strip_prefix(CRATE_PREFIX)?;
        let facade = deps.get(FACADE_NAME)?;
        let mut path = Self::parse_str::<syn::Path>(&format!("::{facade}"));
        path.segments.push(Self::parse_str(module));
        Some(path)
    }

    /// Returns a [`syn::Path`] for the package named `name` as resolved
    /// from this crate's Cargo.toml. See the type documentation for the
    /// resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        Self::find_in_deps(&self.dependencies, name)
            .or_else(|| Self::find_in_deps(&self.dev_dependencies, name))
            .unwrap_or_else(|| Self::parse_str(&format!("::{name}")))
    }

    /// Runs `func` with the [`Manifest`] of the caller's Cargo.toml.
    ///
    /// Manifests are cached per path and reloaded when the file changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time = Self::modified_time(&path);

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = manifests.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Self::load(&path, modified_time);
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}

// -----------------------------------------------------------------------------
// Tests
