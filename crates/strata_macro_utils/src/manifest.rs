use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The dependency tables of the invoking crate's `Cargo.toml`, used to find
/// the path under which a strata crate is reachable from generated code.
///
/// # Example
///
/// ```rust
/// # use strata_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("strata_reflect"));
/// ```
///
/// Looking the manifest up is not free. Resolve a path once per macro
/// invocation and pass it around.
///
/// # Resolution rules
///
/// `dependencies` is searched first, then `dev-dependencies`.
///
/// 1. A dependency whose package is the requested crate gives `::key`, where
///    `key` is the name the dependency is declared under. Renamed
///    dependencies (`foo = { package = "strata_reflect" }`) resolve to `::foo`.
/// 2. For a `strata_*` crate, a dependency on the `strata_core` facade gives
///    `::key::short_name`, e.g. `strata_reflect` becomes
///    `::strata_core::reflect`.
/// 3. Otherwise the absolute path `::crate_name` is returned.
///
/// A crate deriving on its own types should declare
/// `extern crate self as crate_name;` so that rule 3 resolves inside it too.
#[derive(Debug)]
pub struct Manifest {
    /// `None` if the manifest could not be read or parsed.
    manifest: Option<Document<Box<str>>>,
    modified_time: Option<SystemTime>,
}

const FACADE_NAME: &str = "strata_core";
const CRATE_PREFIX: &str = "strata_";

impl Manifest {
    fn get_manifest_path() -> Option<PathBuf> {
        let mut path = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
        path.push("Cargo.toml");
        Some(path)
    }

    fn get_manifest_modified_time(path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
    }

    fn read_manifest(path: &Path) -> Option<Document<Box<str>>> {
        let text = std::fs::read_to_string(path).ok()?.into_boxed_str();
        Document::parse(text).ok()
    }

    /// The package a dependency entry refers to, honoring `package = "..."`.
    fn package_of<'a>(key: &'a str, item: &'a Item) -> &'a str {
        item.get("package").and_then(Item::as_str).unwrap_or(key)
    }

    fn absolute_path(segments: &[&str]) -> Option<syn::Path> {
        let mut text = String::new();
        for segment in segments {
            text.push_str("::");
            text.push_str(&segment.replace('-', "_"));
        }
        syn::parse_str(&text).ok()
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        let mut facade = None;

        for (key, item) in deps.iter() {
            let package = Self::package_of(key, item).replace('-', "_");
            if package == name {
                return Self::absolute_path(&[key]);
            }
            if package == FACADE_NAME {
                facade = Some(key);
            }
        }

        let module = name.strip_prefix(CRATE_PREFIX)?;
        Self::absolute_path(&[facade?, module])
    }

    /// Returns the path of the crate named `name` as seen from the invoking
    /// crate. See the type-level documentation for the rules.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        if let Some(manifest) = &self.manifest {
            for table in ["dependencies", "dev-dependencies"] {
                if let Some(Item::Table(deps)) = manifest.get(table)
                    && let Some(path) = Self::find_in_deps(deps, name)
                {
                    return path;
                }
            }
        }

        Self::absolute_path(&[name]).unwrap_or_else(|| syn::Path {
            leading_colon: None,
            segments: Default::default(),
        })
    }

    /// Runs `func` with the invoking crate's manifest.
    ///
    /// Manifests are cached per path and reread when the file's modification
    /// time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let Some(manifest_path) = Self::get_manifest_path() else {
            return func(&Manifest {
                manifest: None,
                modified_time: None,
            });
        };
        let modified_time = Self::get_manifest_modified_time(&manifest_path);

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(manifest) = manifests.get(&manifest_path)
            && modified_time.is_some()
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }

        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };

        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}

// -----------------------------------------------------------------------------
// Tests
