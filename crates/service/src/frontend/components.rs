use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tracing::{debug, instrument};

use super::errors::FrontendError;

/// Read-only snapshot of the installed module names, in lookup order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledModules(Vec<String>);

impl InstalledModules {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> { self.0.iter().map(String::as_str) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// Script and stylesheet of one component, as paths relative to the web root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentAssets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
}

impl ComponentAssets {
    fn is_empty(&self) -> bool { self.js.is_none() && self.css.is_none() }
}

/// Hook name -> one asset bundle per contributing module.
pub type Hooks = BTreeMap<String, Vec<ComponentAssets>>;

/// Page route -> asset bundle.
pub type Pages = BTreeMap<String, ComponentAssets>;

#[derive(Debug, Clone, Copy)]
enum ComponentKind {
    Hook,
    Page,
}

impl ComponentKind {
    fn dir_name(self) -> &'static str {
        match self {
            ComponentKind::Hook => "hooks",
            ComponentKind::Page => "pages",
        }
    }
}

/// Discovers frontend hooks and pages under `<www_root>/modules/<module>/static`.
pub struct FrontendComponentService {
    www_root: PathBuf,
    modules: InstalledModules,
}

impl FrontendComponentService {
    pub fn new(www_root: impl Into<PathBuf>, modules: InstalledModules) -> Self {
        Self { www_root: www_root.into(), modules }
    }

    pub fn installed_modules(&self) -> &InstalledModules { &self.modules }

    /// Hooks of every installed module, keyed by path below `static/hooks`.
    #[instrument(skip(self), fields(modules = self.modules.len()))]
    pub async fn hooks(&self) -> Result<Hooks, FrontendError> {
        let mut hooks = Hooks::new();
        for module in self.modules.iter() {
            for (name, assets) in self.module_components(module, ComponentKind::Hook).await? {
                hooks.entry(name).or_default().push(assets);
            }
        }
        debug!(count = hooks.len(), "frontend hooks discovered");
        Ok(hooks)
    }

    /// Pages of every installed module. `_param` directory segments become
    /// `:param` route parameters; a later module replaces an earlier one.
    #[instrument(skip(self), fields(modules = self.modules.len()))]
    pub async fn pages(&self) -> Result<Pages, FrontendError> {
        let mut pages = Pages::new();
        for module in self.modules.iter() {
            for (name, assets) in self.module_components(module, ComponentKind::Page).await? {
                pages.insert(name.replace("/_", "/:"), assets);
            }
        }
        debug!(count = pages.len(), "frontend pages discovered");
        Ok(pages)
    }

    async fn module_components(&self, module: &str, kind: ComponentKind) -> Result<Vec<(String, ComponentAssets)>, FrontendError> {
        let base = self.www_root.join("modules").join(module).join("static").join(kind.dir_name());
        let url_base = format!("/modules/{module}/static/{}", kind.dir_name());

        let mut found = Vec::new();
        for (rel, files) in collect_assets(&base).await? {
            // files sitting directly in static/<kind> belong to no component
            if rel.is_empty() {
                continue;
            }
            let mut assets = ComponentAssets::default();
            for file in files {
                let path = format!("{url_base}/{rel}/{file}");
                if file.ends_with(".js") {
                    assets.js = Some(path);
                } else if file.ends_with(".css") {
                    assets.css = Some(path);
                }
            }
            if !assets.is_empty() {
                found.push((format!("/{rel}"), assets));
            }
        }
        Ok(found)
    }
}

fn is_asset(file_name: &str) -> bool {
    file_name.ends_with(".js") || file_name.ends_with(".css")
}

fn relative_url(base: &Path, dir: &Path) -> String {
    dir.strip_prefix(base)
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

/// `.js`/`.css` file names under `base`, grouped by directory relative to
/// `base` and sorted. Symlinks are followed, each real directory is read at
/// most once; a missing or non-directory `base` yields nothing.
async fn collect_assets(base: &Path) -> Result<BTreeMap<String, Vec<String>>, FrontendError> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut pending = vec![base.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let Some(real) = existing_dir(&dir).await? else { continue };
        if !seen.insert(real) {
            debug!(path = %dir.display(), "directory already scanned; skipping");
            continue;
        }
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|source| FrontendError::Io { path: dir.clone(), source })?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| FrontendError::Io { path: dir.clone(), source })?
        {
            let path = entry.path();
            let meta = match fs::metadata(&path).await {
                Ok(meta) => meta,
                // dangling symlink
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(FrontendError::Io { path, source }),
            };
            if meta.is_dir() {
                pending.push(path);
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_asset(&name) {
                grouped.entry(relative_url(base, &dir)).or_default().push(name);
            }
        }
    }

    for files in grouped.values_mut() {
        files.sort();
    }
    Ok(grouped)
}

/// Canonical path of `dir` when it is a directory (symlinks resolved).
async fn existing_dir(dir: &Path) -> Result<Option<PathBuf>, FrontendError> {
    match fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => fs::canonicalize(dir)
            .await
            .map(Some)
            .map_err(|source| FrontendError::Io { path: dir.to_path_buf(), source }),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(FrontendError::Io { path: dir.to_path_buf(), source }),
    }
}
