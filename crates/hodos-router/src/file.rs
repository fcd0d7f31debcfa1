//! Route resources read from TOML or JSON files.
//!
//! A route file holds a list of routes and groups. Middleware and actions are
//! given by name and resolved through the container's middleware registry.
//!
//! ```toml
//! [[routes]]
//! type = "route"
//! methods = ["GET", "HEAD"]
//! pattern = "/"
//! name = "home"
//! action = "site.index"
//!
//! [[routes]]
//! type = "group"
//! prefix = "/api"
//! name_prefix = "api/"
//! middleware = ["auth"]
//! cors = "cors"
//!
//! [[routes.routes]]
//! type = "route"
//! methods = ["GET"]
//! pattern = "/users/{id}"
//! name = "user"
//! action = "users.view"
//! defaults = { format = "json" }
//! ```
//!
//! A directory resource loads every `.toml` and `.json` file in it, sorted by
//! file name.

use crate::group::{Group, RouteItem};
use crate::provider::RoutesProvider;
use crate::route::{Route, RouteBuilder};
use hodos_core::{HodosError, HodosResult, MiddlewareDefinition};
use http::Method;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct RouteFile {
    #[serde(default)]
    routes: Vec<ItemEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ItemEntry {
    Route(RouteEntry),
    Group(GroupEntry),
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    methods: Vec<String>,
    pattern: String,
    name: Option<String>,
    #[serde(default)]
    hosts: Vec<String>,
    #[serde(default)]
    defaults: IndexMap<String, Option<ScalarValue>>,
    #[serde(default, rename = "override")]
    override_existing: bool,
    action: Option<String>,
    #[serde(default)]
    middleware: Vec<String>,
    #[serde(default)]
    disabled_middleware: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GroupEntry {
    prefix: Option<String>,
    name_prefix: Option<String>,
    #[serde(default)]
    hosts: Vec<String>,
    #[serde(default)]
    middleware: Vec<String>,
    #[serde(default)]
    disabled_middleware: Vec<String>,
    cors: Option<String>,
    #[serde(default)]
    routes: Vec<ItemEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScalarValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    fn into_string(self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::String(value) => value,
        }
    }
}

/// A resource reading routes from a file or a directory of files.
#[derive(Debug, Clone)]
pub struct FileRoutesProvider {
    path: PathBuf,
}

impl FileRoutesProvider {
    /// Reads routes from `path`, a `.toml`/`.json` file or a directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The resource path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn files(&self) -> HodosResult<Vec<PathBuf>> {
        if !self.path.exists() {
            return Err(HodosError::ResourceNotFound {
                path: self.path.clone(),
            });
        }
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }

        let entries = fs::read_dir(&self.path)
            .map_err(|e| HodosError::invalid_resource(&self.path, e.to_string()))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| HodosError::invalid_resource(&self.path, e.to_string()))?
                .path();
            let supported = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("toml" | "json")
            );
            if supported && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl RoutesProvider for FileRoutesProvider {
    fn routes(&self) -> HodosResult<Vec<RouteItem>> {
        let mut items = Vec::new();
        for path in self.files()? {
            let file = read_route_file(&path)?;
            debug!(path = %path.display(), count = file.routes.len(), "loaded route file");
            for entry in file.routes {
                items.push(build_item(entry, &path)?);
            }
        }
        Ok(items)
    }
}

fn read_route_file(path: &Path) -> HodosResult<RouteFile> {
    let content =
        fs::read_to_string(path).map_err(|e| HodosError::invalid_resource(path, e.to_string()))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("toml") => {
            toml::from_str(&content).map_err(|e| HodosError::invalid_resource(path, e.to_string()))
        }
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| HodosError::invalid_resource(path, e.to_string())),
        _ => Err(HodosError::invalid_resource(
            path,
            "unsupported route file format, expected .toml or .json",
        )),
    }
}

fn named(names: Vec<String>) -> impl Iterator<Item = MiddlewareDefinition> {
    names.into_iter().map(MiddlewareDefinition::named)
}

fn build_item(entry: ItemEntry, path: &Path) -> HodosResult<RouteItem> {
    match entry {
        ItemEntry::Route(route) => build_route(route, path).map(RouteItem::Route),
        ItemEntry::Group(group) => build_group(group, path).map(RouteItem::Group),
    }
}

fn build_route(entry: RouteEntry, path: &Path) -> HodosResult<Route> {
    let mut methods = Vec::with_capacity(entry.methods.len());
    for method in &entry.methods {
        let parsed = Method::from_bytes(method.to_uppercase().as_bytes()).map_err(|_| {
            HodosError::invalid_resource(path, format!("invalid HTTP method '{method}'"))
        })?;
        methods.push(parsed);
    }

    let mut builder: RouteBuilder = Route::methods(methods, entry.pattern)
        .map_err(|e| HodosError::invalid_resource(path, e.to_string()))?
        .middlewares(named(entry.middleware));

    if let Some(name) = entry.name {
        builder = builder.name(name);
    }
    if !entry.hosts.is_empty() {
        builder = builder.hosts(entry.hosts);
    }
    for (key, value) in entry.defaults {
        builder = match value {
            Some(value) => builder.default_value(key, value.into_string()),
            None => builder.default_unset(key),
        };
    }
    if entry.override_existing {
        builder = builder.override_existing();
    }
    if let Some(action) = entry.action {
        builder = builder.action(MiddlewareDefinition::named(action));
    }
    for definition in named(entry.disabled_middleware) {
        builder = builder.disable_middleware(definition);
    }

    Ok(builder.to_route())
}

fn build_group(entry: GroupEntry, path: &Path) -> HodosResult<Group> {
    let mut builder = match entry.prefix {
        Some(prefix) => Group::builder(prefix),
        None => Group::create(),
    };
    if let Some(name_prefix) = entry.name_prefix {
        builder = builder.name_prefix(name_prefix);
    }
    if !entry.hosts.is_empty() {
        builder = builder.hosts(entry.hosts);
    }
    for definition in named(entry.middleware) {
        builder = builder.middleware(definition);
    }
    for definition in named(entry.disabled_middleware) {
        builder = builder.disable_middleware(definition);
    }
    if let Some(cors) = entry.cors {
        builder = builder.with_cors(MiddlewareDefinition::named(cors));
    }

    let items = entry
        .routes
        .into_iter()
        .map(|item| build_item(item, path))
        .collect::<HodosResult<Vec<_>>>()?;

    builder.routes(items).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const TOML_ROUTES: &str = r#"
[[routes]]
type = "route"
methods = ["get", "HEAD"]
pattern = "/"
name = "home"
action = "site.index"

[[routes]]
type = "group"
prefix = "/api"
name_prefix = "api/"
middleware = ["auth"]
cors = "cors"

[[routes.routes]]
type = "route"
methods = ["GET"]
pattern = "/users/{id}"
name = "user"
action = "users.view"
defaults = { format = "json", page = 1 }
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_reads_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "routes.toml", TOML_ROUTES);

        let items = FileRoutesProvider::new(path).routes().unwrap();
        assert_eq!(items.len(), 2);

        let RouteItem::Route(home) = &items[0] else {
            panic!("expected route");
        };
        assert_eq!(home.name(), "home");
        assert_eq!(home.http_methods(), [Method::GET, Method::HEAD]);
        assert_eq!(
            home.action(),
            Some(&MiddlewareDefinition::named("site.index"))
        );

        let RouteItem::Group(api) = &items[1] else {
            panic!("expected group");
        };
        assert_eq!(api.prefix(), Some("/api"));
        assert_eq!(api.middleware_definitions(), [MiddlewareDefinition::named("auth")]);
        assert!(api.has_cors_middleware());

        let RouteItem::Route(user) = &api.items()[0] else {
            panic!("expected nested route");
        };
        assert_eq!(user.defaults()["format"].as_deref(), Some("json"));
        assert_eq!(user.defaults()["page"].as_deref(), Some("1"));
    }

    #[test]
    fn test_reads_json_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "routes.json",
            r#"{"routes": [{"type": "route", "methods": ["POST"], "pattern": "/login", "override": true, "defaults": {"next": null}}]}"#,
        );

        let items = FileRoutesProvider::new(path).routes().unwrap();
        let RouteItem::Route(login) = &items[0] else {
            panic!("expected route");
        };
        assert_eq!(login.name(), "POST /login");
        assert!(login.is_override());
        assert_eq!(login.defaults()["next"], None);
    }

    #[test]
    fn test_directory_sorted_by_file_name() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "b.toml",
            "[[routes]]\ntype = \"route\"\nmethods = [\"GET\"]\npattern = \"/b\"\n",
        );
        write(
            &dir,
            "a.json",
            r#"{"routes": [{"type": "route", "methods": ["GET"], "pattern": "/a"}]}"#,
        );
        write(&dir, "notes.txt", "ignored");

        let items = FileRoutesProvider::new(dir.path()).routes().unwrap();
        let patterns: Vec<_> = items
            .iter()
            .map(|item| match item {
                RouteItem::Route(route) => route.pattern().to_string(),
                RouteItem::Group(_) => String::new(),
            })
            .collect();
        assert_eq!(patterns, ["/a", "/b"]);
    }

    #[test]
    fn test_missing_path() {
        let err = FileRoutesProvider::new("/definitely/not/here.toml")
            .routes()
            .unwrap_err();
        assert!(matches!(err, HodosError::ResourceNotFound { .. }));
    }

    #[test]
    fn test_invalid_method() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bad.toml",
            "[[routes]]\ntype = \"route\"\nmethods = [\"GE T\"]\npattern = \"/\"\n",
        );
        let err = FileRoutesProvider::new(path).routes().unwrap_err();
        assert!(err.to_string().contains("invalid HTTP method"));
    }

    #[test]
    fn test_empty_methods_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "empty.toml",
            "[[routes]]\ntype = \"route\"\nmethods = []\npattern = \"/\"\n",
        );
        let err = FileRoutesProvider::new(path).routes().unwrap_err();
        assert!(matches!(err, HodosError::InvalidResource { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "routes.yaml", "routes: []");
        let err = FileRoutesProvider::new(path).routes().unwrap_err();
        assert!(matches!(err, HodosError::InvalidResource { .. }));
    }
}
