//! Persisted route snapshots.
//!
//! An optional optimization: the registry's route definitions can be
//! written to disk after the first build and reloaded on later starts,
//! skipping the registration callbacks. The on-disk format is plain JSON
//! holding nothing but strings — method, pattern, handler reference, hook
//! names — so a tampered file can at worst describe wrong routes, never
//! reconstruct executable objects. Loading re-registers the definitions
//! through the normal [`RouteRegistry`] API, which recompiles every
//! pattern.

use crate::registry::RouteRegistry;
use crate::route::MethodFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::SystemTime;
use thiserror::Error;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors from snapshot persistence.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file is not valid snapshot JSON.
    #[error("snapshot codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The snapshot was written by an incompatible format version.
    #[error("unsupported snapshot version {found} (expected {SNAPSHOT_VERSION})")]
    Version {
        /// The version found in the file.
        found: u32,
    },

    /// A stored method token could not be parsed.
    #[error("invalid method token in snapshot: {token}")]
    InvalidMethod {
        /// The offending token.
        token: String,
    },
}

/// One serialized route definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDef {
    /// Method token: a verb name or `"ANY"`.
    pub method: String,
    /// Effective pattern text.
    pub pattern: String,
    /// Opaque handler reference.
    pub handler: String,
    /// Attached hook names, group hooks first.
    pub hooks: Vec<String>,
}

/// A serialized snapshot of a route registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSnapshot {
    /// Format version, checked on load.
    pub version: u32,
    /// When the snapshot was generated.
    pub generated_at: DateTime<Utc>,
    /// Route definitions in registration order.
    pub routes: Vec<RouteDef>,
}

impl RouteSnapshot {
    /// Captures the given registry's route definitions.
    ///
    /// Group composition has already happened at registration time, so the
    /// definitions carry effective patterns and merged hook lists; restoring
    /// needs no group context.
    #[must_use]
    pub fn of(registry: &RouteRegistry) -> Self {
        let routes = registry
            .routes()
            .iter()
            .map(|route| RouteDef {
                method: route.method().as_str().to_string(),
                pattern: route.pattern().to_string(),
                handler: route.handler().to_string(),
                hooks: route.hooks().to_vec(),
            })
            .collect();
        Self {
            version: SNAPSHOT_VERSION,
            generated_at: Utc::now(),
            routes,
        }
    }

    /// Writes the snapshot as pretty-printed JSON.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            routes = self.routes.len(),
            "route snapshot written"
        );
        Ok(())
    }

    /// Loads a snapshot, rejecting incompatible versions.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let json = std::fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Loads a snapshot only when it is at least as new as `source_mtime`.
    ///
    /// Returns `Ok(None)` when the file does not exist or is older than the
    /// route-table sources it was built from; callers then rebuild through
    /// the normal registration path (the explicit rebuild command is simply
    /// [`write_to`](Self::write_to) after that rebuild).
    pub fn load_if_fresh(
        path: impl AsRef<Path>,
        source_mtime: SystemTime,
    ) -> Result<Option<Self>, SnapshotError> {
        let path = path.as_ref();
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if metadata.modified()? < source_mtime {
            tracing::debug!(path = %path.display(), "route snapshot stale; ignoring");
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Rebuilds a registry by re-registering every stored definition.
    pub fn restore(&self) -> Result<RouteRegistry, SnapshotError> {
        let mut registry = RouteRegistry::new();
        for def in &self.routes {
            let method =
                MethodFilter::parse(&def.method).ok_or_else(|| SnapshotError::InvalidMethod {
                    token: def.method.clone(),
                })?;
            registry
                .register(method, &def.pattern, def.handler.clone())
                .hooks(def.hooks.iter().cloned());
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupAttributes;
    use http::Method;
    use std::time::Duration;

    fn sample_registry() -> RouteRegistry {
        let mut routes = RouteRegistry::new();
        routes.get("/blog/:id:", "blog.show");
        routes.group(
            GroupAttributes::new().prefix("/admin").hooks(["auth"]),
            |routes| {
                routes.post("/posts", "admin.create").hooks(["log"]);
            },
        );
        routes.any("/health", "health.check");
        routes
    }

    #[test]
    fn test_snapshot_round_trip_through_reregistration() {
        let original = sample_registry();
        let snapshot = RouteSnapshot::of(&original);
        let restored = snapshot.restore().unwrap();

        assert_eq!(restored.len(), original.len());

        let matched = restored.match_route(&Method::GET, "/blog/7").unwrap();
        assert_eq!(matched.route().handler(), "blog.show");
        assert_eq!(matched.params().get("id"), Some("7"));

        let admin = restored.match_route(&Method::POST, "/admin/posts").unwrap();
        assert_eq!(admin.route().hooks(), ["auth", "log"]);

        let health = restored.match_route(&Method::DELETE, "/health").unwrap();
        assert_eq!(health.route().handler(), "health.check");
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");

        let snapshot = RouteSnapshot::of(&sample_registry());
        snapshot.write_to(&path).unwrap();

        let loaded = RouteSnapshot::load(&path).unwrap();
        assert_eq!(loaded.version, SNAPSHOT_VERSION);
        assert_eq!(loaded.routes, snapshot.routes);
    }

    #[test]
    fn test_load_if_fresh_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let result = RouteSnapshot::load_if_fresh(&path, SystemTime::now()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_if_fresh_rejects_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");
        RouteSnapshot::of(&sample_registry())
            .write_to(&path)
            .unwrap();

        // Sources "modified" after the snapshot was written.
        let later = SystemTime::now() + Duration::from_secs(60);
        let result = RouteSnapshot::load_if_fresh(&path, later).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_if_fresh_accepts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");
        RouteSnapshot::of(&sample_registry())
            .write_to(&path)
            .unwrap();

        let earlier = SystemTime::now() - Duration::from_secs(60);
        let result = RouteSnapshot::load_if_fresh(&path, earlier).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");

        let mut snapshot = RouteSnapshot::of(&sample_registry());
        snapshot.version = 99;
        let json = serde_json::to_string(&snapshot).unwrap();
        std::fs::write(&path, json).unwrap();

        assert!(matches!(
            RouteSnapshot::load(&path),
            Err(SnapshotError::Version { found: 99 })
        ));
    }

    #[test]
    fn test_restore_rejects_bad_method_token() {
        let snapshot = RouteSnapshot {
            version: SNAPSHOT_VERSION,
            generated_at: Utc::now(),
            routes: vec![RouteDef {
                method: String::new(),
                pattern: "/x".to_string(),
                handler: "x".to_string(),
                hooks: vec![],
            }],
        };
        assert!(matches!(
            snapshot.restore(),
            Err(SnapshotError::InvalidMethod { .. })
        ));
    }
}
