//! Compiles endpoint descriptions into routes.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    routing::MethodRouter,
};
use thiserror::Error;
use tracing::info;

use crate::endpoint::{Endpoint, RequestMethod, chain};
use crate::state::AppState;

/// A registry that cannot be served. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("endpoint {method} {path} is registered more than once")]
    Duplicate { method: RequestMethod, path: String },

    #[error("endpoint {method} {path}: {reason}")]
    InvalidPath {
        method: RequestMethod,
        path: String,
        reason: &'static str,
    },

    /// Two templates that differ only in capture names match the same URLs.
    #[error("endpoint {method} {path} conflicts with route {existing}")]
    ConflictingPath {
        method: RequestMethod,
        path: String,
        existing: String,
    },
}

/// Reduces a route template to the URLs it matches, with capture names
/// erased: `/competition/{id}` becomes `/competition/{}`.
fn route_shape(path: &str) -> Result<String, &'static str> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err("path must start with '/'");
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let mut names: Vec<&str> = Vec::new();
    let mut shape = String::with_capacity(path.len());

    for (index, segment) in segments.iter().enumerate() {
        shape.push('/');
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err("segments must not start with ':' or '*'");
        }

        let Some(inner) = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        else {
            if segment.contains(['{', '}']) {
                return Err("captures must span a whole segment");
            }
            shape.push_str(segment);
            continue;
        };

        let (wildcard, name) = match inner.strip_prefix('*') {
            Some(name) => (true, name),
            None => (false, inner),
        };
        if name.is_empty() || name.contains(['{', '}', '*']) {
            return Err("capture name is empty or malformed");
        }
        if wildcard && index + 1 != segments.len() {
            return Err("wildcard capture must be the last segment");
        }
        if names.contains(&name) {
            return Err("capture name appears more than once");
        }
        names.push(name);
        shape.push_str(if wildcard { "{*}" } else { "{}" });
    }

    Ok(shape)
}

#[derive(Debug, Default)]
pub struct EndpointRegistry {
    endpoints: Vec<Arc<Endpoint>>,
}

impl EndpointRegistry {
    pub fn new<I>(endpoints: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Endpoint>,
    {
        let mut registry = Self::default();
        for endpoint in endpoints {
            registry.register(endpoint)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, endpoint: Endpoint) -> Result<(), RegistryError> {
        let shape = route_shape(endpoint.path()).map_err(|reason| RegistryError::InvalidPath {
            method: endpoint.method(),
            path: endpoint.path().to_string(),
            reason,
        })?;

        let conflicting = self.endpoints.iter().find(|e| {
            e.path() != endpoint.path() && route_shape(e.path()).is_ok_and(|other| other == shape)
        });
        if let Some(existing) = conflicting {
            return Err(RegistryError::ConflictingPath {
                method: endpoint.method(),
                path: endpoint.path().to_string(),
                existing: existing.path().to_string(),
            });
        }

        let duplicate = self
            .endpoints
            .iter()
            .any(|e| e.method() == endpoint.method() && e.path() == endpoint.path());
        if duplicate {
            return Err(RegistryError::Duplicate {
                method: endpoint.method(),
                path: endpoint.path().to_string(),
            });
        }

        self.endpoints.push(Arc::new(endpoint));
        Ok(())
    }

    /// Merges another registry's endpoints into this one.
    pub fn extend(&mut self, other: EndpointRegistry) -> Result<(), RegistryError> {
        for endpoint in other.endpoints {
            let endpoint = Arc::try_unwrap(endpoint).unwrap_or_else(|shared| (*shared).clone());
            self.register(endpoint)?;
        }
        Ok(())
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter().map(|endpoint| endpoint.as_ref())
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// One route per path, one method handler per endpoint, each running
    /// the endpoint's chain.
    pub fn router(&self) -> Router<AppState> {
        let mut routes: BTreeMap<&str, MethodRouter<AppState>> = BTreeMap::new();

        for endpoint in &self.endpoints {
            let shared = Arc::clone(endpoint);
            let handler = move |State(state): State<AppState>, request: Request| {
                chain::handle(shared, state, request)
            };

            let method_router = routes
                .remove(endpoint.path())
                .unwrap_or_else(MethodRouter::new)
                .on(endpoint.method().filter(), handler);
            routes.insert(endpoint.path(), method_router);
        }

        info!(
            endpoints = self.endpoints.len(),
            paths = routes.len(),
            "Compiled endpoint registry"
        );

        routes
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| {
                router.route(path, method_router)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{Action, RequestContext};
    use async_trait::async_trait;
    use scoreboard_core::AppError;
    use serde_json::Value;

    struct Noop;

    #[async_trait]
    impl Action for Noop {
        async fn call(&self, _state: &AppState, _ctx: &RequestContext) -> Result<Value, AppError> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_same_path_different_methods_is_allowed() {
        let registry = EndpointRegistry::new([
            Endpoint::get("/competition/{id}", Noop),
            Endpoint::put("/competition/{id}", Noop),
            Endpoint::delete("/competition/{id}", Noop),
        ])
        .unwrap();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_method_and_path_is_rejected() {
        let err = EndpointRegistry::new([
            Endpoint::get("/competition", Noop),
            Endpoint::post("/competition", Noop),
            Endpoint::get("/competition", Noop),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            RegistryError::Duplicate {
                method: RequestMethod::Get,
                path: "/competition".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "endpoint GET /competition is registered more than once"
        );
    }

    #[test]
    fn test_relative_path_is_rejected() {
        let err = EndpointRegistry::new([Endpoint::get("competition", Noop)]).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPath { .. }));
    }

    #[test]
    fn test_renamed_capture_conflicts_with_existing_route() {
        let err = EndpointRegistry::new([
            Endpoint::get("/competition/{id}", Noop),
            Endpoint::put("/competition/{slug}", Noop),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            RegistryError::ConflictingPath {
                method: RequestMethod::Put,
                path: "/competition/{slug}".to_string(),
                existing: "/competition/{id}".to_string(),
            }
        );
    }

    #[test]
    fn test_static_segment_next_to_capture_is_allowed() {
        let registry = EndpointRegistry::new([
            Endpoint::get("/competition/{id}", Noop),
            Endpoint::get("/competition/{id}/detailed", Noop),
            Endpoint::get("/competition/upcoming", Noop),
        ])
        .unwrap();
        assert_eq!(registry.len(), 3);
        let _router = registry.router();
    }

    #[test]
    fn test_malformed_captures_are_rejected() {
        for path in [
            "/competition/{}",
            "/competition/{id",
            "/competition/id}",
            "/competition/x{id}",
            "/competition/:id",
            "/files/{*rest}/meta",
            "/pairs/{id}/{id}",
        ] {
            let err = EndpointRegistry::new([Endpoint::get(path, Noop)]).unwrap_err();
            assert!(
                matches!(err, RegistryError::InvalidPath { .. }),
                "{path} should be rejected, got {err:?}"
            );
        }

        assert!(EndpointRegistry::new([Endpoint::get("/files/{*rest}", Noop)]).is_ok());
    }

    #[test]
    fn test_extend_detects_cross_module_duplicates() {
        let mut registry =
            EndpointRegistry::new([Endpoint::get("/account/profile", Noop)]).unwrap();
        let other = EndpointRegistry::new([Endpoint::get("/account/profile", Noop)]).unwrap();
        assert!(registry.extend(other).is_err());
    }
}
