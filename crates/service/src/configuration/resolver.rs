use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::domain::{InheritanceChain, MacroScope, ResolvedMacros, ServiceDefinition, ServiceId};
use super::errors::ResolveError;
use super::repository::ConfigurationRepository;

/// Bounds applied to every resolution call.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Parent hops allowed from the queried service.
    pub max_depth: usize,
    /// Wall-clock budget per call.
    pub timeout: Option<Duration>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self { max_depth: 32, timeout: None }
    }
}

impl From<&configs::ResolverConfig> for ResolverOptions {
    fn from(cfg: &configs::ResolverConfig) -> Self {
        Self {
            max_depth: cfg.max_inheritance_depth,
            timeout: cfg.timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Tracks the ids visited by one walk up the template chain.
struct ChainGuard {
    visited: HashSet<ServiceId>,
    path: Vec<ServiceId>,
    max_depth: usize,
}

impl ChainGuard {
    fn new(max_depth: usize) -> Self {
        Self { visited: HashSet::new(), path: Vec::new(), max_depth }
    }

    fn visit(&mut self, id: ServiceId) -> Result<(), ResolveError> {
        if !self.visited.insert(id) {
            warn!(service_id = id, path = ?self.path, "inheritance cycle detected");
            return Err(ResolveError::CycleDetected { revisited: id, path: self.path.clone() });
        }
        // path.len() is the number of hops already taken to reach `id`
        if self.path.len() > self.max_depth {
            warn!(service_id = id, limit = self.max_depth, "inheritance chain too deep");
            return Err(ResolveError::DepthExceeded { limit: self.max_depth });
        }
        self.path.push(id);
        Ok(())
    }

    fn depth(&self) -> usize { self.path.len().saturating_sub(1) }

    fn into_chain(self) -> InheritanceChain { InheritanceChain::new(self.path) }
}

/// Stateless resolver of effective command lines and on-demand macros.
///
/// Holds no state besides the repository handle, so one instance can serve
/// concurrent calls.
pub struct ConfigurationResolver<R: ConfigurationRepository + ?Sized> {
    repo: Arc<R>,
    opts: ResolverOptions,
}

impl<R: ConfigurationRepository + ?Sized> ConfigurationResolver<R> {
    pub fn new(repo: Arc<R>, opts: ResolverOptions) -> Self { Self { repo, opts } }

    /// Stored definition of a service or template.
    #[instrument(skip(self))]
    pub async fn find_service(&self, id: ServiceId) -> Result<ServiceDefinition, ResolveError> {
        self.within_deadline(async {
            self.repo.find_service(id).await?.ok_or(ResolveError::NotFound(id))
        })
        .await
    }

    /// Command line of the nearest entity in the chain (itself included) that
    /// declares one; `None` when no entity does.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::configuration::repository::mock::InMemoryConfigurationRepository;
    /// use service::configuration::{ConfigurationResolver, ResolverOptions};
    /// let repo = InMemoryConfigurationRepository::default()
    ///     .with_service(10, Some("check_disk"), None)
    ///     .with_service(2, None, Some(10));
    /// let resolver = ConfigurationResolver::new(Arc::new(repo), ResolverOptions::default());
    /// let line = tokio_test::block_on(resolver.resolve_command_line(2)).unwrap();
    /// assert_eq!(line.as_deref(), Some("check_disk"));
    /// ```
    #[instrument(skip(self))]
    pub async fn resolve_command_line(&self, id: ServiceId) -> Result<Option<String>, ResolveError> {
        self.within_deadline(self.walk_command_line(id)).await
    }

    /// Macros applying to `id`, merged by name along the chain for
    /// [`MacroScope::WithInheritance`].
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::configuration::repository::mock::InMemoryConfigurationRepository;
    /// use service::configuration::{ConfigurationResolver, ResolverOptions};
    /// use service::configuration::domain::MacroScope;
    /// let repo = InMemoryConfigurationRepository::default()
    ///     .with_service(20, None, None)
    ///     .with_macro(20, "WARN", "70")
    ///     .with_macro(20, "CRIT", "90")
    ///     .with_service(3, None, Some(20))
    ///     .with_macro(3, "WARN", "80");
    /// let resolver = ConfigurationResolver::new(Arc::new(repo), ResolverOptions::default());
    /// let set = tokio_test::block_on(resolver.resolve_macros(3, MacroScope::WithInheritance)).unwrap();
    /// assert_eq!(set.value("WARN"), Some("80"));
    /// assert_eq!(set.value("CRIT"), Some("90"));
    /// ```
    #[instrument(skip(self))]
    pub async fn resolve_macros(&self, id: ServiceId, scope: MacroScope) -> Result<ResolvedMacros, ResolveError> {
        self.within_deadline(async {
            match scope {
                MacroScope::OwnOnly => Ok(self.repo.own_macros(id).await?.into_iter().collect()),
                MacroScope::WithInheritance => {
                    let chain = self.walk_chain(id).await?;
                    let mut set = ResolvedMacros::default();
                    // root first so closer definitions overwrite
                    for owner in chain.from_root() {
                        for m in self.repo.own_macros(owner).await? {
                            set.apply(m);
                        }
                    }
                    debug!(service_id = id, chain_len = chain.len(), macros = set.len(), "macros resolved");
                    Ok(set)
                }
            }
        })
        .await
    }

    /// Ids from `id` up to its root template.
    #[instrument(skip(self))]
    pub async fn inheritance_chain(&self, id: ServiceId) -> Result<InheritanceChain, ResolveError> {
        self.within_deadline(self.walk_chain(id)).await
    }

    async fn walk_command_line(&self, id: ServiceId) -> Result<Option<String>, ResolveError> {
        let mut guard = ChainGuard::new(self.opts.max_depth);
        let mut current = id;
        loop {
            guard.visit(current)?;
            if let Some(line) = self.repo.own_command_line(current).await? {
                debug!(service_id = id, found_at = current, depth = guard.depth(), "command line resolved");
                return Ok(Some(line));
            }
            match self.repo.parent_id(current).await? {
                Some(parent) => {
                    debug!(from = current, to = parent, "following parent template");
                    current = parent;
                }
                None => {
                    debug!(service_id = id, depth = guard.depth(), "no command line in chain");
                    return Ok(None);
                }
            }
        }
    }

    async fn walk_chain(&self, id: ServiceId) -> Result<InheritanceChain, ResolveError> {
        let mut guard = ChainGuard::new(self.opts.max_depth);
        let mut current = id;
        loop {
            guard.visit(current)?;
            match self.repo.parent_id(current).await? {
                Some(parent) => current = parent,
                None => return Ok(guard.into_chain()),
            }
        }
    }

    async fn within_deadline<T, F>(&self, fut: F) -> Result<T, ResolveError>
    where
        F: Future<Output = Result<T, ResolveError>>,
    {
        match self.opts.timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                warn!(limit_ms = limit.as_millis() as u64, "resolution deadline exceeded");
                ResolveError::Timeout(limit.as_millis() as u64)
            })?,
            None => fut.await,
        }
    }
}
