//! Viewer capabilities for a resource
//!
//! [`Capabilities::resolve`] is the pure core; [`SessionSecurityContext`]
//! adapts it to the async [`SecurityContext`] port.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::application::ports::SecurityContext;
use crate::domain::{Capability, FeatureFlag, Session};

/// Effective permissions of the viewer, evaluated against one resource scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    admin: bool,
    site_admin_scopes: HashSet<String>,
    features: HashSet<FeatureFlag>,
    scope_id: Option<String>,
}

impl Capabilities {
    /// Least-privileged capabilities: nothing granted.
    pub fn none() -> Self {
        Self::default()
    }

    /// Derive capabilities from the session for a resource scope.
    ///
    /// A missing or unauthenticated session grants nothing; a missing scope
    /// makes every scoped check fail.
    pub fn resolve(session: Option<&Session>, scope_id: Option<&str>) -> Self {
        let Some(session) = session.filter(|s| s.authenticated) else {
            return Self::none();
        };

        let mut caps = Self {
            scope_id: scope_id.map(String::from),
            ..Self::default()
        };
        for capability in &session.capabilities {
            match capability {
                Capability::Admin => caps.admin = true,
                Capability::SiteAdmin(site) => {
                    caps.site_admin_scopes.insert(site.clone());
                }
                Capability::Feature(flag) => {
                    caps.features.insert(*flag);
                }
            }
        }
        caps
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn is_site_admin(&self, scope_id: &str) -> bool {
        self.site_admin_scopes.contains(scope_id)
    }

    /// Site-admin check against the scope these capabilities were resolved for
    pub fn is_resource_site_admin(&self) -> bool {
        self.scope_id
            .as_deref()
            .is_some_and(|scope| self.is_site_admin(scope))
    }

    pub fn is_feature_active(&self, flag: FeatureFlag) -> bool {
        self.features.contains(&flag)
    }
}

/// Security context backed only by the local session
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionSecurityContext;

#[async_trait]
impl SecurityContext for SessionSecurityContext {
    async fn resolve(&self, session: Option<&Session>, scope_id: Option<&str>) -> Capabilities {
        Capabilities::resolve(session, scope_id)
    }
}
