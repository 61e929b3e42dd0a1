//! System and member lookups with privacy filtering and member caching.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::repos::{IdentityApi, IdentityError};
use crate::domain::entities::{MemberRecord, SystemRecord};
use crate::infra::cache::MemberCache;

#[derive(Clone)]
pub struct IdentityService {
    api: Arc<dyn IdentityApi>,
    cache: MemberCache,
    system_id: String,
    read_through: bool,
}

impl IdentityService {
    pub fn new(api: Arc<dyn IdentityApi>, cache: MemberCache, system_id: impl Into<String>) -> Self {
        Self {
            api,
            cache,
            system_id: system_id.into(),
            read_through: true,
        }
    }

    /// When disabled, the cache is still populated but never consulted.
    pub fn with_read_through(mut self, enabled: bool) -> Self {
        self.read_through = enabled;
        self
    }

    pub fn cache(&self) -> &MemberCache {
        &self.cache
    }

    pub async fn get_system(&self) -> Result<SystemRecord, IdentityError> {
        self.api.system(&self.system_id).await
    }

    /// Members of the configured system with private members removed.
    pub async fn list_members(&self) -> Result<Vec<MemberRecord>, IdentityError> {
        let members = self.api.members(&self.system_id).await?;
        let total = members.len();
        let visible: Vec<MemberRecord> = members
            .into_iter()
            .filter(|member| !member.is_private())
            .collect();

        debug!(
            target = "pkblog::identity",
            total,
            visible = visible.len(),
            "filtered member listing"
        );
        Ok(visible)
    }

    /// Fetch a single public member.
    ///
    /// Private members fail with [`IdentityError::Hidden`] so callers cannot
    /// tell them apart from upstream failures.
    pub async fn get_member(&self, member_id: &str) -> Result<MemberRecord, IdentityError> {
        if self.read_through {
            if let Some(member) = self.cache.get(member_id) {
                if member.is_private() {
                    return Err(IdentityError::Hidden {
                        member_id: member_id.to_string(),
                    });
                }
                return Ok(member);
            }
        }

        let member = self.api.member(member_id).await?;
        if member.is_private() {
            info!(
                target = "pkblog::identity",
                member_id, "refusing to serve private member"
            );
            return Err(IdentityError::Hidden {
                member_id: member_id.to_string(),
            });
        }

        self.cache.put(member_id, member.clone());
        Ok(member)
    }
}
