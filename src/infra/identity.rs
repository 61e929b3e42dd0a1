//! PluralKit v2 HTTP client.

use async_trait::async_trait;
use reqwest::{Client, Url, header::AUTHORIZATION};
use serde::{Deserialize, de::DeserializeOwned};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::application::repos::{IdentityApi, IdentityError};
use crate::config::IdentitySettings;
use crate::domain::entities::{MemberRecord, SystemRecord};
use crate::domain::types::Visibility;
use crate::infra::error::InfraError;

#[derive(Clone)]
pub struct PluralKitClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl PluralKitClient {
    pub fn new(settings: &IdentitySettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|err| InfraError::identity(err.to_string()))?;

        if settings.token.is_none() {
            warn!(
                target = "pkblog::identity",
                "no identity API token configured; privacy settings will be invisible"
            );
        }

        Ok(Self {
            client,
            base: settings.base_url.clone(),
            token: settings.token.clone(),
        })
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Result<Url, IdentityError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| IdentityError::Transport("identity base url cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, IdentityError> {
        let url = self.url(segments)?;
        debug!(target = "pkblog::identity", url = %url, "identity api request");

        let mut request = self.client.get(url);
        if let Some(token) = self.token.as_deref() {
            // PluralKit expects the bare token, without an auth scheme.
            request = request.header(AUTHORIZATION, token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| IdentityError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| IdentityError::Decode(err.to_string()))
    }
}

#[async_trait]
impl IdentityApi for PluralKitClient {
    async fn system(&self, system_id: &str) -> Result<SystemRecord, IdentityError> {
        let system: ApiSystem = self.get(&["systems", system_id]).await?;
        Ok(system.into())
    }

    async fn members(&self, system_id: &str) -> Result<Vec<MemberRecord>, IdentityError> {
        let members: Vec<ApiMember> = self.get(&["systems", system_id, "members"]).await?;
        Ok(members.into_iter().map(MemberRecord::from).collect())
    }

    async fn member(&self, member_id: &str) -> Result<MemberRecord, IdentityError> {
        let member: ApiMember = self.get(&["members", member_id]).await?;
        Ok(member.into())
    }
}

#[derive(Debug, Deserialize)]
struct ApiSystem {
    id: String,
    name: Option<String>,
    description: Option<String>,
    tag: Option<String>,
    avatar_url: Option<String>,
    banner: Option<String>,
    color: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    created: Option<OffsetDateTime>,
}

impl From<ApiSystem> for SystemRecord {
    fn from(system: ApiSystem) -> Self {
        Self {
            id: system.id,
            name: system.name,
            description: system.description,
            tag: system.tag,
            avatar_url: system.avatar_url,
            banner: system.banner,
            color: system.color,
            created: system.created,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiMember {
    id: String,
    name: String,
    display_name: Option<String>,
    description: Option<String>,
    pronouns: Option<String>,
    birthday: Option<String>,
    color: Option<String>,
    avatar_url: Option<String>,
    banner: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    created: Option<OffsetDateTime>,
    #[serde(default)]
    privacy: Option<ApiMemberPrivacy>,
}

/// The API omits or nulls this block for callers that do not own the system.
#[derive(Debug, Deserialize)]
struct ApiMemberPrivacy {
    visibility: Option<String>,
}

impl From<ApiMember> for MemberRecord {
    fn from(member: ApiMember) -> Self {
        let visibility = Visibility::from_api(
            member
                .privacy
                .as_ref()
                .and_then(|privacy| privacy.visibility.as_deref()),
        );

        Self {
            id: member.id,
            name: member.name,
            display_name: member.display_name,
            description: member.description,
            pronouns: member.pronouns,
            birthday: member.birthday,
            color: member.color,
            avatar_url: member.avatar_url,
            banner: member.banner,
            created: member.created,
            visibility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_payload_maps_privacy_and_timestamps() {
        let payload = r#"{
            "id": "abcde",
            "uuid": "ignored",
            "name": "Alice",
            "display_name": "Ali",
            "description": null,
            "pronouns": "she/her",
            "birthday": "2000-01-31",
            "color": "ff00ff",
            "avatar_url": null,
            "banner": null,
            "created": "2021-04-13T13:06:59.853741Z",
            "keep_proxy": false,
            "privacy": { "visibility": "private", "name_privacy": "public" }
        }"#;

        let member: MemberRecord = serde_json::from_str::<ApiMember>(payload)
            .expect("member decodes")
            .into();

        assert!(member.is_private());
        assert_eq!(member.display_name.as_deref(), Some("Ali"));
        assert_eq!(member.created.map(|created| created.year()), Some(2021));
    }

    #[test]
    fn member_without_privacy_block_is_public() {
        let payload = r#"{ "id": "fghij", "name": "Bob", "privacy": null }"#;
        let member: MemberRecord = serde_json::from_str::<ApiMember>(payload)
            .expect("member decodes")
            .into();

        assert!(!member.is_private());
        assert!(member.created.is_none());
    }
}
