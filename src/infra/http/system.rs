use axum::Json;
use axum::extract::{Path, State};
use pkblog_api_types::{MemberListEntry, MemberView, SystemView};

use crate::domain::entities::{MemberRecord, SystemRecord};

use super::HttpState;
use super::error::{ApiError, messages};

pub(super) async fn get_system(
    State(state): State<HttpState>,
) -> Result<Json<SystemView>, ApiError> {
    let system = state
        .identity
        .get_system()
        .await
        .map_err(|err| ApiError::upstream(messages::SYSTEM, &err))?;
    Ok(Json(system_view(system)))
}

pub(super) async fn list_members(
    State(state): State<HttpState>,
) -> Result<Json<Vec<MemberListEntry>>, ApiError> {
    let members = state
        .identity
        .list_members()
        .await
        .map_err(|err| ApiError::upstream(messages::MEMBERS, &err))?;

    Ok(Json(
        members
            .into_iter()
            .map(|member| MemberListEntry {
                display: member.display_name,
                name: member.name,
                id: member.id,
            })
            .collect(),
    ))
}

pub(super) async fn get_member(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Result<Json<MemberView>, ApiError> {
    let member = state
        .identity
        .get_member(&id)
        .await
        .map_err(|err| ApiError::upstream(messages::MEMBER, &err))?;
    Ok(Json(member_view(member)))
}

fn system_view(system: SystemRecord) -> SystemView {
    SystemView {
        id: system.id,
        name: system.name,
        avatar: system.avatar_url,
        banner: system.banner,
        color: system.color,
        created: system.created,
        description: system.description,
        tag: system.tag,
    }
}

fn member_view(member: MemberRecord) -> MemberView {
    MemberView {
        display: member.display_name,
        name: member.name,
        description: member.description,
        id: member.id,
        created: member.created,
        color: member.color,
        avatar: member.avatar_url,
        banner: member.banner,
        birthday: member.birthday,
        pronouns: member.pronouns,
    }
}
