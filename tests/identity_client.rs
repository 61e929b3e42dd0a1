use mockito::{Matcher, Server, ServerGuard};
use url::Url;

use pkblog::application::repos::{IdentityApi, IdentityError};
use pkblog::config::IdentitySettings;
use pkblog::infra::identity::PluralKitClient;

fn settings(server: &ServerGuard, token: Option<&str>) -> IdentitySettings {
    IdentitySettings {
        system_id: "exmpl".to_string(),
        base_url: Url::parse(&format!("{}/v2/", server.url())).expect("mock url parses"),
        token: token.map(str::to_string),
        user_agent: "pkblog-tests/1.0".to_string(),
    }
}

#[tokio::test]
async fn system_request_sends_bare_token_and_user_agent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/systems/exmpl")
        .match_header("authorization", "secret-token")
        .match_header("user-agent", "pkblog-tests/1.0")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "exmpl",
                "name": "The Den",
                "description": "hello",
                "tag": null,
                "avatar_url": "https://cdn.example/a.png",
                "banner": null,
                "color": "8a2be2",
                "created": "2020-01-01T00:00:00Z"
            }"#,
        )
        .create_async()
        .await;

    let client = PluralKitClient::new(&settings(&server, Some("secret-token"))).expect("client");
    let system = client.system("exmpl").await.expect("system fetched");

    mock.assert_async().await;
    assert_eq!(system.id, "exmpl");
    assert_eq!(system.name.as_deref(), Some("The Den"));
    assert_eq!(system.created.map(|created| created.year()), Some(2020));
}

#[tokio::test]
async fn requests_without_token_omit_authorization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/systems/exmpl/members")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                { "id": "aaaaa", "name": "Alice", "display_name": "Ali", "privacy": null },
                { "id": "bbbbb", "name": "Bob", "privacy": { "visibility": "private" } }
            ]"#,
        )
        .create_async()
        .await;

    let client = PluralKitClient::new(&settings(&server, None)).expect("client");
    let members = client.members("exmpl").await.expect("members fetched");

    mock.assert_async().await;
    assert_eq!(members.len(), 2);
    assert!(!members[0].is_private());
    assert!(members[1].is_private());
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/members/zzzzz")
        .with_status(404)
        .with_body(r#"{"message":"Member not found.","code":20002}"#)
        .create_async()
        .await;

    let client = PluralKitClient::new(&settings(&server, Some("t"))).expect("client");
    let err = client.member("zzzzz").await.expect_err("member lookup fails");

    assert!(matches!(err, IdentityError::Status { status: 404 }));
}

#[tokio::test]
async fn any_success_status_is_accepted() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/members/aaaaa")
        .with_status(203)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "id": "aaaaa", "name": "Alice" }"#)
        .create_async()
        .await;

    let client = PluralKitClient::new(&settings(&server, Some("t"))).expect("client");
    let member = client.member("aaaaa").await.expect("member fetched");

    assert_eq!(member.name, "Alice");
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/members/aaaaa")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "aaaaa"}"#)
        .create_async()
        .await;

    let client = PluralKitClient::new(&settings(&server, Some("t"))).expect("client");
    let err = client.member("aaaaa").await.expect_err("decode fails");

    assert!(matches!(err, IdentityError::Decode(_)));
}

#[tokio::test]
async fn member_ids_are_path_encoded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/members/a%2Fb")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "id": "a/b", "name": "Slash" }"#)
        .create_async()
        .await;

    let client = PluralKitClient::new(&settings(&server, Some("t"))).expect("client");
    let member = client.member("a/b").await.expect("member fetched");

    mock.assert_async().await;
    assert_eq!(member.name, "Slash");
}
