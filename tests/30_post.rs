mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

/// Signup a fresh user and return (userid, bearer token).
async fn signup(base_url: &str, prefix: &str) -> Result<(String, String)> {
    let client = reqwest::Client::new();
    let userid = common::unique_userid(prefix);

    let res = client
        .post(format!("{}/auth/signup", base_url))
        .json(&json!({
            "userid": userid,
            "password": "1234",
            "name": "Test User",
            "email": "test@example.com",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let token = body["data"]["token"].as_str().expect("token").to_string();
    Ok((userid, token))
}

#[tokio::test]
async fn post_crud_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await {
        eprintln!("skipping post_crud_round_trip: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();
    let (userid, token) = signup(&server.base_url, "author").await?;

    // Create
    let res = client
        .post(format!("{}/post", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "text": "  hello from the integration suite  " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let post_id = body["data"]["id"].as_str().expect("post id").to_string();
    // The chain trimmed the text before the handler saw it
    assert_eq!(body["data"]["text"], "hello from the integration suite");
    assert_eq!(body["data"]["userid"], userid.as_str());

    // Get by id returns the same text and author
    let res = client
        .get(format!("{}/post/{}", server.base_url, post_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["text"], "hello from the integration suite");
    assert_eq!(body["data"]["userid"], userid.as_str());

    // The author filter finds it; a fresh author's filter does not
    let res = client
        .get(format!("{}/post?userid={}", server.base_url, userid))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let listed = body["data"].as_array().expect("post list");
    assert!(listed.iter().any(|p| p["id"] == post_id.as_str()));
    assert!(listed.iter().all(|p| p["userid"] == userid.as_str()));

    // Update
    let res = client
        .put(format!("{}/post/{}", server.base_url, post_id))
        .bearer_auth(&token)
        .json(&json!({ "text": "edited text" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["text"], "edited text");

    let res = client
        .get(format!("{}/post/{}", server.base_url, post_id))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["text"], "edited text");

    // Delete, then the post is gone
    let res = client
        .delete(format!("{}/post/{}", server.base_url, post_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/post/{}", server.base_url, post_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn update_and_delete_enforce_ownership() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await {
        eprintln!("skipping update_and_delete_enforce_ownership: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let (_author, author_token) = signup(&server.base_url, "owner").await?;
    let (_other, other_token) = signup(&server.base_url, "intruder").await?;

    let res = client
        .post(format!("{}/post", server.base_url))
        .bearer_auth(&author_token)
        .json(&json!({ "text": "mine alone" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let post_id = body["data"]["id"].as_str().expect("post id").to_string();

    // A different identity may read but not write
    let res = client
        .get(format!("{}/post/{}", server.base_url, post_id))
        .bearer_auth(&other_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .put(format!("{}/post/{}", server.base_url, post_id))
        .bearer_auth(&other_token)
        .json(&json!({ "text": "hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/post/{}", server.base_url, post_id))
        .bearer_auth(&other_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The row is unchanged for the author
    let res = client
        .get(format!("{}/post/{}", server.base_url, post_id))
        .bearer_auth(&author_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["text"], "mine alone");

    Ok(())
}

#[tokio::test]
async fn missing_post_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await {
        eprintln!("skipping missing_post_is_not_found: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();
    let (_userid, token) = signup(&server.base_url, "reader").await?;

    let res = client
        .get(format!(
            "{}/post/00000000-0000-0000-0000-000000000000",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "NOT_FOUND");

    Ok(())
}
