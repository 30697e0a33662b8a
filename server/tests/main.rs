// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::net::SocketAddr;

use anyhow::Result;
use http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use snapcomps_core::{Context, StaticEnv};
use snapcomps_server::{app, AppState};

/// Serve the app on a random local port with an empty env and no transport.
async fn spawn_app() -> Result<SocketAddr> {
    spawn_state(AppState::new(Context::new().with_env(StaticEnv::default()))).await
}

async fn spawn_state(state: AppState) -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });
    Ok(addr)
}

async fn read_json(resp: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = resp.status();
    let body = resp.bytes().await?;
    Ok((status, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn test_vision_routes() -> Result<()> {
    let addr = spawn_app().await?;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/api/vision");

    let (status, body) = read_json(client.get(&url).send().await?).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "error": "POST only" }));

    let (status, body) = read_json(
        client
            .post(&url)
            .header("content-type", "application/json")
            .body(r#"{"imageBase64":"aGVsbG8="}"#)
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing imageBase64" }));

    let (status, body) = read_json(client.post(&url).body("not json").send().await?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing imageBase64" }));

    let (status, body) = read_json(
        client
            .post(&url)
            .body(r#"{"imageBase64":"data:image/png;base64,aGVsbG8="}"#)
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Missing AWS credentials" }));
    Ok(())
}

#[tokio::test]
async fn test_comps_routes() -> Result<()> {
    let addr = spawn_app().await?;
    let client = reqwest::Client::new();

    let (status, body) = read_json(
        client
            .get(format!("http://{addr}/api/comps?q=%20"))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing q (query)" }));

    let (status, body) = read_json(
        client
            .get(format!("http://{addr}/api/comps?q=lego&category=toys"))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "query": "lego",
            "stats": { "p25": 0.0, "p50": 0.0, "p75": 0.0, "sample": 0, "source": "active-ebay" },
            "items": [],
            "web": [],
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_unknown_route() -> Result<()> {
    let addr = spawn_app().await?;

    let resp = reqwest::get(format!("http://{addr}/api/unknown")).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_body_over_limit() -> Result<()> {
    let state = AppState::new(Context::new().with_env(StaticEnv::default())).with_body_limit(16);
    let addr = spawn_state(state).await?;
    let client = reqwest::Client::new();

    for path in ["vision", "comps"] {
        let (status, body) = read_json(
            client
                .post(format!("http://{addr}/api/{path}"))
                .header("content-type", "application/json")
                .body(format!(r#"{{"imageBase64":"{}"}}"#, "A".repeat(64)))
                .send()
                .await?,
        )
        .await?;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].is_string(), "{path}: {body}");
    }
    Ok(())
}
