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

use log::info;
use snapcomps_server::{app, default_context, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ctx = default_context();
    let cfg = ServerConfig::from_env(&ctx)?;

    let listener = tokio::net::TcpListener::bind(cfg.listen).await?;
    info!("snapcomps listening on {}", listener.local_addr()?);
    axum::serve(listener, app(AppState::new(ctx))).await?;

    Ok(())
}
