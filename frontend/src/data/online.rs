use super::{StoreFuture, WheelBackend};
use crate::config::AppMode;
use futures::future::FutureExt;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::api::{ErrorResponse, NewOptionRequest, Snapshot, FOODS_ENDPOINT, HISTORY_ENDPOINT, SNAPSHOT_ENDPOINT};
use shared::store::{HistoryEntry, NewHistoryEntry, StoreError};
use shared::wheel::WheelOption;

/// Talks to the backend's document store over HTTP.
pub struct OnlineBackend {
    base_url: String,
}

impl OnlineBackend {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn network_error(e: gloo_net::Error) -> StoreError {
    log::error!("Network error: {:?}", e);
    StoreError::Backend("Network error".to_string())
}

async fn check(response: Response) -> Result<Response, StoreError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => format!("Error status: {}", status),
    };
    Err(StoreError::Backend(message))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let response = check(response).await?;
    response.json::<T>().await.map_err(|e| {
        log::error!("Failed to parse response: {:?}", e);
        StoreError::Backend("Unexpected response from server".to_string())
    })
}

impl WheelBackend for OnlineBackend {
    fn mode(&self) -> AppMode {
        AppMode::Online
    }

    fn snapshot(&self) -> StoreFuture<Snapshot> {
        let url = self.url(SNAPSHOT_ENDPOINT);
        async move {
            let response = Request::get(&url).send().await.map_err(network_error)?;
            read_json(response).await
        }
        .boxed_local()
    }

    fn add_option(&self, label: String) -> StoreFuture<WheelOption> {
        let url = self.url(FOODS_ENDPOINT);
        async move {
            let response = Request::post(&url)
                .json(&NewOptionRequest { label })
                .map_err(network_error)?
                .send()
                .await
                .map_err(network_error)?;
            read_json(response).await
        }
        .boxed_local()
    }

    fn remove_option(&self, id: String) -> StoreFuture<()> {
        let url = self.url(&format!("{}/{}", FOODS_ENDPOINT, id));
        async move {
            let response = Request::delete(&url).send().await.map_err(network_error)?;
            check(response).await.map(|_| ())
        }
        .boxed_local()
    }

    fn append_history(&self, entry: NewHistoryEntry) -> StoreFuture<HistoryEntry> {
        let url = self.url(HISTORY_ENDPOINT);
        async move {
            let response = Request::post(&url)
                .json(&entry)
                .map_err(network_error)?
                .send()
                .await
                .map_err(network_error)?;
            read_json(response).await
        }
        .boxed_local()
    }

    fn clear_history(&self) -> StoreFuture<()> {
        let url = self.url(HISTORY_ENDPOINT);
        async move {
            let response = Request::delete(&url).send().await.map_err(network_error)?;
            check(response).await.map(|_| ())
        }
        .boxed_local()
    }
}
