use api_types::{
    CollectionKind, ErrorResponse,
    entry::{Entry, EntryListResponse, EntryPatch, NewEntry},
};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use uuid::Uuid;

use crate::{Result, Storage, StorageError};

/// Backend speaking the generic entries REST API:
///
/// - `GET    /entries/{kind}`
/// - `POST   /entries/{kind}`
/// - `DELETE /entries/{kind}/{id}`
/// - `PATCH  /entries/{kind}/{id}`
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: Url,
    http: reqwest::Client,
}

impl RestStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| StorageError::Backend(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn collection_url(&self, kind: CollectionKind) -> Result<Url> {
        self.base_url
            .join(&format!("entries/{}", kind.as_str()))
            .map_err(|err| StorageError::Backend(format!("invalid base_url: {err}")))
    }

    fn entry_url(&self, kind: CollectionKind, id: Uuid) -> Result<Url> {
        self.base_url
            .join(&format!("entries/{}/{id}", kind.as_str()))
            .map_err(|err| StorageError::Backend(format!("invalid base_url: {err}")))
    }
}

/// Maps a non-success response to a typed error, reading the server's
/// `{"error": ...}` body when there is one.
async fn error_for(res: reqwest::Response) -> StorageError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());

    match status {
        StatusCode::NOT_FOUND => StorageError::NotFound,
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
            StorageError::Validation(body)
        }
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => {
            StorageError::Unavailable(body)
        }
        _ => StorageError::Backend(body),
    }
}

#[async_trait]
impl Storage for RestStore {
    async fn add_entry(&self, kind: CollectionKind, data: NewEntry) -> Result<Entry> {
        let res = self
            .http
            .post(self.collection_url(kind)?)
            .json(&data)
            .send()
            .await?;
        if res.status().is_success() {
            return Ok(res.json::<Entry>().await?);
        }
        Err(error_for(res).await)
    }

    async fn delete_entry(&self, kind: CollectionKind, id: Uuid) -> Result<()> {
        let res = self.http.delete(self.entry_url(kind, id)?).send().await?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(error_for(res).await)
    }

    async fn list_entries(&self, kind: CollectionKind) -> Result<Vec<Entry>> {
        let res = self.http.get(self.collection_url(kind)?).send().await?;
        if res.status().is_success() {
            return Ok(res.json::<EntryListResponse>().await?.entries);
        }
        Err(error_for(res).await)
    }

    async fn update_entry(
        &self,
        kind: CollectionKind,
        id: Uuid,
        patch: EntryPatch,
    ) -> Result<Entry> {
        let res = self
            .http
            .patch(self.entry_url(kind, id)?)
            .json(&patch)
            .send()
            .await?;
        if res.status().is_success() {
            return Ok(res.json::<Entry>().await?);
        }
        Err(error_for(res).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_embed_collection_and_id() {
        let store = RestStore::new("http://127.0.0.1:3000/").unwrap();
        let id = Uuid::nil();
        assert_eq!(
            store.collection_url(CollectionKind::Media).unwrap().path(),
            "/entries/media"
        );
        assert_eq!(
            store.entry_url(CollectionKind::Finance, id).unwrap().path(),
            format!("/entries/finance/{id}")
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(RestStore::new("not a url").is_err());
    }

    #[tokio::test]
    async fn unreachable_server_maps_to_unavailable() {
        // Port 9 (discard) is not listening in the test environment.
        let store = RestStore::new("http://127.0.0.1:9/").unwrap();
        let err = store
            .list_entries(CollectionKind::Finance)
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }
}
