//! Firebase Realtime Database client
//!
//! Talks to the database through its REST API: every path is addressed as
//! `{database_url}/{collection}/{id}.json`, authenticated with the optional
//! `auth` query parameter (database secret or ID token).

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use super::{DocumentStore, StoreError, StoreResult};

/// Body of a successful POST: the generated child key
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

/// Error body returned by the REST API
#[derive(Debug, Deserialize)]
struct FirebaseErrorResponse {
    #[serde(default)]
    error: String,
}

/// Firebase Realtime Database REST client
pub struct FirebaseStore {
    http_client: Client,
    database_url: String,
    auth_token: Option<String>,
}

impl FirebaseStore {
    /// Create a new client for the database at `database_url`
    ///
    /// The client carries no request timeout; a slow request is bounded only
    /// by the transport.
    pub fn new(database_url: &str, auth_token: Option<String>) -> StoreResult<Self> {
        let http_client = Client::builder()
            .user_agent("KindMealCore/1.0 (donation-service)")
            .build()?;

        let database_url = database_url.trim_end_matches('/').to_string();

        info!("Firebase store initialized for database: {}", database_url);

        Ok(Self {
            http_client,
            database_url,
            auth_token,
        })
    }

    /// URL of a collection root
    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/{}.json",
            self.database_url,
            urlencoding::encode(collection)
        )
    }

    /// URL of a single document
    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.database_url,
            urlencoding::encode(collection),
            urlencoding::encode(id)
        )
    }

    fn auth_query(&self) -> Vec<(&'static str, &str)> {
        match self.auth_token {
            Some(ref token) => vec![("auth", token.as_str())],
            None => Vec::new(),
        }
    }

    /// Turn a non-2xx response into `StoreError::Rejected`, keeping the
    /// server's message
    async fn check(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<FirebaseErrorResponse>(&body)
            .ok()
            .map(|e| e.error)
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        error!("Firebase API error: HTTP {} - {}", status, message);
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json(response: Response) -> StoreResult<Value> {
        response.json::<Value>().await.map_err(|e| {
            error!("Failed to parse Firebase response: {}", e);
            StoreError::Decode(format!("Failed to parse response body: {}", e))
        })
    }
}

/// Flatten a collection snapshot into `(key, document)` pairs
///
/// The database returns objects for generated keys, but collapses children
/// with small integer keys into a JSON array with `null` holes.
fn snapshot_entries(snapshot: Value) -> StoreResult<Vec<(String, Value)>> {
    match snapshot {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => {
            // Generated keys sort chronologically. The map is only key-ordered
            // while no crate in the build enables serde_json's `preserve_order`.
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(entries)
        }
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect()),
        other => Err(StoreError::Decode(format!(
            "Expected a collection object, got: {}",
            other
        ))),
    }
}

#[async_trait]
impl DocumentStore for FirebaseStore {
    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>> {
        let url = self.collection_url(collection);
        debug!("Listing Firebase collection: {}", url);

        let response = self
            .http_client
            .get(&url)
            .query(&self.auth_query())
            .send()
            .await?;

        let snapshot = Self::read_json(Self::check(response).await?).await?;
        snapshot_entries(snapshot)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let url = self.document_url(collection, id);
        debug!("Fetching Firebase document: {}", url);

        let response = self
            .http_client
            .get(&url)
            .query(&self.auth_query())
            .send()
            .await?;

        let value = Self::read_json(Self::check(response).await?).await?;
        Ok(match value {
            Value::Null => None,
            other => Some(other),
        })
    }

    async fn push(&self, collection: &str, document: Value) -> StoreResult<String> {
        let url = self.collection_url(collection);
        debug!("Pushing Firebase document: {}", url);

        let response = self
            .http_client
            .post(&url)
            .query(&self.auth_query())
            .json(&document)
            .send()
            .await?;

        let pushed = Self::check(response)
            .await?
            .json::<PushResponse>()
            .await
            .map_err(|e| StoreError::Decode(format!("Failed to parse push response: {}", e)))?;

        Ok(pushed.name)
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        let url = self.document_url(collection, id);
        debug!("Writing Firebase document: {}", url);

        let response = self
            .http_client
            .put(&url)
            .query(&self.auth_query())
            .json(&document)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        let url = self.document_url(collection, id);
        debug!("Patching Firebase document: {}", url);

        let response = self
            .http_client
            .patch(&url)
            .query(&self.auth_query())
            .json(&fields)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()> {
        let url = self.document_url(collection, id);
        debug!("Deleting Firebase document: {}", url);

        let response = self
            .http_client
            .delete(&url)
            .query(&self.auth_query())
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_url_encodes_segments() {
        let store = FirebaseStore::new("https://kindmeal-default-rtdb.firebaseio.com/", None)
            .expect("client should build");

        assert_eq!(
            store.collection_url("donations"),
            "https://kindmeal-default-rtdb.firebaseio.com/donations.json"
        );
        assert_eq!(
            store.document_url("donations", "-Nx1/a b"),
            "https://kindmeal-default-rtdb.firebaseio.com/donations/-Nx1%2Fa%20b.json"
        );
    }

    #[test]
    fn test_auth_query_only_when_token_set() {
        let anonymous = FirebaseStore::new("https://db.example", None).unwrap();
        assert!(anonymous.auth_query().is_empty());

        let secured = FirebaseStore::new("https://db.example", Some("s3cret".to_string())).unwrap();
        assert_eq!(secured.auth_query(), vec![("auth", "s3cret")]);
    }

    #[test]
    fn test_snapshot_entries_object_is_key_ordered() {
        let entries = snapshot_entries(json!({
            "-Nb": { "donationName": "second" },
            "-Na": { "donationName": "first" }
        }))
        .unwrap();

        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["-Na", "-Nb"]);
    }

    #[test]
    fn test_snapshot_entries_array_skips_holes() {
        let entries = snapshot_entries(json!([null, { "a": 1 }, null, { "b": 2 }])).unwrap();

        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["1", "3"]);
    }

    #[test]
    fn test_snapshot_entries_null_and_scalar() {
        assert!(snapshot_entries(Value::Null).unwrap().is_empty());
        assert!(matches!(
            snapshot_entries(json!("oops")),
            Err(StoreError::Decode(_))
        ));
    }
}
