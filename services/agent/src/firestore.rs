//! Firestore-backed Curriculum Store
//!
//! This module implements `CurriculumStore` against the Firestore REST
//! v1 API using `reqwest`. Ordering is delegated to the server: the
//! pending query filters on `status == "pending"`, orders by `day`
//! ascending, and limits to one document, which satisfies the
//! minimum-`day` contract without client-side scanning.
//!
//! Firestore encodes typed values in JSON (`{"integerValue": "1"}`,
//! `{"stringValue": "pending"}`); the small codec below maps those onto
//! `LessonRecord`.

use crate::config::FirestoreConfig;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use synapse_core::lesson::{LessonRecord, LessonStatus};
use synapse_core::store::CurriculumStore;
use tracing::debug;

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

/// One typed Firestore value. Only the variants the lesson schema uses
/// are modeled; `integerValue` is a decimal string on the wire.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct FirestoreValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    string_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    integer_value: Option<String>,
}

impl FirestoreValue {
    fn string(value: &str) -> Self {
        Self {
            string_value: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn integer(value: u32) -> Self {
        Self {
            integer_value: Some(value.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Debug)]
struct FirestoreDocument {
    /// Full resource name, e.g.
    /// `projects/{p}/databases/(default)/documents/lessons/1`.
    name: String,
    fields: HashMap<String, FirestoreValue>,
}

/// One element of a `runQuery` response. Elements without a `document`
/// (e.g., a bare `readTime`) mean the query matched nothing.
#[derive(Deserialize, Debug)]
struct RunQueryItem {
    document: Option<FirestoreDocument>,
}

/// Builds the `structuredQuery` that selects the minimum-`day` pending
/// lesson.
fn pending_query_body(collection: &str) -> serde_json::Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "status" },
                    "op": "EQUAL",
                    "value": { "stringValue": LessonStatus::Pending.to_string() }
                }
            },
            "orderBy": [{
                "field": { "fieldPath": "day" },
                "direction": "ASCENDING"
            }],
            "limit": 1
        }
    })
}

fn string_field(doc: &FirestoreDocument, name: &str) -> Result<String> {
    doc.fields
        .get(name)
        .and_then(|value| value.string_value.clone())
        .with_context(|| format!("document '{}' has no string field '{}'", doc.name, name))
}

fn integer_field(doc: &FirestoreDocument, name: &str) -> Result<u32> {
    let raw = doc
        .fields
        .get(name)
        .and_then(|value| value.integer_value.as_deref())
        .with_context(|| format!("document '{}' has no integer field '{}'", doc.name, name))?;
    raw.parse::<u32>()
        .with_context(|| format!("field '{}' of document '{}' is not a u32", name, doc.name))
}

fn decode_document(doc: &FirestoreDocument) -> Result<LessonRecord> {
    let id = doc
        .name
        .rsplit('/')
        .next()
        .context("document has an empty resource name")?
        .to_string();
    let day = integer_field(doc, "day")?;
    let topic = string_field(doc, "topic")?;
    let status = LessonStatus::from_str(&string_field(doc, "status")?)?;

    Ok(LessonRecord {
        id,
        day,
        topic,
        status,
    })
}

fn lesson_fields(lesson: &LessonRecord) -> HashMap<String, FirestoreValue> {
    HashMap::from([
        ("day".to_string(), FirestoreValue::integer(lesson.day)),
        ("topic".to_string(), FirestoreValue::string(&lesson.topic)),
        (
            "status".to_string(),
            FirestoreValue::string(&lesson.status.to_string()),
        ),
    ])
}

/// A `CurriculumStore` backed by a Firestore collection.
pub struct FirestoreStore {
    http: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            FIRESTORE_BASE, self.config.project_id
        )
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.documents_url(), self.config.collection, id)
    }

    async fn fetch_lesson(&self, id: &str) -> Result<LessonRecord> {
        let response = self
            .http
            .get(self.document_url(id))
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .context("Firestore document get request failed")?
            .error_for_status()
            .context("Firestore document get returned an error status")?;

        let doc: FirestoreDocument = response
            .json()
            .await
            .context("Firestore returned an unreadable document")?;
        decode_document(&doc)
    }

    /// Writes the full lesson document, creating or replacing it, with
    /// the lesson ID as the document ID. Used by the seeder.
    pub async fn put_lesson(&self, lesson: &LessonRecord) -> Result<()> {
        self.http
            .patch(self.document_url(&lesson.id))
            .bearer_auth(&self.config.access_token)
            .json(&json!({ "fields": lesson_fields(lesson) }))
            .send()
            .await
            .context("Firestore document write request failed")?
            .error_for_status()
            .context("Firestore document write returned an error status")?;
        Ok(())
    }
}

#[async_trait]
impl CurriculumStore for FirestoreStore {
    async fn next_pending(&self) -> Result<Option<LessonRecord>> {
        let url = format!("{}:runQuery", self.documents_url());
        debug!(collection = %self.config.collection, "Querying for next pending lesson");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(&pending_query_body(&self.config.collection))
            .send()
            .await
            .context("Firestore runQuery request failed")?
            .error_for_status()
            .context("Firestore runQuery returned an error status")?;

        let items: Vec<RunQueryItem> = response
            .json()
            .await
            .context("Firestore returned an unreadable runQuery response")?;

        match items.into_iter().find_map(|item| item.document) {
            Some(doc) => Ok(Some(decode_document(&doc)?)),
            None => Ok(None),
        }
    }

    async fn mark_complete(&self, id: &str) -> Result<()> {
        let url = format!(
            "{}?updateMask.fieldPaths=status",
            self.document_url(id)
        );
        self.http
            .patch(&url)
            .bearer_auth(&self.config.access_token)
            .json(&json!({
                "fields": {
                    "status": FirestoreValue::string(&LessonStatus::Complete.to_string())
                }
            }))
            .send()
            .await
            .context("Firestore status update request failed")?
            .error_for_status()
            .context("Firestore status update returned an error status")?;

        // Read the document back and verify the write landed.
        let updated = self
            .fetch_lesson(id)
            .await
            .with_context(|| format!("could not read lesson '{}' back after status write", id))?;
        if updated.status != LessonStatus::Complete {
            bail!("status write for lesson '{}' did not verify", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document_json() -> &'static str {
        r#"{
            "name": "projects/test-project/databases/(default)/documents/lessons/1",
            "fields": {
                "day": { "integerValue": "1" },
                "topic": { "stringValue": "Gradient Descent" },
                "status": { "stringValue": "pending" }
            },
            "createTime": "2025-01-01T00:00:00.000000Z",
            "updateTime": "2025-01-01T00:00:00.000000Z"
        }"#
    }

    #[test]
    fn test_decode_document() {
        let doc: FirestoreDocument = serde_json::from_str(sample_document_json()).unwrap();
        let lesson = decode_document(&doc).unwrap();

        assert_eq!(lesson.id, "1");
        assert_eq!(lesson.day, 1);
        assert_eq!(lesson.topic, "Gradient Descent");
        assert_eq!(lesson.status, LessonStatus::Pending);
    }

    #[test]
    fn test_decode_document_missing_field() {
        let doc: FirestoreDocument = serde_json::from_str(
            r#"{
                "name": "projects/p/databases/(default)/documents/lessons/2",
                "fields": { "day": { "integerValue": "2" } }
            }"#,
        )
        .unwrap();

        let err = decode_document(&doc).unwrap_err();
        assert!(err.to_string().contains("topic"));
    }

    #[test]
    fn test_decode_document_rejects_unknown_status() {
        let doc: FirestoreDocument = serde_json::from_str(
            r#"{
                "name": "projects/p/databases/(default)/documents/lessons/3",
                "fields": {
                    "day": { "integerValue": "3" },
                    "topic": { "stringValue": "Overfitting" },
                    "status": { "stringValue": "paused" }
                }
            }"#,
        )
        .unwrap();

        assert!(decode_document(&doc).is_err());
    }

    #[test]
    fn test_run_query_response_with_document() {
        let body = format!(r#"[{{ "document": {} }}]"#, sample_document_json());
        let items: Vec<RunQueryItem> = serde_json::from_str(&body).unwrap();

        let doc = items.into_iter().find_map(|item| item.document).unwrap();
        assert_eq!(decode_document(&doc).unwrap().day, 1);
    }

    #[test]
    fn test_empty_run_query_response() {
        // Firestore answers an empty match with a bare readTime element.
        let body = r#"[{ "readTime": "2025-01-01T00:00:00.000000Z" }]"#;
        let items: Vec<RunQueryItem> = serde_json::from_str(body).unwrap();

        assert!(items.into_iter().find_map(|item| item.document).is_none());
    }

    #[test]
    fn test_pending_query_body_shape() {
        let body = pending_query_body("lessons");
        let query = &body["structuredQuery"];

        assert_eq!(query["from"][0]["collectionId"], "lessons");
        assert_eq!(query["where"]["fieldFilter"]["field"]["fieldPath"], "status");
        assert_eq!(query["where"]["fieldFilter"]["op"], "EQUAL");
        assert_eq!(
            query["where"]["fieldFilter"]["value"]["stringValue"],
            "pending"
        );
        assert_eq!(query["orderBy"][0]["field"]["fieldPath"], "day");
        assert_eq!(query["orderBy"][0]["direction"], "ASCENDING");
        assert_eq!(query["limit"], 1);
    }

    #[test]
    fn test_lesson_fields_encoding() {
        let lesson = LessonRecord {
            id: "3".to_string(),
            day: 3,
            topic: "Overfitting".to_string(),
            status: LessonStatus::Pending,
        };

        let fields = serde_json::to_value(lesson_fields(&lesson)).unwrap();
        assert_eq!(fields["day"]["integerValue"], "3");
        assert_eq!(fields["topic"]["stringValue"], "Overfitting");
        assert_eq!(fields["status"]["stringValue"], "pending");
        // Unset variants must not appear on the wire.
        assert!(fields["day"].get("stringValue").is_none());
    }

    #[test]
    fn test_document_urls() {
        let store = FirestoreStore::new(FirestoreConfig {
            project_id: "test-project".to_string(),
            access_token: "token".to_string(),
            collection: "lessons".to_string(),
        });

        assert_eq!(
            store.document_url("7"),
            "https://firestore.googleapis.com/v1/projects/test-project/databases/(default)/documents/lessons/7"
        );
    }
}
