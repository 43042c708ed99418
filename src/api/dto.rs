//! Data Transfer Objects
//!
//! Request and response bodies of the backend REST API. Field names follow
//! the wire format: the chat endpoints serialize Go structs verbatim
//! (`ID`, `CreatedAt`, ...), the profile and billing endpoints use camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================
// AUTH DTOs
// ============================================

/// `POST /user/signin`
#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// `POST /user`
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company_description: String,
    pub company_url: String,
    pub legal_company_name: String,
}

/// Response of both auth endpoints.
///
/// Sign-up may answer with only a confirmation message.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================
// PROFILE DTOs
// ============================================

/// `GET /user/profile`
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// User identity plus organization branding
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub last_modified_at: String,
    pub org_id: String,
    pub org_name: String,
    pub org_description: String,
    #[serde(rename = "orgURL")]
    pub org_url: String,
    #[serde(rename = "orgLogoURL")]
    pub org_logo_url: String,
    #[serde(rename = "orgFavIconURL")]
    pub org_fav_icon_url: String,
    pub org_privacy_policy: String,
    pub org_support_email: String,
    pub org_terms_of_use: String,
    pub plan_name: String,
    pub role_type: String,
}

// ============================================
// CHAT DTOs
// ============================================

/// A conversation container
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Thread {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "UpdatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "UserID", default)]
    pub user_id: Option<String>,
    #[serde(rename = "OrgID", default)]
    pub org_id: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
}

/// `GET /chat/thread`
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub threads: Vec<Thread>,
}

/// `POST /chat/thread`
#[derive(Debug, Clone, Serialize)]
pub struct CreateThreadRequest {
    pub name: String,
    pub description: String,
}

/// Identifier of a freshly created thread
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedThread {
    #[serde(rename = "threadId", alias = "thread_id")]
    pub thread_id: String,
    #[serde(rename = "threadName", alias = "thread_name", default)]
    pub thread_name: Option<String>,
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Sent by the user
    Query,
    /// Produced by the assistant
    Response,
}

/// One entry of a thread's history
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    #[serde(rename = "CreatedAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "ThreadID", default)]
    pub thread_id: String,
    #[serde(rename = "Content", default)]
    pub content: String,
    #[serde(rename = "MessageType")]
    pub kind: MessageKind,
}

impl Message {
    /// Build a message locally, stamped with the current time
    pub fn local(thread_id: &str, content: &str, kind: MessageKind) -> Self {
        Self {
            created_at: Utc::now(),
            thread_id: thread_id.to_string(),
            content: content.to_string(),
            kind,
        }
    }
}

/// `GET /chat/thread/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadDetail {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thread_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<Message>,
}

/// `POST /chat/thread/{id}/query`
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub message: String,
    pub context: String,
}

/// Assistant reply to a query
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

// ============================================
// BILLING DTOs
// ============================================

/// Consumption of one billing dimension over a time window
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub dimension: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// Usage records of a billing period
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagePeriod {
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage: Vec<UsageRecord>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// `GET /billing/usage` and `GET /billing/usage/range/{start}/{end}`
#[derive(Debug, Clone, Deserialize)]
pub struct UsageResponse {
    pub usage: UsagePeriod,
}

// ============================================
// ERROR DTOs
// ============================================

/// Error body returned by the backend.
///
/// The backend sometimes serializes a wrapped Go error as an object under
/// `error`, so that field is kept loosely typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `message`, else a string `error`, ignoring blanks
    pub fn text(&self) -> Option<String> {
        let message = self.message.as_deref().filter(|m| !m.trim().is_empty());
        let error = self
            .error
            .as_ref()
            .and_then(|e| e.as_str())
            .filter(|e| !e.trim().is_empty());

        message.or(error).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thread_uses_go_field_names() {
        let body = json!({
            "threads": [{
                "ID": "t_1",
                "Name": "Q3 Planning",
                "CreatedAt": "2024-07-01T10:00:00.123456Z",
                "UpdatedAt": "2024-07-01T10:05:00Z",
                "UserID": "u_1"
            }]
        });

        let list: ThreadListResponse = serde_json::from_value(body).unwrap();
        assert_eq!(list.threads.len(), 1);
        assert_eq!(list.threads[0].id, "t_1");
        assert_eq!(list.threads[0].name, "Q3 Planning");
        assert_eq!(list.threads[0].user_id.as_deref(), Some("u_1"));
        assert!(list.threads[0].org_id.is_none());
    }

    #[test]
    fn test_null_thread_list_is_empty() {
        let list: ThreadListResponse = serde_json::from_value(json!({ "threads": null })).unwrap();
        assert!(list.threads.is_empty());
    }

    #[test]
    fn test_created_thread_accepts_both_spellings() {
        let camel: CreatedThread = serde_json::from_value(json!({ "threadId": "t_1" })).unwrap();
        let snake: CreatedThread =
            serde_json::from_value(json!({ "thread_id": "t_2", "thread_name": "x" })).unwrap();

        assert_eq!(camel.thread_id, "t_1");
        assert_eq!(snake.thread_id, "t_2");
        assert_eq!(snake.thread_name.as_deref(), Some("x"));
    }

    #[test]
    fn test_message_kind_wire_format() {
        let msg: Message = serde_json::from_value(json!({
            "CreatedAt": "2024-07-01T10:00:00Z",
            "MessageID": "m_1",
            "ThreadID": "t_1",
            "Content": "hello",
            "MessageType": "response"
        }))
        .unwrap();

        assert_eq!(msg.kind, MessageKind::Response);
        assert_eq!(serde_json::to_value(MessageKind::Query).unwrap(), json!("query"));
    }

    #[test]
    fn test_profile_field_names() {
        let profile: ProfileResponse = serde_json::from_value(json!({
            "user": {
                "id": "u_1",
                "name": "Ada",
                "email": "ada@example.com",
                "orgName": "Analytical Engines",
                "orgURL": "https://www.engines.example",
                "planName": "Pro",
                "roleType": "root"
            }
        }))
        .unwrap();

        assert_eq!(profile.user.org_url, "https://www.engines.example");
        assert_eq!(profile.user.plan_name, "Pro");
        assert_eq!(profile.user.org_description, "");
    }

    #[test]
    fn test_usage_summary_shape() {
        let usage: UsageResponse = serde_json::from_value(json!({
            "usage": {
                "usage": [
                    { "dimension": "Storage GiB hours", "total": 12.5,
                      "startTime": "2024-07-01T00:00:00Z", "endTime": "2024-07-31T23:59:59Z" }
                ],
                "startTime": "2024-07-01T00:00:00Z",
                "endTime": "2024-07-31T23:59:59Z"
            }
        }))
        .unwrap();

        assert_eq!(usage.usage.usage.len(), 1);
        assert_eq!(usage.usage.usage[0].total, 12.5);
        assert!(usage.usage.start_time.is_some());
    }

    #[test]
    fn test_error_body_text() {
        let body: ErrorBody = serde_json::from_value(json!({ "message": "nope", "error": "x" })).unwrap();
        assert_eq!(body.text().as_deref(), Some("nope"));

        let body: ErrorBody = serde_json::from_value(json!({ "error": "forbidden" })).unwrap();
        assert_eq!(body.text().as_deref(), Some("forbidden"));

        let body: ErrorBody = serde_json::from_value(json!({ "error": {} })).unwrap();
        assert_eq!(body.text(), None);
    }
}
