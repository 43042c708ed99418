//! API Client
//!
//! Typed calls against the backend REST API. All authenticated calls go
//! through one helper that attaches the bearer token, classifies failures
//! into [`ApiError`] and ends the session on a 401.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::rc::Rc;

use super::dto::*;
use super::endpoints::Endpoints;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::error::{ApiError, ApiResult};
use crate::session::Session;

/// HTTP status that ends the session
const UNAUTHORIZED: u16 = 401;

/// Client for the chatbot backend
pub struct ApiClient<T> {
    transport: Rc<T>,
    endpoints: Endpoints,
    session: Session,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            endpoints: self.endpoints.clone(),
            session: self.session.clone(),
        }
    }
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(transport: T, endpoints: Endpoints, session: Session) -> Self {
        Self {
            transport: Rc::new(transport),
            endpoints,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // ============ Request helpers ============

    /// Send a request and decode a successful body as `R`
    async fn execute<R: DeserializeOwned>(&self, request: HttpRequest) -> ApiResult<R> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(error = %e, "request failed before a response arrived");
            ApiError::Network(e)
        })?;

        if response.status == UNAUTHORIZED {
            self.session.expire();
            return Err(ApiError::Unauthorized {
                message: error_message(&response),
            });
        }

        if !response.is_success() {
            let message = error_message(&response);
            tracing::warn!(status = response.status, message = ?message, "backend returned an error");
            return Err(ApiError::Status {
                status: response.status,
                message,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            tracing::warn!(error = %e, "unexpected response body");
            ApiError::Malformed(e.to_string())
        })
    }

    /// Send a request with the session's bearer token.
    ///
    /// Without a credential nothing is sent.
    async fn authed<R: DeserializeOwned>(&self, request: HttpRequest) -> ApiResult<R> {
        let token = self.session.token().ok_or(ApiError::NotSignedIn)?;
        self.execute(request.bearer(token)).await
    }

    // ============ Auth ============

    /// Exchange credentials for a token
    pub async fn sign_in(&self, body: &SignInRequest) -> ApiResult<TokenResponse> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Encoding(e.to_string()))?;
        self.execute(HttpRequest::post(self.endpoints.signin(), body))
            .await
    }

    /// Register an account and its organization
    pub async fn sign_up(&self, body: &SignUpRequest) -> ApiResult<TokenResponse> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Encoding(e.to_string()))?;
        self.execute(HttpRequest::post(self.endpoints.signup(), body))
            .await
    }

    // ============ Profile ============

    pub async fn profile(&self) -> ApiResult<UserProfile> {
        let response: ProfileResponse = self
            .authed(HttpRequest::get(self.endpoints.profile()))
            .await?;
        Ok(response.user)
    }

    // ============ Chat ============

    pub async fn list_threads(&self) -> ApiResult<Vec<Thread>> {
        let response: ThreadListResponse = self
            .authed(HttpRequest::get(self.endpoints.threads()))
            .await?;
        Ok(response.threads)
    }

    pub async fn create_thread(&self, name: &str, description: &str) -> ApiResult<CreatedThread> {
        let body = serde_json::to_value(CreateThreadRequest {
            name: name.to_string(),
            description: description.to_string(),
        })
        .map_err(|e| ApiError::Encoding(e.to_string()))?;

        self.authed(HttpRequest::post(self.endpoints.threads(), body))
            .await
    }

    pub async fn thread(&self, thread_id: &str) -> ApiResult<ThreadDetail> {
        self.authed(HttpRequest::get(self.endpoints.thread(thread_id)))
            .await
    }

    /// Send a message with its conversation context; returns the reply text
    pub async fn query_thread(
        &self,
        thread_id: &str,
        message: &str,
        context: &str,
    ) -> ApiResult<String> {
        let body = serde_json::to_value(QueryRequest {
            message: message.to_string(),
            context: context.to_string(),
        })
        .map_err(|e| ApiError::Encoding(e.to_string()))?;

        let response: QueryResponse = self
            .authed(HttpRequest::post(self.endpoints.thread_query(thread_id), body))
            .await?;
        Ok(response.response)
    }

    // ============ Billing ============

    /// Usage totals of the current billing period
    pub async fn usage(&self) -> ApiResult<UsagePeriod> {
        let response: UsageResponse = self
            .authed(HttpRequest::get(self.endpoints.usage()))
            .await?;
        Ok(response.usage)
    }

    /// Usage broken down within `[start, end]`
    pub async fn usage_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ApiResult<UsagePeriod> {
        let response: UsageResponse = self
            .authed(HttpRequest::get(self.endpoints.usage_range(start, end)))
            .await?;
        Ok(response.usage)
    }
}

/// Message carried by an error response body, if it parses
fn error_message(response: &HttpResponse) -> Option<String> {
    serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.text())
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::api::transport::{Method, MockHttpTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_authed_request_sends_bearer_token() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .withf(|req: &HttpRequest| {
                req.method == Method::Get
                    && req.url == "http://api.test/chat/thread"
                    && req.bearer.is_some()
            })
            .returning(|_| ok(json!({ "threads": [{ "ID": "t_1", "Name": "General" }] })));

        let client = signed_in_client(mock);
        let threads = client.list_threads().await.unwrap();

        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].name, "General");
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| status(401, json!({ "message": "token expired" })));

        let client = signed_in_client(mock);
        let err = client.profile().await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Unauthorized {
                message: Some("token expired".to_string())
            }
        );
        assert!(client.session().token().is_none());
    }

    #[tokio::test]
    async fn test_no_token_sends_nothing() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send().times(0);

        let client = anonymous_client(mock);
        assert_eq!(client.usage().await.unwrap_err(), ApiError::NotSignedIn);
    }

    #[tokio::test]
    async fn test_error_taxonomy() {
        let mut mock = MockHttpTransport::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err("connection refused".to_string()));
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| status(500, json!({ "error": "thread not found" })));
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, "<html>gateway</html>")));
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(502, "Bad Gateway")));

        let client = signed_in_client(mock);

        assert!(matches!(client.thread("t_1").await, Err(ApiError::Network(_))));
        assert_eq!(
            client.thread("t_1").await.unwrap_err(),
            ApiError::Status {
                status: 500,
                message: Some("thread not found".to_string())
            }
        );
        assert!(matches!(client.thread("t_1").await, Err(ApiError::Malformed(_))));
        assert_eq!(
            client.thread("t_1").await.unwrap_err(),
            ApiError::Status {
                status: 502,
                message: None
            }
        );

        // Only a 401 ends the session
        assert!(client.session().token().is_some());
    }

    #[tokio::test]
    async fn test_query_thread_sends_message_and_context() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .withf(|req: &HttpRequest| {
                req.url == "http://api.test/chat/thread/t_1/query"
                    && req.body
                        == Some(json!({ "message": "hi", "context": "User: earlier\n" }))
            })
            .returning(|_| ok(json!({ "response": "hello!" })));

        let client = signed_in_client(mock);
        let reply = client
            .query_thread("t_1", "hi", "User: earlier\n")
            .await
            .unwrap();

        assert_eq!(reply, "hello!");
    }

    #[tokio::test]
    async fn test_sign_in_is_not_authenticated() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .withf(|req: &HttpRequest| req.bearer.is_none() && req.url.ends_with("/user/signin"))
            .returning(|_| ok(json!({ "token": "a.b.c" })));

        let client = anonymous_client(mock);
        let response = client
            .sign_in(&SignInRequest {
                email: "ada@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.token.as_deref(), Some("a.b.c"));
    }
}
