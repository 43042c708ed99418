//! Chat page controller
//!
//! Holds the thread list, the selected thread and its messages. Sent messages
//! are shown immediately; the reply is appended once the backend answers. A
//! failed send keeps the query bubble and only raises the banner.
//!
//! Responses are applied in arrival order. Switching threads quickly can let
//! an older response overwrite a newer one.

use std::collections::HashMap;

use super::{Flow, Phase};
use crate::api::{ApiClient, CreatedThread, HttpTransport, Message, MessageKind, Thread, ThreadDetail};
use crate::error::ApiResult;

const THREADS_FAILED: &str = "Failed to fetch threads";
const MESSAGES_FAILED: &str = "Failed to fetch messages";
const CREATE_FAILED: &str = "Failed to create new thread";
const REPLY_FAILED: &str = "Failed to get AI response";

/// Name given to threads created without one
pub const DEFAULT_THREAD_NAME: &str = "New Chat";

/// A query ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub thread_id: String,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub phase: Phase,
    pub threads: Vec<Thread>,
    pub selected: Option<String>,
    pub thread_name: String,
    pub messages: Vec<Message>,
    /// Descriptions given at creation, by thread id
    descriptions: HashMap<String, String>,
}

impl ChatState {
    pub fn description(&self, thread_id: &str) -> Option<&str> {
        self.descriptions.get(thread_id).map(String::as_str)
    }

    pub fn is_selected(&self, thread_id: &str) -> bool {
        self.selected.as_deref() == Some(thread_id)
    }

    // ============ Thread list ============

    pub fn begin_threads(&mut self) {
        self.phase = Phase::Loading;
    }

    pub fn finish_threads(&mut self, result: ApiResult<Vec<Thread>>) -> Flow {
        match result {
            Ok(threads) => {
                self.threads = threads;
                self.phase = Phase::Idle;
                Flow::Stay
            }
            Err(e) => self.phase.fail(&e, THREADS_FAILED),
        }
    }

    pub async fn load_threads<T: HttpTransport>(&mut self, client: &ApiClient<T>) -> Flow {
        self.begin_threads();
        let result = client.list_threads().await;
        self.finish_threads(result)
    }

    // ============ Selection ============

    pub fn begin_select(&mut self, thread_id: &str) {
        self.selected = Some(thread_id.to_string());
        self.phase = Phase::Loading;
    }

    /// Replace the visible history with the fetched one
    pub fn finish_select(&mut self, result: ApiResult<ThreadDetail>) -> Flow {
        match result {
            Ok(detail) => {
                self.thread_name = detail.thread_name;
                self.messages = detail.messages;
                self.phase = Phase::Idle;
                Flow::Stay
            }
            Err(e) => self.phase.fail(&e, MESSAGES_FAILED),
        }
    }

    /// Select a thread and fetch its messages, once
    pub async fn select_thread<T: HttpTransport>(
        &mut self,
        client: &ApiClient<T>,
        thread_id: &str,
    ) -> Flow {
        self.begin_select(thread_id);
        let result = client.thread(thread_id).await;
        self.finish_select(result)
    }

    // ============ New thread ============

    pub fn begin_create(&mut self) {
        self.phase = Phase::Loading;
    }

    /// On success returns the new thread id, now selected; the caller
    /// refetches the list and the thread.
    pub fn finish_create(
        &mut self,
        result: ApiResult<CreatedThread>,
        description: &str,
    ) -> Result<String, Flow> {
        match result {
            Ok(created) => {
                if !description.trim().is_empty() {
                    self.descriptions
                        .insert(created.thread_id.clone(), description.to_string());
                }
                self.selected = Some(created.thread_id.clone());
                self.phase = Phase::Idle;
                Ok(created.thread_id)
            }
            Err(e) => Err(self.phase.fail(&e, CREATE_FAILED)),
        }
    }

    /// Create a thread, refresh the list and open the new thread
    pub async fn create_thread<T: HttpTransport>(
        &mut self,
        client: &ApiClient<T>,
        name: &str,
        description: &str,
    ) -> Flow {
        self.begin_create();
        let result = client.create_thread(&thread_name_or_default(name), description).await;
        let thread_id = match self.finish_create(result, description) {
            Ok(id) => id,
            Err(flow) => return flow,
        };

        tracing::info!(thread_id = %thread_id, "thread created");
        if let Flow::Redirect(route) = self.load_threads(client).await {
            return Flow::Redirect(route);
        }
        self.select_thread(client, &thread_id).await
    }

    // ============ Sending ============

    /// Append the query optimistically and build the request.
    ///
    /// Returns `None`, leaving state untouched, for blank input, when no
    /// thread is selected, or while another request is pending.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingQuery> {
        if input.trim().is_empty() || self.phase.is_loading() {
            return None;
        }
        let thread_id = self.selected.clone()?;

        let context = build_context(self.description(&thread_id), &self.messages);
        self.messages
            .push(Message::local(&thread_id, input, MessageKind::Query));
        self.phase = Phase::Loading;

        Some(PendingQuery {
            thread_id,
            message: input.to_string(),
            context,
        })
    }

    pub fn finish_send(&mut self, thread_id: &str, result: ApiResult<String>) -> Flow {
        match result {
            Ok(reply) => {
                self.messages
                    .push(Message::local(thread_id, &reply, MessageKind::Response));
                self.phase = Phase::Idle;
                Flow::Stay
            }
            Err(e) => self.phase.fail(&e, REPLY_FAILED),
        }
    }

    pub async fn send<T: HttpTransport>(&mut self, client: &ApiClient<T>, input: &str) -> Flow {
        let Some(query) = self.begin_send(input) else {
            return Flow::Stay;
        };

        let result = client
            .query_thread(&query.thread_id, &query.message, &query.context)
            .await;
        self.finish_send(&query.thread_id, result)
    }
}

/// Name to create a thread with; blank names get [`DEFAULT_THREAD_NAME`]
pub fn thread_name_or_default(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        DEFAULT_THREAD_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Conversation context sent with a query.
///
/// ```text
/// Thread description: <description>
///
/// User: <query>
/// Assistant: <response>
/// ```
pub fn build_context(description: Option<&str>, history: &[Message]) -> String {
    let mut context = String::new();

    if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
        context.push_str("Thread description: ");
        context.push_str(description);
        context.push_str("\n\n");
    }

    for message in history {
        let speaker = match message.kind {
            MessageKind::Query => "User",
            MessageKind::Response => "Assistant",
        };
        context.push_str(speaker);
        context.push_str(": ");
        context.push_str(&message.content);
        context.push('\n');
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::{ok, signed_in_client, status};
    use crate::api::transport::{HttpRequest, Method, MockHttpTransport};
    use crate::auth::Route;
    use serde_json::json;

    fn message(kind: MessageKind, content: &str) -> Message {
        Message::local("t_1", content, kind)
    }

    #[test]
    fn test_build_context() {
        let history = vec![
            message(MessageKind::Query, "What ships in Q3?"),
            message(MessageKind::Response, "The new dashboard."),
        ];

        assert_eq!(
            build_context(Some("roadmap"), &history),
            "Thread description: roadmap\n\nUser: What ships in Q3?\nAssistant: The new dashboard.\n"
        );
        assert_eq!(build_context(Some("  "), &[]), "");
        assert_eq!(build_context(None, &history[..1]), "User: What ships in Q3?\n");
    }

    #[test]
    fn test_thread_name_default() {
        assert_eq!(thread_name_or_default("   "), "New Chat");
        assert_eq!(thread_name_or_default(" Q3 Planning "), "Q3 Planning");
    }

    #[tokio::test]
    async fn test_select_fetches_once_and_replaces_messages() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .withf(|req: &HttpRequest| req.url == "http://api.test/chat/thread/t_2")
            .returning(|_| {
                ok(json!({
                    "thread_id": "t_2",
                    "thread_name": "Support",
                    "messages": [
                        { "CreatedAt": "2024-07-01T10:00:00Z", "ThreadID": "t_2",
                          "Content": "hi", "MessageType": "query" }
                    ]
                }))
            });

        let client = signed_in_client(mock);
        let mut state = ChatState {
            messages: vec![message(MessageKind::Query, "from another thread")],
            ..Default::default()
        };

        assert_eq!(state.select_thread(&client, "t_2").await, Flow::Stay);
        assert!(state.is_selected("t_2"));
        assert_eq!(state.thread_name, "Support");
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, "hi");
    }

    #[tokio::test]
    async fn test_whitespace_send_makes_no_call() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send().times(0);

        let client = signed_in_client(mock);
        let mut state = ChatState {
            selected: Some("t_1".to_string()),
            messages: vec![message(MessageKind::Query, "earlier")],
            ..Default::default()
        };
        let before = state.messages.clone();

        assert_eq!(state.send(&client, "  \n\t ").await, Flow::Stay);
        assert_eq!(state.messages, before);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_send_while_pending_makes_no_call() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send().times(0);

        let client = signed_in_client(mock);
        let mut state = ChatState::default();
        state.begin_select("t_2");

        assert_eq!(state.send(&client, "hello").await, Flow::Stay);
        assert!(state.messages.is_empty());
        assert!(state.phase.is_loading());

        // A second Enter during a reply is ignored too
        state.finish_select(Ok(ThreadDetail {
            thread_id: Some("t_2".to_string()),
            thread_name: "Second".to_string(),
            messages: Vec::new(),
        }));
        assert!(state.begin_send("first").is_some());
        assert!(state.begin_send("second").is_none());
        assert_eq!(state.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_send_without_selection_makes_no_call() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send().times(0);

        let client = signed_in_client(mock);
        let mut state = ChatState::default();

        state.send(&client, "hello").await;
        assert!(state.messages.is_empty());
    }

    #[tokio::test]
    async fn test_send_appends_query_then_response() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .withf(|req: &HttpRequest| {
                req.body
                    == Some(json!({ "message": "and Q4?", "context": "User: What ships in Q3?\n" }))
            })
            .returning(|_| ok(json!({ "response": "Billing exports." })));

        let client = signed_in_client(mock);
        let mut state = ChatState {
            selected: Some("t_1".to_string()),
            messages: vec![message(MessageKind::Query, "What ships in Q3?")],
            ..Default::default()
        };

        assert_eq!(state.send(&client, "and Q4?").await, Flow::Stay);

        let kinds: Vec<MessageKind> = state.messages.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![MessageKind::Query, MessageKind::Query, MessageKind::Response]
        );
        assert_eq!(state.messages[2].content, "Billing exports.");
    }

    #[tokio::test]
    async fn test_failed_send_keeps_optimistic_message() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| status(500, json!({ "message": "model unavailable" })));

        let client = signed_in_client(mock);
        let mut state = ChatState {
            selected: Some("t_1".to_string()),
            ..Default::default()
        };

        assert_eq!(state.send(&client, "hello").await, Flow::Stay);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].kind, MessageKind::Query);
        assert_eq!(state.phase.error(), Some("model unavailable"));
    }

    #[tokio::test]
    async fn test_send_unauthorized_logs_out() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| status(401, json!({})));

        let client = signed_in_client(mock);
        let mut state = ChatState {
            selected: Some("t_1".to_string()),
            ..Default::default()
        };

        assert_eq!(state.send(&client, "hello").await, Flow::Redirect(Route::SignIn));
        assert_eq!(state.phase.error(), Some("Failed to get AI response"));
        assert!(client.session().token().is_none());
    }

    #[tokio::test]
    async fn test_create_thread_refetches_list_and_selects() {
        let mut mock = MockHttpTransport::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req: &HttpRequest| {
                req.method == Method::Post
                    && req.url == "http://api.test/chat/thread"
                    && req.body == Some(json!({ "name": "Q3 Planning", "description": "roadmap" }))
            })
            .returning(|_| ok(json!({ "threadId": "t_1" })));
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req: &HttpRequest| req.method == Method::Get && req.url == "http://api.test/chat/thread")
            .returning(|_| ok(json!({ "threads": [{ "ID": "t_1", "Name": "Q3 Planning" }] })));
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req: &HttpRequest| req.url == "http://api.test/chat/thread/t_1")
            .returning(|_| ok(json!({ "thread_id": "t_1", "thread_name": "Q3 Planning", "messages": [] })));
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req: &HttpRequest| {
                req.body
                    .as_ref()
                    .and_then(|b| b.get("context"))
                    .and_then(|c| c.as_str())
                    == Some("Thread description: roadmap\n\n")
            })
            .returning(|_| ok(json!({ "response": "Let's plan." })));

        let client = signed_in_client(mock);
        let mut state = ChatState::default();

        assert_eq!(
            state.create_thread(&client, "Q3 Planning", "roadmap").await,
            Flow::Stay
        );
        assert!(state
            .threads
            .iter()
            .any(|t| t.id == "t_1" && t.name == "Q3 Planning"));
        assert!(state.is_selected("t_1"));
        assert_eq!(state.description("t_1"), Some("roadmap"));

        state.send(&client, "Where do we start?").await;
        assert_eq!(state.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_create_failure_keeps_selection() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| status(400, json!({})));

        let client = signed_in_client(mock);
        let mut state = ChatState {
            selected: Some("t_9".to_string()),
            ..Default::default()
        };

        assert_eq!(state.create_thread(&client, "", "").await, Flow::Stay);
        assert!(state.is_selected("t_9"));
        assert_eq!(state.phase.error(), Some("Failed to create new thread"));
    }
}
