//! Sign-in / sign-up controller

use super::{Flow, Phase};
use crate::api::{ApiClient, HttpTransport, SignInRequest, SignUpRequest, TokenResponse};
use crate::auth::Route;
use crate::error::{ApiError, ApiResult};

const AUTH_FAILED: &str = "Authentication failed";

/// Which form the auth page shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub mode: AuthMode,
    pub phase: Phase,
}

impl AuthState {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            phase: Phase::Idle,
        }
    }

    /// Switch forms, dropping any previous error
    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.phase = Phase::Idle;
    }

    pub fn begin(&mut self) {
        self.phase = Phase::Loading;
    }

    /// On success the caller navigates to the profile page.
    pub fn finish(&mut self, result: ApiResult<()>) -> Flow {
        match result {
            Ok(()) => {
                self.phase = Phase::Idle;
                Flow::Redirect(Route::Profile)
            }
            Err(e) => {
                // A rejected login is an ordinary form error here
                self.phase.fail(&e, AUTH_FAILED);
                Flow::Stay
            }
        }
    }

    pub async fn submit_sign_in<T: HttpTransport>(
        &mut self,
        client: &ApiClient<T>,
        request: &SignInRequest,
    ) -> Flow {
        self.begin();
        let result = sign_in(client, request).await;
        self.finish(result)
    }

    pub async fn submit_sign_up<T: HttpTransport>(
        &mut self,
        client: &ApiClient<T>,
        request: &SignUpRequest,
    ) -> Flow {
        self.begin();
        let result = sign_up(client, request).await;
        self.finish(result)
    }
}

/// Exchange credentials for a token and start the session
pub async fn sign_in<T: HttpTransport>(
    client: &ApiClient<T>,
    request: &SignInRequest,
) -> ApiResult<()> {
    let response = client.sign_in(request).await?;
    store_token(client, response)
}

/// Register, then start the session.
///
/// When registration answers with only a confirmation message, the new
/// credentials are used to sign in.
pub async fn sign_up<T: HttpTransport>(
    client: &ApiClient<T>,
    request: &SignUpRequest,
) -> ApiResult<()> {
    let response = client.sign_up(request).await?;
    if response.token.as_deref().is_some_and(|t| !t.is_empty()) {
        return store_token(client, response);
    }

    tracing::info!(email = %request.email, "account created, signing in");
    sign_in(
        client,
        &SignInRequest {
            email: request.email.clone(),
            password: request.password.clone(),
        },
    )
    .await
}

fn store_token<T: HttpTransport>(client: &ApiClient<T>, response: TokenResponse) -> ApiResult<()> {
    let token = response
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Malformed("response carried no token".to_string()))?;

    client.session().sign_in(&token)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::{anonymous_client, ok, status};
    use crate::api::transport::{HttpRequest, MockHttpTransport};
    use crate::auth::token::testing::token_expiring_in;
    use serde_json::json;

    fn credentials() -> SignInRequest {
        SignInRequest {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_stores_token_and_redirects() {
        let token = token_expiring_in(3600);
        let returned = token.clone();

        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(move |_| ok(json!({ "token": returned })));

        let client = anonymous_client(mock);
        let mut state = AuthState::default();
        let flow = state.submit_sign_in(&client, &credentials()).await;

        assert_eq!(flow, Flow::Redirect(Route::Profile));
        assert_eq!(client.session().token(), Some(token));
        assert!(client.session().is_authenticated());
        assert_eq!(state.phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_failed_sign_in_shows_server_error() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| status(403, json!({ "error": "invalid email or password" })));

        let client = anonymous_client(mock);
        let mut state = AuthState::default();
        let flow = state.submit_sign_in(&client, &credentials()).await;

        assert_eq!(flow, Flow::Stay);
        assert_eq!(state.phase.error(), Some("invalid email or password"));
        assert!(client.session().token().is_none());
    }

    #[tokio::test]
    async fn test_missing_token_is_malformed() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send().times(1).returning(|_| ok(json!({})));

        let client = anonymous_client(mock);
        let mut state = AuthState::default();
        state.submit_sign_in(&client, &credentials()).await;

        assert_eq!(state.phase.error(), Some("Invalid response format"));
    }

    #[tokio::test]
    async fn test_sign_up_without_token_signs_in() {
        let token = token_expiring_in(3600);
        let returned = token.clone();

        let mut mock = MockHttpTransport::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req: &HttpRequest| {
                req.url.ends_with("/user")
                    && req.body.as_ref().and_then(|b| b.get("legal_company_name")).is_some()
            })
            .returning(|_| ok(json!({ "message": "User created successfully" })));
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|req: &HttpRequest| req.url.ends_with("/user/signin"))
            .returning(move |_| ok(json!({ "token": returned })));

        let client = anonymous_client(mock);
        let mut state = AuthState::new(AuthMode::SignUp);
        let flow = state
            .submit_sign_up(
                &client,
                &SignUpRequest {
                    name: "Ada".to_string(),
                    email: "ada@example.com".to_string(),
                    password: "secret".to_string(),
                    legal_company_name: "Analytical Engines Ltd".to_string(),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(flow, Flow::Redirect(Route::Profile));
        assert_eq!(client.session().token(), Some(token));
    }

    #[test]
    fn test_switch_mode_clears_error() {
        let mut state = AuthState::default();
        state.phase = Phase::Error("Authentication failed".to_string());

        state.switch_mode(AuthMode::SignUp);
        assert_eq!(state.mode, AuthMode::SignUp);
        assert_eq!(state.phase, Phase::Idle);
    }
}
