//! Profile page controller

use regex::Regex;
use std::sync::OnceLock;

use super::{Flow, Phase};
use crate::api::{ApiClient, HttpTransport, UserProfile};
use crate::error::ApiResult;

const FETCH_FAILED: &str = "Failed to fetch profile";

/// Placeholder for empty profile fields
pub const NOT_PROVIDED: &str = "Not Provided";

#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub phase: Phase,
    pub profile: Option<UserProfile>,
}

impl ProfileState {
    pub fn begin(&mut self) {
        self.phase = Phase::Loading;
    }

    pub fn finish(&mut self, result: ApiResult<UserProfile>) -> Flow {
        match result {
            Ok(profile) => {
                self.profile = Some(profile);
                self.phase = Phase::Idle;
                Flow::Stay
            }
            Err(e) => self.phase.fail(&e, FETCH_FAILED),
        }
    }

    /// Fetch the snapshot once for this visit.
    ///
    /// Without a credential no request is made and the visitor is sent to
    /// sign in.
    pub async fn load<T: HttpTransport>(&mut self, client: &ApiClient<T>) -> Flow {
        self.begin();
        let result = client.profile().await;
        self.finish(result)
    }
}

/// The value, or [`NOT_PROVIDED`] when blank
pub fn or_not_provided(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

/// Display form of a website: scheme and leading `www.` removed
pub fn website_label(url: &str) -> String {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    let scheme = SCHEME.get_or_init(|| Regex::new(r"^https?://(www\.)?").expect("valid regex"));
    scheme.replace(url, "").into_owned()
}

/// Generated initials avatar for a user name
pub fn avatar_url(name: &str) -> String {
    format!(
        "https://api.dicebear.com/6.x/initials/svg?seed={}",
        urlencoding::encode(name)
    )
}
