//! Web-view login and account selection.

use std::sync::Arc;

use tracing::{debug, info};

use super::{MUSIC_BASE_URL, YoutubeExtension};
use crate::account::fetch_account_users;
use crate::auth::{AuthState, derive_auth_headers_now};
use crate::config::KEY_VISITOR_ID;
use crate::error::Result;
use crate::model::User;

/// Where the login web view starts.
pub const LOGIN_INITIAL_URL: &str = "https://accounts.google.com/v3/signin/identifier?dsh=S1527412391%3A1678373417598386&continue=https%3A%2F%2Fwww.youtube.com%2Fsignin%3Faction_handle_signin%3Dtrue%26app%3Ddesktop%26hl%3Den-GB%26next%3Dhttps%253A%252F%252Fmusic.youtube.com%252F%253Fcbrd%253D1%26feature%3D__FEATURE__&hl=en-GB&ifkv=AWnogHfK4OXI8X1zVlVjzzjybvICXS4ojnbvzpE4Gn_Pfddw7fs3ERdfk-q3tRimJuoXjfofz6wuzg&ltmpl=music&passive=true&service=youtube&uilel=3&flowName=GlifWebSignIn&flowEntry=ServiceLogin";

/// Whether the web view reached the music site, i.e. the login finished.
#[must_use]
pub fn is_login_stop_url(url: &str) -> bool {
    url.strip_prefix(MUSIC_BASE_URL)
        .is_some_and(|rest| rest.starts_with('/'))
}

impl YoutubeExtension {
    /// Users available to the cookie captured when the web view stopped.
    ///
    /// Each user carries the derived credentials in its extras, ready for
    /// [`set_login_user`](Self::set_login_user).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::error::Error::InvalidInput) if
    /// the cookie has no `SAPISID`; otherwise propagates HTTP and parse errors.
    pub async fn on_login_webview_stop(&self, cookie: &str) -> Result<Vec<User>> {
        let headers = derive_auth_headers_now(cookie)?;
        fetch_account_users(self.http.as_ref(), &headers, true).await
    }

    /// Switch the session to `user`, or back to anonymous with `None`.
    ///
    /// Going anonymous reuses the persisted visitor id, fetching and
    /// persisting a new one the first time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::error::Error::InvalidInput) if
    /// the user lacks credentials; propagates visitor id fetch errors.
    pub async fn set_login_user(&self, user: Option<&User>) -> Result<()> {
        let Some(user) = user else {
            self.session.set_auth(None).await;
            let visitor_id = match self.settings().visitor_id {
                Some(id) => id,
                None => {
                    let id = self.client.visitor_id().await?;
                    info!("Fetched new visitor id");
                    self.settings.put_string(KEY_VISITOR_ID, Some(&id));
                    id
                }
            };
            self.client.set_visitor_id(visitor_id);
            return Ok(());
        };
        let state = AuthState::from_user(user)?;
        self.session.set_auth(Some(state)).await;
        Ok(())
    }

    /// The account of the current session, `None` when anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`](crate::error::Error::Unauthorized) when
    /// the server rejects the session; propagates other HTTP and parse errors.
    pub async fn current_user(&self) -> Result<Option<User>> {
        if !self.session.is_logged_in().await {
            debug!("No session, no current user");
            return Ok(None);
        }
        let http = Arc::clone(&self.http);
        let users = self
            .session
            .with_auth(|state| async move {
                fetch_account_users(http.as_ref(), &state.headers, false).await
            })
            .await?;
        Ok(users.into_iter().next())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::super::test_support::{FakeHttp, auth_state, build, build_with_http};
    use super::*;
    use crate::account::ACCOUNT_SWITCHER_URL;
    use crate::client::MockCatalogClient;
    use crate::config::SettingsStore;
    use crate::config::tests::MemorySettings;
    use crate::error::Error;
    use crate::model::{EXTRA_AUTH, EXTRA_COOKIE};

    const SWITCHER: &str = r#")]}'
{"data":{"actions":[{"getMultiPageMenuAction":{"menu":{"multiPageMenuRenderer":{"sections":[
  {"accountSectionListRenderer":{"contents":[{"accountItemSectionRenderer":{"contents":[
    {"accountItem":{"accountName":{"simpleText":"Me"}}},
    {"accountItem":{"accountName":{"simpleText":"My Brand"},
      "serviceEndpoint":{"selectActiveIdentityEndpoint":{"supportedTokens":[{"pageIdToken":{"pageId":"77"}}]}}}}
  ]}}]}}
]}}}}]}}"#;

    #[test]
    fn test_login_stop_url() {
        assert!(is_login_stop_url("https://music.youtube.com/"));
        assert!(is_login_stop_url("https://music.youtube.com/?cbrd=1"));
        assert!(!is_login_stop_url("https://music.youtube.community/"));
        assert!(!is_login_stop_url("https://accounts.google.com/"));
        assert!(LOGIN_INITIAL_URL.starts_with("https://accounts.google.com/"));
    }

    #[tokio::test]
    async fn test_webview_stop_returns_users_with_credentials() {
        let http = Arc::new(FakeHttp::default().with(ACCOUNT_SWITCHER_URL, SWITCHER));
        let ext = build_with_http(
            MockCatalogClient::new(),
            MemorySettings::default(),
            Arc::clone(&http),
        );

        let users = ext
            .on_login_webview_stop("HSID=1; SAPISID=abc; SID=2")
            .await
            .unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].id, "77");
        assert!(users[0].extras.get(EXTRA_AUTH).unwrap().starts_with("SAPISIDHASH "));

        let requests = http.requests.lock().unwrap();
        let (_, headers) = &requests[0];
        assert!(headers.iter().any(|(k, v)| k == "referer" && v == "https://music.youtube.com/"));
    }

    #[tokio::test]
    async fn test_webview_stop_without_sapisid() {
        let ext = build(MockCatalogClient::new(), MemorySettings::default());
        let err = ext.on_login_webview_stop("HSID=1").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_set_login_user_then_logout() {
        let mut client = MockCatalogClient::new();
        client
            .expect_visitor_id()
            .times(1)
            .returning(|| Ok("VISITOR".to_string()));
        client
            .expect_set_visitor_id()
            .withf(|id| id == "VISITOR")
            .times(2)
            .return_const(());
        let settings = Arc::new(MemorySettings::default());
        let ext = YoutubeExtension::new(
            Arc::new(client),
            Arc::new(FakeHttp::default()),
            Arc::clone(&settings) as Arc<dyn SettingsStore>,
        );

        let mut user = User {
            id: "77".to_string(),
            ..User::default()
        };
        user.extras
            .insert(EXTRA_COOKIE.to_string(), "SAPISID=abc".to_string());
        user.extras
            .insert(EXTRA_AUTH.to_string(), "SAPISIDHASH 1_x".to_string());
        ext.set_login_user(Some(&user)).await.unwrap();
        let state = ext.session().auth_state().await.unwrap();
        assert_eq!(state.own_channel_id.as_deref(), Some("77"));

        ext.set_login_user(None).await.unwrap();
        assert!(!ext.session().is_logged_in().await);
        assert_eq!(settings.get_string(KEY_VISITOR_ID).as_deref(), Some("VISITOR"));

        // second logout reuses the persisted id
        ext.set_login_user(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_login_user_without_credentials() {
        let ext = build(MockCatalogClient::new(), MemorySettings::default());
        let err = ext.set_login_user(Some(&User::default())).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(!ext.session().is_logged_in().await);
    }

    #[tokio::test]
    async fn test_current_user_anonymous() {
        let ext = build(MockCatalogClient::new(), MemorySettings::default());
        assert!(ext.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_current_user_is_first_account() {
        let http = Arc::new(FakeHttp::default().with(ACCOUNT_SWITCHER_URL, SWITCHER));
        let ext = build_with_http(MockCatalogClient::new(), MemorySettings::default(), http);
        ext.session().set_auth(Some(auth_state(None))).await;

        let user = ext.current_user().await.unwrap().unwrap();
        assert_eq!(user.name, "Me");
        assert!(user.extras.is_empty());
    }

    #[tokio::test]
    async fn test_current_user_rejected_session_is_unauthorized() {
        let http = Arc::new(FakeHttp::default().failing(ACCOUNT_SWITCHER_URL, 401));
        let ext = build_with_http(MockCatalogClient::new(), MemorySettings::default(), http);
        ext.session().set_auth(Some(auth_state(Some("UC_ME")))).await;

        let err = ext.current_user().await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(ref id) if id == "UC_ME"));
    }
}
