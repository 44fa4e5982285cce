//! Account switcher parsing.
//!
//! After login the account switcher endpoint lists every identity the cookie
//! can act as (the primary account plus brand channels). Each becomes a
//! [`User`] carrying the cookie and authorization header in its extras, so
//! picking one later needs no further login.

use serde::Deserialize;
use tracing::{debug, info};

use crate::auth::AuthHeaders;
use crate::client::HttpClient;
use crate::error::Result;
use crate::model::{EXTRA_AUTH, EXTRA_COOKIE, Extras, ImageHolder, UNKNOWN_NAME, User};

/// Account switcher endpoint.
pub const ACCOUNT_SWITCHER_URL: &str = "https://music.youtube.com/getAccountSwitcherEndpoint";

const REFERER: &str = "https://music.youtube.com/";

/// Anti-JSON-hijacking prefix of the response body.
const XSSI_PREFIX: &str = ")]}'";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AccountSwitcherResponse {
    data: ResponseData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseData {
    actions: Vec<Action>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Action {
    get_multi_page_menu_action: Option<MultiPageMenuAction>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MultiPageMenuAction {
    menu: Menu,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Menu {
    multi_page_menu_renderer: MenuRenderer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MenuRenderer {
    sections: Vec<Section>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Section {
    account_section_list_renderer: Option<ContentList<ItemSection>>,
}

#[derive(Debug, Deserialize)]
struct ContentList<T> {
    #[serde(default = "Vec::new")]
    contents: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ItemSection {
    account_item_section_renderer: Option<ContentList<AccountEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AccountEntry {
    account_item: Option<AccountItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AccountItem {
    account_name: SimpleText,
    account_photo: Photo,
    service_endpoint: ServiceEndpoint,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimpleText {
    simple_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Photo {
    thumbnails: Vec<PhotoThumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PhotoThumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ServiceEndpoint {
    select_active_identity_endpoint: Option<SelectIdentity>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SelectIdentity {
    supported_tokens: Vec<SupportedToken>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SupportedToken {
    page_id_token: Option<PageIdToken>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PageIdToken {
    page_id: String,
}

impl AccountItem {
    fn page_id(&self) -> Option<&str> {
        self.service_endpoint
            .select_active_identity_endpoint
            .as_ref()?
            .supported_tokens
            .iter()
            .find_map(|t| t.page_id_token.as_ref())
            .map(|t| t.page_id.as_str())
    }

    fn into_user(self, headers: Option<&AuthHeaders>) -> User {
        let mut extras = Extras::new();
        if let Some(headers) = headers {
            extras.insert(EXTRA_COOKIE.to_string(), headers.cookie.clone());
            extras.insert(EXTRA_AUTH.to_string(), headers.authorization.clone());
        }
        User {
            id: self.page_id().unwrap_or_default().to_string(),
            name: self
                .account_name
                .simple_text
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            cover: self
                .account_photo
                .thumbnails
                .last()
                .map(|t| ImageHolder::new(t.url.clone(), false)),
            extras,
        }
    }
}

/// Parse an account switcher body into users.
///
/// The primary account gets an empty id. When `headers` is given, each user
/// carries them in its `cookie` and `auth` extras.
///
/// # Errors
///
/// Returns [`Error::Serialization`](crate::error::Error::Serialization) if
/// the body is not valid JSON after the prefix.
pub fn parse_account_users(body: &str, headers: Option<&AuthHeaders>) -> Result<Vec<User>> {
    let json = body
        .split_once(XSSI_PREFIX)
        .map_or(body, |(_, rest)| rest);
    let response: AccountSwitcherResponse = serde_json::from_str(json)?;

    let users: Vec<User> = response
        .data
        .actions
        .into_iter()
        .filter_map(|a| a.get_multi_page_menu_action)
        .flat_map(|a| a.menu.multi_page_menu_renderer.sections)
        .filter_map(|s| s.account_section_list_renderer)
        .flat_map(|list| list.contents)
        .filter_map(|s| s.account_item_section_renderer)
        .flat_map(|list| list.contents)
        .filter_map(|entry| entry.account_item)
        .map(|item| item.into_user(headers))
        .collect();

    debug!("Parsed {} accounts", users.len());
    Ok(users)
}

/// Request headers for the account switcher.
#[must_use]
pub fn account_request_headers(headers: &AuthHeaders) -> Vec<(String, String)> {
    let mut pairs = vec![("referer".to_string(), REFERER.to_string())];
    pairs.extend(headers.to_pairs());
    pairs
}

/// Fetch the identities available to a credential pair.
///
/// # Errors
///
/// Propagates HTTP and parse errors.
pub async fn fetch_account_users(
    http: &dyn HttpClient,
    headers: &AuthHeaders,
    attach_credentials: bool,
) -> Result<Vec<User>> {
    let body = http
        .get_text(ACCOUNT_SWITCHER_URL, &account_request_headers(headers))
        .await?;
    let users = parse_account_users(&body, attach_credentials.then_some(headers))?;
    info!("Account switcher returned {} users", users.len());
    Ok(users)
}
