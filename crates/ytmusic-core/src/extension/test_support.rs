#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::YoutubeExtension;
use crate::auth::{AuthHeaders, AuthState};
use crate::client::{HttpClient, MockCatalogClient};
use crate::config::tests::MemorySettings;
use crate::error::{Error, Result};
use crate::raw::{RawItem, RawSong};

/// Canned responses keyed by URL; records every request.
#[derive(Default)]
pub(crate) struct FakeHttp {
    responses: Mutex<HashMap<String, String>>,
    failures: Mutex<HashMap<String, u16>>,
    pub(crate) requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeHttp {
    pub(crate) fn with(self, url: &str, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
        self
    }

    pub(crate) fn failing(self, url: &str, status: u16) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(url.to_string(), status);
        self
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get_text(&self, url: &str, headers: &[(String, String)]) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), headers.to_vec()));
        if let Some(status) = self.failures.lock().unwrap().get(url) {
            return Err(Error::remote(*status, url));
        }
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::remote(404, url))
    }
}

pub(crate) fn build(client: MockCatalogClient, settings: MemorySettings) -> YoutubeExtension {
    build_with_http(client, settings, Arc::new(FakeHttp::default()))
}

pub(crate) fn build_with_http(
    client: MockCatalogClient,
    settings: MemorySettings,
    http: Arc<FakeHttp>,
) -> YoutubeExtension {
    YoutubeExtension::new(Arc::new(client), http, Arc::new(settings))
}

pub(crate) fn auth_state(own: Option<&str>) -> AuthState {
    AuthState {
        own_channel_id: own.map(str::to_string),
        headers: AuthHeaders {
            cookie: "SAPISID=abc".to_string(),
            authorization: "SAPISIDHASH 1_x".to_string(),
        },
    }
}

pub(crate) fn raw_song(id: &str, name: &str) -> RawSong {
    RawSong {
        id: id.to_string(),
        name: Some(name.to_string()),
        ..RawSong::default()
    }
}

pub(crate) fn song_item(id: &str) -> RawItem {
    RawItem::Song(raw_song(id, id))
}
