use futures_util::StreamExt;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use url::Url;

use crate::api::events::IncomingEvent;
use crate::api::models::{
    CallDirection, CallMedium, CallOutcome, CallRecord, ConversationRecord, GroupRecord,
    GroupVisibility, Presence, UserRecord,
};
use crate::app::AppState;
use crate::error::Error;

pub struct ApiClient {
    pub http: HttpClient,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            http: HttpClient::new(),
        }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, Error> {
        Ok(Self {
            http: HttpClient::builder().timeout(timeout).build()?,
        })
    }

    fn base_api(base_url: &str) -> String {
        let trimmed = base_url.trim_end_matches('/');
        if trimmed.ends_with("/api") {
            trimmed.to_string()
        } else {
            format!("{}/api", trimmed)
        }
    }

    fn with_auth(mut req: reqwest::RequestBuilder, state: &AppState) -> reqwest::RequestBuilder {
        if let Some(t) = state.token.as_deref() {
            req = req.header("Authorization", format!("Bearer {}", t));
        } else if !state.auth_key.is_empty() {
            req = req.header("authKey", &state.auth_key);
        }
        if !state.app_id.is_empty() {
            req = req.header("appId", &state.app_id);
        }
        if !state.region.is_empty() {
            req = req.header("region", &state.region);
        }
        req
    }

    /// Try to reach the backend using common ping endpoints. Returns the
    /// first HTTP status any of them answers with.
    pub async fn ping(&self, state: &AppState) -> Result<u16, Error> {
        let base_api = Self::base_api(&state.base_url);
        let candidates = [
            format!("{}/v1/ping", base_api),
            format!("{}/ping", base_api),
            state.base_url.trim_end_matches('/').to_string(),
        ];
        let mut last_err: Option<Error> = None;
        for endpoint in candidates {
            let req = Self::with_auth(self.http.get(&endpoint), state);
            match req.send().await {
                Ok(resp) => return Ok(resp.status().as_u16()),
                Err(e) => last_err = Some(e.into()),
            }
        }
        Err(last_err.unwrap_or_else(|| Error::Backend("failed to reach any endpoint".into())))
    }

    /// Exchange the app credentials for a session token.
    pub async fn login(&self, state: &AppState) -> Result<String, Error> {
        let base_api = Self::base_api(&state.base_url);
        let candidates = [
            format!("{}/v1/login", base_api),
            format!("{}/v1/auth", base_api),
            format!("{}/login", base_api),
        ];
        let body = serde_json::json!({
            "appId": state.app_id,
            "region": state.region,
        });
        let mut last_err: Option<Error> = None;
        for endpoint in candidates {
            let req = self
                .http
                .post(&endpoint)
                .header("authKey", &state.auth_key)
                .json(&body);
            match req.send().await {
                Ok(resp) => {
                    if !resp.status().is_success() {
                        last_err = Some(Error::Backend(format!("HTTP {}", resp.status())));
                        continue;
                    }
                    match resp.json::<Value>().await {
                        Ok(json) => {
                            if let Some(tok) = json
                                .get("token")
                                .or_else(|| json.get("accessToken"))
                                .and_then(|v| v.as_str())
                            {
                                return Ok(tok.to_string());
                            }
                            last_err = Some(Error::Backend("token not found in response".into()));
                        }
                        Err(e) => last_err = Some(e.into()),
                    }
                }
                Err(e) => last_err = Some(e.into()),
            }
        }
        Err(last_err.unwrap_or_else(|| Error::Backend("failed to obtain token".into())))
    }

    async fn query_items(&self, state: &AppState, path: &str, keys: &[&str]) -> Result<Vec<Value>, Error> {
        let endpoint = format!("{}/v1/{}", Self::base_api(&state.base_url), path);
        let body = serde_json::json!({ "limit": 1000, "offset": 0 });
        let resp = Self::with_auth(self.http.post(&endpoint), state)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Error::Backend(format!("HTTP {}", resp.status())));
        }
        let json: Value = resp.json().await?;
        // The envelope shape varies between backend versions.
        if let Some(arr) = json.as_array() {
            return Ok(arr.clone());
        }
        for key in keys.iter().chain(["data"].iter()) {
            if let Some(arr) = json.get(key).and_then(|v| v.as_array()) {
                return Ok(arr.clone());
            }
        }
        Ok(Vec::new())
    }

    fn str_field<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
        keys.iter().find_map(|k| item.get(*k).and_then(|v| v.as_str()))
    }

    pub async fn users(&self, state: &AppState) -> Result<Vec<UserRecord>, Error> {
        let items = self.query_items(state, "user/query", &["users"]).await?;
        let mut out = Vec::new();
        for item in &items {
            let id = Self::str_field(item, &["id", "uid"]).unwrap_or_default().to_string();
            let name = Self::str_field(item, &["name", "displayName"]).unwrap_or_default();
            if id.is_empty() || name.is_empty() {
                continue;
            }
            let presence = match Self::str_field(item, &["presence", "status"]) {
                Some("online") => Presence::Online,
                Some("away") => Presence::Away,
                _ => Presence::Offline,
            };
            out.push(UserRecord {
                id,
                name: name.to_string(),
                email: Self::str_field(item, &["email"]).unwrap_or_default().to_string(),
                presence,
            });
        }
        log::debug!("fetched {} users", out.len());
        Ok(out)
    }

    pub async fn conversations(&self, state: &AppState) -> Result<Vec<ConversationRecord>, Error> {
        let items = self
            .query_items(state, "conversation/query", &["conversations", "chats"])
            .await?;
        let mut out = Vec::new();
        for item in &items {
            let id = Self::str_field(item, &["id", "guid"]).unwrap_or_default().to_string();
            if id.is_empty() {
                continue;
            }
            out.push(ConversationRecord {
                id,
                name: Self::str_field(item, &["name", "displayName", "title"])
                    .unwrap_or("Chat")
                    .to_string(),
                last_message: Self::str_field(item, &["lastMessage"]).unwrap_or_default().to_string(),
                timestamp_label: Self::str_field(item, &["timestamp"]).unwrap_or_default().to_string(),
                unread_count: item.get("unreadCount").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
            });
        }
        log::debug!("fetched {} conversations", out.len());
        Ok(out)
    }

    pub async fn calls(&self, state: &AppState) -> Result<Vec<CallRecord>, Error> {
        let items = self.query_items(state, "call/query", &["calls"]).await?;
        let mut out = Vec::new();
        for item in &items {
            let id = Self::str_field(item, &["id"]).unwrap_or_default().to_string();
            let name = Self::str_field(item, &["name", "callerName"]).unwrap_or_default();
            if id.is_empty() || name.is_empty() {
                continue;
            }
            let medium = match Self::str_field(item, &["medium", "callType"]) {
                Some("video") => CallMedium::Video,
                _ => CallMedium::Audio,
            };
            let outcome = match Self::str_field(item, &["outcome", "callStatus"]) {
                Some("answered") => CallOutcome::Answered,
                Some("rejected") => CallOutcome::Rejected,
                _ => CallOutcome::Missed,
            };
            let direction = match Self::str_field(item, &["direction"]) {
                Some("outgoing") => CallDirection::Outgoing,
                _ => CallDirection::Incoming,
            };
            let duration_label = if outcome == CallOutcome::Answered {
                Self::str_field(item, &["duration"]).unwrap_or("--").to_string()
            } else {
                "--".to_string()
            };
            out.push(CallRecord {
                id,
                name: name.to_string(),
                medium,
                outcome,
                direction,
                duration_label,
                timestamp_label: Self::str_field(item, &["timestamp"]).unwrap_or_default().to_string(),
            });
        }
        log::debug!("fetched {} calls", out.len());
        Ok(out)
    }

    pub async fn groups(&self, state: &AppState) -> Result<Vec<GroupRecord>, Error> {
        let items = self.query_items(state, "group/query", &["groups"]).await?;
        let mut out = Vec::new();
        for item in &items {
            let id = Self::str_field(item, &["id", "guid"]).unwrap_or_default().to_string();
            let name = Self::str_field(item, &["name"]).unwrap_or_default();
            if id.is_empty() || name.is_empty() {
                continue;
            }
            out.push(GroupRecord {
                id,
                name: name.to_string(),
                description: Self::str_field(item, &["description"]).unwrap_or_default().to_string(),
                members_count: item.get("membersCount").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
                visibility: match Self::str_field(item, &["type", "visibility"]) {
                    Some("private") => GroupVisibility::Private,
                    _ => GroupVisibility::Public,
                },
                has_joined: item.get("hasJoined").and_then(|v| v.as_bool()).unwrap_or(false),
            });
        }
        Ok(out)
    }

    /// Open the backend's event socket. Presence, message, and call events
    /// arrive as JSON text frames.
    pub async fn connect_events(&self, ws_url: &str) -> Result<EventStream, Error> {
        let url = Url::parse(ws_url)?;
        let (ws_stream, _) = connect_async(url.as_str()).await?;
        log::info!("event socket connected to {url}");
        Ok(EventStream { inner: ws_stream })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventStream {
    inner: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl EventStream {
    /// Next well-formed event; unknown or malformed frames are skipped.
    /// None once the socket closes.
    pub async fn next_event(&mut self) -> Option<IncomingEvent> {
        while let Some(frame) = self.inner.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    if let Some(event) = IncomingEvent::parse(&text) {
                        return Some(event);
                    }
                }
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("event socket error: {e}");
                    return None;
                }
            }
        }
        None
    }
}
