//! HTTP clients for the upstream identity/profile services.
//!
//! Every call is best-effort: a non-200 status, a transport fault, or a
//! missing field yields `None` for that lookup, logged at debug. The
//! resolver degrades to its next fallback step instead of propagating.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::config::ResolverConfig;
use crate::error::{Result, VeilError};
use crate::name::parse_identifier_flexible;

const USER_AGENT: &str = concat!("veil/", env!("CARGO_PKG_VERSION"));

/// Profile data extracted from the username→profile service.
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub textures: String,
    pub signature: String,
    pub identifier: Option<Uuid>,
}

pub struct LookupClient {
    client: reqwest::blocking::Client,
    endpoints: ResolverConfig,
}

impl LookupClient {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| VeilError::Config(format!("lookup http client: {err}")))?;
        Ok(Self {
            client,
            endpoints: config.clone(),
        })
    }

    /// username → raw textures + signature (+ optional reported identifier).
    /// Supports names that never joined the game.
    pub fn profile_by_name(&self, username: &str) -> Option<ProfileRecord> {
        if username.trim().is_empty() {
            return None;
        }
        let url = format!(
            "{}/{}",
            self.endpoints.profile_url,
            urlencoding::encode(username)
        );
        let response: ProfileResponse = self.get_json(&url)?;
        let raw = response.textures.raw;
        let (textures, signature) = match (raw.value, raw.signature) {
            (Some(value), Some(signature)) if !value.is_empty() && !signature.is_empty() => {
                (value, signature)
            }
            _ => return None,
        };
        let identifier = response
            .uuid
            .as_deref()
            .and_then(parse_identifier_flexible);
        Some(ProfileRecord {
            textures,
            signature,
            identifier,
        })
    }

    /// username → identifier, primary service.
    pub fn identifier_by_name(&self, username: &str) -> Option<Uuid> {
        if username.trim().is_empty() {
            return None;
        }
        let url = format!(
            "{}/{}",
            self.endpoints.uuid_url,
            urlencoding::encode(username)
        );
        let response: IdentifierResponse = self.get_json(&url)?;
        parse_identifier_flexible(response.id.trim())
    }

    /// username → identifier, independent fallback service.
    pub fn identifier_by_name_fallback(&self, username: &str) -> Option<Uuid> {
        if username.trim().is_empty() {
            return None;
        }
        let url = format!(
            "{}/{}",
            self.endpoints.uuid_fallback_url,
            urlencoding::encode(username)
        );
        let response: FallbackResponse = self.get_json(&url)?;
        let player = response.data.player;
        player
            .raw_id
            .as_deref()
            .and_then(parse_identifier_flexible)
            .or_else(|| player.id.as_deref().and_then(parse_identifier_flexible))
    }

    /// identifier → signed textures from the session/profile service.
    pub fn session_textures(&self, id: Uuid) -> Option<(String, String)> {
        let url = format!(
            "{}/{}?unsigned=false",
            self.endpoints.session_url,
            id.simple()
        );
        let response: SessionResponse = self.get_json(&url)?;
        response.properties.into_iter().find_map(|property| {
            if property.name != "textures" || property.value.is_empty() {
                return None;
            }
            let signature = property.signature.filter(|s| !s.is_empty())?;
            Some((property.value, signature))
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(err) => {
                debug!(url, %err, "lookup request failed");
                return None;
            }
        };
        let status = response.status();
        if !status.is_success() {
            debug!(url, %status, "lookup returned non-success");
            return None;
        }
        match response.json() {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                debug!(url, %err, "lookup response parse failed");
                None
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    textures: ProfileTextures,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileTextures {
    #[serde(default)]
    raw: ProfileRaw,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileRaw {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    signature: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IdentifierResponse {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct FallbackResponse {
    #[serde(default)]
    data: FallbackData,
}

#[derive(Debug, Default, Deserialize)]
struct FallbackData {
    #[serde(default)]
    player: FallbackPlayer,
}

#[derive(Debug, Default, Deserialize)]
struct FallbackPlayer {
    #[serde(default)]
    raw_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionResponse {
    #[serde(default)]
    properties: Vec<SessionProperty>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionProperty {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    signature: Option<String>,
}
