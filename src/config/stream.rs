use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stream transport carrying the proxy protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TransportKind {
    #[default]
    Raw,
    Kcp,
    Ws,
    Grpc,
    HttpUpgrade,
    Xhttp,
    Other(String),
}

impl From<String> for TransportKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "" | "raw" | "tcp" => TransportKind::Raw,
            "kcp" | "mkcp" => TransportKind::Kcp,
            "ws" | "websocket" => TransportKind::Ws,
            "grpc" => TransportKind::Grpc,
            "httpupgrade" => TransportKind::HttpUpgrade,
            "xhttp" | "splithttp" => TransportKind::Xhttp,
            _ => TransportKind::Other(name),
        }
    }
}

impl TransportKind {
    pub fn as_str(&self) -> &str {
        match self {
            TransportKind::Raw => "raw",
            TransportKind::Kcp => "kcp",
            TransportKind::Ws => "ws",
            TransportKind::Grpc => "grpc",
            TransportKind::HttpUpgrade => "httpupgrade",
            TransportKind::Xhttp => "xhttp",
            TransportKind::Other(name) => name.as_str(),
        }
    }
}

/// Security layer applied on top of the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SecurityKind {
    #[default]
    None,
    Tls,
    Reality,
    Other(String),
}

impl From<String> for SecurityKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "" | "none" => SecurityKind::None,
            "tls" => SecurityKind::Tls,
            "reality" => SecurityKind::Reality,
            _ => SecurityKind::Other(name),
        }
    }
}

impl SecurityKind {
    pub fn as_str(&self) -> &str {
        match self {
            SecurityKind::None => "none",
            SecurityKind::Tls => "tls",
            SecurityKind::Reality => "reality",
            SecurityKind::Other(name) => name.as_str(),
        }
    }
}

/// A list that may also be written as a single string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct StringList(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for StringList {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) if s.is_empty() => StringList(Vec::new()),
            OneOrMany::One(s) => StringList(vec![s]),
            OneOrMany::Many(list) => StringList(list),
        }
    }
}

impl StringList {
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|s| s.is_empty())
    }

    pub fn join(&self) -> String {
        self.0.join(",")
    }
}

/// The `streamSettings` block of an outbound.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSettings {
    #[serde(default)]
    pub network: Option<TransportKind>,
    #[serde(default)]
    pub security: Option<SecurityKind>,

    #[serde(default, alias = "tcpSettings")]
    pub raw_settings: Option<RawSettings>,
    #[serde(default)]
    pub kcp_settings: Option<KcpSettings>,
    #[serde(default)]
    pub ws_settings: Option<WsSettings>,
    #[serde(default)]
    pub grpc_settings: Option<GrpcSettings>,
    #[serde(default)]
    pub httpupgrade_settings: Option<HttpUpgradeSettings>,
    #[serde(default, alias = "splithttpSettings")]
    pub xhttp_settings: Option<XhttpSettings>,

    #[serde(default)]
    pub tls_settings: Option<TlsSettings>,
    #[serde(default)]
    pub reality_settings: Option<RealitySettings>,
}

impl StreamSettings {
    pub fn transport(&self) -> TransportKind {
        self.network.clone().unwrap_or_default()
    }

    pub fn security_kind(&self) -> SecurityKind {
        self.security.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
    /// Kept undecoded; a malformed header only drops the header parameters.
    #[serde(default)]
    pub header: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHeader {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub request: Option<RawRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRequest {
    #[serde(default)]
    pub path: StringList,
    #[serde(default)]
    pub headers: Option<RawRequestHeaders>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRequestHeaders {
    #[serde(default, rename = "Host", alias = "host")]
    pub host: StringList,
}

impl RawSettings {
    pub fn decode_header(&self) -> Option<RawHeader> {
        decode_nested(self.header.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KcpSettings {
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub header: Option<Value>,
}

/// mKCP packet disguise header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FakeHeader {
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl KcpSettings {
    pub fn decode_header(&self) -> Option<FakeHeader> {
        decode_nested(self.header.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WsSettings {
    pub path: String,
    pub host: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrpcSettings {
    pub service_name: String,
    pub authority: String,
    pub multi_mode: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpUpgradeSettings {
    pub host: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct XhttpSettings {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub extra: Option<Value>,
}

/// Known keys of the xhttp `extra` object. Anything else is dropped when the
/// object is re-serialized into the `extra` query parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XhttpExtra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_padding_bytes: Option<Value>,
    #[serde(default, rename = "noGRPCHeader", skip_serializing_if = "Option::is_none")]
    pub no_grpc_header: Option<bool>,
    #[serde(default, rename = "noSSEHeader", skip_serializing_if = "Option::is_none")]
    pub no_sse_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sc_max_each_post_bytes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sc_min_posts_interval_ms: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sc_max_buffered_posts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sc_stream_up_server_secs: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmux: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_settings: Option<Value>,
}

impl XhttpSettings {
    /// Compact JSON for the `extra` parameter, or `None` when the blob is
    /// absent, not a well-formed extra object, or carries no known keys.
    pub fn extra_json(&self) -> Option<String> {
        let extra = self.extra.as_ref().filter(|v| v.is_object())?;
        let parsed: XhttpExtra = decode_nested(Some(extra))?;
        serde_json::to_string(&parsed)
            .ok()
            .filter(|json| json != "{}")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TlsSettings {
    pub server_name: String,
    pub fingerprint: String,
    pub alpn: StringList,
    pub allow_insecure: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RealitySettings {
    pub server_name: String,
    pub fingerprint: String,
    #[serde(alias = "publicKey")]
    pub password: String,
    pub short_id: String,
    pub mldsa65_verify: String,
    pub spider_x: String,
}

fn decode_nested<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Option<T> {
    let value = value?;
    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::debug!("Ignoring malformed nested stream setting: {}", e);
            None
        }
    }
}
