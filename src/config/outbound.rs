use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::stream::StreamSettings;
use crate::error::LinkError;

/// Protocol named by an outbound's `protocol` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ProtocolKind {
    Shadowsocks,
    Vmess,
    Vless,
    Socks,
    Trojan,
    Unrecognized(String),
}

impl From<String> for ProtocolKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "shadowsocks" => ProtocolKind::Shadowsocks,
            "vmess" => ProtocolKind::Vmess,
            "vless" => ProtocolKind::Vless,
            "socks" => ProtocolKind::Socks,
            "trojan" => ProtocolKind::Trojan,
            _ => ProtocolKind::Unrecognized(name),
        }
    }
}

impl Default for ProtocolKind {
    fn default() -> Self {
        ProtocolKind::Unrecognized(String::new())
    }
}

impl ProtocolKind {
    pub fn name(&self) -> &str {
        match self {
            ProtocolKind::Shadowsocks => "shadowsocks",
            ProtocolKind::Vmess => "vmess",
            ProtocolKind::Vless => "vless",
            ProtocolKind::Socks => "socks",
            ProtocolKind::Trojan => "trojan",
            ProtocolKind::Unrecognized(name) => name.as_str(),
        }
    }
}

/// One entry of the document's `outbounds` list.
///
/// `settings` stays an untyped JSON value until the protocol is known; see
/// [`OutboundDescriptor::decode_settings`]. `streamSettings` is also decoded
/// per outbound so a malformed block only drops that outbound.
#[derive(Debug, Clone, Deserialize)]
pub struct OutboundDescriptor {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub protocol: ProtocolKind,
    #[serde(default)]
    pub settings: Value,
    #[serde(default, rename = "streamSettings")]
    pub stream_settings: Option<Value>,
}

impl OutboundDescriptor {
    /// Decode the settings blob into the shape used by `protocol`.
    pub fn decode_settings<T: DeserializeOwned>(
        &self,
        protocol: &'static str,
    ) -> Result<T, LinkError> {
        T::deserialize(&self.settings)
            .map_err(|source| LinkError::SettingsDecode { protocol, source })
    }

    pub fn decode_stream_settings(&self) -> Result<Option<StreamSettings>, LinkError> {
        let Some(stream) = &self.stream_settings else {
            return Ok(None);
        };
        Option::<StreamSettings>::deserialize(stream).map_err(LinkError::StreamSettingsDecode)
    }

    /// Display tag, if one is set and non-empty.
    pub fn display_tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|tag| !tag.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShadowsocksServer {
    pub address: String,
    pub port: u16,
    pub method: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShadowsocksSettings {
    #[serde(flatten)]
    pub server: ShadowsocksServer,
    pub servers: Vec<ShadowsocksServer>,
}

impl ShadowsocksSettings {
    pub fn into_server(self) -> ShadowsocksServer {
        if !self.server.address.is_empty() {
            return self.server;
        }
        self.servers.into_iter().next().unwrap_or(self.server)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VmessServer {
    pub address: String,
    pub port: u16,
    pub id: String,
    pub security: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VmessUser {
    id: String,
    security: String,
}

/// Legacy `vnext` entry shared by VMess and VLESS.
#[derive(Debug, Deserialize)]
struct Vnext<U> {
    #[serde(default)]
    address: String,
    #[serde(default)]
    port: u16,
    #[serde(default = "Vec::new")]
    users: Vec<U>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VmessSettings {
    #[serde(flatten)]
    server: VmessServer,
    vnext: Vec<Vnext<VmessUser>>,
}

impl VmessSettings {
    pub fn into_server(self) -> VmessServer {
        if !self.server.address.is_empty() {
            return self.server;
        }
        let Some(entry) = self.vnext.into_iter().next() else {
            return self.server;
        };
        let user = entry.users.into_iter().next().unwrap_or_default();
        VmessServer {
            address: entry.address,
            port: entry.port,
            id: user.id,
            security: user.security,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VlessServer {
    pub address: String,
    pub port: u16,
    pub id: String,
    pub flow: String,
    pub encryption: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VlessUser {
    id: String,
    flow: String,
    encryption: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VlessSettings {
    #[serde(flatten)]
    server: VlessServer,
    vnext: Vec<Vnext<VlessUser>>,
}

impl VlessSettings {
    pub fn into_server(self) -> VlessServer {
        if !self.server.address.is_empty() {
            return self.server;
        }
        let Some(entry) = self.vnext.into_iter().next() else {
            return self.server;
        };
        let user = entry.users.into_iter().next().unwrap_or_default();
        VlessServer {
            address: entry.address,
            port: entry.port,
            id: user.id,
            flow: user.flow,
            encryption: user.encryption,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocksServer {
    pub address: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SocksAccount {
    user: String,
    pass: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SocksEntry {
    address: String,
    port: u16,
    users: Vec<SocksAccount>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SocksSettings {
    #[serde(flatten)]
    server: SocksServer,
    servers: Vec<SocksEntry>,
}

impl SocksSettings {
    pub fn into_server(self) -> SocksServer {
        if !self.server.address.is_empty() {
            return self.server;
        }
        let Some(entry) = self.servers.into_iter().next() else {
            return self.server;
        };
        let account = entry.users.into_iter().next().unwrap_or_default();
        SocksServer {
            address: entry.address,
            port: entry.port,
            user: account.user,
            pass: account.pass,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrojanServer {
    pub address: String,
    pub port: u16,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrojanSettings {
    #[serde(flatten)]
    server: TrojanServer,
    servers: Vec<TrojanServer>,
}

impl TrojanSettings {
    pub fn into_server(self) -> TrojanServer {
        if !self.server.address.is_empty() {
            return self.server;
        }
        self.servers.into_iter().next().unwrap_or(self.server)
    }
}
