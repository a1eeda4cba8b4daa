use base64::prelude::*;

use crate::config::outbound::{
    OutboundDescriptor, ProtocolKind, ShadowsocksSettings, SocksSettings, TrojanSettings,
    VlessSettings, VmessSettings,
};
use crate::error::LinkError;
use crate::link::ShareLink;

/// Build the base link (scheme, credential, authority, name) for one outbound.
///
/// Transport and security parameters are appended separately by
/// [`crate::query::append_stream_query`].
pub fn build_link(outbound: &OutboundDescriptor) -> Result<ShareLink, LinkError> {
    match &outbound.protocol {
        ProtocolKind::Shadowsocks => shadowsocks_link(outbound),
        ProtocolKind::Vmess => vmess_link(outbound),
        ProtocolKind::Vless => vless_link(outbound),
        ProtocolKind::Socks => socks_link(outbound),
        ProtocolKind::Trojan => trojan_link(outbound),
        ProtocolKind::Unrecognized(name) => Err(LinkError::UnsupportedProtocol(name.clone())),
    }
}

fn shadowsocks_link(outbound: &OutboundDescriptor) -> Result<ShareLink, LinkError> {
    const PROTOCOL: &str = "shadowsocks";
    let server = outbound
        .decode_settings::<ShadowsocksSettings>(PROTOCOL)?
        .into_server();
    check_endpoint(PROTOCOL, &server.address, server.port)?;

    let userinfo = BASE64_STANDARD.encode(format!("{}:{}", server.method, server.password));

    Ok(ShareLink::new("ss", server.address.as_str(), server.port)
        .with_credential(userinfo)
        .with_fragment(outbound_name(outbound, &server.address, server.port)))
}

fn vmess_link(outbound: &OutboundDescriptor) -> Result<ShareLink, LinkError> {
    const PROTOCOL: &str = "vmess";
    let server = outbound.decode_settings::<VmessSettings>(PROTOCOL)?.into_server();
    check_endpoint(PROTOCOL, &server.address, server.port)?;
    require(PROTOCOL, "id", &server.id)?;

    let mut link = ShareLink::new("vmess", server.address.as_str(), server.port)
        .with_credential(server.id.as_str())
        .with_fragment(outbound_name(outbound, &server.address, server.port));
    link.push_query_non_empty("encryption", &server.security);

    Ok(link)
}

fn vless_link(outbound: &OutboundDescriptor) -> Result<ShareLink, LinkError> {
    const PROTOCOL: &str = "vless";
    let server = outbound.decode_settings::<VlessSettings>(PROTOCOL)?.into_server();
    check_endpoint(PROTOCOL, &server.address, server.port)?;
    require(PROTOCOL, "id", &server.id)?;

    let mut link = ShareLink::new("vless", server.address.as_str(), server.port)
        .with_credential(server.id.as_str())
        .with_fragment(outbound_name(outbound, &server.address, server.port));
    link.push_query_non_empty("flow", &server.flow);
    link.push_query_non_empty("encryption", &server.encryption);

    Ok(link)
}

fn socks_link(outbound: &OutboundDescriptor) -> Result<ShareLink, LinkError> {
    const PROTOCOL: &str = "socks";
    let server = outbound.decode_settings::<SocksSettings>(PROTOCOL)?.into_server();
    check_endpoint(PROTOCOL, &server.address, server.port)?;

    let userinfo = BASE64_STANDARD.encode(format!("{}:{}", server.user, server.pass));

    Ok(ShareLink::new("socks", server.address.as_str(), server.port)
        .with_credential(userinfo)
        .with_fragment(outbound_name(outbound, &server.address, server.port)))
}

fn trojan_link(outbound: &OutboundDescriptor) -> Result<ShareLink, LinkError> {
    const PROTOCOL: &str = "trojan";
    let server = outbound.decode_settings::<TrojanSettings>(PROTOCOL)?.into_server();
    check_endpoint(PROTOCOL, &server.address, server.port)?;
    require(PROTOCOL, "password", &server.password)?;

    Ok(ShareLink::new("trojan", server.address.as_str(), server.port)
        .with_credential(server.password.as_str())
        .with_fragment(outbound_name(outbound, &server.address, server.port)))
}

fn check_endpoint(protocol: &'static str, address: &str, port: u16) -> Result<(), LinkError> {
    require(protocol, "address", address)?;
    if port == 0 {
        return Err(LinkError::MissingField {
            protocol,
            field: "port",
        });
    }
    Ok(())
}

fn require(protocol: &'static str, field: &'static str, value: &str) -> Result<(), LinkError> {
    if value.is_empty() {
        return Err(LinkError::MissingField { protocol, field });
    }
    Ok(())
}

/// The outbound's tag, or `<protocol>-<address>:<port>` when it has none.
fn outbound_name(outbound: &OutboundDescriptor, address: &str, port: u16) -> String {
    match outbound.display_tag() {
        Some(tag) => tag.to_string(),
        None => format!("{}-{}:{}", outbound.protocol.name(), address, port),
    }
}
