use crate::config::stream::{SecurityKind, StreamSettings, TransportKind};
use crate::link::ShareLink;

/// Append transport and security parameters to `link`.
///
/// `type` and `security` always come first, followed by the transport's
/// parameters and then the security layer's. Missing or malformed nested
/// settings only drop the parameters they would have produced.
pub fn append_stream_query(stream: Option<&StreamSettings>, link: &mut ShareLink) {
    let default_stream = StreamSettings::default();
    let stream = stream.unwrap_or(&default_stream);

    let transport = stream.transport();
    let security = stream.security_kind();
    link.push_query("type", transport.as_str());
    link.push_query("security", security.as_str());

    append_transport(stream, &transport, link);
    append_security(stream, &security, link);
}

fn append_transport(stream: &StreamSettings, transport: &TransportKind, link: &mut ShareLink) {
    match transport {
        TransportKind::Raw => {
            let Some(header) = stream.raw_settings.as_ref().and_then(|raw| raw.decode_header())
            else {
                return;
            };
            if header.kind.is_empty() {
                return;
            }
            link.push_query("headerType", header.kind.as_str());

            let Some(request) = header.request else {
                return;
            };
            if !request.path.is_empty() {
                link.push_query("path", request.path.join());
            }
            if let Some(headers) = request.headers {
                if !headers.host.is_empty() {
                    link.push_query("host", headers.host.join());
                }
            }
        }
        TransportKind::Kcp => {
            let Some(kcp) = &stream.kcp_settings else {
                return;
            };
            if let Some(seed) = &kcp.seed {
                link.push_query_non_empty("seed", seed);
            }
            if let Some(header) = kcp.decode_header() {
                link.push_query_non_empty("headerType", &header.kind);
            }
        }
        TransportKind::Ws => {
            let Some(ws) = &stream.ws_settings else {
                return;
            };
            link.push_query_non_empty("path", &ws.path);
            link.push_query_non_empty("host", &ws.host);
        }
        TransportKind::Grpc => {
            let grpc = stream.grpc_settings.clone().unwrap_or_default();
            link.push_query("mode", if grpc.multi_mode { "multi" } else { "gun" });
            link.push_query_non_empty("serviceName", &grpc.service_name);
            link.push_query_non_empty("authority", &grpc.authority);
        }
        TransportKind::HttpUpgrade => {
            let Some(upgrade) = &stream.httpupgrade_settings else {
                return;
            };
            link.push_query_non_empty("host", &upgrade.host);
            link.push_query_non_empty("path", &upgrade.path);
        }
        TransportKind::Xhttp => {
            let Some(xhttp) = &stream.xhttp_settings else {
                return;
            };
            link.push_query_non_empty("host", &xhttp.host);
            link.push_query_non_empty("path", &xhttp.path);
            link.push_query_non_empty("mode", &xhttp.mode);
            if let Some(extra) = xhttp.extra_json() {
                link.push_query("extra", extra);
            }
        }
        TransportKind::Other(name) => {
            log::debug!("No share parameters known for transport {:?}", name);
        }
    }
}

fn append_security(stream: &StreamSettings, security: &SecurityKind, link: &mut ShareLink) {
    match security {
        SecurityKind::Tls => {
            let Some(tls) = &stream.tls_settings else {
                return;
            };
            link.push_query_non_empty("fp", &tls.fingerprint);
            link.push_query_non_empty("sni", &tls.server_name);
            if !tls.alpn.is_empty() {
                link.push_query("alpn", tls.alpn.join());
            }
            if tls.allow_insecure {
                link.push_query("allowInsecure", "1");
            }
        }
        SecurityKind::Reality => {
            let Some(reality) = &stream.reality_settings else {
                return;
            };
            link.push_query_non_empty("fp", &reality.fingerprint);
            link.push_query_non_empty("sni", &reality.server_name);
            link.push_query_non_empty("pbk", &reality.password);
            link.push_query_non_empty("sid", &reality.short_id);
            link.push_query_non_empty("pqv", &reality.mldsa65_verify);
            link.push_query_non_empty("spx", &reality.spider_x);
        }
        SecurityKind::None | SecurityKind::Other(_) => {}
    }
}
