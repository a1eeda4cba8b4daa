use base64::prelude::*;
use xray_share_rs::ShareError;
use xray_share_rs::config::load_outbounds;
use xray_share_rs::convert_xray_json_to_share_links;
use xray_share_rs::share::share_links;

const SAMPLE_CONFIG: &str = r#"
{
    "log": { "loglevel": "warning" },
    "inbounds": [{ "port": 10808, "protocol": "socks" }],
    "outbounds": [
        {
            "tag": "ss-server",
            "protocol": "shadowsocks",
            "settings": {
                "servers": [{
                    "address": "62.133.60.43",
                    "port": 36456,
                    "method": "chacha20-ietf-poly1305",
                    "password": "TY29mbZbgplhc4vTT3xh3s"
                }]
            }
        },
        {
            "tag": "vmess-grpc",
            "protocol": "vmess",
            "settings": {
                "vnext": [{
                    "address": "vm.example.com",
                    "port": 443,
                    "users": [{ "id": "vmess-uuid", "security": "auto" }]
                }]
            },
            "streamSettings": {
                "network": "grpc",
                "security": "tls",
                "grpcSettings": { "serviceName": "tunnel" },
                "tlsSettings": { "serverName": "vm.example.com", "alpn": ["h2"] }
            }
        },
        {
            "tag": "vless reality",
            "protocol": "vless",
            "settings": {
                "address": "example.com",
                "port": 443,
                "id": "vless-uuid",
                "flow": "xtls-rprx-vision",
                "encryption": "none"
            },
            "streamSettings": {
                "network": "tcp",
                "security": "reality",
                "realitySettings": {
                    "fingerprint": "chrome",
                    "serverName": "download.example.net",
                    "publicKey": "testkey",
                    "shortId": "a8f264ef"
                }
            }
        },
        { "tag": "direct", "protocol": "freedom" },
        {
            "tag": "socks-out",
            "protocol": "socks",
            "settings": {
                "servers": [{
                    "address": "192.168.1.1",
                    "port": 1080,
                    "users": [{ "user": "alice", "pass": "hunter2" }]
                }]
            }
        },
        {
            "tag": "trojan-ws",
            "protocol": "trojan",
            "settings": { "address": "tj.example.com", "port": 8443, "password": "tj-pass" },
            "streamSettings": {
                "network": "ws",
                "security": "tls",
                "wsSettings": { "path": "/ws", "host": "cdn.example.com" },
                "tlsSettings": {
                    "fingerprint": "firefox",
                    "serverName": "cdn.example.com",
                    "allowInsecure": true
                }
            }
        },
        { "tag": "block", "protocol": "blackhole", "settings": { "response": { "type": "http" } } }
    ]
}
"#;

#[test]
fn test_end_to_end_links() {
    let output = convert_xray_json_to_share_links(SAMPLE_CONFIG.as_bytes())
        .expect("Failed to convert sample config");
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 5, "Expected one link per proxy outbound: {:?}", lines);
    assert_eq!(
        lines[1],
        "vmess://vmess-uuid@vm.example.com:443?encryption=auto&type=grpc&security=tls&mode=gun&serviceName=tunnel&sni=vm.example.com&alpn=h2#vmess-grpc"
    );
    assert_eq!(
        lines[2],
        "vless://vless-uuid@example.com:443?flow=xtls-rprx-vision&encryption=none&type=raw&security=reality&fp=chrome&sni=download.example.net&pbk=testkey&sid=a8f264ef#vless%20reality"
    );
    assert_eq!(
        lines[4],
        "trojan://tj-pass@tj.example.com:8443?type=ws&security=tls&path=%2Fws&host=cdn.example.com&fp=firefox&sni=cdn.example.com&allowInsecure=1#trojan-ws"
    );
}

#[test]
fn test_end_to_end_schemes_in_order() {
    let outbounds = load_outbounds(SAMPLE_CONFIG.as_bytes()).expect("Failed to load outbounds");
    assert_eq!(outbounds.len(), 7);

    let links = share_links(&outbounds).expect("Failed to build links");
    let schemes: Vec<&str> = links.iter().map(|l| l.scheme).collect();
    assert_eq!(schemes, vec!["ss", "vmess", "vless", "socks", "trojan"]);
}

#[test]
fn test_end_to_end_base64_credentials() {
    let links = share_links(&load_outbounds(SAMPLE_CONFIG.as_bytes()).unwrap()).unwrap();

    let ss = BASE64_STANDARD.decode(&links[0].credential).unwrap();
    assert_eq!(
        String::from_utf8(ss).unwrap(),
        "chacha20-ietf-poly1305:TY29mbZbgplhc4vTT3xh3s"
    );

    let socks = BASE64_STANDARD.decode(&links[3].credential).unwrap();
    assert_eq!(String::from_utf8(socks).unwrap(), "alice:hunter2");
}

#[test]
fn test_end_to_end_ss_userinfo_in_link() {
    let output = convert_xray_json_to_share_links(SAMPLE_CONFIG.as_bytes()).unwrap();
    let first = output.lines().next().unwrap();

    let userinfo = first
        .strip_prefix("ss://")
        .and_then(|rest| rest.split_once('@'))
        .map(|(userinfo, _)| userinfo)
        .expect("Missing userinfo");
    let userinfo = urlencoding::decode(userinfo).unwrap();
    let decoded = BASE64_STANDARD.decode(userinfo.as_bytes()).unwrap();
    assert_eq!(decoded, b"chacha20-ietf-poly1305:TY29mbZbgplhc4vTT3xh3s");
    assert!(first.ends_with("?type=raw&security=none#ss-server"));
}

#[test]
fn test_end_to_end_idempotent() {
    let first = convert_xray_json_to_share_links(SAMPLE_CONFIG.as_bytes()).unwrap();
    let second = convert_xray_json_to_share_links(SAMPLE_CONFIG.as_bytes()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_end_to_end_no_outbounds() {
    let err = convert_xray_json_to_share_links(br#"{ "outbounds": [] }"#).unwrap_err();
    assert!(err.is_no_valid_outbounds());
    assert_eq!(err.to_string(), "no valid outbounds");
}

#[test]
fn test_end_to_end_only_unsupported_protocols() {
    let config = r#"{ "outbounds": [{ "tag": "direct", "protocol": "freedom" }] }"#;
    let err = convert_xray_json_to_share_links(config.as_bytes()).unwrap_err();
    assert!(matches!(err, ShareError::NoValidOutbounds));
    assert_eq!(err.to_string(), "no valid outbounds");
}

#[test]
fn test_end_to_end_invalid_document() {
    let err = convert_xray_json_to_share_links(b"outbounds: []").unwrap_err();
    assert!(matches!(err, ShareError::Decode(_)));
    assert!(!err.is_no_valid_outbounds());
}

#[test]
fn test_end_to_end_grpc_mode_without_settings() {
    let config = r#"{
        "outbounds": [{
            "protocol": "trojan",
            "settings": { "address": "g.example", "port": 443, "password": "pw" },
            "streamSettings": { "network": "grpc" }
        }]
    }"#;
    let output = convert_xray_json_to_share_links(config.as_bytes()).unwrap();
    assert_eq!(
        output,
        "trojan://pw@g.example:443?type=grpc&security=none&mode=gun#trojan-g.example:443"
    );
}
