use std::fmt;
use std::net::Ipv6Addr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

// Characters left as-is in each URI component; everything else is escaped.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

const FRAGMENT: &AsciiSet = &USERINFO
    .remove(b'!')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'/')
    .remove(b':')
    .remove(b'?')
    .remove(b'@');

/// A share link for one outbound.
///
/// Query parameters keep insertion order so output is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub scheme: &'static str,
    pub host: String,
    pub port: u16,
    pub credential: String,
    pub fragment: String,
    query: Vec<(&'static str, String)>,
}

impl ShareLink {
    pub fn new(scheme: &'static str, host: impl Into<String>, port: u16) -> Self {
        ShareLink {
            scheme,
            host: host.into(),
            port,
            credential: String::new(),
            fragment: String::new(),
            query: Vec::new(),
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = credential.into();
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = fragment.into();
        self
    }

    pub fn push_query(&mut self, key: &'static str, value: impl Into<String>) {
        self.query.push((key, value.into()));
    }

    /// Append `key=value` unless `value` is empty.
    pub fn push_query_non_empty(&mut self, key: &'static str, value: &str) {
        if !value.is_empty() {
            self.push_query(key, value);
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Encoded query string without the leading `?`.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(key, value)| format!("{}={}", key, escape_query_value(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn authority_host(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme)?;
        if !self.credential.is_empty() {
            write!(f, "{}@", utf8_percent_encode(&self.credential, USERINFO))?;
        }
        write!(f, "{}:{}", self.authority_host(), self.port)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query_string())?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", utf8_percent_encode(&self.fragment, FRAGMENT))?;
        }
        Ok(())
    }
}

/// Form-style escaping: unreserved characters stay, space becomes `+`.
pub fn escape_query_value(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}
