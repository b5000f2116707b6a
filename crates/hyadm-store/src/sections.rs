//! Lookups into the regions of the server document that user management touches.
//!
//! Expected shape:
//!
//! ```yaml
//! auth:
//!   type: userpass
//!   userpass:
//!     <username>: <password>
//! acme:
//!   domains: [<host>, ...]
//! listen: ":<port>" | "<host>:<port>" | "<port>"
//! obfs:
//!   type: <name>
//!   <name>: <secret> | { password: <secret> }
//! ```

use hyadm_core::{AUTH_MODE_USERPASS, DEFAULT_LISTEN_PORT};

use crate::document::{Mapping, Node};
use crate::error::StoreError;

/// Whether the `auth.type == userpass` check applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthMode {
    RequireUserpass,
    Any,
}

/// The `auth` mapping.
pub(crate) fn auth(root: &Mapping, mode: AuthMode) -> Result<&Mapping, StoreError> {
    let auth = root.get("auth").ok_or(StoreError::MissingAuthSection)?;
    let auth = auth
        .as_mapping()
        .ok_or_else(|| StoreError::malformed(format!("auth must be a mapping, found {}", auth.type_name())))?;
    if mode == AuthMode::RequireUserpass {
        check_userpass_mode(auth)?;
    }
    Ok(auth)
}

pub(crate) fn auth_mut(root: &mut Mapping, mode: AuthMode) -> Result<&mut Mapping, StoreError> {
    match root.get_mut("auth") {
        None => Err(StoreError::MissingAuthSection),
        Some(Node::Mapping(auth)) => {
            if mode == AuthMode::RequireUserpass {
                check_userpass_mode(auth)?;
            }
            Ok(auth)
        }
        Some(other) => Err(StoreError::malformed(format!(
            "auth must be a mapping, found {}",
            other.type_name()
        ))),
    }
}

fn check_userpass_mode(auth: &Mapping) -> Result<(), StoreError> {
    let found = auth.get("type").and_then(Node::as_str);
    if found == Some(AUTH_MODE_USERPASS) {
        Ok(())
    } else {
        Err(StoreError::InvalidAuthMode {
            found: found.map(str::to_owned),
        })
    }
}

fn userpass_must_be_mapping(node: Option<&Node>) -> StoreError {
    match node {
        Some(node) => StoreError::malformed(format!(
            "auth.userpass must be a mapping, found {}",
            node.type_name()
        )),
        None => StoreError::malformed("auth.userpass must be a mapping, found nothing"),
    }
}

/// The `auth.userpass` mapping, which must already exist.
pub(crate) fn userpass(auth: &Mapping) -> Result<&Mapping, StoreError> {
    let node = auth.get("userpass");
    node.and_then(Node::as_mapping)
        .ok_or_else(|| userpass_must_be_mapping(node))
}

pub(crate) fn userpass_mut(auth: &mut Mapping) -> Result<&mut Mapping, StoreError> {
    match auth.get_mut("userpass") {
        Some(Node::Mapping(users)) => Ok(users),
        other => Err(userpass_must_be_mapping(other.map(|n| &*n))),
    }
}

/// The `auth.userpass` mapping, appended to `auth` when absent.
pub(crate) fn userpass_or_insert(auth: &mut Mapping) -> Result<&mut Mapping, StoreError> {
    let node = auth.get_or_insert_mapping("userpass");
    let type_name = node.type_name();
    node.as_mapping_mut().ok_or_else(|| {
        StoreError::malformed(format!("auth.userpass must be a mapping, found {type_name}"))
    })
}

/// Host from `acme.domains[0]`, trimmed.
pub(crate) fn read_host(root: &Mapping) -> Result<String, StoreError> {
    let acme = root
        .get("acme")
        .and_then(Node::as_mapping)
        .ok_or(StoreError::MissingHost("acme section not found"))?;
    let first = acme
        .get("domains")
        .and_then(Node::as_sequence)
        .and_then(|domains| domains.first())
        .ok_or(StoreError::MissingHost("acme.domains[0] is required"))?;
    let host = first.as_str().unwrap_or_default().trim();
    if host.is_empty() {
        return Err(StoreError::MissingHost("acme.domains[0] is empty"));
    }
    Ok(host.to_owned())
}

/// Port from `listen`, defaulting to 443 when absent or blank.
pub(crate) fn read_port(root: &Mapping) -> Result<u16, StoreError> {
    let listen = match root.get("listen") {
        None => return Ok(DEFAULT_LISTEN_PORT),
        Some(node) => node
            .as_str()
            .ok_or_else(|| StoreError::InvalidPort(format!("<{}>", node.type_name())))?,
    };
    let value = listen.trim();
    if value.is_empty() {
        return Ok(DEFAULT_LISTEN_PORT);
    }
    parse_listen_port(value).ok_or_else(|| StoreError::InvalidPort(value.to_owned()))
}

/// Accepts `:PORT`, `HOST:PORT`, `[V6]:PORT` and a bare `PORT`.
fn parse_listen_port(value: &str) -> Option<u16> {
    if let Some(port) = value.strip_prefix(':') {
        return port.parse().ok();
    }
    match split_host_port(value) {
        Some((_, port)) => port.parse().ok(),
        None => value.parse().ok(),
    }
}

fn split_host_port(value: &str) -> Option<(&str, &str)> {
    if let Some(rest) = value.strip_prefix('[') {
        let (host, after) = rest.split_once(']')?;
        let port = after.strip_prefix(':')?;
        return Some((host, port));
    }
    let (host, port) = value.rsplit_once(':')?;
    if host.contains(':') {
        // Unbracketed IPv6 literal.
        return None;
    }
    Some((host, port))
}

/// Obfuscation `(type, secret)`; both empty when `obfs.type` is absent or blank.
///
/// The secret is `obfs.<type>` when that is a scalar, otherwise
/// `obfs.<type>.password`, otherwise empty.
pub(crate) fn read_obfs(root: &Mapping) -> (String, String) {
    let Some(obfs) = root.get("obfs").and_then(Node::as_mapping) else {
        return (String::new(), String::new());
    };
    let obfs_type = obfs
        .get("type")
        .and_then(Node::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if obfs_type.is_empty() {
        return (String::new(), String::new());
    }

    let secret = match obfs.get(obfs_type) {
        Some(Node::Scalar(s)) => s.value().trim(),
        Some(Node::Mapping(m)) => m
            .get("password")
            .and_then(Node::as_str)
            .map(str::trim)
            .unwrap_or_default(),
        _ => "",
    };
    (obfs_type.to_owned(), secret.to_owned())
}
