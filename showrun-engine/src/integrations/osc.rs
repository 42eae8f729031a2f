//! OSC output over UDP
//!
//! Messages go to `<prefix>/<key>` with at most one argument.

use std::fmt;
use std::net::SocketAddr;

use rosc::{OscMessage, OscPacket, OscType};
use tokio::net::UdpSocket;
use tracing::{debug, info};

use super::SendOutcome;
use crate::config::OscConfig;
use crate::error::{Error, Result};

/// Fixed OSC message vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OscKey {
    Play,
    Pause,
    Stop,
    Prev,
    Next,
    Reload,
    Finished,
    Time,
    Overtime,
    Title,
    EventNumber,
    Presenter,
}

impl OscKey {
    pub fn as_str(self) -> &'static str {
        match self {
            OscKey::Play => "play",
            OscKey::Pause => "pause",
            OscKey::Stop => "stop",
            OscKey::Prev => "prev",
            OscKey::Next => "next",
            OscKey::Reload => "reload",
            OscKey::Finished => "finished",
            OscKey::Time => "time",
            OscKey::Overtime => "overtime",
            OscKey::Title => "title",
            OscKey::EventNumber => "eventNumber",
            OscKey::Presenter => "presenter",
        }
    }
}

impl fmt::Display for OscKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OSC argument; every message carries at most one string
#[derive(Debug, Clone, PartialEq)]
pub enum OscPayload {
    Text(String),
}

impl From<OscPayload> for OscType {
    fn from(payload: OscPayload) -> Self {
        match payload {
            OscPayload::Text(s) => OscType::String(s),
        }
    }
}

/// Build the full OSC address for `key`
pub fn address(prefix: &str, key: OscKey) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        format!("/{}", key)
    } else if prefix.starts_with('/') {
        format!("{}/{}", prefix, key)
    } else {
        format!("/{}/{}", prefix, key)
    }
}

/// Encode one OSC message
pub fn encode(prefix: &str, key: OscKey, payload: Option<OscPayload>) -> Result<Vec<u8>> {
    let packet = OscPacket::Message(OscMessage {
        addr: address(prefix, key),
        args: payload.into_iter().map(OscType::from).collect(),
    });
    rosc::encoder::encode(&packet).map_err(|e| Error::Integration(format!("OSC encode: {}", e)))
}

struct Destination {
    socket: UdpSocket,
    target: SocketAddr,
}

/// OSC sender; inert when disabled in config
pub struct OscClient {
    destination: Option<Destination>,
    prefix: String,
}

impl OscClient {
    /// Bind a local UDP socket and resolve the destination
    pub async fn connect(config: &OscConfig) -> Result<Self> {
        if !config.enabled {
            info!("OSC output disabled");
            return Ok(Self::disabled());
        }

        let target = tokio::net::lookup_host((config.host.as_str(), config.port))
            .await
            .map_err(|e| Error::Integration(format!("Cannot resolve OSC host {}: {}", config.host, e)))?
            .next()
            .ok_or_else(|| Error::Integration(format!("No address for OSC host {}", config.host)))?;

        let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr).await?;

        info!("OSC output to {} with prefix {}", target, config.prefix);
        Ok(Self {
            destination: Some(Destination { socket, target }),
            prefix: config.prefix.clone(),
        })
    }

    pub fn disabled() -> Self {
        Self {
            destination: None,
            prefix: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.destination.is_some()
    }

    /// Send one message; never returns an error
    pub async fn send(&self, key: OscKey, payload: Option<OscPayload>) -> SendOutcome {
        let Some(destination) = &self.destination else {
            return SendOutcome::skipped(format!("OSC disabled, dropped {}", key));
        };

        let bytes = match encode(&self.prefix, key, payload) {
            Ok(bytes) => bytes,
            Err(e) => return SendOutcome::failed(e.to_string()),
        };

        match destination.socket.send_to(&bytes, destination.target).await {
            Ok(_) => {
                debug!("OSC {} sent to {}", key, destination.target);
                SendOutcome::ok(format!("sent {}", key))
            }
            Err(e) => SendOutcome::failed(format!("OSC {} to {}: {}", key, destination.target, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_normalises_prefix() {
        assert_eq!(address("/showrun", OscKey::Play), "/showrun/play");
        assert_eq!(address("/showrun/", OscKey::Stop), "/showrun/stop");
        assert_eq!(address("venue", OscKey::EventNumber), "/venue/eventNumber");
        assert_eq!(address("", OscKey::Overtime), "/overtime");
    }

    #[test]
    fn test_encode_decodes_back() {
        let bytes = encode("/showrun", OscKey::Title, Some(OscPayload::Text("Keynote".into()))).unwrap();
        let (_, packet) = rosc::decoder::decode_udp(&bytes).unwrap();

        match packet {
            OscPacket::Message(msg) => {
                assert_eq!(msg.addr, "/showrun/title");
                assert_eq!(msg.args, vec![OscType::String("Keynote".into())]);
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disabled_client_skips() {
        let client = OscClient::disabled();
        let outcome = client.send(OscKey::Play, None).await;
        assert!(outcome.success);
        assert!(!client.is_enabled());
    }
}
