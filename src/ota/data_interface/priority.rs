use crate::ota::error::ConfigError;

use super::{Protocol, PRIMARY_DATA_PROTOCOL};

/// Number of data protocols a build can carry.
pub const MAX_DATA_PROTOCOLS: usize = 2;

/// Client-side ranking of the data protocols available to this agent.
///
/// Index 0 is the primary data protocol. Every entry appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolPriority(pub(super) heapless::Vec<Protocol, MAX_DATA_PROTOCOLS>);

impl ProtocolPriority {
    /// Rank `enabled` with `primary` first and the rest in the given order.
    pub fn new(primary: Protocol, enabled: &[Protocol]) -> Result<Self, ConfigError> {
        if enabled.is_empty() {
            return Err(ConfigError::NoDataProtocol);
        }

        if !enabled.contains(&primary) {
            return Err(ConfigError::PrimaryNotEnabled(primary));
        }

        let mut list = heapless::Vec::new();
        list.push(primary)
            .map_err(|_| ConfigError::TooManyProtocols)?;

        for (i, &protocol) in enabled.iter().enumerate() {
            if enabled[..i].contains(&protocol) {
                return Err(ConfigError::DuplicateProtocol(protocol));
            }
            if protocol != primary {
                list.push(protocol)
                    .map_err(|_| ConfigError::TooManyProtocols)?;
            }
        }

        Ok(Self(list))
    }

    /// The table described by the enabled `ota_*_data` features, with
    /// [`PRIMARY_DATA_PROTOCOL`] first.
    pub fn compiled() -> Self {
        let mut list = heapless::Vec::new();
        // Infallible: at most `MAX_DATA_PROTOCOLS` distinct entries.
        list.push(PRIMARY_DATA_PROTOCOL).ok();
        for protocol in Protocol::ALL {
            if protocol.is_compiled() && protocol != PRIMARY_DATA_PROTOCOL {
                list.push(protocol).ok();
            }
        }
        Self(list)
    }

    pub fn primary(&self) -> Option<Protocol> {
        self.0.first().copied()
    }

    pub fn as_slice(&self) -> &[Protocol] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Protocol> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, protocol: Protocol) -> bool {
        self.0.contains(&protocol)
    }

    /// Highest ranked protocol whose name occurs anywhere in `advertisement`.
    ///
    /// Matching is a case-sensitive byte substring test, not a token
    /// comparison: `"HTTP,MQTT"`, `"[\"MQTT\"]"` and `"MQTTv5"` all contain
    /// `MQTT`, while `"mqtt"` does not. Changing this changes which transport
    /// existing job documents negotiate.
    pub fn select(&self, advertisement: &[u8]) -> Option<Protocol> {
        self.iter()
            .find(|protocol| contains(advertisement, protocol.as_str().as_bytes()))
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_goes_first() {
        let priority =
            ProtocolPriority::new(Protocol::Http, &[Protocol::Mqtt, Protocol::Http]).unwrap();
        assert_eq!(priority.as_slice(), &[Protocol::Http, Protocol::Mqtt]);
        assert_eq!(priority.primary(), Some(Protocol::Http));

        let priority =
            ProtocolPriority::new(Protocol::Mqtt, &[Protocol::Mqtt, Protocol::Http]).unwrap();
        assert_eq!(priority.as_slice(), &[Protocol::Mqtt, Protocol::Http]);
    }

    #[test]
    fn rejects_inconsistent_tables() {
        assert_eq!(
            ProtocolPriority::new(Protocol::Mqtt, &[]),
            Err(ConfigError::NoDataProtocol)
        );
        assert_eq!(
            ProtocolPriority::new(Protocol::Mqtt, &[Protocol::Http]),
            Err(ConfigError::PrimaryNotEnabled(Protocol::Mqtt))
        );
        assert_eq!(
            ProtocolPriority::new(Protocol::Http, &[Protocol::Http, Protocol::Http]),
            Err(ConfigError::DuplicateProtocol(Protocol::Http))
        );
    }

    #[test]
    fn compiled_table_is_total() {
        let priority = ProtocolPriority::compiled();
        assert_eq!(priority.primary(), Some(PRIMARY_DATA_PROTOCOL));
        for protocol in Protocol::ALL {
            assert_eq!(priority.contains(protocol), protocol.is_compiled());
        }
        assert_eq!(
            priority.len(),
            Protocol::ALL.iter().filter(|p| p.is_compiled()).count()
        );
    }

    #[test]
    fn priority_wins_over_appearance_order() {
        let priority =
            ProtocolPriority::new(Protocol::Mqtt, &[Protocol::Mqtt, Protocol::Http]).unwrap();
        assert_eq!(priority.select(b"HTTP,MQTT"), Some(Protocol::Mqtt));
        assert_eq!(priority.select(b"MQTT,HTTP"), Some(Protocol::Mqtt));

        let priority =
            ProtocolPriority::new(Protocol::Http, &[Protocol::Mqtt, Protocol::Http]).unwrap();
        assert_eq!(priority.select(b"MQTT,HTTP"), Some(Protocol::Http));
    }

    #[test]
    fn single_match_selects_it() {
        for primary in Protocol::ALL {
            let priority =
                ProtocolPriority::new(primary, &[Protocol::Mqtt, Protocol::Http]).unwrap();
            assert_eq!(priority.select(b"[\"MQTT\"]"), Some(Protocol::Mqtt));
            assert_eq!(priority.select(b"HTTP"), Some(Protocol::Http));
        }
    }

    #[test]
    fn substring_and_case_sensitive() {
        let priority =
            ProtocolPriority::new(Protocol::Http, &[Protocol::Http, Protocol::Mqtt]).unwrap();
        assert_eq!(priority.select(b"mqtt-only-broker"), None);
        assert_eq!(priority.select(b"MQTTv5 only"), Some(Protocol::Mqtt));
        assert_eq!(priority.select(b"HTTPS"), Some(Protocol::Http));
        assert_eq!(priority.select(b""), None);
        assert_eq!(priority.select(b"COAP"), None);
    }

    #[test]
    fn single_protocol_still_requires_match() {
        let priority = ProtocolPriority::new(Protocol::Http, &[Protocol::Http]).unwrap();
        assert_eq!(priority.select(b"MQTT"), None);
        assert_eq!(priority.select(b"MQTT HTTP"), Some(Protocol::Http));
    }
}
