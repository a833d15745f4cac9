//! 20-byte Ethereum addresses as used by FEVM contracts.

use crate::fil_address::{FilAddress, Payload};
use crate::{CoreError, CoreResult, Network};
use filplus_config::{EAM_NAMESPACE, ETH_ADDRESS_SIZE};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// First byte of an Ethereum address that masks a Filecoin actor ID.
const ID_MASK_PREFIX: u8 = 0xff;

/// An Ethereum address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EthAddress([u8; ETH_ADDRESS_SIZE]);

impl EthAddress {
    /// The zero address, used as the sender of read-only calls
    pub const ZERO: EthAddress = EthAddress([0u8; ETH_ADDRESS_SIZE]);

    /// Creates an address from raw bytes
    pub const fn new(bytes: [u8; ETH_ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice that must be exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> CoreResult<Self> {
        let array: [u8; ETH_ADDRESS_SIZE] = bytes.try_into().map_err(|_| {
            CoreError::address(
                &hex::encode(bytes),
                format!("expected {ETH_ADDRESS_SIZE} bytes, got {}", bytes.len()),
            )
        })?;
        Ok(Self(array))
    }

    /// Creates the ID-masked address `0xff00..00<id>` of a Filecoin actor
    pub fn from_id(id: u64) -> Self {
        let mut bytes = [0u8; ETH_ADDRESS_SIZE];
        bytes[0] = ID_MASK_PREFIX;
        bytes[12..].copy_from_slice(&id.to_be_bytes());
        Self(bytes)
    }

    /// Gets the raw bytes
    pub fn as_bytes(&self) -> &[u8; ETH_ADDRESS_SIZE] {
        &self.0
    }

    /// Returns the actor ID if this is an ID-masked address
    pub fn as_id(&self) -> Option<u64> {
        if self.0[0] != ID_MASK_PREFIX || self.0[1..12].iter().any(|b| *b != 0) {
            return None;
        }
        let mut id = [0u8; 8];
        id.copy_from_slice(&self.0[12..]);
        Some(u64::from_be_bytes(id))
    }

    /// Converts to the Filecoin address the chain knows this account by.
    ///
    /// ID-masked addresses map to `f0` addresses, everything else to an
    /// `f410` delegated address in the EAM namespace.
    pub fn to_fil_address(&self, network: Network) -> FilAddress {
        let payload = match self.as_id() {
            Some(id) => Payload::Id(id),
            None => Payload::Delegated {
                namespace: EAM_NAMESPACE,
                subaddress: self.0.to_vec(),
            },
        };
        FilAddress::new(network, payload)
    }
}

impl FromStr for EthAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ETH_ADDRESS_SIZE * 2 {
            return Err(CoreError::address(
                s,
                format!("expected {} hex digits, got {}", ETH_ADDRESS_SIZE * 2, digits.len()),
            ));
        }
        let bytes = hex::decode(digits).map_err(|e| CoreError::address(s, e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthAddress({self})")
    }
}

impl From<[u8; ETH_ADDRESS_SIZE]> for EthAddress {
    fn from(bytes: [u8; ETH_ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }
}

impl Serialize for EthAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
