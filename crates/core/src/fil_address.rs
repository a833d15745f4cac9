//! Filecoin addresses in their textual form (`f0…`, `f1…`, `f410f…`).

use crate::{base32, varint, CoreError, CoreResult, Network};
use blake2::digest::consts::U4;
use blake2::{Blake2b, Digest};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

type Blake2b32 = Blake2b<U4>;

const CHECKSUM_SIZE: usize = 4;
const PAYLOAD_HASH_SIZE: usize = 20;
const BLS_PUBLIC_KEY_SIZE: usize = 48;
const MAX_SUBADDRESS_SIZE: usize = 54;

/// Address payload, one variant per protocol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    /// Protocol 0: actor ID
    Id(u64),
    /// Protocol 1: blake2b-160 of a secp256k1 public key
    Secp256k1([u8; PAYLOAD_HASH_SIZE]),
    /// Protocol 2: blake2b-160 of actor creation data
    Actor([u8; PAYLOAD_HASH_SIZE]),
    /// Protocol 3: BLS public key
    Bls(Vec<u8>),
    /// Protocol 4: address delegated to the actor owning `namespace`
    Delegated { namespace: u64, subaddress: Vec<u8> },
}

impl Payload {
    /// Gets the protocol number
    pub fn protocol(&self) -> u8 {
        match self {
            Payload::Id(_) => 0,
            Payload::Secp256k1(_) => 1,
            Payload::Actor(_) => 2,
            Payload::Bls(_) => 3,
            Payload::Delegated { .. } => 4,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Payload::Id(id) => varint::write_u64(*id, &mut out),
            Payload::Secp256k1(hash) | Payload::Actor(hash) => out.extend_from_slice(hash),
            Payload::Bls(key) => out.extend_from_slice(key),
            Payload::Delegated {
                namespace,
                subaddress,
            } => {
                varint::write_u64(*namespace, &mut out);
                out.extend_from_slice(subaddress);
            }
        }
        out
    }
}

/// A Filecoin address bound to a network
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilAddress {
    network: Network,
    payload: Payload,
}

impl FilAddress {
    /// Creates a new address
    pub fn new(network: Network, payload: Payload) -> Self {
        Self { network, payload }
    }

    /// Creates an ID address
    pub fn new_id(network: Network, id: u64) -> Self {
        Self::new(network, Payload::Id(id))
    }

    /// Gets the network
    pub fn network(&self) -> Network {
        self.network
    }

    /// Gets the payload
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Gets the actor ID of an ID address
    pub fn id(&self) -> Option<u64> {
        match self.payload {
            Payload::Id(id) => Some(id),
            _ => None,
        }
    }

    fn checksum(&self) -> [u8; CHECKSUM_SIZE] {
        let mut hasher = Blake2b32::new();
        hasher.update([self.payload.protocol()]);
        hasher.update(self.payload.to_bytes());
        hasher.finalize().into()
    }
}

impl fmt::Display for FilAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.network.address_prefix();
        let protocol = self.payload.protocol();
        let body = |raw: &[u8]| {
            let mut data = raw.to_vec();
            data.extend_from_slice(&self.checksum());
            base32::encode(&data)
        };
        match &self.payload {
            Payload::Id(id) => write!(f, "{prefix}{protocol}{id}"),
            Payload::Secp256k1(hash) | Payload::Actor(hash) => {
                write!(f, "{prefix}{protocol}{}", body(hash))
            }
            Payload::Bls(key) => write!(f, "{prefix}{protocol}{}", body(key)),
            Payload::Delegated {
                namespace,
                subaddress,
            } => write!(f, "{prefix}{protocol}{namespace}f{}", body(subaddress)),
        }
    }
}

impl FromStr for FilAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let network = chars
            .next()
            .and_then(Network::from_prefix)
            .ok_or_else(|| CoreError::address(s, "unknown network prefix"))?;
        let protocol = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| CoreError::address(s, "missing protocol"))?;
        let rest = chars.as_str();
        if rest.is_empty() {
            return Err(CoreError::address(s, "missing payload"));
        }

        let (payload, encoded) = match protocol {
            0 => {
                if rest.len() > 20 || !rest.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CoreError::address(s, "invalid actor ID"));
                }
                let id = rest
                    .parse::<u64>()
                    .map_err(|e| CoreError::address(s, e.to_string()))?;
                return Ok(Self::new(network, Payload::Id(id)));
            }
            1 | 2 => {
                let (raw, encoded) = split_checksum(s, rest)?;
                let hash: [u8; PAYLOAD_HASH_SIZE] = raw.as_slice().try_into().map_err(|_| {
                    CoreError::address(s, format!("expected {PAYLOAD_HASH_SIZE} byte payload"))
                })?;
                let payload = if protocol == 1 {
                    Payload::Secp256k1(hash)
                } else {
                    Payload::Actor(hash)
                };
                (payload, encoded)
            }
            3 => {
                let (raw, encoded) = split_checksum(s, rest)?;
                if raw.len() != BLS_PUBLIC_KEY_SIZE {
                    return Err(CoreError::address(
                        s,
                        format!("expected {BLS_PUBLIC_KEY_SIZE} byte payload"),
                    ));
                }
                (Payload::Bls(raw), encoded)
            }
            4 => {
                let (namespace, body) = rest
                    .split_once('f')
                    .ok_or_else(|| CoreError::address(s, "missing namespace separator"))?;
                let namespace = namespace
                    .parse::<u64>()
                    .map_err(|e| CoreError::address(s, format!("invalid namespace: {e}")))?;
                let (raw, encoded) = split_checksum(s, body)?;
                if raw.len() > MAX_SUBADDRESS_SIZE {
                    return Err(CoreError::address(s, "subaddress too long"));
                }
                (
                    Payload::Delegated {
                        namespace,
                        subaddress: raw,
                    },
                    encoded,
                )
            }
            other => return Err(CoreError::address(s, format!("unknown protocol {other}"))),
        };

        let address = Self::new(network, payload);
        if address.checksum() != encoded {
            return Err(CoreError::address(s, "checksum mismatch"));
        }
        Ok(address)
    }
}

fn split_checksum(input: &str, body: &str) -> CoreResult<(Vec<u8>, [u8; CHECKSUM_SIZE])> {
    let mut data = base32::decode(body).map_err(|e| CoreError::address(input, e.to_string()))?;
    if data.len() < CHECKSUM_SIZE {
        return Err(CoreError::address(input, "payload shorter than checksum"));
    }
    let split = data.len() - CHECKSUM_SIZE;
    let mut checksum = [0u8; CHECKSUM_SIZE];
    checksum.copy_from_slice(&data[split..]);
    data.truncate(split);
    Ok((data, checksum))
}

impl Serialize for FilAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FilAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
