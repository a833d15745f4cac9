//! Content addresses (CIDs) of immutable chain objects.

use crate::{base32, varint, CoreError, CoreResult};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

type Blake2b256 = Blake2b<U32>;

/// Multicodec of DAG-CBOR encoded IPLD blocks.
pub const DAG_CBOR: u64 = 0x71;
/// Multicodec of raw blocks.
pub const RAW: u64 = 0x55;
/// Multihash code of blake2b-256.
pub const BLAKE2B_256: u64 = 0xb220;
/// Multihash code of sha2-256.
pub const SHA2_256: u64 = 0x12;

/// Identifier of the multibase base32 lowercase encoding.
const MULTIBASE_BASE32: char = 'b';

/// A binary CID identifying an immutable object held by the node.
///
/// Stored in its binary form. `Display` renders CIDv1 as multibase base32
/// (`bafy…`) and CIDv0 as base58 (`Qm…`), matching what Lotus prints.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentAddress {
    bytes: Vec<u8>,
}

impl ContentAddress {
    /// Creates a content address from binary CID bytes
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        if is_cid_v0(bytes) {
            return Ok(Self {
                bytes: bytes.to_vec(),
            });
        }

        let (version, mut pos) = varint::read_u64(bytes).map_err(|e| CoreError::cid(e.to_string()))?;
        if version != 1 {
            return Err(CoreError::cid(format!("unsupported CID version {version}")));
        }

        let (_codec, read) =
            varint::read_u64(&bytes[pos..]).map_err(|e| CoreError::cid(e.to_string()))?;
        pos += read;
        let (_hash_code, read) =
            varint::read_u64(&bytes[pos..]).map_err(|e| CoreError::cid(e.to_string()))?;
        pos += read;
        let (digest_len, read) =
            varint::read_u64(&bytes[pos..]).map_err(|e| CoreError::cid(e.to_string()))?;
        pos += read;

        let remaining = bytes.len() - pos;
        if digest_len != remaining as u64 {
            return Err(CoreError::cid(format!(
                "multihash declares {digest_len} digest bytes but {remaining} follow"
            )));
        }

        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Creates a CIDv1 from codec, multihash code and digest
    pub fn new_v1(codec: u64, hash_code: u64, digest: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(digest.len() + 8);
        varint::write_u64(1, &mut bytes);
        varint::write_u64(codec, &mut bytes);
        varint::write_u64(hash_code, &mut bytes);
        varint::write_u64(digest.len() as u64, &mut bytes);
        bytes.extend_from_slice(digest);
        Self { bytes }
    }

    /// Computes the blake2b-256 DAG-CBOR CID of an encoded block, the way
    /// Filecoin addresses its state objects
    pub fn for_dag_cbor(block: &[u8]) -> Self {
        let digest = Blake2b256::digest(block);
        Self::new_v1(DAG_CBOR, BLAKE2B_256, &digest)
    }

    /// Gets the binary CID
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Gets the CID version
    pub fn version(&self) -> u64 {
        if is_cid_v0(&self.bytes) {
            0
        } else {
            1
        }
    }

    /// Gets the multicodec of the addressed block
    pub fn codec(&self) -> u64 {
        if is_cid_v0(&self.bytes) {
            return DAG_PB;
        }
        // Validated on construction.
        varint::read_u64(&self.bytes)
            .and_then(|(_, version_len)| varint::read_u64(&self.bytes[version_len..]))
            .map(|(codec, _)| codec)
            .unwrap_or_default()
    }

    /// Encodes the CID as the payload of a DAG-CBOR link (tag 42), which
    /// carries a leading multibase identity byte.
    pub fn to_link_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.bytes.len() + 1);
        out.push(0x00);
        out.extend_from_slice(&self.bytes);
        out
    }

    /// Decodes the payload of a DAG-CBOR link
    pub fn from_link_bytes(bytes: &[u8]) -> CoreResult<Self> {
        match bytes.split_first() {
            Some((0x00, cid)) => Self::from_bytes(cid),
            Some((prefix, _)) => Err(CoreError::cid(format!(
                "link has multibase prefix 0x{prefix:02x}, expected identity"
            ))),
            None => Err(CoreError::cid("empty link")),
        }
    }
}

const DAG_PB: u64 = 0x70;

fn is_cid_v0(bytes: &[u8]) -> bool {
    bytes.len() == 34 && bytes[0] == SHA2_256 as u8 && bytes[1] == 0x20
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_cid_v0(&self.bytes) {
            write!(f, "{}", bs58::encode(&self.bytes).into_string())
        } else {
            write!(f, "{}{}", MULTIBASE_BASE32, base32::encode(&self.bytes))
        }
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({})", self)
    }
}

impl FromStr for ContentAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 46 && s.starts_with("Qm") {
            let bytes = bs58::decode(s)
                .into_vec()
                .map_err(|e| CoreError::cid(format!("invalid base58: {e}")))?;
            return Self::from_bytes(&bytes);
        }

        match s.strip_prefix(MULTIBASE_BASE32) {
            Some(body) => Self::from_bytes(&base32::decode(body)?),
            None => Err(CoreError::cid(format!(
                "unsupported multibase in '{s}', expected base32 ('b')"
            ))),
        }
    }
}

/// Lotus renders CIDs in JSON as `{"/": "bafy…"}`.
#[derive(Serialize, Deserialize)]
struct JsonLink {
    #[serde(rename = "/")]
    link: String,
}

impl Serialize for ContentAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JsonLink {
            link: self.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let link = JsonLink::deserialize(deserializer)?;
        link.link.parse().map_err(D::Error::custom)
    }
}
