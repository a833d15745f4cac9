//! Filecoin Plus ABI
//!
//! Solidity ABI codec for calling FEVM contracts: signature parsing,
//! argument encoding, return data decoding, and the byte-string framing
//! FEVM uses for `InvokeContract` parameters and event values.

pub mod decoder;
pub mod descriptor;
pub mod encoder;
pub mod error;
pub mod framing;
pub mod param_type;
pub mod signature;
pub mod value;

pub use descriptor::{MethodDescriptor, SELECTOR_SIZE};
pub use error::{AbiError, AbiResult};
pub use framing::{
    decode_self_describing_bytes, frame_bytes, unwrap_bytes, Calldata, WrappedCalldata,
};
pub use param_type::ParamType;
pub use signature::parse_signature;
pub use value::AbiValue;
