//! Calldata Tests
//!
//! Golden encodings of the allocator contract calls as they are submitted
//! to the EVM actor.

use filplus_abi::*;
use filplus_core::EthAddress;
use num_bigint::BigInt;

#[cfg(test)]
mod calldata_tests {
    use super::*;

    const ALLOCATOR: &str = "0xabc0000000000000000000000000000000000def";

    fn add_allowance_calldata() -> Calldata {
        let method = MethodDescriptor::parse("addAllowance(address,uint256)").unwrap();
        let allocator: EthAddress = ALLOCATOR.parse().unwrap();
        method
            .encode_call(&[allocator.into(), 1000u64.into()])
            .unwrap()
    }

    /// Selector, left-padded address, big-endian amount
    #[test]
    fn test_add_allowance_calldata() {
        let calldata = add_allowance_calldata();
        let expected = concat!(
            "f3c40c4b",
            "000000000000000000000000abc0000000000000000000000000000000000def",
            "00000000000000000000000000000000000000000000000000000000000003e8",
        );
        assert_eq!(hex::encode(calldata.as_bytes()), expected);
    }

    /// The wrapped form is the calldata behind a single byte-string header
    #[test]
    fn test_add_allowance_wrapped() {
        let calldata = add_allowance_calldata();
        let raw = calldata.as_bytes().to_vec();
        let wrapped = calldata.wrap();

        assert_eq!(raw.len(), 68);
        assert_eq!(&wrapped.as_bytes()[..2], &[0x58, 0x44]);
        assert_eq!(&wrapped.as_bytes()[2..], raw.as_slice());
        assert_eq!(unwrap_bytes(wrapped.as_bytes()).unwrap(), raw);
    }

    /// Wrapping twice yields bytes distinct from the single-wrap golden form
    #[test]
    fn test_double_wrap_is_detectable() {
        let single = add_allowance_calldata().wrap();
        let double = Calldata::new(single.as_bytes().to_vec()).wrap();

        assert_ne!(double.as_bytes(), single.as_bytes());
        assert_eq!(&double.as_bytes()[..2], &[0x58, 0x46]);
        // one unwrap of the double form gives back the single form, not calldata
        assert_eq!(unwrap_bytes(double.as_bytes()).unwrap(), single.as_bytes());
    }

    /// A value wider than the parameter is rejected rather than truncated
    #[test]
    fn test_amount_overflow() {
        let method = MethodDescriptor::parse("addAllowance(address,uint256)").unwrap();
        let too_big: BigInt = BigInt::from(1u8) << 256;
        let err = method
            .encode_call(&[EthAddress::ZERO.into(), too_big.into()])
            .unwrap_err();
        assert!(matches!(err, AbiError::ArgumentTypeMismatch { index: 1, .. }));
    }

    /// Return data of a list call decodes into addresses
    #[test]
    fn test_decode_address_list() {
        let method = MethodDescriptor::parse("allocators() returns (address[])").unwrap();
        let first = EthAddress::from_id(1001);
        let second: EthAddress = ALLOCATOR.parse().unwrap();

        let data = encoder::encode(
            method.outputs(),
            &[AbiValue::Array(vec![first.into(), second.into()])],
        )
        .unwrap();
        let values = method.decode_output(&data).unwrap();

        let addresses: Vec<EthAddress> = values[0]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_address().unwrap())
            .collect();
        assert_eq!(addresses, vec![first, second]);
    }
}
