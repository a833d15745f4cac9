//! CLI Arguments Tests

use clap::Parser;
use filplus_cli::args::*;
use filplus_config::Network;
use filplus_core::{EthAddress, FilAddress};
use std::path::PathBuf;

#[cfg(test)]
mod args_tests {
    use super::*;

    const CONTRACT: &str = "0xd388ab098ed3e84c0d808776440b48f685198498";

    /// Global flags default to unset
    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["filplus", "list-contracts", CONTRACT]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.rpc_url, None);
        assert_eq!(args.token, None);
        assert_eq!(args.network, None);
        assert_eq!(args.confidence, None);
        assert_eq!(args.timeout, None);
        assert_eq!(args.log_level, LogLevel::Info);
        assert_eq!(
            args.command,
            Command::ListContracts {
                registry: CONTRACT.parse().unwrap()
            }
        );
    }

    /// Global flags may follow the subcommand
    #[test]
    fn test_global_flags_after_command() {
        let args = CliArgs::try_parse_from([
            "filplus",
            "list-allocators",
            CONTRACT,
            "--config",
            "filplus.toml",
            "--network",
            "calibnet",
            "--confidence",
            "2",
            "--timeout",
            "600",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("filplus.toml")));
        assert_eq!(args.network, Some(Network::Testnet));
        assert_eq!(args.confidence, Some(2));
        assert_eq!(args.timeout, Some(600));
        assert_eq!(args.log_level, LogLevel::Debug);
    }

    /// Write commands take an optional sender
    #[test]
    fn test_add_allowance_with_sender() {
        let args = CliArgs::try_parse_from([
            "filplus",
            "add-allowance",
            CONTRACT,
            "0xff00000000000000000000000000000000000005",
            "0x3e8",
            "--from",
            "f01001",
        ])
        .unwrap();
        match args.command {
            Command::AddAllowance {
                contract,
                allocator,
                amount,
                send,
            } => {
                assert_eq!(contract, CONTRACT.parse::<EthAddress>().unwrap());
                assert_eq!(allocator, EthAddress::from_id(5));
                assert_eq!(amount.to_string(), "1000");
                assert_eq!(send.from, Some(FilAddress::new_id(Network::Mainnet, 1001)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    /// Malformed addresses and amounts are rejected while parsing
    #[test]
    fn test_rejects_bad_values() {
        assert!(CliArgs::try_parse_from(["filplus", "list-contracts", "0x1234"]).is_err());
        assert!(CliArgs::try_parse_from([
            "filplus",
            "set-allowance",
            CONTRACT,
            CONTRACT,
            "-1"
        ])
        .is_err());
        assert!(CliArgs::try_parse_from([
            "filplus",
            "deploy-allocator-contract",
            CONTRACT,
            CONTRACT,
            "--from",
            "x0100"
        ])
        .is_err());
    }

    /// A subcommand is required
    #[test]
    fn test_requires_command() {
        assert!(CliArgs::try_parse_from(["filplus"]).is_err());
    }
}
