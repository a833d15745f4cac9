//! Console output of command results.

use filplus_core::{DecodedEvent, EthAddress};
use filplus_rpc_client::Invocation;
use std::io::{self, Write};

/// Writes the outcome of a successful write call
pub fn write_invocation<W: Write>(out: &mut W, invocation: &Invocation) -> io::Result<()> {
    if !invocation.return_values.is_empty() {
        let values: Vec<String> = invocation
            .return_values
            .iter()
            .map(ToString::to_string)
            .collect();
        writeln!(out, "Returned: {}", values.join(" "))?;
    }
    if invocation.receipt.events_root.is_some() {
        writeln!(out, "Events emitted:")?;
        write_events(out, &invocation.events)?;
    }
    writeln!(out, "OK")
}

/// Writes events in emission order, one line per entry
pub fn write_events<W: Write>(out: &mut W, events: &[DecodedEvent]) -> io::Result<()> {
    for event in events {
        writeln!(out, "\tEmitter ID: {}", event.emitter)?;
        for entry in &event.entries {
            writeln!(
                out,
                "\t\tKey: {}, Value: 0x{}, Flags: b{:b}",
                entry.key,
                hex::encode(&entry.value),
                entry.flags
            )?;
        }
    }
    Ok(())
}

/// Writes a bracketed, space separated address list
pub fn write_address_list<W: Write>(out: &mut W, addresses: &[EthAddress]) -> io::Result<()> {
    let items: Vec<String> = addresses.iter().map(ToString::to_string).collect();
    writeln!(out, "[{}]", items.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use filplus_core::{ContentAddress, DecodedEntry, MessageReference, Receipt};

    fn invocation(events_root: Option<ContentAddress>, events: Vec<DecodedEvent>) -> Invocation {
        Invocation {
            message: MessageReference(ContentAddress::for_dag_cbor(b"m")),
            receipt: Receipt {
                exit_code: 0,
                return_data: Vec::new(),
                gas_used: 1,
                events_root,
            },
            return_values: Vec::new(),
            events,
        }
    }

    #[test]
    fn test_event_lines() {
        let events = vec![DecodedEvent {
            index: 0,
            emitter: 1024,
            entries: vec![DecodedEntry {
                key: "t1".to_string(),
                value: vec![0xde, 0xad],
                flags: 3,
                codec: Some(0x55),
            }],
        }];
        let mut out = Vec::new();
        write_invocation(
            &mut out,
            &invocation(Some(ContentAddress::for_dag_cbor(b"events")), events),
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Events emitted:\n\tEmitter ID: 1024\n\t\tKey: t1, Value: 0xdead, Flags: b11\nOK\n"
        );
    }

    #[test]
    fn test_no_events() {
        let mut out = Vec::new();
        write_invocation(&mut out, &invocation(None, Vec::new())).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "OK\n");
    }

    #[test]
    fn test_address_list() {
        let mut out = Vec::new();
        write_address_list(&mut out, &[EthAddress::from_id(1), EthAddress::from_id(2)]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[0xff00000000000000000000000000000000000001 0xff00000000000000000000000000000000000002]\n"
        );
    }
}
