use std::io::BufRead;

use crate::reading::Values;

use super::Result;

/// Counter columns of `/proc/net/dev`, in file order.
const FIELDS: [&str; 16] = [
    "rx_bytes",
    "rx_packets",
    "rx_errs",
    "rx_drop",
    "rx_fifo",
    "rx_frame",
    "rx_compressed",
    "rx_multicast",
    "tx_bytes",
    "tx_packets",
    "tx_errs",
    "tx_drop",
    "tx_fifo",
    "tx_colls",
    "tx_carrier",
    "tx_compressed",
];

/// Parses a single line of network interface data from `/proc/net/dev`.
///
/// Returns `Some((iface, fields))` if the line contains an interface and its data,
/// or `None` if the format is invalid.
fn parse_interface_line(line: &str) -> Option<(&str, impl Iterator<Item = &str>)> {
    let (iface, data) = line.trim().split_once(':')?;
    Some((iface.trim(), data.split_whitespace()))
}

/// Parses the 16 counters of one interface.
///
/// Returns `None` if there are too few fields or any of them is not an
/// unsigned integer; a partially parsed interface would look like a reset.
fn counters_from_fields<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<[u64; 16]> {
    let mut counters = [0u64; 16];
    for counter in counters.iter_mut() {
        *counter = fields.next()?.parse().ok()?;
    }
    Some(counters)
}

/// Reads per-interface counters from `/proc/net/dev`-formatted input.
///
/// Values are keyed `<iface>.<field>`, e.g. `eth0.rx_bytes`. Only interfaces
/// accepted by `include` are kept; malformed lines are skipped with a warning.
///
/// # Errors
///
/// Returns [`super::ParseError::Io`] if reading from the input fails.
///
/// # Examples
///
/// ```
/// # use counter_rate::sample::net_dev;
/// let data = "\
/// Inter-|   Receive                                                |  Transmit
///  face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
///   eth0: 100 2 0 0 0 0 0 0 300 4 0 0 0 0 0 0
/// ";
/// let values = net_dev::parse(&mut data.as_bytes(), |_| true).unwrap();
/// assert_eq!(values["eth0.tx_bytes"].as_f64(), 300.0);
/// ```
pub fn parse<R: BufRead>(buf: &mut R, include: impl Fn(&str) -> bool) -> Result<Values> {
    let mut values = Values::new();
    let mut line = String::new();

    // Skip headers (first two lines)
    for _ in 0..2 {
        buf.read_line(&mut line)?;
        line.clear();
    }

    while buf.read_line(&mut line)? != 0 {
        if let Some((iface, fields)) = parse_interface_line(&line) {
            if include(iface) {
                match counters_from_fields(fields) {
                    Some(counters) => {
                        for (field, counter) in FIELDS.iter().zip(counters) {
                            values.insert(format!("{iface}.{field}"), counter.into());
                        }
                    }
                    None => log::warn!("Skipping malformed counters of interface `{iface}`"),
                }
            }
        }
        line.clear();
    }

    Ok(values)
}

/// Default interface filter: everything but loopback.
pub fn is_not_loopback(iface: &str) -> bool {
    iface != "lo"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Value;

    const HEADER: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
";

    fn parse_all(data: &str) -> Values {
        parse(&mut data.as_bytes(), |_| true).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_all("").is_empty());
    }

    #[test]
    fn test_only_headers() {
        assert!(parse_all(HEADER).is_empty());
    }

    #[test]
    fn test_parse_complete_interface() {
        let data = format!(
            "{HEADER}  eth0: 10240    100     1    2    3     4          5         6  20480   200     7    8    9     10       11          12\n"
        );
        let values = parse_all(&data);
        assert_eq!(values.len(), 16);
        assert_eq!(values["eth0.rx_bytes"], Value::from(10240u64));
        assert_eq!(values["eth0.rx_packets"], Value::from(100u64));
        assert_eq!(values["eth0.rx_multicast"], Value::from(6u64));
        assert_eq!(values["eth0.tx_bytes"], Value::from(20480u64));
        assert_eq!(values["eth0.tx_packets"], Value::from(200u64));
        assert_eq!(values["eth0.tx_compressed"], Value::from(12u64));
    }

    #[test]
    fn test_keeps_interfaces_apart() {
        let data = format!(
            "{HEADER}  eth0: 100 200 0 0 0 0 0 0  300 400 0 0 0 0 0 0\n  eth1: 10 20 0 0 0 0 0 0  30 40 0 0 0 0 0 0\n"
        );
        let values = parse_all(&data);
        assert_eq!(values["eth0.rx_bytes"], Value::from(100u64));
        assert_eq!(values["eth1.rx_bytes"], Value::from(10u64));
        assert_eq!(values["eth1.tx_packets"], Value::from(40u64));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let data = format!(
            "{HEADER} badif: 123 456\n  eth0: xyz abc 0 0 0 0 0 0  20480 200 0 0 0 0 0 0\n  eth1: 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16\nno colon here\n"
        );
        let values = parse_all(&data);
        assert_eq!(values.len(), 16);
        assert!(values.keys().all(|k| k.starts_with("eth1.")));
    }

    #[test]
    fn test_include_filter() {
        let data = format!(
            "{HEADER}    lo: 999 999 0 0 0 0 0 0 999 999 0 0 0 0 0 0\n  eth0: 1 1 0 0 0 0 0 0 1 1 0 0 0 0 0 0\n"
        );
        let values = parse(&mut data.as_bytes(), is_not_loopback).unwrap();
        assert!(values.keys().all(|k| k.starts_with("eth0.")));
        assert!(!values.is_empty());

        let only_lo = parse(&mut data.as_bytes(), |iface| iface == "lo").unwrap();
        assert_eq!(only_lo["lo.rx_bytes"], Value::from(999u64));
        assert!(!only_lo.contains_key("eth0.rx_bytes"));
    }
}
