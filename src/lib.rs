//! Counter Rate: persistence and delta/rate computation for monitoring checks
//! that sample cumulative counters.
//!
//! Every check invocation is a fresh process. The last reading is stored in a
//! per-check slot, reloaded on the next run, and the delta between the two is
//! computed with wrap or reset handling. Threshold evaluation and exit codes
//! belong to the plugin framework calling into this crate.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::Write;

use config::{Config, Source};
use error::ResultOkLogExt;
use reading::{Identity, Rate, Reading, Values};
use sample::{key_value, net_dev};
use session::Session;
use store::FileStore;

pub mod config;
pub mod delta;
pub mod error;
pub mod fsutil;
pub mod reading;
pub mod sample;
pub mod session;
pub mod store;

/// Runs the `counter-rate` check once.
///
/// Samples the configured counter file, computes the rate against the stored
/// reading and prints it, then stores the new reading for the next run.
/// Positional arguments select interfaces (`net_dev`) or keys (`key_value`);
/// without any, all non-loopback interfaces or all keys are sampled.
///
/// # Errors
///
/// Possible errors include:
/// - Invalid configuration variables (see [`config`]).
/// - Failure to open or parse the counter file.
/// - I/O or corruption errors of the stored reading. A missing stored reading
///   is not an error; it is reported as insufficient data.
/// - Arithmetic errors, e.g. a sampled metric disappeared since the last run.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let mut argv = std::env::args_os();
    let program = argv.next().unwrap_or_default();
    let args: Vec<OsString> = argv.collect();

    let identity = match &config.identity {
        Some(identity) => identity.clone(),
        None => Identity::from_args(&args),
    };
    log::debug!("Identity: {identity}");

    let filters: Vec<String> = args
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let values = sample(&config, &filters)?;
    log::trace!(
        "Sampled {} values from `{}`",
        values.len(),
        config.source_path.display()
    );

    let mut session = Session::new(FileStore::new(&config.state_dir, &program, &identity));
    if let Some(path) = &config.state_file {
        session = session.with_location(path);
    }
    session.record(Reading::now(values)?);

    let rate = match session.load_previous() {
        Ok(()) => Some(session.rate(config.policy)),
        Err(err) if err.is_missing_baseline() => {
            log::info!("{err}");
            None
        }
        Err(err) => return Err(err.into()),
    };

    // the new reading is the baseline of the next run even if this one failed
    session.save_current()?;

    let mut out = std::io::stdout().lock();
    match rate {
        Some(rate) => write_report(&mut out, &rate?)?,
        None => writeln!(out, "insufficient data: baseline recorded")?,
    }
    Ok(())
}

fn sample(config: &Config, args: &[String]) -> Result<Values, Box<dyn std::error::Error>> {
    let mut reader = fsutil::open_file_reader(&config.source_path)?;
    let values = match config.source {
        Source::NetDev if args.is_empty() => net_dev::parse(&mut reader, net_dev::is_not_loopback)?,
        Source::NetDev => net_dev::parse(&mut reader, |iface| args.iter().any(|a| a == iface))?,
        Source::KeyValue => {
            let mut values = key_value::parse(&mut reader)?;
            if !args.is_empty() {
                values.retain(|key, _| args.contains(key));
            }
            values
        }
    };
    Ok(values)
}

/// Writes one `<key> <rate>/s` line per metric, followed by the share of
/// each metric among metrics of the same kind (the part after the last `.`),
/// e.g. how `eth0.rx_bytes` and `eth1.rx_bytes` divide the received bytes.
fn write_report(out: &mut impl Write, rate: &Rate) -> std::io::Result<()> {
    for (key, value) in rate {
        writeln!(out, "{key} {value:.2}/s")?;
    }

    let mut kinds: BTreeMap<&str, Rate> = BTreeMap::new();
    for (key, value) in rate {
        let kind = key.rsplit_once('.').map_or(key.as_str(), |(_, kind)| kind);
        kinds.entry(kind).or_default().insert(key.clone(), *value);
    }

    for (kind, rates) in kinds.iter().filter(|(_, rates)| rates.len() > 1) {
        let Some(shares) = delta::proportion(rates).ok_log(log::Level::Debug) else {
            log::debug!("No shares for idle `{kind}` counters");
            continue;
        };
        for (key, share) in shares {
            writeln!(out, "{key} share {:.1}%", share * 100.0)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_report() {
        let rate = Rate::from([
            ("eth0.rx_bytes".to_string(), 30.0),
            ("eth1.rx_bytes".to_string(), 10.0),
            ("eth0.tx_bytes".to_string(), 0.0),
            ("eth1.tx_bytes".to_string(), 0.0),
            ("pgfault".to_string(), 1.234),
        ]);
        let mut out = Vec::new();
        write_report(&mut out, &rate).unwrap();

        let expected = "\
eth0.rx_bytes 30.00/s
eth0.tx_bytes 0.00/s
eth1.rx_bytes 10.00/s
eth1.tx_bytes 0.00/s
pgfault 1.23/s
eth0.rx_bytes share 75.0%
eth1.rx_bytes share 25.0%
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_sample_net_dev_filters_interfaces() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Inter-| header\n face | header\n    lo: 1 1 0 0 0 0 0 0 1 1 0 0 0 0 0 0\n  eth0: 2 2 0 0 0 0 0 0 2 2 0 0 0 0 0 0\n  eth1: 3 3 0 0 0 0 0 0 3 3 0 0 0 0 0 0"
        )
        .unwrap();
        let config = Config::from_lookup(|key| {
            (key == "COUNTER_RATE_SOURCE_PATH").then(|| file.path().display().to_string())
        })
        .unwrap();

        let all = sample(&config, &[]).unwrap();
        assert!(all.contains_key("eth0.rx_bytes") && all.contains_key("eth1.rx_bytes"));
        assert!(!all.contains_key("lo.rx_bytes"));

        let only = sample(&config, &["eth1".to_string()]).unwrap();
        assert!(only.keys().all(|k| k.starts_with("eth1.")));
    }

    #[test]
    fn test_sample_key_value_filters_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pgfault 10\npgmajfault 2\npswpin 0").unwrap();
        let path = file.path().display().to_string();
        let config = Config::from_lookup(|key| match key {
            "COUNTER_RATE_SOURCE" => Some("key_value".to_string()),
            "COUNTER_RATE_SOURCE_PATH" => Some(path.clone()),
            _ => None,
        })
        .unwrap();

        assert_eq!(sample(&config, &[]).unwrap().len(), 3);
        let only = sample(&config, &["pgfault".to_string()]).unwrap();
        assert_eq!(only.keys().collect::<Vec<_>>(), vec!["pgfault"]);
    }
}
