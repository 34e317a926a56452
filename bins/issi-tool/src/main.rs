use clap::Parser;

use issi_config::{SharedConfig, toml_config};
use issi_core::bitbuffer::{bytes_from_hex, hex_string};
use issi_core::debug;
use issi_pdus::dfsi::{LduKind, RemoteCallData, decode_ldu_message, decode_voice_frame};
use issi_pdus::rtp::IssiPayload;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "P25 ISSI/DFSI Decoder",
    long_about = "Decodes a hex-encoded ISSI RTP payload, DFSI voice sub-frame or FNE LDU message"
)]
struct Args {
    /// What the hex string holds
    #[arg(
        help = "Kind: [ issi | dfsi | ldu1 | ldu2 ]"
    )]
    kind: String,

    /// Hex string to decode
    #[arg(
        help = "Hex string; whitespace and ':' separators are ignored"
    )]
    hex: String,

    #[arg(
        short = 'l',
        long = "log",
        help = "Also write a verbose log to this file (overrides debug_log from the config)"
    )]
    logfile: Option<String>,

    #[arg(
        short = 'c',
        long = "config",
        help = "Gateway TOML config; its debug_log is used when no --log is given"
    )]
    config: Option<String>,
}

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> SharedConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

/// Verbose log file: command line first, then the config's debug_log
fn verbose_logfile(cli: Option<String>, cfg: Option<&SharedConfig>) -> Option<String> {
    cli.or_else(|| cfg.and_then(|c| c.config().debug_log.clone()))
}

fn decode_issi(data: &[u8]) {
    match IssiPayload::decode(data) {
        Ok(payload) => {
            tracing::info!("{}", payload);
            if let Some(ptt) = payload.ptt {
                tracing::info!("  {}", ptt);
            }
            for (i, voice) in payload.full_rate_voice.iter().enumerate() {
                tracing::info!("  voice[{}] frame_type 0x{:02X} imbe {}", i, voice.frame_type, hex_string(&voice.imbe));
            }
        }
        Err(e) => {
            eprintln!("Error: could not decode ISSI payload: {}", e);
            std::process::exit(1);
        }
    }
}

fn decode_dfsi(data: &[u8]) {
    match decode_voice_frame(data) {
        Ok(frame) => tracing::info!("{}", frame),
        Err(e) => {
            eprintln!("Error: could not decode DFSI frame: {}", e);
            std::process::exit(1);
        }
    }
}

fn decode_ldu(kind: LduKind, data: &[u8]) {
    let frames = match decode_ldu_message(data) {
        Ok(frames) => frames,
        Err(e) => {
            eprintln!("Error: could not decode {} message: {}", kind, e);
            std::process::exit(1);
        }
    };

    let mut call_data = RemoteCallData::default();
    for (frame, expected) in frames.iter().zip(kind.frame_types()) {
        if frame.frame_type != *expected {
            tracing::warn!("expected frame type 0x{:02X}, got 0x{:02X}", expected, frame.frame_type);
        }
        tracing::info!("{}", frame);
        call_data.apply_frame(frame);
    }
    tracing::info!("{}", call_data);
}

fn main() {
    eprintln!("[+] P25 ISSI/DFSI decoding tool");

    let args = Args::parse();
    let cfg = args.config.as_deref().map(load_config_from_toml);
    let _log_guard = debug::setup_logging_default(verbose_logfile(args.logfile.clone(), cfg.as_ref()));

    let Some(data) = bytes_from_hex(&args.hex) else {
        eprintln!("Error: '{}' is not a valid hex string", args.hex);
        std::process::exit(1);
    };
    tracing::debug!("decoding {} bytes as {}", data.len(), args.kind);

    match args.kind.to_lowercase().as_str() {
        "issi" | "rtp" => decode_issi(&data),
        "dfsi" => decode_dfsi(&data),
        "ldu1" => decode_ldu(LduKind::Ldu1, &data),
        "ldu2" => decode_ldu(LduKind::Ldu2, &data),
        _ => {
            eprintln!("Error: Unsupported kind '{}'. Use: issi, dfsi, ldu1, ldu2", args.kind);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use issi_config::GatewayConfig;

    use super::*;

    #[test]
    fn test_verbose_logfile_from_config() {
        let mut gw = GatewayConfig::new("ISSI-TEST", 1);
        gw.debug_log = Some("gw.log".to_string());
        let cfg = SharedConfig::from_config(gw);

        assert_eq!(verbose_logfile(None, Some(&cfg)).as_deref(), Some("gw.log"));
        assert_eq!(verbose_logfile(Some("cli.log".to_string()), Some(&cfg)).as_deref(), Some("cli.log"));
        assert_eq!(verbose_logfile(None, None), None);
    }
}
