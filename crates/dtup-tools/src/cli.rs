//! Command-line arguments for `dtup2bin`.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use dtup_proto::DecodeConfig;

/// Convert a DTUP update file into the raw binary it carries.
#[derive(Parser, Debug)]
#[command(name = "dtup2bin", version, about)]
pub struct Cli {
    /// Source DTUP file path
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination BIN file path
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Decode even if the SPRC header CRC does not match the file content
    #[arg(long = "skip-crc", action = ArgAction::SetTrue)]
    pub skip_crc: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Decoder settings selected on the command line
    #[must_use]
    pub fn decode_config(&self) -> DecodeConfig {
        DecodeConfig { verify_header_crc: !self.skip_crc }
    }

    /// Default log filter when `RUST_LOG` is unset
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_paths() {
        let cli = Cli::try_parse_from(["dtup2bin", "in.dtup", "out.bin"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("in.dtup"));
        assert_eq!(cli.destination, PathBuf::from("out.bin"));
        assert_eq!(cli.decode_config(), DecodeConfig::default());
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn skip_crc_and_verbosity() {
        let cli = Cli::try_parse_from(["dtup2bin", "--skip-crc", "-vv", "a", "b"]).unwrap();
        assert!(!cli.decode_config().verify_header_crc);
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn missing_destination_is_rejected() {
        assert!(Cli::try_parse_from(["dtup2bin", "in.dtup"]).is_err());
    }
}
