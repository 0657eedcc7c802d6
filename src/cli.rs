// src/cli.rs

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "vanguard-recon")]
#[command(version, about = "Runs external recon tools against a target and writes an HTML report")]
pub struct Args {
    /// Without a subcommand the interactive terminal UI starts.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full recon sequence and write the report
    Scan {
        /// Domain or URL
        target: String,
    },
    /// Run one catalogued tool and print its section
    Tool {
        /// Options as a JSON object, applied before the `flag=value` pairs
        #[arg(long, value_name = "JSON")]
        json: Option<String>,
        /// Tool identifier, see `tools`
        id: String,
        /// Domain or URL
        target: String,
        /// Options as `flag=value`; a bare flag means true
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        options: Vec<String>,
    },
    /// List the tool catalog
    Tools,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_tui() {
        let args = Args::try_parse_from(["vanguard-recon"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn tool_options_may_look_like_flags() {
        let args = Args::try_parse_from(["vanguard-recon", "tool", "dig", "example.com", "-t=MX", "+short", "@=8.8.8.8"])
            .unwrap();
        match args.command {
            Some(Command::Tool { json, id, target, options }) => {
                assert_eq!(json, None);
                assert_eq!(id, "dig");
                assert_eq!(target, "example.com");
                assert_eq!(options, ["-t=MX", "+short", "@=8.8.8.8"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tool_accepts_json_options() {
        let args = Args::try_parse_from(["vanguard-recon", "tool", "--json", r#"{"-F": true}"#, "nmap", "example.com"])
            .unwrap();
        match args.command {
            Some(Command::Tool { json, id, options, .. }) => {
                assert_eq!(json.as_deref(), Some(r#"{"-F": true}"#));
                assert_eq!(id, "nmap");
                assert!(options.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
