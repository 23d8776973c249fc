use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::{ConfigFormat, MonitorConfig};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format: json, toml, yaml
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
    /// Print where configuration files are read from
    Path,
}

pub async fn execute(args: ConfigArgs, config: &MonitorConfig) -> Result<()> {
    match args.command {
        ConfigCommand::Show { format } => {
            let format = match format.to_lowercase().as_str() {
                "json" => ConfigFormat::Json,
                "yaml" | "yml" => ConfigFormat::Yaml,
                "toml" => ConfigFormat::Toml,
                _ => {
                    return Err(anyhow::anyhow!(
                        "Unsupported format: {}. Use json, toml, or yaml",
                        format
                    ));
                }
            };
            println!("{}", export(config, format)?);
        }
        ConfigCommand::Path => {
            println!("{}", MonitorConfig::user_config_path().display());
            println!("{}", std::env::current_dir()?.join("path-monitor.toml").display());
        }
    }

    Ok(())
}

fn export(config: &MonitorConfig, format: ConfigFormat) -> Result<String> {
    Ok(match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yml::to_string(config)?,
    })
}
