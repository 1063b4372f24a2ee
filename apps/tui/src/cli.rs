use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "census_map_tui", version, about = "Census language map in the terminal")]
pub struct CliArgs {
    /// Run without the UI: look up --state/--county, or load every layer and print stats
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging (written to LOG_FILE, default census-map.log)
    #[arg(long)]
    pub debug: bool,

    /// State code for a headless lookup, e.g. 6 or 06
    #[arg(long, value_name = "CODE", value_parser = region_code)]
    pub state: Option<String>,

    /// County code within --state for a headless lookup, e.g. 37
    #[arg(long, value_name = "CODE", requires = "state", value_parser = region_code)]
    pub county: Option<String>,

    /// Directory or base url the layer sources are resolved against
    #[arg(long = "data-dir", value_name = "PATH")]
    pub data_dir: Option<String>,

    /// Census API key
    #[arg(long = "api-key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// JSON map config replacing the built-in layer list
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,
}

/// Census region codes are decimal digits only, e.g. `6`, `06` or `037`.
fn region_code(value: &str) -> Result<String, String> {
    let code = value.trim();
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(code.to_string())
    } else {
        Err(format!("'{value}' is not a numeric census code"))
    }
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(dir) = &self.data_dir {
            std::env::set_var("LAYER_BASE", dir);
        }
        if let Some(key) = &self.api_key {
            std::env::set_var("CENSUS_API_KEY", key);
        }
        if let Some(path) = &self.config {
            std::env::set_var("MAP_CONFIG", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn county_requires_state() {
        assert!(CliArgs::try_parse_from(["census_map_tui", "--county", "37"]).is_err());
    }

    #[test]
    fn region_codes_must_be_digits() {
        assert!(CliArgs::try_parse_from(["census_map_tui", "--state", "CA"]).is_err());
        assert!(CliArgs::try_parse_from(["census_map_tui", "--state", "06", "--county", "03A"]).is_err());
        assert!(CliArgs::try_parse_from(["census_map_tui", "--state", ""]).is_err());

        let args = CliArgs::try_parse_from(["census_map_tui", "--state", "06", "--county", "037"]).unwrap();
        assert_eq!(args.county.as_deref(), Some("037"));
    }

    #[test]
    fn parses_headless_lookup() {
        let args =
            CliArgs::try_parse_from(["census_map_tui", "--headless", "--state", "6", "--json"]).unwrap();
        assert!(args.headless && args.json);
        assert_eq!(args.state.as_deref(), Some("6"));
        assert_eq!(args.county, None);
    }
}
