use serde::Deserialize;

fn default_port() -> u16 { 8080 }
fn default_panel_efficiency() -> f64 { 0.20 }
fn default_performance_ratio() -> f64 { 0.75 }
fn default_usable_fraction() -> f64 { 0.7 }
fn default_fetch_timeout_secs() -> u64 { 8 }

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub google: GoogleApiConfig,
    #[serde(default)]
    pub solar: SolarDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoogleApiConfig {
    /// Shared key for the elevation and solar lookups. Empty means those
    /// calls fail and the engine runs in degraded mode.
    #[serde(default)]
    pub api_key: String,
}

/// Estimation defaults. Efficiency and performance ratio can be overridden
/// per request; nothing here mutates after startup.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SolarDefaults {
    /// Module efficiency (0-1)
    #[serde(default = "default_panel_efficiency")]
    pub panel_efficiency: f64,
    /// Combined system losses (0-1)
    #[serde(default = "default_performance_ratio")]
    pub performance_ratio: f64,
    /// Installable fraction of the raw polygon area (0-1)
    #[serde(default = "default_usable_fraction")]
    pub usable_fraction: f64,
    /// Upper bound on each external lookup
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for SolarDefaults {
    fn default() -> Self {
        Self {
            panel_efficiency: default_panel_efficiency(),
            performance_ratio: default_performance_ratio(),
            usable_fraction: default_usable_fraction(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.solar.panel_efficiency, 0.20);
        assert_eq!(config.solar.performance_ratio, 0.75);
        assert_eq!(config.solar.usable_fraction, 0.7);
        assert!(config.google.api_key.is_empty());
    }

    #[test]
    fn partial_document_overrides_selectively() {
        let config: Config = serde_json::from_str(
            r#"{"server": {"port": 9090}, "solar": {"usableFraction": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.solar.usable_fraction, 0.5);
        assert_eq!(config.solar.panel_efficiency, 0.20);
    }
}
