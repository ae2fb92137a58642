use serde::Deserialize;

/// Config, from a TOML file (server settings) plus env vars (upstream credentials).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// <address>:<port> to serve the aggregator endpoints
    pub listen_address: String,

    /// <address>:<port> to serve metrics on
    pub metrics_address: String,

    /// By default, output JSON logs. Only if this flag is set to true, output colourful human-friendly logs
    pub human_logs: bool,

    /// Max HTTP body size the API accepts
    #[serde(default = "max_body_size")]
    pub max_body_size: usize,

    /// Base URL of the evaluation service, e.g. "http://20.244.56.144/evaluation-service"
    pub upstream_base_url: String,

    /// Registration details sent alongside the client credentials during the auth exchange.
    pub auth_profile: AuthProfile,
}

/// The registration identity the evaluation service expects in its `/auth` body.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthProfile {
    pub email: String,
    pub name: String,
    pub roll_no: String,
    pub access_code: String,
}

impl Config {
    /// Will crash if file isn't found or config is invalid.
    pub fn from_file(filepath: &str) -> Self {
        let contents = std::fs::read_to_string(filepath).expect("Couldn't read from config file");
        toml::from_str(&contents).expect("couldn't parse config file")
    }
}

fn max_body_size() -> usize {
    65536
}

/// Upstream credentials, read from the process environment at startup.
/// There is no runtime reconfiguration.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    /// If set, skips the `/auth` exchange and uses this token directly.
    pub bootstrap_token: Option<String>,
}

impl Credentials {
    /// Will crash if CLIENT_ID or CLIENT_SECRET is unset.
    pub fn from_env() -> Self {
        Self {
            client_id: std::env::var("CLIENT_ID").expect("CLIENT_ID must be set"),
            client_secret: std::env::var("CLIENT_SECRET").expect("CLIENT_SECRET must be set"),
            bootstrap_token: std::env::var("AUTH_TOKEN").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: Config = toml::from_str(
            r#"
            listen_address = "0.0.0.0:5000"
            metrics_address = "0.0.0.0:5001"
            human_logs = true
            upstream_base_url = "http://20.244.56.144/evaluation-service"

            [auth_profile]
            email = "dev@example.com"
            name = "Dev"
            roll_no = "22051157"
            access_code = "nwpwrZ"
            "#,
        )
        .unwrap();
        assert_eq!(config.listen_address, "0.0.0.0:5000");
        // Unset fields fall back to defaults.
        assert_eq!(config.max_body_size, 65536);
    }
}
