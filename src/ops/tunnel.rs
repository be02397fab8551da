use serde::Serialize;
use std::path::PathBuf;

use crate::cli::display;
use crate::context::RunContext;
use crate::error::RunError;
use crate::exec::CommandSpec;

#[derive(Debug, Serialize)]
struct TunnelConfig {
    tunnel: String,
    #[serde(rename = "credentials-file")]
    credentials_file: String,
    ingress: Vec<IngressRule>,
}

#[derive(Debug, Serialize)]
struct IngressRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    hostname: Option<String>,
    service: String,
}

fn credentials_file(tunnel_id: &str) -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/root"))
        .join(".cloudflared")
        .join(format!("{}.json", tunnel_id))
}

/// Generate the cloudflared ingress config from the descriptor and run
/// the tunnel in the foreground.
pub async fn run(ctx: &RunContext) -> Result<(), RunError> {
    let meta = ctx.meta()?;
    let tunnel = meta.tunnel(&ctx.dir)?;
    let tunnel_id = meta.id(&ctx.dir)?;

    let config = TunnelConfig {
        tunnel: tunnel_id.to_string(),
        credentials_file: credentials_file(tunnel_id).to_string_lossy().to_string(),
        ingress: vec![
            IngressRule {
                hostname: Some(tunnel.hostname.clone()),
                service: tunnel.service.clone(),
            },
            // catch-all rule required by cloudflared
            IngressRule {
                hostname: None,
                service: "http_status:404".to_string(),
            },
        ],
    };

    let config_path = ctx.dir.join("tunnel.yaml");
    std::fs::write(&config_path, serde_yaml::to_string(&config)?)?;
    display::print_success(&format!("Wrote {}", config_path.display()));

    CommandSpec::new("cloudflared", &ctx.dir)
        .args(["tunnel", "--config"])
        .arg(config_path.to_string_lossy())
        .arg("run")
        .streamed()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_yaml_has_catch_all_rule_last() {
        let config = TunnelConfig {
            tunnel: "abc123".into(),
            credentials_file: "/home/u/.cloudflared/abc123.json".into(),
            ingress: vec![
                IngressRule {
                    hostname: Some("app.example.com".into()),
                    service: "http://localhost:3000".into(),
                },
                IngressRule {
                    hostname: None,
                    service: "http_status:404".into(),
                },
            ],
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("tunnel: abc123"));
        assert!(yaml.contains("credentials-file:"));
        assert!(yaml.contains("hostname: app.example.com"));
        let hostname_pos = yaml.find("app.example.com").unwrap();
        let catch_all_pos = yaml.find("http_status:404").unwrap();
        assert!(hostname_pos < catch_all_pos);
    }
}
