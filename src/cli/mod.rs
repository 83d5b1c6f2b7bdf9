use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "student-api")]
#[command(about = "Student records HTTP service")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,
}

impl Cli {
    /// Apply command line flags on top of the environment configuration
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config
    }
}
