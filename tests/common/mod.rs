use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use saarthi::config::ServerConfig;
use saarthi::HttpGateway;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Gateway pointed at a mock server
#[allow(dead_code)]
pub fn gateway_for(uri: &str) -> HttpGateway {
    HttpGateway::new(&ServerConfig {
        base_url: uri.to_string(),
        timeout_seconds: 5,
    })
    .expect("failed to build gateway")
}
