//! `heimdall config`: configuration management commands.

use std::path::{Path, PathBuf};

use heimdall_config::AppConfig;

use super::load_config;

fn target_path(config_path: Option<&Path>) -> PathBuf {
    config_path.map_or_else(AppConfig::config_path, Path::to_path_buf)
}

pub async fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config.redacted())?;
    println!("{toml_str}");
    Ok(())
}

pub async fn init(config_path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = target_path(config_path);
    write_starter(&path, force)?;
    println!("Wrote starter config to {}", path.display());
    Ok(())
}

fn write_starter(path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!("{} already exists (use --force to overwrite)", path.display()).into());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(())
}

pub async fn check(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Checking configuration at {}", target_path(config_path).display());

    let config = load_config(config_path)?;
    let report = config.credential_report();
    for (backend, result) in &report {
        let endpoint = config.backends.get(*backend).map_or("-", |b| b.endpoint.as_str());
        match result {
            Ok(()) => println!("   ok    {:<9} {endpoint}", backend.as_str()),
            Err(reason) => println!("   FAIL  {:<9} {reason}", backend.as_str()),
        }
    }

    let failed = report.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        return Err(format!("{failed} backend(s) not usable").into());
    }
    println!("   All backends configured");
    Ok(())
}
