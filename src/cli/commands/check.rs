//! Configuration commands: verify against the library manager, or print.

use std::path::Path;

use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::library::{LidarrClient, MetadataProfile, QualityProfile, RootFolder};

/// Check the manager is reachable and knows the configured defaults.
pub fn cmd_check(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    rt.block_on(async {
        let client = LidarrClient::new(config.library.url.clone(), config.library.api_key.clone())?;
        let defaults = &config.defaults;
        let mut problems = 0;

        println!("Checking library manager at {}...\n", config.library.url);

        match client.list_root_folders().await {
            Ok(folders) => {
                if let Some(folder) = find_root_folder(&folders, &defaults.root_folder_path) {
                    println!("✓ Root folder: {}", folder.path);
                } else {
                    println!(
                        "✗ Root folder {} not configured (known: {})",
                        defaults.root_folder_path,
                        folders
                            .iter()
                            .map(|f| f.path.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                    problems += 1;
                }
            }
            Err(e) => {
                println!("✗ Root folders request failed: {}", e);
                problems += 1;
            }
        }

        match client.list_quality_profiles().await {
            Ok(profiles) => match find_quality_profile(&profiles, defaults.quality_profile_id) {
                Some(profile) => println!("✓ Quality profile: {} ({})", profile.name, profile.id),
                None => {
                    println!(
                        "✗ Quality profile {} does not exist",
                        defaults.quality_profile_id
                    );
                    problems += 1;
                }
            },
            Err(e) => {
                println!("✗ Quality profiles request failed: {}", e);
                problems += 1;
            }
        }

        match client.list_metadata_profiles().await {
            Ok(profiles) => match find_metadata_profile(&profiles, defaults.metadata_profile_id) {
                Some(profile) => println!("✓ Metadata profile: {} ({})", profile.name, profile.id),
                None => {
                    println!(
                        "✗ Metadata profile {} does not exist",
                        defaults.metadata_profile_id
                    );
                    problems += 1;
                }
            },
            Err(e) => {
                println!("✗ Metadata profiles request failed: {}", e);
                problems += 1;
            }
        }

        if problems > 0 {
            anyhow::bail!("{} configuration problem(s) found", problems);
        }
        println!("\nAll checks passed.");
        Ok(())
    })
}

/// Print the effective configuration with the API key masked.
pub fn cmd_config(config: &Config, explicit_path: Option<&Path>) -> anyhow::Result<()> {
    match explicit_path.map(Path::to_path_buf).or_else(config::config_path) {
        Some(path) => println!("# Config file: {}", path.display()),
        None => println!("# Config file: <none>"),
    }
    println!("# LIDARR_* environment variables override file values\n");
    print!("{}", toml::to_string_pretty(&config.redacted())?);
    Ok(())
}

/// Lidarr reports root folders with or without a trailing slash
fn find_root_folder<'a>(folders: &'a [RootFolder], path: &str) -> Option<&'a RootFolder> {
    let wanted = path.trim_end_matches('/');
    folders
        .iter()
        .find(|f| f.path.trim_end_matches('/') == wanted)
}

fn find_quality_profile(profiles: &[QualityProfile], id: i64) -> Option<&QualityProfile> {
    profiles.iter().find(|p| p.id == id)
}

fn find_metadata_profile(profiles: &[MetadataProfile], id: i64) -> Option<&MetadataProfile> {
    profiles.iter().find(|p| p.id == id)
}
