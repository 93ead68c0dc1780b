//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;

use connect_mesh_config::{self as shared, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_token() -> Result<String, CliError> {
    let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "api_token".into(),
            reason: "API token cannot be empty".into(),
        });
    }
    Ok(token.trim().to_owned())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = shared::config_path();
            eprintln!("Connect Mesh CLI: configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Token, and where to keep it
            let token = prompt_token()?;
            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the API token?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let api_token = if store_selection == 0 {
                shared::store_api_token(&profile_name, &SecretString::from(token))?;
                eprintln!("   ✓ API token stored in system keyring");
                None
            } else {
                Some(token)
            };

            // 3. Network (optional, `networks list` shows the IDs)
            let network_id: String = Input::new()
                .with_prompt("Network ID (leave empty to pass --network each time)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            // 4. Scan interval
            let scan_interval: u64 = Input::new()
                .with_prompt("Status poll interval in seconds (10-300)")
                .default(30)
                .validate_with(|v: &u64| {
                    if (10..=300).contains(v) {
                        Ok(())
                    } else {
                        Err("must be between 10 and 300")
                    }
                })
                .interact_text()
                .map_err(prompt_err)?;

            // 5. Merge into the existing config, if any
            let mut cfg = shared::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    api_token,
                    network_id: (!network_id.trim().is_empty())
                        .then(|| network_id.trim().to_owned()),
                    scan_interval,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());

            shared::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: connect-mesh networks list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(shared::load_config_or_default());
            let out = output::render_single(
                global.output,
                &cfg,
                |c| format!("{c:#?}"),
                |c| c.default_profile.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = shared::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: connect-mesh config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken => {
            let cfg = shared::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let token = prompt_token()?;
            shared::store_api_token(&profile_name, &SecretString::from(token))?;
            eprintln!("✓ API token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

/// Blank out plaintext tokens before showing the config.
fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.api_token.is_some() {
            profile.api_token = Some("********".into());
        }
    }
    cfg
}
