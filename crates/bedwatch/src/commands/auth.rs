//! Login / logout.

use dialoguer::Input;
use secrecy::SecretString;

use bedwatch_core::Monitor;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;

use super::util;

/// Exchange email + password for a session token.
///
/// The token lands wherever the active session provider keeps it: the
/// keyring for a normal profile, memory only when `--token` was given.
pub async fn login(
    monitor: &Monitor,
    args: LoginArgs,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => {
            let cfg = config::load_config_or_default();
            let remembered = cfg.profiles.get(profile_name).and_then(|p| p.email.clone());
            let mut input = Input::<String>::new().with_prompt("Email");
            if let Some(email) = remembered {
                input = input.default(email);
            }
            input.interact_text().map_err(util::prompt_err)?
        }
    };

    let password = rpassword::prompt_password("Password: ").map_err(util::prompt_err)?;
    if email.trim().is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "email and password cannot be empty".into(),
        });
    }
    let password = SecretString::from(password);

    let spinner = util::spinner("Signing in...", global);
    let result = monitor.login(email.trim(), &password).await;
    spinner.finish_and_clear();
    result?;

    if global.token.is_some() {
        util::done(
            "Logged in (session kept in memory because --token was given)",
            global,
        );
    } else {
        util::done(&format!("Logged in as {} ({profile_name})", email.trim()), global);
    }
    Ok(())
}

/// Forget the stored session. Local only; the backend keeps no session list.
pub fn logout(monitor: &Monitor, global: &GlobalOpts) {
    let had_session = monitor.has_session();
    monitor.logout();
    if had_session {
        util::done("Logged out", global);
    } else {
        util::done("No stored session", global);
    }
}
