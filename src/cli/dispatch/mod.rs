use crate::cli::actions::Action;
use crate::cli::globals::GlobalArgs;
use crate::session::SessionStore;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing or the default
/// session path cannot be resolved.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .context("missing required argument: --api-url")?;

    let session_file = match matches.get_one::<String>("session-file") {
        Some(path) => PathBuf::from(path),
        None => SessionStore::default_path()?,
    };

    let globals = GlobalArgs {
        api_url,
        session_file,
    };

    let action = match matches.subcommand() {
        Some(("login", m)) => Action::Login {
            email: required(m, "email")?,
            password: secret(m, "password")?,
        },
        Some(("registro", m)) => Action::Registro {
            nombre: required(m, "nombre")?,
            email: required(m, "email")?,
            password: secret(m, "password")?,
            confirmar: secret(m, "confirmar")?,
        },
        Some(("estado", _)) => Action::Estado,
        Some(("perfil", m)) => Action::Perfil {
            nombre: m.get_one::<String>("nombre").cloned(),
            email: m.get_one::<String>("email").cloned(),
        },
        Some(("contrasena", m)) => Action::Contrasena {
            actual: secret(m, "actual")?,
            nueva: secret(m, "nueva")?,
            confirmar: secret(m, "confirmar")?,
        },
        Some(("salir", _)) => Action::Salir,
        _ => return Err(anyhow!("missing subcommand")),
    };

    Ok((action, globals))
}

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn secret(matches: &clap::ArgMatches, name: &str) -> Result<SecretString> {
    required(matches, name).map(SecretString::from)
}
