use crate::api;
use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// # Errors
/// Returns an error if the email is malformed or the backend rejects
/// the credentials.
pub async fn handle(globals: &GlobalArgs, email: &str, password: &SecretString) -> Result<()> {
    // Form-level check; rejected input never reaches the backend.
    if !api::valid_email(email) {
        return Err(anyhow!("correo electrónico inválido: {email}"));
    }

    let (store, gateway) = super::connect(globals)?;

    debug!("signing in against {}", globals.api_url);

    let usuario = api::auth::login(&gateway, &store, email, password.expose_secret()).await?;

    println!("Sesión iniciada: {} <{}>", usuario.nombre, usuario.email);
    println!("Vista inicial: {}", usuario.vista_inicial());

    Ok(())
}
