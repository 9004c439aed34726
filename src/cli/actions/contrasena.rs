use crate::api;
use crate::cli::globals::GlobalArgs;
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

/// # Errors
/// Returns an error if the new password is invalid or the backend
/// rejects the current one.
pub async fn handle(
    globals: &GlobalArgs,
    actual: &SecretString,
    nueva: &SecretString,
    confirmar: &SecretString,
) -> Result<()> {
    // Form-level checks; rejected input never reaches the backend.
    super::check_new_password(nueva, confirmar)?;

    let (_store, gateway) = super::connect(globals)?;

    api::perfil::cambiar_contrasena(&gateway, actual.expose_secret(), nueva.expose_secret())
        .await?;

    println!("Contraseña actualizada.");

    Ok(())
}
