use crate::api;
use crate::api::types::Registro;
use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Result};
use secrecy::{ExposeSecret, SecretString};

/// # Errors
/// Returns an error if the form fields are invalid or the backend
/// rejects the registration.
pub async fn handle(
    globals: &GlobalArgs,
    nombre: &str,
    email: &str,
    password: &SecretString,
    confirmar: &SecretString,
) -> Result<()> {
    // Form-level checks; rejected input never reaches the backend.
    if nombre.trim().is_empty() {
        return Err(anyhow!("el nombre es obligatorio"));
    }
    if !api::valid_email(email) {
        return Err(anyhow!("correo electrónico inválido: {email}"));
    }
    super::check_new_password(password, confirmar)?;

    let (store, gateway) = super::connect(globals)?;

    let solicitud = Registro {
        nombre: nombre.trim().to_string(),
        email: email.to_string(),
        password: password.expose_secret().to_string(),
    };

    let usuario = api::auth::registro(&gateway, &store, &solicitud).await?;

    println!("Cuenta creada: {} <{}>", usuario.nombre, usuario.email);
    println!("Vista inicial: {}", usuario.vista_inicial());

    Ok(())
}
