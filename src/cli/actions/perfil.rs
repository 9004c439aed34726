use crate::api;
use crate::api::types::CambiosPerfil;
use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Result};

/// # Errors
/// Returns an error if no field was given, the email is malformed, or
/// the backend rejects the change.
pub async fn handle(
    globals: &GlobalArgs,
    nombre: Option<String>,
    email: Option<String>,
) -> Result<()> {
    if nombre.is_none() && email.is_none() {
        return Err(anyhow!("nada que actualizar: indica --nombre o --email"));
    }
    if let Some(email) = &email {
        if !api::valid_email(email) {
            return Err(anyhow!("correo electrónico inválido: {email}"));
        }
    }

    let (store, gateway) = super::connect(globals)?;

    let cambios = CambiosPerfil { nombre, email };
    let usuario = api::perfil::actualizar(&gateway, &store, &cambios).await?;

    println!("Perfil actualizado: {} <{}>", usuario.nombre, usuario.email);

    Ok(())
}
