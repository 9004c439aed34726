//! Profile management: both calls require the injected bearer
//! credential and go through the gateway's renewal path.

use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::error_message;
use super::types::{CambiosPerfil, Usuario};
use crate::gateway::{ApiRequest, Gateway};
use crate::session::SessionStore;

/// Update the profile and refresh the cached copy in the session.
///
/// # Errors
/// Returns an error if the request fails, the backend rejects the
/// change, or the response is missing expected fields.
#[instrument(skip(gateway, store))]
pub async fn actualizar(
    gateway: &Gateway,
    store: &SessionStore,
    cambios: &CambiosPerfil,
) -> Result<Usuario> {
    let request = ApiRequest::put("/admin/api/perfil", serde_json::to_value(cambios)?);

    let response = gateway.send(request).await?;

    if !response.status().is_success() {
        let status = response.status();
        let json_response: Value = response.json().await?;

        return Err(anyhow!(
            "/admin/api/perfil - {}, {}",
            status,
            error_message(&json_response)
        ));
    }

    let json_response: Value = response.json().await?;
    let usuario: Usuario = json_response
        .get("usuario")
        .cloned()
        .map(serde_json::from_value)
        .transpose()?
        .ok_or_else(|| anyhow!("Error parsing JSON response: no usuario found"))?;

    store.replace_usuario(usuario.clone())?;

    debug!("cached profile updated for {}", usuario.email);

    Ok(usuario)
}

/// Change the account password. The current password travels along so
/// the backend can re-check it; nothing about the session changes on
/// success.
///
/// # Errors
/// Returns an error if the request fails or the backend rejects the
/// current password.
#[instrument(skip_all)]
pub async fn cambiar_contrasena(gateway: &Gateway, actual: &str, nueva: &str) -> Result<()> {
    let request = ApiRequest::post(
        "/admin/api/cambiar-contrasena",
        json!({
            "actual": actual,
            "nueva": nueva
        }),
    );

    let response = gateway.send(request).await?;

    if !response.status().is_success() {
        let status = response.status();
        let json_response: Value = response.json().await?;

        return Err(anyhow!(
            "/admin/api/cambiar-contrasena - {}, {}",
            status,
            error_message(&json_response)
        ));
    }

    Ok(())
}
