//! Wire types for the backend's JSON contract.
//!
//! Field names follow the backend (Spanish, camelCase where composed);
//! unknown profile fields are carried along untouched so the cached
//! copy survives server-side additions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-issued profile, cached client-side. Carries no authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    pub nombre: String,
    pub email: String,
    pub rol: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Usuario {
    /// View the front-end opens right after login.
    #[must_use]
    pub fn vista_inicial(&self) -> &'static str {
        if self.rol == "administrador" {
            "/admin"
        } else {
            "/"
        }
    }
}

/// Successful body of `/auth/login` and `/auth/registro`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespuestaAuth {
    pub usuario: Usuario,
    pub access_token: String,
    pub refresh_token: String,
}

/// Registration form fields.
#[derive(Debug, Serialize)]
pub struct Registro {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

/// Profile fields that can change; absent fields are left untouched.
#[derive(Debug, Default, Serialize)]
pub struct CambiosPerfil {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
