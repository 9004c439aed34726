use crate::cli::globals::GlobalArgs;
use crate::gateway::Gateway;
use crate::session::SessionStore;
use anyhow::{anyhow, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

pub mod contrasena;
pub mod estado;
pub mod login;
pub mod perfil;
pub mod registro;
pub mod salir;

#[derive(Debug)]
pub enum Action {
    Login {
        email: String,
        password: SecretString,
    },
    Registro {
        nombre: String,
        email: String,
        password: SecretString,
        confirmar: SecretString,
    },
    Estado,
    Perfil {
        nombre: Option<String>,
        email: Option<String>,
    },
    Contrasena {
        actual: SecretString,
        nueva: SecretString,
        confirmar: SecretString,
    },
    Salir,
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> Result<()> {
        run::execute(self, globals).await
    }
}

/// Session store + gateway pair every networked action works through.
fn connect(globals: &GlobalArgs) -> Result<(Arc<SessionStore>, Gateway)> {
    let store = Arc::new(SessionStore::open(globals.session_file.clone()));
    let gateway = Gateway::new(globals.api_url.clone(), Arc::clone(&store))?;
    Ok((store, gateway))
}

const MIN_PASSWORD_LEN: usize = 8;

/// Form-level password checks shared by registration and password
/// change; a failure here never reaches the backend.
fn check_new_password(password: &SecretString, confirmar: &SecretString) -> Result<()> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(anyhow!(
            "la contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"
        ));
    }
    if password.expose_secret() != confirmar.expose_secret() {
        return Err(anyhow!("las contraseñas no coinciden"));
    }
    Ok(())
}
