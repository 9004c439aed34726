use super::{contrasena, estado, login, perfil, registro, salir, Action};
use crate::cli::globals::GlobalArgs;
use anyhow::Result;

pub(super) async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Login { email, password } => login::handle(globals, &email, &password).await,
        Action::Registro {
            nombre,
            email,
            password,
            confirmar,
        } => registro::handle(globals, &nombre, &email, &password, &confirmar).await,
        Action::Estado => estado::handle(globals).await,
        Action::Perfil { nombre, email } => perfil::handle(globals, nombre, email).await,
        Action::Contrasena {
            actual,
            nueva,
            confirmar,
        } => contrasena::handle(globals, &actual, &nueva, &confirmar).await,
        Action::Salir => salir::handle(globals),
    }
}
