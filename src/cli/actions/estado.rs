use crate::api;
use crate::cli::globals::GlobalArgs;
use anyhow::Result;

/// # Errors
/// Returns an error if the backend declares the session invalid; the
/// session is destroyed in that case.
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let (store, gateway) = super::connect(globals)?;

    let Some(session) = store.session() else {
        println!("No hay sesión activa.");
        return Ok(());
    };

    api::auth::verificar(&gateway, &store).await?;

    match session.usuario {
        Some(usuario) => {
            println!(
                "Sesión activa: {} <{}> ({})",
                usuario.nombre, usuario.email, usuario.rol
            );
            println!("Vista inicial: {}", usuario.vista_inicial());
        }
        None => println!("Sesión activa (perfil no disponible)."),
    }
    println!("Archivo de sesión: {}", store.path().display());

    Ok(())
}
