use crate::cli::globals::GlobalArgs;
use crate::session::SessionStore;
use anyhow::Result;

/// # Errors
/// Returns an error if the session file cannot be removed.
pub fn handle(globals: &GlobalArgs) -> Result<()> {
    let store = SessionStore::open(globals.session_file.clone());
    store.clear()?;

    println!("Sesión cerrada.");

    Ok(())
}
