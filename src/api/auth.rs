//! Login, registration and session verification.

use anyhow::{anyhow, Result};
use secrecy::SecretString;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::error_message;
use super::types::{Registro, RespuestaAuth, Usuario};
use crate::gateway::{ApiRequest, Gateway};
use crate::session::{Session, SessionStore};

/// Sign in and persist the issued session.
///
/// # Errors
/// Returns an error if the request fails, the backend rejects the
/// credentials, or the response is missing expected fields.
#[instrument(skip(gateway, store, password))]
pub async fn login(
    gateway: &Gateway,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<Usuario> {
    let request = ApiRequest::post(
        "/auth/login",
        json!({
            "email": email,
            "password": password
        }),
    );

    let response = gateway.send(request).await?;

    if !response.status().is_success() {
        let status = response.status();
        let json_response: Value = response.json().await?;

        return Err(anyhow!(
            "/auth/login - {}, {}",
            status,
            error_message(&json_response)
        ));
    }

    let RespuestaAuth {
        usuario,
        access_token,
        refresh_token,
    } = response.json().await?;

    store.commit(Session {
        access_token: SecretString::from(access_token),
        refresh_token: SecretString::from(refresh_token),
        usuario: Some(usuario.clone()),
    })?;

    debug!("session established for {}", usuario.email);

    Ok(usuario)
}

/// Register a new account; the backend signs the user in on success, so
/// the issued session is persisted the same way as for login.
///
/// # Errors
/// Returns an error if the request fails, the backend rejects the
/// registration, or the response is missing expected fields.
#[instrument(skip_all, fields(email = %solicitud.email))]
pub async fn registro(
    gateway: &Gateway,
    store: &SessionStore,
    solicitud: &Registro,
) -> Result<Usuario> {
    let request = ApiRequest::post("/auth/registro", serde_json::to_value(solicitud)?);

    let response = gateway.send(request).await?;

    if !response.status().is_success() {
        let status = response.status();
        let json_response: Value = response.json().await?;

        return Err(anyhow!(
            "/auth/registro - {}, {}",
            status,
            error_message(&json_response)
        ));
    }

    let RespuestaAuth {
        usuario,
        access_token,
        refresh_token,
    } = response.json().await?;

    store.commit(Session {
        access_token: SecretString::from(access_token),
        refresh_token: SecretString::from(refresh_token),
        usuario: Some(usuario.clone()),
    })?;

    debug!("session established for {}", usuario.email);

    Ok(usuario)
}

/// Check the access credential against the backend. Any non-OK answer
/// destroys the session.
///
/// # Errors
/// Returns an error if the request fails or the session is invalid.
#[instrument(skip(gateway, store))]
pub async fn verificar(gateway: &Gateway, store: &SessionStore) -> Result<()> {
    let response = gateway.send(ApiRequest::get("/auth/verificar")).await?;

    if !response.status().is_success() {
        let status = response.status();
        store.clear()?;
        return Err(anyhow!("/auth/verificar - {}, session is no longer valid", status));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use secrecy::ExposeSecret;
    use std::net::TcpListener;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn empty_store(dir: &tempfile::TempDir) -> Arc<SessionStore> {
        Arc::new(SessionStore::open(dir.path().join("session.json")))
    }

    #[tokio::test]
    async fn login_commits_session_and_routes_admins() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir()?;
        let store = empty_store(&dir);

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({
                "email": "a@b.com",
                "password": "secret1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "usuario": {"nombre": "Ana", "email": "a@b.com", "rol": "administrador"},
                "accessToken": "T1",
                "refreshToken": "R1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = Gateway::new(server.uri(), Arc::clone(&store))?;
        let usuario = login(&gateway, &store, "a@b.com", "secret1").await?;

        assert_eq!(usuario.rol, "administrador");
        assert_eq!(usuario.vista_inicial(), "/admin");

        let session = store.session().ok_or_else(|| anyhow!("session missing"))?;
        assert_eq!(session.access_token.expose_secret(), "T1");
        assert_eq!(session.refresh_token.expose_secret(), "R1");
        assert_eq!(session.usuario, Some(usuario));
        assert!(store.path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn login_failure_surfaces_backend_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir()?;
        let store = empty_store(&dir);

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "credenciales inválidas"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = Gateway::new(server.uri(), Arc::clone(&store))?;
        let result = login(&gateway, &store, "a@b.com", "wrong").await;

        let err = result.err().ok_or_else(|| anyhow!("expected error"))?;
        assert!(err.to_string().contains("credenciales inválidas"));
        assert!(store.session().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn registro_commits_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir()?;
        let store = empty_store(&dir);

        Mock::given(method("POST"))
            .and(path("/auth/registro"))
            .and(body_json(json!({
                "nombre": "Beto",
                "email": "b@c.com",
                "password": "muysecreta"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "usuario": {"nombre": "Beto", "email": "b@c.com", "rol": "cliente"},
                "accessToken": "T9",
                "refreshToken": "R9"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = Gateway::new(server.uri(), Arc::clone(&store))?;
        let solicitud = Registro {
            nombre: "Beto".to_string(),
            email: "b@c.com".to_string(),
            password: "muysecreta".to_string(),
        };
        let usuario = registro(&gateway, &store, &solicitud).await?;

        assert_eq!(usuario.vista_inicial(), "/");
        let session = store.session().ok_or_else(|| anyhow!("session missing"))?;
        assert_eq!(session.access_token.expose_secret(), "T9");
        Ok(())
    }

    #[tokio::test]
    async fn verificar_failure_destroys_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir()?;
        let store = empty_store(&dir);
        store.commit(Session {
            access_token: SecretString::from("T1".to_string()),
            refresh_token: SecretString::from("R1".to_string()),
            usuario: None,
        })?;

        Mock::given(method("GET"))
            .and(path("/auth/verificar"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": "sesión inválida"
            })))
            .mount(&server)
            .await;

        let gateway = Gateway::new(server.uri(), Arc::clone(&store))?;
        let result = verificar(&gateway, &store).await;

        assert!(result.is_err());
        assert!(store.session().is_none());
        assert!(!store.path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn verificar_success_keeps_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir()?;
        let store = empty_store(&dir);
        store.commit(Session {
            access_token: SecretString::from("T1".to_string()),
            refresh_token: SecretString::from("R1".to_string()),
            usuario: None,
        })?;

        Mock::given(method("GET"))
            .and(path("/auth/verificar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let gateway = Gateway::new(server.uri(), Arc::clone(&store))?;
        verificar(&gateway, &store).await?;

        assert!(store.session().is_some());
        Ok(())
    }
}
