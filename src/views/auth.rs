// src/views/auth.rs

use crate::{
    api::ApiClient,
    error::ClientError,
    identity::SessionStore,
    models::user::{LoginRequest, RegisterRequest, User},
    routes::Route,
};

/// Where a freshly signed-in user lands.
pub fn landing_route(user: &User) -> Route {
    if user.is_admin { Route::Admin } else { Route::Home }
}

/// Signs in and stores the identity. Returns the landing screen.
pub async fn login(api: &ApiClient, store: &SessionStore, req: &LoginRequest) -> Result<Route, ClientError> {
    let user = api.login(req).await?;
    let route = landing_route(&user);
    store.sign_in(user)?;
    Ok(route)
}

/// Registers, signs in, and returns the landing screen.
pub async fn register(
    api: &ApiClient,
    store: &SessionStore,
    req: &RegisterRequest,
) -> Result<Route, ClientError> {
    let user = api.register(req).await?;
    let route = landing_route(&user);
    store.sign_in(user)?;
    Ok(route)
}

/// Ends the server session and clears the local identity.
/// The local identity is cleared even when the server call fails.
pub async fn logout(api: &ApiClient, store: &SessionStore) -> Result<Route, ClientError> {
    if let Err(e) = api.logout().await {
        tracing::warn!("Server logout failed, clearing local session anyway: {}", e);
    }
    store.sign_out()?;
    Ok(Route::Login)
}
