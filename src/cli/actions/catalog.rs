use super::user_facing;
use crate::{cli::globals::GlobalArgs, portal::ApiResponse};
use anyhow::{bail, Result};
use tracing::{info, warn};

/// Prints a successful response body as pretty JSON, or fails with the
/// backend's message.
fn render(response: &ApiResponse) -> Result<()> {
    if !response.success {
        bail!(response.message_or("Request failed"));
    }
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

/// Handle `status`
///
/// # Errors
/// Returns an error if the backend is unreachable or reports a problem.
pub async fn status(globals: &GlobalArgs) -> Result<()> {
    let client = globals.client()?;
    let response = client.status().await.map_err(|err| {
        warn!("cannot connect to backend: {err}");
        user_facing(err)
    })?;

    if response.success {
        info!("backend connected");
        println!("Backend connected: {}", response.message_or("ok"));
        Ok(())
    } else {
        bail!("Backend issue: {}", response.message_or("unknown"))
    }
}

/// Handle `products`
///
/// # Errors
/// Returns an error if the request fails.
pub async fn products(
    globals: &GlobalArgs,
    category: Option<&str>,
    supplier: Option<&str>,
) -> Result<()> {
    let response = globals
        .client()?
        .products(category, supplier)
        .await
        .map_err(user_facing)?;
    render(&response)
}

/// Handle `search`
///
/// # Errors
/// Returns an error if the request fails.
pub async fn search(globals: &GlobalArgs, query: &str) -> Result<()> {
    let response = globals
        .client()?
        .search_products(query)
        .await
        .map_err(user_facing)?;
    render(&response)
}

/// Handle `order`
///
/// # Errors
/// Returns an error if the request fails or the backend rejects the order.
pub async fn order(globals: &GlobalArgs, fields: &[(String, String)]) -> Result<()> {
    let response = globals
        .client()?
        .place_order(fields)
        .await
        .map_err(user_facing)?;
    render(&response)
}

/// Handle `materials`
///
/// # Errors
/// Returns an error if the request fails.
pub async fn materials(globals: &GlobalArgs, category: Option<&str>) -> Result<()> {
    let response = globals
        .client()?
        .materials(category)
        .await
        .map_err(user_facing)?;
    render(&response)
}

/// Handle `updates`
///
/// # Errors
/// Returns an error if the request fails.
pub async fn updates(globals: &GlobalArgs) -> Result<()> {
    let response = globals.client()?.updates().await.map_err(user_facing)?;
    render(&response)
}

/// Handle `stats`
///
/// # Errors
/// Returns an error if the request fails.
pub async fn stats(globals: &GlobalArgs, franchise_id: &str) -> Result<()> {
    let response = globals
        .client()?
        .franchise_stats(franchise_id)
        .await
        .map_err(user_facing)?;
    render(&response)
}
