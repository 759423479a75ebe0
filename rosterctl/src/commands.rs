//! Command handlers: wire the engine together and drive it.

use crate::cli::UserFields;
use anyhow::{Context, Result, bail};
use roster_core::projector::ProjectedView;
use roster_core::{
    ApiClient, AuthSession, Config, FileCredentialStore, JsonOverlayStorage, OverlayStore,
    UserDirectory,
};
use roster_model::{NewUser, UserId};
use std::sync::Arc;

/// Everything a directory command needs, built once per invocation.
pub struct App {
    pub session: AuthSession,
    pub directory: UserDirectory,
}

/// Compose the engine from configuration: API client, credential slot,
/// overlay slot. The state container is owned here, at the composition root,
/// and handed its collaborators explicitly.
pub fn build(config: Config) -> Result<App> {
    let api = Arc::new(
        ApiClient::new(config.base_url.clone(), config.api_key.clone())
            .context("failed to construct API client")?,
    );
    let session = AuthSession::new(
        Arc::clone(&api),
        Box::new(FileCredentialStore::new(config.token_path())),
    );
    let overlay = OverlayStore::open(Box::new(JsonOverlayStorage::new(config.overlay_path())));
    let directory = UserDirectory::new(api, overlay, config.per_page);
    Ok(App { session, directory })
}

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    app.session
        .login(email, password)
        .await
        .context("login failed")?;
    println!("Logged in as {email}");
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.session.logout().await.context("logout failed")?;
    println!("Logged out");
    Ok(())
}

/// Directory actions are gated on a stored session.
pub async fn require_session(app: &App) -> Result<()> {
    if !app.session.restore().await {
        bail!("not logged in - run `rosterctl login` first");
    }
    Ok(())
}

pub async fn list(app: &mut App, page: u32, query: &str) -> Result<()> {
    require_session(app).await?;
    app.directory.set_query(query);
    let view = match app.directory.fetch_page(page).await {
        Ok(view) => view,
        Err(err) => {
            // Remote unavailable: fall back to the local records we do have.
            eprintln!("warning: {err}; showing local records only");
            app.directory.view()
        }
    };
    print_view(&view);
    Ok(())
}

pub async fn create(app: &mut App, fields: UserFields) -> Result<()> {
    require_session(app).await?;
    let draft = to_draft(fields)?;
    let view = app
        .directory
        .add_user(draft)
        .await
        .context("create failed")?;
    println!("Created; directory now holds {} record(s)", view.total);
    print_view(&view);
    Ok(())
}

pub async fn update(app: &mut App, id: &str, fields: UserFields) -> Result<()> {
    require_session(app).await?;
    let id = parse_id(id)?;
    let draft = to_draft(fields)?;
    let view = app
        .directory
        .update_user(id, draft)
        .await
        .context("update failed")?;
    print_view(&view);
    Ok(())
}

pub async fn delete(app: &mut App, id: &str) -> Result<()> {
    require_session(app).await?;
    let id = parse_id(id)?;
    let view = app
        .directory
        .remove_user(&id)
        .await
        .context("delete failed")?;
    println!("Deleted {id}");
    print_view(&view);
    Ok(())
}

fn parse_id(raw: &str) -> Result<UserId> {
    UserId::parse_text(raw).map_err(|err| anyhow::anyhow!("{err}"))
}

fn to_draft(fields: UserFields) -> Result<NewUser> {
    let draft = NewUser {
        email: fields.email,
        first_name: fields.first_name,
        last_name: fields.last_name,
        avatar: fields.avatar,
    };
    draft.validate().map_err(|err| anyhow::anyhow!("{err}"))?;
    Ok(draft)
}

fn print_view(view: &ProjectedView) {
    if view.items.is_empty() {
        println!("(no users on this page)");
    }
    for user in &view.items {
        let marker = if user.id.is_local() { "*" } else { " " };
        println!(
            "{marker} {:<12} {:<28} {}",
            user.id.to_string(),
            user.email,
            user.full_name()
        );
    }
    println!(
        "page {} of {} ({} total, * = local record)",
        view.page,
        view.page_count().max(1),
        view.total
    );
}
