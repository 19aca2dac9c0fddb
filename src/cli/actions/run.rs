use super::{auth, catalog, Action};
use crate::cli::globals::GlobalArgs;
use anyhow::Result;

pub(super) async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Status => catalog::status(globals).await,
        Action::Login { email, password } => auth::login(globals, &email, &password).await,
        Action::Google { credential } => auth::google(globals, &credential).await,
        Action::Check {
            email,
            hosted_domain,
        } => auth::check(globals, email, hosted_domain),
        Action::Logout => auth::logout(globals),
        Action::Whoami => auth::whoami(globals),
        Action::Products { category, supplier } => {
            catalog::products(globals, category.as_deref(), supplier.as_deref()).await
        }
        Action::Search { query } => catalog::search(globals, &query).await,
        Action::Order { fields } => catalog::order(globals, &fields).await,
        Action::Materials { category } => catalog::materials(globals, category.as_deref()).await,
        Action::Updates => catalog::updates(globals).await,
        Action::Stats { franchise_id } => catalog::stats(globals, &franchise_id).await,
    }
}
