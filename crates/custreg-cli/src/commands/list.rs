use anyhow::Result;
use custreg_application::{CustomerListView, ReloadOutcome};

use super::{Context, print_list};

pub async fn run(ctx: &Context) -> Result<()> {
    let app = ctx.bootstrap()?;

    match app.list_loader.reload_now().await {
        ReloadOutcome::Failed { message } => {
            anyhow::bail!("Failed to load customers: {message}")
        }
        outcome => tracing::debug!(?outcome, "List loaded"),
    }

    print_list(&CustomerListView::from_snapshot(&app.list_loader.snapshot()));
    Ok(())
}
