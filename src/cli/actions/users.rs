use super::{failure, print_user, Action};
use crate::features::auth::SessionStore;
use anyhow::{anyhow, Result};

/// Handle profile and user-by-id actions.
/// # Errors
/// Returns API failures with their user-facing message.
pub async fn handle(action: Action, store: &SessionStore) -> Result<()> {
    match action {
        Action::Me => {
            let user = store.fetch_current_user().await.map_err(failure)?;
            print_user(&user)?;
        }
        Action::UpdateMe { update } => {
            if update.is_empty() {
                return Err(anyhow!("nothing to update, see --help"));
            }
            let user = store.update_current_user(&update).await.map_err(failure)?;
            print_user(&user)?;
        }
        Action::GetUser { id } => {
            let user = store.users().get_user_by_id(&id).await.map_err(failure)?;
            print_user(&user)?;
        }
        Action::UpdateUser { id, update } => {
            if update.is_empty() {
                return Err(anyhow!("nothing to update, see --help"));
            }
            let user = store
                .users()
                .update_user_by_id(&id, &update)
                .await
                .map_err(failure)?;
            print_user(&user)?;
        }
        Action::DeleteUser { id } => {
            store
                .users()
                .delete_user_by_id(&id)
                .await
                .map_err(failure)?;
            println!("Deleted user {id}.");
        }
        other => return Err(anyhow!("not a user action: {other:?}")),
    }

    Ok(())
}
