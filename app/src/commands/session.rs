//! Sign-in commands.

use crate::error::CommandError;
use crate::state::AppState;
use phishguard_core::Username;
use phishguard_scan::IdentityProvider;

/// Sign a user in; later scans are logged under this name.
pub fn sign_in(state: &AppState, username: &str) -> Result<String, CommandError> {
    let user = Username::new(username)?;
    let name = user.to_string();
    state.session.sign_in(user);
    Ok(name)
}

/// Sign out; later scans are not logged.
pub fn sign_out(state: &AppState) {
    state.session.sign_out();
}

/// Name of the signed-in user, if any.
pub fn current_user(state: &AppState) -> Option<String> {
    state.session.current_user().map(|u| u.to_string())
}
