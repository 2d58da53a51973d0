use tasklane_application::EnsureUserInput;
use tasklane_core::AppResult;
use tracing::{info, warn};

use crate::state::AppState;

const DEV_SEED_PASSWORD: &str = "tasklane";

struct SeedUser {
    email: &'static str,
    display_name: &'static str,
    is_superuser: bool,
    is_staff: bool,
    role: Option<&'static str>,
}

const DEV_SEED_USERS: [SeedUser; 3] = [
    SeedUser {
        email: "admin@tasklane.local",
        display_name: "Tasklane Admin",
        is_superuser: true,
        is_staff: true,
        role: None,
    },
    SeedUser {
        email: "manager@tasklane.local",
        display_name: "Project Manager",
        is_superuser: false,
        is_staff: true,
        role: Some("gestionnaire"),
    },
    SeedUser {
        email: "member@tasklane.local",
        display_name: "Team Member",
        is_superuser: false,
        is_staff: false,
        role: Some("membre"),
    },
];

/// Creates the local development accounts and grants their default roles.
///
/// Safe to run repeatedly: existing users and assignments are left untouched.
pub async fn run(state: &AppState) -> AppResult<()> {
    for seed in &DEV_SEED_USERS {
        let user = state
            .user_service
            .ensure_user(EnsureUserInput {
                email: seed.email.to_owned(),
                display_name: seed.display_name.to_owned(),
                password: DEV_SEED_PASSWORD.to_owned(),
                is_superuser: seed.is_superuser,
                is_staff: seed.is_staff,
            })
            .await?;
        info!(email = seed.email, user_id = %user.id, "dev seed user ready");

        let Some(role_name) = seed.role else {
            continue;
        };

        let outcome = state
            .assignment_service
            .assign(user.id, role_name, None)
            .await?;
        match outcome.assignment {
            Some(_) if outcome.was_created => {
                info!(email = seed.email, role = role_name, "dev seed role assigned");
            }
            Some(_) => {}
            None => warn!(
                email = seed.email,
                role = role_name,
                "dev seed role missing, run bootstrap first"
            ),
        }
    }

    Ok(())
}
