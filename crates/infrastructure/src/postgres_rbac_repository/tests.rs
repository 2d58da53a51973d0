use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tasklane_application::{
    AssignmentRepository, BootstrapGroupRepository, NewRole, NewUser, PermissionCatalog,
    RoleChanges, RoleLookup, RoleRepository, UserRepository,
};
use tasklane_core::{AppError, UserId};
use tasklane_domain::{EmailAddress, PermissionId, PermissionKey, RoleId, RoleName};
use uuid::Uuid;

use super::PostgresRbacRepository;
use crate::PostgresUserRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres rbac tests: {error}");
    }

    Some(pool)
}

fn unique_name(prefix: &str) -> RoleName {
    let suffix = Uuid::new_v4().simple().to_string();
    RoleName::new(format!("{prefix}-{}", &suffix[..12])).unwrap_or_else(|_| unreachable!())
}

async fn create_user(pool: &PgPool) -> UserId {
    let repository = PostgresUserRepository::new(pool.clone());
    let email = format!("{}@tasklane.test", Uuid::new_v4().simple());
    repository
        .create_user(NewUser {
            email: EmailAddress::new(email.as_str()).unwrap_or_else(|_| unreachable!()),
            display_name: email,
            password_hash: None,
            is_superuser: false,
            is_staff: false,
        })
        .await
        .unwrap_or_else(|_| unreachable!())
        .id
}

async fn catalog_ids(
    repository: &PostgresRbacRepository,
    keys: &[(&str, &str)],
) -> Vec<PermissionId> {
    let mut ids = Vec::new();
    for (resource_type, codename) in keys {
        let key = PermissionKey::new(*resource_type, *codename).unwrap_or_else(|_| unreachable!());
        let permission = repository
            .find_permission(&key)
            .await
            .unwrap_or_else(|_| unreachable!())
            .unwrap_or_else(|| unreachable!());
        ids.push(permission.permission_id());
    }
    ids
}

#[tokio::test]
async fn catalog_seed_is_present() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRbacRepository::new(pool);
    let catalog = repository.list_permissions().await.unwrap_or_default();

    assert!(catalog.len() >= 28);
    assert!(
        catalog
            .iter()
            .any(|permission| permission.codename() == "view_userrole")
    );
}

#[tokio::test]
async fn insert_role_persists_permissions_and_rejects_duplicates() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRbacRepository::new(pool);
    let permission_ids = catalog_ids(&repository, &[("task", "view_task"), ("task", "add_task")])
        .await;
    let name = unique_name("editors");

    let role = repository
        .insert_role(NewRole {
            name: name.clone(),
            description: Some("Task editors".to_owned()),
            permission_ids: permission_ids.clone(),
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(role.permissions().len(), 2);
    assert!(role.has_permission("add_task"));

    let duplicate = repository
        .insert_role(NewRole {
            name,
            description: None,
            permission_ids,
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_role_applies_partial_changes() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRbacRepository::new(pool);
    let view_task = catalog_ids(&repository, &[("task", "view_task")]).await;
    let role = repository
        .insert_role(NewRole {
            name: unique_name("viewers"),
            description: Some("Initial".to_owned()),
            permission_ids: view_task,
        })
        .await
        .unwrap_or_else(|_| unreachable!());

    let cleared = repository
        .update_role(
            role.role_id(),
            RoleChanges {
                description: Some(None),
                ..RoleChanges::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());
    assert_eq!(cleared.name(), role.name());
    assert_eq!(cleared.description(), None);
    assert_eq!(cleared.permissions().len(), 1);

    let replaced = repository
        .update_role(
            role.role_id(),
            RoleChanges {
                permission_ids: Some(Vec::new()),
                ..RoleChanges::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());
    assert!(replaced.permissions().is_empty());

    let missing = repository
        .update_role(RoleId::new(), RoleChanges::default())
        .await;
    assert!(matches!(missing, Ok(None)));
}

#[tokio::test]
async fn get_or_create_role_is_idempotent() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRbacRepository::new(pool);
    let name = unique_name("starter");

    let (first, first_created) = repository
        .get_or_create_role(&name, Some("Starter"))
        .await
        .unwrap_or_else(|_| unreachable!());
    let (second, second_created) = repository
        .get_or_create_role(&name, Some("Other"))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(first_created);
    assert!(!second_created);
    assert_eq!(first.role_id(), second.role_id());
    assert_eq!(second.description(), Some("Starter"));
}

#[tokio::test]
async fn assignments_are_idempotent_and_cascade_on_role_delete() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRbacRepository::new(pool.clone());
    let user_id = create_user(&pool).await;
    let permission_ids = catalog_ids(&repository, &[("project", "view_project")]).await;
    let role = repository
        .insert_role(NewRole {
            name: unique_name("observers"),
            description: None,
            permission_ids,
        })
        .await
        .unwrap_or_else(|_| unreachable!());

    let (first, first_created) = repository
        .get_or_create_assignment(user_id, role.role_id(), None)
        .await
        .unwrap_or_else(|_| unreachable!());
    let (second, second_created) = repository
        .get_or_create_assignment(user_id, role.role_id(), Some(user_id))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(first_created);
    assert!(!second_created);
    assert_eq!(first.assignment_id(), second.assignment_id());

    assert!(
        repository
            .user_has_role(user_id, role.name().as_str())
            .await
            .unwrap_or_default()
    );
    assert!(
        repository
            .user_has_permission(user_id, "view_project")
            .await
            .unwrap_or_default()
    );

    assert!(
        repository
            .delete_role(role.role_id())
            .await
            .unwrap_or_default()
    );
    assert!(
        repository
            .list_assignments_for_user(user_id)
            .await
            .unwrap_or_default()
            .is_empty()
    );
    assert!(
        !repository
            .user_has_permission(user_id, "view_project")
            .await
            .unwrap_or(true)
    );
}

#[tokio::test]
async fn assigning_to_a_missing_user_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRbacRepository::new(pool);
    let (role, _) = repository
        .get_or_create_role(&unique_name("orphans"), None)
        .await
        .unwrap_or_else(|_| unreachable!());

    let result = repository
        .get_or_create_assignment(UserId::new(), role.role_id(), None)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn deleting_granter_keeps_assignment() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRbacRepository::new(pool.clone());
    let users = PostgresUserRepository::new(pool.clone());
    let granter = create_user(&pool).await;
    let member = create_user(&pool).await;
    let (role, _) = repository
        .get_or_create_role(&unique_name("members"), None)
        .await
        .unwrap_or_else(|_| unreachable!());
    let _ = repository
        .get_or_create_assignment(member, role.role_id(), Some(granter))
        .await;

    assert!(users.delete_user(granter).await.unwrap_or_default());

    let assignments = repository
        .list_assignments_for_user(member)
        .await
        .unwrap_or_default();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].created_by(), None);
}

#[tokio::test]
async fn bootstrap_group_links_role_until_role_is_deleted() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRbacRepository::new(pool);
    let group_name = format!("group-{}", Uuid::new_v4().simple());
    let (group, created) = repository
        .get_or_create_group(group_name.as_str())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(created);

    let permission_ids = catalog_ids(&repository, &[("user", "view_user")]).await;
    assert!(
        repository
            .set_group_permissions(group.group_id, &permission_ids)
            .await
            .is_ok()
    );

    let (role, _) = repository
        .get_or_create_role(&unique_name("admins"), None)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(
        repository
            .link_group_role(group.group_id, role.role_id())
            .await
            .is_ok()
    );

    let (linked, created_again) = repository
        .get_or_create_group(group_name.as_str())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(!created_again);
    assert_eq!(linked.role_id, Some(role.role_id()));

    let _ = repository.delete_role(role.role_id()).await;
    let (unlinked, _) = repository
        .get_or_create_group(group_name.as_str())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(unlinked.role_id, None);

    let by_name = repository
        .find_role(&RoleLookup::Name(role.name().as_str().to_owned()))
        .await;
    assert!(matches!(by_name, Ok(None)));
}
