// ABOUTME: create-admin command for foodgram-cli
// ABOUTME: Registers an admin account or promotes an existing one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use anyhow::{bail, Result};
use foodgram::{
    auth::hash_password,
    database::Database,
    models::NewUser,
    permissions::UserRole,
    serializers::RegisterBody,
};
use tracing::info;

/// Values for the admin account
pub struct AdminAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Create the admin, or with `force` promote the existing account and reset its password
pub async fn create(database: &Database, account: AdminAccount, force: bool) -> Result<()> {
    let registration = RegisterBody {
        email: Some(account.email),
        username: Some(account.username),
        first_name: Some(account.first_name),
        last_name: Some(account.last_name),
        password: Some(account.password),
    }
    .validate()?;

    let cost = bcrypt::DEFAULT_COST;

    if let Some(existing) = database.get_user_by_email(&registration.email).await? {
        if !force {
            bail!(
                "User {} already exists; use --force to promote it to admin",
                existing.email
            );
        }
        let password_hash = hash_password(registration.password, cost).await?;
        database.set_password_hash(existing.id, &password_hash).await?;
        database.set_user_role(existing.id, UserRole::Admin).await?;
        database.set_user_active(existing.id, true).await?;
        info!(user_id = existing.id, "Existing user promoted to admin");
        println!("Promoted {} ({}) to admin", existing.username, existing.email);
        return Ok(());
    }

    let password_hash = hash_password(registration.password, cost).await?;
    let user = database
        .create_user(&NewUser {
            username: registration.username,
            email: registration.email,
            first_name: registration.first_name,
            last_name: registration.last_name,
            password_hash,
            role: UserRole::Admin,
        })
        .await?;

    info!(user_id = user.id, "Admin user created");
    println!("Created admin {} ({}) with id {}", user.username, user.email, user.id);
    Ok(())
}
