use chrono::Utc;
use sea_orm::*;

use crate::entity::admin_credential;
use crate::utils::hash;

/// The shared-secret check guarding catalog mutations.
pub struct AdminGate<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AdminGate<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Compare `candidate` against the stored credential.
    ///
    /// Returns `false` when no credential has been provisioned.
    pub async fn verify_password(&self, candidate: &str) -> Result<bool, DbErr> {
        let Some(credential) = admin_credential::Entity::find()
            .order_by_asc(admin_credential::Column::Id)
            .one(self.conn)
            .await?
        else {
            return Ok(false);
        };

        hash::verify_password(candidate, &credential.password_hash)
            .map_err(|e| DbErr::Custom(format!("Stored admin credential is unreadable: {e}")))
    }

    /// Store `password` as the admin secret unless one already exists.
    ///
    /// Returns whether a credential was written.
    pub async fn provision(&self, password: &str) -> Result<bool, DbErr> {
        let existing = admin_credential::Entity::find().count(self.conn).await?;
        if existing > 0 {
            return Ok(false);
        }

        let password_hash = hash::hash_password(password)
            .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

        admin_credential::ActiveModel {
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(true)
    }
}
