use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::admin_user::{AdminUser as DomainAdminUser, NewAdminUser as DomainNewAdminUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::admin_users)]
pub struct AdminUser {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::admin_users)]
pub struct NewAdminUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

impl From<AdminUser> for DomainAdminUser {
    fn from(value: AdminUser) -> Self {
        Self {
            id: value.id,
            email: value.email,
            password_hash: value.password_hash,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewAdminUser> for NewAdminUser<'a> {
    fn from(value: &'a DomainNewAdminUser) -> Self {
        Self {
            email: value.email.as_str(),
            password_hash: value.password_hash.as_str(),
        }
    }
}
