use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::admin_user::{AdminUser as DomainAdminUser, NewAdminUser as DomainNewAdminUser},
    models::admin_user::{AdminUser as DbAdminUser, NewAdminUser as DbNewAdminUser},
    repository::{AdminUserReader, AdminUserWriter, DieselRepository},
};

impl AdminUserReader for DieselRepository {
    fn get_admin_by_email(&self, email: &str) -> RepositoryResult<Option<DomainAdminUser>> {
        use crate::schema::admin_users;

        let mut conn = self.conn()?;
        let admin = admin_users::table
            .filter(admin_users::email.eq(email.trim().to_lowercase()))
            .first::<DbAdminUser>(&mut conn)
            .optional()?;

        Ok(admin.map(Into::into))
    }
}

impl AdminUserWriter for DieselRepository {
    fn create_admin(&self, new_admin: &DomainNewAdminUser) -> RepositoryResult<DomainAdminUser> {
        use crate::schema::admin_users;

        let mut conn = self.conn()?;
        let db_new = DbNewAdminUser::from(new_admin);

        let created = diesel::insert_into(admin_users::table)
            .values(&db_new)
            .get_result::<DbAdminUser>(&mut conn)?;

        Ok(created.into())
    }
}
