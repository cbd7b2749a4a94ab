//! Provision an administrator account: `create-admin <email> <password>`.

use std::env;

use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;

use pushkind_storefront::domain::admin_user::NewAdminUser;
use pushkind_storefront::repository::{AdminUserWriter, DieselRepository};
use pushkind_storefront::services::auth::hash_password;

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let [email, password] = args.as_slice() else {
        eprintln!("usage: create-admin <email> <password>");
        std::process::exit(2);
    };

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("Failed to hash password: {e}");
            std::process::exit(1);
        }
    };

    match repo.create_admin(&NewAdminUser::new(email, password_hash)) {
        Ok(admin) => log::info!("Created admin {} with id {}", admin.email, admin.id),
        Err(e) => {
            log::error!("Failed to create admin {email}: {e}");
            std::process::exit(1);
        }
    }
}
