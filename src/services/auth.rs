//! Admin authentication: password hashing and signed bearer tokens.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::AuthConfig;
use crate::domain::admin_user::AdminUser;
use crate::domain::auth::{ADMIN_ROLE, AdminClaims, AuthToken};
use crate::forms::auth::LoginForm;
use crate::repository::AdminUserReader;
use crate::services::{ServiceError, ServiceResult};

/// Hash `password` into an Argon2 PHC string with a random salt.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    if password.is_empty() {
        return Err(ServiceError::Validation(
            "la contraseña no puede estar vacía".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::Internal(format!("password hashing failed: {err}")))
}

/// Check `password` against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            log::error!("Stored password hash is malformed: {err}");
            false
        }
    }
}

/// Sign an admin token for `admin` valid for the configured lifetime.
pub fn issue_token(admin: &AdminUser, config: &AuthConfig) -> ServiceResult<String> {
    let issued_at = chrono::Utc::now().timestamp();
    let claims = AdminClaims {
        sub: admin.id.to_string(),
        email: admin.email.clone(),
        role: ADMIN_ROLE.to_string(),
        iat: issued_at,
        exp: issued_at + config.token_ttl_seconds,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|err| ServiceError::Internal(format!("token signing failed: {err}")))
}

/// Verify a bearer token and return its admin claims.
///
/// Expired tokens are `Unauthorized`; tokens that are malformed, signed with
/// another key or lack the admin role are `Forbidden`.
pub fn verify_token(token: &str, config: &AuthConfig) -> ServiceResult<AdminClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = jsonwebtoken::decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => ServiceError::Unauthorized,
        _ => {
            log::warn!("Rejected admin token: {err}");
            ServiceError::Forbidden
        }
    })?;

    if !data.claims.is_admin() {
        return Err(ServiceError::Forbidden);
    }

    Ok(data.claims)
}

/// Authenticate an administrator and issue a token.
///
/// Unknown emails and wrong passwords both yield `Unauthorized`.
pub fn login<R>(repo: &R, config: &AuthConfig, form: LoginForm) -> ServiceResult<AuthToken>
where
    R: AdminUserReader + ?Sized,
{
    let (email, password) = form.into_credentials()?;

    let admin = repo
        .get_admin_by_email(&email)
        .map_err(ServiceError::query)?
        .ok_or(ServiceError::Unauthorized)?;

    if !verify_password(&password, &admin.password_hash) {
        return Err(ServiceError::Unauthorized);
    }

    let token = issue_token(&admin, config)?;

    Ok(AuthToken {
        message: "Login exitoso".to_string(),
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::repository::mock::MockAdminUserReader;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_seconds: 3600,
        }
    }

    fn admin(password: &str) -> AdminUser {
        AdminUser {
            id: 1,
            email: "admin@example.com".to_string(),
            password_hash: hash_password(password).expect("hash"),
            created_at: NaiveDateTime::default(),
        }
    }

    fn sign(claims: &AdminClaims, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign")
    }

    fn claims(role: &str, exp_offset: i64) -> AdminClaims {
        let now = chrono::Utc::now().timestamp();
        AdminClaims {
            sub: "1".to_string(),
            email: "admin@example.com".to_string(),
            role: role.to_string(),
            iat: now,
            exp: now + exp_offset,
        }
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("s3cret").expect("hash");

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret", "not-a-hash"));
    }

    #[test]
    fn issued_token_verifies() {
        let token = issue_token(&admin("pw"), &config()).expect("token");

        let claims = verify_token(&token, &config()).expect("valid token");

        assert_eq!(claims.sub, "1");
        assert_eq!(claims.role, ADMIN_ROLE);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let token = sign(&claims(ADMIN_ROLE, -120), "test-secret");

        assert!(matches!(
            verify_token(&token, &config()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn foreign_signature_or_garbage_is_forbidden() {
        let token = sign(&claims(ADMIN_ROLE, 600), "other-secret");
        assert!(matches!(
            verify_token(&token, &config()),
            Err(ServiceError::Forbidden)
        ));
        assert!(matches!(
            verify_token("garbage", &config()),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn non_admin_role_is_forbidden() {
        let token = sign(&claims("customer", 600), "test-secret");

        assert!(matches!(
            verify_token(&token, &config()),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn login_issues_token_for_valid_credentials() {
        let mut repo = MockAdminUserReader::new();
        let stored = admin("correct horse");
        repo.expect_get_admin_by_email()
            .withf(|email| email == "admin@example.com")
            .returning(move |_| Ok(Some(stored.clone())));

        let form = LoginForm {
            email: "Admin@Example.com".to_string(),
            password: "correct horse".to_string(),
        };
        let response = login(&repo, &config(), form).expect("login");

        assert_eq!(response.message, "Login exitoso");
        assert!(verify_token(&response.token, &config()).is_ok());
    }

    #[test]
    fn login_rejects_wrong_password_and_unknown_email() {
        let mut repo = MockAdminUserReader::new();
        let stored = admin("correct horse");
        repo.expect_get_admin_by_email()
            .returning(move |email| {
                Ok((email == "admin@example.com").then(|| stored.clone()))
            });

        let wrong_password = LoginForm {
            email: "admin@example.com".to_string(),
            password: "battery staple".to_string(),
        };
        assert!(matches!(
            login(&repo, &config(), wrong_password),
            Err(ServiceError::Unauthorized)
        ));

        let unknown = LoginForm {
            email: "nobody@example.com".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(matches!(
            login(&repo, &config(), unknown),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn login_requires_both_fields() {
        let repo = MockAdminUserReader::new();
        let form = LoginForm {
            email: String::new(),
            password: "pw".to_string(),
        };

        assert!(matches!(
            login(&repo, &config(), form),
            Err(ServiceError::Validation(_))
        ));
    }
}
