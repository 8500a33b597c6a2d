//! Accounts and token issuing. Refresh tokens are single use: every refresh
//! revokes the presented token and stores its replacement.

use actix_web::web;
use chrono::{TimeZone, Utc};
use tracing::{debug, error, info, instrument};

use crate::auth::auth::AuthUser;
use crate::auth::jwt::{generate_access_token, generate_refresh_token, verify_token};
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::model::employee::EmployeeMaster;
use crate::model::role::Role;
use crate::model::user::{LoginRequest, RefreshToken, RegisterRequest, TokenPair, User, UserResponse};
use crate::models::{Claims, TokenType};
use crate::store::{Filter, Store, StoreError, new_id};

use super::guards::{ensure_optional, now};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USERNAME_TAKEN: &str = "Username already taken";

fn normalize(username: &str) -> String {
    username.trim().to_lowercase()
}

fn internal<E: std::fmt::Display>(what: &'static str) -> impl FnOnce(E) -> ApiError {
    move |e| {
        error!(error = %e, "{}", what);
        ApiError::Internal
    }
}

#[derive(Clone)]
pub struct AuthService {
    store: Store,
    jwt_secret: String,
    access_token_ttl: usize,
    refresh_token_ttl: usize,
}

impl AuthService {
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            jwt_secret: config.jwt_secret.clone(),
            access_token_ttl: config.access_token_ttl,
            refresh_token_ttl: config.refresh_token_ttl,
        }
    }

    async fn find_user(&self, username: &str) -> ApiResult<Option<User>> {
        Ok(self.store.find_first(Filter::new().eq("username", username)).await?)
    }

    /// Decodes a bearer access token with this service's secret.
    pub fn authenticate(&self, token: &str) -> ApiResult<AuthUser> {
        AuthUser::from_token(token, &self.jwt_secret)
    }

    /// Open registration creates Employee accounts. Other roles need an Admin
    /// caller, except for the very first account.
    pub async fn register(&self, req: RegisterRequest, caller: Option<&AuthUser>) -> ApiResult<UserResponse> {
        let username = normalize(&req.username);
        if username.is_empty() || req.password.is_empty() {
            return Err(ApiError::BadRequest("Username and password must not be empty".into()));
        }
        let role = Role::from_id(req.role_id)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown role id {}", req.role_id)))?;
        let caller_is_admin = caller.is_some_and(|c| c.role == Role::Admin);
        if role != Role::Employee && !caller_is_admin && self.store.count::<User>(Filter::new()).await? > 0 {
            info!(role = %role, "Elevated registration refused");
            return Err(ApiError::Forbidden("Only an Admin can register this role".into()));
        }
        let employee_id = req.employee_id.filter(|id| !id.is_empty());
        ensure_optional::<EmployeeMaster>(&self.store, employee_id.as_deref()).await?;

        if self.find_user(&username).await?.is_some() {
            return Err(ApiError::Conflict(USERNAME_TAKEN.into()));
        }

        let password = req.password;
        let password_hash = web::block(move || hash_password(&password))
            .await
            .map_err(internal("Password hashing task failed"))?
            .map_err(internal("Failed to hash password"))?;

        let now = now();
        let user = User {
            id: new_id(),
            username,
            password_hash,
            role,
            employee_id,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        match self.store.create(&user).await {
            Err(StoreError::Conflict(_)) => return Err(ApiError::Conflict(USERNAME_TAKEN.into())),
            other => other?,
        }

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user.into())
    }

    #[instrument(name = "auth_login", skip(self, req), fields(username = %req.username))]
    pub async fn login(&self, req: LoginRequest) -> ApiResult<TokenPair> {
        debug!("Fetching user");
        let mut user = match self.find_user(&normalize(&req.username)).await? {
            Some(user) if user.is_active => user,
            _ => {
                info!("Invalid credentials: unknown or inactive user");
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };

        let password = req.password;
        let hash = user.password_hash.clone();
        let verified = web::block(move || verify_password(&password, &hash))
            .await
            .map_err(internal("Password check task failed"))?;
        if let Err(e) = verified {
            info!(error = %e, "Invalid credentials: password mismatch");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let pair = self.issue(&user).await?;

        user.last_login_at = Some(now());
        if let Err(e) = self.store.update(&user).await {
            // not fatal for the login itself
            error!(error = %e, "Failed to update last_login_at");
        }

        info!(user_id = %user.id, "Login successful");
        Ok(pair)
    }

    /// Swaps a valid refresh token for a new pair.
    pub async fn refresh(&self, token: &str) -> ApiResult<TokenPair> {
        let claims = self.refresh_claims(token)?;

        let mut stored = match self
            .store
            .find_first::<RefreshToken>(Filter::new().eq("jti", claims.jti.as_str()))
            .await?
        {
            Some(t) if !t.revoked => t,
            _ => {
                info!(jti = %claims.jti, "Refresh with unknown or revoked token");
                return Err(ApiError::Unauthorized("Refresh token revoked".into()));
            }
        };

        stored.revoked = true;
        self.store.update(&stored).await?;

        let user = match self.store.find::<User>(&stored.user_id).await? {
            Some(user) if user.is_active => user,
            _ => return Err(ApiError::Unauthorized("User no longer active".into())),
        };

        let pair = self.issue(&user).await?;
        debug!(user_id = %user.id, "Refresh token rotated");
        Ok(pair)
    }

    /// Revokes the refresh token when it is one; anything else is ignored.
    pub async fn logout(&self, token: &str) -> ApiResult<()> {
        let Ok(claims) = self.refresh_claims(token) else {
            return Ok(());
        };

        if let Some(mut stored) = self
            .store
            .find_first::<RefreshToken>(Filter::new().eq("jti", claims.jti.as_str()))
            .await?
        {
            if !stored.revoked {
                stored.revoked = true;
                self.store.update(&stored).await?;
                info!(user_id = %stored.user_id, "Refresh token revoked on logout");
            }
        }
        Ok(())
    }

    fn refresh_claims(&self, token: &str) -> ApiResult<Claims> {
        let claims = verify_token(token, &self.jwt_secret)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".into()))?;
        if claims.token_type != TokenType::Refresh {
            return Err(ApiError::Unauthorized("Refresh token required".into()));
        }
        Ok(claims)
    }

    async fn issue(&self, user: &User) -> ApiResult<TokenPair> {
        let access_token = generate_access_token(user, &self.jwt_secret, self.access_token_ttl)
            .map_err(internal("Failed to sign access token"))?;
        let (refresh_token, claims) = generate_refresh_token(user, &self.jwt_secret, self.refresh_token_ttl)
            .map_err(internal("Failed to sign refresh token"))?;

        let expires_at = Utc
            .timestamp_opt(claims.exp as i64, 0)
            .single()
            .ok_or(ApiError::Internal)?;
        let record = RefreshToken {
            id: new_id(),
            user_id: user.id.clone(),
            jti: claims.jti,
            expires_at,
            revoked: false,
            created_at: now(),
        };
        self.store.create(&record).await?;

        Ok(TokenPair { access_token, refresh_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(Store::in_memory(), &Config::for_tests())
    }

    fn register(username: &str, role_id: u8) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: "s3cret-pass".into(),
            role_id,
            employee_id: None,
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest { username: username.into(), password: password.into() }
    }

    #[actix_web::test]
    async fn usernames_are_case_insensitive_and_unique() {
        let service = service();
        let user = service.register(register("  HR.Lead ", 2), None).await.unwrap();
        assert_eq!(user.username, "hr.lead");
        assert_eq!(user.role, Role::Hr);

        assert!(matches!(service.register(register("hr.lead", 3), None).await, Err(ApiError::Conflict(_))));
        assert!(matches!(service.register(register("someone", 42), None).await, Err(ApiError::BadRequest(_))));
    }

    #[actix_web::test]
    async fn elevated_roles_need_an_admin_after_the_first_account() {
        let service = service();
        service.register(register("root", 1), None).await.unwrap();

        assert!(matches!(
            service.register(register("mallory", 1), None).await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            service.register(register("mallory", 2), None).await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(service.register(register("staff", 3), None).await.is_ok());

        let tokens = service.login(login("root", "s3cret-pass")).await.unwrap();
        let admin = service.authenticate(&tokens.access_token).unwrap();
        let hr = service.register(register("hr.lead", 2), Some(&admin)).await.unwrap();
        assert_eq!(hr.role, Role::Hr);

        let tokens = service.login(login("staff", "s3cret-pass")).await.unwrap();
        let staff = service.authenticate(&tokens.access_token).unwrap();
        assert!(matches!(
            service.register(register("sneaky", 1), Some(&staff)).await,
            Err(ApiError::Forbidden(_))
        ));
    }

    #[actix_web::test]
    async fn login_checks_the_password() {
        let service = service();
        service.register(register("ann", 3), None).await.unwrap();

        assert!(service.login(login("ANN", "s3cret-pass")).await.is_ok());
        assert!(matches!(
            service.login(login("ann", "wrong")).await,
            Err(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            service.login(login("bob", "s3cret-pass")).await,
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[actix_web::test]
    async fn refresh_rotates_and_revokes() {
        let service = service();
        service.register(register("ann", 3), None).await.unwrap();
        let first = service.login(login("ann", "s3cret-pass")).await.unwrap();

        let second = service.refresh(&first.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);
        assert!(matches!(
            service.refresh(&first.refresh_token).await,
            Err(ApiError::Unauthorized(_))
        ));

        // access tokens cannot refresh
        assert!(matches!(
            service.refresh(&second.access_token).await,
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[actix_web::test]
    async fn logout_revokes_the_refresh_token() {
        let service = service();
        service.register(register("ann", 3), None).await.unwrap();
        let pair = service.login(login("ann", "s3cret-pass")).await.unwrap();

        service.logout(&pair.refresh_token).await.unwrap();
        service.logout(&pair.refresh_token).await.unwrap();
        service.logout("garbage").await.unwrap();
        assert!(matches!(
            service.refresh(&pair.refresh_token).await,
            Err(ApiError::Unauthorized(_))
        ));
    }
}
