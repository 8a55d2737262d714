//! Signup, signin and token verification.

use super::core::YearbookServer;
use super::responses::{AdminSummary, SignedInUser, SigninResponse, SignupOutcome};
use crate::auth::{
    AdminIdentity, AuthError, AuthenticatedContext, TOKEN_TYPE, bearer_token, hash_password,
    verify_password,
};
use crate::error::{YearbookError, YearbookResult};
use crate::models::{Admin, Department, SigninRequest, SignupRequest, slugify};
use crate::storage::StorageProvider;
use crate::tenant::{ObjectId, RequestContext};
use log::{debug, info, warn};

impl<S: StorageProvider> YearbookServer<S> {
    /// Create an admin together with the department they own.
    ///
    /// Runs as a saga under the write guard: the department is stored
    /// unlinked, then the admin, then the department is patched with the
    /// admin id. A failure after the first write deletes what was written.
    pub async fn signup(
        &self,
        request: SignupRequest,
        context: &RequestContext,
    ) -> YearbookResult<SignupOutcome> {
        request.validate()?;
        let username = request.username.trim().to_string();
        let slug = slugify(&request.department_name);
        info!(
            "Signup for '{}' with department slug '{}' (request: '{}')",
            username, slug, context.request_id
        );

        let password_hash = hash_password(request.password, self.config.bcrypt_cost).await?;

        let _guard = self.write_guard.lock().await;

        if self.admins.find_by_username(&username).await?.is_some() {
            return Err(YearbookError::conflict("Admin", "username", username));
        }
        if self.departments.find_by_slug(&slug).await?.is_some() {
            return Err(YearbookError::conflict("Department", "slug", slug));
        }
        let code = request.department_code.trim().to_string();
        if self.departments.find_by_code(&code).await?.is_some() {
            return Err(YearbookError::conflict("Department", "code", code));
        }

        let now = self.now();
        let mut department = Department::new(request.department_name.trim(), code, slug, now);
        self.departments.insert(&department).await?;

        let admin = Admin::new(username, password_hash, department.id, now);
        if let Err(e) = self.admins.insert(&admin).await {
            self.undo_signup(department.id, None, context).await;
            return Err(e);
        }

        department.admin_id = admin.id.to_hex();
        department.updated_at = now;
        let department = match self.departments.save(&department).await {
            Ok(department) => department,
            Err(e) => {
                self.undo_signup(department.id, Some(admin.id), context).await;
                return Err(e);
            }
        };

        info!(
            "Created admin {} for department {} (request: '{}')",
            admin.id, department.id, context.request_id
        );
        Ok(SignupOutcome {
            admin: AdminSummary::from(&admin),
            department,
        })
    }

    async fn undo_signup(
        &self,
        department_id: ObjectId,
        admin_id: Option<ObjectId>,
        context: &RequestContext,
    ) {
        warn!(
            "Rolling back signup of department {} (request: '{}')",
            department_id, context.request_id
        );
        if let Some(admin_id) = admin_id {
            if let Err(e) = self.admins.delete(admin_id).await {
                warn!("Could not remove admin {} during rollback: {}", admin_id, e);
            }
        }
        if let Err(e) = self.departments.delete(department_id).await {
            warn!(
                "Could not remove department {} during rollback: {}",
                department_id, e
            );
        }
    }

    /// Check credentials and issue a bearer token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn signin(
        &self,
        request: SigninRequest,
        context: &RequestContext,
    ) -> YearbookResult<SigninResponse> {
        request.validate()?;
        let username = request.username.trim();
        debug!(
            "Signin attempt for '{}' (request: '{}')",
            username, context.request_id
        );

        let Some(admin) = self.admins.find_by_username(username).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(request.password, admin.password.clone()).await? {
            warn!(
                "Wrong password for '{}' (request: '{}')",
                admin.username, context.request_id
            );
            return Err(AuthError::InvalidCredentials.into());
        }

        if !admin.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        let department_id = admin.department().ok_or_else(|| {
            YearbookError::internal(format!("Admin {} has no department reference", admin.id))
        })?;

        let token = self.tokens.issue(admin.id, department_id, self.now())?;
        info!(
            "Admin {} signed in (request: '{}')",
            admin.id, context.request_id
        );

        Ok(SigninResponse {
            token,
            token_type: TOKEN_TYPE.to_string(),
            user: SignedInUser {
                username: admin.username,
            },
        })
    }

    /// Verify an `Authorization` header value or bare token.
    pub fn authenticate(&self, header: &str) -> YearbookResult<AdminIdentity> {
        let token = bearer_token(header)?;
        let identity = self.tokens.authenticate(token, self.now())?;
        debug!(
            "Authenticated admin {} (token {})",
            identity.admin_id(),
            &identity.token_fingerprint()[..12]
        );
        Ok(identity)
    }

    /// Activate or deactivate an admin of the caller's department.
    pub async fn set_admin_active(
        &self,
        context: &AuthenticatedContext,
        admin_id: ObjectId,
        active: bool,
    ) -> YearbookResult<AdminSummary> {
        let target = self
            .admins
            .get(admin_id)
            .await?
            .ok_or_else(|| YearbookError::not_found("Admin", admin_id.to_hex()))?;

        if target.department() != Some(context.department_id()) {
            return Err(YearbookError::forbidden(
                "You can only manage admins of your department",
            ));
        }

        let updated = self
            .admins
            .set_active(admin_id, active, self.now())
            .await?
            .ok_or_else(|| YearbookError::not_found("Admin", admin_id.to_hex()))?;

        info!(
            "Admin {} set to active={} by {} (request: '{}')",
            admin_id,
            active,
            context.admin_id(),
            context.request_id()
        );
        Ok(AdminSummary::from(&updated))
    }
}
