use std::future::{ready, Ready};
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use crate::AppState;
use crate::BuiltIns::jwt;
use crate::error::AppError;
use crate::Model::Account::AccountRole;

#[derive(Debug, Clone)]
pub enum AccessRequirement {
    AnyToken,
    Role(AccountRole),
    AnyOf(Vec<AccountRole>),
}

/// Caller identity taken from a verified bearer token. As an extractor it
/// enforces the [`AccessRequirement`] registered on the resource, or
/// `AnyToken` when none is.
#[derive(Debug, Clone)]
pub struct RequireAccess {
    pub user_id: String,
    pub role: AccountRole,
}

pub fn require_access(
    req: &HttpRequest,
    requirement: AccessRequirement,
) -> Result<RequireAccess, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        log::error!("application state missing while authenticating");
        AppError::Unauthenticated("Authentication unavailable".to_string())
    })?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?;

    let claims = jwt::access_token::verify(token, &state.jwt_secret)
        .map_err(|err| {
            log::error!("{:?}", err);
            AppError::Unauthenticated("Invalid authorization token".to_string())
        })?;

    let pass = match &requirement {
        AccessRequirement::AnyToken => true,
        AccessRequirement::Role(r) => &claims.role == r,
        AccessRequirement::AnyOf(roles) => roles.contains(&claims.role),
    };

    if !pass {
        return Err(AppError::PermissionDenied(
            "Not authorized to perform this action".to_string(),
        ));
    }

    Ok(RequireAccess {
        user_id: claims.sub,
        role: claims.role,
    })
}

impl FromRequest for RequireAccess {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let requirement = req
            .app_data::<web::Data<AccessRequirement>>()
            .map(|requirement| requirement.get_ref().clone())
            .unwrap_or(AccessRequirement::AnyToken);

        ready(require_access(req, requirement))
    }
}
