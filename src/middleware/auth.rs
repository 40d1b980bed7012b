use crate::error::AppError;
use crate::models::User;
use crate::services::UserService;
use crate::utils::auth::{extract_token, verify_jwt};
use crate::AppState;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::Error as ActixError,
    http::header,
    web, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

/// The authenticated caller, placed in request extensions by [`AuthMiddleware`].
#[derive(Clone)]
pub struct AuthUser {
    pub user: User,
}

impl std::ops::Deref for AuthUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl actix_web::FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req.extensions().get::<AuthUser>().cloned().ok_or_else(|| {
            AppError::Unauthorized("Authentication credentials were not provided".to_string())
        });

        ready(result)
    }
}

/// An authenticated caller with the admin role.
#[derive(Clone)]
pub struct AdminUser {
    pub user: User,
}

impl std::ops::Deref for AdminUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl actix_web::FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<AuthUser>() {
            Some(auth) if auth.user.is_admin() => Ok(AdminUser {
                user: auth.user.clone(),
            }),
            Some(_) => Err(AppError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            )),
            None => Err(AppError::Unauthorized(
                "Authentication credentials were not provided".to_string(),
            )),
        };

        ready(result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    /// Anonymous requests pass; a token that is present must be valid.
    Optional,
    Required,
}

// Auth middleware factory
pub struct AuthMiddleware {
    policy: Policy,
}

impl AuthMiddleware {
    pub fn optional() -> Self {
        AuthMiddleware {
            policy: Policy::Optional,
        }
    }

    pub fn required() -> Self {
        AuthMiddleware {
            policy: Policy::Required,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            policy: self.policy,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    policy: Policy,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let policy = self.policy;

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("App state not found".to_string()))?;

            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(extract_token)
                .map(str::to_string);

            let token = match token {
                Some(token) => token,
                None if policy == Policy::Optional => return service.call(req).await,
                None => {
                    return Err(AppError::Unauthorized(
                        "Authentication credentials were not provided".to_string(),
                    )
                    .into())
                }
            };

            let claims = verify_jwt(&token, &state.config.secret_key).map_err(|e| {
                tracing::debug!("JWT verification failed: {:?}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            })?;

            let user = UserService::new(&state.db)
                .get_user_by_id(claims.sub)
                .await?
                .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

            req.extensions_mut().insert(AuthUser { user });

            let res = service.call(req).await?;
            Ok(res)
        })
    }
}
