use crate::entities::UserRole;
use crate::error::{AppError, AppResult};
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// 已认证的请求方，由中间件写入请求扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

// 公开路径配置
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    // 仅 GET 公开
    read_only_exact: Vec<&'static str>,
    read_only_prefix: Vec<&'static str>,
    excluded_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec!["/swagger-ui", "/swagger-ui/", "/api-docs/openapi.json"],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/", "/api/v1/auth/"],
            read_only_exact: vec!["/api/v1/campaigns"],
            read_only_prefix: vec!["/api/v1/campaigns/"],
            // 即使在公开前缀下也需要认证
            excluded_paths: vec!["/api/v1/auth/logout"],
        }
    }

    fn is_public_path(&self, method: &Method, path: &str) -> bool {
        if self
            .excluded_paths
            .iter()
            .any(|&excluded| path.starts_with(excluded))
        {
            return false;
        }

        if self.exact_paths.contains(&path)
            || self
                .prefix_paths
                .iter()
                .any(|&prefix| path.starts_with(prefix))
        {
            return true;
        }

        if *method != Method::GET {
            return false;
        }
        if self.read_only_exact.contains(&path) {
            return true;
        }
        // 只放行 /api/v1/campaigns/{id}，子资源仍需认证
        self.read_only_prefix.iter().any(|&prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S> AuthMiddlewareService<S> {
    fn decode(&self, token: &str) -> AppResult<AuthUser> {
        let claims = self.jwt_service.verify_access_token(token)?;
        Ok(AuthUser {
            id: claims.user_id()?,
            role: claims.role,
        })
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let is_public = self.public_paths.is_public_path(req.method(), req.path());
        let decoded = bearer_token(&req).map(|token| self.decode(token));

        match (is_public, decoded) {
            // 公开路径上携带有效令牌时同样写入身份（管理员可读取草稿）
            (true, Some(Ok(user))) => {
                req.extensions_mut().insert(user);
                Box::pin(self.service.call(req))
            }
            (true, _) => Box::pin(self.service.call(req)),
            (false, Some(Ok(user))) => {
                req.extensions_mut().insert(user);
                Box::pin(self.service.call(req))
            }
            (false, Some(Err(e))) => {
                log::debug!("Rejected token on {}: {e}", req.path());
                let error = AppError::AuthError("Invalid access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
            (false, None) => {
                let error = AppError::AuthError("Missing access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

/// 获取当前用户，未认证时返回 401
pub fn current_user(req: &HttpRequest) -> AppResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Authentication required".to_string()))
}

/// 管理员接口使用，非管理员返回 403
pub fn require_admin(req: &HttpRequest) -> AppResult<AuthUser> {
    let user = current_user(req)?;
    if !user.is_admin() {
        return Err(AppError::PermissionDenied);
    }
    Ok(user)
}

/// 公开接口上的可选身份
pub fn optional_user(req: &HttpRequest) -> Option<AuthUser> {
    req.extensions().get::<AuthUser>().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        let paths = PublicPaths::new();
        assert!(paths.is_public_path(&Method::POST, "/api/v1/auth/login"));
        assert!(paths.is_public_path(&Method::POST, "/api/v1/auth/refresh"));
        assert!(!paths.is_public_path(&Method::POST, "/api/v1/auth/logout"));
        assert!(paths.is_public_path(&Method::GET, "/swagger-ui/index.html"));
    }

    #[test]
    fn test_campaign_reads_are_public_but_writes_are_not() {
        let paths = PublicPaths::new();
        assert!(paths.is_public_path(&Method::GET, "/api/v1/campaigns"));
        assert!(paths.is_public_path(&Method::GET, "/api/v1/campaigns/12"));
        assert!(!paths.is_public_path(&Method::POST, "/api/v1/campaigns/12/apply"));
        assert!(!paths.is_public_path(&Method::GET, "/api/v1/campaigns/12/applications"));
        assert!(!paths.is_public_path(&Method::GET, "/api/v1/points/balance"));
    }

    #[test]
    fn test_require_admin() {
        use actix_web::test::TestRequest;

        let req = TestRequest::default().to_http_request();
        assert!(matches!(current_user(&req), Err(AppError::AuthError(_))));

        req.extensions_mut().insert(AuthUser {
            id: 3,
            role: UserRole::Creator,
        });
        assert!(matches!(require_admin(&req), Err(AppError::PermissionDenied)));

        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthUser {
            id: 1,
            role: UserRole::Admin,
        });
        assert_eq!(require_admin(&req).unwrap().id, 1);
        assert!(optional_user(&req).is_some_and(|u| u.is_admin()));
    }
}
