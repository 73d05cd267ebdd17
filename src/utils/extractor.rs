//! 路径参数提取器
//!
//! 解析失败时直接返回 400 和统一的 `ApiResponse`，处理函数里拿到的一定是合法的 ID。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let message = format!("Invalid path parameter '{name}': {raw}");
            let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
                ErrorCode::BadRequest,
                message.clone(),
            ));
            Err(InternalError::from_response(message, response).into())
        }
    }
}

macro_rules! define_safe_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param).map($name))
            }
        }
    };
}

define_safe_id_extractor!(SafeClassIdI64, "class_id");
define_safe_id_extractor!(SafeAssignmentIdI64, "assignment_id");
define_safe_id_extractor!(SafeQuestionIdI64, "question_id");
define_safe_id_extractor!(SafeStudentIdI64, "student_id");
define_safe_id_extractor!(SafeRevisionListIdI64, "revision_list_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id() {
        let req = TestRequest::default()
            .param("class_id", "42")
            .to_http_request();
        let id = SafeClassIdI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_invalid_id() {
        for raw in ["abc", "0", "-3"] {
            let req = TestRequest::default()
                .param("assignment_id", raw)
                .to_http_request();
            assert!(SafeAssignmentIdI64::extract(&req).await.is_err());
        }
    }
}
