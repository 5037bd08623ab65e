use crate::error::ApiError;
use actix_web::HttpRequest;
use rsvp_scheduler_infra::RsvpContext;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

fn require_secret(req: &HttpRequest, header: &str, expected: &str) -> Result<(), ApiError> {
    let provided = match req.headers().get(header) {
        Some(value) => match value.to_str() {
            Ok(value) => value,
            Err(_) => {
                return Err(ApiError::Unauthorized(format!(
                    "Malformed secret provided in {} header",
                    header
                )))
            }
        },
        None => {
            return Err(ApiError::Unauthorized(format!(
                "Unable to find secret in {} header",
                header
            )))
        }
    };

    if provided != expected {
        return Err(ApiError::Unauthorized(format!(
            "Invalid secret provided in {} header",
            header
        )));
    }
    Ok(())
}

/// Event, guest and schedule management is reserved for holders of the api secret
pub fn protect_api_route(req: &HttpRequest, ctx: &RsvpContext) -> Result<(), ApiError> {
    require_secret(req, API_KEY_HEADER, &ctx.config.api_secret)
}

/// The dispatch job is triggered by an external scheduler sharing the cron secret
pub fn protect_cron_route(req: &HttpRequest, ctx: &RsvpContext) -> Result<(), ApiError> {
    require_secret(req, CRON_SECRET_HEADER, &ctx.config.cron_secret)
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::main]
    #[test]
    async fn accepts_matching_api_key() {
        let ctx = RsvpContext::create_inmemory();
        let req = TestRequest::default()
            .insert_header((API_KEY_HEADER, ctx.config.api_secret.clone()))
            .to_http_request();
        assert!(protect_api_route(&req, &ctx).is_ok());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_missing_or_wrong_secret() {
        let ctx = RsvpContext::create_inmemory();

        let req = TestRequest::default().to_http_request();
        assert!(protect_api_route(&req, &ctx).is_err());
        assert!(protect_cron_route(&req, &ctx).is_err());

        let req = TestRequest::default()
            .insert_header((CRON_SECRET_HEADER, "not-the-secret"))
            .to_http_request();
        assert!(protect_cron_route(&req, &ctx).is_err());

        // The api key does not open the cron route
        let req = TestRequest::default()
            .insert_header((CRON_SECRET_HEADER, ctx.config.api_secret.clone()))
            .to_http_request();
        assert!(protect_cron_route(&req, &ctx).is_err());
    }
}
