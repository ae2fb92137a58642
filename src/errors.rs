//! Every error in this crate is two-faced: an internal error carrying full upstream/request
//! detail that only ever reaches the log, and an external description safe to show API
//! clients. This stops upstream URLs, response bodies and other implementation details from
//! leaking into responses.

use actix_web::{
    http::{header, StatusCode},
    HttpResponse,
};
use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};
use tracing::error;

/// Wraps an internal error with a user-facing description. Displaying the error only shows
/// the external half; the internal half stays private.
#[derive(Debug)]
pub struct Error {
    /// The underlying error. May contain upstream detail, so it is logged but never served.
    pub internal: anyhow::Error,
    /// A client-friendly description with no sensitive information.
    pub external: External,
}

/// Return type of a function that could fail with a two-faced error.
pub type Fallible<T> = Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), fmt::Error> {
        write!(f, "{}", self.external)
    }
}

/// Used to build HTTP error responses with the given text and status code.
#[derive(Debug, Clone, Copy)]
pub struct External {
    pub kind: Kind,
    /// Text that describes the problem to the client.
    pub text: &'static str,
}

/// A client-facing classification of what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// An upstream call failed or returned something undecodable.
    UpstreamFailed,
    /// Upstream rejected our bearer token. The token is fetched once at startup and never
    /// refreshed, so this persists until restart.
    AuthExpired,
    /// The client sent something malformed.
    InvalidInput,
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        // Make fmt::Display the same as fmt::Debug, i.e. each variant's name.
        write!(f, "{:?}", self)
    }
}

impl From<Kind> for StatusCode {
    /// Kinds map to status codes here so that the aggregation layer never needs to know
    /// about HTTP codes directly.
    fn from(kind: Kind) -> StatusCode {
        match kind {
            Kind::UpstreamFailed => StatusCode::INTERNAL_SERVER_ERROR,
            Kind::AuthExpired => StatusCode::INTERNAL_SERVER_ERROR,
            Kind::InvalidInput => StatusCode::BAD_REQUEST,
        }
    }
}

impl Display for External {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}: {}", self.kind, self.text)
    }
}

impl External {
    pub fn upstream() -> Self {
        Self {
            kind: Kind::UpstreamFailed,
            text: "couldn't fetch data from the evaluation service",
        }
    }

    pub fn auth_expired() -> Self {
        Self {
            kind: Kind::AuthExpired,
            text: "upstream authorization expired, restart to re-authenticate",
        }
    }

    pub fn invalid(text: &'static str) -> Self {
        Self {
            kind: Kind::InvalidInput,
            text,
        }
    }
}

impl Default for External {
    // Default to a very vague server error.
    fn default() -> Self {
        Self {
            kind: Kind::UpstreamFailed,
            text: "internal server error",
        }
    }
}

pub trait Describe {
    /// Convert any error into a two-faced [`Error`] by describing it to clients.
    fn describe(self, external: External) -> Error;
}

impl<Internal: Into<anyhow::Error>> Describe for Internal {
    fn describe(self, external: External) -> Error {
        Error {
            internal: self.into(),
            external,
        }
    }
}

/// Any regular internal error can be turned into a two-faced [`Error`], using the default
/// external description. To give an internal error a custom external description, use
/// `internal.describe(external)`.
impl<Internal: Into<anyhow::Error>> From<Internal> for Error {
    fn from(internal: Internal) -> Error {
        internal.describe(Default::default())
    }
}

pub trait DescribeErr<T> {
    /// Convert a result's error into a two-faced [`Error`] by describing it to clients.
    fn describe_err(self, external: External) -> Result<T, Error>;
}

impl<T, E> DescribeErr<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn describe_err(self, external: External) -> Result<T, Error> {
        self.map_err(|e| e.describe(external))
    }
}

// If a handler returns one of these errors, the external portion is served and the
// internal portion is only logged.
impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.external.kind.into()
    }

    fn error_response(&self) -> HttpResponse {
        error!(kind = %self.external.kind, "{:#}", self.internal);
        let resp = serde_json::to_string(&ErrBody {
            error: self.to_string(),
        })
        .unwrap_or_else(|e| {
            error!("Serde error: {}", e.to_string());
            "{\"error\": \"UpstreamFailed: internal server error\"}".to_owned()
        });
        HttpResponse::build(self.external.kind.into())
            .header(header::CONTENT_TYPE, "application/json")
            .body(resp)
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{dev::Service, test, web, App, Error as ActixError};

    #[test]
    fn test_only_external_part_is_shown() {
        let err = anyhow::anyhow!("GET http://10.0.0.1/evaluation-service/users returned 503")
            .describe(External::upstream());
        assert_eq!(
            err.to_string(),
            "UpstreamFailed: couldn't fetch data from the evaluation service"
        );
    }

    #[test]
    fn test_bare_question_mark_uses_default_external() {
        fn parse(input: &str) -> Fallible<u64> {
            let n = input
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("parsing {:?}: {}", input, e))?;
            Ok(n)
        }
        assert_eq!(parse("7").unwrap(), 7);
        let err = parse("not-a-number").unwrap_err();
        assert_eq!(err.external.kind, Kind::UpstreamFailed);
        assert_eq!(err.to_string(), "UpstreamFailed: internal server error");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            StatusCode::from(Kind::InvalidInput),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StatusCode::from(Kind::UpstreamFailed),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            StatusCode::from(Kind::AuthExpired),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_rt::test]
    async fn test_upstream_detail_never_reaches_the_body() -> Result<(), ActixError> {
        async fn index() -> Fallible<web::Json<String>> {
            Err(anyhow::anyhow!("secret-upstream-hostname-do-not-leak")
                .describe(External::upstream()))
        }

        let mut app =
            test::init_service(App::new().service(web::resource("/").route(web::get().to(index))))
                .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = app.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let expected_body =
            "{\"error\":\"UpstreamFailed: couldn't fetch data from the evaluation service\"}";
        if let Some(actix_web::body::Body::Bytes(bytes)) = resp.response().body().as_ref() {
            let actual_body = String::from_utf8(bytes.to_vec()).unwrap();
            assert_eq!(actual_body, expected_body);
            assert!(!actual_body.contains("secret-upstream-hostname"));
        } else {
            panic!("wrong response type");
        }
        Ok(())
    }
}
