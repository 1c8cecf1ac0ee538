use authcode_core::IncomingAuthRequest;
use axum::{
    body::Body,
    extract::{FromRequest, Request},
    response::Response,
    Error, RequestExt,
};
use http::{header, HeaderMap, Method, StatusCode};
use http_body_util::BodyExt;
use std::collections::HashMap;

/// Extracts the method and parameters of an inbound callback.
///
/// Parameters come from the query string. A `POST` carrying a form body
/// (`response_mode=form_post`) has its fields merged in as well; query
/// parameters win on conflict, and the first occurrence of a repeated key wins.
pub struct CallbackRequest(pub IncomingAuthRequest);

impl<S> FromRequest<S> for CallbackRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, _: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.with_limited_body().into_parts();

        let mut params = HashMap::new();
        if let Some(query) = parts.uri.query() {
            merge_params(&mut params, query.as_bytes());
        }

        if parts.method == Method::POST && form_content_type(&parts.headers) {
            let bytes = match body.collect().await {
                Ok(body) => body.to_bytes(),
                Err(err) => return Err(buffer_rejection(err)),
            };
            merge_params(&mut params, &bytes);
        }

        Ok(CallbackRequest(IncomingAuthRequest::new(parts.method, params)))
    }
}

fn merge_params(params: &mut HashMap<String, String>, raw: &[u8]) {
    for (key, value) in form_urlencoded::parse(raw).into_owned() {
        params.entry(key).or_insert(value);
    }
}

fn buffer_rejection(err: Error) -> Response {
    let box_error = match err.into_inner().downcast::<Error>() {
        Ok(err) => err.into_inner(),
        Err(err) => err,
    };
    let status = match box_error.downcast::<http_body_util::LengthLimitError>() {
        Ok(_) => StatusCode::PAYLOAD_TOO_LARGE,
        Err(_) => StatusCode::BAD_REQUEST,
    };
    Response::builder()
        .status(status)
        .body(Body::from("Failed to buffer the request body"))
        .unwrap_or_default()
}

fn form_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE) else {
        return false;
    };
    let Ok(content_type) = content_type.to_str() else {
        return false;
    };
    let Ok(mime) = content_type.parse::<mime::Mime>() else {
        return false;
    };
    mime.type_() == mime::APPLICATION && mime.subtype() == mime::WWW_FORM_URLENCODED
}
