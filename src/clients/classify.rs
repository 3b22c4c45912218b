//! Interpretation of raw transport outcomes.

use serde_json::Value;

use crate::clients::errors::{ApiResponseError, HttpError, RequestFailedError, ResponseParseError};
use crate::clients::http_request::HttpMethod;
use crate::clients::http_response::{ApiResponse, ApiResult, HttpResponse};
use crate::clients::request_config::RequestConfig;
use crate::clients::transport::TransportError;

/// Classifies the outcome of one exchange.
///
/// Rules, in order:
///
/// 1. A transport failure is [`HttpError::Network`].
/// 2. A status of 400 or above is [`HttpError::Api`] when the body carries a
///    non-empty `errors` list (on the object, or on the first element of an
///    array body), otherwise [`HttpError::RequestFailed`].
/// 3. A successful DELETE is [`ApiResult::NoContent`], whatever the body.
/// 4. A redirect status is [`ApiResult::Redirect`] when redirects were not
///    followed.
/// 5. Anything else must be JSON: [`ApiResult::Response`], or
///    [`HttpError::ResponseParse`].
///
/// # Errors
///
/// See the rules above.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use moysklad_api::clients::{classify, ApiResult, HttpMethod, HttpResponse, RequestConfig};
///
/// let response = HttpResponse::new(200, HashMap::new(), r#"{"meta":{"size":0},"rows":[]}"#.to_string());
/// let result = classify(HttpMethod::Get, &RequestConfig::default(), Ok(response)).unwrap();
///
/// assert!(matches!(result, ApiResult::Response(r) if r.row_count() == 0));
/// ```
pub fn classify(
    method: HttpMethod,
    options: &RequestConfig,
    outcome: Result<HttpResponse, TransportError>,
) -> Result<ApiResult, HttpError> {
    let response = outcome?;

    if !response.is_ok() {
        return Err(classify_failure(response));
    }

    if method == HttpMethod::Delete {
        return Ok(ApiResult::NoContent);
    }

    if !options.follow_redirects && response.is_redirect() {
        let location = response.location().unwrap_or_default().to_string();
        return Ok(ApiResult::Redirect(location));
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(data) => Ok(ApiResult::Response(ApiResponse::new(response, data))),
        Err(source) => Err(ResponseParseError { source, response }.into()),
    }
}

fn classify_failure(response: HttpResponse) -> HttpError {
    let errors = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| extract_errors(&body));

    match errors {
        Some(errors) => {
            let first = &errors[0];
            ApiResponseError {
                code: first.get("code").and_then(Value::as_i64),
                error: first
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                more_info: first
                    .get("moreInfo")
                    .and_then(Value::as_str)
                    .map(String::from),
                errors,
                response,
            }
            .into()
        }
        None => RequestFailedError {
            code: response.code,
            response,
        }
        .into(),
    }
}

/// Returns the non-empty `errors` list of an error body.
fn extract_errors(body: &Value) -> Option<Vec<Value>> {
    let holder = match body {
        Value::Array(items) => items.first()?,
        other => other,
    };
    holder
        .get("errors")
        .and_then(Value::as_array)
        .filter(|errors| !errors.is_empty())
        .cloned()
}
