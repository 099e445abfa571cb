//! Request validation helpers.
//!
//! Request structs are deserialized with serde and then checked by the
//! functions here. Every violation surfaces as `AppError::InvalidRequest`
//! carrying the first rule that failed.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};

use crate::error::AppError;

/// JSON body extractor that reports malformed bodies as 400 `invalid_request`.
///
/// Axum's plain `Json` rejects deserialization failures with 422 and a plain
/// text body; this wrapper keeps every client error in the JSON error format.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Path extractor whose rejections (non-numeric or overflowing ids) use the
/// JSON error format.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Query string extractor whose rejections use the JSON error format.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Trim a required text field and enforce a maximum length.
pub fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidRequest(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::InvalidRequest(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field. Blank values become `None`.
pub fn optional_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Result<Option<String>, AppError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required_text(field, v, max_len).map(Some),
    }
}

/// Amounts are integers in minor currency units and must be positive.
pub fn positive_amount(amount: i64) -> Result<i64, AppError> {
    if amount <= 0 {
        return Err(AppError::InvalidRequest(
            "Amount must be a positive integer".to_string(),
        ));
    }
    Ok(amount)
}

/// Parse an amount supplied as text (query strings).
pub fn parse_amount(raw: Option<&str>) -> Result<i64, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("Amount is required".to_string()))?;

    let amount = raw.parse::<i64>().map_err(|_| {
        AppError::InvalidRequest("Amount must be a positive integer".to_string())
    })?;

    positive_amount(amount)
}

/// Currency codes are three ASCII letters, stored upper case. Defaults to USD.
pub fn currency_code(raw: Option<&str>) -> Result<String, AppError> {
    let code = match raw.map(str::trim) {
        None | Some("") => return Ok("USD".to_string()),
        Some(code) => code,
    };

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::InvalidRequest(
            "Currency must be a 3-letter code".to_string(),
        ));
    }

    Ok(code.to_ascii_uppercase())
}

/// Minimal shape check: one `@` with something on either side.
pub fn optional_email(raw: Option<String>) -> Result<Option<String>, AppError> {
    let Some(email) = optional_text("Customer email", raw, 254)? else {
        return Ok(None);
    };

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };

    if !valid {
        return Err(AppError::InvalidRequest(
            "Customer email must be a valid email address".to_string(),
        ));
    }

    Ok(Some(email))
}

/// Website URLs must be absolute http(s) URLs.
pub fn optional_website(raw: Option<String>) -> Result<Option<String>, AppError> {
    let Some(website) = optional_text("Website URL", raw, 2048)? else {
        return Ok(None);
    };

    let parsed = url::Url::parse(&website)
        .map_err(|_| AppError::InvalidRequest("Website URL is not a valid URL".to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(Some(website)),
        _ => Err(AppError::InvalidRequest(
            "Website URL must use http or https".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("Name", "  Acme  ", 10).unwrap(), "Acme");
        assert!(matches!(
            required_text("Name", "   ", 10),
            Err(AppError::InvalidRequest(msg)) if msg == "Name is required"
        ));
        assert!(required_text("Name", "abcdefghijk", 10).is_err());
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(optional_text("Ref", Some("  ".into()), 10).unwrap(), None);
        assert_eq!(optional_text("Ref", None, 10).unwrap(), None);
    }

    #[test]
    fn amount_must_be_positive() {
        assert_eq!(parse_amount(Some("2500")).unwrap(), 2500);
        assert!(parse_amount(Some("0")).is_err());
        assert!(parse_amount(Some("-5")).is_err());
        assert!(parse_amount(Some("12.50")).is_err());
        assert!(parse_amount(Some("abc")).is_err());
        assert!(parse_amount(None).is_err());
    }

    #[test]
    fn currency_defaults_and_normalizes() {
        assert_eq!(currency_code(None).unwrap(), "USD");
        assert_eq!(currency_code(Some("btc")).unwrap(), "BTC");
        assert!(currency_code(Some("DOLLARS")).is_err());
        assert!(currency_code(Some("U5D")).is_err());
    }

    #[test]
    fn email_shape_is_checked() {
        assert_eq!(
            optional_email(Some("buyer@example.com".into())).unwrap(),
            Some("buyer@example.com".to_string())
        );
        assert!(optional_email(Some("buyer.example.com".into())).is_err());
        assert!(optional_email(Some("@example.com".into())).is_err());
        assert!(optional_email(Some("a@b@c".into())).is_err());
    }

    #[test]
    fn website_must_be_http() {
        assert!(optional_website(Some("https://shop.example.com".into())).is_ok());
        assert!(optional_website(Some("ftp://shop.example.com".into())).is_err());
        assert!(optional_website(Some("not a url".into())).is_err());
        assert_eq!(optional_website(Some("".into())).unwrap(), None);
    }
}
