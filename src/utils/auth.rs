use crate::error::{AppError, AppResult};
use crate::models::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

pub fn create_jwt(user_id: i64, secret: &str, expires_in: &str) -> AppResult<String> {
    let expiration = parse_duration(expires_in)?;
    let now = Utc::now();
    let exp = now
        .checked_add_signed(expiration)
        .ok_or_else(|| AppError::Internal("Invalid expiration time".to_string()))?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        exp: Some(exp),
        iat: Some(now.timestamp()),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn verify_jwt(token: &str, secret: &str) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub fn parse_duration(duration_str: &str) -> AppResult<Duration> {
    let duration_str = duration_str.trim();

    let parse = |value: &str| -> AppResult<i64> {
        value
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid duration format".to_string()))
    };

    let duration = if let Some(hours) = duration_str.strip_suffix('h') {
        Duration::try_hours(parse(hours)?)
    } else if let Some(days) = duration_str.strip_suffix('d') {
        Duration::try_days(parse(days)?)
    } else if let Some(minutes) = duration_str.strip_suffix('m') {
        Duration::try_minutes(parse(minutes)?)
    } else {
        // Default to hours
        Duration::try_hours(parse(duration_str)?)
    };

    duration.ok_or_else(|| AppError::BadRequest("Duration is out of range".to_string()))
}

/// Accepts `Bearer <jwt>` as well as the `Token <jwt>` scheme older clients send.
pub fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("Token "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
