use crate::core::{AppError, AppState};
use crate::entities::{Dealer, DealerRole};
use axum::extract::State;
use axum::{Error, body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: Uuid,
    pub email: String,
}

#[instrument(skip(secret), fields(email = %email, id = %id))]
pub fn encode_jwt(email: String, id: Uuid, secret: &str) -> Result<String, Error> {
    debug!("Encoding JWT token for dealer");
    let now = Utc::now();
    let expire: chrono::TimeDelta = Duration::hours(24);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claim = Claims {
        iat,
        exp,
        email,
        id,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        Error::new("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    debug!("Decoding JWT token");
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        Error::new("Error in decoding jwt token")
    })
}

/// Middleware di autenticazione: estrae il bearer token, lo decodifica e
/// carica il dealer corrispondente nell'Extension della richiesta.
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let auth_header = match req.headers().get(http::header::AUTHORIZATION) {
        Some(header) => header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::forbidden("Empty header is not allowed")
        })?,
        None => {
            warn!("Missing authorization header");
            return Err(AppError::forbidden(
                "Please add the JWT token to the header",
            ));
        }
    };

    let mut header = auth_header.split_whitespace();
    let (_bearer, token) = (header.next(), header.next());
    let token = token.ok_or_else(|| {
        warn!("Malformed bearer token");
        AppError::forbidden("Malformed authorization header")
    })?;

    let token_data = match decode_jwt(token, &state.jwt_secret) {
        Ok(data) => data,
        Err(_) => {
            return Err(AppError::unauthorized("Unable to decode token"));
        }
    };

    // Fetch the dealer details from the database
    let current_dealer = match state.dealers.read(&token_data.claims.id).await? {
        Some(dealer) => {
            debug!("Dealer authenticated: {}", dealer.email);
            dealer
        }
        None => {
            warn!("Dealer not found for token id: {}", token_data.claims.id);
            return Err(AppError::unauthorized("You are not an authorized user"));
        }
    };

    if !current_dealer.is_active {
        warn!("Inactive dealer attempted access: {}", current_dealer.email);
        return Err(AppError::forbidden("This account has been deactivated"));
    }

    req.extensions_mut().insert(current_dealer);
    Ok(next.run(req).await)
}

/// Helper per verificare che il dealer corrente abbia uno dei ruoli richiesti
#[instrument(skip(dealer))]
pub fn require_role(dealer: &Dealer, allowed_roles: &[DealerRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&dealer.role) {
        warn!(
            "Dealer {} has insufficient role {:?}, required one of: {:?}",
            dealer.id, dealer.role, allowed_roles
        );
        return Err(AppError::forbidden("Insufficient role").with_details(format!(
            "This action requires one of the following roles: {:?}",
            allowed_roles
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_round_trip_preserves_the_claims() {
        let id = Uuid::from_u128(42);
        let token = encode_jwt("jan@bakker-automotive.nl".to_string(), id, "testsecret").unwrap();
        let data = decode_jwt(&token, "testsecret").unwrap();
        assert_eq!(data.claims.id, id);
        assert_eq!(data.claims.email, "jan@bakker-automotive.nl");
    }

    #[test]
    fn jwt_with_wrong_secret_is_rejected() {
        let token = encode_jwt("x@y.nl".to_string(), Uuid::from_u128(1), "secret-a").unwrap();
        assert!(decode_jwt(&token, "secret-b").is_err());
    }
}
