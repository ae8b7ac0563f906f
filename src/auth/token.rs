use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use secrecy::ExposeSecret;

use crate::{config::Auth, error::Error};

use super::error::AuthError;

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct Claim {
    pub user_id: i64,
    pub kind: TokenKind,
    aud: String,
    iss: String,
    exp: usize,
    iat: usize,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mint the session pair a successful magic-link exchange establishes.
pub fn issue_token_pair(user_id: i64, auth: &Auth) -> Result<TokenPair, Error> {
    let access_token = encode_token(
        user_id,
        TokenKind::Access,
        Duration::minutes(auth.access_ttl_minutes),
        auth,
    )?;
    let refresh_token = encode_token(
        user_id,
        TokenKind::Refresh,
        Duration::days(auth.refresh_ttl_days),
        auth,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn encode_token(
    user_id: i64,
    kind: TokenKind,
    ttl: Duration,
    auth: &Auth,
) -> Result<String, Error> {
    let now = Utc::now();
    let claim = Claim {
        user_id,
        kind,
        aud: auth.aud.expose_secret().to_string(),
        iss: auth.iss.expose_secret().to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(auth.secret.expose_secret().as_bytes()),
    )
    .map_err(|e| Error::Auth(AuthError::JwtError(e)))
}

pub fn decode_access_token(token: &str, auth: &Auth) -> Result<TokenData<Claim>, Error> {
    decode_token(token, TokenKind::Access, auth)
}

pub fn decode_refresh_token(token: &str, auth: &Auth) -> Result<TokenData<Claim>, Error> {
    decode_token(token, TokenKind::Refresh, auth)
}

fn decode_token(token: &str, kind: TokenKind, auth: &Auth) -> Result<TokenData<Claim>, Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[auth.iss.expose_secret()]);
    validation.set_audience(&[auth.aud.expose_secret()]);

    let data = decode::<Claim>(
        token,
        &DecodingKey::from_secret(auth.secret.expose_secret().as_ref()),
        &validation,
    )
    .map_err(|e| Error::Auth(AuthError::JwtError(e)))?;

    if data.claims.kind != kind {
        return Err(Error::Auth(AuthError::WrongTokenKind));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use crate::config::Auth;

    use super::{decode_access_token, decode_refresh_token, issue_token_pair};

    fn auth_config(secret: &str) -> Auth {
        Auth {
            secret: secret.into(),
            iss: "kiroku".into(),
            aud: "kiroku".into(),
            access_ttl_minutes: 30,
            refresh_ttl_days: 30,
            login_code_ttl_minutes: 15,
        }
    }

    #[tokio::test]
    async fn pair_round_trips() {
        let auth = auth_config("this is secret");

        let pair = issue_token_pair(7, &auth).unwrap();

        let access = decode_access_token(&pair.access_token, &auth).unwrap();
        assert_eq!(access.claims.user_id, 7);

        let refresh = decode_refresh_token(&pair.refresh_token, &auth).unwrap();
        assert_eq!(refresh.claims.user_id, 7);
    }

    #[tokio::test]
    async fn refresh_token_is_not_an_access_token() {
        let auth = auth_config("this is secret");

        let pair = issue_token_pair(7, &auth).unwrap();

        assert!(decode_access_token(&pair.refresh_token, &auth).is_err());
        assert!(decode_refresh_token(&pair.access_token, &auth).is_err());
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let pair = issue_token_pair(7, &auth_config("secret one")).unwrap();

        assert!(decode_access_token(&pair.access_token, &auth_config("secret two")).is_err());
    }
}
