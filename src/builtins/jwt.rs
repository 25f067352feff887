use serde::{Deserialize, Serialize};
use crate::model::account::AccountRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: AccountRole,
    pub exp: usize,
}

pub mod access_token {
    use chrono::Utc;
    use jsonwebtoken::{
        decode, encode, errors::Result, Algorithm, DecodingKey, EncodingKey, Header, Validation,
    };
    use super::Claims;
    use crate::model::account::AccountRole;

    pub const DEFAULT_MINUTES: i64 = 60;

    pub fn generate(user_id: &str, role: AccountRole, secret: &str, minutes: i64) -> Result<String> {
        let exp = Utc::now().timestamp() + minutes * 60;
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: exp.max(0) as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn verify(token: &str, secret: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::access_token;
    use crate::model::account::AccountRole;

    #[test]
    fn round_trip_keeps_subject_and_role() {
        let token = access_token::generate("u1", AccountRole::Administrator, "secret", 5).unwrap();
        let claims = access_token::verify(&token, "secret").unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, AccountRole::Administrator);
    }

    #[test]
    fn wrong_secret_and_expired_tokens_fail() {
        let token = access_token::generate("u1", AccountRole::User, "secret", 5).unwrap();
        assert!(access_token::verify(&token, "other").is_err());

        let expired = access_token::generate("u1", AccountRole::User, "secret", -10).unwrap();
        assert!(access_token::verify(&expired, "secret").is_err());
    }
}
