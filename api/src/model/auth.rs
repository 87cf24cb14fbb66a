use crate::model::user::UserResponse;
use garde::Validate;
use kernel::model::{id::UserId, user::event::CreateUser};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[garde(email)]
    pub email: String,
    #[garde(pattern(r"^[0-9]{10}$"))]
    pub phone: String,
    #[garde(custom(validate_national_id))]
    pub national_id: String,
    #[garde(length(min = 1, max = 100))]
    pub first_name: String,
    #[garde(length(min = 1, max = 100))]
    pub last_name: String,
    #[garde(length(min = 6))]
    pub password: String,
}

impl From<RegisterRequest> for CreateUser {
    fn from(value: RegisterRequest) -> Self {
        let RegisterRequest {
            email,
            phone,
            national_id,
            first_name,
            last_name,
            password,
        } = value;
        CreateUser {
            email,
            phone,
            national_id,
            first_name,
            last_name,
            password,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub user_id: UserId,
    pub access_token: String,
}

/// Thai citizen ids are 13 digits; the last one is a mod-11 check digit
/// over the first twelve.
fn validate_national_id(value: &str, _context: &()) -> garde::Result {
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 13 || value.len() != 13 {
        return Err(garde::Error::new("National ID must be 13 digits"));
    }
    let sum: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| d * (13 - i as u32))
        .sum();
    let check = (11 - (sum % 11)) % 10;
    if check != digits[12] {
        return Err(garde::Error::new("National ID check digit is invalid"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_check_digit(prefix: &str) -> String {
        let digits: Vec<u32> = prefix.chars().filter_map(|c| c.to_digit(10)).collect();
        let sum: u32 = digits
            .iter()
            .enumerate()
            .map(|(i, d)| d * (13 - i as u32))
            .sum();
        format!("{prefix}{}", (11 - (sum % 11)) % 10)
    }

    #[test]
    fn accepts_a_well_formed_national_id() {
        let id = with_check_digit("110170023070");
        assert!(validate_national_id(&id, &()).is_ok());
    }

    #[test]
    fn rejects_a_mutated_check_digit() {
        let id = with_check_digit("110170023070");
        let last = id.chars().last().unwrap().to_digit(10).unwrap();
        let broken = format!("{}{}", &id[..12], (last + 1) % 10);
        assert!(validate_national_id(&broken, &()).is_err());
    }

    #[test]
    fn rejects_wrong_lengths_and_non_digits() {
        assert!(validate_national_id("12345", &()).is_err());
        assert!(validate_national_id("12345678901234", &()).is_err());
        assert!(validate_national_id("1-101-70023-07", &()).is_err());
    }
}
