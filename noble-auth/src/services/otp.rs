use rand::Rng;

use noble_shared::errors::{AppError, ErrorCode};

/// TTL for a pending verification code.
pub const CODE_TTL_SECS: u64 = 5 * 60;

pub fn code_key(phone: &str) -> String {
    format!("otp:{phone}")
}

pub fn rate_key(phone: &str) -> String {
    format!("otp:rate:{phone}")
}

pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

/// Minimal E.164 shape check: leading `+`, 8-15 digits.
pub fn validate_phone_number(phone: &str) -> Result<(), AppError> {
    let digits = match phone.strip_prefix('+') {
        Some(rest) => rest,
        None => {
            return Err(AppError::new(
                ErrorCode::InvalidPhoneNumber,
                "phone number must start with a country code (+...)",
            ));
        }
    };

    if digits.len() < 8 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::new(
            ErrorCode::InvalidPhoneNumber,
            "phone number must contain 8 to 15 digits",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn valid_phone_accepted() {
        assert!(validate_phone_number("+14155550123").is_ok());
        assert!(validate_phone_number("+3312345678").is_ok());
    }

    #[test]
    fn missing_plus_rejected() {
        assert!(validate_phone_number("14155550123").is_err());
    }

    #[test]
    fn bad_lengths_rejected() {
        assert!(validate_phone_number("+1234567").is_err());
        assert!(validate_phone_number("+1234567890123456").is_err());
    }

    #[test]
    fn non_digits_rejected() {
        assert!(validate_phone_number("+1415555abcd").is_err());
    }

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(code_key("+1415"), "otp:+1415");
        assert_eq!(rate_key("+1415"), "otp:rate:+1415");
    }
}
