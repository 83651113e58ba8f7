use crate::error::ApiError;
use crate::periods;

pub fn validate_day(day: &str) -> Result<(), ApiError> {
    if periods::is_school_day(day) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "day must be one of {}",
            periods::DAYS.join(", ")
        )))
    }
}

pub fn validate_period(period: u8) -> Result<(), ApiError> {
    if (1..=periods::PERIOD_COUNT).contains(&period) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "period must be between 1 and {}",
            periods::PERIOD_COUNT
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_period() {
        assert!(validate_period(1).is_ok());
        assert!(validate_period(10).is_ok());
        assert!(validate_period(0).is_err());
        assert!(validate_period(11).is_err());
    }

    #[test]
    fn test_validate_day() {
        assert!(validate_day("Senin").is_ok());
        assert!(validate_day("Sabtu").is_ok());
        assert!(validate_day("Minggu").is_err());
        assert!(validate_day("").is_err());
    }
}
