use std::fmt;


/// Invalid calculator input. The messages are shown to the user verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CalcError {
    /// Weight or height was not submitted.
    #[error("Invalid input! Please enter your weight and height.")]
    MissingBmiInput,
    /// Weight or height is not a positive, finite number.
    #[error("Invalid input! Weight and height must be positive numbers.")]
    InvalidBmiInput,
    /// The year of birth is missing, not a plain number, or in the future.
    #[error("Invalid input! Please enter a valid year of birth.")]
    InvalidYear,
}


/// Weight class for a body mass index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum BmiCategory {
    /// Below 18.5.
    Underweight,
    /// From 18.5 up to 25.
    #[strum(serialize = "Normal weight")]
    Normal,
    /// From 25 up to 30.
    Overweight,
    /// 30 and above.
    Obesity,
}

impl BmiCategory {
    /// Classifies a body mass index.
    #[must_use]
    pub fn of(bmi: f64) -> Self {
        match bmi {
            b if b < 18.5 => Self::Underweight,
            b if b < 25.0 => Self::Normal,
            b if b < 30.0 => Self::Overweight,
            _ => Self::Obesity,
        }
    }
}


/// A body mass index rounded to two decimals, with its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bmi {
    /// kg/m², rounded to two decimals.
    pub value: f64,
    /// Weight class of `value`.
    pub category: BmiCategory,
}

impl fmt::Display for Bmi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Large values switch to exponent form, as in "1e+16"
        if self.value.abs() >= 1e16 {
            let sci = format!("{:e}", self.value);
            let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
            write!(f, "{mantissa}e+{exp} ({})", self.category)
        // Whole numbers keep one decimal, so 24 reads "24.0"
        } else if self.value.fract() == 0.0 {
            write!(f, "{:.1} ({})", self.value, self.category)
        } else {
            write!(f, "{} ({})", self.value, self.category)
        }
    }
}

fn positive(raw: &str) -> Result<f64, CalcError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(CalcError::InvalidBmiInput),
    }
}

/// Computes the BMI from a weight in kilograms and a height in centimetres,
/// both as submitted in a form.
///
/// # Errors
/// Returns [`CalcError::MissingBmiInput`] if either field is absent or empty
/// and [`CalcError::InvalidBmiInput`] unless both are positive numbers.
pub fn bmi(weight: Option<&str>, height: Option<&str>) -> Result<Bmi, CalcError> {
    let (Some(weight), Some(height)) = (weight, height) else {
        return Err(CalcError::MissingBmiInput);
    };
    if weight.is_empty() || height.is_empty() {
        return Err(CalcError::MissingBmiInput);
    }

    let weight = positive(weight)?;
    let meters = positive(height)? / 100.0;
    let raw = weight / (meters * meters);
    if !raw.is_finite() {
        return Err(CalcError::InvalidBmiInput);
    }
    // Past 1e15 there are no decimals left to round
    let value = if raw < 1e15 { (raw * 100.0).round() / 100.0 } else { raw };
    Ok(Bmi { value, category: BmiCategory::of(value) })
}


/// Computes an age from a year of birth as submitted in a form.
///
/// # Errors
/// Returns [`CalcError::InvalidYear`] unless `year_of_birth` consists of
/// ASCII digits only and is not after `reference_year`.
pub fn age(year_of_birth: Option<&str>, reference_year: i32) -> Result<u32, CalcError> {
    let year = year_of_birth.unwrap_or_default();
    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CalcError::InvalidYear);
    }
    let year: i64 = year.parse().map_err(|_| CalcError::InvalidYear)?;
    u32::try_from(i64::from(reference_year) - year).map_err(|_| CalcError::InvalidYear)
}
