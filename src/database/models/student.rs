use serde::{Deserialize, Serialize};
use serde_json::Number;
use sqlx::types::BigDecimal;
use sqlx::FromRow;
use std::str::FromStr;

use crate::database::manager::DatabaseError;

/// A student record as exchanged over HTTP. Optional fields serialize as `null`.
///
/// `ph_no` keeps whatever JSON number the client sent; it is stored as
/// `NUMERIC` so integers of any width and fractions survive unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub date_of_birth: String,
    pub guardian_name: String,
    pub ph_no: Number,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// A row of the `students` table
#[derive(Debug, FromRow)]
pub(crate) struct StudentRow {
    student_id: String,
    name: String,
    date_of_birth: String,
    guardian_name: String,
    ph_no: BigDecimal,
    email: Option<String>,
    address: Option<String>,
}

impl TryFrom<StudentRow> for Student {
    type Error = DatabaseError;

    fn try_from(row: StudentRow) -> Result<Self, Self::Error> {
        Ok(Student {
            student_id: row.student_id,
            name: row.name,
            date_of_birth: row.date_of_birth,
            guardian_name: row.guardian_name,
            ph_no: decimal_to_number(&row.ph_no)?,
            email: row.email,
            address: row.address,
        })
    }
}

pub(crate) fn number_to_decimal(number: &Number) -> Result<BigDecimal, DatabaseError> {
    BigDecimal::from_str(&number.to_string())
        .map_err(|e| DatabaseError::InvalidValue(format!("ph_no {}: {}", number, e)))
}

fn decimal_to_number(decimal: &BigDecimal) -> Result<Number, DatabaseError> {
    let text = decimal.to_string();
    serde_json::from_str::<Number>(&text)
        .map_err(|e| DatabaseError::InvalidValue(format!("ph_no {}: {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> Number {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn phone_numbers_survive_decimal_conversion() {
        for text in ["9876543210", "18446744073709551615", "12.5", "-7"] {
            let decimal = number_to_decimal(&number(text)).unwrap();
            assert_eq!(decimal_to_number(&decimal).unwrap(), number(text));
        }
    }
}
