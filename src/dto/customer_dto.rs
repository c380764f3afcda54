use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::{
    dto::api_response::Pagination,
    utils::validation::{validate_not_empty, validate_phone},
};

// Request para crear un cliente
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub first_name: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[validate(length(min = 4, max = 50))]
    pub driver_license_number: String,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

// Request para actualizar un cliente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(length(min = 4, max = 50))]
    pub driver_license_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

// Query de búsqueda de clientes
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerListQuery {
    /// Coincidencia parcial en nombre, apellido, email o permiso
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl CustomerListQuery {
    pub fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_validation() {
        let request = CreateCustomerRequest {
            first_name: "Lucía".to_string(),
            last_name: "Martín".to_string(),
            email: "not-an-email".to_string(),
            phone: "12".to_string(),
            driver_license_number: "B-99887766".to_string(),
            date_of_birth: None,
            address: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("phone"));
    }
}
