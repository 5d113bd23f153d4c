//! Field validation for user and address input.
//!
//! Validators return normalized values (trimmed strings, parsed enums) so
//! the service never stores raw form input.

use local_shop_core::{AddressType, Email, UserRole};

use super::UserError;
use crate::models::{
    Address, CreateAddressRequest, CreateUserRequest, UpdateAddressRequest, UpdateUserRequest,
};

/// Minimum length of a user's name (after trimming).
pub const MIN_NAME_LENGTH: usize = 3;
/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const MIN_TITLE_LENGTH: usize = 2;
const MIN_STREET_LENGTH: usize = 5;
const MIN_CITY_LENGTH: usize = 2;
const MIN_STATE_LENGTH: usize = 2;
const MIN_ZIP_LENGTH: usize = 3;
const MIN_COUNTRY_LENGTH: usize = 2;

// =============================================================================
// Users
// =============================================================================

/// A registration that passed validation.
pub(crate) struct NewUser {
    pub name: String,
    pub email: Email,
    pub role: UserRole,
}

pub(crate) fn validate_new_user(request: &CreateUserRequest) -> Result<NewUser, UserError> {
    let name = validate_name(&request.name)?;
    let email = validate_email(&request.email)?;
    validate_password(&request.password)?;
    let role = validate_role(request.role.as_deref())?;
    Ok(NewUser { name, email, role })
}

/// The validated subset of a profile update.
#[derive(Default)]
pub(crate) struct UserChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

pub(crate) fn validate_user_update(request: &UpdateUserRequest) -> Result<UserChanges, UserError> {
    let mut changes = UserChanges::default();
    if let Some(name) = &request.name {
        changes.name = Some(validate_name(name)?);
    }
    if let Some(email) = &request.email {
        changes.email = Some(validate_email(email)?);
    }
    if let Some(password) = &request.password {
        validate_password(password)?;
        changes.password = Some(password.clone());
    }
    if let Some(role) = &request.role {
        changes.role = Some(validate_role(Some(role))?);
    }
    Ok(changes)
}

fn validate_name(raw: &str) -> Result<String, UserError> {
    let name = raw.trim();
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(UserError::validation(
            "name",
            format!("must be at least {MIN_NAME_LENGTH} characters"),
        ));
    }
    Ok(name.to_owned())
}

fn validate_email(raw: &str) -> Result<Email, UserError> {
    Email::parse(raw).map_err(|e| UserError::validation("email", e.to_string()))
}

fn validate_password(raw: &str) -> Result<(), UserError> {
    if raw.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserError::validation(
            "password",
            format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    Ok(())
}

fn validate_role(raw: Option<&str>) -> Result<UserRole, UserError> {
    match raw {
        None => Ok(UserRole::Client),
        Some(role) => role
            .trim()
            .parse()
            .map_err(|_| UserError::validation("role", "must be either admin or client")),
    }
}

// =============================================================================
// Addresses
// =============================================================================

/// Address fields that passed validation.
pub(crate) struct NewAddress {
    pub title: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub address_type: AddressType,
}

pub(crate) fn validate_new_address(
    request: &CreateAddressRequest,
) -> Result<NewAddress, UserError> {
    Ok(NewAddress {
        title: min_length("title", &request.title, MIN_TITLE_LENGTH)?,
        street: min_length("street", &request.street, MIN_STREET_LENGTH)?,
        city: min_length("city", &request.city, MIN_CITY_LENGTH)?,
        state: min_length("state", &request.state, MIN_STATE_LENGTH)?,
        zip_code: min_length("zipCode", &request.zip_code, MIN_ZIP_LENGTH)?,
        country: min_length("country", &request.country, MIN_COUNTRY_LENGTH)?,
        address_type: validate_address_type(&request.address_type)?,
    })
}

/// The validated subset of an address update (the default flag is handled
/// by the service because it touches sibling records).
#[derive(Default)]
pub(crate) struct AddressChanges {
    title: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
    country: Option<String>,
    address_type: Option<AddressType>,
}

impl AddressChanges {
    pub(crate) fn apply(self, address: &mut Address) {
        if let Some(title) = self.title {
            address.title = title;
        }
        if let Some(street) = self.street {
            address.street = street;
        }
        if let Some(city) = self.city {
            address.city = city;
        }
        if let Some(state) = self.state {
            address.state = state;
        }
        if let Some(zip_code) = self.zip_code {
            address.zip_code = zip_code;
        }
        if let Some(country) = self.country {
            address.country = country;
        }
        if let Some(address_type) = self.address_type {
            address.address_type = address_type;
        }
    }
}

pub(crate) fn validate_address_update(
    request: &UpdateAddressRequest,
) -> Result<AddressChanges, UserError> {
    let optional = |field, value: &Option<String>, min| {
        value
            .as_deref()
            .map(|v| min_length(field, v, min))
            .transpose()
    };

    Ok(AddressChanges {
        title: optional("title", &request.title, MIN_TITLE_LENGTH)?,
        street: optional("street", &request.street, MIN_STREET_LENGTH)?,
        city: optional("city", &request.city, MIN_CITY_LENGTH)?,
        state: optional("state", &request.state, MIN_STATE_LENGTH)?,
        zip_code: optional("zipCode", &request.zip_code, MIN_ZIP_LENGTH)?,
        country: optional("country", &request.country, MIN_COUNTRY_LENGTH)?,
        address_type: request
            .address_type
            .as_deref()
            .map(validate_address_type)
            .transpose()?,
    })
}

fn min_length(field: &'static str, raw: &str, min: usize) -> Result<String, UserError> {
    let value = raw.trim();
    if value.chars().count() < min {
        return Err(UserError::validation(
            field,
            format!("must be at least {min} characters"),
        ));
    }
    Ok(value.to_owned())
}

fn validate_address_type(raw: &str) -> Result<AddressType, UserError> {
    raw.trim()
        .parse()
        .map_err(|_| UserError::validation("type", "must be shipping, billing or both"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address_request() -> CreateAddressRequest {
        CreateAddressRequest {
            title: " Home ".into(),
            street: "12 Elm Street".into(),
            city: "Austin".into(),
            state: "TX".into(),
            zip_code: "73301".into(),
            country: "US".into(),
            address_type: "shipping".into(),
            is_default: None,
        }
    }

    fn field_of(err: UserError) -> &'static str {
        match err {
            UserError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_new_user_normalizes() {
        let request = CreateUserRequest::new("  Jane Doe ", " Jane@Test.com", "secret1");
        let user = validate_new_user(&request).unwrap();
        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email.as_str(), "jane@test.com");
        assert_eq!(user.role, UserRole::Client);
    }

    #[test]
    fn test_new_user_rejections() {
        let short_name = CreateUserRequest::new(" Jo ", "jo@test.com", "secret1");
        assert_eq!(field_of(validate_new_user(&short_name).err().unwrap()), "name");

        let bad_email = CreateUserRequest::new("Jane", "jane..doe@test.com", "secret1");
        assert_eq!(field_of(validate_new_user(&bad_email).err().unwrap()), "email");

        let short_password = CreateUserRequest::new("Jane", "jane@test.com", "12345");
        assert_eq!(
            field_of(validate_new_user(&short_password).err().unwrap()),
            "password"
        );

        let bad_role = CreateUserRequest::new("Jane", "jane@test.com", "secret1").with_role("root");
        assert_eq!(field_of(validate_new_user(&bad_role).err().unwrap()), "role");
    }

    #[test]
    fn test_user_update_only_checks_present_fields() {
        let changes = validate_user_update(&UpdateUserRequest::default()).unwrap();
        assert!(changes.name.is_none() && changes.email.is_none());

        let request = UpdateUserRequest {
            password: Some("123".into()),
            ..UpdateUserRequest::default()
        };
        assert_eq!(field_of(validate_user_update(&request).err().unwrap()), "password");
    }

    #[test]
    fn test_new_address_trims() {
        let address = validate_new_address(&address_request()).unwrap();
        assert_eq!(address.title, "Home");
        assert_eq!(address.address_type, AddressType::Shipping);
    }

    #[test]
    fn test_new_address_minimum_lengths() {
        let mut request = address_request();
        request.street = "Elm ".into();
        assert_eq!(field_of(validate_new_address(&request).err().unwrap()), "street");

        let mut request = address_request();
        request.zip_code = "12".into();
        assert_eq!(field_of(validate_new_address(&request).err().unwrap()), "zipCode");

        let mut request = address_request();
        request.address_type = "home".into();
        assert_eq!(field_of(validate_new_address(&request).err().unwrap()), "type");
    }

    #[test]
    fn test_address_update_validates_present_fields() {
        let request = UpdateAddressRequest {
            city: Some("X".into()),
            ..UpdateAddressRequest::default()
        };
        assert_eq!(field_of(validate_address_update(&request).err().unwrap()), "city");
    }
}
