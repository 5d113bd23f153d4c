//! Address operations of [`LocalUserService`].
//!
//! Every lookup is scoped to the owning user: an address that exists but
//! belongs to someone else is treated exactly like a missing one.

use tracing::{info, instrument};

use local_shop_core::{AddressId, UserId};

use super::{LocalUserService, UserError, validation};
use crate::models::{Address, CreateAddressRequest, UpdateAddressRequest};

/// Clear the default flag on every address owned by `user_id`.
fn unset_defaults(records: &mut [Address], user_id: UserId) {
    records
        .iter_mut()
        .filter(|a| a.user_id == user_id)
        .for_each(|a| a.is_default = false);
}

fn owned_by(address_id: AddressId, user_id: UserId) -> impl Fn(&Address) -> bool {
    move |a| a.address_id == address_id && a.user_id == user_id
}

impl LocalUserService {
    /// Add an address for `user_id`.
    ///
    /// Without an explicit `is_default`, the user's first address becomes
    /// the default. A new default clears the flag on the user's other
    /// addresses.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Validation` if a field is too short or the type is unknown.
    #[instrument(skip(self, request))]
    pub fn create_address(
        &self,
        user_id: UserId,
        request: &CreateAddressRequest,
    ) -> Result<Address, UserError> {
        let fields = validation::validate_new_address(request)?;

        let table = self.addresses();
        let mut records = table.load()?;
        let is_first = !records.iter().any(|a| a.user_id == user_id);
        let is_default = request.is_default.unwrap_or(is_first);
        if is_default {
            unset_defaults(&mut records, user_id);
        }

        let address = Address {
            address_id: AddressId::new(table.next_id()?),
            user_id,
            title: fields.title,
            street: fields.street,
            city: fields.city,
            state: fields.state,
            zip_code: fields.zip_code,
            country: fields.country,
            address_type: fields.address_type,
            is_default,
        };
        records.push(address.clone());
        table.save(&records)?;

        info!(address_id = %address.address_id, is_default, "Address created");
        Ok(address)
    }

    /// All addresses owned by `user_id`, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Store` if the addresses table cannot be read.
    pub fn get_user_addresses(&self, user_id: UserId) -> Result<Vec<Address>, UserError> {
        let mut records = self.addresses().load()?;
        records.retain(|a| a.user_id == user_id);
        Ok(records)
    }

    /// One address, if it exists and belongs to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Store` if the addresses table cannot be read.
    pub fn get_address(
        &self,
        address_id: AddressId,
        user_id: UserId,
    ) -> Result<Option<Address>, UserError> {
        Ok(self
            .addresses()
            .load()?
            .into_iter()
            .find(owned_by(address_id, user_id)))
    }

    /// Apply a partial update to an address.
    ///
    /// `is_default: Some(true)` clears the flag on the owner's other
    /// addresses first.
    ///
    /// # Errors
    ///
    /// Returns `UserError::AddressNotFound` if no address matches the (id, owner) pair.
    /// Returns `UserError::Validation` if a supplied field is invalid.
    #[instrument(skip(self, changes))]
    pub fn update_address(
        &self,
        address_id: AddressId,
        user_id: UserId,
        changes: &UpdateAddressRequest,
    ) -> Result<Address, UserError> {
        let table = self.addresses();
        let mut records = table.load()?;
        if !records.iter().any(owned_by(address_id, user_id)) {
            return Err(UserError::AddressNotFound(address_id));
        }

        let fields = validation::validate_address_update(changes)?;
        if changes.is_default == Some(true) {
            unset_defaults(&mut records, user_id);
        }

        let matches = owned_by(address_id, user_id);
        let address = records
            .iter_mut()
            .find(|a| matches(a))
            .ok_or(UserError::AddressNotFound(address_id))?;
        fields.apply(address);
        if let Some(is_default) = changes.is_default {
            address.is_default = is_default;
        }
        let updated = address.clone();
        table.save(&records)?;

        info!(address_id = %address_id, "Address updated");
        Ok(updated)
    }

    /// Make one address the owner's only default.
    ///
    /// # Errors
    ///
    /// Returns `UserError::AddressNotFound` if no address matches the (id, owner) pair.
    #[instrument(skip(self))]
    pub fn set_default_address(
        &self,
        address_id: AddressId,
        user_id: UserId,
    ) -> Result<Address, UserError> {
        let table = self.addresses();
        let mut records = table.load()?;
        if !records.iter().any(owned_by(address_id, user_id)) {
            return Err(UserError::AddressNotFound(address_id));
        }

        unset_defaults(&mut records, user_id);
        let matches = owned_by(address_id, user_id);
        let address = records
            .iter_mut()
            .find(|a| matches(a))
            .ok_or(UserError::AddressNotFound(address_id))?;
        address.is_default = true;
        let updated = address.clone();
        table.save(&records)?;

        info!(address_id = %address_id, "Default address changed");
        Ok(updated)
    }

    /// Delete an address. Removing the default does not promote another one.
    ///
    /// # Errors
    ///
    /// Returns `UserError::AddressNotFound` if no address matches the (id, owner) pair.
    #[instrument(skip(self))]
    pub fn remove_address(&self, address_id: AddressId, user_id: UserId) -> Result<(), UserError> {
        let table = self.addresses();
        let mut records = table.load()?;
        let before = records.len();
        let matches = owned_by(address_id, user_id);
        records.retain(|a| !matches(a));
        if records.len() == before {
            return Err(UserError::AddressNotFound(address_id));
        }
        table.save(&records)?;

        info!(address_id = %address_id, "Address removed");
        Ok(())
    }
}
