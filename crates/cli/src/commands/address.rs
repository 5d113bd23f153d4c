//! Address commands. Every operation is scoped to `--user`.

use local_shop_core::{AddressId, UserId};
use local_shop_storefront::ShopState;
use local_shop_storefront::models::{Address, CreateAddressRequest};

use super::CliError;

fn report(address: &Address) {
    tracing::info!(
        address_id = %address.address_id,
        title = %address.title,
        street = %address.street,
        city = %address.city,
        state = %address.state,
        zip_code = %address.zip_code,
        country = %address.country,
        kind = %address.address_type,
        default = address.is_default,
        "Address"
    );
}

/// Add an address for `user`.
pub fn add(
    state: &ShopState,
    user: UserId,
    request: &CreateAddressRequest,
) -> Result<(), CliError> {
    let address = state.users().create_address(user, request)?;
    report(&address);
    Ok(())
}

/// Log every address of `user`.
pub fn list(state: &ShopState, user: UserId) -> Result<(), CliError> {
    let addresses = state.users().get_user_addresses(user)?;
    tracing::info!(user_id = %user, count = addresses.len(), "Addresses");
    addresses.iter().for_each(report);
    Ok(())
}

/// Make an address the default of `user`.
pub fn set_default(state: &ShopState, user: UserId, id: AddressId) -> Result<(), CliError> {
    let address = state.users().set_default_address(id, user)?;
    report(&address);
    Ok(())
}

/// Remove an address of `user`.
pub fn remove(state: &ShopState, user: UserId, id: AddressId) -> Result<(), CliError> {
    state.users().remove_address(id, user)?;
    tracing::info!(address_id = %id, "Address removed");
    Ok(())
}
