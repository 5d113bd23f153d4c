//! Randomized operation sequences against the single-default-address rule.

use proptest::prelude::*;

use local_shop_core::{AddressId, UserId};
use local_shop_integration_tests::{TestContext, address_request};
use local_shop_storefront::models::UpdateAddressRequest;
use local_shop_storefront::services::users::LocalUserService;

const OWNERS: [UserId; 2] = [UserId::new(1), UserId::new(2)];

#[derive(Debug, Clone)]
enum Op {
    Create {
        owner: usize,
        is_default: Option<bool>,
    },
    Update {
        owner: usize,
        pick: usize,
        is_default: bool,
    },
    SetDefault {
        owner: usize,
        pick: usize,
    },
    Remove {
        owner: usize,
        pick: usize,
    },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..2usize, prop::option::of(any::<bool>()))
            .prop_map(|(owner, is_default)| Op::Create { owner, is_default }),
        (0..2usize, any::<usize>(), any::<bool>()).prop_map(|(owner, pick, is_default)| {
            Op::Update {
                owner,
                pick,
                is_default,
            }
        }),
        (0..2usize, any::<usize>()).prop_map(|(owner, pick)| Op::SetDefault { owner, pick }),
        (0..2usize, any::<usize>()).prop_map(|(owner, pick)| Op::Remove { owner, pick }),
    ]
}

fn owner_id(index: usize) -> UserId {
    OWNERS.get(index % OWNERS.len()).copied().unwrap_or(UserId::new(1))
}

fn default_ids(users: &LocalUserService, user_id: UserId) -> Vec<AddressId> {
    users
        .get_user_addresses(user_id)
        .expect("list addresses")
        .into_iter()
        .filter(|a| a.is_default)
        .map(|a| a.address_id)
        .collect()
}

/// An existing address of `user_id`, chosen by `pick`.
fn pick_address(users: &LocalUserService, user_id: UserId, pick: usize) -> Option<AddressId> {
    let owned = users.get_user_addresses(user_id).expect("list addresses");
    if owned.is_empty() {
        return None;
    }
    owned.get(pick % owned.len()).map(|a| a.address_id)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn default_address_stays_unique(ops in prop::collection::vec(arb_op(), 1..30)) {
        let ctx = TestContext::in_memory();
        let users = ctx.state.users();

        for op in ops {
            // The address an operation just made default, if any.
            let mut promoted: Option<(UserId, AddressId)> = None;

            match op {
                Op::Create { owner, is_default } => {
                    let user_id = owner_id(owner);
                    let was_empty = users.get_user_addresses(user_id).expect("list").is_empty();
                    let created = users
                        .create_address(user_id, &address_request("Home", is_default))
                        .expect("create address");
                    prop_assert_eq!(created.is_default, is_default.unwrap_or(was_empty));
                    if created.is_default {
                        promoted = Some((user_id, created.address_id));
                    }
                }
                Op::Update { owner, pick, is_default } => {
                    let user_id = owner_id(owner);
                    let Some(address_id) = pick_address(users, user_id, pick) else {
                        continue;
                    };
                    let changes = UpdateAddressRequest {
                        is_default: Some(is_default),
                        ..UpdateAddressRequest::default()
                    };
                    let updated = users
                        .update_address(address_id, user_id, &changes)
                        .expect("update address");
                    prop_assert_eq!(updated.is_default, is_default);
                    if is_default {
                        promoted = Some((user_id, address_id));
                    }
                }
                Op::SetDefault { owner, pick } => {
                    let user_id = owner_id(owner);
                    let Some(address_id) = pick_address(users, user_id, pick) else {
                        continue;
                    };
                    users
                        .set_default_address(address_id, user_id)
                        .expect("set default");
                    promoted = Some((user_id, address_id));
                }
                Op::Remove { owner, pick } => {
                    let user_id = owner_id(owner);
                    let Some(address_id) = pick_address(users, user_id, pick) else {
                        continue;
                    };
                    users.remove_address(address_id, user_id).expect("remove address");
                }
            }

            for user_id in OWNERS {
                prop_assert!(default_ids(users, user_id).len() <= 1);
            }
            if let Some((user_id, address_id)) = promoted {
                prop_assert_eq!(default_ids(users, user_id), vec![address_id]);
            }
        }
    }
}
