//! Property tests for voucher digests and verification.

use lirn_abi::{Address, Uint256};
use lirn_credentials::AuthoritySigner;
use lirn_voucher::{Claim, Timestamp, Verification, Voucher, verify};
use proptest::prelude::*;

fn arb_address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::new)
}

fn arb_uint() -> impl Strategy<Value = Uint256> {
    any::<[u8; 32]>().prop_map(Uint256::from_be_bytes)
}

prop_compose! {
    fn arb_voucher()(
        contract in arb_address(),
        subject_id in arb_uint(),
        resource_uri in ".{0,48}",
        expiration in arb_uint(),
        price in arb_uint(),
        recipient in arb_address(),
    ) -> Voucher {
        Voucher { contract, subject_id, resource_uri, expiration, price, recipient }
    }
}

/// Change exactly one of the six fields.
fn perturb(voucher: &Voucher, field: usize) -> Voucher {
    let mut changed = voucher.clone();
    let flip = |address: Address| {
        let mut bytes = *address.bytes();
        bytes[19] ^= 1;
        Address::new(bytes)
    };
    let bump = |value: Uint256| {
        let mut bytes = value.to_be_bytes();
        bytes[31] ^= 1;
        Uint256::from_be_bytes(bytes)
    };
    match field {
        0 => changed.contract = flip(changed.contract),
        1 => changed.subject_id = bump(changed.subject_id),
        2 => changed.resource_uri.push('x'),
        3 => changed.expiration = bump(changed.expiration),
        4 => changed.price = bump(changed.price),
        _ => changed.recipient = flip(changed.recipient),
    }
    changed
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn digests_are_deterministic(voucher in arb_voucher()) {
        prop_assert_eq!(voucher.digest(), voucher.clone().digest());
    }

    #[test]
    fn every_field_is_bound(voucher in arb_voucher(), field in 0usize..6) {
        prop_assert_ne!(perturb(&voucher, field).digest(), voucher.digest());
    }

    #[test]
    fn a_signature_does_not_transfer_to_a_changed_voucher(
        voucher in arb_voucher(),
        field in 0usize..6,
    ) {
        let authority = AuthoritySigner::import(&[13u8; 32]).expect("valid key");
        let signature = voucher.sign(&authority).expect("signing succeeds");
        let verification = verify(
            &perturb(&voucher, field),
            &signature,
            &authority.address(),
            Timestamp::from_unix(0),
        );
        prop_assert!(
            matches!(verification, Ok(Verification::InvalidSigner { .. })),
            "unexpected {:?}",
            verification
        );
    }

    #[test]
    fn expiration_is_a_strict_upper_bound(voucher in arb_voucher(), expiration in 1u64..) {
        let voucher = Voucher { expiration: expiration.into(), ..voucher };
        let authority = AuthoritySigner::import(&[17u8; 32]).expect("valid key");
        let signature = voucher.sign(&authority).expect("signing succeeds");
        let check = |now: u64| {
            verify(&voucher, &signature, &authority.address(), Timestamp::from_unix(now))
        };

        prop_assert_eq!(check(expiration - 1), Ok(Verification::Valid));
        prop_assert_eq!(check(expiration), Ok(Verification::Expired));
    }
}
