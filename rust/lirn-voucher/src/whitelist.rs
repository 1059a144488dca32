//! Whitelist grants.
//!
//! Grants predate vouchers and authorize an account with an opaque data
//! word, either for one sale period ([`WhitelistGrant`]) or for the contract
//! as a whole ([`AccountGrant`]). They are signed and recovered exactly like
//! vouchers but never expire on their own.

use crate::Claim;
use lirn_abi::{Address, SolValue, Uint256};
use serde::{Deserialize, Serialize};

/// `(contract, period, data, account)`, in signing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WhitelistGrant {
    /// The authorizing contract instance.
    pub contract: Address,
    /// The sale period the grant applies to.
    pub period: Uint256,
    /// Grant payload, typically a per-account allowance.
    pub data: Uint256,
    /// The whitelisted account.
    pub account: Address,
}

impl WhitelistGrant {
    /// Assemble a grant.
    #[must_use]
    pub fn new(
        contract: Address,
        period: impl Into<Uint256>,
        data: impl Into<Uint256>,
        account: Address,
    ) -> Self {
        Self {
            contract,
            period: period.into(),
            data: data.into(),
            account,
        }
    }
}

impl Claim for WhitelistGrant {
    fn abi_encode(&self) -> Vec<u8> {
        (self.contract.0, self.period.0, self.data.0, self.account.0).abi_encode_params()
    }
}

/// `(contract, data, account)`, in signing order.
///
/// The period-less form, for contracts that keep a single whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountGrant {
    /// The authorizing contract instance.
    pub contract: Address,
    /// Grant payload.
    pub data: Uint256,
    /// The whitelisted account.
    pub account: Address,
}

impl AccountGrant {
    /// Assemble a grant.
    #[must_use]
    pub fn new(contract: Address, data: impl Into<Uint256>, account: Address) -> Self {
        Self {
            contract,
            data: data.into(),
            account,
        }
    }
}

impl Claim for AccountGrant {
    fn abi_encode(&self) -> Vec<u8> {
        (self.contract.0, self.data.0, self.account.0).abi_encode_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Timestamp, Verification, verify_claim};
    use lirn_credentials::AuthoritySigner;
    use testresult::TestResult;

    fn grant() -> WhitelistGrant {
        WhitelistGrant::new(Address::new([0x0c; 20]), 1u64, 5u64, Address::new([0xa1; 20]))
    }

    fn account_grant() -> AccountGrant {
        AccountGrant::new(Address::new([0x0c; 20]), 5u64, Address::new([0xa1; 20]))
    }

    fn deployment() -> TestResult<(Address, Address)> {
        Ok((
            "0x0af27bf79F8e27c06F0570F60b34B6D4B0Fea19A".parse()?,
            "0x1273D47090B70356291a5A57aedcaB7479a9EEb8".parse()?,
        ))
    }

    #[test]
    fn it_encodes_as_four_static_words() {
        let encoded = grant().abi_encode();
        assert_eq!(encoded.len(), 4 * 32);
        assert_eq!(&encoded[12..32], &[0x0c; 20]);
        assert_eq!(encoded[63], 1);
        assert_eq!(encoded[95], 5);
        assert_eq!(&encoded[108..128], &[0xa1; 20]);
    }

    #[test]
    fn it_encodes_the_period_less_grant_as_three_static_words() {
        let encoded = account_grant().abi_encode();
        assert_eq!(encoded.len(), 3 * 32);
        assert_eq!(&encoded[12..32], &[0x0c; 20]);
        assert_eq!(encoded[63], 5);
        assert_eq!(&encoded[76..96], &[0xa1; 20]);
    }

    #[test]
    fn it_digests_both_grant_shapes_like_the_contract() -> TestResult {
        let (contract, account) = deployment()?;
        assert_eq!(
            WhitelistGrant::new(contract, 1u64, 5u64, account)
                .digest()
                .to_string(),
            "0xeeea0843ec070d42ad27476bf677d6a1c9b6c8c0f3567b9328909ff2cb024ceb"
        );
        assert_eq!(
            AccountGrant::new(contract, 5u64, account)
                .digest()
                .to_string(),
            "0x6e7f2405fd6a12fbf5f53cda9fd298cc4079663e6f056d598300fcda82f4b598"
        );
        Ok(())
    }

    #[test]
    fn it_signs_the_period_less_grant_like_a_wallet() -> TestResult {
        let (contract, account) = deployment()?;
        let authority = AuthoritySigner::from_hex(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )?;
        let signature = AccountGrant::new(contract, 5u64, account).sign(&authority)?;
        assert_eq!(
            signature.to_hex(),
            "0x4e42994372ad49eed04d5644044d35165f6f57f0c4e4a9f0407442e61caaab55\
             53df3a3dabd147ec381c76f2c42adebd7911cc46b9ae7a3017a6a1f64012d00c1b"
        );
        Ok(())
    }

    #[test]
    fn it_never_expires() -> TestResult {
        let authority = AuthoritySigner::import(&[4u8; 32])?;
        let signature = grant().sign(&authority)?;

        assert_eq!(
            verify_claim(
                &grant(),
                &signature,
                &authority.address(),
                Timestamp::from_unix(u64::MAX)
            )?,
            Verification::Valid
        );
        assert_eq!(account_grant().expiration(), None);
        Ok(())
    }

    #[test]
    fn it_binds_every_field() {
        let base = grant();
        let mut period = base;
        period.period = 2u64.into();
        let mut data = base;
        data.data = 6u64.into();
        let mut account = base;
        account.account = Address::new([0xa2; 20]);

        for changed in [period, data, account] {
            assert_ne!(changed.digest(), base.digest());
        }
    }

    #[test]
    fn it_does_not_accept_one_grant_shape_for_the_other() -> TestResult {
        let authority = AuthoritySigner::import(&[4u8; 32])?;
        let base = account_grant();
        let signature = base.sign(&authority)?;

        let periodic = WhitelistGrant::new(base.contract, 0u64, base.data, base.account);
        assert!(matches!(
            verify_claim(&periodic, &signature, &authority.address(), Timestamp::from_unix(0))?,
            Verification::InvalidSigner { .. }
        ));
        Ok(())
    }
}
