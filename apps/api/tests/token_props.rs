mod common;
mod support;

use std::time::SystemTime;

use ledger_api::{mint_access_token, verify_access_token, TokenError};
use proptest::prelude::*;
use support::test_state::test_security;
use uuid::Uuid;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_minted_token_verifies_to_same_account(bytes in any::<[u8; 16]>()) {
        let id = Uuid::from_bytes(bytes);
        let security = test_security();
        let token = mint_access_token(id, SystemTime::now(), &security).unwrap();

        let claims = verify_access_token(&token, &security).unwrap();
        prop_assert_eq!(claims.account_id, id);
        prop_assert!(claims.exp > claims.iat);
    }

    #[test]
    fn prop_altered_signature_is_rejected(bytes in any::<[u8; 16]>(), offset in 0usize..40) {
        let security = test_security();
        let token = mint_access_token(Uuid::from_bytes(bytes), SystemTime::now(), &security).unwrap();

        let sig_start = token.rfind('.').unwrap() + 1;
        // Last char of a base64url signature may carry padding bits only; stay before it
        let sig_len = token.len() - sig_start;
        let pos = sig_start + offset % (sig_len - 1);
        let mut chars: Vec<char> = token.chars().collect();
        chars[pos] = if chars[pos] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        prop_assert!(matches!(
            verify_access_token(&tampered, &security),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn prop_arbitrary_strings_never_verify(input in "\\PC{0,64}") {
        prop_assert!(verify_access_token(&input, &test_security()).is_err());
    }
}
