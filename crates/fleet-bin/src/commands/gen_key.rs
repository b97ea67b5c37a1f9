// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `gen-key` subcommand: generate a token sealing key.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::cli::{GenKeyArgs, KeyFormat};

/// Generates a fresh 32-byte key and prints it in the requested format.
pub fn gen_key(args: GenKeyArgs) {
    let encoded = fleet_api::auth::generate_key();

    match args.format {
        KeyFormat::Base64 => println!("{}", encoded),
        KeyFormat::Hex => {
            // generate_key emits base64; re-encode for hex output
            let bytes = URL_SAFE_NO_PAD
                .decode(&encoded)
                .expect("freshly generated key is valid base64");
            let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            println!("{}", hex);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_is_32_bytes() {
        let encoded = fleet_api::auth::generate_key();
        let bytes = URL_SAFE_NO_PAD.decode(&encoded).unwrap();
        assert_eq!(bytes.len(), 32);
    }
}
