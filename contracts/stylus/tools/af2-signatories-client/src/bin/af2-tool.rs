use alloy_primitives::{Address, FixedBytes};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use af2_signatories_client::{
    types::{derive_id, personal_message_hash, signed_message, SignerRecovery},
    K256Recovery, PartySigner,
};

/// Off-chain helpers for AF2 signatory agreements.
///
/// Produces the same ids and signatures the contract checks: ids are
/// `keccak256(addrA || addrB || contract || hashC)` and both parties sign
/// `keccak256(id || hashC)` as a personal message.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive the agreement id for a party pair and payload.
    DeriveId {
        #[arg(long)]
        addr_a: Address,

        #[arg(long)]
        addr_b: Address,

        /// Deployed contract address (`getAddrSC`).
        #[arg(long, env = "AF2_SERVICE")]
        service: Address,

        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Sign an agreement id as one of its parties.
    Sign {
        /// Signing key (hex string, 0x...).
        #[arg(long, env = "PKEY", hide_env_values = true)]
        private_key: String,

        #[arg(long)]
        id: FixedBytes<32>,

        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Recover the party that produced a signature over an agreement id.
    Recover {
        #[arg(long)]
        id: FixedBytes<32>,

        #[command(flatten)]
        payload: PayloadArgs,

        /// 65-byte signature (hex string, 0x...).
        #[arg(long)]
        signature: String,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct PayloadArgs {
    /// Payload hash (bytes32).
    #[arg(long)]
    payload_hash: Option<FixedBytes<32>>,

    /// Payload text, hashed the way `ethers.hashMessage` does.
    #[arg(long)]
    payload_text: Option<String>,
}

impl PayloadArgs {
    fn resolve(&self) -> Result<FixedBytes<32>> {
        match (&self.payload_hash, &self.payload_text) {
            (Some(hash), None) => Ok(*hash),
            (None, Some(text)) => Ok(personal_message_hash(text.as_bytes())),
            _ => Err(anyhow!("provide exactly one of --payload-hash or --payload-text")),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DerivedId {
    id: FixedBytes<32>,
    hash_c: FixedBytes<32>,
    signed_message: FixedBytes<32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignedAgreement {
    signer: Address,
    id: FixedBytes<32>,
    hash_c: FixedBytes<32>,
    signature: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecoveredSigner {
    id: FixedBytes<32>,
    hash_c: FixedBytes<32>,
    signer: Option<Address>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let output = match cli.command {
        Command::DeriveId {
            addr_a,
            addr_b,
            service,
            payload,
        } => {
            let hash_c = payload.resolve()?;
            let id = derive_id(addr_a, addr_b, service, hash_c);
            debug!(%id, %addr_a, %addr_b, %service, "derived agreement id");
            serde_json::to_value(DerivedId {
                id,
                hash_c,
                signed_message: signed_message(id, hash_c),
            })?
        }
        Command::Sign {
            private_key,
            id,
            payload,
        } => {
            let hash_c = payload.resolve()?;
            let signer = load_signer(&private_key)?;
            let signature = signer
                .sign_agreement(id, hash_c)
                .map_err(|err| anyhow!("signing failed: {err}"))?;
            debug!(%id, signer = %signer.address(), "signed agreement");
            serde_json::to_value(SignedAgreement {
                signer: signer.address(),
                id,
                hash_c,
                signature: format!("0x{}", hex::encode(signature)),
            })?
        }
        Command::Recover {
            id,
            payload,
            signature,
        } => {
            let hash_c = payload.resolve()?;
            let signature = decode_hex(&signature).context("invalid --signature")?;
            let signer = K256Recovery.recover_signer(signed_message(id, hash_c), &signature);
            serde_json::to_value(RecoveredSigner { id, hash_c, signer })?
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed serialising output")?
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_signer(private_key: &str) -> Result<PartySigner> {
    let secret = decode_hex(private_key).context("invalid private key hex")?;
    PartySigner::from_slice(&secret).map_err(|err| anyhow!("invalid private key: {err}"))
}

fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    Ok(hex::decode(digits)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive_id_payload(args: &[&str]) -> PayloadArgs {
        let base = [
            "af2-tool",
            "derive-id",
            "--addr-a",
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "--addr-b",
            "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
            "--service",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
        ];
        let cli = Cli::try_parse_from(base.iter().chain(args)).unwrap();
        match cli.command {
            Command::DeriveId { payload, .. } => payload,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn payload_text_is_personal_message_hash() {
        let payload = derive_id_payload(&["--payload-text", "valid hashC"]);
        assert_eq!(
            payload.resolve().unwrap(),
            personal_message_hash(b"valid hashC")
        );
    }

    #[test]
    fn payload_hash_is_taken_verbatim() {
        let hash = personal_message_hash(b"valid hashC");
        let payload = derive_id_payload(&["--payload-hash", &hash.to_string()]);
        assert_eq!(payload.resolve().unwrap(), hash);
    }

    #[test]
    fn payload_sources_are_exclusive() {
        let result = Cli::try_parse_from([
            "af2-tool",
            "recover",
            "--id",
            "0x0000000000000000000000000000000000000000000000000000000000000001",
            "--signature",
            "0x00",
            "--payload-text",
            "a",
            "--payload-hash",
            "0x0000000000000000000000000000000000000000000000000000000000000002",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn decode_hex_accepts_prefix_and_whitespace() {
        assert_eq!(decode_hex("0xdeadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode_hex(" deadbeef\n").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(decode_hex("0xzz").is_err());
    }
}
