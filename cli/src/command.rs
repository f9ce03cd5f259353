//! Command line interface for the VeChainThor SDK demo binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use vet_sdk::address::Address;
use vet_sdk::clause::vet_transfer;
use vet_sdk::config::{NetworkConfig, PipelineOptions};
use vet_sdk::pipeline::{LoggingObserver, TransactionBuilder};
use vet_sdk::secp256k1::PrivateKey;
use vet_sdk::thor::ThorClient;
use vet_sdk::{bip32, bip39, hex};

#[derive(Parser)]
#[clap(version = "0.1", author = "vet-sdk")]
pub struct Opts {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a new BIP-39 mnemonic and derive its first VeChain account.
    GenerateWallet,
    /// Derive an account from an existing mnemonic at `m/44'/818'/0'/0/{index}`.
    DeriveWallet {
        mnemonic: String,
        #[clap(long, default_value = "0")]
        index: u32,
        #[clap(long, default_value = "")]
        passphrase: String,
    },
    /// Print the checksummed address for a raw private key.
    AddressFromKey { private_key: String },
    /// Sign and broadcast a VET transfer, then wait for its receipt.
    Transfer {
        private_key: String,
        to: String,
        amount_wei: u128,
        #[clap(long, default_value = "https://testnet.vechain.org")]
        node_url: String,
        #[clap(long, default_value = "0x27")]
        chain_tag: String,
    },
}

pub async fn run(opts: Opts) -> Result<()> {
    match opts.command {
        Command::GenerateWallet => generate_wallet(),
        Command::DeriveWallet {
            mnemonic,
            index,
            passphrase,
        } => derive_wallet(&mnemonic, index, &passphrase),
        Command::AddressFromKey { private_key } => address_from_key(&private_key),
        Command::Transfer {
            private_key,
            to,
            amount_wei,
            node_url,
            chain_tag,
        } => transfer(&private_key, &to, amount_wei, &node_url, &chain_tag).await,
    }
}

fn generate_wallet() -> Result<()> {
    let mut entropy = [0u8; 16];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut entropy);
    let mnemonic = bip39::entropy_to_mnemonic(&entropy)?;
    print_account_for_mnemonic(&mnemonic, 0, "")?;
    println!("mnemonic: {mnemonic}");
    Ok(())
}

fn derive_wallet(mnemonic: &str, index: u32, passphrase: &str) -> Result<()> {
    print_account_for_mnemonic(mnemonic, index, passphrase)
}

fn print_account_for_mnemonic(mnemonic: &str, index: u32, passphrase: &str) -> Result<()> {
    let seed = bip39::mnemonic_to_seed(mnemonic, passphrase);
    let master = bip32::master_from_seed(&seed).context("deriving master key from seed")?;
    let account = bip32::derive_path(&master, &bip32::vechain_path(index))
        .context("deriving account key")?;
    let pubkey = vet_sdk::secp256k1::to_pubkey(&account.private_key)?;
    let address = Address::from_pubkey(&pubkey);
    println!("index: {index}");
    println!("private key: {}", hex::to_hex(&account.private_key.0));
    println!("address: {address}");
    Ok(())
}

fn address_from_key(private_key: &str) -> Result<()> {
    let key = parse_private_key(private_key)?;
    let pubkey = vet_sdk::secp256k1::to_pubkey(&key)?;
    println!("{}", Address::from_pubkey(&pubkey));
    Ok(())
}

async fn transfer(
    private_key: &str,
    to: &str,
    amount_wei: u128,
    node_url: &str,
    chain_tag: &str,
) -> Result<()> {
    let key = parse_private_key(private_key)?;
    let to_address: Address = to.parse().context("parsing recipient address")?;
    let chain_tag_bytes = hex::from_hex(chain_tag).context("parsing chain tag")?;
    let chain_tag = *chain_tag_bytes.first().context("chain tag must be one byte")?;

    let client = ThorClient::new(node_url);
    let network = NetworkConfig::custom(chain_tag, node_url);
    let clauses = vec![vet_transfer(to_address, amount_wei)];

    let outcome = TransactionBuilder::new(clauses, network, PipelineOptions::default())
        .origin(key)
        .run(&client, &LoggingObserver)
        .await
        .context("running the transaction pipeline")?;

    let receipt = outcome.receipt.context("pipeline ran without AwaitReceipt")?;
    println!("transaction id: {}", hex::to_hex(&outcome.tx_id));
    println!("gas used: {}", receipt.gas_used);
    println!("reverted: {}", receipt.reverted);
    Ok(())
}

fn parse_private_key(s: &str) -> Result<PrivateKey> {
    let bytes = hex::from_hex(s).context("parsing private key hex")?;
    if bytes.len() != 32 {
        anyhow::bail!("private key must be 32 bytes, got {}", bytes.len());
    }
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&bytes);
    PrivateKey::from_bytes(buf).map_err(|e| anyhow::anyhow!(e.to_string()))
}
