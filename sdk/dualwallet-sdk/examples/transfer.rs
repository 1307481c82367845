//! Send SOL from a local keypair through the transfer pipeline.
//!
//! ```text
//! DUALWALLET_CLUSTER=devnet cargo run --example transfer -- <KEYPAIR_JSON> <RECIPIENT> <AMOUNT>
//! ```

use dualwallet_sdk::{
    init_logging, ExternalConnection, KeypairSigner, MemoryStore, RpcConnection, SdkConfig,
    SessionReconciler, TransactionSigner, TransferOutcome, TransferPipeline, TransferRequest,
};
use solana_sdk::signature::read_keypair_file;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let (Some(keypair_path), Some(recipient), Some(amount)) = (args.next(), args.next(), args.next())
    else {
        eprintln!("usage: transfer <KEYPAIR_JSON> <RECIPIENT> <AMOUNT>");
        std::process::exit(2);
    };

    let config = SdkConfig::from_env()?;
    init_logging(&config);

    let keypair = read_keypair_file(&keypair_path).map_err(|e| e.to_string())?;
    let signer: Arc<dyn TransactionSigner> = Arc::new(KeypairSigner::new(keypair));

    let reconciler = SessionReconciler::new(
        &config,
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    );
    let session = reconciler.apply(
        &[ExternalConnection {
            name: "Keypair".to_string(),
            address: Some(signer.pubkey().to_string()),
            connected: true,
            connected_at: Some(chrono::Utc::now()),
            signer: Some(signer),
        }],
        &[],
    );

    let pipeline = TransferPipeline::new(Arc::new(RpcConnection::new(&config)), &config);
    let outcome = pipeline
        .submit(&session, TransferRequest::new(recipient, amount))
        .await;

    match &outcome {
        TransferOutcome::Confirmed { signature } => {
            println!("confirmed: {}", config.cluster.explorer_tx_url(signature));
        },
        TransferOutcome::Failed { stage, reason } => {
            println!("failed at {}: {}", stage, reason);
        },
        other => println!("unexpected outcome: {:?}", other),
    }

    reconciler.disconnect().await;
    Ok(())
}
