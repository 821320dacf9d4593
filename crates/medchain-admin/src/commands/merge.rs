// Merge signed replies into one transaction

use medchain_core::ClientTransaction;
use medchain_messages::{CommitTransactionRequest, SignReply};
use medchain_signature::{merge_signatures, verify_cosigned};
use std::path::PathBuf;

/// Fold the signed transactions of every reply into the first one and print
/// a commit request
pub fn run(replies: &[PathBuf], verify: bool) -> anyhow::Result<()> {
    let mut merged: Option<ClientTransaction> = None;

    for path in replies {
        let reply: SignReply = serde_json::from_slice(&std::fs::read(path)?)?;
        let transaction = ClientTransaction::from_base64(&reply.signed_transaction)?;
        match merged.as_mut() {
            None => merged = Some(transaction),
            Some(base) => {
                let copied = merge_signatures(base, &transaction)?;
                tracing::debug!(signer = %reply.signer_id, copied, "Merged reply");
            }
        }
    }

    let Some(transaction) = merged else {
        anyhow::bail!("no replies to merge");
    };
    if verify {
        verify_cosigned(&transaction)?;
    }

    let request = CommitTransactionRequest {
        transaction: transaction.to_base64()?,
    };
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}
