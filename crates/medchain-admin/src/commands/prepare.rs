// Build a signing proposal for one query instruction

use medchain_admin::AdminConfig;
use medchain_core::{Arguments, InstanceId, Instruction, QUERY_CONTRACT_ID};
use medchain_ledger::Command;
use medchain_messages::SigningProposal;
use medchain_signature::{prepare_transaction, SignerIdentity, SignerRoster};
use std::collections::BTreeMap;

/// Print a proposal for `command` over `args`.
///
/// Arguments are `id` or `id=status`. A bare id takes the configured default
/// status for spawns and an empty value otherwise. Counters start from zero,
/// matching a signer set that has not submitted anything yet.
pub fn run(
    config: &AdminConfig,
    instance: &str,
    command: &str,
    args: &[String],
    signers: &[String],
    id: Option<String>,
) -> anyhow::Result<()> {
    let instance: InstanceId = instance.parse()?;
    let spawn = command == "spawn";
    let bare_value = if spawn {
        config.default_status.as_str()
    } else {
        ""
    };

    let pairs: Vec<(String, String)> = args
        .iter()
        .map(|arg| match arg.split_once('=') {
            Some((name, value)) => (name.to_string(), value.to_string()),
            None => (arg.clone(), bare_value.to_string()),
        })
        .collect();
    let proposal_id = id
        .or_else(|| pairs.first().map(|(name, _)| name.clone()))
        .unwrap_or_default();
    let arguments = Arguments::from_pairs(pairs);

    let instruction = if spawn {
        Instruction::spawn(instance, QUERY_CONTRACT_ID, arguments)
    } else {
        command.parse::<Command>()?;
        Instruction::invoke(instance, QUERY_CONTRACT_ID, command, arguments)
    };

    for identity in signers {
        identity.parse::<SignerIdentity>()?;
    }
    let roster = SignerRoster::from_identities(signers.iter().cloned());

    let prepared = prepare_transaction(vec![instruction], &roster, &BTreeMap::new())?;
    let proposal = SigningProposal::from_prepared(proposal_id, &prepared)?;
    tracing::info!(id = %proposal.id, signers = roster.len(), "Prepared proposal");
    println!("{}", serde_json::to_string_pretty(&proposal)?);
    Ok(())
}
