// Scripted query lifecycle against an in-memory ledger
//
// Two admins co-sign every step through the same sign handler the service
// uses: create q1, approve it, verify it, then remove it.

use anyhow::Context;
use medchain_admin::SigningService;
use medchain_core::{
    Arguments, ClientTransaction, DarcId, InstanceId, Instruction, StateChange, QUERY_CONTRACT_ID,
};
use medchain_ledger::{MemoryStateTrie, RecordStore};
use medchain_messages::{ActionInfo, SignRequest, SigningProposal};
use medchain_signature::{
    merge_signatures, prepare_transaction, verify_cosigned, Ed25519Signer, Signer, SignerRoster,
};
use tracing::info;

struct Demo {
    ledger: MemoryStateTrie,
    admins: Vec<Ed25519Signer>,
    roster: SignerRoster,
    service: SigningService,
}

/// Run the scenario and print the store after each step
pub fn run() -> anyhow::Result<()> {
    let admins = vec![
        Ed25519Signer::from_seed(&[1u8; 32]),
        Ed25519Signer::from_seed(&[2u8; 32]),
    ];
    let roster = SignerRoster::from_identities(admins.iter().map(|a| a.identity().to_string()));
    let parent = InstanceId::derive(b"medchain-demo", "darc");
    let mut ledger = MemoryStateTrie::new();
    ledger.insert_darc(parent, DarcId::new(b"demo-hospital".to_vec()));

    let mut demo = Demo {
        ledger,
        admins,
        roster,
        service: SigningService::new().with_digest_check(true),
    };

    let created = demo.submit(
        "create",
        Instruction::spawn(
            parent,
            QUERY_CONTRACT_ID,
            Arguments::from_pairs([("q1", "Requested")]),
        ),
    )?;
    let instance = created
        .first()
        .map(|change| change.instance_id)
        .context("spawn produced no state change")?;

    demo.submit(
        "approve",
        Instruction::invoke(
            instance,
            QUERY_CONTRACT_ID,
            "update",
            Arguments::from_pairs([("q1", "Approved")]),
        ),
    )?;
    demo.submit(
        "verify",
        Instruction::invoke(
            instance,
            QUERY_CONTRACT_ID,
            "verifystatus",
            Arguments::from_pairs([("q1", "")]),
        ),
    )?;
    demo.submit(
        "remove",
        Instruction::invoke(
            instance,
            QUERY_CONTRACT_ID,
            "update",
            Arguments::from_pairs([("q1", "")]),
        ),
    )?;
    Ok(())
}

impl Demo {
    fn submit(&mut self, step: &str, instruction: Instruction) -> anyhow::Result<Vec<StateChange>> {
        let prepared = prepare_transaction(vec![instruction], &self.roster, self.ledger.counters())?;
        let proposal = SigningProposal::from_prepared(step, &prepared)?;

        let mut merged: Option<ClientTransaction> = None;
        for admin in &self.admins {
            let request = SignRequest {
                public_key: admin.public_key_hex(),
                private_key: admin.private_key_hex().to_string(),
                action_info: Some(ActionInfo {
                    id: proposal.id.clone(),
                    action: Some(proposal.action()),
                    ..ActionInfo::default()
                }),
            };
            let reply = self.service.process_sign_request(&request)?;
            let signed = ClientTransaction::from_base64(&reply.signed_transaction)?;
            match merged.as_mut() {
                Some(base) => {
                    merge_signatures(base, &signed)?;
                }
                None => merged = Some(signed),
            }
        }
        let transaction = merged.context("no admins signed")?;
        verify_cosigned(&transaction)?;

        let changes = self.ledger.execute_transaction(&transaction)?;
        for change in &changes {
            let store = RecordStore::from_bytes(&change.value)?;
            info!(
                step,
                action = %change.action,
                instance = %change.instance_id,
                darc = %change.darc_id,
                "State change"
            );
            let records: Vec<String> = store
                .records
                .iter()
                .map(|r| format!("{}={}", r.id, r.status))
                .collect();
            println!("{step:<8} {:<7} [{}]", change.action.to_string(), records.join(", "));
        }
        Ok(changes)
    }
}
