//! The trace-replay attribution engine.
//!
//! A single ordered pass over the struct-logger trace drives a virtual call
//! stack. Each step resolves to a source line through the executing
//! contract's PC table and source map; its cost lands on that line, except
//! that the entire cost of a nested call subtree is folded into the single
//! caller line that issued the call, reconciled when the trace returns to
//! the caller's depth.

use crate::contract::ContractId;
use crate::result::{Error, Result};
use crate::session::{ChainSource, Session};
use crate::source::SourceId;
use crate::trace::{StructLog, call_target, gas_cost};

/// Transaction-level inputs the engine needs besides the trace.
#[derive(Debug, Clone, Default)]
pub struct TxContext {
    /// `tx.to`; absent for contract-creation transactions.
    pub to: Option<String>,
    /// `receipt.contractAddress`; present for creation transactions.
    pub created: Option<String>,
}

impl TxContext {
    /// The address whose code the entry frame executes, and whether that
    /// frame runs constructor bytecode.
    pub fn entry(&self) -> Result<(&str, bool)> {
        match (&self.to, &self.created) {
            (Some(to), _) => Ok((to.as_str(), false)),
            (None, Some(created)) => Ok((created.as_str(), true)),
            (None, None) => Err(Error::MissingTarget),
        }
    }
}

/// Where a step's gas belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallSite {
    /// A resolved source line.
    Line(SourceId, usize),
    /// Compiler-generated or otherwise unattributable.
    Synthetic,
}

/// One frame of the virtual call stack.
#[derive(Debug)]
struct CallStackItem {
    contract: ContractId,
    /// True when the frame executes constructor bytecode.
    is_construction: bool,
    /// Gas remaining at frame entry.
    gas_before: i64,
    /// Gas remaining when the frame issued its most recent outgoing call.
    gas_before_outgoing: i64,
    /// Site of that call; `Some` iff the frame is awaiting a return.
    outgoing_site: Option<CallSite>,
}

/// Replays `logs` and distributes gas over the session's sources and
/// contracts.
///
/// Contracts are discovered on the fly: the first step entering an unseen
/// address suspends on the chain collaborator to fetch its bytecode. The
/// entry contract must already be resolvable from `tx`.
pub async fn profile_trace(
    session: &mut Session,
    chain: &dyn ChainSource,
    tx: &TxContext,
    logs: &[StructLog],
) -> Result<()> {
    let (entry_addr, entry_is_construction) = tx.entry()?;
    let entry = session.contract_at(chain, entry_addr).await?;

    if logs.is_empty() {
        tracing::warn!("trace contains no steps");
        return Ok(());
    }

    // Bridges ganache-style (depth 0) and geth-style (depth 1) traces.
    let bottom_depth = logs[0].depth;

    let mut stack = vec![CallStackItem {
        contract: entry,
        is_construction: entry_is_construction,
        gas_before: logs[0].gas,
        gas_before_outgoing: 0,
        outgoing_site: None,
    }];

    for (i, log) in logs.iter().enumerate() {
        unwind_returns(session, &mut stack, logs, i, bottom_depth);

        let (contract_id, is_construction) = {
            let top = &stack[stack.len() - 1];
            (top.contract, top.is_construction)
        };
        let site = resolve_site(session, contract_id, is_construction, log);

        let target = call_target(logs, i);
        if let Some(address) = target.address.as_deref() {
            let Some(next) = logs.get(i + 1) else {
                return Err(Error::TraceTruncated(i));
            };
            if next.depth > log.depth {
                let callee = session.contract_at(chain, address).await?;
                tracing::debug!(
                    "{} at step {i} enters 0x{address} (depth {})",
                    log.op,
                    next.depth
                );
                if let Some(top) = stack.last_mut() {
                    top.outgoing_site = Some(site);
                    top.gas_before_outgoing = log.gas;
                }
                stack.push(CallStackItem {
                    contract: callee,
                    is_construction: target.is_construction,
                    gas_before: next.gas,
                    gas_before_outgoing: 0,
                    outgoing_site: None,
                });
                // The call opcode's own cost is folded into the reconciled
                // call cost at unwind time.
                continue;
            }
        }

        match site {
            CallSite::Line(source_id, line) => {
                session.source_mut(source_id).add_gas(line, gas_cost(log));
            }
            CallSite::Synthetic => {
                session.contract_mut(contract_id).synth_gas += gas_cost(log);
            }
        }
    }

    let first = &logs[0];
    let last = &logs[logs.len() - 1];
    session.contract_mut(entry).total_gas = first.gas - last.gas + gas_cost(last);

    Ok(())
}

/// Pops frames whose calls have completed, charging each popped frame's
/// trailing gas to its contract and the whole subtree cost to the caller's
/// call site.
fn unwind_returns(
    session: &mut Session,
    stack: &mut Vec<CallStackItem>,
    logs: &[StructLog],
    i: usize,
    bottom_depth: i64,
) {
    let log = &logs[i];
    while log.depth - bottom_depth < stack.len() as i64 - 1 {
        let Some(prev) = stack.pop() else { break };

        // The preceding log closes the popped frame; its cost goes through
        // the exit-quirk compensation rather than the raw field.
        let prev_log = &logs[i - 1];
        session.contract_mut(prev.contract).total_gas +=
            prev.gas_before - prev_log.gas + gas_cost(prev_log);
        tracing::debug!(
            "step {i}: frame 0x{} returned",
            session.contract(prev.contract).address
        );

        let Some(caller) = stack.last_mut() else { break };
        let subtree_cost = caller.gas_before_outgoing - log.gas;
        let caller_contract = caller.contract;
        match caller.outgoing_site.take() {
            Some(CallSite::Line(source_id, line)) => {
                let source = session.source_mut(source_id);
                source.add_gas(line, subtree_cost);
                source.mark_call(line);
            }
            Some(CallSite::Synthetic) => {
                session.contract_mut(caller_contract).synth_gas += subtree_cost;
            }
            None => {}
        }
    }
}

/// Resolves the current step to the line its gas belongs to.
///
/// Registers the referenced source on the contract the first time its id is
/// seen. Steps in contracts without maps, synthetic instructions, unknown
/// source ids, and sources without loaded text all classify as synthetic.
fn resolve_site(
    session: &mut Session,
    contract_id: ContractId,
    is_construction: bool,
    log: &StructLog,
) -> CallSite {
    let Some(entry) = session
        .contract(contract_id)
        .instruction_entry(log.pc, is_construction)
    else {
        return CallSite::Synthetic;
    };
    if entry.is_synthetic() {
        return CallSite::Synthetic;
    }

    let Ok(offset) = usize::try_from(entry.offset) else {
        return CallSite::Synthetic;
    };
    let src_id = entry.file as u32;
    let Some(source_id) = session.source_by_compiler_id(src_id) else {
        return CallSite::Synthetic;
    };
    session
        .contract_mut(contract_id)
        .sources_by_id
        .entry(src_id)
        .or_insert(source_id);

    match session.source(source_id).line_of_offset(offset) {
        Some(line) => CallSite::Line(source_id, line),
        None => CallSite::Synthetic,
    }
}
