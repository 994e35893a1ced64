//! Struct-logger trace model and per-step classification helpers.

use crate::{is_call_op, is_create_op, is_frame_exit_op, normalize_address};
use serde::Deserialize;

/// One step of a `debug_traceTransaction` struct-logger trace.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLog {
    /// Program counter of the executed instruction.
    pub pc: usize,
    /// Opcode name as reported by the trace provider.
    pub op: String,
    /// Gas remaining before the instruction executes.
    pub gas: i64,
    /// Cost reported for the instruction; some providers emit negative
    /// values on frame exits.
    pub gas_cost: i64,
    /// Call depth; ganache counts from 0, geth from 1.
    pub depth: i64,
    /// Stack contents bottom-to-top, hex words.
    #[serde(default)]
    pub stack: Vec<String>,
}

/// Result of `debug_traceTransaction`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceResult {
    #[serde(default)]
    pub struct_logs: Vec<StructLog>,
}

/// Gas cost of a step, compensating a known trace-provider quirk.
///
/// Some providers report the final RETURN/REVERT/STOP of a frame with a
/// negative cost; that narrow case reads as zero. Negative costs on any
/// other opcode are surfaced as-is and propagate into totals.
pub fn gas_cost(log: &StructLog) -> i64 {
    if log.gas_cost < 0 && is_frame_exit_op(&log.op) {
        0
    } else {
        log.gas_cost
    }
}

/// Outgoing call target resolved from a trace step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallTarget {
    /// Canonical callee address, when one could be determined.
    pub address: Option<String>,
    /// True for CREATE/CREATE2: the callee frame runs constructor bytecode.
    pub is_construction: bool,
}

/// Extracts the call target of the step at `index`, if it is a call.
///
/// For the CALL family the target is the second-from-top stack word (the
/// top is the forwarded gas). For CREATE/CREATE2 the created address is not
/// known until the trace re-emerges at the caller's depth, where it sits on
/// the stack top; a create that never re-emerges yields no address.
pub fn call_target(logs: &[StructLog], index: usize) -> CallTarget {
    let log = &logs[index];
    let op = log.op.as_str();

    if is_call_op(op) {
        let address = log
            .stack
            .len()
            .checked_sub(2)
            .and_then(|at| log.stack.get(at))
            .map(|word| normalize_address(word));
        return CallTarget {
            address,
            is_construction: false,
        };
    }

    if is_create_op(op) {
        let address = logs[index + 1..]
            .iter()
            .find(|later| later.depth == log.depth)
            .and_then(|later| later.stack.last())
            .map(|word| normalize_address(word));
        return CallTarget {
            address,
            is_construction: true,
        };
    }

    CallTarget::default()
}
