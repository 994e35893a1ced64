use super::step;
use gasline_core::trace::{TraceResult, call_target, gas_cost};

#[test]
fn trace_result_deserializes_geth_shape() {
    let trace: TraceResult = serde_json::from_value(serde_json::json!({
        "gas": 21784,
        "returnValue": "",
        "structLogs": [
            { "pc": 0, "op": "PUSH1", "gas": 100, "gasCost": 3, "depth": 1,
              "stack": [] },
            { "pc": 2, "op": "STOP", "gas": 97, "gasCost": 0, "depth": 1,
              "stack": ["0000000000000000000000000000000000000000000000000000000000000001"] }
        ]
    }))
    .expect("trace");
    assert_eq!(trace.struct_logs.len(), 2);
    assert_eq!(trace.struct_logs[1].stack.len(), 1);
}

#[test]
fn missing_stack_defaults_to_empty() {
    let trace: TraceResult = serde_json::from_value(serde_json::json!({
        "structLogs": [ { "pc": 0, "op": "STOP", "gas": 1, "gasCost": 0, "depth": 1 } ]
    }))
    .expect("trace");
    assert!(trace.struct_logs[0].stack.is_empty());
}

#[test]
fn every_call_family_op_extracts_a_target() {
    for op in ["CALL", "CALLCODE", "DELEGATECALL", "STATICCALL"] {
        let logs = [step(0, op, 100, 40, 1, &["00beef", "5208"])];
        let target = call_target(&logs, 0);
        assert_eq!(
            target.address.as_deref(),
            Some("000000000000000000000000000000000000beef"),
            "{op}"
        );
        assert!(!target.is_construction, "{op}");
    }
}

#[test]
fn create_target_ignores_deeper_reemergence() {
    // The nested construction itself contains a call; only the first log
    // back at the creator's depth carries the created address.
    let logs = [
        step(10, "CREATE", 500, 100, 1, &[]),
        step(0, "PUSH1", 400, 3, 2, &[]),
        step(2, "CALL", 397, 40, 2, &["cc", "ff"]),
        step(0, "STOP", 300, 0, 3, &[]),
        step(4, "RETURN", 290, 0, 2, &[]),
        step(11, "SWAP1", 280, 3, 1, &["00", "00dd"]),
    ];
    let target = call_target(&logs, 0);
    assert_eq!(
        target.address.as_deref(),
        Some("00000000000000000000000000000000000000dd")
    );
}

#[test]
fn negative_cost_survives_on_non_exit_ops() {
    let sstore = step(0, "SSTORE", 100, -4800, 1, &[]);
    assert_eq!(gas_cost(&sstore), -4800);

    let stop = step(0, "STOP", 100, -2, 1, &[]);
    assert_eq!(gas_cost(&stop), 0);
    let revert = step(0, "REVERT", 100, -2, 1, &[]);
    assert_eq!(gas_cost(&revert), 0);
}
