use super::{ADDR_A, MockChain, bundle, scratch_sources};
use color_eyre::Result;
use gasline_core::{Session, SessionConfig};
use serde_json::json;

fn session_with_sources(tag: &str) -> Session {
    let src_root = scratch_sources(tag, &[("a.sol", "aaaa\nbbbb\ncccc")]);
    Session::new(
        bundle(json!({
            "sources": { "a.sol": { "id": 0 }, "vendored/dep.sol": { "id": 1 } },
            "contracts": {}
        })),
        SessionConfig {
            src_root,
            skip: vec!["vendored".to_string()],
        },
    )
}

#[test]
fn both_lookup_paths_share_one_store() {
    let mut session = session_with_sources("lookup_paths");
    let by_id = session.source_by_compiler_id(0).expect("by id");
    let by_file = session.source_by_file_name("a.sol");
    assert_eq!(by_id, by_file);
    assert_eq!(session.source(by_id).file_name, "a.sol");
    assert_eq!(
        session.source(by_id).line_offsets.as_deref(),
        Some(&[0usize, 5, 10][..])
    );
}

#[test]
fn unknown_compiler_id_is_none() {
    let mut session = session_with_sources("unknown_id");
    assert!(session.source_by_compiler_id(42).is_none());
}

#[test]
fn skip_substring_suppresses_reading() {
    let mut session = session_with_sources("skip_filter");
    let id = session.source_by_compiler_id(1).expect("by id");
    let source = session.source(id);
    assert!(source.skip);
    assert!(source.text.is_none());
}

#[test]
fn unreadable_source_still_registers() {
    let mut session = Session::new(
        bundle(json!({ "sources": { "gone.sol": { "id": 3 } }, "contracts": {} })),
        SessionConfig::default(),
    );
    let id = session.source_by_compiler_id(3).expect("by id");
    let source = session.source(id);
    assert!(!source.skip);
    assert!(source.text.is_none());
    assert_eq!(source.line_of_offset(0), None);
}

#[tokio::test]
async fn contract_discovery_matches_exact_bytecode() -> Result<()> {
    let chain = MockChain::new().with_code(ADDR_A, "0x600160020100");
    let mut session = Session::new(
        bundle(json!({
            "sources": { "a.sol": { "id": 0 } },
            "contracts": {
                "a.sol": {
                    "A": {
                        "evm": {
                            "bytecode": { "object": "6000", "sourceMap": "0:1:0:-" },
                            "deployedBytecode": {
                                "object": "600160020100",
                                "sourceMap": "0:4:0:-;5:4;10:4;10:4"
                            }
                        }
                    }
                }
            }
        })),
        SessionConfig::default(),
    );

    let id = session.contract_at(&chain, &format!("0x{ADDR_A}")).await?;
    let contract = session.contract(id);
    assert_eq!(contract.name.as_deref(), Some("A"));
    assert_eq!(contract.file_name.as_deref(), Some("a.sol"));
    assert_eq!(contract.code.as_deref(), Some("600160020100"));
    assert_eq!(contract.construction_code.as_deref(), Some("6000"));
    assert_eq!(contract.pc_to_idx.as_ref().expect("pc map").len(), 4);
    assert_eq!(contract.source_map.as_ref().expect("source map").len(), 4);

    // Cached: a second lookup returns the same handle.
    let again = session.contract_at(&chain, ADDR_A).await?;
    assert_eq!(id, again);
    Ok(())
}

#[tokio::test]
async fn empty_code_leaves_a_skeleton() -> Result<()> {
    let chain = MockChain::new();
    let mut session = Session::new(bundle(json!({})), SessionConfig::default());
    let id = session.contract_at(&chain, ADDR_A).await?;
    let contract = session.contract(id);
    assert!(contract.code.is_none());
    assert!(contract.pc_to_idx.is_none());
    Ok(())
}

#[tokio::test]
async fn unmatched_bytecode_keeps_code_without_maps() -> Result<()> {
    let chain = MockChain::new().with_code(ADDR_A, "0x6000");
    let mut session = Session::new(bundle(json!({})), SessionConfig::default());
    let id = session.contract_at(&chain, ADDR_A).await?;
    let contract = session.contract(id);
    assert_eq!(contract.code.as_deref(), Some("6000"));
    assert!(contract.pc_to_idx.is_none());
    assert!(contract.name.is_none());
    Ok(())
}
