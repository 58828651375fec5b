use condo_store::{AuditActor, FlushPolicy, RecordStore};
use serde_json::json;
use std::time::Duration;

fn main() -> Result<(), condo_store::Error> {
    env_logger::init();
    let path = std::env::temp_dir().join("condo_store_demo_builder.json");
    let _ = std::fs::remove_file(&path);

    // pretty JSON, a custom collection set, a real actor for the audit
    // trail, and a background flush every 5 seconds
    let db = RecordStore::builder(&path)
        .pretty(true)
        .collections(["frota", "garagens"])
        .actor(AuditActor {
            user_id: 7,
            ip: "192.168.0.10".to_string(),
            user_agent: "builder-demo".to_string(),
        })
        .policy(FlushPolicy::Async(Duration::from_secs(5)))
        .build()?;

    db.create("frota", json!({ "placa": "ABC-1234", "vaga": 12 }))?;
    db.create("garagens", json!({ "bloco": "A", "vagas": 40 }))?;
    db.flush()?;

    // the file on disk is now nicely indented
    let contents = std::fs::read_to_string(db.path())?;
    println!("On-disk JSON:\n{contents}");

    println!("\nDebug output: {db:?}");

    let _ = std::fs::remove_file(&path);
    Ok(())
}
