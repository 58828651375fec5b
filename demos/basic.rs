use condo_store::{Filters, RecordStore};
use serde_json::json;

fn main() -> Result<(), condo_store::Error> {
    env_logger::init();
    let path = std::env::temp_dir().join("condo_store_demo_basic.json");
    let _ = std::fs::remove_file(&path);
    let db = RecordStore::open(&path)?;

    // the default dataset ships one sample record per collection
    println!("collections = {:?}", db.tables());
    println!("stats       = {:?}", db.stats());

    // create / search / update / delete
    let ana = db.create(
        "moradores",
        json!({ "nome": "Ana Souza", "apartamento": "202", "bloco": "B" }),
    )?;
    let id = ana.id().expect("store assigns ids");
    println!("created #{id}: {:?}", ana.get("nome"));

    let hits = db.find_by_field("moradores", "nome", &json!("ana"))?;
    println!("search 'ana' -> {} hit(s)", hits.len());

    let moved = db.update("moradores", id, json!({ "apartamento": "203" }))?;
    println!("updated apartment = {:?}", moved.get("apartamento"));

    let removed = db.delete("moradores", id)?;
    println!("removed {:?}", removed.get("nome"));

    // every mutation above left a row in the audit trail
    let audit = db.read("auditoria", &Filters::new())?;
    println!("audit rows = {}", audit.len());

    let _ = std::fs::remove_file(&path);
    Ok(())
}
