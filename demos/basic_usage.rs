use kv_config::{ConfigStore, KvStore, MemoryStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("cluster.yaml");
    std::fs::write(
        &file,
        "people:\n  gigi:\n    surname: burigi\n    birth: 4/7/1916\n",
    )?;

    // Push the file into an in-memory store; any KvStore client works here.
    let mut store = ConfigStore::new(MemoryStore::new(), "yaml")?;
    store.push("config0", &file)?;

    // Every leaf landed below /config/config0/...
    for (key, value) in store.client().get("/config/config0", true)? {
        println!("{key} = {value}");
    }

    // Pull it back as a tree, or re-serialized for display.
    let tree = store.pull("config0")?;
    println!("\npulled: {tree:#?}");

    let text = store.dump("config0")?;
    println!("\ndump:\n{}", String::from_utf8(text)?);

    Ok(())
}
