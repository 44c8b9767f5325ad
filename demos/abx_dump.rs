//! ABX dump - print an ABX document as text or JSON.
//!
//! This example demonstrates:
//! - Reading a document from disk with the transport helpers
//! - Rendering the tree with its `Display` implementation
//! - Serializing the tree with serde
//!
//! # Running
//!
//! ```text
//! cargo run --example abx_dump -- /data/system/packages.xml
//! cargo run --example abx_dump -- --json /data/system/packages.xml
//! ```

use abx_codec::transport::read_file;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut json = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => path = Some(arg),
        }
    }

    let Some(path) = path else {
        eprintln!("usage: abx_dump [--json] <file>");
        std::process::exit(2);
    };

    let root = read_file(&path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&root)?);
    } else {
        println!("{}", root);
    }
    Ok(())
}
