use std::io;

use seedmix_core::EntropyTag;

pub fn run(exclude: &[String], json: bool) -> io::Result<()> {
    let deriver = super::make_deriver(exclude);
    let report = deriver.explain();

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
        println!("{text}");
        return Ok(());
    }

    println!("{report}");
    println!("\nSources:");
    for tag in EntropyTag::ORDER {
        println!("  {:<14} {}", tag.to_string(), tag.description());
    }
    Ok(())
}
