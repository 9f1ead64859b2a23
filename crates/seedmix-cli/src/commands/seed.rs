use std::io;

pub fn run(count: usize, exclude: &[String], json: bool) -> io::Result<()> {
    let deriver = super::make_deriver(exclude);
    let seeds: Vec<i64> = (0..count).map(|_| deriver.derive()).collect();

    if json {
        println!("{}", serde_json::to_string(&seeds).map_err(io::Error::other)?);
    } else {
        for s in &seeds {
            println!("{s}");
        }
    }
    Ok(())
}
