//! `find` command handler. Per the CLI's exit-code contract, `find` always
//! exits `0` — a miss is reported in its own output, not as a process
//! failure (that is reserved for `best`, which actually needs the file).

use animesub_client::SearchDriver;

use crate::output::print_record;

pub async fn run(driver: &SearchDriver, filename: &str, json: bool) -> anyhow::Result<()> {
    let best = driver.find_best(filename).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&best)?);
    } else {
        match &best {
            Some(record) => print_record(record),
            None => println!("No matching subtitle found"),
        }
    }

    Ok(())
}
