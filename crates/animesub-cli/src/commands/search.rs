//! `search` command handler.

use animesub_client::SearchDriver;
use futures::StreamExt;

use crate::output::print_search_results;

pub async fn run(
    driver: &SearchDriver,
    title: &str,
    sort: &str,
    title_type: &str,
    limit: u32,
    json: bool,
) -> anyhow::Result<()> {
    let page_limit = if limit == 0 { None } else { Some(limit) };
    let mut stream = Box::pin(driver.search(title, Some(sort), Some(title_type), page_limit));

    let mut records = Vec::new();
    while let Some(record) = stream.next().await {
        records.push(record?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_search_results(&records);
    }

    Ok(())
}
