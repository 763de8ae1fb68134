//! Dry-run planner for stamping grant numbers onto historical tracker
//! issues. Reads a JSON array of issue records on stdin (an export of
//! `{number, title, body, grant_number}`) and writes the planned edits on
//! stdout. Applying the edits is left to the operator; ambiguous titles
//! are surfaced, never patched.

use std::io::Read;

use serde::Deserialize;
use serde_json::json;

use grant_gateway::backfill::plan_grant_number_edits;

#[derive(Deserialize)]
struct IssueRecord {
    number: u64,
    title: String,
    body: String,
    grant_number: String,
}

fn main() -> anyhow::Result<()> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let records: Vec<IssueRecord> = serde_json::from_str(&input)?;

    let plans: Vec<_> = records
        .iter()
        .map(|record| {
            json!({
                "number": record.number,
                "plan": plan_grant_number_edits(&record.title, &record.body, &record.grant_number),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&plans)?);
    Ok(())
}
