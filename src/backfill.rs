//! Best-effort planner for backfilling grant numbers into tracker issues
//! that predate the numbering convention. Pure text in, edit plan out;
//! the caller decides whether to apply it.

use serde::Serialize;

/// Proposed edits for one issue. `None` means that part is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuePatch {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BackfillPlan {
    /// Title already carries this grant number; nothing to do.
    AlreadyNumbered,
    /// Title carries a different 6–7 digit run. There is no reliable rule
    /// to tell a stale grant number from an unrelated figure, so the plan
    /// surfaces the conflict instead of guessing.
    AmbiguousTitleNumber { found: String },
    Patch(IssuePatch),
}

/// Maximal 6–7 digit run in a string, if any. Runs longer than 7 digits
/// are not grant numbers and are skipped.
fn find_grant_digit_run(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let len = i - start;
            if (6..=7).contains(&len) {
                return Some(&text[start..i]);
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Field-line prefixes observed in historical issue bodies, in the order
/// they were introduced.
const FIELD_PREFIXES: [&str; 3] = ["Grant number:", "Grant #:", "grant number:"];

/// Values that mean "not filled in yet" on a grant-number field line.
fn is_placeholder(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == "TBD" || v == "N/A" || v.chars().all(|c| c == '_' || c == '-')
}

fn patch_body(body: &str, grant_number: &str) -> Option<String> {
    for line in body.lines() {
        for prefix in FIELD_PREFIXES {
            if let Some(rest) = line.strip_prefix(prefix) {
                if rest.trim() == grant_number {
                    return None;
                }
                if is_placeholder(rest) {
                    let filled = format!("{prefix} {grant_number}");
                    return Some(body.replacen(line, &filled, 1));
                }
                // A different value already present; leave the body alone.
                return None;
            }
        }
    }
    // No field line at all; append one.
    Some(format!("{}\n\nGrant number: {grant_number}\n", body.trim_end()))
}

/// Decide how to stamp `grant_number` onto an issue. The title becomes
/// "[<number>] <old title>" when it carries no number yet; the body's
/// grant-number field line is filled or appended.
pub fn plan_grant_number_edits(title: &str, body: &str, grant_number: &str) -> BackfillPlan {
    if title.contains(grant_number) {
        return BackfillPlan::AlreadyNumbered;
    }
    if let Some(found) = find_grant_digit_run(title) {
        return BackfillPlan::AmbiguousTitleNumber { found: found.to_string() };
    }

    BackfillPlan::Patch(IssuePatch {
        title: Some(format!("[{grant_number}] {title}")),
        body: patch_body(body, grant_number),
    })
}
