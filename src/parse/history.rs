// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Parser for `git log` output in [`HISTORY_FORMAT`].
//!
//! ```text
//! id:1a2b3c4
//! author_username:Jane
//! author_email:jane@example.com
//! commit_date:1700000000
//! title:Fix parser
//! description:
//! <body, may span lines>\0
//! ```

use chrono::DateTime;

use crate::model::CommitRecord;

/// `--pretty` format producing one NUL-terminated record per commit.
pub const HISTORY_FORMAT: &str =
    "id:%h%nauthor_username:%an%nauthor_email:%ae%ncommit_date:%ad%ntitle:%s%ndescription:%n%b%x00";

const DESCRIPTION_MARKER: &str = "\ndescription:\n";
const KEYS: [&str; 5] = ["id", "author_username", "author_email", "commit_date", "title"];

/// Parses the whole log output, skipping empty records.
#[must_use]
pub fn parse_history(output: &str) -> Vec<CommitRecord> {
    output.split('\0').filter_map(parse_history_record).collect()
}

/// Parses a single record.
///
/// Each key is taken from the first line that carries it; later lines with
/// the same prefix are ignored. Everything after the description marker is
/// the description, verbatim. A `commit_date` that is not purely numeric is
/// dropped.
#[must_use]
pub fn parse_history_record(record: &str) -> Option<CommitRecord> {
    let record = record.trim_start();
    if record.is_empty() {
        return None;
    }

    let (head, description) = match record.find(DESCRIPTION_MARKER) {
        Some(at) => (
            &record[..at],
            record[at + DESCRIPTION_MARKER.len()..].trim_matches('\0'),
        ),
        None => (record, ""),
    };

    let mut values: [Option<&str>; KEYS.len()] = [None; KEYS.len()];
    for line in head.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if let Some(slot) = KEYS.iter().position(|k| *k == key)
            && values[slot].is_none()
        {
            values[slot] = Some(value);
        }
    }

    let [id, author_username, author_email, commit_date, title] =
        values.map(Option::unwrap_or_default);
    let commit_date = parse_unix_date(commit_date);

    Some(CommitRecord::new(
        id.to_string(),
        title.to_string(),
        description.to_string(),
        author_username.to_string(),
        author_email.to_string(),
        commit_date,
    ))
}

fn parse_unix_date(raw: &str) -> Option<DateTime<chrono::Utc>> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    DateTime::from_timestamp(raw.parse().ok()?, 0)
}
