//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};

use parkdesk_core::{Controller, Pager, RecordId};

use crate::cli::PageArgs;
use crate::error::CliError;

/// Fail early with a login hint when no token is available.
pub fn require_login(controller: &Controller, profile: &str) -> Result<(), CliError> {
    if controller.is_authenticated() {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn {
            profile: profile.into(),
        })
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Parse a `YYYY-MM-DD` flag value.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}'"),
    })
}

pub fn parse_opt_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, CliError> {
    raw.map(|r| parse_date(field, r)).transpose()
}

pub fn id(raw: &str) -> RecordId {
    RecordId::from(raw)
}

pub fn opt_id(raw: Option<&str>) -> Option<RecordId> {
    raw.filter(|r| !r.trim().is_empty()).map(RecordId::from)
}

/// Spinner on stderr while a request is in flight. Hidden when quiet or
/// when stderr is not a terminal.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Cut `rows` to the requested page. Returns the slice and a footer line
/// (empty with `--all`).
pub fn page<'a, T>(rows: &'a [T], args: &PageArgs, default_size: usize) -> (&'a [T], String) {
    if args.all {
        return (rows, String::new());
    }
    let mut pager = Pager::new(args.page_size.unwrap_or(default_size));
    pager.set_page(args.page);
    pager.clamp(rows.len());
    let footer = format!(
        "Trang {}/{} ({} dòng)",
        pager.page(),
        pager.page_count(rows.len()).max(1),
        rows.len()
    );
    (pager.slice(rows), footer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(page: usize, all: bool) -> PageArgs {
        PageArgs {
            page,
            page_size: None,
            all,
        }
    }

    #[test]
    fn page_clamps_past_the_end() {
        let rows: Vec<u32> = (1..=7).collect();
        let (slice, footer) = page(&rows, &args(9, false), 5);
        assert_eq!(slice, &[6, 7]);
        assert_eq!(footer, "Trang 2/2 (7 dòng)");
    }

    #[test]
    fn all_skips_paging() {
        let rows: Vec<u32> = (1..=7).collect();
        let (slice, footer) = page(&rows, &args(1, true), 5);
        assert_eq!(slice.len(), 7);
        assert!(footer.is_empty());
    }

    #[test]
    fn dates_must_be_iso() {
        assert!(parse_date("start", "2026-02-01").is_ok());
        assert!(matches!(
            parse_date("start", "01/02/2026"),
            Err(CliError::Validation { .. })
        ));
    }
}
