//! `ticketlink extract` command.

use crate::ticket::{extract, ExtractionRule};

/// Execute the `extract` command: print each ticket on its own line.
///
/// # Errors
///
/// Returns an error string if the pattern is unusable or yields no ticket.
pub fn run(regex: &str, flags: &str, delimiter: Option<&str>, text: &str) -> Result<(), String> {
    for ticket in &tickets(regex, flags, delimiter, text)? {
        println!("{ticket}");
    }
    Ok(())
}

fn tickets(regex: &str, flags: &str, delimiter: Option<&str>, text: &str) -> Result<Vec<String>, String> {
    let rule = ExtractionRule::new(regex, flags, delimiter).map_err(|e| e.to_string())?;
    let tickets = extract(text, &rule).map_err(|e| e.to_string())?;
    Ok(tickets.iter().map(ToString::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_tickets_in_order() {
        let found = tickets(r"^(?<ticket>[^ ]+)", "", Some(","), "abc-2,ABC-1 work").unwrap();
        assert_eq!(found, vec!["ABC-2", "ABC-1"]);
    }

    #[test]
    fn reports_no_match() {
        let err = tickets(r"(?<ticket>[A-Z]+-\d+)", "", None, "nothing").unwrap_err();
        assert!(err.contains("does not match"));
    }

    #[test]
    fn reports_bad_rule() {
        let err = run(r"[A-Z]+-\d+", "g", None, "ABC-1").unwrap_err();
        assert!(err.contains("no named group `ticket`"));
    }
}
