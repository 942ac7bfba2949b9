use crate::types::ticket::Ticket;

pub(crate) const DELIMITER: char = ',';
const QUOTE: char = '"';
const MIN_FIELDS: usize = 6;

/// Splits one line into trimmed fields. A double quote toggles quoted state
/// and is dropped from the output; a delimiter inside a quoted span is kept
/// as part of the field.
pub(crate) fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            QUOTE => quoted = !quoted,
            DELIMITER if !quoted => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SkipReason {
    Blank,
    InvalidEncoding,
    TooFewFields(usize),
    MissingId,
    MissingEmail,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Blank => write!(f, "blank row"),
            SkipReason::InvalidEncoding => write!(f, "row is not valid UTF-8"),
            SkipReason::TooFewFields(n) => {
                write!(f, "expected at least {} fields, found {}", MIN_FIELDS, n)
            }
            SkipReason::MissingId => write!(f, "missing ticket id"),
            SkipReason::MissingEmail => write!(f, "missing email"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Row {
    Ticket(Ticket),
    Skipped(SkipReason),
}

/// Position of each recognised column in the header, if present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Columns {
    pub(crate) ticket_id: Option<usize>,
    pub(crate) email: Option<usize>,
    pub(crate) kind: Option<usize>,
    pub(crate) description: Option<usize>,
    pub(crate) status: Option<usize>,
    pub(crate) resolution: Option<usize>,
}

impl Columns {
    pub(crate) fn from_header(line: &str) -> Self {
        let headers = split_line(line);

        Self {
            ticket_id: find_column(&headers, &["ticket_id", "ticketid"]),
            email: find_column(&headers, &["email"]),
            kind: find_column(&headers, &["type"]),
            description: find_column(&headers, &["description"]),
            status: find_column(&headers, &["status"]),
            resolution: find_column(&headers, &["resolution"]),
        }
    }

    pub(crate) fn parse_row(&self, line: &str) -> Row {
        let line = line.trim();

        if line.chars().all(|c| c == QUOTE) {
            return Row::Skipped(SkipReason::Blank);
        }

        let values = split_line(line);

        if values.len() < MIN_FIELDS {
            return Row::Skipped(SkipReason::TooFewFields(values.len()));
        }

        let ticket_id = column_value(&values, self.ticket_id);
        if ticket_id.is_empty() {
            return Row::Skipped(SkipReason::MissingId);
        }

        let ticket = Ticket {
            ticket_id: ticket_id.to_string(),
            email: column_value(&values, self.email).to_string(),
            kind: column_value(&values, self.kind).to_string(),
            description: column_value(&values, self.description).to_string(),
            status: column_value(&values, self.status).to_string(),
            resolution: column_value(&values, self.resolution).to_string(),
        };

        if ticket.email.is_empty() {
            return Row::Skipped(SkipReason::MissingEmail);
        }

        Row::Ticket(ticket)
    }
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.trim();
        aliases.iter().any(|alias| header.eq_ignore_ascii_case(alias))
    })
}

fn column_value(values: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| values.get(i))
        .map(|value| value.trim())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ticket_id,email,type,description,status,resolution";

    fn ticket(id: &str, email: &str, kind: &str, description: &str) -> Ticket {
        Ticket {
            ticket_id: id.into(),
            email: email.into(),
            kind: kind.into(),
            description: description.into(),
            status: "Open".into(),
            resolution: "".into(),
        }
    }

    #[test]
    fn test_split_line() {
        assert_eq!(split_line("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_line(""), vec![""]);
        assert_eq!(split_line("a,,"), vec!["a", "", ""]);
    }

    #[test]
    fn test_split_line_quoted_delimiter() {
        assert_eq!(split_line(r#"1,"a,b",c"#), vec!["1", "a,b", "c"]);
        assert_eq!(
            split_line(r#""  padded, quoted  ",x"#),
            vec!["padded, quoted", "x"]
        );
    }

    #[test]
    fn test_split_line_strips_quotes() {
        assert_eq!(split_line(r#""a""b",c"#), vec!["ab", "c"]);
        assert_eq!(split_line(r#""""#), vec![""]);
    }

    #[test]
    fn test_header_resolution() {
        let columns = Columns::from_header(HEADER);
        assert_eq!(columns.ticket_id, Some(0));
        assert_eq!(columns.resolution, Some(5));

        let columns = Columns::from_header(" Status , TicketID,EMAIL,\"Type\",Extra");
        assert_eq!(columns.status, Some(0));
        assert_eq!(columns.ticket_id, Some(1));
        assert_eq!(columns.email, Some(2));
        assert_eq!(columns.kind, Some(3));
        assert_eq!(columns.description, None);
        assert_eq!(columns.resolution, None);
    }

    #[test]
    fn test_parse_row() {
        let columns = Columns::from_header(HEADER);

        assert_eq!(
            columns.parse_row("T-1, alice@example.com ,Bug,Login fails,Open,"),
            Row::Ticket(ticket("T-1", "alice@example.com", "Bug", "Login fails"))
        );
    }

    #[test]
    fn test_parse_row_is_column_order_independent() {
        let reordered = Columns::from_header("status,description,resolution,type,email,ticket_id");

        assert_eq!(
            reordered.parse_row("Open,Login fails,,Bug,alice@example.com,T-1"),
            Columns::from_header(HEADER)
                .parse_row("T-1,alice@example.com,Bug,Login fails,Open,")
        );
    }

    #[test]
    fn test_parse_row_keeps_quoted_delimiter() {
        let columns = Columns::from_header(HEADER);

        assert_eq!(
            columns.parse_row(r#"T-2,bob@example.com,Question,"a,b",Open,"#),
            Row::Ticket(ticket("T-2", "bob@example.com", "Question", "a,b"))
        );
    }

    #[test]
    fn test_parse_row_skips() {
        let columns = Columns::from_header(HEADER);

        assert_eq!(columns.parse_row(""), Row::Skipped(SkipReason::Blank));
        assert_eq!(columns.parse_row("   "), Row::Skipped(SkipReason::Blank));
        assert_eq!(columns.parse_row("\"\""), Row::Skipped(SkipReason::Blank));
        assert_eq!(
            columns.parse_row("T-3,carol@example.com,Bug,Broken,Open"),
            Row::Skipped(SkipReason::TooFewFields(5))
        );
        assert_eq!(
            columns.parse_row(" ,carol@example.com,Bug,Broken,Open,"),
            Row::Skipped(SkipReason::MissingId)
        );
        // a quoted empty id is stripped to nothing
        assert_eq!(
            columns.parse_row("\"\",carol@example.com,Bug,Broken,Open,"),
            Row::Skipped(SkipReason::MissingId)
        );
        assert_eq!(
            columns.parse_row("T-3,,Bug,Broken,Open,"),
            Row::Skipped(SkipReason::MissingEmail)
        );
    }

    #[test]
    fn test_parse_row_missing_columns() {
        let without_id = Columns::from_header("email,type,description,status,resolution,notes");
        assert_eq!(
            without_id.parse_row("a@example.com,Bug,Broken,Open,,note"),
            Row::Skipped(SkipReason::MissingId)
        );

        let without_resolution =
            Columns::from_header("ticket_id,email,type,description,status,notes");
        assert_eq!(
            without_resolution.parse_row("T-4,d@example.com,Bug,Broken,Open,note"),
            Row::Ticket(ticket("T-4", "d@example.com", "Bug", "Broken"))
        );
    }
}
