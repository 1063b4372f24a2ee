use serde::Serialize;
use serde_json::Value;

use crate::error::LookupError;

/// Result of one lookup, as handed to the popup.
pub type LookupOutcome = Result<LanguageTable, LookupError>;

const PRIMARY_CODE: usize = 0;
const SECONDARY_CODE: usize = 1;
const ESTIMATE: usize = 2;
const LABEL: usize = 3;
const LOCATION: usize = 4;
const COLUMNS: usize = 5;

// Requesting LAN7 alone drops Spanish, so LAN is requested as well and LAN 625
// is let through even when its LAN7 bucket is 0.
const SPANISH_LAN: i64 = 625;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageRow {
    pub label: String,
    pub estimate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageTable {
    pub location: String,
    pub rows: Vec<LanguageRow>,
}

impl LanguageTable {
    /// Parses a census response body: a header row followed by
    /// `[LAN7, LAN, EST, LANLABEL, NAME]` rows.
    pub fn from_response(body: &str, scope: &str) -> Result<Self, LookupError> {
        if body.trim().is_empty() {
            return Err(LookupError::Empty {
                scope: scope.to_string(),
            });
        }

        let rows: Vec<Vec<Value>> =
            serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;

        let data = match rows.split_first() {
            Some((_header, data)) if !data.is_empty() => data,
            _ => {
                return Err(LookupError::Empty {
                    scope: scope.to_string(),
                })
            }
        };

        if let Some(short) = data.iter().position(|row| row.len() < COLUMNS) {
            return Err(LookupError::Parse(format!(
                "row {} has {} columns, expected {COLUMNS}",
                short + 1,
                data[short].len()
            )));
        }

        let location = cell_text(&data[0][LOCATION]);
        let rows = data
            .iter()
            .filter(|row| keep_row(&row[PRIMARY_CODE], &row[SECONDARY_CODE]))
            .map(|row| LanguageRow {
                label: cell_text(&row[LABEL]),
                estimate: cell_text(&row[ESTIMATE]),
            })
            .collect();

        Ok(Self { location, rows })
    }

    /// Two column `label: value` table titled with the location name.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<table><tr><th colspan=\"2\" style=\"text-align: center\">{}</th></tr>",
            escape_html(&self.location)
        );
        for row in &self.rows {
            html.push_str(&format!(
                "<tr><td>{}:</td><td>{}</td></tr>",
                escape_html(&row.label),
                escape_html(&row.estimate)
            ));
        }
        html.push_str("</table>");
        html
    }
}

/// Popup body for either arm of a lookup.
pub fn popup_html(outcome: &LookupOutcome) -> String {
    match outcome {
        Ok(table) => table.to_html(),
        Err(error) => format!("<p>{}</p>", escape_html(&error.user_message())),
    }
}

fn keep_row(primary: &Value, secondary: &Value) -> bool {
    leading_int(primary) != Some(0) || leading_int(secondary) == Some(SPANISH_LAN)
}

/// Integer prefix of a cell, ignoring trailing junk ("12abc" is 12).
/// Fractional numbers truncate toward zero (`625.0` is 625, `0.5` is 0).
fn leading_int(cell: &Value) -> Option<i64> {
    match cell {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value.trunc() as i64)),
        Value::String(text) => {
            let text = text.trim_start();
            let (sign, digits) = match text.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, text.strip_prefix('+').unwrap_or(text)),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|value| sign * value)
        }
        _ => None,
    }
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{popup_html, LanguageTable};
    use crate::error::LookupError;

    const HEADER: &str = r#"["LAN7","LAN","EST","LANLABEL","NAME","state"]"#;

    fn body(rows: &[&str]) -> String {
        let mut all = vec![HEADER];
        all.extend_from_slice(rows);
        format!("[{}]", all.join(","))
    }

    #[test]
    fn keeps_spanish_and_nonzero_buckets() {
        let response = body(&[
            r#"["0","625","100","Spanish","X"]"#,
            r#"["0","600","50","French","X"]"#,
            r#"["3","300","20","Other","X"]"#,
        ]);

        let table = LanguageTable::from_response(&response, "state:06").unwrap();
        let labels: Vec<_> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Spanish", "Other"]);
        assert_eq!(table.rows[0].estimate, "100");
    }

    #[test]
    fn title_comes_from_first_data_row() {
        let response = body(&[
            r#"["1","625","37000000","Spanish","California","06"]"#,
            r#"["2","620","900","French","Ignored","06"]"#,
        ]);
        let table = LanguageTable::from_response(&response, "state:06").unwrap();
        assert_eq!(table.location, "California");
    }

    #[test]
    fn fully_filtered_response_is_a_title_only_table() {
        let response = body(&[r#"["0","600","50","French","Nevada"]"#]);
        let table = LanguageTable::from_response(&response, "state:32").unwrap();

        assert_eq!(table.location, "Nevada");
        assert!(table.rows.is_empty());
        assert_eq!(
            table.to_html(),
            "<table><tr><th colspan=\"2\" style=\"text-align: center\">Nevada</th></tr></table>"
        );
    }

    #[test]
    fn header_only_and_empty_bodies_are_empty_results() {
        let header_only = LanguageTable::from_response(&body(&[]), "state:06");
        assert_eq!(
            header_only,
            Err(LookupError::Empty {
                scope: "state:06".into()
            })
        );

        let no_content = LanguageTable::from_response("", "county:001&in=state:06");
        assert!(matches!(no_content, Err(LookupError::Empty { .. })));
    }

    #[test]
    fn malformed_bodies_are_parse_errors() {
        assert!(matches!(
            LanguageTable::from_response("<html>error</html>", "state:06"),
            Err(LookupError::Parse(_))
        ));
        assert!(matches!(
            LanguageTable::from_response(&body(&[r#"["1","625"]"#]), "state:06"),
            Err(LookupError::Parse(_))
        ));
    }

    #[test]
    fn unparseable_primary_code_keeps_the_row() {
        let response = body(&[r#"["n/a","600","5","Mystery","X"]"#, r#"[null,"600","5","Unknown","X"]"#]);
        let table = LanguageTable::from_response(&response, "state:06").unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn numeric_cells_truncate_like_integer_codes() {
        let response = body(&[
            r#"[0.0,600,"5","FloatZero","X"]"#,
            r#"[0,625.0,"9","FloatSpanish","X"]"#,
            r#"[2.7,300,"4","FloatBucket","X"]"#,
        ]);
        let table = LanguageTable::from_response(&response, "state:06").unwrap();
        let labels: Vec<_> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["FloatSpanish", "FloatBucket"]);
    }

    #[test]
    fn html_escapes_labels() {
        let response = body(&[r#"["1","1","7","<b>Tagalog</b> & more","A \"quoted\" place"]"#]);
        let html = LanguageTable::from_response(&response, "state:06")
            .unwrap()
            .to_html();

        assert!(html.contains("&lt;b&gt;Tagalog&lt;/b&gt; &amp; more:"));
        assert!(html.contains("A &quot;quoted&quot; place"));
    }

    #[test]
    fn error_popup_uses_the_user_message() {
        let html = popup_html(&Err(LookupError::Network("dns".into())));
        assert_eq!(html, "<p>Error: Unable to reach the census service</p>");
    }
}
