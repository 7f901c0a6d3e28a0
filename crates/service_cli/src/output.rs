//! Result printing in table or JSON form.

use serde::Serialize;

use crate::config::OutputFormat;
use crate::Result;

/// Print `report` to stdout in the configured format.
///
/// `table` renders the plain-text form; it is only called for
/// [`OutputFormat::Table`].
pub fn emit<T, F>(format: OutputFormat, report: &T, table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    println!("{}", render(format, report, table)?);
    Ok(())
}

/// Render `report` without printing it.
pub fn render<T, F>(format: OutputFormat, report: &T, table: F) -> Result<String>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => Ok(table(report)),
    }
}

/// Two-column `name  value` rows.
pub fn key_values(rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(k, v)| format!("{:<width$}  {}", k, v, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Optional value or `N/A`.
pub fn or_na(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Report {
        price: f64,
    }

    #[test]
    fn test_json_and_table() {
        let report = Report { price: 1.5 };
        let json = render(OutputFormat::Json, &report, |_| unreachable!()).unwrap();
        assert!(json.contains("\"price\": 1.5"));
        let table = render(OutputFormat::Table, &report, |r| format!("price {}", r.price)).unwrap();
        assert_eq!(table, "price 1.5");
    }

    #[test]
    fn test_key_values_aligns() {
        let text = key_values(&[("a", "1".into()), ("long", "2".into())]);
        assert_eq!(text, "a     1\nlong  2");
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(None, 4), "N/A");
        assert_eq!(or_na(Some(0.25), 2), "0.25");
    }
}
