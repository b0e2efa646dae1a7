use crate::domain::model::HistoryEntry;
use crate::utils::error::Result;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum HistoryFormat {
    #[default]
    Table,
    Csv,
    Json,
}

pub fn render_history(entries: &[HistoryEntry], format: HistoryFormat) -> Result<String> {
    match format {
        HistoryFormat::Table => Ok(render_table(entries)),
        HistoryFormat::Csv => render_csv(entries),
        HistoryFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
    }
}

fn render_table(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No saved products yet.".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "Saved: {}\n{}\n{}円",
                entry.saved_at.format(DATE_FORMAT),
                entry.title,
                entry.price
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_csv(entries: &[HistoryEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "title", "price", "date"])?;
    for entry in entries {
        writer.write_record([
            entry.id.to_string(),
            entry.title.clone(),
            entry.price.clone(),
            entry.saved_at.format(DATE_FORMAT).to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entries() -> Vec<HistoryEntry> {
        let saved_at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        vec![HistoryEntry {
            id: 7,
            title: "ワイヤレスイヤホン, ノイキャン".to_string(),
            price: "29800".to_string(),
            saved_at,
        }]
    }

    #[test]
    fn test_table_output() {
        let output = render_history(&entries(), HistoryFormat::Table).unwrap();
        assert_eq!(
            output,
            "Saved: 2026-10-19 09:30:00\nワイヤレスイヤホン, ノイキャン\n29800円"
        );
    }

    #[test]
    fn test_empty_table() {
        let output = render_history(&[], HistoryFormat::Table).unwrap();
        assert_eq!(output, "No saved products yet.");
    }

    #[test]
    fn test_csv_quotes_commas() {
        let output = render_history(&entries(), HistoryFormat::Csv).unwrap();
        assert_eq!(
            output,
            "id,title,price,date\n7,\"ワイヤレスイヤホン, ノイキャン\",29800,2026-10-19 09:30:00\n"
        );
    }

    #[test]
    fn test_json_output() {
        let output = render_history(&entries(), HistoryFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["price"], "29800");
        assert_eq!(parsed[0]["saved_at"], "2026-10-19T09:30:00");
    }
}
