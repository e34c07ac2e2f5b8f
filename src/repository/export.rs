//! Export encoders.
//!
//! Each CSV row carries nine fields under the six-column header: issuer,
//! period and digits follow the TOTP URI. Fields are quoted only when they
//! contain a delimiter or quote, and every row ends with `\n`.

use crate::error::ExportError;
use crate::models::{ExportItem, ExportJsonData, Item, LOGIN_ITEM_TYPE};

pub const CSV_HEADER: [&str; 6] = ["folder", "favorite", "type", "name", "login_uri", "login_totp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

pub fn encode(format: ExportFormat, items: &[Item]) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => encode_json(items),
        ExportFormat::Csv => encode_csv(items),
    }
}

pub fn encode_json(items: &[Item]) -> Result<String, ExportError> {
    let data = ExportJsonData {
        encrypted: false,
        items: items.iter().map(ExportItem::from).collect(),
    };
    Ok(serde_json::to_string(&data)?)
}

pub fn encode_csv(items: &[Item]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let item_type = LOGIN_ITEM_TYPE.to_string();
    writer.write_record(CSV_HEADER)?;
    for item in items {
        let issuer = item.issuer.as_deref().unwrap_or_default();
        let uri = item.to_otp_auth_uri();
        let period = item.period.to_string();
        let digits = item.digits.to_string();
        writer.write_record([
            "",
            "",
            item_type.as_str(),
            issuer,
            "",
            uri.as_str(),
            issuer,
            period.as_str(),
            digits.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<Item> {
        vec![
            Item::new_totp("AAAA").with_id("1").with_issuer("GitHub").with_account_name("octo"),
            Item::new_totp("BBBB").with_id("2").with_issuer("GitLab").with_digits(8),
            Item::new_totp("CCCC").with_id("3").with_issuer("Bitbucket").with_period(60),
        ]
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_item() {
        let csv = encode_csv(&items()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "folder,favorite,type,name,login_uri,login_totp");
        assert!(lines[1].starts_with(",,1,GitHub,,otpauth://totp/GitHub:octo?secret=AAAA"));
        assert!(lines[1].ends_with(",GitHub,30,6"));
        assert!(lines[2].ends_with(",GitLab,30,8"));
        assert!(lines[3].ends_with(",Bitbucket,60,6"));
    }

    #[test]
    fn test_csv_quotes_issuer_with_delimiters() {
        let items = vec![
            Item::new_totp("AAAA").with_id("1").with_issuer("Acme, Inc."),
            Item::new_totp("BBBB").with_id("2").with_issuer("Say \"hi\""),
        ];
        let data = encode_csv(&items).unwrap();
        let lines: Vec<&str> = data.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with(",,1,\"Acme, Inc.\",,otpauth://totp/Acme%2C%20Inc.:"));
        assert!(lines[1].ends_with(",\"Acme, Inc.\",30,6"));
        assert!(lines[2].ends_with(",\"Say \"\"hi\"\"\",30,6"));
        assert!(data.ends_with('\n'));

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.len(), 9);
        assert_eq!(&row[3], "Acme, Inc.");
        assert_eq!(&row[6], "Acme, Inc.");
    }

    #[test]
    fn test_csv_without_items_is_header_only() {
        let csv = encode_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_json_entries() {
        let json = encode_json(&items()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["encrypted"], false);
        let entries = value["items"].as_array().unwrap();
        assert_eq!(entries.len(), 3);

        let first = &entries[0];
        assert_eq!(first["id"], "1");
        assert_eq!(first["name"], "GitHub");
        assert_eq!(first["type"], 1);
        assert_eq!(first["favorite"], false);
        assert!(first["folderId"].is_null());
        assert!(first["organizationId"].is_null());
        assert!(first["collectionIds"].is_null());
        assert!(first["notes"].is_null());
        assert_eq!(
            first["login"]["totp"],
            "otpauth://totp/GitHub:octo?secret=AAAA&algorithm=SHA1&digits=6&period=30&issuer=GitHub"
        );
    }

    #[test]
    fn test_json_without_items() {
        let json = encode(ExportFormat::Json, &[]).unwrap();
        assert_eq!(json, r#"{"encrypted":false,"items":[]}"#);
    }
}
