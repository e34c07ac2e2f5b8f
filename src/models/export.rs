use serde::{Deserialize, Serialize};

use super::item::Item;

/// Item type code used for login entries in the export format.
pub const LOGIN_ITEM_TYPE: u8 = 1;

/// Top-level document of a JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportJsonData {
    pub encrypted: bool,
    pub items: Vec<ExportItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportItem {
    pub id: String,
    pub folder_id: Option<String>,
    pub organization_id: Option<String>,
    pub collection_ids: Option<Vec<String>>,
    pub name: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub item_type: u8,
    pub login: ExportLogin,
    pub favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportLogin {
    pub totp: String,
}

impl From<&Item> for ExportItem {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            folder_id: None,
            organization_id: None,
            collection_ids: None,
            name: item.issuer.clone(),
            notes: None,
            item_type: LOGIN_ITEM_TYPE,
            login: ExportLogin {
                totp: item.to_otp_auth_uri(),
            },
            favorite: false,
        }
    }
}
