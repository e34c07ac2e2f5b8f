use serde::{Deserialize, Serialize};

/// Kind of one-time password an item produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    #[default]
    Totp,
    Steam,
}

/// HMAC hash family used for code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sha1 => "SHA1",
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha512 => "SHA512",
        }
    }
}

pub const DEFAULT_PERIOD: u32 = 30;
pub const DEFAULT_DIGITS: u32 = 6;

/// A persisted credential record.
///
/// Items are never edited in place: an update replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    /// Shared secret (base32 for TOTP items).
    pub key: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub algorithm: Algorithm,
    pub period: u32,
    pub digits: u32,
    pub issuer: Option<String>,
    pub account_name: Option<String>,
    /// Owning context (e.g. the account this item was synced from).
    pub user_id: Option<String>,
}

impl Item {
    /// Create a TOTP item with a fresh identifier and default parameters.
    pub fn new_totp(key: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            key: key.into(),
            item_type: ItemType::Totp,
            algorithm: Algorithm::Sha1,
            period: DEFAULT_PERIOD,
            digits: DEFAULT_DIGITS,
            issuer: None,
            account_name: None,
            user_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_account_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = Some(account_name.into());
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    pub fn with_digits(mut self, digits: u32) -> Self {
        self.digits = digits;
        self
    }

    pub fn with_item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Name shown for the item: the issuer, falling back to the account.
    pub fn display_name(&self) -> &str {
        self.issuer
            .as_deref()
            .or(self.account_name.as_deref())
            .unwrap_or_default()
    }

    /// Render the item as a provisioning URI.
    ///
    /// TOTP items produce `otpauth://totp/<label>?secret=..` with the label
    /// `issuer:account` (or just the account when there is no issuer). Steam
    /// items produce `steam://<key>`.
    pub fn to_otp_auth_uri(&self) -> String {
        match self.item_type {
            ItemType::Steam => {
                if self.key.starts_with("steam://") {
                    self.key.clone()
                } else {
                    format!("steam://{}", self.key)
                }
            }
            ItemType::Totp => {
                let account = urlencoding::encode(self.account_name.as_deref().unwrap_or_default());
                let label = match self.issuer.as_deref() {
                    Some(issuer) => format!("{}:{}", urlencoding::encode(issuer), account),
                    None => account.into_owned(),
                };
                let mut uri = format!(
                    "otpauth://totp/{}?secret={}&algorithm={}&digits={}&period={}",
                    label,
                    self.key,
                    self.algorithm.as_str(),
                    self.digits,
                    self.period
                );
                if let Some(issuer) = self.issuer.as_deref() {
                    uri.push_str("&issuer=");
                    uri.push_str(&urlencoding::encode(issuer));
                }
                uri
            }
        }
    }
}

/// Replacement values for an existing item.
///
/// The identifier is supplied separately to
/// [`Repository::update_item`](crate::repository::Repository::update_item).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItemRequest {
    pub key: String,
    pub item_type: ItemType,
    pub algorithm: Algorithm,
    pub period: u32,
    pub digits: u32,
    pub issuer: Option<String>,
    pub account_name: Option<String>,
}

impl UpdateItemRequest {
    /// Build the full replacement record.
    pub fn into_item(self, id: impl Into<String>, user_id: Option<String>) -> Item {
        Item {
            id: id.into(),
            key: self.key,
            item_type: self.item_type,
            algorithm: self.algorithm,
            period: self.period,
            digits: self.digits,
            issuer: self.issuer,
            account_name: self.account_name,
            user_id,
        }
    }
}

impl From<&Item> for UpdateItemRequest {
    fn from(item: &Item) -> Self {
        Self {
            key: item.key.clone(),
            item_type: item.item_type,
            algorithm: item.algorithm,
            period: item.period,
            digits: item.digits,
            issuer: item.issuer.clone(),
            account_name: item.account_name.clone(),
        }
    }
}

/// Whole-collection payload published by the aggregate item view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticatorData {
    pub items: Vec<Item>,
}

impl AuthenticatorData {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_totp_defaults() {
        let item = Item::new_totp("JBSWY3DPEHPK3PXP");
        assert_eq!(item.period, 30);
        assert_eq!(item.digits, 6);
        assert_eq!(item.algorithm, Algorithm::Sha1);
        assert_eq!(item.item_type, ItemType::Totp);
        assert!(!item.id.is_empty());
        assert_ne!(item.id, Item::new_totp("JBSWY3DPEHPK3PXP").id);
    }

    #[test]
    fn test_otp_auth_uri_with_issuer() {
        let item = Item::new_totp("JBSWY3DPEHPK3PXP")
            .with_issuer("ACME Co")
            .with_account_name("jane@example.com");
        assert_eq!(
            item.to_otp_auth_uri(),
            "otpauth://totp/ACME%20Co:jane%40example.com?secret=JBSWY3DPEHPK3PXP\
             &algorithm=SHA1&digits=6&period=30&issuer=ACME%20Co"
        );
    }

    #[test]
    fn test_otp_auth_uri_without_issuer() {
        let item = Item::new_totp("ABC")
            .with_account_name("bob")
            .with_algorithm(Algorithm::Sha256)
            .with_digits(8)
            .with_period(60);
        assert_eq!(
            item.to_otp_auth_uri(),
            "otpauth://totp/bob?secret=ABC&algorithm=SHA256&digits=8&period=60"
        );
    }

    #[test]
    fn test_otp_auth_uri_steam() {
        let item = Item::new_totp("STEAMKEY").with_item_type(ItemType::Steam);
        assert_eq!(item.to_otp_auth_uri(), "steam://STEAMKEY");

        let prefixed = Item::new_totp("steam://STEAMKEY").with_item_type(ItemType::Steam);
        assert_eq!(prefixed.to_otp_auth_uri(), "steam://STEAMKEY");
    }

    #[test]
    fn test_display_name_fallback() {
        let item = Item::new_totp("k").with_account_name("bob");
        assert_eq!(item.display_name(), "bob");
        assert_eq!(item.clone().with_issuer("GitHub").display_name(), "GitHub");
        assert_eq!(Item::new_totp("k").display_name(), "");
    }

    #[test]
    fn test_update_request_round_trip() {
        let item = Item::new_totp("k").with_issuer("GitHub").with_user_id("user-1");
        let rebuilt = UpdateItemRequest::from(&item).into_item(item.id.clone(), None);
        assert_eq!(rebuilt.issuer, item.issuer);
        assert_eq!(rebuilt.user_id, None);
    }

    #[test]
    fn test_item_serde_field_names() {
        let item = Item::new_totp("k").with_id("id-1").with_account_name("bob");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "TOTP");
        assert_eq!(json["algorithm"], "SHA1");
        assert_eq!(json["accountName"], "bob");
        assert!(json["userId"].is_null());
    }
}
