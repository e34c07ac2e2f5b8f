use super::item::Item;

/// Seconds remaining at which a code is styled as about to expire.
pub const DEFAULT_ALERT_THRESHOLD_SECONDS: u32 = 7;

/// A live verification code derived from an [`Item`]. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeView {
    pub code: String,
    pub name: String,
    pub username: Option<String>,
    pub period_seconds: u32,
    pub time_left_seconds: u32,
    pub alert_threshold_seconds: u32,
    pub start_icon: Option<String>,
    /// Identifier of the owning item.
    pub id: String,
}

impl CodeView {
    /// Build a view for `item` carrying an already computed code.
    pub fn for_item(item: &Item, code: impl Into<String>, time_left_seconds: u32) -> Self {
        Self {
            code: code.into(),
            name: item.display_name().to_string(),
            username: item.account_name.clone(),
            period_seconds: item.period,
            time_left_seconds,
            alert_threshold_seconds: DEFAULT_ALERT_THRESHOLD_SECONDS,
            start_icon: None,
            id: item.id.clone(),
        }
    }

    pub fn is_expiring(&self) -> bool {
        self.time_left_seconds <= self.alert_threshold_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_item_copies_item_fields() {
        let item = Item::new_totp("k")
            .with_id("id-1")
            .with_issuer("GitHub")
            .with_account_name("octocat")
            .with_period(60);
        let view = CodeView::for_item(&item, "123456", 42);
        assert_eq!(view.id, "id-1");
        assert_eq!(view.name, "GitHub");
        assert_eq!(view.username.as_deref(), Some("octocat"));
        assert_eq!(view.period_seconds, 60);
        assert!(!view.is_expiring());
        assert!(CodeView::for_item(&item, "1", 7).is_expiring());
    }
}
