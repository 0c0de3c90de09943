use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::form::{CommaList, HomeDefaults, SearchForm, ValidationErrors};

/// Oldest sale data the alert bot will consider, 30 days
pub const MAX_DATA_AGE_HOURS: u32 = 720;

/// Settings for the undercut alert bot. Nothing is sent to the backend, the form only
/// produces the JSON the user pastes into the bot.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndercutAlertForm {
    /// Retainer seller id as shown by Universalis, a hex string
    pub seller_id: String,
    pub server: String,
    /// Only alert on these items
    #[serde_as(as = "CommaList")]
    pub add_ids: Vec<i32>,
    /// Alert on everything except these items
    #[serde_as(as = "CommaList")]
    pub ignore_ids: Vec<i32>,
    pub hq_only: bool,
    pub ignore_data_after_hours: u32,
    pub ignore_undercuts_with_quantity_over: u32,
}

impl Default for UndercutAlertForm {
    fn default() -> Self {
        Self {
            seller_id: String::new(),
            server: String::new(),
            add_ids: Vec::new(),
            ignore_ids: Vec::new(),
            hq_only: false,
            ignore_data_after_hours: MAX_DATA_AGE_HOURS,
            ignore_undercuts_with_quantity_over: 9999,
        }
    }
}

impl SearchForm for UndercutAlertForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            !self.seller_id.is_empty() && self.seller_id.chars().all(|c| c.is_ascii_hexdigit()),
            "seller_id",
            "Seller id must be the hexadecimal id of your retainer",
        );
        errors.check(!self.server.is_empty(), "server", "Pick a home world");
        errors.check(
            self.add_ids.is_empty() || self.ignore_ids.is_empty(),
            "ignore_ids",
            "Use either a list of items to track or a list to ignore, not both",
        );
        errors.check(
            (1..=MAX_DATA_AGE_HOURS).contains(&self.ignore_data_after_hours),
            "ignore_data_after_hours",
            format!("Data age must be between 1 and {MAX_DATA_AGE_HOURS} hours"),
        );
        errors.into_result()
    }

    fn apply_preferences(&mut self, home: &HomeDefaults) {
        if self.server.is_empty() {
            self.server = home.ffxiv_world.clone();
        }
    }

    fn normalize(&mut self) {
        self.seller_id = self.seller_id.trim().to_ascii_lowercase();
        self.server = self.server.trim().to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UndercutConfig {
    pub seller_id: String,
    #[serde(rename = "homeServer")]
    pub server: String,
    pub add_ids: Vec<i32>,
    pub ignore_ids: Vec<i32>,
    pub hq_only: bool,
    pub ignore_data_after_hours: u32,
    pub ignore_undercuts_with_quantity_over: u32,
}

impl UndercutConfig {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&UndercutAlertForm> for UndercutConfig {
    fn from(form: &UndercutAlertForm) -> Self {
        Self {
            seller_id: form.seller_id.clone(),
            server: form.server.clone(),
            add_ids: form.add_ids.clone(),
            ignore_ids: form.ignore_ids.clone(),
            hq_only: form.hq_only,
            ignore_data_after_hours: form.ignore_data_after_hours,
            ignore_undercuts_with_quantity_over: form.ignore_undercuts_with_quantity_over,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{UndercutAlertForm, UndercutConfig};
    use crate::form::{parse_form, SearchForm};

    #[test]
    fn config_matches_bot_format() {
        let form: UndercutAlertForm =
            parse_form("seller_id=%20ABC123%20&server=Zalera&ignore_ids=1,2&hq_only=true").unwrap();
        assert!(form.validate().is_ok());
        let json = serde_json::to_value(UndercutConfig::from(&form)).unwrap();
        assert_eq!(json["seller_id"], "abc123");
        assert_eq!(json["homeServer"], "Zalera");
        assert_eq!(json["add_ids"], serde_json::json!([]));
        assert_eq!(json["ignore_ids"], serde_json::json!([1, 2]));
        assert_eq!(json["ignore_data_after_hours"], 720);
        assert_eq!(json["ignore_undercuts_with_quantity_over"], 9999);
    }

    #[test]
    fn lists_are_exclusive() {
        let form = UndercutAlertForm {
            seller_id: "ff00".into(),
            server: "Balmung".into(),
            add_ids: vec![1],
            ignore_ids: vec![2],
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].field, "ignore_ids");
    }

    #[test]
    fn seller_id_must_be_hex() {
        let form = UndercutAlertForm {
            seller_id: "not-a-hash".into(),
            server: "Balmung".into(),
            ignore_data_after_hours: 0,
            ..Default::default()
        };
        let fields: Vec<_> = form.validate().unwrap_err().0.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["seller_id", "ignore_data_after_hours"]);
    }
}
