//! Producing agency details printed on the packet

use serde::{Deserialize, Serialize};

/// The agency block on pages 1, 2 and the invoice
///
/// Defaults are the portal's own agency, used when no profile is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgencyProfile {
    pub name: String,
    pub contact_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

impl Default for AgencyProfile {
    fn default() -> Self {
        Self {
            name: "Gamaty Insurance Agency LLC DBA Capital & Co Insurance Services".to_string(),
            contact_name: "Eidan Gamaty".to_string(),
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            phone: "(310) 284-2136".to_string(),
            email: "eidan@capcoinsurance.com".to_string(),
        }
    }
}

impl AgencyProfile {
    /// "City, ST 12345", or empty when no address is set
    pub fn city_line(&self) -> String {
        if self.city.is_empty() && self.state.is_empty() && self.zip.is_empty() {
            return String::new();
        }
        format!("{}, {} {}", self.city, self.state, self.zip).trim().to_string()
    }
}
