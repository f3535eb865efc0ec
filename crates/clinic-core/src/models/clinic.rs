//! Clinic models.

use serde::{Deserialize, Serialize};

/// The organization owning inventory and patient records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clinic {
    /// Database row ID
    pub clinic_id: i64,
    /// Display name (first line of every receipt header)
    pub name: String,
    /// Postal address
    pub address: String,
    /// Contact phone
    pub phone: String,
    /// Website, without scheme
    pub website: Option<String>,
}

impl Clinic {
    /// One-line contact string, e.g. `Phone: (123) 456-7890 | www.example.com`.
    pub fn contact_line(&self) -> String {
        match self.website.as_deref().filter(|w| !w.is_empty()) {
            Some(site) => format!("Phone: {} | {}", self.phone, site),
            None => format!("Phone: {}", self.phone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clinic(website: Option<&str>) -> Clinic {
        Clinic {
            clinic_id: 1,
            name: "Terra Natural Herbs".into(),
            address: "P.O.BOX 222, Arusha, Arusha".into(),
            phone: "(123) 456-7890".into(),
            website: website.map(Into::into),
        }
    }

    #[test]
    fn test_contact_line_with_website() {
        assert_eq!(
            clinic(Some("www.terranaturalherbs.co.tz")).contact_line(),
            "Phone: (123) 456-7890 | www.terranaturalherbs.co.tz"
        );
    }

    #[test]
    fn test_contact_line_without_website() {
        assert_eq!(clinic(None).contact_line(), "Phone: (123) 456-7890");
        assert_eq!(clinic(Some("")).contact_line(), "Phone: (123) 456-7890");
    }
}
