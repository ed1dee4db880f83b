//! Search form state and its conversion into [`SearchParams`].

use serde::Deserialize;

use super::constants::{find_district, District};
use super::types::{SearchLocation, SearchParams};
use crate::error::ValidationErrors;

pub const ICO_DIGITS_MESSAGE: &str = "ICO may contain digits only.";
pub const ICO_LENGTH_MESSAGE: &str = "ICO must be exactly 8 digits.";
pub const AT_LEAST_ONE_MESSAGE: &str = "Enter an ICO or a business name.";

/// Raw form input. Region and district hold CSU codes as text, empty when
/// nothing is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchForm {
    pub ico: String,
    pub business_name: String,
    pub region: String,
    pub district: String,
}

impl SearchForm {
    /// Selecting a region drops a district that lies elsewhere.
    pub fn select_region(&mut self, region: &str) {
        self.region = region.trim().to_string();
        if self.district.is_empty() {
            return;
        }
        let belongs = find_district_code(&self.district)
            .map(|district| district.region.to_string() == self.region)
            .unwrap_or(true);
        if self.region.is_empty() || !belongs {
            self.district.clear();
        }
    }

    /// Selecting a district forces its region.
    pub fn select_district(&mut self, district: &str) {
        self.district = district.trim().to_string();
        if let Some(found) = find_district_code(&self.district) {
            self.region = found.region.to_string();
        }
    }

    fn has_full_ico(&self) -> bool {
        self.ico.len() == 8
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.ico.bytes().all(|byte| byte.is_ascii_digit()) {
            errors.add("ico", ICO_DIGITS_MESSAGE);
        }
        if !self.ico.is_empty() && self.ico.len() != 8 {
            errors.add("ico", ICO_LENGTH_MESSAGE);
        }
        if !self.has_full_ico() && self.business_name.trim().is_empty() {
            errors.add("ico", AT_LEAST_ONE_MESSAGE);
        }
        if !self.region.is_empty() && self.region.parse::<u32>().is_err() {
            errors.add("region", "Select a valid region.");
        }
        if !self.district.is_empty() && self.district.parse::<u32>().is_err() {
            errors.add("district", "Select a valid district.");
        }

        errors.finish()
    }

    pub fn into_params(self) -> Result<SearchParams, ValidationErrors> {
        self.validate()?;

        let mut params = SearchParams::default();
        if self.has_full_ico() {
            params.ico = vec![self.ico.clone()];
        }
        let name = self.business_name.trim();
        if !name.is_empty() {
            params.business_name = Some(name.to_string());
        }
        if !self.region.is_empty() || !self.district.is_empty() {
            params.location = Some(SearchLocation {
                municipality_code: None,
                region_code: self.region.parse().ok(),
                district_code: self.district.parse().ok(),
            });
        }
        Ok(params)
    }
}

fn find_district_code(raw: &str) -> Option<&'static District> {
    raw.parse::<u32>().ok().and_then(find_district)
}
