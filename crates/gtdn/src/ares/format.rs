//! Display helpers for subject detail views.

use chrono::{Datelike, NaiveDate};

use super::types::Headquarters;

/// `Street 1522/53a, 17000 Praha`. Each part appears only when known.
pub fn format_address(headquarters: Option<&Headquarters>) -> Option<String> {
    let hq = headquarters?;
    let mut parts = Vec::with_capacity(2);

    if let Some(street) = hq.street_name.as_deref().filter(|name| !name.is_empty()) {
        let mut line = street.to_string();
        if let Some(building) = hq.building_number.filter(|number| *number != 0) {
            line.push_str(&format!(" {building}"));
            if let Some(orientation) = hq.orientation_number.filter(|number| *number != 0) {
                line.push_str(&format!("/{orientation}"));
                if let Some(letter) = hq.orientation_number_letter.as_deref() {
                    line.push_str(letter);
                }
            }
        }
        parts.push(line);
    }

    if let Some(municipality) = hq
        .municipality_name
        .as_deref()
        .filter(|name| !name.is_empty())
    {
        match hq.postal_code.filter(|code| *code != 0) {
            Some(postal) => parts.push(format!("{postal} {municipality}")),
            None => parts.push(municipality.to_string()),
        }
    }

    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Czech short date, `15. 9. 2003`.
pub fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|date| format!("{}. {}. {}", date.day(), date.month(), date.year()))
}

/// Short registry label for a `RegistrationStatuses` field.
pub fn registration_label(field: &str) -> Option<&'static str> {
    let label = match field {
        "rosStatus" => "ROS",
        "businessRegisterStatus" => "VR",
        "resStatus" => "RES",
        "tradeRegisterStatus" => "RZP",
        "nrpzsStatus" => "NRPZS",
        "rpshStatus" => "RPSH",
        "rcnsStatus" => "RCNS",
        "szrStatus" => "SZR",
        "vatStatus" => "DPH",
        "slovakVatStatus" => "SK DPH",
        "sdStatus" => "SD",
        "irStatus" => "IR",
        "ceuStatus" => "CEU",
        "rsStatus" => "RS",
        "redStatus" => "RED",
        "monitorStatus" => "Monitor",
        _ => return None,
    };
    Some(label)
}
