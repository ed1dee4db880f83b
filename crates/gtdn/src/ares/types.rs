//! Wire types of the ARES REST API (Czech field names) and the entity model
//! served to clients (English, camelCase).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upstream
// ---------------------------------------------------------------------------

/// Registered address (`sidlo`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AresApiSidlo {
    pub kod_statu: Option<String>,
    pub nazev_statu: Option<String>,
    pub kod_kraje: Option<u32>,
    pub nazev_kraje: Option<String>,
    pub kod_okresu: Option<u32>,
    pub nazev_okresu: Option<String>,
    pub kod_obce: Option<u32>,
    pub nazev_obce: Option<String>,
    pub kod_spravniho_obvodu: Option<u32>,
    pub nazev_spravniho_obvodu: Option<String>,
    pub kod_mestskeho_obvodu: Option<u32>,
    pub nazev_mestskeho_obvodu: Option<String>,
    pub kod_mestske_casti_obvodu: Option<u32>,
    pub nazev_mestske_casti_obvodu: Option<String>,
    pub kod_ulice: Option<u32>,
    pub nazev_ulice: Option<String>,
    pub cislo_domovni: Option<u32>,
    pub doplnek_adresy: Option<String>,
    pub kod_casti_obce: Option<u32>,
    pub cislo_orientacni: Option<u32>,
    pub cislo_orientacni_pismeno: Option<String>,
    pub nazev_casti_obce: Option<String>,
    pub kod_adresniho_mista: Option<u32>,
    pub psc: Option<u32>,
    pub textova_adresa: Option<String>,
    pub cislo_do_adresy: Option<String>,
    pub standardizace_adresy: Option<bool>,
    pub psc_txt: Option<String>,
    pub typ_cislo_domovni: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AresApiAdresaDorucovaci {
    pub radek_adresy1: Option<String>,
    pub radek_adresy2: Option<String>,
    pub radek_adresy3: Option<String>,
}

/// Status of the subject in each source registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AresApiSeznamRegistraci {
    pub stav_zdroje_ros: Option<String>,
    pub stav_zdroje_vr: Option<String>,
    pub stav_zdroje_res: Option<String>,
    pub stav_zdroje_rzp: Option<String>,
    pub stav_zdroje_nrpzs: Option<String>,
    pub stav_zdroje_rpsh: Option<String>,
    pub stav_zdroje_rcns: Option<String>,
    pub stav_zdroje_szr: Option<String>,
    pub stav_zdroje_dph: Option<String>,
    pub stav_zdroje_sk_dph: Option<String>,
    pub stav_zdroje_sd: Option<String>,
    pub stav_zdroje_ir: Option<String>,
    pub stav_zdroje_ceu: Option<String>,
    pub stav_zdroje_rs: Option<String>,
    pub stav_zdroje_red: Option<String>,
    pub stav_zdroje_monitor: Option<String>,
}

/// One economic subject as returned by `GET /{ico}` and inside search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AresApiEkonomickySubjekt {
    pub ico: String,
    #[serde(default)]
    pub ico_id: Option<String>,
    pub obchodni_jmeno: String,
    #[serde(default)]
    pub sidlo: Option<AresApiSidlo>,
    #[serde(default)]
    pub pravni_forma: Option<String>,
    #[serde(default)]
    pub pravni_forma_ros: Option<String>,
    #[serde(default)]
    pub financni_urad: Option<String>,
    #[serde(default)]
    pub datum_vzniku: Option<String>,
    #[serde(default)]
    pub datum_zaniku: Option<String>,
    #[serde(default)]
    pub datum_aktualizace: Option<String>,
    #[serde(default)]
    pub dic: Option<String>,
    #[serde(default)]
    pub dic_sk_dph: Option<String>,
    #[serde(default)]
    pub adresa_dorucovaci: Option<AresApiAdresaDorucovaci>,
    #[serde(default)]
    pub cz_nace: Option<Vec<String>>,
    #[serde(default)]
    pub cz_nace2008: Option<Vec<String>>,
    #[serde(default)]
    pub seznam_registraci: Option<AresApiSeznamRegistraci>,
    #[serde(default)]
    pub primarni_zdroj: Option<String>,
    #[serde(default)]
    pub sub_registr_szr: Option<String>,
}

/// Body of `POST /vyhledat` responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AresApiSearchResponse {
    pub pocet_celkem: u64,
    #[serde(default)]
    pub ekonomicke_subjekty: Vec<AresApiEkonomickySubjekt>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AresApiSidloFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kod_obce: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kod_kraje: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kod_okresu: Option<u32>,
}

impl AresApiSidloFilter {
    pub fn is_empty(&self) -> bool {
        self.kod_obce.is_none() && self.kod_kraje.is_none() && self.kod_okresu.is_none()
    }
}

/// Body of `POST /vyhledat`. Absent values are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AresApiSearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocet: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub razeni: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ico: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obchodni_jmeno: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pravni_forma: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidlo: Option<AresApiSidloFilter>,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headquarters {
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub region_code: Option<u32>,
    pub region_name: Option<String>,
    pub district_code: Option<u32>,
    pub district_name: Option<String>,
    pub municipality_code: Option<u32>,
    pub municipality_name: Option<String>,
    pub administrative_district_code: Option<u32>,
    pub administrative_district_name: Option<String>,
    pub city_district_code: Option<u32>,
    pub city_district_name: Option<String>,
    pub city_part_code: Option<u32>,
    pub city_part_name: Option<String>,
    pub street_code: Option<u32>,
    pub street_name: Option<String>,
    pub building_number: Option<u32>,
    pub address_supplement: Option<String>,
    pub municipality_part_code: Option<u32>,
    pub orientation_number: Option<u32>,
    pub orientation_number_letter: Option<String>,
    pub municipality_part_name: Option<String>,
    pub address_point_code: Option<u32>,
    pub postal_code: Option<u32>,
    pub text_address: Option<String>,
    pub address_number_to: Option<String>,
    pub address_standardized: Option<bool>,
    pub postal_code_text: Option<String>,
    pub building_number_type: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatuses {
    pub ros_status: Option<String>,
    pub business_register_status: Option<String>,
    pub res_status: Option<String>,
    pub trade_register_status: Option<String>,
    pub nrpzs_status: Option<String>,
    pub rpsh_status: Option<String>,
    pub rcns_status: Option<String>,
    pub szr_status: Option<String>,
    pub vat_status: Option<String>,
    pub slovak_vat_status: Option<String>,
    pub sd_status: Option<String>,
    pub ir_status: Option<String>,
    pub ceu_status: Option<String>,
    pub rs_status: Option<String>,
    pub red_status: Option<String>,
    pub monitor_status: Option<String>,
}

impl RegistrationStatuses {
    /// `(field, status)` pairs in display order, camelCase field names.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 16] {
        [
            ("rosStatus", self.ros_status.as_deref()),
            ("businessRegisterStatus", self.business_register_status.as_deref()),
            ("resStatus", self.res_status.as_deref()),
            ("tradeRegisterStatus", self.trade_register_status.as_deref()),
            ("nrpzsStatus", self.nrpzs_status.as_deref()),
            ("rpshStatus", self.rpsh_status.as_deref()),
            ("rcnsStatus", self.rcns_status.as_deref()),
            ("szrStatus", self.szr_status.as_deref()),
            ("vatStatus", self.vat_status.as_deref()),
            ("slovakVatStatus", self.slovak_vat_status.as_deref()),
            ("sdStatus", self.sd_status.as_deref()),
            ("irStatus", self.ir_status.as_deref()),
            ("ceuStatus", self.ceu_status.as_deref()),
            ("rsStatus", self.rs_status.as_deref()),
            ("redStatus", self.red_status.as_deref()),
            ("monitorStatus", self.monitor_status.as_deref()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    pub ico: String,
    pub business_name: String,
    pub headquarters: Option<Headquarters>,
    pub legal_form: Option<String>,
    pub legal_form_ros: Option<String>,
    pub tax_office: Option<String>,
    pub foundation_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
    pub update_date: Option<NaiveDate>,
    pub vat_id: Option<String>,
    pub slovak_vat_id: Option<String>,
    pub nace_activities: Option<Vec<String>>,
    pub nace_activities2008: Option<Vec<String>>,
    pub delivery_address: Option<DeliveryAddress>,
    pub registration_statuses: Option<RegistrationStatuses>,
    pub primary_source: Option<String>,
    pub sub_register_szr: Option<String>,
    pub is_primary_record: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicSubject {
    pub ico_id: String,
    pub records: Vec<BusinessRecord>,
}

impl EconomicSubject {
    pub fn primary_record(&self) -> Option<&BusinessRecord> {
        self.records
            .iter()
            .find(|record| record.is_primary_record)
            .or_else(|| self.records.first())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub total_count: u64,
    pub economic_subjects: Vec<EconomicSubject>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality_code: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_code: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_code: Option<u32>,
}

/// Search filters accepted from clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ico: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legal_form: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SearchLocation>,
}
