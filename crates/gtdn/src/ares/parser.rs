//! Translation between the ARES wire schema and the entity model.
//!
//! Every function here is pure: no I/O and no shared state.

use chrono::{DateTime, NaiveDate};

use super::types::{
    AresApiAdresaDorucovaci, AresApiEkonomickySubjekt, AresApiSearchRequest, AresApiSearchResponse,
    AresApiSeznamRegistraci, AresApiSidlo, AresApiSidloFilter, BusinessRecord, DeliveryAddress,
    EconomicSubject, Headquarters, RegistrationStatuses, SearchParams, SearchResult,
};

pub fn to_search_result(response: AresApiSearchResponse) -> SearchResult {
    SearchResult {
        total_count: response.pocet_celkem,
        economic_subjects: response
            .ekonomicke_subjekty
            .into_iter()
            .map(to_economic_subject)
            .collect(),
    }
}

/// One subject with a single primary record.
pub fn to_economic_subject(subject: AresApiEkonomickySubjekt) -> EconomicSubject {
    let ico_id = subject
        .ico_id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| subject.ico.clone());

    let record = BusinessRecord {
        foundation_date: parse_date(subject.datum_vzniku.as_deref()),
        termination_date: parse_date(subject.datum_zaniku.as_deref()),
        update_date: parse_date(subject.datum_aktualizace.as_deref()),
        headquarters: parse_headquarters(subject.sidlo),
        delivery_address: parse_delivery_address(subject.adresa_dorucovaci),
        registration_statuses: parse_registration_statuses(subject.seznam_registraci),
        ico: subject.ico,
        business_name: subject.obchodni_jmeno,
        legal_form: subject.pravni_forma,
        legal_form_ros: subject.pravni_forma_ros,
        tax_office: subject.financni_urad,
        vat_id: subject.dic,
        slovak_vat_id: subject.dic_sk_dph,
        nace_activities: subject.cz_nace,
        nace_activities2008: subject.cz_nace2008,
        primary_source: subject.primarni_zdroj,
        sub_register_szr: subject.sub_registr_szr,
        is_primary_record: true,
    };

    EconomicSubject {
        ico_id,
        records: vec![record],
    }
}

pub fn to_search_request(params: &SearchParams) -> AresApiSearchRequest {
    let sidlo = params
        .location
        .as_ref()
        .map(|location| AresApiSidloFilter {
            kod_obce: location.municipality_code,
            kod_kraje: location.region_code,
            kod_okresu: location.district_code,
        })
        .filter(|filter| !filter.is_empty());

    AresApiSearchRequest {
        start: params.start,
        pocet: params.count,
        razeni: params.sorting.clone(),
        ico: params.ico.clone(),
        obchodni_jmeno: params.business_name.clone().filter(|name| !name.is_empty()),
        pravni_forma: params.legal_form.clone(),
        sidlo,
    }
}

pub fn parse_headquarters(sidlo: Option<AresApiSidlo>) -> Option<Headquarters> {
    let sidlo = sidlo?;
    Some(Headquarters {
        country_code: sidlo.kod_statu,
        country_name: sidlo.nazev_statu,
        region_code: sidlo.kod_kraje,
        region_name: sidlo.nazev_kraje,
        district_code: sidlo.kod_okresu,
        district_name: sidlo.nazev_okresu,
        municipality_code: sidlo.kod_obce,
        municipality_name: sidlo.nazev_obce,
        administrative_district_code: sidlo.kod_spravniho_obvodu,
        administrative_district_name: sidlo.nazev_spravniho_obvodu,
        city_district_code: sidlo.kod_mestskeho_obvodu,
        city_district_name: sidlo.nazev_mestskeho_obvodu,
        city_part_code: sidlo.kod_mestske_casti_obvodu,
        city_part_name: sidlo.nazev_mestske_casti_obvodu,
        street_code: sidlo.kod_ulice,
        street_name: sidlo.nazev_ulice,
        building_number: sidlo.cislo_domovni,
        address_supplement: sidlo.doplnek_adresy,
        municipality_part_code: sidlo.kod_casti_obce,
        orientation_number: sidlo.cislo_orientacni,
        orientation_number_letter: sidlo.cislo_orientacni_pismeno,
        municipality_part_name: sidlo.nazev_casti_obce,
        address_point_code: sidlo.kod_adresniho_mista,
        postal_code: sidlo.psc,
        text_address: sidlo.textova_adresa,
        address_number_to: sidlo.cislo_do_adresy,
        address_standardized: sidlo.standardizace_adresy,
        postal_code_text: sidlo.psc_txt,
        building_number_type: sidlo.typ_cislo_domovni,
    })
}

pub fn parse_delivery_address(adresa: Option<AresApiAdresaDorucovaci>) -> Option<DeliveryAddress> {
    let adresa = adresa?;
    Some(DeliveryAddress {
        address_line1: adresa.radek_adresy1,
        address_line2: adresa.radek_adresy2,
        address_line3: adresa.radek_adresy3,
    })
}

pub fn parse_registration_statuses(
    seznam: Option<AresApiSeznamRegistraci>,
) -> Option<RegistrationStatuses> {
    let seznam = seznam?;
    Some(RegistrationStatuses {
        ros_status: seznam.stav_zdroje_ros,
        business_register_status: seznam.stav_zdroje_vr,
        res_status: seznam.stav_zdroje_res,
        trade_register_status: seznam.stav_zdroje_rzp,
        nrpzs_status: seznam.stav_zdroje_nrpzs,
        rpsh_status: seznam.stav_zdroje_rpsh,
        rcns_status: seznam.stav_zdroje_rcns,
        szr_status: seznam.stav_zdroje_szr,
        vat_status: seznam.stav_zdroje_dph,
        slovak_vat_status: seznam.stav_zdroje_sk_dph,
        sd_status: seznam.stav_zdroje_sd,
        ir_status: seznam.stav_zdroje_ir,
        ceu_status: seznam.stav_zdroje_ceu,
        rs_status: seznam.stav_zdroje_rs,
        red_status: seznam.stav_zdroje_red,
        monitor_status: seznam.stav_zdroje_monitor,
    })
}

/// `YYYY-MM-DD` or the date part of an RFC 3339 timestamp. Anything else is
/// treated as unknown.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|timestamp| timestamp.date_naive())
    })
}
