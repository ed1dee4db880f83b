use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::ares::client::{AresApiError, AresGateway};
use crate::ares::service::AresService;
use crate::ares::types::{AresApiEkonomickySubjekt, AresApiSearchRequest, AresApiSearchResponse};
use crate::cache::MemoryCacheStore;
use crate::config::AresConfig;

pub(super) fn full_sidlo() -> Value {
    json!({
        "kodStatu": "CZ",
        "nazevStatu": "Česká republika",
        "kodKraje": 19,
        "nazevKraje": "Hlavní město Praha",
        "kodOkresu": 3100,
        "nazevOkresu": "Hlavní město Praha",
        "kodObce": 554782,
        "nazevObce": "Praha",
        "kodSpravnihoObvodu": 51,
        "nazevSpravnihoObvodu": "Praha 7",
        "kodMestskehoObvodu": 500178,
        "nazevMestskehoObvodu": "Praha 7",
        "kodMestskeCastiObvodu": 500178,
        "nazevMestskeCastiObvodu": "Praha 7",
        "kodUlice": 468622,
        "nazevUlice": "Jankovcova",
        "cisloDomovni": 1522,
        "doplnekAdresy": "budova B",
        "kodCastiObce": 490091,
        "cisloOrientacni": 53,
        "cisloOrientacniPismeno": "a",
        "nazevCastiObce": "Holešovice",
        "kodAdresnihoMista": 41587524,
        "psc": 17000,
        "textovaAdresa": "Jankovcova 1522/53a, 17000 Praha 7",
        "cisloDoAdresy": "1525",
        "standardizaceAdresy": true,
        "pscTxt": "170 00",
        "typCisloDomovni": 1
    })
}

pub(super) fn full_seznam_registraci() -> Value {
    json!({
        "stavZdrojeRos": "AKTIVNI",
        "stavZdrojeVr": "AKTIVNI",
        "stavZdrojeRes": "AKTIVNI",
        "stavZdrojeRzp": "AKTIVNI",
        "stavZdrojeNrpzs": "NEEXISTUJE",
        "stavZdrojeRpsh": "NEEXISTUJE",
        "stavZdrojeRcns": "NEEXISTUJE",
        "stavZdrojeSzr": "NEEXISTUJE",
        "stavZdrojeDph": "AKTIVNI",
        "stavZdrojeSkDph": "NEEXISTUJE",
        "stavZdrojeSd": "NEEXISTUJE",
        "stavZdrojeIr": "NEEXISTUJE",
        "stavZdrojeCeu": "NEEXISTUJE",
        "stavZdrojeRs": "NEEXISTUJE",
        "stavZdrojeRed": "NEEXISTUJE",
        "stavZdrojeMonitor": "NEEXISTUJE"
    })
}

pub(super) fn full_subject_json() -> Value {
    json!({
        "ico": "27082440",
        "icoId": "27082440",
        "obchodniJmeno": "Alza.cz a.s.",
        "sidlo": full_sidlo(),
        "pravniForma": "121",
        "pravniFormaRos": "121",
        "financniUrad": "Finanční úřad pro hlavní město Prahu",
        "datumVzniku": "2003-09-15",
        "datumZaniku": null,
        "datumAktualizace": "2024-01-15",
        "dic": "CZ27082440",
        "dicSkDph": null,
        "czNace": ["47910"],
        "czNace2008": ["47910"],
        "adresaDorucovaci": {
            "radekAdresy1": "Jankovcova 1522/53",
            "radekAdresy2": "Holešovice",
            "radekAdresy3": "170 00 Praha 7"
        },
        "seznamRegistraci": full_seznam_registraci(),
        "primarniZdroj": "ros",
        "subRegistrSzr": null,
        "dalsiUdaje": [{ "spisovaZnacka": "B 8573/MSPH", "datovyZdroj": "vr" }]
    })
}

pub(super) fn subject(ico: &str, name: &str) -> AresApiEkonomickySubjekt {
    AresApiEkonomickySubjekt {
        ico: ico.to_string(),
        ico_id: Some(ico.to_string()),
        obchodni_jmeno: name.to_string(),
        ..Default::default()
    }
}

pub(super) fn alza_search_response() -> AresApiSearchResponse {
    AresApiSearchResponse {
        pocet_celkem: 1,
        ekonomicke_subjekty: vec![subject("27082440", "Alza.cz a.s.")],
    }
}

/// Gateway double answering with canned results and recording each call.
pub(super) struct FakeAres {
    search_result: Result<AresApiSearchResponse, AresApiError>,
    detail_result: Result<AresApiEkonomickySubjekt, AresApiError>,
    search_calls: Mutex<Vec<AresApiSearchRequest>>,
    detail_calls: Mutex<Vec<String>>,
}

impl FakeAres {
    pub(super) fn new() -> Self {
        Self::answering(
            Ok(alza_search_response()),
            Ok(subject("27082440", "Alza.cz a.s.")),
        )
    }

    pub(super) fn answering(
        search_result: Result<AresApiSearchResponse, AresApiError>,
        detail_result: Result<AresApiEkonomickySubjekt, AresApiError>,
    ) -> Self {
        Self {
            search_result,
            detail_result,
            search_calls: Mutex::new(Vec::new()),
            detail_calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing(error: AresApiError) -> Self {
        Self::answering(Err(error.clone()), Err(error))
    }

    pub(super) fn search_calls(&self) -> Vec<AresApiSearchRequest> {
        self.search_calls.lock().expect("lock").clone()
    }

    pub(super) fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl AresGateway for FakeAres {
    async fn search(
        &self,
        request: &AresApiSearchRequest,
    ) -> Result<AresApiSearchResponse, AresApiError> {
        self.search_calls.lock().expect("lock").push(request.clone());
        self.search_result.clone()
    }

    async fn get_by_ico(&self, ico: &str) -> Result<AresApiEkonomickySubjekt, AresApiError> {
        self.detail_calls.lock().expect("lock").push(ico.to_string());
        self.detail_result.clone()
    }
}

pub(super) fn build_service(gateway: Arc<FakeAres>) -> Arc<AresService<FakeAres>> {
    build_service_with(gateway, AresConfig::default())
}

pub(super) fn build_service_with(
    gateway: Arc<FakeAres>,
    config: AresConfig,
) -> Arc<AresService<FakeAres>> {
    Arc::new(AresService::new(
        gateway,
        Arc::new(MemoryCacheStore::default()),
        &config,
    ))
}

pub(super) fn exhausted_outbound() -> AresConfig {
    AresConfig {
        outbound_max_requests: 0,
        ..AresConfig::default()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
