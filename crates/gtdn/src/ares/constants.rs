//! ARES endpoint settings and the CSU region/district code tables.

use serde::Serialize;

pub const ARES_BASE_URL: &str =
    "https://ares.gov.cz/ekonomicke-subjekty-v-be/rest/ekonomicke-subjekty";

pub const ARES_DEFAULT_PAGE_SIZE: i64 = 10;
pub const ARES_MAX_PAGE_SIZE: i64 = 100;

/// Seconds.
pub const ARES_REQUEST_TIMEOUT: u64 = 15;
pub const ARES_SEARCH_CACHE_TTL: u64 = 900;
pub const ARES_DETAIL_CACHE_TTL: u64 = 3600;

pub const ARES_OUTBOUND_MAX_REQUESTS: u32 = 12;
pub const ARES_OUTBOUND_WINDOW: u64 = 60;

/// Czech region (kraj).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub code: u32,
    pub name: &'static str,
}

/// Czech district (okres) and the region it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct District {
    pub code: u32,
    pub name: &'static str,
    pub region: u32,
}

const fn region(code: u32, name: &'static str) -> Region {
    Region { code, name }
}

const fn district(code: u32, name: &'static str, region: u32) -> District {
    District { code, name, region }
}

pub const REGION_CODES: [Region; 14] = [
    region(19, "Hlavní město Praha"),
    region(27, "Středočeský"),
    region(35, "Jihočeský"),
    region(43, "Plzeňský"),
    region(51, "Karlovarský"),
    region(60, "Ústecký"),
    region(78, "Liberecký"),
    region(86, "Královéhradecký"),
    region(94, "Pardubický"),
    region(108, "Vysočina"),
    region(116, "Jihomoravský"),
    region(124, "Olomoucký"),
    region(132, "Moravskoslezský"),
    region(141, "Zlínský"),
];

pub const DISTRICT_CODES: [District; 77] = [
    district(3100, "Hlavní město Praha", 19),
    // Středočeský
    district(3201, "Benešov", 27),
    district(3202, "Beroun", 27),
    district(3203, "Kladno", 27),
    district(3204, "Kolín", 27),
    district(3205, "Kutná Hora", 27),
    district(3206, "Mělník", 27),
    district(3207, "Mladá Boleslav", 27),
    district(3208, "Nymburk", 27),
    district(3209, "Praha-východ", 27),
    district(3210, "Praha-západ", 27),
    district(3211, "Příbram", 27),
    district(3212, "Rakovník", 27),
    // Jihočeský
    district(3301, "České Budějovice", 35),
    district(3302, "Český Krumlov", 35),
    district(3303, "Jindřichův Hradec", 35),
    district(3304, "Pelhřimov", 35),
    district(3305, "Písek", 35),
    district(3306, "Prachatice", 35),
    district(3307, "Strakonice", 35),
    district(3308, "Tábor", 35),
    // Plzeňský
    district(3401, "Domažlice", 43),
    district(3404, "Klatovy", 43),
    district(3405, "Plzeň-město", 43),
    district(3406, "Plzeň-jih", 43),
    district(3407, "Plzeň-sever", 43),
    district(3408, "Rokycany", 43),
    district(3410, "Tachov", 43),
    // Karlovarský
    district(3402, "Cheb", 51),
    district(3403, "Karlovy Vary", 51),
    district(3409, "Sokolov", 51),
    // Ústecký
    district(3502, "Děčín", 60),
    district(3503, "Chomutov", 60),
    district(3506, "Litoměřice", 60),
    district(3507, "Louny", 60),
    district(3508, "Most", 60),
    district(3509, "Teplice", 60),
    district(3510, "Ústí nad Labem", 60),
    // Liberecký
    district(3501, "Česká Lípa", 78),
    district(3504, "Jablonec nad Nisou", 78),
    district(3505, "Liberec", 78),
    district(3608, "Semily", 78),
    // Královéhradecký
    district(3602, "Hradec Králové", 86),
    district(3604, "Jičín", 86),
    district(3605, "Náchod", 86),
    district(3607, "Rychnov nad Kněžnou", 86),
    district(3610, "Trutnov", 86),
    // Pardubický
    district(3603, "Chrudim", 94),
    district(3606, "Pardubice", 94),
    district(3609, "Svitavy", 94),
    district(3611, "Ústí nad Orlicí", 94),
    // Vysočina
    district(3601, "Havlíčkův Brod", 108),
    district(3707, "Jihlava", 108),
    district(3710, "Třebíč", 108),
    district(3714, "Žďár nad Sázavou", 108),
    // Jihomoravský
    district(3701, "Blansko", 116),
    district(3702, "Brno-město", 116),
    district(3703, "Brno-venkov", 116),
    district(3704, "Břeclav", 116),
    district(3706, "Hodonín", 116),
    district(3712, "Vyškov", 116),
    district(3713, "Znojmo", 116),
    // Olomoucký
    district(3709, "Prostějov", 124),
    district(3805, "Olomouc", 124),
    district(3808, "Přerov", 124),
    district(3809, "Šumperk", 124),
    district(3811, "Jeseník", 124),
    // Moravskoslezský
    district(3801, "Bruntál", 132),
    district(3802, "Frýdek-Místek", 132),
    district(3803, "Karviná", 132),
    district(3804, "Nový Jičín", 132),
    district(3806, "Opava", 132),
    district(3807, "Ostrava-město", 132),
    // Zlínský
    district(3705, "Zlín", 141),
    district(3708, "Kroměříž", 141),
    district(3711, "Uherské Hradiště", 141),
    district(3810, "Vsetín", 141),
];

pub fn find_region(code: u32) -> Option<&'static Region> {
    REGION_CODES.iter().find(|region| region.code == code)
}

pub fn find_district(code: u32) -> Option<&'static District> {
    DISTRICT_CODES.iter().find(|district| district.code == code)
}

pub fn districts_of(region: u32) -> impl Iterator<Item = &'static District> {
    DISTRICT_CODES
        .iter()
        .filter(move |district| district.region == region)
}
