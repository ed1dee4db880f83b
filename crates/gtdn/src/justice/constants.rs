pub const JUSTICE_BASE_URL: &str = "https://or.justice.cz";
pub const JUSTICE_OPENDATA_URL: &str = "https://dataor.justice.cz";
pub const JUSTICE_OPENDATA_HOST: &str = "dataor.justice.cz";

pub const USER_AGENT: &str = "GTDN-Backend/1.0";

/// Seconds.
pub const REQUEST_TIMEOUT: u64 = 30;
pub const CSV_CACHE_TTL: u64 = 43_200;

pub const MAX_PDF_SIZE_MB: usize = 50;
pub const MAX_PDF_PAGES: usize = 100;

/// Characters of extracted text returned to clients.
pub const TEXT_PREVIEW_CHARS: usize = 10_000;
/// Characters inspected when guessing the document type.
pub const DETECTION_WINDOW_CHARS: usize = 2_000;
