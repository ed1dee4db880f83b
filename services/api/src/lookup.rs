use clap::Args;
use gtdn::ares::format::{format_address, format_date, registration_label};
use gtdn::ares::{AresHttpClient, AresService, EconomicSubject, SearchForm, SearchResult};
use gtdn::cache::MemoryCacheStore;
use gtdn::config::AppConfig;
use gtdn::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Eight-digit ICO
    #[arg(long)]
    pub(crate) ico: Option<String>,
    /// Business name or part of it
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// CSU region code, e.g. 19 for Prague
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// CSU district code; implies its region
    #[arg(long)]
    pub(crate) district: Option<String>,
    /// Number of subjects to return (1-100)
    #[arg(long)]
    pub(crate) count: Option<i64>,
}

#[derive(Args, Debug)]
pub(crate) struct SubjectArgs {
    /// ICO of the subject; shorter values are zero-padded
    pub(crate) ico: String,
}

fn ares_service() -> Result<AresService<AresHttpClient>, AppError> {
    let config = AppConfig::load()?;
    let client = AresHttpClient::new(&config.ares)?;
    Ok(AresService::new(
        Arc::new(client),
        Arc::new(MemoryCacheStore::default()),
        &config.ares,
    ))
}

/// Form state as the site would hold it after the same selections.
pub(crate) fn search_form(args: &SearchArgs) -> SearchForm {
    let mut form = SearchForm {
        ico: args.ico.clone().unwrap_or_default().trim().to_string(),
        business_name: args.name.clone().unwrap_or_default(),
        ..SearchForm::default()
    };
    if let Some(region) = args.region.as_deref() {
        form.select_region(region);
    }
    if let Some(district) = args.district.as_deref() {
        form.select_district(district);
    }
    form
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let mut params = search_form(&args).into_params()?;
    params.count = args.count;

    let service = ares_service()?;
    let result = service.search(&params).await?;
    print!("{}", render_search(&result));
    Ok(())
}

pub(crate) async fn run_subject(args: SubjectArgs) -> Result<(), AppError> {
    let service = ares_service()?;
    let subject = service.get_by_ico(&args.ico).await?;
    print!("{}", render_subject(&subject));
    Ok(())
}

pub(crate) fn render_search(result: &SearchResult) -> String {
    let mut lines = vec![format!(
        "ARES search: {} of {} subjects",
        result.economic_subjects.len(),
        result.total_count
    )];
    for subject in &result.economic_subjects {
        let line = match subject.primary_record() {
            Some(record) => {
                let address = format_address(record.headquarters.as_ref()).unwrap_or_default();
                format!("  {}  {}  {}", record.ico, record.business_name, address)
            }
            None => format!("  {}", subject.ico_id),
        };
        lines.push(line);
    }
    with_trailing_newline(lines)
}

pub(crate) fn render_subject(subject: &EconomicSubject) -> String {
    let Some(record) = subject.primary_record() else {
        return format!("ICO {}: no records\n", subject.ico_id);
    };

    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        record.business_name.clone(),
        format!("  ICO:        {}", record.ico),
        format!("  VAT ID:     {}", or_dash(record.vat_id.clone())),
        format!(
            "  Address:    {}",
            or_dash(format_address(record.headquarters.as_ref()))
        ),
        format!("  Legal form: {}", or_dash(record.legal_form.clone())),
        format!("  Founded:    {}", or_dash(format_date(record.foundation_date))),
    ];
    if record.termination_date.is_some() {
        lines.push(format!(
            "  Terminated: {}",
            or_dash(format_date(record.termination_date))
        ));
    }

    if let Some(statuses) = record.registration_statuses.as_ref() {
        let active: Vec<&str> = statuses
            .entries()
            .into_iter()
            .filter(|(_, status)| *status == Some("AKTIVNI"))
            .filter_map(|(field, _)| registration_label(field))
            .collect();
        if !active.is_empty() {
            lines.push(format!("  Registers:  {}", active.join(", ")));
        }
    }
    with_trailing_newline(lines)
}

fn with_trailing_newline(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
