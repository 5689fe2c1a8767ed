/// Domain listing command handler
use tabled::{Table, Tabled};

use focusgate_core::DomainSettingsStore;

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "Domain")]
    name: String,
    #[tabled(rename = "AI tools")]
    ai_tools: String,
    #[tabled(rename = "LMS")]
    lms_platforms: usize,
    #[tabled(rename = "Productivity")]
    productivity_tools: usize,
    #[tabled(rename = "Blocked")]
    blocked_specific: usize,
}

fn domain_rows(store: &DomainSettingsStore) -> Vec<DomainRow> {
    store
        .domain_names()
        .into_iter()
        .filter_map(|name| store.get(name).map(|s| (name, s)))
        .map(|(name, settings)| DomainRow {
            name: name.to_string(),
            ai_tools: if settings.ai_tools.is_empty() {
                "-".to_string()
            } else {
                settings.ai_tools.join(", ")
            },
            lms_platforms: settings.lms_platforms.len(),
            productivity_tools: settings.productivity_tools.len(),
            blocked_specific: settings.blocked_specific.len(),
        })
        .collect()
}

pub fn handle_domains_command(store: &DomainSettingsStore) {
    if store.is_empty() {
        println!("No domains configured");
        return;
    }
    println!("{}", Table::new(domain_rows(store)));
}
