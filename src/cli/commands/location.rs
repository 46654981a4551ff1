use clap::Subcommand;

use crate::cli::{repository, utils, OutputFormat};
use crate::config::AppConfig;
use crate::location::service::parse_date;
use crate::location::LocationStore;

#[derive(Subcommand)]
pub enum LocationCommands {
    #[command(about = "Print the stored location map of an employee for a day")]
    Show {
        #[arg(help = "Employee id")]
        employee: String,
        #[arg(help = "Date (YYYY-MM-DD)")]
        date: String,
    },
}

pub async fn handle(config: &AppConfig, cmd: LocationCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let repository = repository(config).await?;

    match cmd {
        LocationCommands::Show { employee, date } => {
            let date = parse_date(&date)?;
            let Some(record) = repository.find(&employee, date).await? else {
                anyhow::bail!("Location details not found for {} on {}", employee, date);
            };
            utils::output_success(
                &output_format,
                &format!(
                    "{} feature(s), {} point(s) for {} on {}",
                    record.location_map.features.len(),
                    record.location_map.points().count(),
                    employee,
                    date
                ),
                Some(serde_json::to_value(&record.location_map)?),
            )
        }
    }
}
